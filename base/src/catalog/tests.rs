use test_strategy::proptest;

use super::*;
use crate::operand::{AccessMode, Kind, PointerRegister, Transform};

fn encode(mnemonic: &str, operands: [Value; 2], next_address: i64) -> Vec<u16> {
    let m = catalog()
        .get(mnemonic)
        .unwrap_or_else(|| panic!("{mnemonic} should be in the catalog"));
    match m.matching(&operands, next_address).as_slice() {
        [(variant, fitted)] => variant.encode(*fitted),
        other => panic!(
            "expected exactly one variant of {mnemonic} to accept {} and {}, got {}",
            operands[0],
            operands[1],
            other.len()
        ),
    }
}

#[test]
fn built_in_catalog_is_valid() {
    let c = catalog();
    assert!(c.len() > 100);
    for m in c.iter() {
        assert!(m.words() == 1 || m.words() == 2, "{} has size {}", m.name(), m.words());
        for v in m.variants() {
            assert_eq!(v.template().words(), m.words());
        }
    }
}

#[test]
fn lookup_ignores_case() {
    assert_eq!(catalog().get("LDI").map(Mnemonic::name), Some("ldi"));
    assert!(catalog().get("frobnicate").is_none());
}

#[test]
fn known_encodings() {
    use PointerRegister::*;
    use Value::{Number, Register, RegisterPair};
    let none = || Value::None;

    assert_eq!(encode("nop", [none(), none()], 1), vec![0x0000]);
    assert_eq!(encode("ret", [none(), none()], 1), vec![0x9508]);
    assert_eq!(encode("jmp", [Number(0), none()], 2), vec![0x940C, 0x0000]);
    assert_eq!(encode("call", [Number(0x1234), none()], 2), vec![0x940E, 0x1234]);
    assert_eq!(encode("ldi", [Register(16), Number(0xFF)], 1), vec![0xEF0F]);
    assert_eq!(encode("ldi", [Register(31), Number(0x12)], 1), vec![0xE1F2]);
    assert_eq!(encode("ser", [Register(16), none()], 1), vec![0xEF0F]);
    assert_eq!(encode("cbr", [Register(16), Number(0)], 1), vec![0x7F0F]);
    assert_eq!(encode("mov", [Register(1), Register(2)], 1), vec![0x2C12]);
    assert_eq!(encode("clr", [Register(1), none()], 1), vec![0x2411]);
    assert_eq!(encode("lsl", [Register(31), none()], 1), vec![0x0FFF]);
    assert_eq!(encode("out", [Number(0x3F), Register(0)], 1), vec![0xBE0F]);
    assert_eq!(encode("in", [Register(24), Number(0x16)], 1), vec![0xB386]);
    assert_eq!(encode("sbi", [Number(5), Number(3)], 1), vec![0x9A2B]);
    assert_eq!(encode("adiw", [RegisterPair(24), Number(1)], 1), vec![0x9601]);
    assert_eq!(encode("sbiw", [RegisterPair(30), Number(63)], 1), vec![0x97FF]);
    assert_eq!(encode("movw", [RegisterPair(30), RegisterPair(24)], 1), vec![0x01FC]);
    assert_eq!(encode("mulsu", [Register(23), Register(16)], 1), vec![0x0370]);
    assert_eq!(encode("push", [Register(28), none()], 1), vec![0x93CF]);
    assert_eq!(encode("sei", [none(), none()], 1), vec![0x9478]);
    assert_eq!(
        encode("ld", [Register(0), Value::pointer(X, AccessMode::PostIncrement)], 1),
        vec![0x900D]
    );
    assert_eq!(
        encode("st", [Value::pointer(Z, AccessMode::Direct), Register(1)], 1),
        vec![0x8210]
    );
    assert_eq!(
        encode("ldd", [Register(24), Value::displaced(Y, 63)], 1),
        vec![0xAD8F]
    );
    assert_eq!(
        encode("std", [Value::displaced(Z, 1), Register(0)], 1),
        vec![0x8201]
    );
    assert_eq!(
        encode("lpm", [Register(0), Value::pointer(Z, AccessMode::PostIncrement)], 1),
        vec![0x9005]
    );
    assert_eq!(encode("lds", [Register(16), Number(0x0100)], 2), vec![0x9100, 0x0100]);
    assert_eq!(encode("sts", [Number(0x0100), Register(16)], 2), vec![0x9300, 0x0100]);
}

#[test]
fn relative_jumps() {
    // rjmp to itself at address 0: the next address is 1, so the
    // offset is -1.
    assert_eq!(encode("rjmp", [Value::Number(0), Value::None], 1), vec![0xCFFF]);
    // rjmp to the next instruction is a zero offset.
    assert_eq!(encode("rjmp", [Value::Number(1), Value::None], 1), vec![0xC000]);
    assert_eq!(encode("rcall", [Value::Number(101), Value::None], 1), vec![0xD064]);
    // brne back to itself at address 4.
    assert_eq!(encode("brne", [Value::Number(4), Value::None], 5), vec![0xF7F9]);
    assert_eq!(
        encode("brbs", [Value::Number(1), Value::Number(10)], 1),
        vec![0xF049]
    );
}

#[test]
fn out_of_range_operands_are_rejected() {
    let ldi = catalog().get("ldi").expect("ldi should exist");
    assert!(ldi
        .matching(&[Value::Register(15), Value::Number(0)], 1)
        .is_empty());
    assert!(ldi
        .matching(&[Value::Register(16), Value::Number(256)], 1)
        .is_empty());
    let mulsu = catalog().get("mulsu").expect("mulsu should exist");
    assert!(mulsu
        .matching(&[Value::Register(30), Value::Register(16)], 1)
        .is_empty());
    let brne = catalog().get("brne").expect("brne should exist");
    assert!(brne.matching(&[Value::Number(65), Value::None], 1).is_empty());
    assert_eq!(brne.matching(&[Value::Number(64), Value::None], 1).len(), 1);
}

fn sample_values() -> Vec<Value> {
    let mut values = vec![Value::None];
    values.extend((0..=31).map(Value::Register));
    values.extend((0..=30).step_by(2).map(Value::RegisterPair));
    for register in [PointerRegister::X, PointerRegister::Y, PointerRegister::Z] {
        for mode in [
            AccessMode::Direct,
            AccessMode::PostIncrement,
            AccessMode::PreDecrement,
        ] {
            values.push(Value::pointer(register, mode));
        }
        values.push(Value::displaced(register, 0));
        values.push(Value::displaced(register, 63));
    }
    values.extend(
        [
            -2049, -2048, -65, -64, -1, 0, 1, 7, 8, 15, 16, 31, 32, 63, 64, 255, 256, 2047, 2048,
            0xFFFF, 0x1_0000, 0x3F_FFFF, 0x40_0000,
        ]
        .into_iter()
        .map(Value::Number),
    );
    values
}

#[test]
fn variants_do_not_overlap() {
    let values = sample_values();
    for m in catalog().iter() {
        for first in &values {
            for second in &values {
                let operands = [first.clone(), second.clone()];
                let n = m.matching(&operands, 0).len();
                assert!(
                    n <= 1,
                    "{n} variants of {} accept {first} and {second}",
                    m.name()
                );
            }
        }
    }
}

/// Choose a value which `spec` accepts, using `r` as the source of
/// randomness.
fn acceptable_value(spec: &OperandSpec, r: u64) -> Value {
    let (low, high) = spec.bounds.unwrap_or((0, 0));
    let span = u64::try_from(high - low).expect("bounds should be ordered") + 1;
    let pick = |step: u64| -> i64 {
        let steps = (span - 1) / step + 1;
        low + i64::try_from((r % steps) * step).expect("offset should fit")
    };
    let as_u8 = |n: i64| u8::try_from(n).expect("register numbers are small");
    match spec.kind {
        Kind::None => Value::None,
        Kind::Register => Value::Register(as_u8(pick(1))),
        Kind::RegisterPair => Value::RegisterPair(as_u8(pick(2))),
        Kind::Pointer(register, AccessMode::Displaced) => {
            Value::displaced(register, as_u8(pick(1)))
        }
        Kind::Pointer(register, mode) => Value::pointer(register, mode),
        Kind::Number => Value::Number(pick(1)),
    }
}

#[proptest]
fn encoding_can_be_decoded(#[strategy(0usize..100_000)] pick: usize, r0: u64, r1: u64) {
    let variants: Vec<&Variant> = catalog().iter().flat_map(|m| m.variants()).collect();
    let variant = variants[pick % variants.len()];
    let values = [
        acceptable_value(&variant.operands()[0], r0),
        acceptable_value(&variant.operands()[1], r1),
    ];
    let fitted = variant
        .fit(&values, 0)
        .unwrap_or_else(|| panic!("variant {variant:?} should accept {values:?}"));
    let words = variant.encode(fitted);
    let template = variant.template();
    let truncate = |n: i64, operand: usize| -> u64 {
        let width = template.width(operand);
        let bits = u64::from_ne_bytes(n.to_ne_bytes());
        if width == 0 {
            0
        } else {
            bits & ((1_u64 << width) - 1)
        }
    };
    assert_eq!(
        template.unpack(&words),
        Some([truncate(fitted[0], 0), truncate(fitted[1], 1)])
    );
}

const NUMBER: OperandSpec = OperandSpec::of(Kind::Number).within(0, 15);

const fn single(template: &'static str, first: SlotDef) -> VariantDef {
    VariantDef {
        template,
        operands: [first, NOTHING],
    }
}

static DUPLICATED: &[MnemonicDef] = &[
    MnemonicDef {
        name: "x",
        variants: &[single("0000 0000 0000 0000", NOTHING)],
    },
    MnemonicDef {
        name: "x",
        variants: &[single("0000 0000 0000 0001", NOTHING)],
    },
];

static EMPTY: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[],
}];

static MIXED_SIZES: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[
        single("0000 0000 0000 0000", NOTHING),
        single("0000 0000 0000 kkkk 0000 0000 0000 0000", slot("k", NUMBER)),
    ],
}];

static TOO_NARROW: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[single("0000 0000 0000 0kkk", slot("k", NUMBER))],
}];

static NO_PLACEHOLDERS: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[single("0000 0000 0000 0000", slot("", NUMBER))],
}];

static UNBOUNDED: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[single(
        "0000 0000 0000 kkkk",
        slot("k", OperandSpec::of(Kind::Number)),
    )],
}];

static UNBOUND_LETTER: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[single("0000 0000 0000 kkkk", NOTHING)],
}];

static BIASED: &[MnemonicDef] = &[MnemonicDef {
    name: "x",
    variants: &[single(
        "0000 0000 0000 kkkk",
        slot(
            "k",
            OperandSpec::of(Kind::Register)
                .within(16, 31)
                .then(Transform::Bias(16)),
        ),
    )],
}];

#[test]
fn defective_catalogs_are_rejected() {
    let build = |defs: &[MnemonicDef]| Catalog::build(defs).map(|_| ());

    assert_eq!(
        build(DUPLICATED),
        Err(CatalogError::DuplicateMnemonic("x"))
    );
    assert_eq!(build(EMPTY), Err(CatalogError::NoVariants("x")));
    assert_eq!(build(MIXED_SIZES), Err(CatalogError::MixedSizes("x")));
    assert_eq!(
        build(TOO_NARROW),
        Err(CatalogError::TooNarrow {
            mnemonic: "x",
            variant: 0,
            operand: 0,
            width: 3
        })
    );
    assert_eq!(
        build(NO_PLACEHOLDERS),
        Err(CatalogError::PlaceholderMismatch {
            mnemonic: "x",
            variant: 0,
            operand: 0
        })
    );
    assert_eq!(
        build(UNBOUNDED),
        Err(CatalogError::MissingBounds {
            mnemonic: "x",
            variant: 0,
            operand: 0
        })
    );
    assert!(matches!(
        build(UNBOUND_LETTER),
        Err(CatalogError::BadTemplate { .. })
    ));
    // The bias brings r16..r31 down to four bits.
    assert_eq!(build(BIASED), Ok(()));
}
