//! Encodings of the AVR instruction set.
//!
//! Templates use the letters of the Atmel AVR Instruction Set Manual
//! (`d` destination register, `r` source register, `K` constant, `k`
//! address, `A` I/O address, `b` bit number, `s` status register bit,
//! `q` displacement).  Which operand a letter belongs to is given by
//! the slot it is listed in.
//!
//! Register numbers, addresses and relative offsets are in words, as
//! the hardware counts them.

use super::{slot, MnemonicDef, SlotDef, VariantDef, NOTHING};
use crate::operand::{AccessMode, Kind, OperandSpec, PointerRegister, Transform};
use AccessMode::{Direct, PostIncrement, PreDecrement};
use PointerRegister::{X, Y, Z};

macro_rules! mnemonic {
    ($name:literal: $([$template:literal, $first:expr, $second:expr]),+ $(,)?) => {
        MnemonicDef {
            name: $name,
            variants: &[$(VariantDef {
                template: $template,
                operands: [$first, $second],
            }),+],
        }
    };
}

const REGISTER: OperandSpec = OperandSpec::of(Kind::Register).within(0, 31);
/// r16..r31, for the instructions which take an immediate operand.
const UPPER_REGISTER: OperandSpec = OperandSpec::of(Kind::Register)
    .within(16, 31)
    .then(Transform::Bias(16));
/// r16..r23, for the signed/fractional multiplies.
const MULTIPLY_REGISTER: OperandSpec = OperandSpec::of(Kind::Register)
    .within(16, 23)
    .then(Transform::Bias(16));
const ANY_PAIR: OperandSpec = OperandSpec::of(Kind::RegisterPair)
    .within(0, 30)
    .then(Transform::Pair { base: 0 });
/// r25:r24, r27:r26 (X), r29:r28 (Y) and r31:r30 (Z).
const WORD_PAIR: OperandSpec = OperandSpec::of(Kind::RegisterPair)
    .within(24, 30)
    .then(Transform::Pair { base: 24 });

const BYTE: OperandSpec = OperandSpec::of(Kind::Number).within(0, 255);
const COMPLEMENTED_BYTE: OperandSpec = OperandSpec::of(Kind::Number)
    .within(0, 255)
    .then(Transform::Invert);
const WORD_IMMEDIATE: OperandSpec = OperandSpec::of(Kind::Number).within(0, 63);
const BIT: OperandSpec = OperandSpec::of(Kind::Number).within(0, 7);
const DES_ROUND: OperandSpec = OperandSpec::of(Kind::Number).within(0, 15);
/// I/O addresses reachable by the bit instructions.
const LOW_IO: OperandSpec = OperandSpec::of(Kind::Number).within(0, 31);
const IO: OperandSpec = OperandSpec::of(Kind::Number).within(0, 63);
const DATA_ADDRESS: OperandSpec = OperandSpec::of(Kind::Number).within(0, 0xFFFF);
const PROGRAM_ADDRESS: OperandSpec = OperandSpec::of(Kind::Number).within(0, 0x3F_FFFF);
const LONG_OFFSET: OperandSpec = OperandSpec::of(Kind::Number)
    .within(-2048, 2047)
    .then(Transform::Wrap16)
    .relative();
const SHORT_OFFSET: OperandSpec = OperandSpec::of(Kind::Number)
    .within(-64, 63)
    .then(Transform::Wrap16)
    .relative();

const fn pointer(register: PointerRegister, mode: AccessMode) -> SlotDef {
    slot("", OperandSpec::of(Kind::Pointer(register, mode)))
}

const fn displaced(register: PointerRegister) -> SlotDef {
    slot(
        "q",
        OperandSpec::of(Kind::Pointer(register, AccessMode::Displaced)).within(0, 63),
    )
}

pub(super) static MNEMONICS: &[MnemonicDef] = &[
    // Arithmetic and logic, register to register.
    mnemonic!("add": ["0000 11rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("adc": ["0001 11rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("sub": ["0001 10rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("sbc": ["0000 10rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("and": ["0010 00rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("or": ["0010 10rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("eor": ["0010 01rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("cp": ["0001 01rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("cpc": ["0000 01rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("cpse": ["0001 00rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("mov": ["0010 11rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    mnemonic!("mul": ["1001 11rd dddd rrrr", slot("d", REGISTER), slot("r", REGISTER)]),
    // The same operations applied to a register and itself.
    mnemonic!("lsl": ["0000 11rd dddd rrrr", slot("dr", REGISTER), NOTHING]),
    mnemonic!("rol": ["0001 11rd dddd rrrr", slot("dr", REGISTER), NOTHING]),
    mnemonic!("tst": ["0010 00rd dddd rrrr", slot("dr", REGISTER), NOTHING]),
    mnemonic!("clr": ["0010 01rd dddd rrrr", slot("dr", REGISTER), NOTHING]),
    // Immediate operands.
    mnemonic!("cpi": ["0011 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("sbci": ["0100 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("subi": ["0101 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("ori": ["0110 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("sbr": ["0110 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("andi": ["0111 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("cbr": [
        "0111 KKKK dddd KKKK",
        slot("d", UPPER_REGISTER),
        slot("K", COMPLEMENTED_BYTE)
    ]),
    mnemonic!("ldi": ["1110 KKKK dddd KKKK", slot("d", UPPER_REGISTER), slot("K", BYTE)]),
    mnemonic!("ser": ["1110 1111 dddd 1111", slot("d", UPPER_REGISTER), NOTHING]),
    // Word arithmetic and moves.
    mnemonic!("adiw": ["1001 0110 KKdd KKKK", slot("d", WORD_PAIR), slot("K", WORD_IMMEDIATE)]),
    mnemonic!("sbiw": ["1001 0111 KKdd KKKK", slot("d", WORD_PAIR), slot("K", WORD_IMMEDIATE)]),
    mnemonic!("movw": ["0000 0001 dddd rrrr", slot("d", ANY_PAIR), slot("r", ANY_PAIR)]),
    // Multiplication.
    mnemonic!("muls": ["0000 0010 dddd rrrr", slot("d", UPPER_REGISTER), slot("r", UPPER_REGISTER)]),
    mnemonic!("mulsu": [
        "0000 0011 0ddd 0rrr",
        slot("d", MULTIPLY_REGISTER),
        slot("r", MULTIPLY_REGISTER)
    ]),
    mnemonic!("fmul": [
        "0000 0011 0ddd 1rrr",
        slot("d", MULTIPLY_REGISTER),
        slot("r", MULTIPLY_REGISTER)
    ]),
    mnemonic!("fmuls": [
        "0000 0011 1ddd 0rrr",
        slot("d", MULTIPLY_REGISTER),
        slot("r", MULTIPLY_REGISTER)
    ]),
    mnemonic!("fmulsu": [
        "0000 0011 1ddd 1rrr",
        slot("d", MULTIPLY_REGISTER),
        slot("r", MULTIPLY_REGISTER)
    ]),
    // Single register.
    mnemonic!("com": ["1001 010d dddd 0000", slot("d", REGISTER), NOTHING]),
    mnemonic!("neg": ["1001 010d dddd 0001", slot("d", REGISTER), NOTHING]),
    mnemonic!("swap": ["1001 010d dddd 0010", slot("d", REGISTER), NOTHING]),
    mnemonic!("inc": ["1001 010d dddd 0011", slot("d", REGISTER), NOTHING]),
    mnemonic!("asr": ["1001 010d dddd 0101", slot("d", REGISTER), NOTHING]),
    mnemonic!("lsr": ["1001 010d dddd 0110", slot("d", REGISTER), NOTHING]),
    mnemonic!("ror": ["1001 010d dddd 0111", slot("d", REGISTER), NOTHING]),
    mnemonic!("dec": ["1001 010d dddd 1010", slot("d", REGISTER), NOTHING]),
    mnemonic!("push": ["1001 001d dddd 1111", slot("d", REGISTER), NOTHING]),
    mnemonic!("pop": ["1001 000d dddd 1111", slot("d", REGISTER), NOTHING]),
    // Jumps, calls and returns.
    mnemonic!("rjmp": ["1100 kkkk kkkk kkkk", slot("k", LONG_OFFSET), NOTHING]),
    mnemonic!("rcall": ["1101 kkkk kkkk kkkk", slot("k", LONG_OFFSET), NOTHING]),
    mnemonic!("jmp": [
        "1001 010k kkkk 110k kkkk kkkk kkkk kkkk",
        slot("k", PROGRAM_ADDRESS),
        NOTHING
    ]),
    mnemonic!("call": [
        "1001 010k kkkk 111k kkkk kkkk kkkk kkkk",
        slot("k", PROGRAM_ADDRESS),
        NOTHING
    ]),
    mnemonic!("ijmp": ["1001 0100 0000 1001", NOTHING, NOTHING]),
    mnemonic!("icall": ["1001 0101 0000 1001", NOTHING, NOTHING]),
    mnemonic!("eijmp": ["1001 0100 0001 1001", NOTHING, NOTHING]),
    mnemonic!("eicall": ["1001 0101 0001 1001", NOTHING, NOTHING]),
    mnemonic!("ret": ["1001 0101 0000 1000", NOTHING, NOTHING]),
    mnemonic!("reti": ["1001 0101 0001 1000", NOTHING, NOTHING]),
    // Conditional branches.
    mnemonic!("brbs": ["1111 00kk kkkk ksss", slot("s", BIT), slot("k", SHORT_OFFSET)]),
    mnemonic!("brbc": ["1111 01kk kkkk ksss", slot("s", BIT), slot("k", SHORT_OFFSET)]),
    mnemonic!("brcs": ["1111 00kk kkkk k000", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brlo": ["1111 00kk kkkk k000", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brcc": ["1111 01kk kkkk k000", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brsh": ["1111 01kk kkkk k000", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("breq": ["1111 00kk kkkk k001", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brne": ["1111 01kk kkkk k001", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brmi": ["1111 00kk kkkk k010", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brpl": ["1111 01kk kkkk k010", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brvs": ["1111 00kk kkkk k011", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brvc": ["1111 01kk kkkk k011", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brlt": ["1111 00kk kkkk k100", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brge": ["1111 01kk kkkk k100", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brhs": ["1111 00kk kkkk k101", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brhc": ["1111 01kk kkkk k101", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brts": ["1111 00kk kkkk k110", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brtc": ["1111 01kk kkkk k110", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brie": ["1111 00kk kkkk k111", slot("k", SHORT_OFFSET), NOTHING]),
    mnemonic!("brid": ["1111 01kk kkkk k111", slot("k", SHORT_OFFSET), NOTHING]),
    // Skips and bit operations.
    mnemonic!("sbrc": ["1111 110r rrrr 0bbb", slot("r", REGISTER), slot("b", BIT)]),
    mnemonic!("sbrs": ["1111 111r rrrr 0bbb", slot("r", REGISTER), slot("b", BIT)]),
    mnemonic!("sbic": ["1001 1001 AAAA Abbb", slot("A", LOW_IO), slot("b", BIT)]),
    mnemonic!("sbis": ["1001 1011 AAAA Abbb", slot("A", LOW_IO), slot("b", BIT)]),
    mnemonic!("sbi": ["1001 1010 AAAA Abbb", slot("A", LOW_IO), slot("b", BIT)]),
    mnemonic!("cbi": ["1001 1000 AAAA Abbb", slot("A", LOW_IO), slot("b", BIT)]),
    mnemonic!("bst": ["1111 101d dddd 0bbb", slot("d", REGISTER), slot("b", BIT)]),
    mnemonic!("bld": ["1111 100d dddd 0bbb", slot("d", REGISTER), slot("b", BIT)]),
    mnemonic!("bset": ["1001 0100 0sss 1000", slot("s", BIT), NOTHING]),
    mnemonic!("bclr": ["1001 0100 1sss 1000", slot("s", BIT), NOTHING]),
    // Status register flags.
    mnemonic!("sec": ["1001 0100 0000 1000", NOTHING, NOTHING]),
    mnemonic!("clc": ["1001 0100 1000 1000", NOTHING, NOTHING]),
    mnemonic!("sez": ["1001 0100 0001 1000", NOTHING, NOTHING]),
    mnemonic!("clz": ["1001 0100 1001 1000", NOTHING, NOTHING]),
    mnemonic!("sen": ["1001 0100 0010 1000", NOTHING, NOTHING]),
    mnemonic!("cln": ["1001 0100 1010 1000", NOTHING, NOTHING]),
    mnemonic!("sev": ["1001 0100 0011 1000", NOTHING, NOTHING]),
    mnemonic!("clv": ["1001 0100 1011 1000", NOTHING, NOTHING]),
    mnemonic!("ses": ["1001 0100 0100 1000", NOTHING, NOTHING]),
    mnemonic!("cls": ["1001 0100 1100 1000", NOTHING, NOTHING]),
    mnemonic!("seh": ["1001 0100 0101 1000", NOTHING, NOTHING]),
    mnemonic!("clh": ["1001 0100 1101 1000", NOTHING, NOTHING]),
    mnemonic!("set": ["1001 0100 0110 1000", NOTHING, NOTHING]),
    mnemonic!("clt": ["1001 0100 1110 1000", NOTHING, NOTHING]),
    mnemonic!("sei": ["1001 0100 0111 1000", NOTHING, NOTHING]),
    mnemonic!("cli": ["1001 0100 1111 1000", NOTHING, NOTHING]),
    // I/O.
    mnemonic!("in": ["1011 0AAd dddd AAAA", slot("d", REGISTER), slot("A", IO)]),
    mnemonic!("out": ["1011 1AAr rrrr AAAA", slot("A", IO), slot("r", REGISTER)]),
    // Loads.
    mnemonic!("ld":
        ["1001 000d dddd 1100", slot("d", REGISTER), pointer(X, Direct)],
        ["1001 000d dddd 1101", slot("d", REGISTER), pointer(X, PostIncrement)],
        ["1001 000d dddd 1110", slot("d", REGISTER), pointer(X, PreDecrement)],
        ["1000 000d dddd 1000", slot("d", REGISTER), pointer(Y, Direct)],
        ["1001 000d dddd 1001", slot("d", REGISTER), pointer(Y, PostIncrement)],
        ["1001 000d dddd 1010", slot("d", REGISTER), pointer(Y, PreDecrement)],
        ["1000 000d dddd 0000", slot("d", REGISTER), pointer(Z, Direct)],
        ["1001 000d dddd 0001", slot("d", REGISTER), pointer(Z, PostIncrement)],
        ["1001 000d dddd 0010", slot("d", REGISTER), pointer(Z, PreDecrement)],
    ),
    mnemonic!("ldd":
        ["10q0 qq0d dddd 1qqq", slot("d", REGISTER), displaced(Y)],
        ["10q0 qq0d dddd 0qqq", slot("d", REGISTER), displaced(Z)],
    ),
    mnemonic!("lds": [
        "1001 000d dddd 0000 kkkk kkkk kkkk kkkk",
        slot("d", REGISTER),
        slot("k", DATA_ADDRESS)
    ]),
    mnemonic!("lpm":
        ["1001 0101 1100 1000", NOTHING, NOTHING],
        ["1001 000d dddd 0100", slot("d", REGISTER), pointer(Z, Direct)],
        ["1001 000d dddd 0101", slot("d", REGISTER), pointer(Z, PostIncrement)],
    ),
    mnemonic!("elpm":
        ["1001 0101 1101 1000", NOTHING, NOTHING],
        ["1001 000d dddd 0110", slot("d", REGISTER), pointer(Z, Direct)],
        ["1001 000d dddd 0111", slot("d", REGISTER), pointer(Z, PostIncrement)],
    ),
    // Stores.
    mnemonic!("st":
        ["1001 001r rrrr 1100", pointer(X, Direct), slot("r", REGISTER)],
        ["1001 001r rrrr 1101", pointer(X, PostIncrement), slot("r", REGISTER)],
        ["1001 001r rrrr 1110", pointer(X, PreDecrement), slot("r", REGISTER)],
        ["1000 001r rrrr 1000", pointer(Y, Direct), slot("r", REGISTER)],
        ["1001 001r rrrr 1001", pointer(Y, PostIncrement), slot("r", REGISTER)],
        ["1001 001r rrrr 1010", pointer(Y, PreDecrement), slot("r", REGISTER)],
        ["1000 001r rrrr 0000", pointer(Z, Direct), slot("r", REGISTER)],
        ["1001 001r rrrr 0001", pointer(Z, PostIncrement), slot("r", REGISTER)],
        ["1001 001r rrrr 0010", pointer(Z, PreDecrement), slot("r", REGISTER)],
    ),
    mnemonic!("std":
        ["10q0 qq1r rrrr 1qqq", displaced(Y), slot("r", REGISTER)],
        ["10q0 qq1r rrrr 0qqq", displaced(Z), slot("r", REGISTER)],
    ),
    mnemonic!("sts": [
        "1001 001r rrrr 0000 kkkk kkkk kkkk kkkk",
        slot("k", DATA_ADDRESS),
        slot("r", REGISTER)
    ]),
    // Read-modify-write through Z.
    mnemonic!("xch": ["1001 001r rrrr 0100", pointer(Z, Direct), slot("r", REGISTER)]),
    mnemonic!("las": ["1001 001r rrrr 0101", pointer(Z, Direct), slot("r", REGISTER)]),
    mnemonic!("lac": ["1001 001r rrrr 0110", pointer(Z, Direct), slot("r", REGISTER)]),
    mnemonic!("lat": ["1001 001r rrrr 0111", pointer(Z, Direct), slot("r", REGISTER)]),
    // Control.
    mnemonic!("nop": ["0000 0000 0000 0000", NOTHING, NOTHING]),
    mnemonic!("sleep": ["1001 0101 1000 1000", NOTHING, NOTHING]),
    mnemonic!("break": ["1001 0101 1001 1000", NOTHING, NOTHING]),
    mnemonic!("wdr": ["1001 0101 1010 1000", NOTHING, NOTHING]),
    mnemonic!("spm": ["1001 0101 1110 1000", NOTHING, NOTHING]),
    mnemonic!("des": ["1001 0100 KKKK 1011", slot("K", DES_ROUND), NOTHING]),
];
