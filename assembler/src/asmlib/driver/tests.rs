use base::prelude::Value;

use super::super::types::AssemblerFailure;
use super::super::vectors::VECTOR_COUNT;
use super::{assemble_source, assemble_sources, AssemblyOptions, Binary};

const NO_VECTORS: AssemblyOptions = AssemblyOptions {
    vector_table: false,
    list: false,
};

fn assemble_successfully(text: &str, options: &AssemblyOptions) -> Binary {
    match assemble_source("test.S", text, options) {
        Ok(binary) => binary,
        Err(e) => {
            panic!("failed to assemble: {e}");
        }
    }
}

#[test]
fn jump_to_self_without_vectors() {
    let binary = assemble_successfully("foo:\n    jmp foo\n", &NO_VECTORS);
    assert_eq!(binary.words(), vec![0x940C, 0x0000]);
    assert_eq!(binary.symbol("foo"), Some(&Value::Number(0)));
}

#[test]
fn empty_program_without_vectors_is_empty() {
    let binary = assemble_successfully("; nothing here\n", &NO_VECTORS);
    assert!(binary.words().is_empty());
    assert!(binary.instructions().is_empty());
}

#[test]
fn vector_table_is_prepended() {
    let binary = assemble_successfully("RESET:\n    rjmp RESET\n", &AssemblyOptions::default());
    let words = binary.words();
    let table_words = 2 * VECTOR_COUNT;
    let handler = u16::try_from(table_words).expect("small");
    let reset = handler + 2;
    // The reset vector goes to the program's RESET label, which
    // follows the bad interrupt handler.
    assert_eq!(&words[0..2], &[0x940C, reset]);
    for vector in 1..VECTOR_COUNT {
        assert_eq!(
            &words[2 * vector..2 * vector + 2],
            &[0x940C, handler],
            "vector {vector}"
        );
    }
    // The bad interrupt handler restarts at the vector table.
    assert_eq!(&words[table_words..table_words + 2], &[0x940C, 0x0000]);
    assert_eq!(&words[table_words + 2..], &[0xCFFF]);
}

#[test]
fn reset_defaults_to_the_bad_interrupt_handler() {
    let binary = assemble_successfully("    nop\n", &AssemblyOptions::default());
    let handler = u16::try_from(2 * VECTOR_COUNT).expect("small");
    assert_eq!(&binary.words()[0..2], &[0x940C, handler]);
}

#[test]
fn program_reset_can_come_before_other_code() {
    // The weak RESET from the vector table is replaced even though
    // the table comes first.
    let binary = assemble_successfully("    nop\nRESET:\n    ret\n", &AssemblyOptions::default());
    let reset = u16::try_from(2 * VECTOR_COUNT + 3).expect("small");
    assert_eq!(&binary.words()[0..2], &[0x940C, reset]);
}

#[test]
fn duplicate_reset_is_an_error() {
    match assemble_source(
        "test.S",
        "RESET:\n    nop\nRESET:\n",
        &AssemblyOptions::default(),
    ) {
        Err(AssemblerFailure::Redefinition { name, location, .. }) => {
            assert_eq!(name, "RESET");
            assert_eq!(location.source(), "test.S");
            assert_eq!(location.line(), 3);
        }
        other => {
            panic!("expected a redefinition error, got {other:?}");
        }
    }
}

#[test]
fn several_sources_behave_like_one() {
    let first = concat!(
        ".equ LED = 5\n",
        "RESET:\n",
        "    sbi 4, LED\n",
        "loop:\n",
        "    rcall toggle\n",
        "    rjmp loop\n",
    );
    let second = concat!(
        "toggle:\n",
        "    sbi 3, LED\n",
        "    ret\n",
    );
    let joined = format!("{first}{second}");
    for options in [NO_VECTORS, AssemblyOptions::default()] {
        let separate = assemble_sources(&[("main.S", first), ("toggle.S", second)], &options)
            .expect("separate sources should assemble");
        let together = assemble_source("all.S", &joined, &options)
            .expect("joined source should assemble");
        assert_eq!(separate.words(), together.words());
    }
}

#[test]
fn errors_name_the_right_source() {
    match assemble_sources(
        &[("one.S", "a:\n    nop\n"), ("two.S", "    nop\n    rjmp b\n")],
        &NO_VECTORS,
    ) {
        Err(AssemblerFailure::UnknownSymbol { location, name }) => {
            assert_eq!(name, "b");
            assert_eq!(location.source(), "two.S");
            assert_eq!(location.line(), 2);
        }
        other => {
            panic!("expected an unknown symbol error, got {other:?}");
        }
    }
}

#[test]
fn definitions_conflict_across_sources() {
    assert!(matches!(
        assemble_sources(
            &[("one.S", "x:\n    nop\n"), ("two.S", ".equ x = 3\n")],
            &NO_VECTORS,
        ),
        Err(AssemblerFailure::Redefinition { .. })
    ));
}

#[test]
fn listing_includes_the_vector_table() {
    let binary = assemble_successfully("RESET:\n    ret\n", &AssemblyOptions::default());
    let listing = binary.listing().to_string();
    assert!(listing.contains("<vector table>:2"), "{listing}");
    assert!(listing.contains("__bad_interrupt"), "{listing}");
    assert!(listing.contains("test.S:2"), "{listing}");
}
