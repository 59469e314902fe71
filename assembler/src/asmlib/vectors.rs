//! The interrupt vector table which is placed in front of the program.
//!
//! Each vector is a `jmp`.  The reset vector jumps to `RESET`; all the
//! others jump to `__bad_interrupt`, which restarts the program by
//! jumping back to the start of the table.  `RESET` is weakly defined
//! as `__bad_interrupt`, so a program which defines its own `RESET`
//! label gets control on reset, and one which doesn't just loops.
use std::sync::Arc;

use base::prelude::{catalog, Value};

use super::ast::{Instruction, Statement, Strength};
use super::source::{Location, WithLocation};

/// The number of interrupt vectors, including the reset vector.
pub(crate) const VECTOR_COUNT: usize = 26;

/// The name used in the locations of the generated statements.
pub(crate) const VECTOR_TABLE_SOURCE: &str = "<vector table>";

pub(crate) const TABLE_LABEL: &str = "__vectors";
pub(crate) const BAD_INTERRUPT_LABEL: &str = "__bad_interrupt";
pub(crate) const RESET_LABEL: &str = "RESET";

fn label(name: &str, strength: Strength) -> Statement {
    Statement::Label {
        name: name.to_string(),
        strength,
    }
}

fn jmp(target: &str) -> Statement {
    let Some(mnemonic) = catalog().get("jmp") else {
        panic!("the instruction catalog has no jmp instruction");
    };
    Statement::Instruction(Instruction {
        mnemonic,
        operands: [Value::Identifier(target.to_string()), Value::None],
    })
}

/// Generate the vector table.  Each statement gets its own line
/// number within the table.
pub(crate) fn vector_table() -> Vec<WithLocation<Statement>> {
    let source: Arc<str> = Arc::from(VECTOR_TABLE_SOURCE);
    let mut statements = vec![label(TABLE_LABEL, Strength::Strong), jmp(RESET_LABEL)];
    statements.extend((1..VECTOR_COUNT).map(|_| jmp(BAD_INTERRUPT_LABEL)));
    statements.push(label(BAD_INTERRUPT_LABEL, Strength::Strong));
    statements.push(label(RESET_LABEL, Strength::Weak));
    statements.push(jmp(TABLE_LABEL));
    statements
        .into_iter()
        .enumerate()
        .map(|(i, statement)| WithLocation::new(statement, Location::new(&source, i + 1)))
        .collect()
}
