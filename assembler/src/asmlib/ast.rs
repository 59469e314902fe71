//! Statements, as produced by the parser and consumed by both passes.
use std::fmt::{self, Display, Formatter};

use base::prelude::{Mnemonic, Value};

use super::source::Location;
use super::types::AssemblerFailure;

/// Word addresses in program memory.
pub(crate) type Address = u32;

/// The size of the program address space, in words (22-bit
/// addresses).
pub(crate) const PROGRAM_WORDS: Address = 0x40_0000;

/// Whether a definition may be overridden.
///
/// A weak definition supplies a default (for example the entry point
/// of the vector table).  A strong definition of the same name
/// replaces it, whichever comes first in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    Strong,
    Weak,
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Strong => "strong",
            Strength::Weak => "weak",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Instruction {
    pub(crate) mnemonic: &'static Mnemonic,
    pub(crate) operands: [Value; 2],
}

impl Instruction {
    /// The address following this instruction, when it is placed at
    /// `address`.  Both passes step their address counters through
    /// this function, so they always agree.
    pub(crate) fn next_address(
        &self,
        address: Address,
        location: &Location,
    ) -> Result<Address, AssemblerFailure> {
        Address::try_from(self.mnemonic.words())
            .ok()
            .and_then(|words| address.checked_add(words))
            .filter(|next| *next <= PROGRAM_WORDS)
            .ok_or_else(|| AssemblerFailure::ProgramTooBig {
                location: location.clone(),
            })
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic.name())?;
        match &self.operands {
            [Value::None, _] => Ok(()),
            [first, Value::None] => write!(f, " {first}"),
            [first, second] => write!(f, " {first}, {second}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    Label {
        name: String,
        strength: Strength,
    },
    Instruction(Instruction),
    /// `.equ name = value` (strong) or `.default name = value` (weak).
    Definition {
        name: String,
        value: Value,
        strength: Strength,
    },
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Label { name, .. } => write!(f, "{name}:"),
            Statement::Instruction(instruction) => write!(f, "    {instruction}"),
            Statement::Definition {
                name,
                value,
                strength: Strength::Strong,
            } => write!(f, ".equ {name} = {value}"),
            Statement::Definition {
                name,
                value,
                strength: Strength::Weak,
            } => write!(f, ".default {name} = {value}"),
        }
    }
}
