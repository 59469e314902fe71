//! The fix pass: resolve the operands of each instruction, choose the
//! variant which encodes them and pack the instruction words.
use tracing::{event, Level};

use base::prelude::Value;

use super::ast::{Address, Instruction, Statement};
use super::source::{Location, WithLocation};
use super::symtab::SymbolTable;
use super::types::AssemblerFailure;

/// One assembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInstruction {
    address: Address,
    words: Vec<u16>,
    location: Location,
    mnemonic: &'static str,
    operands: [Value; 2],
}

impl EncodedInstruction {
    /// The word address at which the instruction is placed.
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    /// The operands after symbols have been resolved.
    #[must_use]
    pub fn operands(&self) -> &[Value; 2] {
        &self.operands
    }
}

fn encode(
    instruction: &Instruction,
    address: Address,
    next_address: Address,
    symtab: &SymbolTable,
    location: &Location,
) -> Result<EncodedInstruction, AssemblerFailure> {
    let operands = [
        symtab.resolve(&instruction.operands[0], location)?,
        symtab.resolve(&instruction.operands[1], location)?,
    ];
    let mnemonic = instruction.mnemonic;
    let candidates = mnemonic.matching(&operands, i64::from(next_address));
    let words = match candidates.as_slice() {
        [(variant, fitted)] => variant.encode(*fitted),
        _ => {
            if candidates.len() > 1 {
                event!(
                    Level::DEBUG,
                    "{location}: {} variants of {} accept the operands",
                    candidates.len(),
                    mnemonic.name()
                );
            }
            return Err(AssemblerFailure::CannotEncode {
                location: location.clone(),
                mnemonic: mnemonic.name(),
                operands,
            });
        }
    };
    Ok(EncodedInstruction {
        address,
        words,
        location: location.clone(),
        mnemonic: mnemonic.name(),
        operands,
    })
}

/// Encode every instruction.  `symtab` is the result of the scan
/// pass over the same statements.
///
/// The address counter is advanced past each instruction before its
/// operands are fitted, so relative operands are measured from the
/// address of the following instruction.
pub(crate) fn link(
    statements: &[WithLocation<Statement>],
    symtab: &SymbolTable,
) -> Result<Vec<EncodedInstruction>, AssemblerFailure> {
    let mut output: Vec<EncodedInstruction> = Vec::new();
    let mut address: Address = 0;
    for WithLocation {
        inner: statement,
        location,
    } in statements
    {
        let Statement::Instruction(instruction) = statement else {
            continue;
        };
        let here = address;
        address = instruction.next_address(address, location)?;
        let encoded = encode(instruction, here, address, symtab, location)?;
        event!(
            Level::TRACE,
            "{location}: {here:#06x} {instruction} -> {:04X?}",
            encoded.words
        );
        output.push(encoded);
    }
    event!(
        Level::DEBUG,
        "fix pass encoded {} instructions in {address} words",
        output.len()
    );
    Ok(output)
}
