use std::fmt::{self, Display, Formatter};

use base::prelude::Value;

use super::linker::EncodedInstruction;
use super::symtab::SymbolTable;

/// An assembly listing: each instruction with its address and
/// encoding, followed by the symbol table.
pub(crate) struct Listing<'a> {
    pub(crate) instructions: &'a [EncodedInstruction],
    pub(crate) symbols: &'a SymbolTable,
}

struct ListingLine<'a>(&'a EncodedInstruction);

impl Display for ListingLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let insn = self.0;
        let words: Vec<String> = insn.words().iter().map(|w| format!("{w:04X}")).collect();
        write!(
            f,
            "{:06X}  {:<9}  {:<24} {}",
            insn.address(),
            words.join(" "),
            insn.location().to_string(),
            insn.mnemonic()
        )?;
        match insn.operands() {
            [Value::None, _] => Ok(()),
            [first, Value::None] => write!(f, " {first}"),
            [first, second] => write!(f, " {first}, {second}"),
        }
    }
}

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program:")?;
        for insn in self.instructions {
            writeln!(f, "{}", ListingLine(insn))?;
        }
        writeln!(f)?;
        writeln!(f, "Symbol Table:")?;
        write!(f, "{}", self.symbols)
    }
}
