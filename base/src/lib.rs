//! The `base` crate defines the AVR-related things which are useful
//! to more than one tool: operand values, bit-pattern templates and
//! the instruction catalog.  The idea is that an assembler (or a
//! disassembler) depends on this crate, but the catalog itself knows
//! nothing about source files or symbols.

pub mod catalog;
pub mod operand;
pub mod prelude;
pub mod template;
