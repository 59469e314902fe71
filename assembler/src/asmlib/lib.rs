//! A two-pass assembler for the AVR microcontroller family.
//!
//! Source text is parsed into statements, the scan pass assigns
//! addresses and builds the symbol table, and the fix pass resolves
//! operands and chooses an encoding for each instruction from the
//! catalog in the `base` crate.
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::bool_to_int_with_if)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::pedantic)]

mod ast;
mod driver;
mod eval;
mod linker;
mod listing;
mod parser;
mod source;
mod symtab;
mod types;
mod vectors;

pub use ast::Strength;
pub use driver::*;
pub use linker::EncodedInstruction;
pub use source::Location;
pub use types::{AssemblerFailure, IoAction, IoFailed, IoTarget};
