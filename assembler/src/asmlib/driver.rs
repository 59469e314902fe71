//! Assembling whole programs: parsing every input, running the scan
//! and fix passes, and writing the result.
use std::ffi::OsStr;
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{event, Level};

use base::prelude::Value;

use super::ast::Statement;
use super::linker::{link, EncodedInstruction};
use super::listing::Listing;
use super::parser::parse_source;
use super::source::WithLocation;
use super::symtab::{scan, SymbolTable};
use super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};
use super::vectors::vector_table;

mod output;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Place the interrupt vector table in front of the program.
    pub vector_table: bool,
    /// Print a listing on standard output once assembly succeeds.
    pub list: bool,
}

impl Default for AssemblyOptions {
    fn default() -> AssemblyOptions {
        AssemblyOptions {
            vector_table: true,
            list: false,
        }
    }
}

/// The result of assembling a program.
#[derive(Debug, Clone)]
pub struct Binary {
    instructions: Vec<EncodedInstruction>,
    symbols: SymbolTable,
}

impl Binary {
    /// The program image: every instruction word, in address order,
    /// starting at address 0.
    #[must_use]
    pub fn words(&self) -> Vec<u16> {
        self.instructions
            .iter()
            .flat_map(|insn| insn.words().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn instructions(&self) -> &[EncodedInstruction] {
        &self.instructions
    }

    /// The final value of a symbol, as defined (that is, before any
    /// identifier in it is resolved).
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name).map(|def| &def.value)
    }

    /// An assembly listing of the program.
    #[must_use]
    pub fn listing(&self) -> impl Display + '_ {
        Listing {
            instructions: &self.instructions,
            symbols: &self.symbols,
        }
    }
}

fn assemble_statements(
    statements: &[WithLocation<Statement>],
) -> Result<Binary, AssemblerFailure> {
    let (symbols, size) = scan(statements)?;
    event!(
        Level::DEBUG,
        "scan pass complete: {} symbols, {size} words",
        symbols.len()
    );
    let instructions = link(statements, &symbols)?;
    Ok(Binary {
        instructions,
        symbols,
    })
}

/// Assemble several inputs as a single program.  The inputs are
/// concatenated in order (after the vector table, if there is one)
/// and share one address space and one symbol table.  Each input is
/// a name (used in error messages) and the source text.
///
/// # Errors
///
/// Returns the first error found.  See [`AssemblerFailure`].
pub fn assemble_sources(
    sources: &[(&str, &str)],
    options: &AssemblyOptions,
) -> Result<Binary, AssemblerFailure> {
    let mut statements: Vec<WithLocation<Statement>> = if options.vector_table {
        vector_table()
    } else {
        Vec::new()
    };
    for (name, text) in sources {
        let name: Arc<str> = Arc::from(*name);
        statements.extend(parse_source(&name, text)?);
    }
    assemble_statements(&statements)
}

/// Assemble one input.
///
/// # Errors
///
/// See [`assemble_sources`].
pub fn assemble_source(
    name: &str,
    text: &str,
    options: &AssemblyOptions,
) -> Result<Binary, AssemblerFailure> {
    assemble_sources(&[(name, text)], options)
}

fn read_source(path: &Path) -> Result<String, AssemblerFailure> {
    fs::read_to_string(path).map_err(|error| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            target: IoTarget::File(path.to_path_buf()),
            error,
        })
    })
}

fn print_listing(binary: &Binary) -> Result<(), AssemblerFailure> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", binary.listing())
        .and_then(|()| handle.flush())
        .map_err(|error| {
            AssemblerFailure::Io(IoFailed {
                action: IoAction::Write,
                target: IoTarget::Stdout,
                error,
            })
        })
}

/// Assemble the files `inputs` (as one program, see
/// [`assemble_sources`]) and write the program image to `output`.
///
/// All the inputs are read, and the program is assembled, before the
/// output file is created; if assembly fails, no output is written.
///
/// # Errors
///
/// Returns an error if an input cannot be read, the program cannot
/// be assembled or the output cannot be written.
pub fn assemble_files<P: AsRef<OsStr>>(
    inputs: &[P],
    output: &Path,
    options: &AssemblyOptions,
) -> Result<(), AssemblerFailure> {
    let paths: Vec<PathBuf> = inputs.iter().map(|p| PathBuf::from(p.as_ref())).collect();
    let texts: Vec<(String, String)> = paths
        .iter()
        .map(|path| -> Result<(String, String), AssemblerFailure> {
            Ok((path.display().to_string(), read_source(path)?))
        })
        .collect::<Result<_, AssemblerFailure>>()?;
    let sources: Vec<(&str, &str)> = texts
        .iter()
        .map(|(name, text)| (name.as_str(), text.as_str()))
        .collect();

    let binary = assemble_sources(&sources, options)?;
    let words = binary.words();
    output::write_program(output, &words)?;
    event!(
        Level::INFO,
        "wrote {} words to {}",
        words.len(),
        output.display()
    );
    if options.list {
        print_listing(&binary)?;
    }
    Ok(())
}
