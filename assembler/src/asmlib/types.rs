use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

use base::prelude::Value;

use super::ast::Strength;
use super::source::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoTarget {
    File(PathBuf),
    Stdout,
}

impl Display for IoTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            IoTarget::File(path) => write!(f, "file {}", path.display()),
            IoTarget::Stdout => f.write_str("standard output"),
        }
    }
}

#[derive(Debug)]
pub struct IoFailed {
    pub action: IoAction,
    pub target: IoTarget,
    pub error: IoError,
}

impl Display for IoFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let IoFailed {
            action,
            target,
            error,
        } = self;
        let verb = match action {
            IoAction::Read => "reading from",
            IoAction::Write => "writing to",
        };
        write!(f, "I/O error {verb} {target}: {error}")
    }
}

#[derive(Debug)]
pub enum AssemblerFailure {
    Io(IoFailed),
    /// The line is not a label, a definition, an instruction or a
    /// comment.  This includes instructions with an unknown mnemonic.
    SyntaxError {
        location: Location,
        msg: String,
    },
    /// An operand is not a register, index register, number or
    /// symbol name.
    BadExpression {
        location: Location,
        token: String,
    },
    UnknownSymbol {
        location: Location,
        name: String,
    },
    /// Two strong, or two weak, definitions of the same name.
    Redefinition {
        location: Location,
        name: String,
        strength: Strength,
        previous: Location,
    },
    /// Looking up a symbol led back to itself.  `chain` lists the
    /// names visited, ending with the repeated one.
    SymbolLoop {
        location: Location,
        chain: Vec<String>,
    },
    /// Either no variant of the mnemonic accepts the (resolved)
    /// operands, or more than one does.
    CannotEncode {
        location: Location,
        mnemonic: &'static str,
        operands: [Value; 2],
    },
    ProgramTooBig {
        location: Location,
    },
}

impl AssemblerFailure {
    /// The place in the source which the failure relates to, if
    /// there is one.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            AssemblerFailure::Io(_) => None,
            AssemblerFailure::SyntaxError { location, .. }
            | AssemblerFailure::BadExpression { location, .. }
            | AssemblerFailure::UnknownSymbol { location, .. }
            | AssemblerFailure::Redefinition { location, .. }
            | AssemblerFailure::SymbolLoop { location, .. }
            | AssemblerFailure::CannotEncode { location, .. }
            | AssemblerFailure::ProgramTooBig { location } => Some(location),
        }
    }
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AssemblerFailure::Io(io_failed) => io_failed.fmt(f),
            AssemblerFailure::SyntaxError { location, msg } => {
                write!(f, "{location}: syntax error: {msg}")
            }
            AssemblerFailure::BadExpression { location, token } => {
                write!(f, "{location}: '{token}' is not a valid operand")
            }
            AssemblerFailure::UnknownSymbol { location, name } => {
                write!(f, "{location}: symbol {name} is not defined")
            }
            AssemblerFailure::Redefinition {
                location,
                name,
                strength,
                previous,
            } => write!(
                f,
                "{location}: {strength} symbol {name} is already defined (at {previous})"
            ),
            AssemblerFailure::SymbolLoop { location, chain } => {
                write!(
                    f,
                    "{location}: symbol definitions form a loop: {}",
                    chain.join(" -> ")
                )
            }
            AssemblerFailure::CannotEncode {
                location,
                mnemonic,
                operands,
            } => {
                write!(f, "{location}: cannot encode {mnemonic}")?;
                match operands {
                    [Value::None, Value::None] => f.write_str(" without operands"),
                    [first, Value::None] => write!(f, " with operand {first}"),
                    [first, second] => write!(f, " with operands {first}, {second}"),
                }
            }
            AssemblerFailure::ProgramTooBig { location } => {
                write!(
                    f,
                    "{location}: program does not fit into program memory (0x{:X} words)",
                    super::ast::PROGRAM_WORDS
                )
            }
        }
    }
}

impl Error for AssemblerFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssemblerFailure::Io(IoFailed { error, .. }) => Some(error),
            _ => None,
        }
    }
}
