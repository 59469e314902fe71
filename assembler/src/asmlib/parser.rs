//! Turning lines of source text into statements.
//!
//! Each line is one of
//!
//! - `name:` (a label, starting in the first column),
//! - `.equ name = operand` or `.default name = operand`,
//! - an indented instruction: `mnemonic [operand[, operand]]`,
//! - nothing at all.
//!
//! A `;` starts a comment which runs to the end of the line.
use std::sync::Arc;

use tracing::{event, Level};

use base::prelude::{catalog, Value};

use super::ast::{Instruction, Statement, Strength};
use super::eval::evaluate;
use super::source::{LineNumber, Location, WithLocation};
use super::types::AssemblerFailure;

mod pattern;

use pattern::Pattern;

static BLANK: Pattern = Pattern::new("blank", r"^\s*$");
static LABEL: Pattern = Pattern::new("label", r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*):\s*$");
static DEFINITION: Pattern = Pattern::new(
    "definition",
    r"^\.(?P<directive>[A-Za-z]+)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?P<value>\S+)\s*$",
);
static INSTRUCTION: Pattern = Pattern::new(
    "instruction",
    r"^\s+(?P<mnemonic>[A-Za-z]+)(?:\s+(?P<operands>\S.*?))?\s*$",
);

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn syntax_error(location: &Location, msg: String) -> AssemblerFailure {
    AssemblerFailure::SyntaxError {
        location: location.clone(),
        msg,
    }
}

fn parse_operands(text: Option<&str>, location: &Location) -> Result<[Value; 2], AssemblerFailure> {
    let Some(text) = text else {
        return Ok([Value::None, Value::None]);
    };
    let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
    if tokens.iter().any(|t| t.is_empty()) {
        return Err(syntax_error(location, format!("missing operand in '{text}'")));
    }
    match tokens.as_slice() {
        [only] => Ok([evaluate(only, location)?, Value::None]),
        [first, second] => Ok([evaluate(first, location)?, evaluate(second, location)?]),
        _ => Err(syntax_error(
            location,
            format!("too many operands in '{text}' (an instruction has at most two)"),
        )),
    }
}

fn parse_definition(
    directive: &str,
    name: &str,
    value: &str,
    location: &Location,
) -> Result<Statement, AssemblerFailure> {
    let strength = match directive.to_ascii_lowercase().as_str() {
        "equ" => Strength::Strong,
        "default" => Strength::Weak,
        _ => {
            return Err(syntax_error(
                location,
                format!("unknown directive .{directive}"),
            ));
        }
    };
    Ok(Statement::Definition {
        name: name.to_string(),
        value: evaluate(value, location)?,
        strength,
    })
}

/// Parse one line.  Returns `None` for a line which is blank once any
/// comment has been removed.
pub(crate) fn parse_line(
    line: &str,
    location: &Location,
) -> Result<Option<Statement>, AssemblerFailure> {
    let line = strip_comment(line);
    if BLANK.is_match(line) {
        Ok(None)
    } else if let Some(cap) = LABEL.captures(line) {
        Ok(Some(Statement::Label {
            name: cap["name"].to_string(),
            strength: Strength::Strong,
        }))
    } else if let Some(cap) = DEFINITION.captures(line) {
        parse_definition(&cap["directive"], &cap["name"], &cap["value"], location).map(Some)
    } else if let Some(cap) = INSTRUCTION.captures(line) {
        let name = &cap["mnemonic"];
        let Some(mnemonic) = catalog().get(name) else {
            return Err(syntax_error(location, format!("unknown instruction {name}")));
        };
        let operands = parse_operands(cap.name("operands").map(|m| m.as_str()), location)?;
        Ok(Some(Statement::Instruction(Instruction {
            mnemonic,
            operands,
        })))
    } else {
        Err(syntax_error(
            location,
            format!("expected a label, a definition or an instruction: '{}'", line.trim()),
        ))
    }
}

/// Parse a whole input.  `name` identifies the input in locations.
pub(crate) fn parse_source(
    name: &Arc<str>,
    text: &str,
) -> Result<Vec<WithLocation<Statement>>, AssemblerFailure> {
    let mut statements = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line_number: LineNumber = line_number + 1;
        let location = Location::new(name, line_number);
        if let Some(statement) = parse_line(line, &location)? {
            statements.push(WithLocation::new(statement, location));
        }
    }
    event!(
        Level::DEBUG,
        "parsed {} statements from {name}",
        statements.len()
    );
    Ok(statements)
}
