//! The symbol table, and the scan pass which builds it.
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

use tracing::{event, Level};

use base::prelude::Value;

use super::ast::{Address, Statement, Strength};
use super::source::{Location, WithLocation};
use super::types::AssemblerFailure;


#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct SymbolDefinition {
    pub(crate) value: Value,
    pub(crate) strength: Strength,
    pub(crate) location: Location,
}

/// Maps symbol names to their values.  The table is complete (and
/// is not changed) once the scan pass is over.
#[derive(Debug, Default, Clone)]
pub(crate) struct SymbolTable {
    definitions: BTreeMap<String, SymbolDefinition>,
}

/// The state of a lookup which chases one name through the table.
#[derive(Debug, Default)]
struct LookupOperation {
    depends_on: HashSet<String>,
    deps_in_order: Vec<String>,
}

impl LookupOperation {
    /// Record a visit to `name`, failing if it has been seen before.
    fn visit(&mut self, name: &str, location: &Location) -> Result<(), AssemblerFailure> {
        self.deps_in_order.push(name.to_string());
        if self.depends_on.insert(name.to_string()) {
            Ok(())
        } else {
            Err(AssemblerFailure::SymbolLoop {
                location: location.clone(),
                chain: std::mem::take(&mut self.deps_in_order),
            })
        }
    }
}

impl SymbolTable {
    pub(crate) fn get(&self, name: &str) -> Option<&SymbolDefinition> {
        self.definitions.get(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Replace identifiers with the values they stand for, following
    /// chains of definitions (`.equ a = b`, `.equ b = 4`) until the
    /// value is not an identifier.  `location` is the statement which
    /// uses the value.
    pub(crate) fn resolve(
        &self,
        value: &Value,
        location: &Location,
    ) -> Result<Value, AssemblerFailure> {
        let mut op = LookupOperation::default();
        let mut current = value;
        while let Value::Identifier(name) = current {
            op.visit(name, location)?;
            match self.definitions.get(name) {
                Some(def) => {
                    current = &def.value;
                }
                None => {
                    return Err(AssemblerFailure::UnknownSymbol {
                        location: location.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        if !op.deps_in_order.is_empty() {
            event!(
                Level::TRACE,
                "{location}: {} resolves to {current}",
                op.deps_in_order.join(" -> ")
            );
        }
        Ok(current.clone())
    }
}

impl Display for SymbolTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, def) in &self.definitions {
            write!(f, "{name:<24} {:<12}", def.value.to_string())?;
            match def.strength {
                Strength::Strong => writeln!(f, " {}", def.location)?,
                Strength::Weak => writeln!(f, " {} (weak)", def.location)?,
            }
        }
        Ok(())
    }
}

/// Definitions of one strength.  A name may be defined only once at
/// each strength.
#[derive(Debug)]
struct DefinitionMap {
    strength: Strength,
    entries: BTreeMap<String, SymbolDefinition>,
}

impl DefinitionMap {
    fn new(strength: Strength) -> DefinitionMap {
        DefinitionMap {
            strength,
            entries: BTreeMap::new(),
        }
    }

    fn define(
        &mut self,
        name: &str,
        value: Value,
        location: &Location,
    ) -> Result<(), AssemblerFailure> {
        let strength = self.strength;
        if let Some(previous) = self.entries.get(name) {
            return Err(AssemblerFailure::Redefinition {
                location: location.clone(),
                name: name.to_string(),
                strength,
                previous: previous.location.clone(),
            });
        }
        event!(
            Level::DEBUG,
            "{location}: {strength} definition of {name} as {value}"
        );
        self.entries.insert(
            name.to_string(),
            SymbolDefinition {
                value,
                strength,
                location: location.clone(),
            },
        );
        Ok(())
    }
}

/// The scan pass: assign an address to each label and collect all
/// the definitions.
///
/// The address counter starts at 0 and each instruction advances it
/// by the size of its mnemonic (all variants of a mnemonic have the
/// same size, so no operand needs to be known yet).  A strong
/// definition replaces a weak one of the same name, wherever the two
/// appear.
pub(crate) fn scan(
    statements: &[WithLocation<Statement>],
) -> Result<(SymbolTable, Address), AssemblerFailure> {
    let mut strong = DefinitionMap::new(Strength::Strong);
    let mut weak = DefinitionMap::new(Strength::Weak);
    let mut address: Address = 0;
    for WithLocation {
        inner: statement,
        location,
    } in statements
    {
        let (name, value, strength) = match statement {
            Statement::Instruction(instruction) => {
                address = instruction.next_address(address, location)?;
                continue;
            }
            Statement::Label { name, strength } => {
                (name, Value::Number(i64::from(address)), *strength)
            }
            Statement::Definition {
                name,
                value,
                strength,
            } => (name, value.clone(), *strength),
        };
        match strength {
            Strength::Strong => strong.define(name, value, location)?,
            Strength::Weak => weak.define(name, value, location)?,
        }
    }

    let mut definitions = weak.entries;
    for (name, def) in strong.entries {
        if let Some(overridden) = definitions.insert(name.clone(), def) {
            event!(
                Level::DEBUG,
                "weak definition of {name} at {} is overridden",
                overridden.location
            );
        }
    }
    event!(
        Level::DEBUG,
        "scan pass found {} symbols; the program occupies {address} words",
        definitions.len()
    );
    Ok((SymbolTable { definitions }, address))
}
