//! The instruction catalog: for each mnemonic, the variants (operand
//! shapes and their encodings) which the assembler may choose from.
//!
//! The catalog is written as static data (see `table.rs`) and is
//! parsed and checked once, the first time [`catalog`] is called.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::OnceLock;

use super::operand::{OperandSpec, Value};
use super::template::{Template, TemplateError};

mod table;
#[cfg(test)]
mod tests;

/// Static description of one operand slot: the placeholder letters
/// bound to the operand, and what the operand may be.
#[derive(Debug, Clone, Copy)]
pub struct SlotDef {
    pub letters: &'static str,
    pub spec: OperandSpec,
}

/// Static description of one variant of a mnemonic.
#[derive(Debug, Clone, Copy)]
pub struct VariantDef {
    pub template: &'static str,
    pub operands: [SlotDef; 2],
}

/// Static description of a mnemonic.
#[derive(Debug, Clone, Copy)]
pub struct MnemonicDef {
    pub name: &'static str,
    pub variants: &'static [VariantDef],
}

/// A slot which requires the operand to be absent.
pub const NOTHING: SlotDef = SlotDef {
    letters: "",
    spec: OperandSpec::NONE,
};

#[must_use]
pub const fn slot(letters: &'static str, spec: OperandSpec) -> SlotDef {
    SlotDef { letters, spec }
}

/// One concrete encoding of a mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    template: Template,
    operands: [OperandSpec; 2],
}

impl Variant {
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn operands(&self) -> &[OperandSpec; 2] {
        &self.operands
    }

    /// If this variant accepts both (resolved) operands, return the
    /// integers to be packed into its template.
    #[must_use]
    pub fn fit(&self, values: &[Value; 2], next_address: i64) -> Option<[i64; 2]> {
        Some([
            self.operands[0].fit(&values[0], next_address)?,
            self.operands[1].fit(&values[1], next_address)?,
        ])
    }

    #[must_use]
    pub fn encode(&self, fitted: [i64; 2]) -> Vec<u16> {
        self.template.pack(fitted)
    }
}

/// A mnemonic and all of its variants.  All variants have the same
/// size, so the address of every instruction is known before any
/// operand is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic {
    name: &'static str,
    words: usize,
    variants: Vec<Variant>,
}

impl Mnemonic {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The size of the instruction, in 16-bit words.
    #[must_use]
    pub fn words(&self) -> usize {
        self.words
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// All the variants which accept `values`, each paired with the
    /// integers it would pack.  A well-formed program yields exactly
    /// one.
    #[must_use]
    pub fn matching(&self, values: &[Value; 2], next_address: i64) -> Vec<(&Variant, [i64; 2])> {
        self.variants
            .iter()
            .filter_map(|v| v.fit(values, next_address).map(|fitted| (v, fitted)))
            .collect()
    }
}

/// A defect in the catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateMnemonic(&'static str),
    NoVariants(&'static str),
    BadTemplate {
        mnemonic: &'static str,
        variant: usize,
        error: TemplateError,
    },
    MixedSizes(&'static str),
    /// The operand kind carries a value but the template has no room
    /// for it, or the kind carries none but the template has
    /// placeholders for it.
    PlaceholderMismatch {
        mnemonic: &'static str,
        variant: usize,
        operand: usize,
    },
    /// The operand carries a value but has no declared bounds.
    MissingBounds {
        mnemonic: &'static str,
        variant: usize,
        operand: usize,
    },
    /// The declared bounds produce values too wide for the template.
    TooNarrow {
        mnemonic: &'static str,
        variant: usize,
        operand: usize,
        width: u32,
    },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateMnemonic(name) => {
                write!(f, "mnemonic {name} is defined more than once")
            }
            CatalogError::NoVariants(name) => write!(f, "mnemonic {name} has no variants"),
            CatalogError::BadTemplate {
                mnemonic,
                variant,
                error,
            } => write!(f, "{mnemonic} variant {variant}: {error}"),
            CatalogError::MixedSizes(name) => {
                write!(f, "variants of mnemonic {name} have different sizes")
            }
            CatalogError::PlaceholderMismatch {
                mnemonic,
                variant,
                operand,
            } => write!(
                f,
                "{mnemonic} variant {variant}: placeholders of operand {} do not match its kind",
                operand + 1
            ),
            CatalogError::MissingBounds {
                mnemonic,
                variant,
                operand,
            } => write!(
                f,
                "{mnemonic} variant {variant}: operand {} has no bounds",
                operand + 1
            ),
            CatalogError::TooNarrow {
                mnemonic,
                variant,
                operand,
                width,
            } => write!(
                f,
                "{mnemonic} variant {variant}: the range of operand {} does not fit in {width} bits",
                operand + 1
            ),
        }
    }
}

impl Error for CatalogError {}

/// Would every value within `spec`'s bounds fit into `width` bits
/// once transformed?
fn bounds_fit_width(spec: &OperandSpec, (low, high): (i64, i64), width: u32) -> bool {
    if width == 0 || width >= 63 {
        return false;
    }
    let limit: i64 = 1 << width;
    if spec.relative {
        // Relative operands are signed; the transform (if any) only
        // changes their representation.
        let half = limit / 2;
        low >= -half && high < half
    } else {
        let (a, b) = match spec.transform {
            Some(t) => (t.apply(low), t.apply(high)),
            None => (low, high),
        };
        a.min(b) >= 0 && a.max(b) < limit
    }
}

fn build_variant(
    mnemonic: &'static str,
    index: usize,
    def: &VariantDef,
) -> Result<Variant, CatalogError> {
    let letters = [def.operands[0].letters, def.operands[1].letters];
    let template =
        Template::parse(def.template, letters).map_err(|error| CatalogError::BadTemplate {
            mnemonic,
            variant: index,
            error,
        })?;
    for (operand, slot) in def.operands.iter().enumerate() {
        let width = template.width(operand);
        if slot.spec.kind.has_payload() != (width > 0) {
            return Err(CatalogError::PlaceholderMismatch {
                mnemonic,
                variant: index,
                operand,
            });
        }
        if width == 0 {
            continue;
        }
        let Some(bounds) = slot.spec.bounds else {
            return Err(CatalogError::MissingBounds {
                mnemonic,
                variant: index,
                operand,
            });
        };
        if !bounds_fit_width(&slot.spec, bounds, width) {
            return Err(CatalogError::TooNarrow {
                mnemonic,
                variant: index,
                operand,
                width,
            });
        }
    }
    Ok(Variant {
        template,
        operands: [def.operands[0].spec, def.operands[1].spec],
    })
}

fn build_mnemonic(def: &MnemonicDef) -> Result<Mnemonic, CatalogError> {
    let variants: Vec<Variant> = def
        .variants
        .iter()
        .enumerate()
        .map(|(i, v)| build_variant(def.name, i, v))
        .collect::<Result<_, _>>()?;
    let words = match variants.first() {
        Some(v) => v.template.words(),
        None => {
            return Err(CatalogError::NoVariants(def.name));
        }
    };
    if variants.iter().any(|v| v.template.words() != words) {
        return Err(CatalogError::MixedSizes(def.name));
    }
    Ok(Mnemonic {
        name: def.name,
        words,
        variants,
    })
}

/// All known mnemonics.
#[derive(Debug)]
pub struct Catalog {
    mnemonics: BTreeMap<&'static str, Mnemonic>,
}

impl Catalog {
    /// Parse and check catalog data.
    ///
    /// # Errors
    ///
    /// Returns the first defect found; see [`CatalogError`].
    pub fn build(defs: &[MnemonicDef]) -> Result<Catalog, CatalogError> {
        let mut mnemonics = BTreeMap::new();
        for def in defs {
            let mnemonic = build_mnemonic(def)?;
            if mnemonics.insert(def.name, mnemonic).is_some() {
                return Err(CatalogError::DuplicateMnemonic(def.name));
            }
        }
        Ok(Catalog { mnemonics })
    }

    /// Look up a mnemonic.  Mnemonics are not case-sensitive.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Mnemonic> {
        self.mnemonics.get(name.to_ascii_lowercase().as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mnemonic> {
        self.mnemonics.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mnemonics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mnemonics.is_empty()
    }
}

/// The AVR instruction catalog, built on first use.
///
/// # Panics
///
/// Panics if the built-in catalog data is defective.
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| match Catalog::build(table::MNEMONICS) {
        Ok(c) => c,
        Err(e) => {
            panic!("the built-in instruction catalog is defective: {e}");
        }
    })
}
