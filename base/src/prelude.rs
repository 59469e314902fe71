//! The prelude exports the types which are useful for representing
//! AVR instructions and their operands.
pub use super::catalog::{catalog, Catalog, CatalogError, Mnemonic, Variant};
pub use super::operand::{
    AccessMode, Kind, OperandSpec, PointerRegister, Transform, Value, MAX_DISPLACEMENT,
};
pub use super::template::{Template, TemplateBit, TemplateError, WORD_BITS};
