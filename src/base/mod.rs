//! Typed model for the Bases document format
//!
//! The document is a constrained YAML-like subset (top-level `filters`,
//! `formulas`, `properties`, `views`, `summaries`). Instead of patching the
//! serialized text with anchored regexes, the document is parsed into an
//! explicit ordered structure, edited through typed operations, and
//! re-serialized at the boundary. This is deliberately not a grammar-checked
//! YAML tree; it reads exactly the shapes the synthesizer and the template
//! catalog produce.

pub mod model;
pub mod ops;
pub mod parse;
pub mod render;

pub use model::{
    BaseDocument, Direction, FilterNode, FilterOp, Formula, FormulaExpr, PropertyMeta, SortKey,
    View, ViewType,
};
