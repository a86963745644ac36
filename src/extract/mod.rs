//! Extraction layer: turns free-form instruction text into structured pieces
//!
//! Three independent components:
//! - `resolver` canonicalizes common property names to `file.*` references
//! - `entities` pulls optional fields (tag, folder, view type, ...) out of
//!   one instruction via independent pattern rules
//! - `classifier` scores text against ordered keyword sets

pub mod classifier;
pub mod entities;
pub mod resolver;

pub use classifier::{ClassifierEntry, KeywordClassifier};
pub use entities::{extract, ExtractedEntities, SortSpec};
pub use resolver::resolve_property;
