//! Template library: curated exemplar documents and keyword routing

pub mod templates;

pub use templates::{TemplateCatalog, TemplateEntry};
