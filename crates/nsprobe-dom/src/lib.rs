//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Document model, markup parsing and asynchronous loading."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Read-only document model probed by the harness.
//!
//! Markup is parsed by the servo parsers (`xml5ever` for XML content types,
//! `html5ever` for `text/html`) and flattened into an immutable arena that can
//! be shared across threads behind an `Arc`.

pub mod document;
pub mod error;
pub mod loader;
pub mod parser;

pub use document::{Attribute, Document, DocumentKind, Element, Node, NodeId, NodeKind, NodeList};
pub use error::{DomError, Result};
pub use loader::{DocumentLoader, LoadState};
pub use parser::parse_document;
