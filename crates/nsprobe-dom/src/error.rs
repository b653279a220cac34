//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Document model, markup parsing and asynchronous loading."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("unsupported content type `{0}`")]
    UnsupportedContentType(String),
    #[error("parsed markup has no document element")]
    MissingDocumentElement,
    #[error("a document load is already in progress")]
    LoadInProgress,
    #[error("unable to spawn loader thread: {0}")]
    LoaderSpawn(#[source] std::io::Error),
}
