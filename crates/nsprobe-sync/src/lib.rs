//! ---
//! nsp_section: "02-synchronisation"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Completion primitives shared by probes and setup."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Cross-thread completion primitives for the NSProbe harness.

pub mod latch;

pub use latch::{CompletionLatch, LatchError};
