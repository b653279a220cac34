//! ---
//! nsp_section: "01-core-functionality"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Shared primitives and utilities for the probe harness."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Core shared primitives for the NSProbe workspace.
//! This crate exposes configuration loading, tracing initialisation and the
//! small time helpers consumed by the harness and the CLI.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    DocumentConfig, ExecutorConfig, ExpectationConfig, HarnessConfig, LoadedHarnessConfig,
    LoggingConfig, TimeoutConfig, XHTML_NAMESPACE,
};
pub use logging::{env_filter, init_tracing, LogFormat};
