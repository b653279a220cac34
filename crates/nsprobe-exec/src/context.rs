//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Named strategy deciding where a submitted task runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ExecutionContext {
    /// Marshalled onto the primary UI dispatch thread.
    PrimaryUi,
    /// Marshalled onto an independent, second UI dispatch thread.
    SecondaryUi,
    /// Handed to the general purpose pool with no ordering guarantee.
    UnmanagedPool,
    /// Run on the submitting thread before `submit` returns. Serves as the
    /// same-thread baseline.
    Immediate,
}

impl ExecutionContext {
    pub fn all() -> impl Iterator<Item = ExecutionContext> {
        Self::iter()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether `submit` returns before the task has run.
    pub fn is_asynchronous(self) -> bool {
        !matches!(self, ExecutionContext::Immediate)
    }

    pub fn description(self) -> &'static str {
        match self {
            ExecutionContext::PrimaryUi => "primary UI dispatch thread",
            ExecutionContext::SecondaryUi => "secondary UI dispatch thread",
            ExecutionContext::UnmanagedPool => "unmanaged thread pool",
            ExecutionContext::Immediate => "calling thread, synchronously",
        }
    }
}
