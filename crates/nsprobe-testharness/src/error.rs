//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::fmt;
use std::time::Duration;

use nsprobe_exec::{DispatchError, ExecutionContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub label: String,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {} but found {}",
            self.label, self.expected, self.actual
        )
    }
}

/// Every failed expectation of a scenario, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssertionFailures(pub Vec<AssertionFailure>);

impl AssertionFailures {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssertionFailure> {
        self.0.iter()
    }
}

impl fmt::Display for AssertionFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("setup failed: {reason}")]
    Setup { reason: String },
    #[error("{context}: interrupted before the probe recorded its counts")]
    Interrupted { context: ExecutionContext },
    #[error("{context}: probe did not complete within {waited:?}")]
    TimedOut {
        context: ExecutionContext,
        waited: Duration,
    },
    #[error("{context}: probe could not be submitted: {source}")]
    Dispatch {
        context: ExecutionContext,
        #[source]
        source: DispatchError,
    },
    #[error("{context}: {} assertion(s) failed: {failures}", .failures.len())]
    AssertionFailed {
        context: ExecutionContext,
        failures: AssertionFailures,
    },
}

impl HarnessError {
    /// Execution context the error belongs to; `None` for setup failures.
    pub fn context(&self) -> Option<ExecutionContext> {
        match self {
            HarnessError::Setup { .. } => None,
            HarnessError::Interrupted { context }
            | HarnessError::TimedOut { context, .. }
            | HarnessError::Dispatch { context, .. }
            | HarnessError::AssertionFailed { context, .. } => Some(*context),
        }
    }

    /// Whether the scenario ran and observed wrong values, as opposed to erroring.
    pub fn is_assertion(&self) -> bool {
        matches!(self, HarnessError::AssertionFailed { .. })
    }
}
