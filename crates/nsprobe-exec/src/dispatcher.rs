//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::error;

/// Unit of work handed to a dispatcher.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatcher `{dispatcher}` is shut down")]
    Closed { dispatcher: String },
    #[error("unable to spawn dispatch thread `{name}`: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to build pool runtime `{name}`: {source}")]
    Runtime {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Capability shared by every execution context: accept a task for execution.
pub trait Dispatcher: Send + Sync {
    fn name(&self) -> &str;

    fn submit(&self, task: Task) -> Result<(), DispatchError>;
}

/// Runs the task on the calling thread before returning.
///
/// Panics propagate to the caller, like any other synchronous call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateDispatcher;

impl Dispatcher for ImmediateDispatcher {
    fn name(&self) -> &str {
        "immediate"
    }

    fn submit(&self, task: Task) -> Result<(), DispatchError> {
        task();
        Ok(())
    }
}

/// Run `task`, logging instead of unwinding if it panics.
pub(crate) fn run_guarded(dispatcher: &str, task: Task) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        error!(
            dispatcher,
            panic = %panic_message(payload.as_ref()),
            "dispatched task panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
