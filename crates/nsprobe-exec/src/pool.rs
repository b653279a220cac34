//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::dispatcher::{run_guarded, DispatchError, Dispatcher, Task};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// General purpose pool backed by a multi-threaded tokio runtime.
///
/// Tasks go through `spawn_blocking`; nothing is promised about which worker
/// runs them or in what order.
#[derive(Debug)]
pub struct PoolDispatcher {
    name: String,
    runtime: Mutex<Option<Runtime>>,
}

impl PoolDispatcher {
    pub fn new(name: impl Into<String>, worker_threads: usize) -> Result<Self, DispatchError> {
        let name = name.into();
        let workers = worker_threads.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .thread_name(name.clone())
            .build()
            .map_err(|source| DispatchError::Runtime {
                name: name.clone(),
                source,
            })?;
        debug!(dispatcher = %name, workers, "pool runtime started");
        Ok(Self {
            name,
            runtime: Mutex::new(Some(runtime)),
        })
    }

    pub fn is_running(&self) -> bool {
        self.runtime.lock().is_some()
    }

    /// Stop the runtime, giving in-flight tasks a short grace period.
    pub fn shutdown(&self) {
        let runtime = self.runtime.lock().take();
        if let Some(runtime) = runtime {
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
            debug!(dispatcher = %self.name, "pool runtime stopped");
        }
    }
}

impl Dispatcher for PoolDispatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&self, task: Task) -> Result<(), DispatchError> {
        let guard = self.runtime.lock();
        let Some(runtime) = guard.as_ref() else {
            return Err(DispatchError::Closed {
                dispatcher: self.name.clone(),
            });
        };
        let name = self.name.clone();
        runtime.spawn_blocking(move || run_guarded(&name, task));
        Ok(())
    }
}

impl Drop for PoolDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
