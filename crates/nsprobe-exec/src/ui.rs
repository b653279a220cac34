//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Single-threaded UI style event dispatch.
//!
//! Each [`UiDispatchThread`] owns one named OS thread that drains a FIFO
//! queue, the way a toolkit's event-dispatch thread does. Two instances are
//! fully independent of each other.

use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, warn};

use crate::dispatcher::{run_guarded, DispatchError, Dispatcher, Task};

#[derive(Debug)]
pub struct UiDispatchThread {
    name: String,
    thread_id: ThreadId,
    sender: Mutex<Option<UnboundedSender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl UiDispatchThread {
    /// Start a dispatch thread called `name`.
    pub fn spawn(name: impl Into<String>) -> Result<Self, DispatchError> {
        let name = name.into();
        let (sender, mut receiver) = unbounded_channel::<Task>();
        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                debug!(dispatcher = %thread_name, "dispatch thread started");
                while let Some(task) = receiver.blocking_recv() {
                    run_guarded(&thread_name, task);
                }
                debug!(dispatcher = %thread_name, "dispatch thread stopped");
            })
            .map_err(|source| DispatchError::Spawn {
                name: name.clone(),
                source,
            })?;
        Ok(Self {
            name,
            thread_id: handle.thread().id(),
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Whether the caller is running on this dispatch thread.
    pub fn is_dispatch_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Stop accepting tasks, let queued ones finish and join the thread.
    ///
    /// Called from the dispatch thread itself, the queue is closed but the
    /// thread is left to exit on its own.
    pub fn shutdown(&self) {
        let Some(sender) = self.sender.lock().take() else {
            return;
        };
        drop(sender);
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if self.is_dispatch_thread() {
                return;
            }
            if handle.join().is_err() {
                warn!(dispatcher = %self.name, "dispatch thread terminated abnormally");
            }
        }
    }
}

impl Dispatcher for UiDispatchThread {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&self, task: Task) -> Result<(), DispatchError> {
        let closed = || DispatchError::Closed {
            dispatcher: self.name.clone(),
        };
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(task).map_err(|_| closed()),
            None => Err(closed()),
        }
    }
}

impl Drop for UiDispatchThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use nsprobe_sync::CompletionLatch;

    use super::*;

    #[test]
    fn tasks_run_on_the_named_thread_in_order() {
        let ui = Arc::new(UiDispatchThread::spawn("ui-order").expect("spawn"));
        let order = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(CompletionLatch::new());
        for index in 0..5 {
            let order = Arc::clone(&order);
            let probe_ui = Arc::clone(&ui);
            let done = Arc::clone(&done);
            ui.submit(Box::new(move || {
                assert!(probe_ui.is_dispatch_thread());
                assert_eq!(thread::current().name(), Some("ui-order"));
                order.lock().push(index);
                if index == 4 {
                    done.signal();
                }
            }))
            .expect("submit");
        }
        done.wait_timeout(Duration::from_secs(5)).expect("tasks ran");
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        assert!(!ui.is_dispatch_thread());
    }

    #[test]
    fn submit_after_shutdown_is_rejected() {
        let ui = UiDispatchThread::spawn("ui-closed").expect("spawn");
        ui.shutdown();
        assert!(!ui.is_running());
        let err = ui.submit(Box::new(|| {})).expect_err("closed");
        assert!(matches!(err, DispatchError::Closed { ref dispatcher } if dispatcher == "ui-closed"));
    }

    #[test]
    fn panicking_task_does_not_stop_the_thread() {
        let ui = UiDispatchThread::spawn("ui-panic").expect("spawn");
        let done = Arc::new(CompletionLatch::new());
        ui.submit(Box::new(|| panic!("task failure"))).expect("submit");
        let signal = Arc::clone(&done);
        ui.submit(Box::new(move || {
            signal.signal();
        }))
        .expect("submit");
        done.wait_timeout(Duration::from_secs(5))
            .expect("thread kept dispatching");
    }
}
