//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use nsprobe_common::ExecutorConfig;
use tracing::info;

use crate::context::ExecutionContext;
use crate::dispatcher::{DispatchError, Dispatcher, ImmediateDispatcher};
use crate::pool::PoolDispatcher;
use crate::ui::UiDispatchThread;

/// One dispatcher per [`ExecutionContext`], built once per harness run.
#[derive(Debug)]
pub struct DispatchTable {
    primary_ui: UiDispatchThread,
    secondary_ui: UiDispatchThread,
    pool: PoolDispatcher,
    immediate: ImmediateDispatcher,
}

impl DispatchTable {
    pub fn start(config: &ExecutorConfig) -> Result<Self, DispatchError> {
        let table = Self {
            primary_ui: UiDispatchThread::spawn(config.primary_ui_name.clone())?,
            secondary_ui: UiDispatchThread::spawn(config.secondary_ui_name.clone())?,
            pool: PoolDispatcher::new(config.pool_name.clone(), config.pool_worker_threads)?,
            immediate: ImmediateDispatcher,
        };
        info!(
            primary_ui = %config.primary_ui_name,
            secondary_ui = %config.secondary_ui_name,
            pool = %config.pool_name,
            pool_workers = config.pool_worker_threads,
            "dispatch table started"
        );
        Ok(table)
    }

    pub fn dispatcher(&self, context: ExecutionContext) -> &dyn Dispatcher {
        match context {
            ExecutionContext::PrimaryUi => &self.primary_ui,
            ExecutionContext::SecondaryUi => &self.secondary_ui,
            ExecutionContext::UnmanagedPool => &self.pool,
            ExecutionContext::Immediate => &self.immediate,
        }
    }

    pub fn submit<F>(&self, context: ExecutionContext, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.dispatcher(context).submit(Box::new(task))
    }

    /// The UI dispatch thread behind `context`, if it is a UI context.
    pub fn ui_thread(&self, context: ExecutionContext) -> Option<&UiDispatchThread> {
        match context {
            ExecutionContext::PrimaryUi => Some(&self.primary_ui),
            ExecutionContext::SecondaryUi => Some(&self.secondary_ui),
            ExecutionContext::UnmanagedPool | ExecutionContext::Immediate => None,
        }
    }

    pub fn shutdown(&self) {
        self.primary_ui.shutdown();
        self.secondary_ui.shutdown();
        self.pool.shutdown();
        info!("dispatch table stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use nsprobe_sync::CompletionLatch;
    use parking_lot::Mutex;

    use super::*;

    fn thread_of(table: &DispatchTable, context: ExecutionContext) -> Option<String> {
        let name = Arc::new(Mutex::new(None));
        let done = Arc::new(CompletionLatch::new());
        {
            let name = Arc::clone(&name);
            let done = Arc::clone(&done);
            table
                .submit(context, move || {
                    *name.lock() = thread::current().name().map(str::to_owned);
                    done.signal();
                })
                .expect("submit");
        }
        done.wait_timeout(Duration::from_secs(5)).expect("task ran");
        let recorded = name.lock().clone();
        recorded
    }

    #[test]
    fn every_context_runs_its_task_where_expected() {
        let config = ExecutorConfig {
            primary_ui_name: "table-primary".into(),
            secondary_ui_name: "table-secondary".into(),
            pool_name: "table-pool".into(),
            ..ExecutorConfig::default()
        };
        let table = DispatchTable::start(&config).expect("table");

        assert_eq!(
            thread_of(&table, ExecutionContext::PrimaryUi).as_deref(),
            Some("table-primary")
        );
        assert_eq!(
            thread_of(&table, ExecutionContext::SecondaryUi).as_deref(),
            Some("table-secondary")
        );
        assert_eq!(
            thread_of(&table, ExecutionContext::UnmanagedPool).as_deref(),
            Some("table-pool")
        );
        assert_eq!(
            thread_of(&table, ExecutionContext::Immediate),
            thread::current().name().map(str::to_owned)
        );
        table.shutdown();
    }

    #[test]
    fn dispatcher_names_follow_config() {
        let table = DispatchTable::start(&ExecutorConfig::default()).expect("table");
        assert_eq!(
            table.dispatcher(ExecutionContext::PrimaryUi).name(),
            "nsprobe-primary-ui"
        );
        assert_eq!(
            table.dispatcher(ExecutionContext::Immediate).name(),
            "immediate"
        );
        assert!(table.ui_thread(ExecutionContext::UnmanagedPool).is_none());
    }
}
