//! ---
//! nsp_section: "05-execution-contexts"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Execution context catalog and task dispatchers."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Where probe tasks run.
//!
//! [`ExecutionContext`] is the closed set of strategies a scenario can pick
//! from; [`DispatchTable`] owns one [`Dispatcher`] per context for the length
//! of a harness run.

pub mod context;
pub mod dispatcher;
pub mod pool;
pub mod table;
pub mod ui;

pub use context::ExecutionContext;
pub use dispatcher::{DispatchError, Dispatcher, ImmediateDispatcher, Task};
pub use pool::PoolDispatcher;
pub use table::DispatchTable;
pub use ui::UiDispatchThread;
