//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! The probe harness loads a shared document once, then runs the same probe
//! through every execution context and checks what each run observed.
//!
//! ```no_run
//! use nsprobe_common::HarnessConfig;
//! use nsprobe_exec::{DispatchTable, ExecutionContext};
//! use nsprobe_testharness::{load_shared_document, ScenarioRunner, XHTML_TEST_PAGE};
//!
//! let config = HarnessConfig::default();
//! let table = DispatchTable::start(&config.executor).unwrap();
//! let document = load_shared_document(
//!     &table,
//!     XHTML_TEST_PAGE,
//!     "application/xhtml+xml",
//!     config.timeouts.setup,
//! )
//! .unwrap();
//! let report = ScenarioRunner::new(document, &table).run_all(ExecutionContext::all());
//! assert!(report.is_success(), "{report}");
//! ```

pub mod error;
pub mod fixtures;
pub mod probe;
pub mod report;
pub mod scenario;
pub mod setup;

pub use error::{AssertionFailure, AssertionFailures, HarnessError};
pub use fixtures::{XHTML_CONTENT_TYPE, XHTML_TEST_PAGE};
pub use probe::{Probe, ProbeCounts, ProbeResult, TagNameProbe};
pub use report::{HarnessReport, ScenarioRecord, Verdict};
pub use scenario::{Expectation, ScenarioOutcome, ScenarioRunner, ScenarioState};
pub use setup::{load_document_from_config, load_shared_document};
