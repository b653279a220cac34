//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use nsprobe_common::time::monotonic_now;
use nsprobe_common::{ExpectationConfig, HarnessConfig};
use nsprobe_dom::Document;
use nsprobe_exec::{DispatchTable, ExecutionContext};
use nsprobe_logging::{log_scenario_event, probe_debug, LogContext, ScenarioEventOutcome};
use nsprobe_sync::LatchError;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

use crate::error::{AssertionFailure, AssertionFailures, HarnessError};
use crate::probe::{Probe, ProbeCounts, ProbeResult, TagNameProbe};
use crate::report::{HarnessReport, ScenarioRecord};

const WITHOUT_NAMESPACE: &str = "Without Namespace";
const WITH_NAMESPACE: &str = "With Namespace";

/// Lifecycle of a single scenario.
///
/// ```text
/// Idle ──submit──► AwaitingProbe ──signal──► Verifying ──┬──► Done
///   └──────────────────┴─────────────────────────────────┴──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioState {
    Idle,
    AwaitingProbe,
    Verifying,
    Done,
    Failed,
}

impl ScenarioState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ScenarioState::Done | ScenarioState::Failed)
    }
}

/// Counts every scenario must observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub plain: usize,
    pub namespaced: usize,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            plain: 1,
            namespaced: 1,
        }
    }
}

impl From<ExpectationConfig> for Expectation {
    fn from(config: ExpectationConfig) -> Self {
        Self {
            plain: config.plain,
            namespaced: config.namespaced,
        }
    }
}

impl Expectation {
    /// Compare `counts` against both expectations, collecting every mismatch.
    pub fn verify(&self, counts: ProbeCounts) -> AssertionFailures {
        let checks = [
            (WITHOUT_NAMESPACE, self.plain, counts.plain),
            (WITH_NAMESPACE, self.namespaced, counts.namespaced),
        ];
        AssertionFailures(
            checks
                .into_iter()
                .filter(|(_, expected, actual)| expected != actual)
                .map(|(label, expected, actual)| AssertionFailure {
                    label: label.to_owned(),
                    expected,
                    actual,
                })
                .collect(),
        )
    }
}

/// A scenario that reached [`ScenarioState::Done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub context: ExecutionContext,
    pub counts: ProbeCounts,
    pub elapsed: Duration,
}

/// Runs the probe against the shared document through an execution context.
pub struct ScenarioRunner<'a> {
    document: Arc<Document>,
    dispatch: &'a DispatchTable,
    probe: Arc<dyn Probe>,
    expectation: Expectation,
    probe_timeout: Option<Duration>,
    run_id: String,
}

impl<'a> ScenarioRunner<'a> {
    /// Runner with the default `html`/XHTML probe, expecting one match each.
    pub fn new(document: Arc<Document>, dispatch: &'a DispatchTable) -> Self {
        Self {
            document,
            dispatch,
            probe: Arc::new(TagNameProbe::default()),
            expectation: Expectation::default(),
            probe_timeout: None,
            run_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn from_config(
        document: Arc<Document>,
        dispatch: &'a DispatchTable,
        config: &HarnessConfig,
    ) -> Self {
        Self::new(document, dispatch)
            .with_probe(TagNameProbe::new(
                config.document.tag_name.clone(),
                config.document.namespace_uri.clone(),
            ))
            .with_expectation(config.expectation.into())
            .with_probe_timeout(config.timeouts.probe)
    }

    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn expectation(&self) -> Expectation {
        self.expectation
    }

    /// Probe the document through `context` and verify the observed counts.
    ///
    /// A failing scenario is never retried.
    pub fn run(&self, context: ExecutionContext) -> Result<ScenarioOutcome, HarnessError> {
        let started = monotonic_now();
        let mut state = ScenarioState::Idle;
        let result = self.drive(context, &mut state);

        let log_ctx = LogContext::new()
            .with_run(&self.run_id)
            .with_context(context.name())
            .with_state(state.as_ref());
        match &result {
            Ok(counts) => log_scenario_event(
                Some(&log_ctx),
                "scenario.finished",
                &format!(
                    "plain={} namespaced={}",
                    counts.plain, counts.namespaced
                ),
                ScenarioEventOutcome::Success,
            ),
            Err(err) => log_scenario_event(
                Some(&log_ctx),
                "scenario.finished",
                &err.to_string(),
                ScenarioEventOutcome::Fault,
            ),
        }

        result.map(|counts| ScenarioOutcome {
            context,
            counts,
            elapsed: started.elapsed(),
        })
    }

    /// Run every context in turn, one after the other.
    pub fn run_all<I>(&self, contexts: I) -> HarnessReport
    where
        I: IntoIterator<Item = ExecutionContext>,
    {
        let mut report = HarnessReport::new(self.run_id.clone());
        for context in contexts {
            let started = monotonic_now();
            let record = match self.run(context) {
                Ok(outcome) => ScenarioRecord::passed(&outcome),
                Err(err) => ScenarioRecord::from_error(context, &err, started.elapsed()),
            };
            report.push(record);
        }
        report
    }

    fn drive(
        &self,
        context: ExecutionContext,
        state: &mut ScenarioState,
    ) -> Result<ProbeCounts, HarnessError> {
        let result = Arc::new(ProbeResult::new());
        let task = {
            let result = Arc::clone(&result);
            let document = Arc::clone(&self.document);
            let probe = Arc::clone(&self.probe);
            move || {
                result.record_from(|| probe.measure(&document));
            }
        };

        if let Err(source) = self.dispatch.submit(context, task) {
            self.advance(context, state, ScenarioState::Failed);
            return Err(HarnessError::Dispatch { context, source });
        }
        self.advance(context, state, ScenarioState::AwaitingProbe);

        let counts = match result.await_counts(self.probe_timeout) {
            Ok(counts) => counts,
            Err(err) => {
                self.advance(context, state, ScenarioState::Failed);
                return Err(match err {
                    LatchError::Interrupted => HarnessError::Interrupted { context },
                    LatchError::TimedOut { waited } => HarnessError::TimedOut { context, waited },
                });
            }
        };
        self.advance(context, state, ScenarioState::Verifying);

        let failures = self.expectation.verify(counts);
        if failures.is_empty() {
            self.advance(context, state, ScenarioState::Done);
            Ok(counts)
        } else {
            self.advance(context, state, ScenarioState::Failed);
            Err(HarnessError::AssertionFailed { context, failures })
        }
    }

    fn advance(&self, context: ExecutionContext, state: &mut ScenarioState, next: ScenarioState) {
        let log_ctx = LogContext::new()
            .with_run(&self.run_id)
            .with_context(context.name())
            .with_state(next.as_ref());
        probe_debug!(context = log_ctx, "scenario {} -> {}", state, next);
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_reports_every_mismatch() {
        let expectation = Expectation::default();
        assert!(expectation.verify(ProbeCounts::new(1, 1)).is_empty());

        let failures = expectation.verify(ProbeCounts::new(1, 0));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.0[0].label, WITH_NAMESPACE);

        let failures = expectation.verify(ProbeCounts::new(0, 0));
        let labels: Vec<_> = failures.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, [WITHOUT_NAMESPACE, WITH_NAMESPACE]);
    }

    #[test]
    fn expectation_follows_config() {
        let expectation: Expectation = ExpectationConfig {
            plain: 1,
            namespaced: 0,
        }
        .into();
        assert!(expectation.verify(ProbeCounts::new(1, 0)).is_empty());
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(ScenarioState::Done.is_terminal());
        assert!(ScenarioState::Failed.is_terminal());
        assert!(!ScenarioState::AwaitingProbe.is_terminal());
        assert_eq!(ScenarioState::AwaitingProbe.as_ref(), "awaiting_probe");
    }
}
