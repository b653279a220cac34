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

use chrono::{DateTime, Utc};
use nsprobe_common::time::{duration_to_micros, millis_f64};
use nsprobe_exec::ExecutionContext;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{AssertionFailures, HarnessError};
use crate::probe::ProbeCounts;
use crate::scenario::ScenarioOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    /// Every expectation held.
    Pass,
    /// The probe ran but observed unexpected counts.
    Fail,
    /// The probe could not be observed (dispatch, interruption, timeout).
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub context: ExecutionContext,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<ProbeCounts>,
    #[serde(default, skip_serializing_if = "AssertionFailures::is_empty")]
    pub failures: AssertionFailures,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub elapsed_us: u64,
}

impl ScenarioRecord {
    pub fn passed(outcome: &ScenarioOutcome) -> Self {
        Self {
            context: outcome.context,
            verdict: Verdict::Pass,
            counts: Some(outcome.counts),
            failures: AssertionFailures::default(),
            message: None,
            elapsed_us: duration_to_micros(outcome.elapsed),
        }
    }

    pub fn from_error(context: ExecutionContext, err: &HarnessError, elapsed: Duration) -> Self {
        let (verdict, failures) = match err {
            HarnessError::AssertionFailed { failures, .. } => (Verdict::Fail, failures.clone()),
            _ => (Verdict::Error, AssertionFailures::default()),
        };
        Self {
            context,
            verdict,
            counts: None,
            failures,
            message: Some(err.to_string()),
            elapsed_us: duration_to_micros(elapsed),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// Aggregate of every scenario in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub scenarios: Vec<ScenarioRecord>,
}

impl HarnessReport {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            scenarios: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ScenarioRecord) {
        self.scenarios.push(record);
    }

    /// `true` when every scenario passed. An empty report is not a success.
    pub fn is_success(&self) -> bool {
        !self.scenarios.is_empty() && self.scenarios.iter().all(ScenarioRecord::is_pass)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios.iter().filter(|record| !record.is_pass())
    }

    pub fn record(&self, context: ExecutionContext) -> Option<&ScenarioRecord> {
        self.scenarios
            .iter()
            .find(|record| record.context == context)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for HarnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run {} started {}", self.run_id, self.started_at.to_rfc3339())?;
        for record in &self.scenarios {
            let elapsed = millis_f64(Duration::from_micros(record.elapsed_us));
            match (&record.counts, &record.message) {
                (Some(counts), _) => writeln!(
                    f,
                    "{:<5} {:<15} plain={} namespaced={} ({elapsed:.2} ms)",
                    record.verdict, record.context, counts.plain, counts.namespaced
                )?,
                (None, Some(message)) => writeln!(
                    f,
                    "{:<5} {:<15} {message} ({elapsed:.2} ms)",
                    record.verdict, record.context
                )?,
                (None, None) => writeln!(f, "{:<5} {}", record.verdict, record.context)?,
            }
        }
        let failed = self.failed().count();
        write!(
            f,
            "{} scenario(s), {} passed, {} not passed",
            self.scenarios.len(),
            self.scenarios.len() - failed,
            failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssertionFailure;

    fn failing_record() -> ScenarioRecord {
        let err = HarnessError::AssertionFailed {
            context: ExecutionContext::UnmanagedPool,
            failures: AssertionFailures(vec![AssertionFailure {
                label: "With Namespace".into(),
                expected: 1,
                actual: 0,
            }]),
        };
        ScenarioRecord::from_error(
            ExecutionContext::UnmanagedPool,
            &err,
            Duration::from_millis(2),
        )
    }

    #[test]
    fn empty_report_is_not_a_success() {
        assert!(!HarnessReport::new("run").is_success());
    }

    #[test]
    fn single_failure_fails_the_report() {
        let mut report = HarnessReport::new("run");
        report.push(ScenarioRecord::passed(&ScenarioOutcome {
            context: ExecutionContext::Immediate,
            counts: ProbeCounts::new(1, 1),
            elapsed: Duration::from_micros(40),
        }));
        assert!(report.is_success());
        report.push(failing_record());
        assert!(!report.is_success());
        assert_eq!(report.failed().count(), 1);
        assert_eq!(
            report
                .record(ExecutionContext::UnmanagedPool)
                .map(|record| record.verdict),
            Some(Verdict::Fail)
        );
    }

    #[test]
    fn summary_lists_every_scenario() {
        let mut report = HarnessReport::new("run");
        report.push(failing_record());
        let rendered = report.to_string();
        assert!(rendered.contains("FAIL  unmanaged-pool"));
        assert!(rendered.contains("With Namespace: expected 1 but found 0"));
        assert!(rendered.ends_with("1 scenario(s), 0 passed, 1 not passed"));
    }

    #[test]
    fn json_uses_context_names() {
        let mut report = HarnessReport::new("run");
        report.push(failing_record());
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("json")).expect("valid json");
        assert_eq!(json["scenarios"][0]["context"], "unmanaged-pool");
        assert_eq!(json["scenarios"][0]["verdict"], "fail");
        assert_eq!(json["scenarios"][0]["failures"][0]["actual"], 0);
    }
}
