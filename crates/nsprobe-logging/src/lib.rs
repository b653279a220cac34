//! ---
//! nsp_section: "03-logging"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Structured logging adapters for scenario runs."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for development and tests.
///
/// The filter comes from `NSPROBE_LOG`, then `RUST_LOG`, then `info`. Output goes
/// to stderr so stdout stays free for reports.
pub fn init() {
    let filter = std::env::var("NSPROBE_LOG")
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(Level::INFO.into()));
    let _ = Registry::default()
        .with(filter)
        .with(
            subscriber_fmt::layer()
                .with_thread_names(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Harness run identifier.
    pub run: Option<&'a str>,
    /// Execution context the scenario is dispatched through.
    pub context: Option<&'a str>,
    /// Scenario lifecycle state.
    pub state: Option<&'a str>,
    /// Tag name under probe.
    pub tag: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a run identifier.
    pub fn with_run(mut self, run: &'a str) -> Self {
        self.run = Some(run);
        self
    }

    /// Attach an execution context name.
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach a scenario state.
    pub fn with_state(mut self, state: &'a str) -> Self {
        self.state = Some(state);
        self
    }

    /// Attach the probed tag name.
    pub fn with_tag(mut self, tag: &'a str) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// High-level outcome used when emitting scenario lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioEventOutcome {
    /// The scenario step completed successfully.
    Success,
    /// The scenario step failed or errored.
    Fault,
}

impl ScenarioEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            ScenarioEventOutcome::Success => "success",
            ScenarioEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized scenario event with a success/fault outcome.
pub fn log_scenario_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: ScenarioEventOutcome,
) {
    let default = LogContext::default();
    let ctx = context.unwrap_or(&default);
    match outcome {
        ScenarioEventOutcome::Success => tracing::info!(
            event,
            outcome = outcome.as_str(),
            run = ctx.run.unwrap_or(""),
            context = ctx.context.unwrap_or(""),
            state = ctx.state.unwrap_or(""),
            tag = ctx.tag.unwrap_or(""),
            message = %message
        ),
        ScenarioEventOutcome::Fault => tracing::error!(
            event,
            outcome = outcome.as_str(),
            run = ctx.run.unwrap_or(""),
            context = ctx.context.unwrap_or(""),
            state = ctx.state.unwrap_or(""),
            tag = ctx.tag.unwrap_or(""),
            message = %message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new()
            .with_context("primary-ui")
            .with_tag("html");
        probe_info!(context = ctx.clone(), "probe submitted");
        probe_debug!("debug message");
        probe_error!(context = ctx, "mismatch count: {}", 2);
    }

    #[test]
    fn scenario_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_run("run-1").with_state("done");
        log_scenario_event(
            Some(&ctx),
            "scenario.finished",
            "scenario passed",
            ScenarioEventOutcome::Success,
        );
        log_scenario_event(
            None,
            "scenario.finished",
            "scenario failed",
            ScenarioEventOutcome::Fault,
        );
    }
}
