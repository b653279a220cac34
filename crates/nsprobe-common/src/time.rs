//! ---
//! nsp_section: "01-core-functionality"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Shared primitives and utilities for the probe harness."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

/// Capture an instant suitable for elapsed-time reporting.
pub fn monotonic_now() -> Instant {
    Instant::now()
}

/// Convert a duration into microseconds, saturating at `u64::MAX`.
pub fn duration_to_micros(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_mul(1_000_000)
        .saturating_add(u64::from(duration.subsec_micros()))
}

/// Render a duration as fractional milliseconds for human-facing reports.
pub fn millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
