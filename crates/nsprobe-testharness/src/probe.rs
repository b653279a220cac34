//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use nsprobe_common::XHTML_NAMESPACE;
use nsprobe_dom::Document;
use nsprobe_sync::{CompletionLatch, LatchError};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The two lengths a probe observes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeCounts {
    /// Matches of the namespace-unaware lookup.
    pub plain: usize,
    /// Matches of the namespace-aware lookup.
    pub namespaced: usize,
}

impl ProbeCounts {
    pub fn new(plain: usize, namespaced: usize) -> Self {
        Self { plain, namespaced }
    }
}

/// Measurement executed inside an execution context.
pub trait Probe: Send + Sync {
    fn measure(&self, document: &Document) -> ProbeCounts;
}

impl<F> Probe for F
where
    F: Fn(&Document) -> ProbeCounts + Send + Sync,
{
    fn measure(&self, document: &Document) -> ProbeCounts {
        self(document)
    }
}

/// Counts elements named `tag_name`, with and without a namespace constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNameProbe {
    tag_name: String,
    namespace_uri: Option<String>,
}

impl TagNameProbe {
    pub fn new(tag_name: impl Into<String>, namespace_uri: Option<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            namespace_uri,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }
}

impl Default for TagNameProbe {
    fn default() -> Self {
        Self::new("html", Some(XHTML_NAMESPACE.to_owned()))
    }
}

impl Probe for TagNameProbe {
    fn measure(&self, document: &Document) -> ProbeCounts {
        let plain = document.get_elements_by_tag_name(&self.tag_name).len();
        let namespaced = document
            .get_elements_by_tag_name_ns(self.namespace_uri.as_deref(), &self.tag_name)
            .len();
        ProbeCounts { plain, namespaced }
    }
}

/// Counts written by a probe task, plus the latch announcing them.
///
/// Created fresh for every scenario. The probe side calls [`record`] once;
/// the runner side calls [`await_counts`].
///
/// [`record`]: ProbeResult::record
/// [`await_counts`]: ProbeResult::await_counts
#[derive(Debug, Default)]
pub struct ProbeResult {
    counts: OnceCell<ProbeCounts>,
    latch: CompletionLatch,
}

impl ProbeResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `counts`, then signal. Signalling is the last action so a waiter
    /// never observes the latch done without the counts in place.
    ///
    /// Returns `false` if counts were already recorded; the first write wins.
    pub fn record(&self, counts: ProbeCounts) -> bool {
        let stored = self.counts.set(counts).is_ok();
        if !stored {
            warn!(?counts, "probe result already recorded; ignoring second write");
        }
        self.latch.signal();
        stored
    }

    /// Run `measure` and record what it returns.
    ///
    /// A panicking measurement never records; the waiter is interrupted
    /// instead, whichever thread the measurement ran on.
    pub fn record_from<F>(&self, measure: F) -> bool
    where
        F: FnOnce() -> ProbeCounts,
    {
        match panic::catch_unwind(AssertUnwindSafe(measure)) {
            Ok(counts) => self.record(counts),
            Err(_) => {
                warn!("measurement panicked; interrupting waiter");
                self.interrupt();
                false
            }
        }
    }

    /// Wake the waiting runner with an interruption error.
    pub fn interrupt(&self) {
        self.latch.interrupt();
    }

    pub fn is_recorded(&self) -> bool {
        self.latch.is_signaled()
    }

    /// Block until the probe recorded its counts, optionally bounded.
    pub fn await_counts(&self, timeout: Option<Duration>) -> Result<ProbeCounts, LatchError> {
        match timeout {
            Some(timeout) => self.latch.wait_timeout(timeout)?,
            None => self.latch.wait()?,
        }
        // The latch is only signalled by `record`, after the counts are set.
        Ok(self.counts.get().copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use nsprobe_dom::parse_document;

    use super::*;
    use crate::fixtures::{XHTML_CONTENT_TYPE, XHTML_TEST_PAGE};

    #[test]
    fn tag_name_probe_counts_both_lookups() {
        let document = parse_document(XHTML_TEST_PAGE, XHTML_CONTENT_TYPE).expect("parse");
        assert_eq!(
            TagNameProbe::default().measure(&document),
            ProbeCounts::new(1, 1)
        );
        assert_eq!(
            TagNameProbe::new("html", Some("urn:example:other".into())).measure(&document),
            ProbeCounts::new(1, 0)
        );
        assert_eq!(
            TagNameProbe::new("table", Some(XHTML_NAMESPACE.into())).measure(&document),
            ProbeCounts::new(0, 0)
        );
    }

    #[test]
    fn closures_are_probes() {
        let document = parse_document(XHTML_TEST_PAGE, XHTML_CONTENT_TYPE).expect("parse");
        let probe = |doc: &Document| ProbeCounts::new(doc.get_elements_by_tag_name("*").len(), 0);
        assert_eq!(probe.measure(&document).plain, 5);
    }

    #[test]
    fn recorded_counts_are_visible_to_waiter() {
        let result = Arc::new(ProbeResult::new());
        let writer = Arc::clone(&result);
        thread::spawn(move || {
            writer.record(ProbeCounts::new(1, 1));
        });
        assert_eq!(
            result.await_counts(Some(Duration::from_secs(5))),
            Ok(ProbeCounts::new(1, 1))
        );
        assert!(result.is_recorded());
    }

    #[test]
    fn first_record_wins() {
        let result = ProbeResult::new();
        assert!(result.record(ProbeCounts::new(1, 1)));
        assert!(!result.record(ProbeCounts::new(7, 7)));
        assert_eq!(result.await_counts(None), Ok(ProbeCounts::new(1, 1)));
    }

    #[test]
    fn panicking_measurement_interrupts_instead_of_recording() {
        let result = Arc::new(ProbeResult::new());
        let writer = Arc::clone(&result);
        thread::spawn(move || {
            writer.record_from(|| panic!("lookup failed"));
        });
        assert_eq!(
            result.await_counts(None),
            Err(LatchError::Interrupted)
        );
        assert!(!result.is_recorded());
    }

    #[test]
    fn record_from_stores_returned_counts() {
        let result = ProbeResult::new();
        assert!(result.record_from(|| ProbeCounts::new(1, 0)));
        assert_eq!(result.await_counts(None), Ok(ProbeCounts::new(1, 0)));
    }

    #[test]
    fn interruption_surfaces_as_error() {
        let result = ProbeResult::new();
        result.interrupt();
        assert_eq!(result.await_counts(None), Err(LatchError::Interrupted));
    }
}
