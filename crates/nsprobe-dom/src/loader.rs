//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Document model, markup parsing and asynchronous loading."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::sync::Arc;
use std::thread;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::parser::parse_document;

/// Lifecycle of the load worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadState {
    Ready,
    Scheduled,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl LoadState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LoadState::Succeeded | LoadState::Failed | LoadState::Cancelled
        )
    }

    fn is_active(self) -> bool {
        matches!(self, LoadState::Scheduled | LoadState::Running)
    }
}

type StateListener = Arc<dyn Fn(LoadState, LoadState) + Send + Sync>;

#[derive(Debug)]
struct LoaderInner {
    state: LoadState,
    generation: u64,
    document: Option<Arc<Document>>,
    error: Option<String>,
}

struct LoaderShared {
    inner: Mutex<LoaderInner>,
    listeners: RwLock<Vec<StateListener>>,
}

impl LoaderShared {
    /// Move to `next` if the load identified by `generation` is still current
    /// and `guard` accepts the present state. Listeners run outside the lock.
    fn transition<F>(&self, generation: u64, next: LoadState, guard: F) -> bool
    where
        F: FnOnce(&mut LoaderInner) -> bool,
    {
        let previous = {
            let mut inner = self.inner.lock();
            if inner.generation != generation || !guard(&mut inner) {
                return false;
            }
            let previous = inner.state;
            inner.state = next;
            previous
        };
        self.notify(previous, next);
        true
    }

    fn notify(&self, previous: LoadState, next: LoadState) {
        debug!(from = %previous, to = %next, "load state changed");
        let listeners: Vec<StateListener> = self.listeners.read().clone();
        for listener in listeners {
            listener(previous, next);
        }
    }
}

/// Asynchronous document loader with state-change notifications.
///
/// `load_content` returns at once; parsing happens on a dedicated loader
/// thread and every state transition is reported to the registered listeners
/// as `(previous, next)`.
#[derive(Clone)]
pub struct DocumentLoader {
    shared: Arc<LoaderShared>,
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("DocumentLoader")
            .field("state", &inner.state)
            .field("generation", &inner.generation)
            .field("has_document", &inner.document.is_some())
            .finish()
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(LoaderShared {
                inner: Mutex::new(LoaderInner {
                    state: LoadState::Ready,
                    generation: 0,
                    document: None,
                    error: None,
                }),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a listener invoked with `(previous, next)` on every transition.
    pub fn add_state_listener<F>(&self, listener: F)
    where
        F: Fn(LoadState, LoadState) + Send + Sync + 'static,
    {
        self.shared.listeners.write().push(Arc::new(listener));
    }

    pub fn state(&self) -> LoadState {
        self.shared.inner.lock().state
    }

    /// The loaded document, once the loader reached [`LoadState::Succeeded`].
    pub fn document(&self) -> Option<Arc<Document>> {
        let inner = self.shared.inner.lock();
        match inner.state {
            LoadState::Succeeded => inner.document.clone(),
            _ => None,
        }
    }

    /// Reason of the last failed load.
    pub fn error(&self) -> Option<String> {
        self.shared.inner.lock().error.clone()
    }

    /// Start loading `markup` as `content_type` on a loader thread.
    pub fn load_content(
        &self,
        markup: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<()> {
        let markup = markup.into();
        let content_type = content_type.into();

        let (generation, previous) = {
            let mut inner = self.shared.inner.lock();
            if inner.state.is_active() {
                return Err(DomError::LoadInProgress);
            }
            inner.generation += 1;
            inner.document = None;
            inner.error = None;
            let previous = inner.state;
            inner.state = LoadState::Scheduled;
            (inner.generation, previous)
        };
        self.shared.notify(previous, LoadState::Scheduled);

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("nsprobe-loader".into())
            .spawn(move || run_load(shared, generation, markup, content_type));
        if let Err(err) = spawned {
            let reason = format!("unable to spawn loader thread: {err}");
            self.shared.transition(generation, LoadState::Failed, |inner| {
                inner.error = Some(reason);
                true
            });
            return Err(DomError::LoaderSpawn(err));
        }
        Ok(())
    }

    /// Abandon a scheduled or running load. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        let generation = self.shared.inner.lock().generation;
        let cancelled =
            self.shared
                .transition(generation, LoadState::Cancelled, |inner| inner.state.is_active());
        if cancelled {
            info!(generation, "document load cancelled");
        }
        cancelled
    }
}

fn run_load(shared: Arc<LoaderShared>, generation: u64, markup: String, content_type: String) {
    if !shared.transition(generation, LoadState::Running, |inner| {
        inner.state == LoadState::Scheduled
    }) {
        return;
    }

    match parse_document(&markup, &content_type) {
        Ok(document) => {
            let document = Arc::new(document);
            let stored = shared.transition(generation, LoadState::Succeeded, |inner| {
                if inner.state != LoadState::Running {
                    return false;
                }
                inner.document = Some(document);
                true
            });
            if stored {
                info!(content_type = %content_type, "document loaded");
            }
        }
        Err(err) => {
            warn!(content_type = %content_type, error = %err, "document load failed");
            shared.transition(generation, LoadState::Failed, |inner| {
                if inner.state != LoadState::Running {
                    return false;
                }
                inner.error = Some(err.to_string());
                true
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nsprobe_sync::CompletionLatch;

    use super::*;

    fn terminal_latch(loader: &DocumentLoader) -> Arc<CompletionLatch> {
        let latch = Arc::new(CompletionLatch::new());
        let signal = Arc::clone(&latch);
        loader.add_state_listener(move |_, next| {
            if next.is_terminal() {
                signal.signal();
            }
        });
        latch
    }

    #[test]
    fn successful_load_reports_every_transition() {
        let loader = DocumentLoader::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            loader.add_state_listener(move |previous, next| seen.lock().push((previous, next)));
        }
        let done = terminal_latch(&loader);

        loader
            .load_content("<html xmlns=\"http://www.w3.org/1999/xhtml\"/>", "application/xhtml+xml")
            .expect("load starts");
        done.wait_timeout(Duration::from_secs(5)).expect("load finishes");

        assert_eq!(loader.state(), LoadState::Succeeded);
        assert_eq!(
            *seen.lock(),
            vec![
                (LoadState::Ready, LoadState::Scheduled),
                (LoadState::Scheduled, LoadState::Running),
                (LoadState::Running, LoadState::Succeeded),
            ]
        );
        let document = loader.document().expect("document available");
        assert_eq!(document.get_elements_by_tag_name("html").len(), 1);
    }

    #[test]
    fn unsupported_content_type_fails_the_load() {
        let loader = DocumentLoader::new();
        let done = terminal_latch(&loader);
        loader
            .load_content("plain text", "text/plain")
            .expect("load starts");
        done.wait_timeout(Duration::from_secs(5)).expect("load finishes");

        assert_eq!(loader.state(), LoadState::Failed);
        assert!(loader.document().is_none());
        assert!(loader
            .error()
            .expect("error recorded")
            .contains("unsupported content type"));
    }

    #[test]
    fn cancel_without_load_is_a_no_op() {
        let loader = DocumentLoader::new();
        assert!(!loader.cancel());
        assert_eq!(loader.state(), LoadState::Ready);
    }

    #[test]
    fn loader_can_be_reused_after_completion() {
        let loader = DocumentLoader::new();
        let first = terminal_latch(&loader);
        loader
            .load_content("<a/>", "application/xml")
            .expect("first load");
        first.wait_timeout(Duration::from_secs(5)).expect("first finishes");

        let second = terminal_latch(&loader);
        loader
            .load_content("<b><b/></b>", "application/xml")
            .expect("second load");
        second
            .wait_timeout(Duration::from_secs(5))
            .expect("second finishes");

        let document = loader.document().expect("document available");
        assert_eq!(document.get_elements_by_tag_name("b").len(), 2);
        assert_eq!(document.get_elements_by_tag_name("a").len(), 0);
    }
}
