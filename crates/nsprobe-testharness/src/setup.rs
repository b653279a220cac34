//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Setup phase: load the shared document once, before any scenario runs.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use nsprobe_common::HarnessConfig;
use nsprobe_dom::{Document, DocumentLoader, LoadState};
use nsprobe_exec::{DispatchTable, ExecutionContext};
use nsprobe_sync::{CompletionLatch, LatchError};
use tracing::{error, info};

use crate::error::HarnessError;
use crate::fixtures::XHTML_TEST_PAGE;

/// Load `markup` on the primary UI thread and block until it is available.
///
/// A state listener turns the loader's `Succeeded` notification into a latch
/// signal; `Failed` and `Cancelled` interrupt the wait so a broken document is
/// reported at once rather than after `timeout`.
pub fn load_shared_document(
    dispatch: &DispatchTable,
    markup: &str,
    content_type: &str,
    timeout: Duration,
) -> Result<Arc<Document>, HarnessError> {
    let loader = DocumentLoader::new();
    let loaded = Arc::new(CompletionLatch::new());
    {
        let loaded = Arc::clone(&loaded);
        loader.add_state_listener(move |_, next| match next {
            LoadState::Succeeded => {
                loaded.signal();
            }
            LoadState::Failed | LoadState::Cancelled => loaded.interrupt(),
            _ => {}
        });
    }

    let task_loader = loader.clone();
    let markup = markup.to_owned();
    let content_type = content_type.to_owned();
    dispatch
        .submit(ExecutionContext::PrimaryUi, move || {
            if let Err(err) = task_loader.load_content(markup, content_type) {
                error!(error = %err, "document load could not start");
            }
        })
        .map_err(|err| HarnessError::Setup {
            reason: format!("unable to schedule document load: {err}"),
        })?;

    match loaded.wait_timeout(timeout) {
        Ok(()) => {
            let document = loader.document().ok_or_else(|| HarnessError::Setup {
                reason: "loader reported success without a document".to_owned(),
            })?;
            info!(
                kind = %document.kind(),
                nodes = document.node_count(),
                "shared document ready"
            );
            Ok(document)
        }
        Err(LatchError::Interrupted) => Err(HarnessError::Setup {
            reason: loader
                .error()
                .unwrap_or_else(|| format!("document load ended as {}", loader.state())),
        }),
        Err(LatchError::TimedOut { waited }) => {
            loader.cancel();
            Err(HarnessError::Setup {
                reason: format!("document not loaded within {waited:?}"),
            })
        }
    }
}

/// Load the document named by `config`, or the built-in XHTML test page.
pub fn load_document_from_config(
    dispatch: &DispatchTable,
    config: &HarnessConfig,
) -> Result<Arc<Document>, HarnessError> {
    let markup = match &config.document.path {
        Some(path) => fs::read_to_string(path).map_err(|err| HarnessError::Setup {
            reason: format!("unable to read {}: {err}", path.display()),
        })?,
        None => XHTML_TEST_PAGE.to_owned(),
    };
    load_shared_document(
        dispatch,
        &markup,
        &config.document.content_type,
        config.timeouts.setup,
    )
}
