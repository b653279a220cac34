//! ---
//! nsp_section: "01-core-functionality"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Shared primitives and utilities for the probe harness."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Tracing setup for harness runs: a console layer on stderr plus a daily
//! rolling JSON file.

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "NSPROBE_LOG";
const DEFAULT_FILE_PREFIX: &str = "nsprobe";

/// Flush guards for the non-blocking writers, held for the process lifetime.
static WRITER_GUARDS: OnceCell<[WorkerGuard; 2]> = OnceCell::new();

/// Console output style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    StructuredJson,
    Pretty,
}

/// Filter taken from `NSPROBE_LOG`, then `RUST_LOG`, falling back to `info`.
///
/// An unparsable `NSPROBE_LOG` is reported on stderr and ignored.
pub fn env_filter() -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV) {
        match EnvFilter::try_new(&directive) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("ignoring {LOG_ENV}={directive:?}: {err}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn console_layer<S>(format: LogFormat, writer: NonBlocking) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = fmt::layer()
        .with_thread_names(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(writer);
    match format {
        LogFormat::StructuredJson => layer.with_target(false).json().boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

/// Install the global subscriber described by `config`.
///
/// The log directory is created when missing. A subscriber installed earlier
/// wins; the call then only prepares the directory.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)?;
    let prefix = config.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX);

    let (file_writer, file_guard) =
        tracing_appender::non_blocking(daily(&config.directory, format!("{prefix}.log")));
    let (console_writer, console_guard) = tracing_appender::non_blocking(std::io::stderr());

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer(config.format, console_writer))
        .with(
            fmt::layer()
                .with_thread_names(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .json()
                .with_writer(file_writer),
        )
        .try_init()
        .is_ok();

    if installed {
        let _ = WRITER_GUARDS.set([file_guard, console_guard]);
        info!(
            log_dir = %config.directory.display(),
            file_prefix = prefix,
            format = ?config.format,
            "tracing initialised"
        );
    }
    Ok(())
}
