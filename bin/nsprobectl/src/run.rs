//! ---
//! nsp_section: "07-interfaces"
//! nsp_subsection: "binary"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Control CLI running probe scenarios from the shell."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use nsprobe_common::{init_tracing, HarnessConfig};
use nsprobe_exec::{DispatchTable, ExecutionContext};
use nsprobe_logging as logging;
use nsprobe_testharness::{load_document_from_config, ScenarioRunner};
use tracing::info;

const DEFAULT_CONFIG_CANDIDATES: &[&str] = &["nsprobe.toml", "configs/nsprobe.toml"];

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration file; `NSPROBE_CONFIG` or ./nsprobe.toml are used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Markup file to load instead of the built-in XHTML test page.
    #[arg(long)]
    document: Option<PathBuf>,
    #[arg(long)]
    content_type: Option<String>,
    #[arg(long = "tag")]
    tag_name: Option<String>,
    /// Namespace URI for the namespace-aware lookup; empty means no namespace.
    #[arg(long = "namespace")]
    namespace_uri: Option<String>,
    #[arg(long)]
    expect_plain: Option<usize>,
    #[arg(long)]
    expect_namespaced: Option<usize>,
    #[arg(long)]
    probe_timeout_ms: Option<u64>,
    /// Restrict the run to these contexts (repeatable); all by default.
    #[arg(long = "context", value_parser = parse_context)]
    contexts: Vec<ExecutionContext>,
    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,
    /// Write structured logs through the configured tracing sinks.
    #[arg(long)]
    log_to_file: bool,
}

fn parse_context(value: &str) -> Result<ExecutionContext, String> {
    value.parse().map_err(|_| {
        let known = ExecutionContext::all()
            .map(ExecutionContext::name)
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown execution context `{value}` (known: {known})")
    })
}

fn config_requested() -> bool {
    std::env::var(HarnessConfig::ENV_CONFIG_PATH).is_ok_and(|value| !value.trim().is_empty())
        || DEFAULT_CONFIG_CANDIDATES
            .iter()
            .any(|candidate| Path::new(candidate).exists())
}

fn resolve_config(args: &RunArgs) -> Result<(HarnessConfig, Option<PathBuf>)> {
    let (mut config, source) = match &args.config {
        Some(path) => (HarnessConfig::load(&[path])?, Some(path.clone())),
        None if config_requested() => {
            let loaded = HarnessConfig::load_with_source(DEFAULT_CONFIG_CANDIDATES)?;
            (loaded.config, Some(loaded.source))
        }
        None => (HarnessConfig::default(), None),
    };
    if let Some(path) = &args.document {
        config.document.path = Some(path.clone());
    }
    if let Some(content_type) = &args.content_type {
        config.document.content_type = content_type.clone();
    }
    if let Some(tag_name) = &args.tag_name {
        config.document.tag_name = tag_name.clone();
    }
    if let Some(namespace_uri) = &args.namespace_uri {
        config.document.namespace_uri =
            (!namespace_uri.is_empty()).then(|| namespace_uri.clone());
    }
    if let Some(plain) = args.expect_plain {
        config.expectation.plain = plain;
    }
    if let Some(namespaced) = args.expect_namespaced {
        config.expectation.namespaced = namespaced;
    }
    if let Some(probe_ms) = args.probe_timeout_ms {
        config.timeouts.probe = Some(Duration::from_millis(probe_ms));
    }
    config.validate()?;
    Ok((config, source))
}

pub fn run(args: RunArgs) -> Result<ExitCode> {
    let (config, source) = resolve_config(&args)?;
    if args.log_to_file {
        init_tracing(&config.logging)?;
    } else {
        logging::init();
    }
    match &source {
        Some(path) => info!(config = %path.display(), "configuration loaded"),
        None => info!("no configuration file; using built-in defaults"),
    }

    let table = DispatchTable::start(&config.executor).context("starting dispatchers")?;
    let document = load_document_from_config(&table, &config)?;
    let runner = ScenarioRunner::from_config(document, &table, &config);

    let report = if args.contexts.is_empty() {
        runner.run_all(ExecutionContext::all())
    } else {
        runner.run_all(args.contexts.iter().copied())
    };
    table.shutdown();

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn list_contexts() {
    for context in ExecutionContext::all() {
        let mode = if context.is_asynchronous() {
            "async"
        } else {
            "sync"
        };
        println!("{:<15} {:<6} {}", context.name(), mode, context.description());
    }
}
