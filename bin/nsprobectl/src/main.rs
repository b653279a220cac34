//! ---
//! nsp_section: "07-interfaces"
//! nsp_subsection: "binary"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Control CLI running probe scenarios from the shell."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nsprobe_logging as logging;

mod run;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Probe namespace-aware element lookups from every execution context",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Load a document and run the probe through execution contexts")]
    Run(run::RunArgs),
    #[command(about = "List the available execution contexts")]
    Contexts,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Contexts => {
            logging::init();
            run::list_contexts();
            Ok(ExitCode::SUCCESS)
        }
    }
}
