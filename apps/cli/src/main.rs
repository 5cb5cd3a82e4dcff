//! docsmith CLI: static documentation builder.
//!
//! Resolves the build context from layered defaults and overrides, selects
//! a build action, runs the pipeline, and supervises process lifecycle.

mod bridge;
mod commands;
mod reporter;
mod supervisor;

use clap::Parser;

use commands::Cli;

#[tokio::main]
async fn main() {
    color_eyre::install().ok();

    // The raw token list, kept for free-text action selection: an action
    // name may appear anywhere in the invocation, not only where clap
    // expects a positional.
    let raw_tokens: Vec<String> = std::env::args().collect();

    let cli = Cli::parse();
    commands::init_tracing(&cli);

    if let Err(err) = commands::run(cli, &raw_tokens).await {
        supervisor::request_exit(supervisor::FAILURE);
        eprintln!("Error: {err:#}");
    }

    let code = supervisor::pending_exit();
    if code != supervisor::SUCCESS {
        // Hard termination: the watcher threads or the runtime may hold
        // the process open after a fatal error. Never reached with a
        // zero code.
        std::process::exit(code);
    }
}
