//! CLI definition, tracing setup, and the task orchestrator.

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use docsmith_core::{Action, EventSink, pipeline};
use docsmith_shared::{ContextOverrides, ResolvedContext, load_workspace_config, profiles_from};

use crate::bridge;
use crate::reporter::Reporter;
use crate::supervisor;

/// Version string recorded in build manifests and shown by `--version`.
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsmith: a static documentation builder.
#[derive(Parser)]
#[command(
    name = "docsmith",
    version,
    about = "Build static documentation sites from config, assets, and data.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Action to run: clean, build, lint, or watch. Defaults to build.
    ///
    /// The action name may appear anywhere in the invocation; with several
    /// present, the priority order clean, build, lint, watch decides.
    #[arg(value_name = "ACTION", num_args = 0..)]
    pub tokens: Vec<String>,

    /// Use a named example profile instead of the defaults.
    #[arg(long, value_name = "NAME")]
    pub example: Option<String>,

    /// Config file path, or a comma-separated list of config files.
    #[arg(long, value_name = "PATHS")]
    pub config: Option<String>,

    /// Assets directory.
    #[arg(long, value_name = "PATH")]
    pub assets: Option<String>,

    /// Data directory.
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Output directory.
    #[arg(long, value_name = "PATH")]
    pub dist: Option<String>,

    /// Scratch directory for intermediate build state.
    #[arg(long, value_name = "PATH")]
    pub temp: Option<String>,

    /// Build environment: development or production.
    #[arg(long, value_name = "ENV")]
    pub env: Option<String>,

    /// Suppress the banner and context dump.
    #[arg(long, short)]
    pub quiet: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn overrides(&self) -> ContextOverrides {
        ContextOverrides {
            config: self.config.clone(),
            assets: self.assets.clone(),
            data: self.data.clone(),
            dist: self.dist.clone(),
            temp: self.temp.clone(),
            env: self.env.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsmith_shared=info,docsmith_core=info,docsmith_cli=info",
        1 => "docsmith_shared=debug,docsmith_core=debug,docsmith_cli=debug",
        _ => "docsmith_shared=trace,docsmith_core=trace,docsmith_cli=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Task orchestration
// ---------------------------------------------------------------------------

/// Run one build action end to end.
///
/// Selects the action from the raw argv tokens, resolves the context, arms
/// the supervisor, attaches the event bridge for logging-worthy actions,
/// drives the spinner, and invokes the pipeline. The resolved context is
/// owned here and lent to the pipeline by reference for the duration of
/// the run.
pub(crate) async fn run(cli: Cli, raw_tokens: &[String]) -> Result<()> {
    let action = Action::select(raw_tokens);
    tracing::debug!(selected = %action, positional = ?cli.tokens, "action selection");

    let cwd = std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let workspace = load_workspace_config(&cwd)?;
    let profiles = profiles_from(&workspace);
    let ctx = docsmith_shared::resolve(&cli.overrides(), cli.example.as_deref(), &profiles, &cwd)?;

    if !cli.quiet {
        print_banner(&ctx);
    }

    info!(%action, env = %ctx.env, "starting action");

    let reporter = Arc::new(Reporter::new());
    supervisor::arm(reporter.clone());

    let (events, rx) = EventSink::channel();
    let bridge = if action.is_logging_worthy() {
        Some(bridge::spawn(rx))
    } else {
        // One-shot actions stay quiet; the unread events are discarded.
        drop(rx);
        None
    };

    reporter.start(&format!("Running {action}"));

    let outcome: docsmith_shared::Result<()> = match action {
        Action::Clean => match pipeline::clean(&ctx, &events).await {
            Ok(summary) => {
                reporter.finish(action);
                print_clean_summary(&summary);
                Ok(())
            }
            Err(err) => Err(err),
        },
        Action::Build => match pipeline::build(&ctx, &events, VERSION).await {
            Ok(summary) => {
                reporter.finish(action);
                print_build_summary(&summary);
                Ok(())
            }
            Err(err) => Err(err),
        },
        Action::Lint => match pipeline::lint(&ctx, &events).await {
            Ok(summary) => {
                reporter.finish(action);
                print_lint_summary(&summary);
                Ok(())
            }
            Err(err) => Err(err),
        },
        Action::Watch => match pipeline::build(&ctx, &events, VERSION).await {
            Ok(_) => {
                // The initial build is the watch action's "completion":
                // apply the keep-running rule, then hand over to the
                // perpetual rebuild loop, which only returns fatally.
                reporter.finish(action);
                pipeline::watch(&ctx, &events, VERSION).await
            }
            Err(err) => Err(err),
        },
    };

    drop(events);
    if let Some(handle) = bridge {
        let _ = handle.await;
    }

    match outcome {
        Ok(()) => Ok(()),
        Err(err) => {
            reporter.fail(&format!("{action} failed"));
            supervisor::request_exit(supervisor::FAILURE);
            Err(err.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_banner(ctx: &ResolvedContext) {
    println!("docsmith v{VERSION}");
    println!();
    for (name, value) in ctx.display_fields() {
        println!("  {name:<7} {value}");
    }
    println!();
}

fn print_clean_summary(summary: &pipeline::CleanSummary) {
    println!();
    if summary.removed.is_empty() {
        println!("  Nothing to clean.");
    } else {
        println!("  Removed:");
        for dir in &summary.removed {
            println!("    {}", dir.display());
        }
    }
    println!("  Time:   {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn print_build_summary(summary: &pipeline::BuildSummary) {
    println!();
    println!("  Build finished!");
    println!("  ID:     {}", summary.id);
    println!("  Assets: {}", summary.asset_count);
    println!("  Data:   {}", summary.data_key_count);
    println!("  Output: {}", summary.dist.display());
    println!("  Time:   {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn print_lint_summary(summary: &pipeline::LintSummary) {
    println!();
    println!("  Checked {} file(s), no issues found.", summary.files_checked);
    println!("  Time:   {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}
