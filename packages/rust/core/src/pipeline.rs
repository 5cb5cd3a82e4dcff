//! The build pipeline: one callable per action.
//!
//! Every action takes the resolved context by reference and an [`EventSink`]
//! for subtask lifecycle notifications, and returns an explicit async
//! result. One-shot actions (`clean`, `build`, `lint`) complete exactly
//! once; [`watch`] is long-running and only returns on a fatal error.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use docsmith_shared::{DocsmithError, ResolvedContext, Result};

use crate::event::EventSink;
use crate::tasks::{self, BuildId};

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Result of the `clean` action.
#[derive(Debug)]
pub struct CleanSummary {
    /// Directories that existed and were removed.
    pub removed: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Result of the `build` action.
#[derive(Debug)]
pub struct BuildSummary {
    /// Build identifier recorded in the manifest.
    pub id: BuildId,
    /// Number of asset files copied.
    pub asset_count: usize,
    /// Number of top-level data keys merged.
    pub data_key_count: usize,
    /// Output directory.
    pub dist: PathBuf,
    pub elapsed: Duration,
}

/// Result of the `lint` action.
#[derive(Debug)]
pub struct LintSummary {
    /// Config and data files that were checked.
    pub files_checked: usize,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Subtask wrapper
// ---------------------------------------------------------------------------

/// Run one named subtask, bracketing it with lifecycle events.
fn step<T>(events: &EventSink, name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    events.start(name);
    match f() {
        Ok(value) => {
            events.stop(name);
            Ok(value)
        }
        Err(err) => {
            events.error(name, err.to_string());
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// clean
// ---------------------------------------------------------------------------

/// Remove the generated output directories (`dist`, `temp`).
#[instrument(skip_all, fields(dist = %ctx.dist.display()))]
pub async fn clean(ctx: &ResolvedContext, events: &EventSink) -> Result<CleanSummary> {
    let start = Instant::now();
    let mut removed = Vec::new();

    for (name, dir) in [("dist", &ctx.dist), ("temp", &ctx.temp)] {
        let was_removed = step(events, name, || tasks::clean_dir(dir))?;
        if was_removed {
            removed.push(dir.clone());
        }
    }

    info!(removed = removed.len(), "clean complete");
    Ok(CleanSummary {
        removed,
        elapsed: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// Run a one-shot site build.
///
/// Subtasks: `prepare` (output dirs), `config` (merge the config file
/// list), `assets` (checksummed copy), `data` (merge `data/*.json`),
/// `manifest` (write `dist/build-manifest.json`).
#[instrument(skip_all, fields(env = %ctx.env, dist = %ctx.dist.display()))]
pub async fn build(
    ctx: &ResolvedContext,
    events: &EventSink,
    tool_version: &str,
) -> Result<BuildSummary> {
    let start = Instant::now();

    step(events, "prepare", || tasks::prepare_dirs(ctx))?;

    let settings = step(events, "config", || tasks::merge_config_files(&ctx.config))?;

    let assets = step(events, "assets", || {
        tasks::copy_assets(&ctx.assets, &ctx.dist.join("assets"))
    })?;

    let data = step(events, "data", || {
        let merged = tasks::merge_data_dir(&ctx.data)?;
        tasks::write_data(&ctx.dist, &merged)?;
        Ok(merged)
    })?;
    let data_keys: Vec<String> = data.keys().cloned().collect();

    let manifest = step(events, "manifest", || {
        tasks::write_build_manifest(ctx, tool_version, settings, assets, data_keys)
    })?;

    let summary = BuildSummary {
        id: manifest.id.clone(),
        asset_count: manifest.assets.len(),
        data_key_count: manifest.data_keys.len(),
        dist: ctx.dist.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        build_id = %summary.id,
        assets = summary.asset_count,
        data_keys = summary.data_key_count,
        elapsed_ms = summary.elapsed.as_millis(),
        "build complete"
    );

    Ok(summary)
}

// ---------------------------------------------------------------------------
// lint
// ---------------------------------------------------------------------------

/// Validate the context's inputs without writing anything.
///
/// Checks that every config file exists and parses, that the assets and
/// data directories exist, and that every data file parses. All issues are
/// collected before failing so one run reports everything.
#[instrument(skip_all)]
pub async fn lint(ctx: &ResolvedContext, events: &EventSink) -> Result<LintSummary> {
    let start = Instant::now();
    let mut issues: Vec<String> = Vec::new();
    let mut files_checked = 0usize;

    events.start("lint");

    for path in &ctx.config {
        files_checked += 1;
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
                    issues.push(format!("{}: invalid JSON: {e}", path.display()));
                }
            }
            Err(_) => issues.push(format!("{}: config file not found", path.display())),
        }
    }

    for (name, dir) in [("assets", &ctx.assets), ("data", &ctx.data)] {
        if !dir.is_dir() {
            issues.push(format!("{name} directory missing: {}", dir.display()));
        }
    }

    if ctx.data.is_dir() {
        match tasks::merge_data_dir(&ctx.data) {
            Ok(merged) => files_checked += merged.len(),
            Err(e) => issues.push(e.to_string()),
        }
    }

    if issues.is_empty() {
        events.stop("lint");
        info!(files_checked, "lint passed");
        Ok(LintSummary {
            files_checked,
            elapsed: start.elapsed(),
        })
    } else {
        let detail = issues.join("; ");
        events.error("lint", detail.as_str());
        Err(DocsmithError::validation(detail))
    }
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

/// Rebuild whenever the watched inputs change. Never completes under
/// normal operation.
///
/// Callers run [`build`] once before this to produce the initial output;
/// `watch` only owns the change-triggered rebuild loop. Watched roots are
/// the assets and data directories plus every config file; the output
/// directories are deliberately not watched, or each rebuild would
/// retrigger itself.
#[instrument(skip_all, fields(assets = %ctx.assets.display(), data = %ctx.data.display()))]
pub async fn watch(
    ctx: &ResolvedContext,
    events: &EventSink,
    tool_version: &str,
) -> Result<()> {
    use notify::Watcher;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut watcher =
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove() {
                    let _ = tx.send(());
                }
            }
            Err(err) => {
                warn!(error = %err, "watcher error");
            }
        })
        .map_err(|e| DocsmithError::pipeline(format!("failed to start watcher: {e}")))?;

    let mut watched = 0usize;
    for (path, mode) in watch_roots(ctx) {
        if path.exists() {
            watcher
                .watch(&path, mode)
                .map_err(|e| DocsmithError::pipeline(format!("{}: {e}", path.display())))?;
            watched += 1;
        } else {
            warn!(path = %path.display(), "watch root missing, skipping");
        }
    }

    if watched == 0 {
        return Err(DocsmithError::pipeline(
            "nothing to watch: no config, assets, or data paths exist",
        ));
    }

    info!(watched, "watching for changes");

    while rx.recv().await.is_some() {
        // Let a burst of filesystem events settle, then drain the backlog
        // so one save triggers one rebuild.
        tokio::time::sleep(Duration::from_millis(150)).await;
        while rx.try_recv().is_ok() {}

        events.start("rebuild");
        match build(ctx, events, tool_version).await {
            Ok(summary) => {
                events.stop("rebuild");
                info!(build_id = %summary.id, "rebuild complete");
            }
            Err(err) => {
                events.error("rebuild", err.to_string());
                return Err(err);
            }
        }
    }

    Ok(())
}

/// The paths a watch run observes for changes.
fn watch_roots(ctx: &ResolvedContext) -> Vec<(PathBuf, notify::RecursiveMode)> {
    let mut roots = vec![
        (ctx.assets.clone(), notify::RecursiveMode::Recursive),
        (ctx.data.clone(), notify::RecursiveMode::Recursive),
    ];
    for config in &ctx.config {
        roots.push((config.clone(), notify::RecursiveMode::NonRecursive));
    }
    roots
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
