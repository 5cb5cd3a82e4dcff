//! Filesystem subtasks behind the build pipeline.
//!
//! Each function here is one unit of pipeline work: deliberately small,
//! synchronous, and path-driven, so the pipeline can wrap them in
//! lifecycle events and the tests can exercise them directly.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use docsmith_shared::{DocsmithError, ResolvedContext, Result};

/// Current schema version for the build manifest format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// BuildId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for build identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub Uuid);

impl BuildId {
    /// Generate a new time-sortable build identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Build manifest
// ---------------------------------------------------------------------------

/// Checksummed record of one copied asset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Path relative to the assets root, `/`-separated.
    pub path: String,
    pub sha256: String,
    pub size_bytes: u64,
}

/// The `build-manifest.json` structure written at the root of `dist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Unique identifier for this build.
    pub id: BuildId,
    /// Environment the build ran under.
    pub env: String,
    /// Tool version that produced this build.
    pub tool_version: String,
    /// When the build completed.
    pub created_at: DateTime<Utc>,
    /// Merged settings from the context's config file list.
    pub settings: serde_json::Value,
    /// Copied asset files with checksums.
    pub assets: Vec<AssetRecord>,
    /// Top-level keys of the merged data object.
    pub data_keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// clean
// ---------------------------------------------------------------------------

/// Remove a generated directory if it exists. Returns whether anything
/// was removed.
pub fn clean_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path).map_err(|e| DocsmithError::io(path, e))?;
    debug!(path = %path.display(), "removed directory");
    Ok(true)
}

// ---------------------------------------------------------------------------
// prepare
// ---------------------------------------------------------------------------

/// Create the output directories, clearing any stale temp contents.
pub fn prepare_dirs(ctx: &ResolvedContext) -> Result<()> {
    clean_dir(&ctx.temp)?;
    for dir in [&ctx.dist, &ctx.temp] {
        std::fs::create_dir_all(dir).map_err(|e| DocsmithError::io(dir.as_path(), e))?;
    }
    debug!(dist = %ctx.dist.display(), temp = %ctx.temp.display(), "output directories ready");
    Ok(())
}

// ---------------------------------------------------------------------------
// config merge
// ---------------------------------------------------------------------------

/// Read and merge the context's config file list.
///
/// Every file must be a JSON object; objects merge left to right, later
/// files winning on key collision. This is what makes the multi-valued
/// `config` field useful: a base config plus environment-specific extras.
pub fn merge_config_files(paths: &[PathBuf]) -> Result<serde_json::Value> {
    let mut merged = serde_json::Map::new();

    for path in paths {
        let content =
            std::fs::read_to_string(path).map_err(|e| DocsmithError::io(path.as_path(), e))?;
        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            DocsmithError::validation(format!("{}: invalid JSON: {e}", path.display()))
        })?;

        match value {
            serde_json::Value::Object(map) => merged.extend(map),
            _ => {
                return Err(DocsmithError::validation(format!(
                    "{}: expected a JSON object at the top level",
                    path.display()
                )));
            }
        }
    }

    Ok(serde_json::Value::Object(merged))
}

// ---------------------------------------------------------------------------
// assets
// ---------------------------------------------------------------------------

/// Recursively copy the assets directory into `dest`, checksumming every
/// file. A missing assets directory is not an error; the build simply has
/// no assets.
pub fn copy_assets(src: &Path, dest: &Path) -> Result<Vec<AssetRecord>> {
    if !src.is_dir() {
        warn!(path = %src.display(), "assets directory missing, skipping copy");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    copy_tree(src, dest, Path::new(""), &mut records)?;
    records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(records)
}

fn copy_tree(
    src: &Path,
    dest: &Path,
    rel: &Path,
    records: &mut Vec<AssetRecord>,
) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| DocsmithError::io(dest, e))?;

    let entries = std::fs::read_dir(src).map_err(|e| DocsmithError::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DocsmithError::io(src, e))?;
        let path = entry.path();
        let name = entry.file_name();
        let child_rel = rel.join(&name);

        if path.is_dir() {
            copy_tree(&path, &dest.join(&name), &child_rel, records)?;
        } else {
            let target = dest.join(&name);
            std::fs::copy(&path, &target).map_err(|e| DocsmithError::io(&path, e))?;

            let content = std::fs::read(&path).map_err(|e| DocsmithError::io(&path, e))?;
            let mut hasher = Sha256::new();
            hasher.update(&content);

            records.push(AssetRecord {
                path: child_rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                sha256: format!("{:x}", hasher.finalize()),
                size_bytes: content.len() as u64,
            });
            debug!(file = %child_rel.display(), "copied asset");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// data
// ---------------------------------------------------------------------------

/// Merge every `*.json` file in the data directory into one object keyed
/// by file stem. A missing data directory yields an empty object.
pub fn merge_data_dir(dir: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    let mut merged = serde_json::Map::new();

    if !dir.is_dir() {
        return Ok(merged);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| DocsmithError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for path in files {
        let stem = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };
        let content =
            std::fs::read_to_string(&path).map_err(|e| DocsmithError::io(&path, e))?;
        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            DocsmithError::validation(format!("{}: invalid JSON: {e}", path.display()))
        })?;
        merged.insert(stem, value);
    }

    Ok(merged)
}

/// Write the merged data object to `dist/data.json`.
pub fn write_data(
    dist: &Path,
    data: &serde_json::Map<String, serde_json::Value>,
) -> Result<PathBuf> {
    let path = dist.join("data.json");
    write_json(&path, data)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// manifest
// ---------------------------------------------------------------------------

/// Assemble and write `dist/build-manifest.json`.
pub fn write_build_manifest(
    ctx: &ResolvedContext,
    tool_version: &str,
    settings: serde_json::Value,
    assets: Vec<AssetRecord>,
    data_keys: Vec<String>,
) -> Result<BuildManifest> {
    let manifest = BuildManifest {
        schema_version: CURRENT_SCHEMA_VERSION,
        id: BuildId::new(),
        env: ctx.env.to_string(),
        tool_version: tool_version.to_string(),
        created_at: Utc::now(),
        settings,
        assets,
        data_keys,
    };

    write_json(&ctx.dist.join("build-manifest.json"), &manifest)?;
    Ok(manifest)
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DocsmithError::validation(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| DocsmithError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
