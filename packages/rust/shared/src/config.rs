//! Workspace configuration for docsmith.
//!
//! A project may carry a `docsmith.toml` next to its documentation sources.
//! CLI flags override config file values, which override built-in defaults:
//!
//! ```toml
//! [defaults]
//! dist = "./public"
//! env = "production"
//!
//! [examples.blog]
//! config = "./demos/blog/config.json"
//! assets = "./demos/blog/assets"
//! data = "./demos/blog/data"
//! dist = "./demos/blog/dist"
//! temp = "./demos/blog/.tmp"
//! env = "development"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::{ContextOverrides, ContextProfile, Profiles};
use crate::error::{DocsmithError, Result};

/// Default workspace configuration file name.
const CONFIG_FILE_NAME: &str = "docsmith.toml";

/// Config directory name under the user's home, for the user-level
/// fallback file.
const CONFIG_DIR_NAME: &str = ".docsmith";

// ---------------------------------------------------------------------------
// Workspace file schema
// ---------------------------------------------------------------------------

/// Top-level workspace config, deserialized from TOML.
///
/// Both sections are optional; an absent file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// `[defaults]` section: per-field overrides of the built-in default
    /// profile. Absent fields keep their built-in values.
    #[serde(default)]
    pub defaults: ContextOverrides,

    /// `[examples.<name>]` sections: additional example profiles, merged
    /// over the built-in ones (file entries win on name collision).
    #[serde(default)]
    pub examples: BTreeMap<String, ContextProfile>,
}

// ---------------------------------------------------------------------------
// Built-in example profiles
// ---------------------------------------------------------------------------

/// Built-in example profiles, each pointing at a bundled demo project.
pub fn builtin_examples() -> BTreeMap<String, ContextProfile> {
    let mut examples = BTreeMap::new();
    examples.insert("starter".to_string(), demo_profile("starter"));
    examples.insert("blueprint".to_string(), demo_profile("blueprint"));
    examples
}

fn demo_profile(name: &str) -> ContextProfile {
    ContextProfile {
        config: format!("./demos/{name}/config.json"),
        assets: format!("./demos/{name}/assets"),
        data: format!("./demos/{name}/data"),
        dist: format!("./demos/{name}/dist"),
        temp: format!("./demos/{name}/.tmp"),
        env: "development".into(),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the workspace config file under `base_dir`.
pub fn config_file_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE_NAME)
}

/// Path of the user-level fallback config file (`~/.docsmith/docsmith.toml`).
pub fn user_config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the workspace config for `base_dir`.
///
/// The project-local `docsmith.toml` wins; otherwise the user-level file is
/// consulted; otherwise defaults.
pub fn load_workspace_config(base_dir: &Path) -> Result<WorkspaceConfig> {
    let path = config_file_path(base_dir);
    if path.exists() {
        return load_workspace_config_from(&path);
    }

    if let Some(user_path) = user_config_file_path() {
        if user_path.exists() {
            return load_workspace_config_from(&user_path);
        }
    }

    tracing::debug!(?path, "workspace config not found, using defaults");
    Ok(WorkspaceConfig::default())
}

/// Load the workspace config from a specific file path.
pub fn load_workspace_config_from(path: &Path) -> Result<WorkspaceConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsmithError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsmithError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Combine the built-in profiles with a loaded workspace config into the
/// profile source consumed by the context resolver.
pub fn profiles_from(config: &WorkspaceConfig) -> Profiles {
    let default = config.defaults.over(&ContextProfile::default());

    let mut examples = builtin_examples();
    for (name, profile) in &config.examples {
        examples.insert(name.clone(), profile.clone());
    }

    Profiles { default, examples }
}
