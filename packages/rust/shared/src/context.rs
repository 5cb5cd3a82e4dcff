//! Build context resolution.
//!
//! A [`ContextProfile`] is an immutable template of six raw string fields.
//! [`resolve`] layers CLI overrides on top of a selected profile, absolutizes
//! every path field against the working directory, and validates the
//! environment, producing the read-only [`ResolvedContext`] consumed by the
//! build pipeline for the rest of the run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DocsmithError, Result};
use crate::paths;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Build environment. The only recognized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Canonical string form, as accepted by `--env`.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DocsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(DocsmithError::config(format!(
                "invalid environment '{other}': expected 'development' or 'production'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles and overrides
// ---------------------------------------------------------------------------

/// A named bundle of raw context field values.
///
/// Profiles are templates: values may be relative paths and are never
/// mutated after definition. `config` may be a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextProfile {
    pub config: String,
    pub assets: String,
    pub data: String,
    pub dist: String,
    pub temp: String,
    pub env: String,
}

impl Default for ContextProfile {
    fn default() -> Self {
        Self {
            config: "./config.json".into(),
            assets: "./assets".into(),
            data: "./data".into(),
            dist: "./dist".into(),
            temp: "./.tmp".into(),
            env: "development".into(),
        }
    }
}

/// The two profile sources: one default profile, plus a mapping of
/// example name to profile consulted only when `--example` is given.
#[derive(Debug, Clone, Default)]
pub struct Profiles {
    pub default: ContextProfile,
    pub examples: BTreeMap<String, ContextProfile>,
}

/// Per-field overrides collected from CLI flags (or a config file layer).
///
/// `None` means "use the profile's value".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextOverrides {
    pub config: Option<String>,
    pub assets: Option<String>,
    pub data: Option<String>,
    pub dist: Option<String>,
    pub temp: Option<String>,
    pub env: Option<String>,
}

impl ContextOverrides {
    /// True when no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
            && self.assets.is_none()
            && self.data.is_none()
            && self.dist.is_none()
            && self.temp.is_none()
            && self.env.is_none()
    }

    /// Apply these overrides on top of `profile`, yielding the raw merged
    /// field values. Profile selection and path normalization happen in
    /// [`resolve`]; this is the pure layering step.
    pub fn over(&self, profile: &ContextProfile) -> ContextProfile {
        ContextProfile {
            config: self.config.clone().unwrap_or_else(|| profile.config.clone()),
            assets: self.assets.clone().unwrap_or_else(|| profile.assets.clone()),
            data: self.data.clone().unwrap_or_else(|| profile.data.clone()),
            dist: self.dist.clone().unwrap_or_else(|| profile.dist.clone()),
            temp: self.temp.clone().unwrap_or_else(|| profile.temp.clone()),
            env: self.env.clone().unwrap_or_else(|| profile.env.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedContext
// ---------------------------------------------------------------------------

/// The final build context: every path absolute, the environment validated.
///
/// Created once per run and read-only afterwards. The orchestrator owns it
/// and lends it to the pipeline by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Config files, in the order they were supplied. The only
    /// multi-valued field.
    pub config: Vec<PathBuf>,
    pub assets: PathBuf,
    pub data: PathBuf,
    pub dist: PathBuf,
    pub temp: PathBuf,
    pub env: Environment,
}

impl ResolvedContext {
    /// The six fields in canonical order, serialized for display.
    ///
    /// The ordering is not semantically significant but must be stable:
    /// the context dump prints these rows as-is.
    pub fn display_fields(&self) -> [(&'static str, String); 6] {
        [
            ("config", paths::join_list(&self.config)),
            ("assets", self.assets.display().to_string()),
            ("data", self.data.display().to_string()),
            ("dist", self.dist.display().to_string()),
            ("temp", self.temp.display().to_string()),
            ("env", self.env.to_string()),
        ]
    }
}

/// Resolve the final context from a profile source and a set of overrides.
///
/// `example` selects a profile from `profiles.examples`; a name with no
/// match is an immediate error, never a silent fallback to the default
/// profile. Every path field is absolutized against `base_dir`, each entry
/// of the comma-separated `config` list individually.
pub fn resolve(
    overrides: &ContextOverrides,
    example: Option<&str>,
    profiles: &Profiles,
    base_dir: &Path,
) -> Result<ResolvedContext> {
    let base_profile = match example {
        Some(name) => profiles.examples.get(name).ok_or_else(|| {
            DocsmithError::config(format!("no example named '{name}'"))
        })?,
        None => &profiles.default,
    };

    let raw = overrides.over(base_profile);

    let config = paths::absolutize_list(&raw.config, base_dir);
    if config.is_empty() {
        return Err(DocsmithError::config("config field resolved to no paths"));
    }

    Ok(ResolvedContext {
        config,
        assets: paths::absolutize(&raw.assets, base_dir),
        data: paths::absolutize(&raw.data, base_dir),
        dist: paths::absolutize(&raw.dist, base_dir),
        temp: paths::absolutize(&raw.temp, base_dir),
        env: raw.env.parse()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_against_base_dir() {
        let ctx = resolve(
            &ContextOverrides::default(),
            None,
            &Profiles::default(),
            Path::new("/proj"),
        )
        .expect("resolve defaults");

        assert_eq!(ctx.config, vec![PathBuf::from("/proj/config.json")]);
        assert_eq!(ctx.assets, PathBuf::from("/proj/assets"));
        assert_eq!(ctx.data, PathBuf::from("/proj/data"));
        assert_eq!(ctx.dist, PathBuf::from("/proj/dist"));
        assert_eq!(ctx.temp, PathBuf::from("/proj/.tmp"));
        assert_eq!(ctx.env, Environment::Development);
    }

    #[test]
    fn comma_separated_config_absolutizes_each_entry() {
        let overrides = ContextOverrides {
            config: Some("a.json,b.json".into()),
            ..Default::default()
        };
        let ctx = resolve(
            &overrides,
            None,
            &Profiles::default(),
            Path::new("/cwd"),
        )
        .expect("resolve");

        assert_eq!(
            ctx.config,
            vec![PathBuf::from("/cwd/a.json"), PathBuf::from("/cwd/b.json")]
        );
        assert_eq!(ctx.display_fields()[0].1, "/cwd/a.json,/cwd/b.json");
    }

    #[test]
    fn overrides_win_over_profile_values() {
        let overrides = ContextOverrides {
            dist: Some("/srv/www".into()),
            env: Some("production".into()),
            ..Default::default()
        };
        let ctx = resolve(
            &overrides,
            None,
            &Profiles::default(),
            Path::new("/proj"),
        )
        .expect("resolve");

        assert_eq!(ctx.dist, PathBuf::from("/srv/www"));
        assert_eq!(ctx.env, Environment::Production);
        // Untouched fields still come from the profile.
        assert_eq!(ctx.assets, PathBuf::from("/proj/assets"));
    }

    #[test]
    fn unknown_example_is_an_error() {
        let err = resolve(
            &ContextOverrides::default(),
            Some("nonexistent"),
            &Profiles::default(),
            Path::new("/proj"),
        )
        .unwrap_err();

        assert!(matches!(err, DocsmithError::Config { .. }));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn known_example_profile_is_used() {
        let mut profiles = Profiles::default();
        profiles.examples.insert(
            "starter".to_string(),
            ContextProfile {
                config: "./demos/starter/config.json".into(),
                assets: "./demos/starter/assets".into(),
                data: "./demos/starter/data".into(),
                dist: "./demos/starter/dist".into(),
                temp: "./demos/starter/.tmp".into(),
                env: "development".into(),
            },
        );
        let ctx = resolve(
            &ContextOverrides::default(),
            Some("starter"),
            &profiles,
            Path::new("/proj"),
        )
        .expect("resolve example");

        assert_eq!(
            ctx.config,
            vec![PathBuf::from("/proj/demos/starter/config.json")]
        );
        assert_eq!(ctx.assets, PathBuf::from("/proj/demos/starter/assets"));
    }

    #[test]
    fn invalid_environment_is_an_error() {
        let overrides = ContextOverrides {
            env: Some("staging".into()),
            ..Default::default()
        };
        let err = resolve(
            &overrides,
            None,
            &Profiles::default(),
            Path::new("/proj"),
        )
        .unwrap_err();

        assert!(matches!(err, DocsmithError::Config { .. }));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn display_fields_keep_canonical_order() {
        let ctx = resolve(
            &ContextOverrides::default(),
            None,
            &Profiles::default(),
            Path::new("/proj"),
        )
        .expect("resolve");

        let names: Vec<&str> = ctx.display_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["config", "assets", "data", "dist", "temp", "env"]);
    }

    #[test]
    fn environment_roundtrip() {
        for env in [Environment::Development, Environment::Production] {
            let parsed: Environment = env.as_str().parse().expect("parse env");
            assert_eq!(parsed, env);
        }
        assert!("staging".parse::<Environment>().is_err());
    }
}
