//! Shared types, error model, and configuration for docsmith.
//!
//! This crate is the foundation depended on by the other docsmith crates.
//! It provides:
//! - [`DocsmithError`], the unified error type
//! - Context resolution ([`ContextProfile`], [`ResolvedContext`], [`resolve`])
//! - Path normalization helpers
//! - Workspace configuration ([`WorkspaceConfig`], config loading)

pub mod config;
pub mod context;
pub mod error;
pub mod paths;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    WorkspaceConfig, builtin_examples, config_file_path, load_workspace_config,
    load_workspace_config_from, profiles_from, user_config_file_path,
};
pub use context::{
    ContextOverrides, ContextProfile, Environment, Profiles, ResolvedContext, resolve,
};
pub use error::{DocsmithError, Result};
