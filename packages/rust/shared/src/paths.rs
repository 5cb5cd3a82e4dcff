//! Path normalization helpers.
//!
//! Context fields are supplied as strings (flags, config file, profile
//! defaults) and may be relative; everything downstream of the resolver
//! works with absolute paths only. The `config` field is the one
//! multi-valued field: a comma-separated list of config files.

use std::path::{Path, PathBuf};

/// Separator for the multi-valued `config` field.
pub const LIST_SEPARATOR: char = ',';

/// Return `path` lexically cleaned if absolute, otherwise join it onto
/// `base` and clean the result.
///
/// Cleaning is purely lexical (`.` removed, `..` popped where possible);
/// the path does not need to exist, unlike `fs::canonicalize`.
pub fn absolutize(path: &str, base: &Path) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        clean(p)
    } else {
        clean(&base.join(p))
    }
}

/// Lexically normalize a path: drop `.` components, resolve `..` against
/// the preceding component where one exists.
fn clean(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Split a comma-separated field value into its raw components.
///
/// Empty components are dropped, so `"a.json,,b.json"` and a trailing comma
/// both behave as expected. Whitespace around components is trimmed.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Absolutize every component of a comma-separated field value.
pub fn absolutize_list(value: &str, base: &Path) -> Vec<PathBuf> {
    split_list(value)
        .into_iter()
        .map(|p| absolutize(p, base))
        .collect()
}

/// Join a list of paths back into the comma-separated display form.
pub fn join_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_base() {
        let out = absolutize("./config.json", Path::new("/proj"));
        assert_eq!(out, PathBuf::from("/proj/config.json"));
        assert!(out.is_absolute());
    }

    #[test]
    fn parent_components_resolve_lexically() {
        let out = absolutize("../shared/data", Path::new("/proj/site"));
        assert_eq!(out, PathBuf::from("/proj/shared/data"));
    }

    #[test]
    fn absolute_path_passes_through() {
        let out = absolutize("/etc/docsmith/config.json", Path::new("/proj"));
        assert_eq!(out, PathBuf::from("/etc/docsmith/config.json"));
    }

    #[test]
    fn absolutize_is_idempotent_on_absolute_input() {
        let base = Path::new("/proj");
        let once = absolutize("assets", base);
        let twice = absolutize(&once.display().to_string(), base);
        assert_eq!(once, twice);
    }

    #[test]
    fn list_splitting_preserves_order() {
        assert_eq!(split_list("a.json,b.json"), vec!["a.json", "b.json"]);
        assert_eq!(split_list("a.json, b.json ,"), vec!["a.json", "b.json"]);
        assert_eq!(split_list("single"), vec!["single"]);
    }

    #[test]
    fn absolutize_list_handles_mixed_entries() {
        let out = absolutize_list("a.json,/abs/b.json", Path::new("/cwd"));
        assert_eq!(
            out,
            vec![PathBuf::from("/cwd/a.json"), PathBuf::from("/abs/b.json")]
        );
        assert_eq!(join_list(&out), "/cwd/a.json,/abs/b.json");
    }
}
