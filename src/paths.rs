//! Default list-path resolution.
//!
//! The list location comes from the `YATL_PATH` environment variable, falling
//! back to the home directory; a directory resolves to a well-known file name
//! inside it. Setting `YATL_PATH` to a cloud-backed-up location is a cheap way
//! to sync the list between machines.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// File name used when the resolved path is a directory.
pub const DEFAULT_LIST_NAME: &str = "yet_another_todo.list";

/// Environment variable overriding the list location.
pub const PATH_ENV_VAR: &str = "YATL_PATH";

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine a todo list location")]
    #[diagnostic(
        code(yatl::paths::no_home),
        help("Set the YATL_PATH or HOME environment variable, or pass --path.")
    )]
    NoHome,
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Resolve the default list path: `YATL_PATH` if set, else `HOME`, then
/// [`qualify`] the result.
pub fn resolve_default_path() -> PathResult<PathBuf> {
    std::env::var(PATH_ENV_VAR)
        .or_else(|_| std::env::var("HOME"))
        .map(PathBuf::from)
        .map(qualify)
        .map_err(|_| PathError::NoHome)
}

/// A directory resolves to [`DEFAULT_LIST_NAME`] inside it; anything else is
/// taken as the list file path itself.
pub fn qualify(base: PathBuf) -> PathBuf {
    if base.is_dir() {
        base.join(DEFAULT_LIST_NAME)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_get_the_default_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolved = qualify(dir.path().to_path_buf());
        assert_eq!(resolved, dir.path().join(DEFAULT_LIST_NAME));
    }

    #[test]
    fn file_paths_pass_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("my.list");
        assert_eq!(qualify(file.clone()), file);
    }
}
