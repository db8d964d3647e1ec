//! Input set for collecting analysis unit files.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use super::unit::UnitFormat;
use super::{Error, Result};
use crate::config::{Config, CONFIG_FILE};

/// Analysis unit files named on the command line.
///
/// Files are taken as given. Directories are walked respecting .gitignore and
/// contribute every `.json` and `.toml` file that is not excluded; those
/// files are marked as discovered.
#[derive(Debug, Clone)]
pub struct InputSet {
    files: Vec<PathBuf>,
    discovered: BTreeSet<PathBuf>,
}

impl InputSet {
    /// Collect inputs using the configured exclude patterns.
    pub fn from_paths(paths: &[PathBuf], config: &Config) -> Result<Self> {
        Self::from_paths_with_patterns(paths, &config.exclude_patterns)
    }

    /// Collect inputs with custom exclude patterns.
    pub fn from_paths_with_patterns(paths: &[PathBuf], exclude_patterns: &[String]) -> Result<Self> {
        let exclude = build_globset(exclude_patterns)?;
        let mut explicit = BTreeSet::new();
        let mut discovered = BTreeSet::new();

        for path in paths {
            if path.is_dir() {
                discovered.extend(walk(path, &exclude));
            } else if path.is_file() {
                explicit.insert(path.clone());
            } else {
                return Err(Error::FileNotFound { path: path.clone() });
            }
        }

        // A file named on the command line is never treated as discovered.
        discovered.retain(|path| !explicit.contains(path));
        let files = explicit.union(&discovered).cloned().collect();

        Ok(Self { files, discovered })
    }

    /// Get all files in the set.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Whether `path` was found by walking a directory rather than named directly.
    pub fn is_discovered(&self, path: &Path) -> bool {
        self.discovered.contains(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("invalid exclude patterns: {e}")))
}

fn walk(root: &Path, exclude: &GlobSet) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build();

    walker
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| UnitFormat::detect(path).is_some())
        .filter(|path| path.file_name().is_none_or(|name| name != OsStr::new(CONFIG_FILE)))
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path.as_path());
            !exclude.is_match(relative) && !exclude.is_match(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_set_empty_dir() {
        let temp = tempfile::tempdir().unwrap();
        let inputs = InputSet::from_paths_with_patterns(&[temp.path().to_path_buf()], &[]).unwrap();
        assert!(inputs.is_empty());
        assert_eq!(inputs.len(), 0);
    }

    #[test]
    fn test_input_set_walks_directories() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        std::fs::write(temp.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp.path().join("nested/b.toml"), "").unwrap();
        std::fs::write(temp.path().join("README.md"), "# README").unwrap();
        std::fs::write(temp.path().join("retfilter.toml"), "").unwrap();

        let inputs = InputSet::from_paths_with_patterns(&[temp.path().to_path_buf()], &[]).unwrap();
        let names: Vec<_> = inputs
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.toml"]);
        assert!(inputs.files().iter().all(|p| inputs.is_discovered(p)));
    }

    #[test]
    fn test_input_set_exclude_patterns() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("build")).unwrap();
        std::fs::write(temp.path().join("keep.json"), "{}").unwrap();
        std::fs::write(temp.path().join("build/skip.json"), "{}").unwrap();

        let inputs = InputSet::from_paths_with_patterns(
            &[temp.path().to_path_buf()],
            &["build/**".to_string()],
        )
        .unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(inputs.files()[0].ends_with("keep.json"));
    }

    #[test]
    fn test_input_set_explicit_file_kept_as_given() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("units.txt");
        std::fs::write(&file, "").unwrap();

        let inputs = InputSet::from_paths_with_patterns(&[file.clone(), file.clone()], &[]).unwrap();
        assert_eq!(inputs.files(), &[file.clone()]);
        assert!(!inputs.is_discovered(&file));
    }

    #[test]
    fn test_input_set_named_file_inside_walked_dir_is_explicit() {
        let temp = tempfile::tempdir().unwrap();
        let named = temp.path().join("a.json");
        let other = temp.path().join("b.json");
        std::fs::write(&named, "{}").unwrap();
        std::fs::write(&other, "{}").unwrap();

        let inputs =
            InputSet::from_paths_with_patterns(&[temp.path().to_path_buf(), named.clone()], &[])
                .unwrap();
        assert_eq!(inputs.files(), &[named.clone(), other.clone()]);
        assert!(!inputs.is_discovered(&named));
        assert!(inputs.is_discovered(&other));
    }

    #[test]
    fn test_input_set_missing_path() {
        let result = InputSet::from_paths_with_patterns(&[PathBuf::from("/nonexistent/units.json")], &[]);
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_input_set_invalid_pattern() {
        let temp = tempfile::tempdir().unwrap();
        let result = InputSet::from_paths_with_patterns(
            &[temp.path().to_path_buf()],
            &["a[".to_string()],
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
