use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::PatternConfig;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Failed to list directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Locates fixture bundles below a root directory.
///
/// Only immediate children are considered at each level: bundles are direct
/// subdirectories of the root, fixtures are direct children of a bundle.
/// Names are matched with shell-style globs, case-sensitively.
#[derive(Debug, Clone)]
pub struct FixtureFinder {
    root: PathBuf,
    bundle_pattern: Pattern,
    fixture_pattern: Pattern,
}

impl FixtureFinder {
    pub fn new(
        root: impl Into<PathBuf>,
        patterns: &PatternConfig,
    ) -> Result<Self, FinderError> {
        Ok(Self {
            root: root.into(),
            bundle_pattern: compile_pattern(&patterns.bundle)?,
            fixture_pattern: compile_pattern(&patterns.fixture)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every directory under the root whose name matches the bundle pattern
    /// and which holds at least one fixture. Sorted by path.
    #[instrument(skip(self), fields(root = %self.root.display(), pattern = %self.bundle_pattern))]
    pub fn get_all_bundles(&self) -> Result<Vec<PathBuf>, FinderError> {
        let mut bundles = Vec::new();
        for (name, path) in list_dir(&self.root)? {
            if !self.bundle_pattern.matches(&name) || !path.is_dir() {
                continue;
            }
            if self.has_fixture(&path)? {
                debug!(bundle = %path.display(), "found bundle");
                bundles.push(path);
            } else {
                debug!(bundle = %path.display(), "skipping bundle without fixtures");
            }
        }
        bundles.sort();
        Ok(bundles)
    }

    /// Every entry in `bundle` whose name matches the fixture pattern. Sorted by path.
    pub fn get_fixtures(&self, bundle: &Path) -> Result<Vec<PathBuf>, FinderError> {
        let mut fixtures: Vec<PathBuf> = list_dir(bundle)?
            .into_iter()
            .filter(|(name, _)| self.fixture_pattern.matches(name))
            .map(|(_, path)| path)
            .collect();
        fixtures.sort();
        Ok(fixtures)
    }

    /// Presence check only: stops at the first matching entry.
    fn has_fixture(&self, bundle: &Path) -> Result<bool, FinderError> {
        let read_dir_err = |source| FinderError::ReadDir {
            path: bundle.to_path_buf(),
            source,
        };
        for entry in fs::read_dir(bundle).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            if self
                .fixture_pattern
                .matches(&entry.file_name().to_string_lossy())
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn compile_pattern(pattern: &str) -> Result<Pattern, FinderError> {
    Pattern::new(pattern).map_err(|source| FinderError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// List the immediate children of `dir` as (file name, full path) pairs.
/// Names that are not valid UTF-8 are matched on their lossy form.
fn list_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>, FinderError> {
    let read_dir_err = |source| FinderError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        children.push((name, entry.path()));
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(root: &Path) -> FixtureFinder {
        FixtureFinder::new(root, &PatternConfig::default()).unwrap()
    }

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_bundle_with_fixture_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("PNPublishTests.bundle");
        fs::create_dir(&bundle).unwrap();
        touch(&bundle.join("testPublish.plist"));
        touch(&bundle.join("README.md"));
        touch(&bundle.join("notes.txt"));

        let bundles = finder(dir.path()).get_all_bundles().unwrap();
        assert_eq!(bundles, vec![bundle]);
    }

    #[test]
    fn test_non_bundle_directory_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("Resources");
        fs::create_dir(&other).unwrap();
        touch(&other.join("testPublish.plist"));

        let bundles = finder(dir.path()).get_all_bundles().unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn test_bundle_without_fixture_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Empty.bundle");
        fs::create_dir(&bundle).unwrap();
        touch(&bundle.join("info.txt"));
        fs::create_dir(dir.path().join("Bare.bundle")).unwrap();

        let bundles = finder(dir.path()).get_all_bundles().unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn test_file_named_like_bundle_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("stray.bundle"));

        let bundles = finder(dir.path()).get_all_bundles().unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn test_fixtures_are_listed_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("PNHistoryTests.bundle");
        fs::create_dir(&bundle).unwrap();
        touch(&bundle.join("testB.plist"));
        touch(&bundle.join("testA.plist"));
        touch(&bundle.join("Info.json"));

        let finder = finder(dir.path());
        let fixtures = finder.get_fixtures(&bundle).unwrap();
        assert_eq!(
            fixtures,
            vec![bundle.join("testA.plist"), bundle.join("testB.plist")]
        );
    }

    #[test]
    fn test_bundles_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Zeta.bundle", "Alpha.bundle"] {
            let bundle = dir.path().join(name);
            fs::create_dir(&bundle).unwrap();
            touch(&bundle.join("test.plist"));
        }

        let bundles = finder(dir.path()).get_all_bundles().unwrap();
        assert_eq!(
            bundles,
            vec![dir.path().join("Alpha.bundle"), dir.path().join("Zeta.bundle")]
        );
    }

    #[test]
    fn test_custom_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Recordings.fixtures");
        fs::create_dir(&bundle).unwrap();
        touch(&bundle.join("a.xml"));

        let patterns = PatternConfig {
            bundle: "*.fixtures".to_string(),
            fixture: "*.xml".to_string(),
        };
        let finder = FixtureFinder::new(dir.path(), &patterns).unwrap();
        assert_eq!(finder.get_all_bundles().unwrap(), vec![bundle]);
    }

    #[test]
    fn test_glob_classes_and_case() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["PNTimeTests.bundle", "PNTimeTests.Bundle", "XTests.bundle"] {
            let bundle = dir.path().join(name);
            fs::create_dir(&bundle).unwrap();
            touch(&bundle.join("test1.plist"));
        }

        let patterns = PatternConfig {
            bundle: "[!X]*.bundle".to_string(),
            fixture: "test?.plist".to_string(),
        };
        let finder = FixtureFinder::new(dir.path(), &patterns).unwrap();
        assert_eq!(
            finder.get_all_bundles().unwrap(),
            vec![dir.path().join("PNTimeTests.bundle")]
        );
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let patterns = PatternConfig {
            bundle: "[abc".to_string(),
            ..PatternConfig::default()
        };
        let err = FixtureFinder::new("Fixtures", &patterns).unwrap_err();
        assert!(matches!(
            err,
            FinderError::InvalidPattern { ref pattern, .. } if pattern == "[abc"
        ));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = finder(&dir.path().join("missing"))
            .get_all_bundles()
            .unwrap_err();
        assert!(matches!(err, FinderError::ReadDir { .. }));
    }
}
