// conform/src/fixture.rs

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ConformError, Result};

/// A fixture found on disk, not yet read.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FixturePath {
    /// Path relative to the base dir, `/`-separated; used for matching, sorting and display.
    pub relative: String,
    pub absolute: PathBuf,
}

fn pattern_error(pattern: &str, message: impl ToString) -> ConformError {
    ConformError::Glob { pattern: pattern.to_string(), message: message.to_string() }
}

/// Bring a pattern into the form candidate paths are matched in: relative to
/// the base dir, `/`-separated, without `.` segments. Patterns that leave the
/// base dir could never match and are rejected.
fn normalize_pattern(pattern: &str) -> Result<String> {
    if pattern.starts_with('/') || Path::new(pattern).is_absolute() {
        return Err(pattern_error(pattern, "pattern must be relative to the base directory"));
    }
    let mut parts = Vec::new();
    for seg in pattern.split('/') {
        match seg {
            "" | "." => continue,
            ".." => return Err(pattern_error(pattern, "pattern must not contain `..`")),
            s => parts.push(s),
        }
    }
    if parts.is_empty() {
        return Err(pattern_error(pattern, "pattern selects no files"));
    }
    Ok(parts.join("/"))
}

/// Build a GlobSet from one pattern. `*` stops at `/`, `**` crosses directories.
fn build_globset(pattern: &str) -> Result<GlobSet> {
    let glob_err = |e: globset::Error| pattern_error(pattern, e);
    let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(glob_err)?;
    let mut b = GlobSetBuilder::new();
    b.add(glob);
    b.build().map_err(glob_err)
}

/// Directory part of the pattern before the first component with glob syntax.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut parts: Vec<&str> = pattern.split('/').collect();
    parts.pop(); // last component names files, never a directory to walk from
    parts
        .into_iter()
        .take_while(|p| !p.contains(['*', '?', '[', '{']))
        .filter(|p| !p.is_empty())
        .collect()
}

fn to_slash(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// List every file under `base_dir` whose relative path matches `pattern`,
/// sorted by relative path.
///
/// The walk starts at the pattern's literal directory prefix; if that directory
/// is missing or unreadable the whole enumeration fails. No matches is fine.
pub fn enumerate(base_dir: &Path, pattern: &str) -> Result<Vec<FixturePath>> {
    let pattern = normalize_pattern(pattern)?;
    let gs = build_globset(&pattern)?;
    let root = base_dir.join(literal_prefix(&pattern));

    let mut out = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            ConformError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() { continue; }
        let rel = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
        let relative = to_slash(rel);
        if gs.is_match(&relative) {
            out.push(FixturePath { relative, absolute: entry.path().to_path_buf() });
        }
    }
    out.sort();
    tracing::debug!(root = %root.display(), %pattern, matched = out.len(), "enumerated fixtures");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "{}").unwrap();
    }

    #[test]
    fn prefix_stops_at_first_glob() {
        assert_eq!(literal_prefix("tests/valid/**/*.json"), PathBuf::from("tests/valid"));
        assert_eq!(literal_prefix("*.json"), PathBuf::new());
        assert_eq!(literal_prefix("a/b/c.json"), PathBuf::from("a/b"));
        assert_eq!(literal_prefix("fx/{a,b}/x.json"), PathBuf::from("fx"));
    }

    #[test]
    fn recursive_match_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tests/valid/b.json");
        touch(dir.path(), "tests/valid/a.json");
        touch(dir.path(), "tests/valid/nested/deep/c.json");
        touch(dir.path(), "tests/valid/notes.txt");
        touch(dir.path(), "tests/invalid/x.json");

        let got: Vec<String> = enumerate(dir.path(), "tests/valid/**/*.json").unwrap()
            .into_iter().map(|f| f.relative).collect();
        assert_eq!(got, vec!["tests/valid/a.json", "tests/valid/b.json", "tests/valid/nested/deep/c.json"]);
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fx/top.json");
        touch(dir.path(), "fx/sub/inner.json");
        let got = enumerate(dir.path(), "fx/*.json").unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].relative, "fx/top.json");
        assert_eq!(got[0].absolute, dir.path().join("fx/top.json"));
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/invalid")).unwrap();
        assert!(enumerate(dir.path(), "tests/invalid/**/*.json").unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = enumerate(dir.path(), "tests/valid/**/*.json").unwrap_err();
        assert!(matches!(err, ConformError::Io { .. }));
    }

    #[test]
    fn dot_slash_prefix_matches_like_plain_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tests/valid/bad.json");
        touch(dir.path(), "tests/valid/sub/more.json");
        let got: Vec<String> = enumerate(dir.path(), "./tests/valid/**/*.json").unwrap()
            .into_iter().map(|f| f.relative).collect();
        assert_eq!(got, vec!["tests/valid/bad.json", "tests/valid/sub/more.json"]);
        assert_eq!(enumerate(dir.path(), "tests/./valid/*.json").unwrap().len(), 1);
    }

    #[test]
    fn patterns_leaving_the_base_dir_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fx/a.json");
        for p in ["../fx/*.json", "fx/../fx/*.json", "/fx/*.json", "./"] {
            assert!(matches!(enumerate(dir.path(), p).unwrap_err(), ConformError::Glob { .. }), "{p}");
        }
    }

    #[test]
    fn bad_glob_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(enumerate(dir.path(), "a/[.json").unwrap_err(), ConformError::Glob { .. }));
    }
}
