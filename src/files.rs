use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SearchError;

/// Recursively collects regular files under `root` whose extension is one of
/// `extensions` (compared case-sensitively, without the leading dot).
///
/// A root that is missing or is not a directory yields no files.
pub fn list_files<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Vec<PathBuf> {
    if !root.is_dir() {
        tracing::warn!("Search root {} is not a directory", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // Follows a symlink to its target; linked directories are not walked.
        if !entry.path().is_file() {
            continue;
        }

        let ext = file_extension(entry.path());
        if extensions.iter().any(|allowed| allowed.as_ref() == ext) {
            files.push(entry.into_path());
        }
    }

    files
}

/// Extension of `path` without the dot, or `""` when there is none.
pub fn file_extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// The `filter` query parameter: a glob matched against a path from its
/// rightmost component leftwards.
#[derive(Debug, Clone)]
pub enum FileFilter {
    Any,
    Components { parts: Vec<Pattern>, anchored: bool },
}

const COMPONENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl FileFilter {
    pub fn parse(pattern: &str) -> Result<Self, SearchError> {
        if pattern == "*" {
            return Ok(FileFilter::Any);
        }

        let anchored = pattern.starts_with('/');
        let trimmed = pattern.trim_matches('/');
        if trimmed.is_empty() {
            return Err(SearchError::EmptyFilter);
        }

        let parts = trimmed
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| {
                Pattern::new(part).map_err(|source| SearchError::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileFilter::Components { parts, anchored })
    }

    pub fn matches(&self, path: &Path) -> bool {
        let (parts, anchored) = match self {
            FileFilter::Any => return true,
            FileFilter::Components { parts, anchored } => (parts, *anchored),
        };

        if anchored && !path.has_root() {
            return false;
        }

        let names: Vec<String> = path
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if names.len() < parts.len() || (anchored && names.len() != parts.len()) {
            return false;
        }

        names
            .iter()
            .rev()
            .zip(parts.iter().rev())
            .all(|(name, part)| part.matches_with(name, COMPONENT_MATCH))
    }
}
