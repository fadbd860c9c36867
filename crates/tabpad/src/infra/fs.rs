//! Plain-text file access and directory listing for the file dialogs.

use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::DocumentError;

/// Read the whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, DocumentError> {
    let content = fs::read_to_string(path).map_err(|err| DocumentError::from_io(path, err))?;
    debug!(path = %path.display(), bytes = content.len(), "read document");
    Ok(content)
}

/// Overwrite `path` with `content` followed by a single trailing newline.
pub fn write_text(path: &Path, content: &str) -> Result<(), DocumentError> {
    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()
    };
    write().map_err(|err| DocumentError::from_io(path, err))?;
    debug!(path = %path.display(), bytes = content.len() + 1, "wrote document");
    Ok(())
}

/// File type filter offered by the open and save dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileFilter {
    /// `*.txt`
    #[default]
    Text,
    /// `*.*`
    All,
}

impl FileFilter {
    pub fn label(&self) -> &'static str {
        match self {
            FileFilter::Text => "txt files (*.txt)",
            FileFilter::All => "All files (*.*)",
        }
    }

    /// The other filter, used when the dialog toggles between them.
    pub fn toggled(&self) -> Self {
        match self {
            FileFilter::Text => FileFilter::All,
            FileFilter::All => FileFilter::Text,
        }
    }

    fn matcher(&self) -> Result<Option<GlobMatcher>> {
        match self {
            FileFilter::All => Ok(None),
            FileFilter::Text => {
                let glob = GlobBuilder::new("*.txt")
                    .case_insensitive(true)
                    .build()
                    .context("invalid text file glob")?;
                Ok(Some(glob.compile_matcher()))
            }
        }
    }
}

/// A single row of a dialog's directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// List the immediate children of `dir`. Directories are always included; files must pass
/// `filter`. Directories sort before files, each group alphabetically.
pub fn list_directory(dir: &Path, filter: FileFilter, show_hidden: bool) -> Result<Vec<DirEntry>> {
    let matcher = filter.matcher()?;
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(!show_hidden)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if entry.depth() == 0 {
            continue;
        }
        let is_dir = entry.file_type().is_some_and(|kind| kind.is_dir());
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_dir
            && let Some(matcher) = &matcher
            && !matcher.is_match(&name)
        {
            continue;
        }
        entries.push(DirEntry {
            path: entry.path().to_path_buf(),
            name,
            is_dir,
        });
    }

    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
    Ok(entries)
}
