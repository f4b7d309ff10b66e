//! Input Resolution
//!
//! An input is either one log file or a directory of them (one file per host
//! is the usual layout after logs are copied back from the testbed). Every
//! path is resolved up front so a missing input fails before any output exists.

use crate::error::AggregateError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered list of files feeding one aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl InputSet {
    /// Resolve `path` into files.
    ///
    /// A file resolves to itself. A directory resolves to the regular files
    /// directly inside it whose names match `pattern` (all when `None`),
    /// sorted by file name. Missing paths and directories with no matching
    /// files are `MissingInput`.
    pub fn resolve(path: impl AsRef<Path>, pattern: Option<&Regex>) -> Result<Self, AggregateError> {
        let root = path.as_ref().to_path_buf();

        if root.is_file() {
            return Ok(Self {
                files: vec![root.clone()],
                root,
            });
        }

        if !root.is_dir() {
            return Err(AggregateError::MissingInput(root));
        }

        let entries = fs::read_dir(&root).map_err(|source| AggregateError::Io {
            path: root.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| AggregateError::Io {
                path: root.clone(),
                source,
            })?;
            let file = entry.path();
            if !file.is_file() {
                continue;
            }
            let matches = match pattern {
                Some(re) => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| re.is_match(n)),
                None => true,
            };
            if matches {
                files.push(file);
            }
        }

        if files.is_empty() {
            return Err(AggregateError::MissingInput(root));
        }
        files.sort();

        Ok(Self { root, files })
    }

    /// Path the set was resolved from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files in processing order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
