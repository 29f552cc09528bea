//! Env-file backed credential store
//!
//! Credentials live in a plain `KEY=VALUE` env file. The file is
//! parsed once at startup; writes go through [`EnvFileStore::set`],
//! which rewrites the whole file via a temp file + rename so a reader
//! never observes a partial write. Comments and lines the store does
//! not understand are preserved verbatim on save.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One line of the backing file.
#[derive(Debug, Clone)]
enum Line {
    /// A `KEY=VALUE` pair
    Pair { key: String, value: String },
    /// A comment, blank line, or anything else, kept as-is
    Raw(String),
}

/// Durable key-value store over an env-format file.
pub struct EnvFileStore {
    path: PathBuf,
    lines: Vec<Line>,
}

impl EnvFileStore {
    /// Open the backing file, creating an empty one if absent.
    ///
    /// Fails only on unrecoverable I/O (unreadable file, unwritable
    /// location); a missing file is not an error.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let store = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::store_with_path(
                    format!("failed to read {}: {}", path.display(), e),
                    path.display().to_string(),
                )
            })?;
            let lines = parse_lines(&content);
            debug!(
                path = %path.display(),
                entries = lines.iter().filter(|l| matches!(l, Line::Pair { .. })).count(),
                "loaded credential store"
            );
            Self { path, lines }
        } else {
            debug!(path = %path.display(), "store file absent, creating empty store");
            let store = Self {
                path,
                lines: Vec::new(),
            };
            store.persist()?;
            store
        };

        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Currently persisted value for a slot. Empty values read as
    /// absent: a blank `KEY=` line means unconfigured.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Pair { key, value } if key == slot && !value.is_empty() => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    /// Write a value through to the backing file.
    ///
    /// After this returns `Ok`, a fresh [`load_or_create`] on the same
    /// path observes the value. The value itself is never logged.
    ///
    /// [`load_or_create`]: EnvFileStore::load_or_create
    pub fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        let existing = self.lines.iter_mut().find_map(|line| match line {
            Line::Pair { key, value } if key == slot => Some(value),
            _ => None,
        });

        match existing {
            Some(stored) => *stored = value.to_string(),
            None => self.lines.push(Line::Pair {
                key: slot.to_string(),
                value: value.to_string(),
            }),
        }

        self.persist()?;
        debug!(slot, "credential slot updated");
        Ok(())
    }

    /// Rewrite the backing file atomically with respect to a single
    /// slot: the new content lands under a temp name first.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::store_with_path(
                        format!("failed to create {}: {}", parent.display(), e),
                        self.path.display().to_string(),
                    )
                })?;
            }
        }

        let mut content = String::new();
        for line in &self.lines {
            match line {
                Line::Pair { key, value } => {
                    content.push_str(key);
                    content.push('=');
                    content.push_str(value);
                }
                Line::Raw(raw) => content.push_str(raw),
            }
            content.push('\n');
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &content).map_err(|e| {
            Error::store_with_path(
                format!("failed to write {}: {}", tmp.display(), e),
                self.path.display().to_string(),
            )
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::store_with_path(
                format!("failed to replace {}: {}", self.path.display(), e),
                self.path.display().to_string(),
            )
        })?;

        Ok(())
    }
}

fn parse_lines(content: &str) -> Vec<Line> {
    content
        .lines()
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return Line::Raw(raw.to_string());
            }
            match trimmed.split_once('=') {
                Some((key, value)) => Line::Pair {
                    key: key.trim().to_string(),
                    value: strip_quotes(value.trim()).to_string(),
                },
                None => Line::Raw(raw.to_string()),
            }
        })
        .collect()
}

/// Values exported as `KEY="value"` lose the quotes on read.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}
