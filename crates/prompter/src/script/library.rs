use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use super::Script;
use super::normalize::{document_title, normalize};

const STRUCTURED_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to watch scripts: {0}")]
    Watch(#[from] notify_debouncer_mini::notify::Error),
}

/// Load every script under `path`, which may be a single file or a
/// directory (not recursive). Unreadable files inside a directory are
/// skipped with a warning. The result is sorted by name.
pub fn load(path: &Path) -> Result<Vec<Script>, LibraryError> {
    if !path.exists() {
        return Err(LibraryError::NotFound(path.to_path_buf()));
    }

    let mut scripts = Vec::new();
    if path.is_file() {
        scripts.push(load_file(path)?);
    } else {
        let entries = std::fs::read_dir(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for entry in entries.flatten() {
            let file = entry.path();
            if !file.is_file() || !is_supported(&file) {
                continue;
            }
            match load_file(&file) {
                Ok(script) => scripts.push(script),
                Err(e) => tracing::warn!("skipping script: {e}"),
            }
        }
    }

    sort_scripts(&mut scripts);
    dedup_ids(&mut scripts);
    tracing::info!(count = scripts.len(), path = %path.display(), "loaded scripts");
    Ok(scripts)
}

/// Load one file. Structured documents that fail to parse fall back to
/// their raw text.
pub fn load_file(path: &Path) -> Result<Script, LibraryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let id = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    if !has_extension(path, STRUCTURED_EXTENSIONS) {
        return Ok(Script::new(id.clone(), id, raw));
    }

    match parse_document(path, &raw) {
        Some(doc) => {
            let name = document_title(&doc).map(str::to_string).unwrap_or_else(|| id.clone());
            Ok(Script::new(id, name, normalize(Some(&doc))))
        }
        None => {
            tracing::warn!(path = %path.display(), "unparseable script, showing raw text");
            Ok(Script::new(id.clone(), id, raw))
        }
    }
}

fn parse_document(path: &Path, raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return Some(Value::Null);
    }
    if has_extension(path, &["json"]) {
        serde_json::from_str(raw).ok()
    } else {
        serde_yaml::from_str(raw).ok()
    }
}

/// Case-insensitive by name, ties broken by id.
pub fn sort_scripts(scripts: &mut [Script]) {
    scripts.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn dedup_ids(scripts: &mut Vec<Script>) {
    let mut seen = HashSet::new();
    scripts.retain(|s| {
        let fresh = seen.insert(s.id.clone());
        if !fresh {
            tracing::warn!(id = %s.id, "duplicate script id, keeping the first");
        }
        fresh
    });
}

fn is_supported(path: &Path) -> bool {
    has_extension(path, STRUCTURED_EXTENSIONS) || has_extension(path, TEXT_EXTENSIONS)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}
