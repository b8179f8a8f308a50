//! Script resource loading.
//!
//! Resource access is a capability the engine calls into, not part of the
//! engine itself. [`FilesystemSource`] covers the common case; callers whose
//! scripts ship inside the binary (the `embedded` resource mode) provide
//! their own [`ScriptSource`] implementation.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::Path;

/// A raw script as returned by a [`ScriptSource`]: its bare filename plus
/// full UTF-8 contents.
#[derive(Debug, Clone)]
pub struct NamedScript {
    pub file_name: String,
    pub contents: String,
}

/// Abstraction over where SQL scripts live.
pub trait ScriptSource: Send + Sync {
    /// List every `.sql` file directly inside `dir`, with contents loaded.
    ///
    /// A missing directory or a directory with no SQL files is an error.
    fn list_scripts(&self, dir: &str) -> CoreResult<Vec<NamedScript>>;

    /// Load a single script by path. `Ok(None)` means the path resolves to
    /// nothing; the caller decides whether that is fatal.
    fn load(&self, path: &str) -> CoreResult<Option<String>>;
}

/// [`ScriptSource`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemSource;

impl FilesystemSource {
    fn read_to_string(path: &Path) -> CoreResult<String> {
        fs::read_to_string(path).map_err(|e| CoreError::ScriptRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl ScriptSource for FilesystemSource {
    fn list_scripts(&self, dir: &str) -> CoreResult<Vec<NamedScript>> {
        let dir_path = Path::new(dir);
        if !dir_path.is_dir() {
            return Err(CoreError::ScriptDirNotFound {
                path: dir.to_string(),
            });
        }
        let entries = fs::read_dir(dir_path).map_err(|e| CoreError::ScriptRead {
            path: dir.to_string(),
            message: e.to_string(),
        })?;

        let mut scripts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::ScriptRead {
                path: dir.to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            scripts.push(NamedScript {
                contents: Self::read_to_string(&path)?,
                file_name,
            });
        }
        if scripts.is_empty() {
            return Err(CoreError::ScriptDirEmpty {
                path: dir.to_string(),
            });
        }
        // Directory iteration order is platform-dependent
        scripts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(scripts)
    }

    fn load(&self, path: &str) -> CoreResult<Option<String>> {
        let file = Path::new(path);
        if !file.is_file() {
            return Ok(None);
        }
        Self::read_to_string(file).map(Some)
    }
}
