//! Prompt template files: the startup template and its sibling catalog.

use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to read template data from disk.
#[derive(Debug)]
pub enum TemplateError {
    Read { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read template '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}

/// The startup prompt template file plus the directory it lives in.
pub struct TemplateStore {
    path: PathBuf,
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { path, dir }
    }

    /// Read the startup template, byte-for-byte.
    pub fn load(&self) -> Result<String, TemplateError> {
        std::fs::read_to_string(&self.path).map_err(|e| TemplateError::Read {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Names of the `.txt` templates next to the startup template, sorted.
    pub fn list(&self) -> Result<Vec<String>, TemplateError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| TemplateError::Read {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("txt")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
