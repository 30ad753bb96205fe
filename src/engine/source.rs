//! Reading file content for scanning
//!
//! Malformed UTF-8 is not an error: invalid sequences decode to U+FFFD, which
//! rules can then match like any other character. A file containing NUL bytes
//! is treated as binary and loses its `text` tag.

use crate::error::HookgrepError;
use std::fs;
use std::path::{Path, PathBuf};

/// Content of one file, ready to be scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    /// False when the raw bytes look binary
    pub is_text: bool,
}

impl SourceFile {
    /// Decode raw bytes, replacing malformed sequences
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            content: String::from_utf8_lossy(bytes).into_owned(),
            is_text: !bytes.contains(&0),
        }
    }
}

/// Read a file from disk
///
/// # Errors
///
/// Returns `HookgrepError::Read` if the file cannot be read.
pub fn read_source(path: &Path) -> Result<SourceFile, HookgrepError> {
    let bytes = fs::read(path).map_err(|source| HookgrepError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(SourceFile::from_bytes(path, &bytes))
}
