//! Line-oriented `key = value` parsing of MDF files.

use crate::{MdfError, Result};
use std::path::Path;

/// The `key = value` entries of a model definition file, in file order.
///
/// Lines without `=` (continuation lines of multi-line values such as `Runtxt`)
/// are skipped. A line is split at its first `=`; both sides are trimmed.
#[derive(Debug, Clone, Default)]
pub struct MdfFile {
    entries: Vec<(String, String)>,
}

impl MdfFile {
    /// Parse MDF text.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();

        Self { entries }
    }

    /// Read and parse an MDF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MdfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // MDF files written by older Delft3D-GUI versions are Latin-1.
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Value of the first entry whose key matches (ASCII case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(MdfError::MissingKey(key))
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no `key = value` lines were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
