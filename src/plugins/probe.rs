//! Plugin metadata probe

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::abi;
use super::record::PluginRecord;

/// Why a candidate file produced no record
#[derive(Debug, Error)]
pub enum ProbeError {
    /// File could not be opened as a dynamic library
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// Library opened but does not export the entry point
    #[error("{} does not export {symbol}", path.display())]
    SymbolMissing { path: PathBuf, symbol: &'static str },
}

/// Capability to read a plugin record from a candidate file
///
/// The scanner only depends on this trait, so alternate ABIs or a static
/// test double can stand in for [`LibraryProbe`].
pub trait PluginProbe: Send + Sync {
    /// Read the record for `path`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if `path` is not a usable plugin
    fn probe(&self, path: &Path) -> Result<PluginRecord, ProbeError>;

    /// Read the record, logging and discarding any failure
    fn try_load(&self, path: &Path) -> Option<PluginRecord> {
        match self.probe(path) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "probe failed");
                None
            }
        }
    }
}

/// Probe that opens the file as a frei0r shared library
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryProbe;

impl PluginProbe for LibraryProbe {
    fn probe(&self, path: &Path) -> Result<PluginRecord, ProbeError> {
        abi::read_plugin_info(path).map(|info| PluginRecord::from_info(path, info))
    }
}
