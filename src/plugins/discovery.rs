//! Plugin discovery - scan directories for frei0r shared libraries

use std::path::{Path, PathBuf};

use super::probe::{LibraryProbe, PluginProbe};
use super::record::{PluginRecord, PluginType};
use super::selection::SelectionMap;

/// Directory the distribution `frei0r-plugins` package installs into
pub const DEFAULT_PLUGIN_DIR: &str = "/usr/lib/frei0r-1/";

/// Directory scanner
///
/// Probes every direct entry of each directory and keeps the ones whose
/// declared type is accepted.
#[derive(Debug, Clone)]
pub struct Scanner<P = LibraryProbe> {
    probe: P,
    accepted: Vec<PluginType>,
    excluded: Vec<PathBuf>,
}

impl Default for Scanner<LibraryProbe> {
    fn default() -> Self {
        Self::new(LibraryProbe)
    }
}

impl<P: PluginProbe> Scanner<P> {
    /// Scanner accepting source and filter plugins
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            accepted: PluginType::SELECTABLE.to_vec(),
            excluded: Vec::new(),
        }
    }

    /// Replace the accepted type set
    #[must_use]
    pub fn with_accepted(mut self, accepted: impl IntoIterator<Item = PluginType>) -> Self {
        self.accepted = accepted.into_iter().collect();
        self
    }

    /// Paths that are never probed
    #[must_use]
    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = PathBuf>) -> Self {
        self.excluded = excluded.into_iter().collect();
        self
    }

    /// Probe all candidates and return accepted records in traversal order
    ///
    /// Missing directories are skipped. A directory that cannot be read is
    /// logged and skipped; the scan continues with the rest.
    #[must_use]
    pub fn discover(&self, dirs: &[PathBuf]) -> Vec<PluginRecord> {
        let mut results = Vec::new();

        for dir in dirs {
            if !dir.is_dir() {
                tracing::debug!(path = %dir.display(), "plugin directory does not exist, skipping");
                continue;
            }

            for path in list_candidates(dir) {
                if self.excluded.iter().any(|ex| ex == &path) {
                    tracing::info!(path = %path.display(), "skipping excluded plugin");
                    continue;
                }

                let Some(record) = self.probe.try_load(&path) else {
                    continue;
                };

                if !self.accepted.contains(&record.plugin_type) {
                    tracing::debug!(
                        path = %path.display(),
                        name = %record.name,
                        plugin_type = %record.plugin_type,
                        "plugin type not selectable"
                    );
                    continue;
                }

                tracing::info!(
                    name = %record.name,
                    plugin_type = %record.plugin_type,
                    path = %path.display(),
                    "discovered plugin"
                );
                results.push(record);
            }
        }

        results
    }

    /// Build the selection map for `dirs`
    #[must_use]
    pub fn scan(&self, dirs: &[PathBuf]) -> SelectionMap {
        SelectionMap::from_records(&self.discover(dirs))
    }
}

/// Regular files directly inside `dir`, sorted by file name
fn list_candidates(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "failed to read plugin directory");
            return Vec::new();
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    paths.push(path);
                }
            }
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "error while listing plugin directory");
            }
        }
    }

    paths.sort();
    paths
}

/// frei0r standard search locations
#[must_use]
pub fn standard_plugin_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/lib/frei0r-1"),
        PathBuf::from("/usr/local/lib/frei0r-1"),
    ];

    if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
        dirs.push(home.join(".frei0r-1").join("lib"));
    }

    dirs
}
