//! TOML configuration file loading
//!
//! Supports `~/.config/frei0r-selector/config.toml` as a persistent config
//! source. All fields are optional; the file is a partial overlay on top of
//! defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SelectorConfigFile {
    /// Plugin discovery configuration
    #[serde(default)]
    pub plugins: PluginsFileConfig,

    /// Loader service configuration
    #[serde(default)]
    pub loader: LoaderFileConfig,

    /// Control surface configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Plugin discovery configuration
#[derive(Debug, Default, Deserialize)]
pub struct PluginsFileConfig {
    /// Directory to scan (e.g. "/usr/lib/frei0r-1/")
    pub path: Option<String>,

    /// Additional directories scanned after `path`
    pub extra_dirs: Option<Vec<String>>,

    /// Also scan the frei0r standard locations
    pub include_standard_dirs: Option<bool>,

    /// Plugin files that are never probed
    pub exclude: Option<Vec<String>>,
}

/// Loader service configuration
#[derive(Debug, Default, Deserialize)]
pub struct LoaderFileConfig {
    /// Base URL of the loader service
    pub url: Option<String>,

    /// How long to wait for the loader before dropping a request
    pub wait_timeout_ms: Option<u64>,
}

/// Control surface configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind
    pub bind: Option<String>,

    /// Port to listen on
    pub port: Option<u16>,
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `SelectorConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> SelectorConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return SelectorConfigFile::default();
    };

    if !path.exists() {
        return SelectorConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                SelectorConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            SelectorConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/frei0r-selector/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("frei0r-selector").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let fc: SelectorConfigFile = toml::from_str(
            r#"
            [plugins]
            path = "/opt/frei0r"
            exclude = ["/opt/frei0r/curves.so"]

            [loader]
            wait_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(fc.plugins.path.as_deref(), Some("/opt/frei0r"));
        assert_eq!(fc.plugins.exclude.unwrap().len(), 1);
        assert_eq!(fc.loader.wait_timeout_ms, Some(250));
        assert!(fc.loader.url.is_none());
        assert!(fc.server.port.is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let fc = load_config_file(Some(Path::new("/nonexistent/config.toml")));
        assert!(fc.plugins.path.is_none());
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[plugins\npath = ").unwrap();

        let fc = load_config_file(Some(&path));
        assert!(fc.plugins.path.is_none());
    }
}
