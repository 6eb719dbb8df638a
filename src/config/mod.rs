//! Configuration management for the frei0r selector
//!
//! Precedence: CLI flag / environment > config file > default.

pub mod file;

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::plugins::{DEFAULT_PLUGIN_DIR, standard_plugin_dirs};
use crate::selector::DEFAULT_WAIT_TIMEOUT;
use crate::{Error, Result};

use file::SelectorConfigFile;

/// Default loader service URL
pub const DEFAULT_LOADER_URL: &str = "http://127.0.0.1:18790";

/// Default control surface port
pub const DEFAULT_PORT: u16 = 18791;

/// Selector configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Plugin discovery
    pub plugins: PluginsConfig,

    /// Loader service
    pub loader: LoaderConfig,

    /// Control surface
    pub server: ServerConfig,
}

/// Plugin discovery configuration
#[derive(Debug, Clone)]
pub struct PluginsConfig {
    /// Primary directory to scan
    pub path: PathBuf,

    /// Additional directories scanned after `path`
    pub extra_dirs: Vec<PathBuf>,

    /// Also scan the frei0r standard locations
    pub include_standard_dirs: bool,

    /// Plugin files that are never probed
    pub exclude: Vec<PathBuf>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PLUGIN_DIR),
            extra_dirs: Vec::new(),
            include_standard_dirs: false,
            exclude: Vec::new(),
        }
    }
}

impl PluginsConfig {
    /// Directories to scan in order, without duplicates
    #[must_use]
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.path.clone()];
        dirs.extend(self.extra_dirs.iter().cloned());
        if self.include_standard_dirs {
            dirs.extend(standard_plugin_dirs());
        }

        let mut unique: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let key = normalize(&dir);
            if !unique.iter().any(|d| normalize(d) == key) {
                unique.push(dir);
            }
        }
        unique
    }
}

/// Compare directories regardless of a trailing separator
fn normalize(dir: &std::path::Path) -> PathBuf {
    dir.components().collect()
}

/// Loader service configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base URL of the loader service
    pub url: String,

    /// Wait bound before a request is dropped
    pub wait_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LOADER_URL.to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// Control surface configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: IpAddr,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; the standard path is used when `None`
    pub config_file: Option<PathBuf>,
    pub plugin_path: Option<PathBuf>,
    pub loader_url: Option<String>,
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration with defaults and the standard config file
    ///
    /// # Errors
    ///
    /// Returns error if the config file holds an invalid value
    pub fn load() -> Result<Self> {
        Self::load_with_options(&LoadOptions::default())
    }

    /// Load configuration with explicit overrides
    ///
    /// # Errors
    ///
    /// Returns error if the config file holds an invalid value
    pub fn load_with_options(options: &LoadOptions) -> Result<Self> {
        let fc = file::load_config_file(options.config_file.as_deref());
        Self::from_parts(fc, options)
    }

    /// Merge a parsed config file with overrides (overrides > file > default)
    ///
    /// # Errors
    ///
    /// Returns error if the bind address in the file cannot be parsed
    pub fn from_parts(fc: SelectorConfigFile, options: &LoadOptions) -> Result<Self> {
        let defaults = Self::default();

        let plugins = PluginsConfig {
            path: options
                .plugin_path
                .clone()
                .or_else(|| fc.plugins.path.map(PathBuf::from))
                .unwrap_or(defaults.plugins.path),
            extra_dirs: fc
                .plugins
                .extra_dirs
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            include_standard_dirs: fc
                .plugins
                .include_standard_dirs
                .unwrap_or(defaults.plugins.include_standard_dirs),
            exclude: fc
                .plugins
                .exclude
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        };

        let loader = LoaderConfig {
            url: options
                .loader_url
                .clone()
                .or(fc.loader.url)
                .unwrap_or(defaults.loader.url),
            wait_timeout: fc
                .loader
                .wait_timeout_ms
                .map_or(defaults.loader.wait_timeout, Duration::from_millis),
        };

        let file_bind = fc
            .server
            .bind
            .map(|b| {
                b.parse::<IpAddr>()
                    .map_err(|e| Error::Config(format!("invalid bind address {b:?}: {e}")))
            })
            .transpose()?;

        let server = ServerConfig {
            bind: options.bind.or(file_bind).unwrap_or(defaults.server.bind),
            port: options.port.or(fc.server.port).unwrap_or(defaults.server.port),
        };

        Ok(Self {
            plugins,
            loader,
            server,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_frei0r_layout() {
        let config = Config::from_parts(SelectorConfigFile::default(), &LoadOptions::default())
            .unwrap();
        assert_eq!(config.plugins.path, PathBuf::from("/usr/lib/frei0r-1/"));
        assert_eq!(config.loader.wait_timeout, Duration::from_millis(100));
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.plugins.search_dirs().len(), 1);
    }

    #[test]
    fn options_override_file() {
        let fc: SelectorConfigFile = toml::from_str(
            r#"
            [plugins]
            path = "/from/file"
            [loader]
            url = "http://file:1"
            [server]
            port = 1000
            "#,
        )
        .unwrap();
        let options = LoadOptions {
            plugin_path: Some(PathBuf::from("/from/cli")),
            port: Some(2000),
            ..Default::default()
        };

        let config = Config::from_parts(fc, &options).unwrap();
        assert_eq!(config.plugins.path, PathBuf::from("/from/cli"));
        assert_eq!(config.loader.url, "http://file:1");
        assert_eq!(config.server.port, 2000);
    }

    #[test]
    fn invalid_bind_is_config_error() {
        let fc: SelectorConfigFile = toml::from_str("[server]\nbind = \"not-an-ip\"").unwrap();
        let err = Config::from_parts(fc, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn search_dirs_deduplicate() {
        let plugins = PluginsConfig {
            path: PathBuf::from("/usr/lib/frei0r-1/"),
            extra_dirs: vec![PathBuf::from("/opt/fx"), PathBuf::from("/usr/lib/frei0r-1")],
            include_standard_dirs: true,
            exclude: Vec::new(),
        };

        let dirs = plugins.search_dirs();
        assert_eq!(dirs[0], PathBuf::from("/usr/lib/frei0r-1/"));
        assert_eq!(dirs[1], PathBuf::from("/opt/fx"));
        assert_eq!(
            dirs.iter()
                .filter(|d| normalize(d) == PathBuf::from("/usr/lib/frei0r-1"))
                .count(),
            1
        );
    }
}
