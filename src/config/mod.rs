//! Configuration for writing XML files.
//!
//! Settings are read from `~/.config/xmlbind/config.toml`. Every field is
//! optional in the file; missing fields take their defaults.
//!
//! # Example
//!
//! ```
//! use xmlbind::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert!(config.write_declaration);
//!
//! let compact = Config {
//!     indent_size: 0,
//!     ..Config::default()
//! };
//! assert_eq!(compact.indent_size, 0);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings that control how documents are written to disk.
///
/// # Fields
///
/// * `indent_size` - Spaces per nesting level, 0 writes everything on one line (default: 2)
/// * `write_declaration` - Emit `<?xml version="1.0"?>` for newly created documents (default: true)
/// * `create_backup` - Copy an existing file to `<name>.bak` before overwriting it (default: false)
/// * `compress_gz` - Gzip-compress files whose name ends in `.gz` (default: true)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per nesting level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Emit an XML declaration for newly created documents
    #[serde(default = "default_write_declaration")]
    pub write_declaration: bool,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,

    /// Compress files ending in .gz
    #[serde(default = "default_compress_gz")]
    pub compress_gz: bool,
}

fn default_indent_size() -> usize {
    2
}

fn default_write_declaration() -> bool {
    true
}

fn default_compress_gz() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            write_declaration: default_write_declaration(),
            create_backup: false,
            compress_gz: default_compress_gz(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/xmlbind/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("xmlbind");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't
    /// be parsed. A parse failure is logged.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|err| {
            tracing::warn!("config: using defaults, {err:#}");
            Self::default()
        })
    }

    /// Loads configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    /// Saves configuration to a specific file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
