//! Configuration management for opc-cli.
//!
//! Loads configuration from ${OPC_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly or run `cargo xtask`.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for configuration and snapshot directories.
    //!
    //! OPC_HOME resolution order:
    //! 1. OPC_HOME environment variable (if set)
    //! 2. ~/.config/opc (default)

    use std::path::PathBuf;

    /// Returns the opc home directory.
    pub fn opc_home() -> PathBuf {
        if let Ok(home) = std::env::var("OPC_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("opc")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        opc_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Verbose provider logging
    pub debug: bool,

    /// Page size for `browse` when no limit is given
    pub browse_limit: u16,

    /// Directory of server snapshots, relative to OPC_HOME unless absolute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers_dir: Option<String>,
}

impl Config {
    const DEFAULT_BROWSE_LIMIT: u16 = 20;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the snapshot directory against `home`.
    pub fn servers_dir_in(&self, home: &Path) -> PathBuf {
        match self.servers_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() { dir } else { home.join(dir) }
            }
            _ => home.join("servers"),
        }
    }

    /// Resolves the snapshot directory against OPC_HOME.
    pub fn servers_dir(&self) -> PathBuf {
        self.servers_dir_in(&paths::opc_home())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `cargo xtask` to keep `default_config.toml` in sync with the
    /// values in `Config::default()`. Comments come from the embedded
    /// template; values come from the defaults.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        for (key, value) in generated_doc.as_table() {
            if let Item::Value(v) = value {
                match doc.get_mut(key) {
                    Some(Item::Value(existing)) => {
                        let decor = existing.decor().clone();
                        *existing = v.clone();
                        *existing.decor_mut() = decor;
                    }
                    _ => {
                        doc[key] = Item::Value(v.clone());
                    }
                }
            }
        }

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            browse_limit: Self::DEFAULT_BROWSE_LIMIT,
            servers_dir: None,
        }
    }
}
