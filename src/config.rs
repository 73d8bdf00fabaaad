//! Extension configuration
//!
//! A loadable extension receives no arguments from `load_extension()`, so the
//! settings come from the process environment:
//!
//! - `SKYLITE_CONFIG`: path to a TOML file with the fields of [`ExtensionConfig`]
//! - `SKYLITE_VFS_NAME`, `SKYLITE_BASE_VFS`, `SKYLITE_MAKE_DEFAULT`: per-field
//!   overrides, applied after the file
//!
//! ```toml
//! vfs_name = "skylite"
//! base_vfs = "unix"
//! make_default = false
//! ```

use crate::error::{Result, SkyliteError};
use crate::validation::VfsName;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_CONFIG_PATH: &str = "SKYLITE_CONFIG";
pub const ENV_VFS_NAME: &str = "SKYLITE_VFS_NAME";
pub const ENV_BASE_VFS: &str = "SKYLITE_BASE_VFS";
pub const ENV_MAKE_DEFAULT: &str = "SKYLITE_MAKE_DEFAULT";

/// Settings for the VFS the extension registers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Name the VFS is registered under
    pub vfs_name: VfsName,

    /// VFS that the registered one delegates to; the host default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_vfs: Option<VfsName>,

    /// Make the registered VFS the host's default
    pub make_default: bool,
}

impl ExtensionConfig {
    /// Configuration registering `vfs_name` over the host default VFS
    pub fn new(vfs_name: VfsName) -> Self {
        Self {
            vfs_name,
            ..Self::default()
        }
    }

    pub fn with_base_vfs(mut self, base: VfsName) -> Self {
        self.base_vfs = Some(base);
        self
    }

    pub fn with_make_default(mut self, make_default: bool) -> Self {
        self.make_default = make_default;
        self
    }

    /// Parse a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: ExtensionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading extension config from {:?}", path.as_ref());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Resolve the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, which maps an environment
    /// key to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(name) = lookup(ENV_VFS_NAME) {
            config.vfs_name = VfsName::new(name)?;
        }
        if let Some(base) = lookup(ENV_BASE_VFS) {
            config.base_vfs = if base.is_empty() {
                None
            } else {
                Some(VfsName::new(base)?)
            };
        }
        if let Some(flag) = lookup(ENV_MAKE_DEFAULT) {
            config.make_default = parse_flag(ENV_MAKE_DEFAULT, &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.base_vfs.as_ref() == Some(&self.vfs_name) {
            return Err(SkyliteError::Config(format!(
                "VFS '{}' cannot delegate to itself",
                self.vfs_name
            )));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SkyliteError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
