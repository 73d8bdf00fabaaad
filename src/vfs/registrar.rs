//! VFS registration routine run on extension load

use super::VfsRegistry;
use crate::config::ExtensionConfig;
use crate::error::Result;
use tracing::{info, warn};

/// Installs VFSes into a registry
///
/// Nothing is assumed about idempotence: calling `register` twice is allowed to
/// register twice.
pub trait Registrar {
    fn register(&self, registry: &dyn VfsRegistry) -> Result<()>;
}

impl<F> Registrar for F
where
    F: Fn(&dyn VfsRegistry) -> Result<()>,
{
    fn register(&self, registry: &dyn VfsRegistry) -> Result<()> {
        self(registry)
    }
}

enum ConfigSource {
    Environment,
    Fixed(ExtensionConfig),
}

/// Registers the skylite VFS described by an [`ExtensionConfig`]
pub struct SkyliteRegistrar {
    source: ConfigSource,
}

impl SkyliteRegistrar {
    /// Registrar with a fixed configuration
    pub fn new(config: ExtensionConfig) -> Self {
        Self {
            source: ConfigSource::Fixed(config),
        }
    }

    /// Registrar that reads its configuration from the environment when it runs
    pub fn from_env() -> Self {
        Self {
            source: ConfigSource::Environment,
        }
    }

    fn config(&self) -> Result<ExtensionConfig> {
        match &self.source {
            ConfigSource::Environment => ExtensionConfig::from_env(),
            ConfigSource::Fixed(config) => {
                config.validate()?;
                Ok(config.clone())
            }
        }
    }
}

impl Registrar for SkyliteRegistrar {
    fn register(&self, registry: &dyn VfsRegistry) -> Result<()> {
        let config = self.config()?;
        info!("Registering {} vfs", config.vfs_name);

        if registry.contains(&config.vfs_name) {
            warn!(
                "VFS '{}' is already registered; the new registration shadows it",
                config.vfs_name
            );
        }

        registry.install_alias(
            &config.vfs_name,
            config.base_vfs.as_ref(),
            config.make_default,
        )?;

        info!("Registered {} vfs", config.vfs_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkyliteError;
    use crate::validation::VfsName;
    use parking_lot::Mutex;

    /// In-memory registry: (name, base, make_default), newest first
    #[derive(Default)]
    struct MemoryRegistry {
        entries: Mutex<Vec<(String, Option<String>, bool)>>,
        known_bases: Vec<&'static str>,
        fail_with: Option<i32>,
    }

    impl VfsRegistry for MemoryRegistry {
        fn contains(&self, name: &VfsName) -> bool {
            self.known_bases.contains(&name.as_str())
                || self.entries.lock().iter().any(|(n, _, _)| n == name.as_str())
        }

        fn install_alias(
            &self,
            name: &VfsName,
            base: Option<&VfsName>,
            make_default: bool,
        ) -> Result<()> {
            if let Some(rc) = self.fail_with {
                return Err(SkyliteError::VFSRegistrationFailed(rc));
            }
            if let Some(base) = base {
                if !self.contains(base) {
                    return Err(SkyliteError::BaseVfsNotFound(base.to_string()));
                }
            }
            self.entries.lock().insert(
                0,
                (
                    name.to_string(),
                    base.map(|b| b.to_string()),
                    make_default,
                ),
            );
            Ok(())
        }
    }

    fn name(s: &str) -> VfsName {
        VfsName::new(s).unwrap()
    }

    #[test]
    fn test_registers_default_name() {
        let registry = MemoryRegistry::default();
        SkyliteRegistrar::new(ExtensionConfig::default())
            .register(&registry)
            .unwrap();

        let entries = registry.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], ("skylite".to_string(), None, false));
    }

    #[test]
    fn test_passes_base_and_default_flag() {
        let registry = MemoryRegistry {
            known_bases: vec!["unix"],
            ..Default::default()
        };
        let config = ExtensionConfig::new(name("cloud"))
            .with_base_vfs(name("unix"))
            .with_make_default(true);

        SkyliteRegistrar::new(config).register(&registry).unwrap();

        let entries = registry.entries.lock();
        assert_eq!(
            entries[0],
            ("cloud".to_string(), Some("unix".to_string()), true)
        );
    }

    #[test]
    fn test_missing_base_propagates() {
        let registry = MemoryRegistry::default();
        let config = ExtensionConfig::new(name("cloud")).with_base_vfs(name("unix"));

        let err = SkyliteRegistrar::new(config).register(&registry).unwrap_err();
        assert!(matches!(err, SkyliteError::BaseVfsNotFound(ref b) if b == "unix"));
        assert!(registry.entries.lock().is_empty());
    }

    #[test]
    fn test_registry_failure_propagates() {
        let registry = MemoryRegistry {
            fail_with: Some(libsqlite3_sys::SQLITE_NOMEM),
            ..Default::default()
        };

        let err = SkyliteRegistrar::new(ExtensionConfig::default())
            .register(&registry)
            .unwrap_err();
        assert_eq!(err.status_code(), libsqlite3_sys::SQLITE_NOMEM);
    }

    #[test]
    fn test_not_idempotent() {
        let registry = MemoryRegistry::default();
        let registrar = SkyliteRegistrar::new(ExtensionConfig::default());

        registrar.register(&registry).unwrap();
        registrar.register(&registry).unwrap();

        assert_eq!(registry.entries.lock().len(), 2);
    }

    #[test]
    fn test_invalid_fixed_config_rejected() {
        let registry = MemoryRegistry::default();
        let config = ExtensionConfig::new(name("unix")).with_base_vfs(name("unix"));

        let err = SkyliteRegistrar::new(config).register(&registry).unwrap_err();
        assert!(matches!(err, SkyliteError::Config(_)));
        assert!(registry.entries.lock().is_empty());
    }

    #[test]
    fn test_closure_registrar() {
        let registry = MemoryRegistry::default();
        let registrar = |r: &dyn VfsRegistry| r.install_alias(&name("plain"), None, false);

        registrar.register(&registry).unwrap();
        assert_eq!(registry.entries.lock()[0].0, "plain");
    }
}
