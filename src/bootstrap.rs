//! Startup database initialization.
//!
//! [`DatabaseBootstrapper::initialize`] is a blocking boundary: it resolves the
//! configured scripts (`schema.sql`, then `data.sql` by default), runs them
//! through a [`ResourceDatabasePopulator`] and does not return until the
//! population has finished or failed. Async callers use
//! [`DatabaseBootstrapper::initialize_async`].

use crate::config::Config;
use crate::error::InitError;
use crate::populator::{DatabasePopulator, PopulatorSettings, ResourceDatabasePopulator};
use crate::resource::{DefaultResourceLoader, EmbeddedResources, ResourceLoader, ScriptResource};
use sqlx::SqlitePool;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info};

pub const DEFAULT_SCRIPT_LOCATIONS: [&str; 2] = ["classpath:schema.sql", "classpath:data.sql"];

pub struct DatabaseBootstrapper {
    loader: Box<dyn ResourceLoader>,
    locations: Vec<String>,
    settings: PopulatorSettings,
}

impl Default for DatabaseBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBootstrapper {
    /// Bundled `schema.sql` and `data.sql`, default script settings.
    pub fn new() -> Self {
        Self {
            loader: Box::new(DefaultResourceLoader::default()),
            locations: DEFAULT_SCRIPT_LOCATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            settings: PopulatorSettings::default(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let loader = DefaultResourceLoader::new(EmbeddedResources::bundled())
            .with_base_dir(cfg.resource_dir.clone());
        Self::new()
            .with_loader(loader)
            .with_locations(cfg.script_locations.clone())
            .with_settings(cfg.populator_settings())
    }

    pub fn with_loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_settings(mut self, settings: PopulatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Resolve every location in order. Nothing is executed here, so a missing
    /// script fails the bootstrap before any earlier script has run.
    pub fn resolve_scripts(&self) -> Result<Vec<ScriptResource>, InitError> {
        self.locations
            .iter()
            .map(|location| {
                let resource = self.loader.get_resource(location)?;
                if !resource.exists() {
                    return Err(InitError::ResourceNotFound {
                        location: location.clone(),
                    });
                }
                debug!(location = %location, resource = %resource, "resolved script");
                Ok(resource)
            })
            .collect()
    }

    pub fn populator(&self) -> Result<ResourceDatabasePopulator, InitError> {
        Ok(ResourceDatabasePopulator::new(self.resolve_scripts()?).with_settings(self.settings.clone()))
    }

    pub async fn initialize_async(&self, pool: &SqlitePool) -> Result<(), InitError> {
        info!(scripts = ?self.locations, "initializing database");
        let populator = self.populator()?;
        populator.populate(pool).await?;
        info!(scripts = self.locations.len(), "database initialized");
        Ok(())
    }

    /// Block the calling thread until the scripts have run.
    ///
    /// Outside a runtime a private current-thread runtime drives the work.
    /// Inside a multi-thread runtime the worker blocks in place. A
    /// current-thread runtime cannot be blocked without deadlocking, so that
    /// case is an [`InitError::Runtime`].
    pub fn initialize(&self, pool: &SqlitePool) -> Result<(), InitError> {
        match Handle::try_current() {
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| handle.block_on(self.initialize_async(pool)))
                }
                flavor => Err(InitError::Runtime(format!(
                    "{flavor:?} runtime cannot be blocked; use initialize_async"
                ))),
            },
            Err(_) => {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| InitError::Runtime(e.to_string()))?;
                rt.block_on(self.initialize_async(pool))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_locations_are_schema_then_data() {
        let bootstrapper = DatabaseBootstrapper::new();
        assert_eq!(
            bootstrapper.locations(),
            ["classpath:schema.sql", "classpath:data.sql"]
        );
        let scripts = bootstrapper.resolve_scripts().unwrap();
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].to_string(), "class path resource [schema.sql]");
        assert_eq!(scripts[1].to_string(), "class path resource [data.sql]");
    }

    #[test]
    fn missing_script_is_reported_by_location() {
        let loader = DefaultResourceLoader::new(
            EmbeddedResources::new().with("data.sql", "INSERT INTO t VALUES (1);"),
        );
        let bootstrapper = DatabaseBootstrapper::new().with_loader(loader);
        match bootstrapper.resolve_scripts() {
            Err(InitError::ResourceNotFound { location }) => {
                assert_eq!(location, "classpath:schema.sql")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unsupported_scheme_is_a_resource_error() {
        let bootstrapper =
            DatabaseBootstrapper::new().with_locations(vec!["ftp:schema.sql".to_string()]);
        assert!(matches!(
            bootstrapper.resolve_scripts(),
            Err(InitError::Resource(_))
        ));
    }
}
