pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod populator;
pub mod resource;

pub use bootstrap::DatabaseBootstrapper;
pub use error::{InitError, PopulateError};
pub use populator::{DatabasePopulator, ResourceDatabasePopulator};
pub use resource::{DefaultResourceLoader, ResourceLoader, ScriptResource};
