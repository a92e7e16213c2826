//! Scripts compiled into the binary, addressed by name through `classpath:` locations.

use std::collections::HashMap;
use std::sync::Arc;

pub const SCHEMA_SQL: &str = include_str!("../../resources/schema.sql");
pub const DATA_SQL: &str = include_str!("../../resources/data.sql");

#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    scripts: HashMap<String, Arc<str>>,
}

impl EmbeddedResources {
    /// Empty set; nothing resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scripts shipped with this crate: `schema.sql` and `data.sql`.
    pub fn bundled() -> Self {
        Self::new()
            .with("schema.sql", SCHEMA_SQL)
            .with("data.sql", DATA_SQL)
    }

    pub fn with(mut self, name: impl Into<String>, sql: impl Into<Arc<str>>) -> Self {
        self.scripts.insert(name.into(), sql.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<str>> {
        self.scripts.get(name).cloned()
    }
}
