//! Populate operations: run SQL scripts against a connection factory.

pub mod script;

pub use script::{ScriptSettings, split_statements};

use crate::error::PopulateError;
use crate::resource::ScriptResource;
use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};
use std::time::Instant;
use tracing::{debug, warn};

/// Something that brings a database into a known state.
pub trait DatabasePopulator: Send + Sync {
    fn populate<'a>(&'a self, pool: &'a SqlitePool) -> BoxFuture<'a, Result<(), PopulateError>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulatorSettings {
    pub script: ScriptSettings,
    /// Log and skip failed statements instead of aborting.
    pub continue_on_error: bool,
    /// Log and skip failed `DROP` statements.
    pub ignore_failed_drops: bool,
}

/// Executes an ordered list of script resources, one statement at a time,
/// over a single connection taken from the pool.
#[derive(Debug, Clone, Default)]
pub struct ResourceDatabasePopulator {
    scripts: Vec<ScriptResource>,
    settings: PopulatorSettings,
}

impl ResourceDatabasePopulator {
    pub fn new(scripts: Vec<ScriptResource>) -> Self {
        Self {
            scripts,
            settings: PopulatorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PopulatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.settings.continue_on_error = enabled;
        self
    }

    pub fn ignore_failed_drops(mut self, enabled: bool) -> Self {
        self.settings.ignore_failed_drops = enabled;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.settings.script.separator = separator.into();
        self
    }

    pub fn scripts(&self) -> &[ScriptResource] {
        &self.scripts
    }

    pub fn settings(&self) -> &PopulatorSettings {
        &self.settings
    }

    async fn run(&self, pool: &SqlitePool) -> Result<(), PopulateError> {
        let mut conn = pool.acquire().await?;
        for script in &self.scripts {
            execute_sql_script(&mut conn, script, &self.settings).await?;
        }
        Ok(())
    }
}

impl DatabasePopulator for ResourceDatabasePopulator {
    fn populate<'a>(&'a self, pool: &'a SqlitePool) -> BoxFuture<'a, Result<(), PopulateError>> {
        Box::pin(self.run(pool))
    }
}

/// Runs several populators one after another, stopping at the first failure.
#[derive(Default)]
pub struct CompositeDatabasePopulator {
    populators: Vec<Box<dyn DatabasePopulator>>,
}

impl CompositeDatabasePopulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, populator: impl DatabasePopulator + 'static) -> Self {
        self.populators.push(Box::new(populator));
        self
    }

    pub fn len(&self) -> usize {
        self.populators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populators.is_empty()
    }
}

impl DatabasePopulator for CompositeDatabasePopulator {
    fn populate<'a>(&'a self, pool: &'a SqlitePool) -> BoxFuture<'a, Result<(), PopulateError>> {
        Box::pin(async move {
            for populator in &self.populators {
                populator.populate(pool).await?;
            }
            Ok(())
        })
    }
}

/// Read, split and execute one script on `conn`.
pub async fn execute_sql_script(
    conn: &mut SqliteConnection,
    resource: &ScriptResource,
    settings: &PopulatorSettings,
) -> Result<(), PopulateError> {
    let started = Instant::now();
    let name = resource.to_string();
    debug!(resource = %name, "executing SQL script");

    let script = resource
        .read()
        .map_err(|source| PopulateError::CannotReadScript {
            resource: name.clone(),
            source,
        })?;
    let statements =
        split_statements(&script, &settings.script).map_err(|source| PopulateError::ScriptParse {
            resource: name.clone(),
            source,
        })?;

    let mut executed = 0usize;
    for (idx, statement) in statements.iter().enumerate() {
        let statement_number = idx + 1;
        match sqlx::query(statement).execute(&mut *conn).await {
            Ok(result) => {
                executed += 1;
                debug!(
                    resource = %name,
                    statement_number,
                    rows_affected = result.rows_affected(),
                    "statement executed"
                );
            }
            Err(e) if settings.ignore_failed_drops && is_drop(statement) => {
                debug!(resource = %name, statement_number, error = %e, "ignoring failed DROP");
            }
            Err(e) if settings.continue_on_error => {
                warn!(
                    resource = %name,
                    statement_number,
                    statement = %statement,
                    error = %e,
                    "statement failed; continuing"
                );
            }
            Err(source) => {
                return Err(PopulateError::StatementFailed {
                    statement_number,
                    resource: name,
                    statement: statement.clone(),
                    source,
                });
            }
        }
    }

    debug!(
        resource = %name,
        statements = statements.len(),
        executed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "SQL script executed"
    );
    Ok(())
}

fn is_drop(statement: &str) -> bool {
    statement
        .trim_start()
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("drop"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_drop_statements() {
        assert!(is_drop("DROP TABLE t"));
        assert!(is_drop("  drop index i"));
        assert!(!is_drop("CREATE TABLE dropped (id INTEGER)"));
        assert!(!is_drop("dr"));
    }

    #[test]
    fn builder_updates_settings() {
        let populator = ResourceDatabasePopulator::new(Vec::new())
            .continue_on_error(true)
            .ignore_failed_drops(true)
            .separator("GO");
        assert!(populator.settings().continue_on_error);
        assert!(populator.settings().ignore_failed_drops);
        assert_eq!(populator.settings().script.separator, "GO");
        assert!(populator.scripts().is_empty());
    }
}
