use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Failure of the startup bootstrap as seen by the caller.
#[derive(Debug, ThisError)]
pub enum InitError {
    #[error("script resource not found: {location}")]
    ResourceNotFound { location: String },

    #[error("invalid script location: {0}")]
    Resource(#[from] ResourceError),

    #[error("database population failed: {0}")]
    PopulationFailed(#[from] PopulateError),

    #[error("cannot block on database population: {0}")]
    Runtime(String),
}

#[derive(Debug, ThisError)]
pub enum ResourceError {
    #[error("unsupported resource scheme '{scheme}' in location '{location}'")]
    UnsupportedScheme { scheme: String, location: String },

    #[error("empty resource location")]
    EmptyLocation,
}

/// Errors reported by a populate operation.
#[derive(Debug, ThisError)]
pub enum PopulateError {
    #[error("cannot read SQL script from {resource}: {source}")]
    CannotReadScript {
        resource: String,
        source: std::io::Error,
    },

    #[error("failed to parse SQL script from {resource}: {source}")]
    ScriptParse {
        resource: String,
        source: ScriptError,
    },

    #[error("statement #{statement_number} of {resource} failed: {statement}: {source}")]
    StatementFailed {
        statement_number: usize,
        resource: String,
        statement: String,
        source: SqlxError,
    },

    #[error("cannot obtain database connection: {0}")]
    Connection(#[from] SqlxError),
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ScriptError {
    #[error("missing block comment end delimiter '{delimiter}'")]
    UnterminatedBlockComment { delimiter: String },

    #[error("statement separator must not be empty")]
    EmptySeparator,

    #[error("block comment end delimiter must not be empty when start delimiter '{start}' is set")]
    EmptyBlockCommentEnd { start: String },
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(Box::new(e))
    }
}

#[derive(Debug, ThisError)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),
}

impl PopulateError {
    /// Description of the script resource involved, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            PopulateError::CannotReadScript { resource, .. }
            | PopulateError::ScriptParse { resource, .. }
            | PopulateError::StatementFailed { resource, .. } => Some(resource),
            PopulateError::Connection(_) => None,
        }
    }
}
