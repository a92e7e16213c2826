//! Connection factory for the target database.
//!
//! Layout:
//! - `sqlite.rs`: pool construction from a `sqlite:` URL

pub mod sqlite;

pub use sqlite::{SqlitePool, connect, connect_with};
