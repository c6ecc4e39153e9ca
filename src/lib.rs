//! Table-oriented helpers over a SQLite database located through the environment.
//!
//! This crate sits on top of `sqlx-sqlite-location`, which resolves the
//! database file and shares SQLx pools. It provides:
//!
//! - [`Database`] — main entry point; resolves its location lazily
//! - Parameterized statements: [`Database::run_command`], [`Database::run_scalar`],
//!   [`Database::run_query`], with named [`Parameter`]s
//! - Table maintenance: [`Database::list_tables`], [`Database::clear_table`],
//!   [`Database::clear_database`], [`Database::value_exists`]
//! - A three-way [`Error`] (connection, content, invalid argument) and an
//!   [`ErrorSink`] notified of connection errors
//!
//! # Example
//!
//! ```no_run
//! use sqlx_sqlite_helper::{Database, DatabaseLocation, Parameter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseLocation::new("APP_DB_PATH", "data/app.db"), None);
//!
//! db.run_command("CREATE TABLE users (name TEXT, email TEXT)", vec![]).await?;
//! db.run_command(
//!    "INSERT INTO users (name, email) VALUES (:name, :email)",
//!    vec![
//!       Parameter::new("name", "Alice"),
//!       Parameter::new("email", "alice@example.com"),
//!    ],
//! ).await?;
//!
//! let rows = db.run_query("SELECT * FROM users", vec![]).await?;
//! assert_eq!(rows[0]["name"], "Alice");
//!
//! assert!(db.value_exists("users", "email", "alice@example.com").await?);
//! assert_eq!(db.list_tables().await?, ["users"]);
//!
//! db.clear_database().await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod decode;
mod error;
mod params;
mod sink;
mod tables;

pub use database::{Database, DatabaseConfig};
pub use decode::Row;
pub use error::{Error, Result};
pub use params::Parameter;
pub use sink::{ErrorSink, NoopSink, TracingSink};

// Re-export commonly used types from dependencies
pub use sqlx_sqlite_location::{DatabaseLocation, PoolConfig, ResolvePolicy};
