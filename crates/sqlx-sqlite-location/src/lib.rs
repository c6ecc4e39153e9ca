//! # sqlx-sqlite-location
//!
//! Resolves where a SQLite database lives and hands out shared SQLx pools for it.
//!
//! ## Core Types
//!
//! - **[`DatabaseLocation`]**: Environment variable name plus a fallback path
//! - **[`Locator`]**: Resolves a location once or on every call, per [`ResolvePolicy`]
//! - **[`ResolvedLocation`]**: Resolved path and its SQLx connection string
//! - **[`PoolConfig`]**: Configuration for the pools opened by the registry
//! - **[`Error`]**: Error type for resolution
//!
//! ## Usage
//!
//! ```no_run
//! use sqlx_sqlite_location::{DatabaseLocation, Locator, PoolConfig, ResolvePolicy, pool_for};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let locator = Locator::new(
//!         DatabaseLocation::new("APP_DB_PATH", "data/app.db"),
//!         ResolvePolicy::CacheForProcess,
//!     );
//!
//!     // $APP_DB_PATH wins when set and non-empty, otherwise data/app.db
//!     let resolved = locator.resolve()?;
//!
//!     // Same path, same pool
//!     let pool = pool_for(&resolved, &PoolConfig::default()).await;
//!     let mut conn = pool.acquire().await?;
//!     sqlx::query("CREATE TABLE IF NOT EXISTS users (name TEXT)")
//!         .execute(&mut *conn)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! - Pooling, locking and file creation are left to SQLx and SQLite
//! - The only filesystem work done here is creating the parent directory
//! - Resolution caching is runtime configuration, never a build flag
//!
mod config;
mod error;
mod location;
mod registry;

// Re-export public types
pub use config::{PoolConfig, ResolvePolicy};
pub use error::Error;
pub use location::{DatabaseLocation, Locator, ResolvedLocation, connection_string};
pub use registry::{close_pool, pool_for};

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
