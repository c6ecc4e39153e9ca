//! Configuration for location resolution and SQLite connection pools

use serde::{Deserialize, Serialize};

/// When a [`Locator`](crate::Locator) resolves its database location
///
/// Production code resolves once and keeps the result. Tests that swap the
/// backing file through the environment variable use `ResolveEveryCall`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
   /// Resolve on first use and reuse the result for the locator's lifetime
   #[default]
   CacheForProcess,

   /// Resolve again on every call
   ///
   /// Every distinct path resolved this way gets its own pool in the
   /// process-wide registry, and that pool stays registered until it is
   /// closed with [`close_pool`](crate::close_pool). Close the pool before
   /// pointing the environment variable elsewhere when the old file is done
   /// with.
   ResolveEveryCall,
}

/// Configuration for the SQLx pool opened for a database location
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_location::PoolConfig;
///
/// // Use defaults
/// let config = PoolConfig::default();
///
/// // Override just one field
/// let config = PoolConfig {
///     max_connections: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
   /// Maximum number of pooled connections
   ///
   /// Default: 6
   pub max_connections: u32,

   /// Idle timeout for pooled connections (in seconds)
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30
   pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
   fn default() -> Self {
      Self {
         max_connections: 6,
         idle_timeout_secs: 30,
      }
   }
}
