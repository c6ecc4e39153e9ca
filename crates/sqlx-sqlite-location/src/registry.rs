//! Process-wide registry of SQLx pools keyed by database path

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::PoolConfig;
use crate::location::ResolvedLocation;

static POOLS: LazyLock<Mutex<HashMap<PathBuf, SqlitePool>>> =
   LazyLock::new(|| Mutex::new(HashMap::new()));

/// Get the pool for a resolved location, opening one if none is registered.
///
/// Pools are created lazily: no connection is made until the first acquire, so
/// an unreachable database surfaces when a connection is requested. The
/// `config` only applies when a new pool is opened; an existing pool for the
/// same path is shared as-is. Closed pools are replaced.
///
/// Connections open with `foreign_keys` off, the SQLite engine default, so
/// tables can be emptied or dropped in any order.
pub async fn pool_for(location: &ResolvedLocation, config: &PoolConfig) -> SqlitePool {
   let mut pools = POOLS.lock().await;

   if let Some(pool) = pools.get(location.path())
      && !pool.is_closed()
   {
      return pool.clone();
   }

   let options = SqliteConnectOptions::new()
      .filename(location.path())
      .create_if_missing(true)
      .foreign_keys(false);

   let pool = SqlitePoolOptions::new()
      .max_connections(config.max_connections)
      .min_connections(0)
      .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
      .connect_lazy_with(options);

   debug!(
      connection_string = location.connection_string(),
      max_connections = config.max_connections,
      "registered sqlite pool"
   );

   pools.insert(location.path().to_path_buf(), pool.clone());
   pool
}

/// Remove the pool for a database path from the registry and close it.
///
/// Waits for checked-out connections to be returned. Returns `false` when no
/// pool was registered.
pub async fn close_pool(path: &Path) -> bool {
   let pool = POOLS.lock().await.remove(path);

   match pool {
      Some(pool) => {
         pool.close().await;
         debug!(path = %path.display(), "closed sqlite pool");
         true
      }
      None => false,
   }
}
