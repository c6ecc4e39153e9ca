use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::Sqlite;
use sqlx::Row as _;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx_sqlite_location::{DatabaseLocation, Locator, PoolConfig, ResolvePolicy};
use tracing::debug;

use crate::decode::{Row, decode_rows, to_json};
use crate::error::{Error, Result};
use crate::params::{Parameter, SqliteQuery, expand_named};
use crate::sink::{ErrorSink, NoopSink};

/// Configuration for a [`Database`]
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_helper::{DatabaseConfig, ResolvePolicy};
///
/// // Tests redirect the database through the environment variable
/// let config = DatabaseConfig {
///     resolve: ResolvePolicy::ResolveEveryCall,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
   /// Whether the location is resolved once or on every operation
   ///
   /// Default: `CacheForProcess`
   pub resolve: ResolvePolicy,

   /// Settings for the pool opened for the resolved location
   pub pool: PoolConfig,
}

/// Table-oriented access to a SQLite database whose file is located through
/// an environment variable with a fallback path.
///
/// Every operation acquires a pooled connection, runs one statement (or one
/// catalog query followed by its statements) and returns the connection to the
/// pool. Pooling, locking and busy handling are SQLx's and SQLite's.
///
/// Cloning is cheap; clones share the resolved location and the error sink.
#[derive(Clone)]
pub struct Database {
   locator: Arc<Locator>,
   pool_config: PoolConfig,
   sink: Arc<dyn ErrorSink>,
}

impl Database {
   /// Create a database handle. Nothing is resolved or opened until the first
   /// operation runs.
   ///
   /// # Examples
   ///
   /// ```no_run
   /// # async fn example() -> Result<(), sqlx_sqlite_helper::Error> {
   /// use sqlx_sqlite_helper::{Database, DatabaseLocation, Parameter};
   ///
   /// let db = Database::new(DatabaseLocation::new("APP_DB_PATH", "data/app.db"), None);
   ///
   /// db.run_command("CREATE TABLE IF NOT EXISTS users (name TEXT)", vec![]).await?;
   /// db.run_command(
   ///     "INSERT INTO users (name) VALUES (:name)",
   ///     vec![Parameter::new("name", "Alice")],
   /// ).await?;
   ///
   /// let count = db.run_scalar("SELECT COUNT(*) FROM users", vec![]).await?;
   /// println!("{count} users");
   /// # Ok(())
   /// # }
   /// ```
   pub fn new(location: DatabaseLocation, custom_config: Option<DatabaseConfig>) -> Self {
      let config = custom_config.unwrap_or_default();

      Self {
         locator: Arc::new(Locator::new(location, config.resolve)),
         pool_config: config.pool,
         sink: Arc::new(NoopSink),
      }
   }

   /// Replace the sink that receives connection error messages.
   pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
      self.sink = sink;
      self
   }

   pub fn location(&self) -> &DatabaseLocation {
      self.locator.location()
   }

   /// Connection string for the location as currently resolved.
   pub fn connection_string(&self) -> String {
      self.locator.attempted_connection_string()
   }

   /// Run a statement and return the number of rows it changed.
   pub async fn run_command(&self, sql: &str, params: Vec<Parameter>) -> Result<u64> {
      self
         .execute(sql, params, |conn, query| {
            Box::pin(async move {
               let result = query.execute(conn).await?;
               Ok::<_, sqlx::Error>(result.rows_affected())
            })
         })
         .await
   }

   /// Run a statement and return the first column of its first row.
   ///
   /// Returns `Null` when the statement yields no rows.
   pub async fn run_scalar(&self, sql: &str, params: Vec<Parameter>) -> Result<JsonValue> {
      self
         .execute(sql, params, |conn, query| {
            Box::pin(async move {
               let row = query.fetch_optional(conn).await?;
               let value = match row {
                  Some(row) if !row.columns().is_empty() => to_json(row.try_get_raw(0)?)?,
                  _ => JsonValue::Null,
               };
               Ok::<_, sqlx::Error>(value)
            })
         })
         .await
   }

   /// Run a query and return every row, in the order SQLite produced them.
   pub async fn run_query(&self, sql: &str, params: Vec<Parameter>) -> Result<Vec<Row>> {
      self
         .execute(sql, params, |conn, query| {
            Box::pin(async move {
               let rows = query.fetch_all(conn).await?;
               Ok::<_, sqlx::Error>(decode_rows(rows)?)
            })
         })
         .await
   }

   /// Close the pool for the current location and drop it from the registry.
   ///
   /// Later operations transparently open a new pool. Returns `false` when no
   /// pool was open.
   pub async fn close(&self) -> bool {
      sqlx_sqlite_location::close_pool(&self.locator.attempted_path()).await
   }

   /// Run `sql` with `params` on a pooled connection, handing the bound query
   /// to `projection`.
   ///
   /// Failing to resolve the location or to get a connection is a connection
   /// error; anything `projection` returns as an error is a content error. The
   /// connection goes back to the pool when this returns, on either path.
   pub(crate) async fn execute<T, F>(
      &self,
      sql: &str,
      params: Vec<Parameter>,
      projection: F,
   ) -> Result<T>
   where
      T: Send,
      F: Send,
      F: for<'c> FnOnce(
         &'c mut SqliteConnection,
         SqliteQuery<'c>,
      ) -> BoxFuture<'c, std::result::Result<T, sqlx::Error>>,
   {
      let mut conn = self.acquire(sql).await?;

      let statement = expand_named(sql, params);
      debug!(sql = %statement.sql, params = statement.values.len(), "executing statement");

      projection(&mut *conn, statement.to_query())
         .await
         .map_err(|source| Error::Content {
            sql: sql.to_string(),
            source,
         })
   }

   async fn acquire(&self, sql: &str) -> Result<PoolConnection<Sqlite>> {
      let resolved = match self.locator.resolve() {
         Ok(resolved) => resolved,
         Err(e) => {
            return Err(self.connection_error(
               self.locator.attempted_connection_string(),
               sql,
               e.into(),
            ));
         }
      };

      let pool = sqlx_sqlite_location::pool_for(&resolved, &self.pool_config).await;

      pool
         .acquire()
         .await
         .map_err(|e| self.connection_error(resolved.connection_string().to_string(), sql, e))
   }

   fn connection_error(&self, connection_string: String, sql: &str, source: sqlx::Error) -> Error {
      let err = Error::Connection {
         connection_string,
         sql: sql.to_string(),
         source,
      };
      self.sink.log(&err.to_string());
      err
   }
}
