//! Table maintenance built on the schema catalog

use serde_json::Value as JsonValue;
use sqlx::Row as _;
use tracing::debug;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::params::Parameter;

/// User tables from the schema catalog, by name. SQLite's own `sqlite_*`
/// tables are left out since they can be neither cleared nor dropped.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
   WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
   ORDER BY name";

impl Database {
   /// Names of all user tables, in name order.
   pub async fn list_tables(&self) -> Result<Vec<String>> {
      self
         .execute(LIST_TABLES_SQL, Vec::new(), |conn, query| {
            Box::pin(async move {
               let rows = query.fetch_all(conn).await?;
               rows
                  .iter()
                  .map(|row| row.try_get::<String, _>(0))
                  .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            })
         })
         .await
   }

   /// Delete every row of `name`, keeping the table.
   ///
   /// Does nothing when no table of that exact name exists. The existence
   /// check and the delete are separate round trips, so a table dropped in
   /// between surfaces as a content error.
   pub async fn clear_table(&self, name: &str) -> Result<()> {
      if !self.list_tables().await?.iter().any(|table| table == name) {
         debug!(table = name, "table not found, nothing to clear");
         return Ok(());
      }

      let sql = format!("DELETE FROM {}", quote_identifier(name));
      self.run_command(&sql, Vec::new()).await?;
      Ok(())
   }

   /// Drop every user table.
   pub async fn clear_database(&self) -> Result<()> {
      for table in self.list_tables().await? {
         let sql = format!("DROP TABLE {}", quote_identifier(&table));
         self.run_command(&sql, Vec::new()).await?;
      }
      Ok(())
   }

   /// Whether any row of `table` has `column` equal to `value`.
   ///
   /// An empty `table` or `column`, or a `Null` value, is rejected with
   /// [`Error::InvalidArgument`] before the database is touched. A table or
   /// column that does not exist is reported by SQLite as a content error.
   ///
   /// # Examples
   ///
   /// ```no_run
   /// # async fn example(db: &sqlx_sqlite_helper::Database) -> Result<(), sqlx_sqlite_helper::Error> {
   /// if db.value_exists("users", "email", "alice@example.com").await? {
   ///     println!("already registered");
   /// }
   /// # Ok(())
   /// # }
   /// ```
   pub async fn value_exists(
      &self,
      table: &str,
      column: &str,
      value: impl Into<JsonValue>,
   ) -> Result<bool> {
      if table.trim().is_empty() {
         return Err(Error::InvalidArgument("table"));
      }
      if column.trim().is_empty() {
         return Err(Error::InvalidArgument("column"));
      }
      let value = value.into();
      if value.is_null() {
         return Err(Error::InvalidArgument("value"));
      }

      let sql = format!(
         "SELECT COUNT(1) FROM {} WHERE {} = :value",
         quote_identifier(table),
         quote_identifier(column)
      );
      let count = self
         .run_scalar(&sql, vec![Parameter::new("value", value)])
         .await?;

      Ok(count.as_i64().is_some_and(|n| n != 0))
   }
}

/// Quote an identifier with backticks, doubling embedded backticks.
///
/// Unlike double quotes, SQLite never reinterprets a backtick-quoted name as a
/// string literal, so a missing column is an error rather than a silent match
/// against its own name.
fn quote_identifier(name: &str) -> String {
   format!("`{}`", name.replace('`', "``"))
}
