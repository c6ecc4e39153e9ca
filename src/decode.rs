//! Conversion of SQLite values and rows into JSON scalars

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row as _, TypeInfo, Value, ValueRef};
use time::PrimitiveDateTime;

/// A result row: column name to value, in the column order SQLite reported.
pub type Row = IndexMap<String, JsonValue>;

/// Convert a SQLite value to a JSON value.
///
/// BLOB values are returned as base64-encoded strings since JSON has no
/// native binary type. Values of a type that is neither recognized nor
/// readable as text are reported as a decode error.
pub fn to_json(value: SqliteValueRef) -> Result<JsonValue, sqlx::Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let column_type = value.type_info();
   let owned = value.to_owned();

   let result = match column_type.name() {
      "TEXT" | "DATE" | "TIME" => owned
         .try_decode::<String>()
         .map(JsonValue::String)
         .unwrap_or(JsonValue::Null),

      "REAL" => owned
         .try_decode::<f64>()
         .map(JsonValue::from)
         .unwrap_or(JsonValue::Null),

      "INTEGER" | "NUMERIC" => owned
         .try_decode::<i64>()
         .map(JsonValue::from)
         .unwrap_or(JsonValue::Null),

      "BOOLEAN" => owned
         .try_decode::<bool>()
         .map(JsonValue::Bool)
         .unwrap_or(JsonValue::Null),

      "DATETIME" => {
         if let Ok(dt) = owned.try_decode::<PrimitiveDateTime>() {
            JsonValue::String(dt.to_string())
         } else if let Ok(v) = owned.try_decode::<String>() {
            JsonValue::String(v)
         } else {
            JsonValue::Null
         }
      }

      "BLOB" => owned
         .try_decode::<Vec<u8>>()
         .map(|blob| JsonValue::String(base64_encode(&blob)))
         .unwrap_or(JsonValue::Null),

      "NULL" => JsonValue::Null,

      other => match owned.try_decode::<String>() {
         Ok(text) => JsonValue::String(text),
         Err(_) => {
            return Err(sqlx::Error::Decode(
               format!("unsupported datatype: {other}").into(),
            ));
         }
      },
   };

   Ok(result)
}

/// Decode every row into a column-name keyed map, keeping engine order.
pub fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<Row>, sqlx::Error> {
   let mut decoded = Vec::with_capacity(rows.len());
   for row in rows {
      let mut map = Row::default();
      for (i, column) in row.columns().iter().enumerate() {
         let value = to_json(row.try_get_raw(i)?)?;
         map.insert(column.name().to_string(), value);
      }
      decoded.push(map);
   }
   Ok(decoded)
}

fn base64_encode(data: &[u8]) -> String {
   use base64::Engine;
   base64::engine::general_purpose::STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_base64_encode() {
      assert_eq!(base64_encode(b"hello"), "aGVsbG8=");
      assert_eq!(base64_encode(&[0, 0, 0]), "AAAA");
      assert_eq!(base64_encode(&[]), "");
   }

   #[tokio::test]
   async fn test_decode_storage_classes() {
      use sqlx::Connection;

      let mut conn = sqlx::SqliteConnection::connect("sqlite::memory:")
         .await
         .unwrap();

      let rows = sqlx::query("SELECT 42 AS i, 1.5 AS r, 'txt' AS t, x'0102' AS b, NULL AS n")
         .fetch_all(&mut conn)
         .await
         .unwrap();
      let decoded = decode_rows(rows).unwrap();

      assert_eq!(decoded.len(), 1);
      let row = &decoded[0];
      assert_eq!(row["i"], JsonValue::from(42));
      assert_eq!(row["r"], JsonValue::from(1.5));
      assert_eq!(row["t"], JsonValue::from("txt"));
      assert_eq!(row["b"], JsonValue::from("AQI="));
      assert_eq!(row["n"], JsonValue::Null);

      // Column order is preserved from the statement
      let names: Vec<&str> = row.keys().map(String::as_str).collect();
      assert_eq!(names, ["i", "r", "t", "b", "n"]);
   }
}
