use serde::{Serialize, Serializer};

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response, e.g. for an API boundary.
#[derive(Serialize)]
struct ErrorResponse {
   code: String,
   message: String,
}

/// Errors raised by [`Database`](crate::Database) operations.
///
/// There are exactly three kinds: the database could not be reached, the
/// engine rejected what it was asked to run, or a required argument was
/// missing before any I/O happened.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// The database file could not be opened or reached.
   ///
   /// Always reported to the error sink before being returned.
   #[error("cannot open database {connection_string} to run `{sql}`: {source}")]
   Connection {
      connection_string: String,
      sql: String,
      source: sqlx::Error,
   },

   /// The engine rejected the statement: bad SQL, a missing table or column,
   /// a constraint violation, or a value that could not be decoded.
   #[error("database rejected `{sql}`: {source}")]
   Content { sql: String, source: sqlx::Error },

   /// A required argument was missing or empty.
   #[error("invalid argument: {0} is required")]
   InvalidArgument(&'static str),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// Content errors carry the SQLite result code when the engine supplied one.
   pub fn error_code(&self) -> String {
      match self {
         Error::Connection { .. } => "CONNECTION_ERROR".to_string(),
         Error::Content { source, .. } => {
            if let Some(code) = source.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "CONTENT_ERROR".to_string()
         }
         Error::InvalidArgument(_) => "INVALID_ARGUMENT".to_string(),
      }
   }

   /// The statement that triggered the error, if one was attempted.
   pub fn sql(&self) -> Option<&str> {
      match self {
         Error::Connection { sql, .. } | Error::Content { sql, .. } => Some(sql),
         Error::InvalidArgument(_) => None,
      }
   }

   pub fn is_connection(&self) -> bool {
      matches!(self, Error::Connection { .. })
   }

   pub fn is_content(&self) -> bool {
      matches!(self, Error::Content { .. })
   }

   pub fn is_invalid_argument(&self) -> bool {
      matches!(self, Error::InvalidArgument(_))
   }
}

impl Serialize for Error {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      let response = ErrorResponse {
         code: self.error_code(),
         message: self.to_string(),
      };
      response.serialize(serializer)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_connection() {
      let err = Error::Connection {
         connection_string: "sqlite:///missing/app.db?mode=rwc".into(),
         sql: "SELECT 1".into(),
         source: sqlx::Error::PoolTimedOut,
      };
      assert_eq!(err.error_code(), "CONNECTION_ERROR");
      assert!(err.is_connection());
      assert!(err.to_string().contains("sqlite:///missing/app.db"));
      assert!(err.to_string().contains("SELECT 1"));
   }

   #[test]
   fn test_error_code_content_without_database_code() {
      let err = Error::Content {
         sql: "SELECT x".into(),
         source: sqlx::Error::RowNotFound,
      };
      assert_eq!(err.error_code(), "CONTENT_ERROR");
      assert_eq!(err.sql(), Some("SELECT x"));
      assert!(err.is_content());
   }

   #[test]
   fn test_error_code_invalid_argument() {
      let err = Error::InvalidArgument("table");
      assert_eq!(err.error_code(), "INVALID_ARGUMENT");
      assert_eq!(err.to_string(), "invalid argument: table is required");
      assert!(err.is_invalid_argument());
      assert_eq!(err.sql(), None);
   }

   #[test]
   fn test_serialize_as_code_and_message() {
      let err = Error::InvalidArgument("column");
      let json = serde_json::to_value(&err).unwrap();
      assert_eq!(json["code"], "INVALID_ARGUMENT");
      assert_eq!(json["message"], "invalid argument: column is required");
   }

   #[test]
   fn test_source_is_exposed() {
      use std::error::Error as _;

      let err = Error::Content {
         sql: "SELECT x".into(),
         source: sqlx::Error::RowNotFound,
      };
      assert!(err.source().is_some());
   }
}
