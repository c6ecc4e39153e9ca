//! Error types for sqlx-sqlite-location

use thiserror::Error;

/// Errors that may occur while resolving a database location
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when preparing the database directory. Standard library IO errors
   /// are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Neither the environment variable nor the fallback yielded a path
   #[error("Database path cannot be empty (checked ${0} and the fallback path)")]
   EmptyPath(String),
}

impl From<Error> for sqlx::Error {
   fn from(err: Error) -> Self {
      match err {
         Error::Io(e) => sqlx::Error::Io(e),
         Error::EmptyPath(_) => sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            err.to_string(),
         )),
      }
   }
}
