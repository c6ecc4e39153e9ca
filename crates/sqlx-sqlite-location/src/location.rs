//! Resolution of a database file location from the environment

use std::ffi::OsString;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::config::ResolvePolicy;
use crate::error::Error;

/// Where a database lives: an environment variable that may override a
/// hardcoded fallback path.
///
/// # Example
///
/// ```no_run
/// use sqlx_sqlite_location::DatabaseLocation;
///
/// let location = DatabaseLocation::new("APP_DB_PATH", "data/app.db");
/// let resolved = location.resolve()?;
/// println!("{}", resolved.connection_string());
/// # Ok::<(), sqlx_sqlite_location::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseLocation {
   env_var: String,
   fallback_path: PathBuf,
}

impl DatabaseLocation {
   pub fn new(env_var: impl Into<String>, fallback_path: impl Into<PathBuf>) -> Self {
      Self {
         env_var: env_var.into(),
         fallback_path: fallback_path.into(),
      }
   }

   pub fn env_var(&self) -> &str {
      &self.env_var
   }

   pub fn fallback_path(&self) -> &Path {
      &self.fallback_path
   }

   /// The database file path this location currently points at.
   ///
   /// The environment variable wins when it is set and non-empty; its value is
   /// used verbatim. Otherwise the fallback path is returned.
   pub fn database_path(&self) -> PathBuf {
      match non_empty_env(&self.env_var) {
         Some(value) => PathBuf::from(value),
         None => self.fallback_path.clone(),
      }
   }

   /// Resolve the location, creating the parent directory when it is missing.
   ///
   /// The database file itself is left for SQLite to create on first connect.
   pub fn resolve(&self) -> Result<ResolvedLocation> {
      let path = self.database_path();

      if path.as_os_str().is_empty() {
         return Err(Error::EmptyPath(self.env_var.clone()));
      }

      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         create_dir_all(parent)?;
      }

      debug!(env_var = %self.env_var, path = %path.display(), "resolved database location");

      Ok(ResolvedLocation::new(path))
   }
}

/// A resolved database path together with its connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
   path: PathBuf,
   connection_string: String,
}

impl ResolvedLocation {
   pub fn new(path: impl Into<PathBuf>) -> Self {
      let path = path.into();
      let connection_string = connection_string(&path);
      Self {
         path,
         connection_string,
      }
   }

   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Connection string in the `sqlite://` form understood by SQLx
   pub fn connection_string(&self) -> &str {
      &self.connection_string
   }
}

/// Build the SQLx connection string for a database file.
///
/// `mode=rwc` opens the file read-write and creates it when missing.
pub fn connection_string(path: &Path) -> String {
   format!("sqlite://{}?mode=rwc", path.display())
}

/// Resolves a [`DatabaseLocation`] according to a [`ResolvePolicy`]
///
/// With `CacheForProcess` the first successful resolution is kept for the
/// lifetime of the locator. Concurrent first calls may both resolve; they
/// compute the same value and only one is stored.
#[derive(Debug)]
pub struct Locator {
   location: DatabaseLocation,
   policy: ResolvePolicy,
   cached: OnceLock<ResolvedLocation>,
}

impl Locator {
   pub fn new(location: DatabaseLocation, policy: ResolvePolicy) -> Self {
      Self {
         location,
         policy,
         cached: OnceLock::new(),
      }
   }

   pub fn location(&self) -> &DatabaseLocation {
      &self.location
   }

   pub fn policy(&self) -> ResolvePolicy {
      self.policy
   }

   pub fn resolve(&self) -> Result<ResolvedLocation> {
      match self.policy {
         ResolvePolicy::ResolveEveryCall => self.location.resolve(),
         ResolvePolicy::CacheForProcess => {
            if let Some(resolved) = self.cached.get() {
               return Ok(resolved.clone());
            }
            let resolved = self.location.resolve()?;
            Ok(self.cached.get_or_init(|| resolved).clone())
         }
      }
   }

   /// Path of the location as it would resolve right now, without touching
   /// the filesystem.
   pub fn attempted_path(&self) -> PathBuf {
      match self.cached.get() {
         Some(resolved) => resolved.path().to_path_buf(),
         None => self.location.database_path(),
      }
   }

   /// Connection string for [`attempted_path`](Self::attempted_path). Used for
   /// diagnostics when resolving fails.
   pub fn attempted_connection_string(&self) -> String {
      connection_string(&self.attempted_path())
   }
}

/// Read an environment variable, treating empty values as unset
fn non_empty_env(name: &str) -> Option<OsString> {
   std::env::var_os(name).filter(|value| !value.is_empty())
}
