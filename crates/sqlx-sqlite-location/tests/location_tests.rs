use std::path::PathBuf;

use sqlx_sqlite_location::{
   DatabaseLocation, Error, Locator, PoolConfig, ResolvePolicy, close_pool, pool_for,
};
use tempfile::TempDir;

// Each test uses its own variable name so parallel tests never observe each
// other's environment changes.
fn set_env(name: &str, value: impl AsRef<std::ffi::OsStr>) {
   // SAFETY: variable names are unique per test and not read by other threads
   unsafe { std::env::set_var(name, value) };
}

fn remove_env(name: &str) {
   // SAFETY: see set_env
   unsafe { std::env::remove_var(name) };
}

#[test]
fn test_env_var_wins_when_set() {
   let temp_dir = TempDir::new().unwrap();
   let env_path = temp_dir.path().join("from_env.db");
   let fallback = temp_dir.path().join("fallback.db");

   set_env("SQLX_SQLITE_LOCATION_TEST_WINS", &env_path);
   let location = DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_WINS", &fallback);
   let resolved = location.resolve().unwrap();
   remove_env("SQLX_SQLITE_LOCATION_TEST_WINS");

   assert_eq!(resolved.path(), env_path.as_path());
   assert!(
      resolved
         .connection_string()
         .contains(&*env_path.to_string_lossy())
   );
}

#[test]
fn test_unset_or_empty_env_var_uses_fallback() {
   let temp_dir = TempDir::new().unwrap();
   let fallback = temp_dir.path().join("fallback.db");
   let location = DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_EMPTY", &fallback);

   remove_env("SQLX_SQLITE_LOCATION_TEST_EMPTY");
   assert_eq!(location.resolve().unwrap().path(), fallback.as_path());

   set_env("SQLX_SQLITE_LOCATION_TEST_EMPTY", "");
   assert_eq!(location.resolve().unwrap().path(), fallback.as_path());
   remove_env("SQLX_SQLITE_LOCATION_TEST_EMPTY");
}

#[test]
fn test_parent_directory_is_created() {
   let temp_dir = TempDir::new().unwrap();
   let nested = temp_dir.path().join("a").join("b").join("app.db");
   let location = DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_NESTED", &nested);

   location.resolve().unwrap();

   assert!(nested.parent().unwrap().is_dir());
   // SQLite creates the file itself on first connect
   assert!(!nested.exists());
}

#[test]
fn test_uncreatable_parent_directory_is_io_error() {
   let temp_dir = TempDir::new().unwrap();
   let blocker = temp_dir.path().join("blocker");
   std::fs::write(&blocker, b"not a directory").unwrap();

   let location = DatabaseLocation::new(
      "SQLX_SQLITE_LOCATION_TEST_BLOCKED",
      blocker.join("sub").join("app.db"),
   );

   assert!(matches!(location.resolve(), Err(Error::Io(_))));
}

#[test]
fn test_cache_for_process_ignores_later_env_changes() {
   let temp_dir = TempDir::new().unwrap();
   let first = temp_dir.path().join("first.db");
   let second = temp_dir.path().join("second.db");

   set_env("SQLX_SQLITE_LOCATION_TEST_CACHED", &first);
   let locator = Locator::new(
      DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_CACHED", "unused.db"),
      ResolvePolicy::CacheForProcess,
   );
   assert_eq!(locator.resolve().unwrap().path(), first.as_path());

   set_env("SQLX_SQLITE_LOCATION_TEST_CACHED", &second);
   assert_eq!(locator.resolve().unwrap().path(), first.as_path());
   assert!(locator.attempted_connection_string().contains("first.db"));
   remove_env("SQLX_SQLITE_LOCATION_TEST_CACHED");
}

#[test]
fn test_resolve_every_call_follows_env_changes() {
   let temp_dir = TempDir::new().unwrap();
   let first = temp_dir.path().join("first.db");
   let second = temp_dir.path().join("second.db");

   set_env("SQLX_SQLITE_LOCATION_TEST_EVERY", &first);
   let locator = Locator::new(
      DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_EVERY", "unused.db"),
      ResolvePolicy::ResolveEveryCall,
   );
   assert_eq!(locator.resolve().unwrap().path(), first.as_path());

   set_env("SQLX_SQLITE_LOCATION_TEST_EVERY", &second);
   assert_eq!(locator.resolve().unwrap().path(), second.as_path());

   remove_env("SQLX_SQLITE_LOCATION_TEST_EVERY");
   assert_eq!(
      locator.resolve().unwrap().path(),
      PathBuf::from("unused.db").as_path()
   );
}

#[tokio::test]
async fn test_pool_creates_database_file() {
   let temp_dir = TempDir::new().unwrap();
   let db_path = temp_dir.path().join("nested").join("created.db");
   let resolved = DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_POOL", &db_path)
      .resolve()
      .unwrap();

   let pool = pool_for(&resolved, &PoolConfig::default()).await;
   let mut conn = pool.acquire().await.unwrap();
   sqlx::query("CREATE TABLE t (id INTEGER)")
      .execute(&mut *conn)
      .await
      .unwrap();
   drop(conn);

   assert!(db_path.exists(), "SQLite should create the file on connect");

   close_pool(resolved.path()).await;
}

#[tokio::test]
async fn test_pool_for_directory_fails_on_acquire() {
   let temp_dir = TempDir::new().unwrap();
   let resolved = DatabaseLocation::new("SQLX_SQLITE_LOCATION_TEST_DIR", temp_dir.path())
      .resolve()
      .unwrap();

   let pool = pool_for(&resolved, &PoolConfig::default()).await;
   assert!(pool.acquire().await.is_err());

   close_pool(resolved.path()).await;
}
