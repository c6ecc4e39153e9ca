//! Named statement parameters and their binding
//!
//! SQLx binds SQLite arguments by position only, so named placeholders
//! (`:name`, `@name`, `$name`) are rewritten to numbered `?N` placeholders
//! before the statement is prepared. Text inside string literals, quoted
//! identifiers and comments is copied through untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A named statement parameter.
///
/// The name may be written with or without its placeholder sigil, so
/// `Parameter::new(":id", 1)` and `Parameter::new("id", 1)` both bind `:id`,
/// `@id` and `$id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
   pub name: String,
   pub value: JsonValue,
}

impl Parameter {
   pub fn new(name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      Self {
         name: name.into(),
         value: value.into(),
      }
   }

   /// Name without a leading `:`, `@` or `$`
   pub fn bare_name(&self) -> &str {
      self.name.trim_start_matches([':', '@', '$'])
   }
}

/// Statement text with named placeholders replaced, plus values in bind order.
#[derive(Debug)]
pub(crate) struct ExpandedStatement {
   pub sql: String,
   pub values: Vec<JsonValue>,
}

impl ExpandedStatement {
   /// Build the SQLx query, binding every value by position.
   pub fn to_query(&self) -> SqliteQuery<'_> {
      let mut query = sqlx::query(&self.sql);
      for value in &self.values {
         query = bind_value(query, value.clone());
      }
      query
   }
}

/// Rewrite named placeholders into `?N`, where `N` is the 1-based position of
/// the parameter carrying that name.
///
/// Placeholders that name no supplied parameter are left as written; SQLx then
/// refuses the statement when it is run. Positional `?` and `?N` placeholders
/// are never touched, so statements written positionally bind the parameters
/// in the order given.
pub(crate) fn expand_named(sql: &str, params: Vec<Parameter>) -> ExpandedStatement {
   let mut positions: HashMap<&str, usize> = HashMap::with_capacity(params.len());
   for (i, param) in params.iter().enumerate() {
      positions.entry(param.bare_name()).or_insert(i + 1);
   }

   let bytes = sql.as_bytes();
   let mut out = String::with_capacity(sql.len());
   let mut copied = 0;
   let mut i = 0;

   while i < bytes.len() {
      match bytes[i] {
         quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i + 1, quote),
         b'[' => i = skip_past(bytes, i + 1, b"]"),
         b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
         b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_past(bytes, i + 2, b"*/"),
         b':' | b'@' | b'$' => {
            let start = i + 1;
            let end = start
               + bytes[start..]
                  .iter()
                  .take_while(|&&b| is_name_byte(b))
                  .count();

            if end > start
               && let Some(position) = positions.get(&sql[start..end])
            {
               out.push_str(&sql[copied..i]);
               out.push('?');
               out.push_str(&position.to_string());
               copied = end;
            }
            i = end;
         }
         _ => i += 1,
      }
   }
   out.push_str(&sql[copied..]);

   ExpandedStatement {
      sql: out,
      values: params.into_iter().map(|param| param.value).collect(),
   }
}

/// Bytes allowed in a placeholder name. Non-ASCII bytes are accepted so
/// multi-byte characters are never split.
fn is_name_byte(b: u8) -> bool {
   b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Index just past the closing quote, honouring doubled quotes as escapes.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
   while i < bytes.len() {
      if bytes[i] == quote {
         if bytes.get(i + 1) == Some(&quote) {
            i += 2;
            continue;
         }
         return i + 1;
      }
      i += 1;
   }
   bytes.len()
}

/// Index just past the next occurrence of `terminator`, or the end of input.
fn skip_past(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
   bytes[from.min(bytes.len())..]
      .windows(terminator.len())
      .position(|window| window == terminator)
      .map_or(bytes.len(), |offset| from + offset + terminator.len())
}

/// Bind a JSON value to a SQLx query
///
/// Integers keep their precision as `i64`; `u64` values beyond `i64::MAX`
/// fall back to `f64`. Arrays and objects are stored as JSON text.
pub(crate) fn bind_value<'q>(query: SqliteQuery<'q>, value: JsonValue) -> SqliteQuery<'q> {
   match value {
      JsonValue::Null => query.bind(None::<String>),
      JsonValue::Bool(b) => query.bind(b),
      JsonValue::String(s) => query.bind(s),
      JsonValue::Number(number) => {
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Value too large for i64, use f64 (will lose precision)
            query.bind(uint_val as f64)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}
