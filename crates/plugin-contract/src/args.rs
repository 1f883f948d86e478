//! The dynamic argument container carried across the plugin boundary.
//!
//! [`Args`] is a string-keyed map of untyped JSON values. Method arguments,
//! method results, error bodies, and event data all travel as `Args`.
//!
//! Every accessor is total: it never panics and never returns an error.
//! A missing key, a value of the wrong type, and an empty container all read
//! as `None` (or as the caller's default for the `_or` forms). Absent and
//! empty are indistinguishable: a JSON `null` in place of the whole object
//! deserialises to an empty `Args`.
//!
//! # Numeric coercion
//!
//! Peers disagree on how numbers are encoded (`42`, `42.0`, `4.2e1`), so the
//! numeric accessors accept any JSON number:
//!
//! - [`Args::int`] truncates floats toward zero (`3.9` → `3`, `-3.9` → `-3`)
//!   and saturates values outside the `i64` range.
//! - [`Args::float`] widens integers to `f64`.
//!
//! No other coercion is performed: `"42"` is not an integer and `"true"` is
//! not a boolean.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors converting a JSON value into [`Args`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// The value was neither an object nor `null`.
    #[error("expected a JSON object or null, found {found}")]
    NotAnObject {
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

/// String-keyed map of untyped JSON values with strict, panic-free accessors.
///
/// # Example
///
/// ```
/// use plugin_contract::Args;
/// use serde_json::json;
///
/// let args = Args::try_from(json!({
///     "accountId": "u1",
///     "ids": ["e1", "e2"],
///     "limit": 25.0,
/// }))
/// .unwrap();
///
/// assert_eq!(args.string("accountId"), Some("u1"));
/// assert_eq!(args.string_slice("ids"), Some(vec!["e1".to_owned(), "e2".to_owned()]));
/// assert_eq!(args.int_or("limit", 100), 25);
/// assert_eq!(args.int_or("position", 0), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Args(Map<String, Value>);

impl Args {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`Args::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present, even when its value is `null`.
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the container holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the container, returning the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    /// Returns the value for `key` if it is a JSON string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Like [`Args::string`], falling back to `default`.
    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.string(key).unwrap_or(default)
    }

    /// Returns the value for `key` as an `i64` if it is any JSON number.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.number(key).map(coerce_i64)
    }

    /// Like [`Args::int`], falling back to `default`.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.int(key).unwrap_or(default)
    }

    /// Returns the value for `key` as an `f64` if it is any JSON number.
    pub fn float(&self, key: &str) -> Option<f64> {
        self.number(key).map(coerce_f64)
    }

    /// Like [`Args::float`], falling back to `default`.
    pub fn float_or(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    /// Returns the value for `key` if it is a JSON boolean.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Like [`Args::bool`], falling back to `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    /// Returns the value for `key` if it is an array whose elements are all
    /// strings.
    ///
    /// One non-string element rejects the whole array. An empty array yields
    /// an empty vector.
    pub fn string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)?
            .as_array()?
            .iter()
            .map(|element| element.as_str().map(str::to_owned))
            .collect()
    }

    /// Like [`Args::string_slice`], falling back to `default`.
    pub fn string_slice_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.string_slice(key).unwrap_or(default)
    }

    /// Returns a copy of the nested object for `key`, wrapped as `Args`.
    pub fn object(&self, key: &str) -> Option<Self> {
        self.get(key)?.as_object().cloned().map(Self)
    }

    /// Like [`Args::object`], falling back to `default`.
    pub fn object_or(&self, key: &str, default: Self) -> Self {
        self.object(key).unwrap_or(default)
    }

    fn number(&self, key: &str) -> Option<&Number> {
        match self.get(key)? {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Converts any JSON number to `i64`.
///
/// Integers in range are exact. Everything else goes through `f64` and is
/// truncated toward zero; `as` saturates at the `i64` bounds.
#[allow(clippy::cast_possible_truncation)]
fn coerce_i64(n: &Number) -> i64 {
    match n.as_i64() {
        Some(i) => i,
        None => coerce_f64(n) as i64,
    }
}

/// Converts any JSON number to `f64` by native widening.
#[allow(clippy::cast_precision_loss)]
fn coerce_f64(n: &Number) -> f64 {
    if let Some(f) = n.as_f64() {
        return f;
    }
    // Only reachable with arbitrary-precision numbers, which this crate does
    // not enable; keep the branch total anyway.
    n.as_i64()
        .map(|i| i as f64)
        .or_else(|| n.as_u64().map(|u| u as f64))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Args {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Map<String, Value>>::deserialize(deserializer).map(|m| Self(m.unwrap_or_default()))
    }
}

impl From<Map<String, Value>> for Args {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Args> for Value {
    fn from(args: Args) -> Self {
        Value::Object(args.0)
    }
}

impl TryFrom<Value> for Args {
    type Error = ArgsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            Value::Bool(_) => Err(ArgsError::NotAnObject { found: "boolean" }),
            Value::Number(_) => Err(ArgsError::NotAnObject { found: "number" }),
            Value::String(_) => Err(ArgsError::NotAnObject { found: "string" }),
            Value::Array(_) => Err(ArgsError::NotAnObject { found: "array" }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
