//! Command parameter sets.
//!
//! Parameters are plain string pairs. Each action looks up the keys it needs
//! through [`Params::required`] and [`Params::optional`], mirroring how the
//! runtime's request elements carry only string attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self { Self(BTreeMap::new()) }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    /// Look up a parameter the action cannot do without.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingParam`] if `key` is absent.
    pub fn required(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingParam(key.to_owned()))
    }

    /// Look up a parameter, falling back to `default` when absent.
    #[must_use]
    pub fn optional<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` when no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterate over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a list of `key=value` arguments.
    ///
    /// # Errors
    /// Returns [`ConfigError::MalformedPair`] for the first argument without
    /// an `=` or with an empty key.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|pair| parse_pair(pair.as_ref()))
            .collect()
    }
}

/// Split a single `key=value` argument. The value may itself contain `=`.
///
/// # Errors
/// Returns [`ConfigError::MalformedPair`] when there is no `=` or the key is
/// empty.
pub fn parse_pair(pair: &str) -> Result<(String, String), ConfigError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(ConfigError::MalformedPair(pair.to_owned())),
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
