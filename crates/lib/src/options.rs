//! Package option values and option sets.
//!
//! Option names are scoped to their package (`network:shared`), the same way
//! the external build tool addresses them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of a single package option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Str(String),
}

impl OptionValue {
  /// Boolean view of the value. Accepts `"True"`/`"False"` spelled as strings,
  /// since that is how option values round-trip through Python-based tooling.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      OptionValue::Bool(b) => Some(*b),
      OptionValue::Str(s) if s.eq_ignore_ascii_case("true") => Some(true),
      OptionValue::Str(s) if s.eq_ignore_ascii_case("false") => Some(false),
      OptionValue::Str(_) => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      OptionValue::Str(s) => Some(s),
      OptionValue::Bool(_) => None,
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(true) => write!(f, "True"),
      OptionValue::Bool(false) => write!(f, "False"),
      OptionValue::Str(s) => write!(f, "{}", s),
    }
  }
}

impl From<bool> for OptionValue {
  fn from(value: bool) -> Self {
    OptionValue::Bool(value)
  }
}

impl From<&str> for OptionValue {
  fn from(value: &str) -> Self {
    OptionValue::Str(value.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(value: String) -> Self {
    OptionValue::Str(value)
  }
}

/// Returns the package-scoped name of an option, e.g. `network:shared`.
pub fn scoped(package: &str, option: &str) -> String {
  format!("{}:{}", package, option)
}

/// Mapping from option name to its selected value.
///
/// Sets are values: [`OptionSet::with`] builds a new set instead of mutating
/// the receiver, so variants produced from one base never alias each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(BTreeMap<String, OptionValue>);

impl OptionSet {
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  pub fn get(&self, name: &str) -> Option<&OptionValue> {
    self.0.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains_key(name)
  }

  /// A new set equal to this one with `name` set to `value`.
  pub fn with(&self, name: &str, value: impl Into<OptionValue>) -> Self {
    let value = value.into();
    let mut entries: BTreeMap<String, OptionValue> = self
      .0
      .iter()
      .filter(|(key, _)| key.as_str() != name)
      .map(|(key, v)| (key.clone(), v.clone()))
      .collect();
    entries.insert(name.to_string(), value);
    Self(entries)
  }

  /// A new set without `name`.
  pub fn without(&self, name: &str) -> Self {
    Self(
      self
        .0
        .iter()
        .filter(|(key, _)| key.as_str() != name)
        .map(|(key, v)| (key.clone(), v.clone()))
        .collect(),
    )
  }

  /// True only when the option exists and is boolean-true.
  pub fn is_enabled(&self, name: &str) -> bool {
    self.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionSet {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}
