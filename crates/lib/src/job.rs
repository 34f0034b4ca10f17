//! Build jobs handed to the external build-orchestration driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::OptionSet;
use crate::settings::BuildSetting;
use crate::util::hash::Hashable;

/// One concrete invocation of the external build tool.
///
/// Mirrors the (settings, options, env_vars, build_requires, reference)
/// tuples the driver enumerates, so lists can go out and come back unchanged
/// in shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildJob {
  pub settings: BuildSetting,
  pub options: OptionSet,
  #[serde(default)]
  pub env_vars: BTreeMap<String, String>,
  #[serde(default)]
  pub build_requires: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reference: Option<String>,
}

impl Hashable for BuildJob {}

impl BuildJob {
  pub fn new(settings: BuildSetting, options: OptionSet) -> Self {
    Self {
      settings,
      options,
      env_vars: BTreeMap::new(),
      build_requires: Vec::new(),
      reference: None,
    }
  }

  pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
    self.reference = Some(reference.into());
    self
  }

  /// A job identical to this one except for its option set.
  pub fn with_options(&self, options: OptionSet) -> Self {
    Self {
      settings: self.settings,
      options,
      env_vars: self.env_vars.clone(),
      build_requires: self.build_requires.clone(),
      reference: self.reference.clone(),
    }
  }

  /// String value of `name`, if the option is present and textual.
  pub fn option_str(&self, name: &str) -> Option<&str> {
    self.options.get(name).and_then(|v| v.as_str())
  }
}
