//! Package recipe for the network library.
//!
//! This module describes how the library is packaged:
//! - [`Recipe`]: package metadata, requirements and option schema
//! - [`OptionSchema`]: declared options, their domains and defaults
//! - [`cmake_definitions`]: the `-D` definitions for one build job
//! - [`PackageLayout`]: where built artifacts land inside the package
//! - [`PackageInfo`]: what consumers link against

mod cmake;
mod layout;
mod schema;

use serde::Serialize;
use thiserror::Error;

use crate::consts::PACKAGE_NAME;
use crate::settings::SettingsError;

pub use cmake::{cmake_definitions, on_off};
pub use layout::{CopyRule, PackageLayout};
pub use schema::{OptionDecl, OptionDomain, OptionSchema};

#[derive(Debug, Error)]
pub enum RecipeError {
  #[error("unknown option: {0}")]
  UnknownOption(String),

  #[error("invalid value {value:?} for option {name}, expected {expected}")]
  InvalidOptionValue {
    name: String,
    value: String,
    expected: String,
  },

  #[error("unknown microarchitecture: {0}")]
  UnknownMicroarchitecture(String),

  #[error(transparent)]
  Settings(#[from] SettingsError),

  #[error("invalid copy pattern: {0}")]
  Pattern(#[from] glob::PatternError),
}

/// Consumer-facing package description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
  pub include_dirs: Vec<String>,
  pub libs: Vec<String>,
}

/// Package metadata plus everything needed to build it.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
  pub name: &'static str,
  pub version: &'static str,
  pub license: &'static str,
  pub url: &'static str,
  pub description: &'static str,
  pub settings: &'static [&'static str],
  pub requires: &'static [&'static str],
  pub exports_sources: &'static [&'static str],
  pub build_policy: &'static str,
  #[serde(skip)]
  pub schema: OptionSchema,
}

impl Recipe {
  pub fn network() -> Self {
    Self {
      name: PACKAGE_NAME,
      version: "0.1",
      license: "http://www.boost.org/users/license.html",
      url: "https://github.com/k-nuth/network",
      description: "Bitcoin P2P Network Library",
      settings: &["os", "compiler", "build_type", "arch"],
      requires: &["boost/1.64.0@kth/stable", "domain/0.1@kth/stable"],
      exports_sources: &[
        "src/*",
        "CMakeLists.txt",
        "cmake/*",
        "networkConfig.cmake.in",
        "include/*",
        "test/*",
      ],
      build_policy: "missing",
      schema: OptionSchema::network(),
    }
  }

  /// Reference string `name/version@user/channel`.
  pub fn reference(&self, user: &str, channel: &str) -> String {
    format!("{}/{}@{}/{}", self.name, self.version, user, channel)
  }

  pub fn package_info(&self) -> PackageInfo {
    PackageInfo {
      include_dirs: vec!["include".to_string()],
      libs: vec![self.name.to_string()],
    }
  }
}
