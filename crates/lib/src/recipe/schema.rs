//! Option schema: declared package options, their domains and defaults.

use crate::consts::BASELINE_MARCH;
use crate::options::{OptionSet, OptionValue, scoped};
use crate::settings::Os;

use super::RecipeError;

/// Values an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDomain {
  Bool,
  Choice(&'static [&'static str]),
  /// Any string.
  Text,
}

impl OptionDomain {
  fn accepts(&self, value: &OptionValue) -> bool {
    match self {
      OptionDomain::Bool => value.as_bool().is_some(),
      OptionDomain::Choice(choices) => value.as_str().is_some_and(|v| choices.contains(&v)),
      OptionDomain::Text => value.as_str().is_some(),
    }
  }

  fn describe(&self) -> String {
    match self {
      OptionDomain::Bool => "a boolean".to_string(),
      OptionDomain::Choice(choices) => format!("one of {}", choices.join(", ")),
      OptionDomain::Text => "a string".to_string(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
  pub name: &'static str,
  pub domain: OptionDomain,
  default: DefaultValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultValue {
  Bool(bool),
  Str(&'static str),
}

impl OptionDecl {
  pub fn default_value(&self) -> OptionValue {
    match self.default {
      DefaultValue::Bool(b) => OptionValue::Bool(b),
      DefaultValue::Str(s) => OptionValue::from(s),
    }
  }
}

const CURRENCIES: &[&str] = &["BCH", "BTC", "LTC"];

/// The options a package declares.
#[derive(Debug, Clone)]
pub struct OptionSchema {
  decls: Vec<OptionDecl>,
}

impl OptionSchema {
  pub fn network() -> Self {
    Self {
      decls: vec![
        OptionDecl {
          name: "shared",
          domain: OptionDomain::Bool,
          default: DefaultValue::Bool(false),
        },
        OptionDecl {
          name: "fPIC",
          domain: OptionDomain::Bool,
          default: DefaultValue::Bool(true),
        },
        OptionDecl {
          name: "with_tests",
          domain: OptionDomain::Bool,
          default: DefaultValue::Bool(false),
        },
        OptionDecl {
          name: "currency",
          domain: OptionDomain::Choice(CURRENCIES),
          default: DefaultValue::Str("BCH"),
        },
        OptionDecl {
          name: "microarchitecture",
          domain: OptionDomain::Text,
          default: DefaultValue::Str(BASELINE_MARCH),
        },
        OptionDecl {
          name: "verbose",
          domain: OptionDomain::Bool,
          default: DefaultValue::Bool(false),
        },
      ],
    }
  }

  pub fn decls(&self) -> &[OptionDecl] {
    &self.decls
  }

  pub fn get(&self, name: &str) -> Option<&OptionDecl> {
    self.decls.iter().find(|d| d.name == name)
  }

  /// Whether `name` applies on `os`. Position-independent code is meaningless on Windows.
  pub fn applies_to(&self, name: &str, os: Os) -> bool {
    !(name == "fPIC" && os == Os::Windows)
  }

  /// Scoped default options for `package` on `os`.
  pub fn default_options(&self, package: &str, os: Os) -> OptionSet {
    self
      .decls
      .iter()
      .filter(|d| self.applies_to(d.name, os))
      .map(|d| (scoped(package, d.name), d.default_value()))
      .collect()
  }

  /// `options` overlaid on the defaults, so every declared option is present.
  /// Options that do not apply on `os` are dropped even when the job sets them.
  pub fn effective(&self, package: &str, os: Os, options: &OptionSet) -> OptionSet {
    let defaults = self.default_options(package, os);
    let merged = options
      .iter()
      .fold(defaults, |acc, (name, value)| acc.with(name, value.clone()));
    self
      .decls
      .iter()
      .filter(|d| !self.applies_to(d.name, os))
      .fold(merged, |acc, d| acc.without(&scoped(package, d.name)))
  }

  /// Check every option scoped to `package` is declared and within its domain.
  ///
  /// Options scoped to other packages are left to their own recipes.
  pub fn validate(&self, package: &str, options: &OptionSet) -> Result<(), RecipeError> {
    let prefix = format!("{}:", package);
    for (name, value) in options.iter() {
      let Some(local) = name.strip_prefix(&prefix) else {
        if name.contains(':') {
          continue;
        }
        return Err(RecipeError::UnknownOption(name.clone()));
      };
      let decl = self
        .get(local)
        .ok_or_else(|| RecipeError::UnknownOption(name.clone()))?;
      if !decl.domain.accepts(value) {
        return Err(RecipeError::InvalidOptionValue {
          name: name.clone(),
          value: value.to_string(),
          expected: decl.domain.describe(),
        });
      }
    }
    Ok(())
  }
}
