//! Compiler families and strictly parsed compiler versions.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// Compiler families the recipe knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Compiler {
  #[serde(rename = "gcc")]
  Gcc,
  #[serde(rename = "clang")]
  Clang,
  #[serde(rename = "apple-clang")]
  AppleClang,
  #[serde(rename = "Visual Studio")]
  VisualStudio,
}

impl Compiler {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gcc => "gcc",
      Self::Clang => "clang",
      Self::AppleClang => "apple-clang",
      Self::VisualStudio => "Visual Studio",
    }
  }

  /// Major versions this tool has microarchitecture data for.
  pub fn known_majors(&self) -> RangeInclusive<u32> {
    match self {
      Self::Gcc => 4..=14,
      Self::Clang => 3..=19,
      Self::AppleClang => 7..=16,
      Self::VisualStudio => 12..=17,
    }
  }

  /// Whether the compiler accepts GCC-style `-march=` flags.
  pub fn is_gnu_like(&self) -> bool {
    !matches!(self, Self::VisualStudio)
  }

  /// Parse `version` and reject values outside [`Compiler::known_majors`].
  pub fn parse_version(&self, version: &str) -> Result<CompilerVersion, SettingsError> {
    let parsed: CompilerVersion = version.parse()?;
    self.check_version(&parsed)?;
    Ok(parsed)
  }

  pub fn check_version(&self, version: &CompilerVersion) -> Result<(), SettingsError> {
    if self.known_majors().contains(&version.major) {
      Ok(())
    } else {
      Err(SettingsError::UnknownCompilerVersion {
        compiler: *self,
        version: version.to_string(),
      })
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Compiler {
  type Err = SettingsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "gcc" => Ok(Self::Gcc),
      "clang" => Ok(Self::Clang),
      "apple-clang" => Ok(Self::AppleClang),
      "visual studio" | "msvc" => Ok(Self::VisualStudio),
      _ => Err(SettingsError::UnknownCompiler(s.to_string())),
    }
  }
}

/// A `major[.minor]` compiler version, e.g. `"9"` or `"4.9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompilerVersion {
  pub major: u32,
  pub minor: Option<u32>,
}

impl CompilerVersion {
  pub fn new(major: u32, minor: Option<u32>) -> Self {
    Self { major, minor }
  }

  /// True when this version is `major.minor` or newer. A missing minor counts as zero.
  pub fn at_least(&self, major: u32, minor: u32) -> bool {
    (self.major, self.minor.unwrap_or(0)) >= (major, minor)
  }
}

impl fmt::Display for CompilerVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.minor {
      Some(minor) => write!(f, "{}.{}", self.major, minor),
      None => write!(f, "{}", self.major),
    }
  }
}

impl FromStr for CompilerVersion {
  type Err = SettingsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || SettingsError::MalformedCompilerVersion(s.to_string());
    let component = |part: &str| -> Result<u32, SettingsError> {
      if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
      }
      part.parse().map_err(|_| malformed())
    };

    let mut parts = s.trim().split('.');
    let major = component(parts.next().ok_or_else(malformed)?)?;
    let minor = parts.next().map(component).transpose()?;
    if parts.next().is_some() {
      return Err(malformed());
    }

    Ok(Self { major, minor })
  }
}

impl TryFrom<String> for CompilerVersion {
  type Error = SettingsError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<CompilerVersion> for String {
  fn from(value: CompilerVersion) -> Self {
    value.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod version_parsing {
    use super::*;

    #[test]
    fn major_only() {
      assert_eq!("9".parse::<CompilerVersion>().unwrap(), CompilerVersion::new(9, None));
    }

    #[test]
    fn major_and_minor() {
      assert_eq!("4.9".parse::<CompilerVersion>().unwrap(), CompilerVersion::new(4, Some(9)));
    }

    #[test]
    fn malformed_values_are_rejected() {
      for bad in ["", "abc", "7.", ".7", "1.2.3", "v9", "-1", "9 .1"] {
        assert!(
          matches!(bad.parse::<CompilerVersion>(), Err(SettingsError::MalformedCompilerVersion(_))),
          "expected {:?} to be rejected",
          bad
        );
      }
    }

    #[test]
    fn display_round_trips_text() {
      assert_eq!(CompilerVersion::new(4, Some(9)).to_string(), "4.9");
      assert_eq!(CompilerVersion::new(11, None).to_string(), "11");
    }

    #[test]
    fn at_least_treats_missing_minor_as_zero() {
      let v = CompilerVersion::new(5, None);
      assert!(v.at_least(5, 0));
      assert!(v.at_least(4, 9));
      assert!(!v.at_least(5, 1));
    }
  }

  mod known_versions {
    use super::*;

    #[test]
    fn gcc_version_out_of_range_is_unknown() {
      let err = Compiler::Gcc.parse_version("99").unwrap_err();
      assert!(matches!(err, SettingsError::UnknownCompilerVersion { .. }));
    }

    #[test]
    fn visual_studio_uses_ide_versions() {
      assert!(Compiler::VisualStudio.parse_version("15").is_ok());
      assert!(Compiler::VisualStudio.parse_version("9").is_err());
    }

    #[test]
    fn compiler_names_parse() {
      assert_eq!("Visual Studio".parse::<Compiler>().unwrap(), Compiler::VisualStudio);
      assert_eq!("apple-clang".parse::<Compiler>().unwrap(), Compiler::AppleClang);
      assert!("icc".parse::<Compiler>().is_err());
    }
  }
}
