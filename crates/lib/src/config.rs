//! Generator configuration.
//!
//! [`MatrixConfig`] carries the two mode flags explicitly; only
//! [`MatrixConfig::from_env`] reads them from the process environment.
//! [`NetpkgConfig`] is the optional `netpkg.toml` describing what to build.

use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILE_NAME, FULL_BUILD_ENV, PACKAGE_NAME, RUN_TESTS_ENV};
use crate::currency::Currency;
use crate::options::scoped;
use crate::settings::{Arch, Toolchain};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid value for {name}: {value:?} (expected true/false, 1/0, yes/no or on/off)")]
  InvalidFlag { name: String, value: String },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },
}

/// Mode flags for one generator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
  /// Fan out over every supported microarchitecture instead of the baseline only.
  pub full_build: bool,
  /// Build with tests enabled; collapses the microarchitecture fan-out.
  pub run_tests: bool,
}

impl MatrixConfig {
  /// Read `NETPKG_FULL_BUILD` and `NETPKG_RUN_TESTS`. Unset means false.
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      full_build: env_flag(FULL_BUILD_ENV)?,
      run_tests: env_flag(RUN_TESTS_ENV)?,
    })
  }
}

fn env_flag(name: &str) -> Result<bool, ConfigError> {
  match std::env::var(name) {
    Ok(value) => parse_flag(name, &value),
    Err(VarError::NotPresent) => Ok(false),
    Err(VarError::NotUnicode(value)) => Err(ConfigError::InvalidFlag {
      name: name.to_string(),
      value: value.to_string_lossy().into_owned(),
    }),
  }
}

/// Parse a boolean flag value. Empty counts as false.
pub fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "" | "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::InvalidFlag {
      name: name.to_string(),
      value: value.to_string(),
    }),
  }
}

/// Contents of `netpkg.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetpkgConfig {
  /// Package whose options are being enumerated.
  pub package: String,
  /// Package reference attached to every enumerated job. `None` uses
  /// `network/<version>@kth/stable`.
  pub reference: Option<String>,
  pub currencies: Vec<Currency>,
  /// Requested microarchitectures. `None` requests the whole catalog.
  pub microarchitectures: Option<Vec<String>>,
  pub archs: Vec<Arch>,
  /// Unscoped names of options that switch tests on.
  pub test_flags: Vec<String>,
  pub toolchains: Vec<Toolchain>,
}

impl Default for NetpkgConfig {
  fn default() -> Self {
    Self {
      package: PACKAGE_NAME.to_string(),
      reference: None,
      currencies: Currency::ALL.to_vec(),
      microarchitectures: None,
      archs: vec![Arch::X86_64],
      test_flags: vec!["with_tests".to_string()],
      toolchains: Vec::new(),
    }
  }
}

impl NetpkgConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), toolchains = config.toolchains.len(), "loaded config");
    Ok(config)
  }

  pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Load `path` if given, else `netpkg.toml` in `dir` if present, else defaults.
  pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
    if let Some(path) = path {
      return Self::load(path);
    }
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
      Self::load(&candidate)
    } else {
      debug!(dir = %dir.display(), "no config file, using defaults");
      Ok(Self::default())
    }
  }

  /// Package-scoped name of `option`.
  pub fn option_name(&self, option: &str) -> String {
    scoped(&self.package, option)
  }

  /// Package-scoped names of the test flag options.
  pub fn scoped_test_flags(&self) -> Vec<String> {
    self.test_flags.iter().map(|f| self.option_name(f)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::settings::{Compiler, CompilerVersion, Os};
  use serial_test::serial;
  use tempfile::TempDir;

  mod flags {
    use super::*;

    #[test]
    fn accepts_common_spellings() {
      for v in ["1", "true", "TRUE", "yes", "On"] {
        assert!(parse_flag("X", v).unwrap(), "{}", v);
      }
      for v in ["", "0", "false", "No", "off"] {
        assert!(!parse_flag("X", v).unwrap(), "{}", v);
      }
    }

    #[test]
    fn rejects_garbage() {
      let err = parse_flag("NETPKG_RUN_TESTS", "maybe").unwrap_err();
      assert!(err.to_string().contains("NETPKG_RUN_TESTS"));
    }

    #[test]
    #[serial]
    fn from_env_reads_both_flags() {
      temp_env::with_vars(
        [(FULL_BUILD_ENV, Some("true")), (RUN_TESTS_ENV, None::<&str>)],
        || {
          let config = MatrixConfig::from_env().unwrap();
          assert_eq!(
            config,
            MatrixConfig {
              full_build: true,
              run_tests: false,
            }
          );
        },
      );
    }

    #[test]
    #[serial]
    fn from_env_propagates_invalid_value() {
      temp_env::with_var(RUN_TESTS_ENV, Some("sometimes"), || {
        assert!(matches!(MatrixConfig::from_env(), Err(ConfigError::InvalidFlag { .. })));
      });
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn from_env_rejects_non_utf8_value() {
      use std::ffi::OsStr;
      use std::os::unix::ffi::OsStrExt;

      let invalid = OsStr::from_bytes(&[0x74, 0xff]);
      temp_env::with_vars([(FULL_BUILD_ENV, None), (RUN_TESTS_ENV, Some(invalid))], || {
        let err = MatrixConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { ref name, .. } if name == RUN_TESTS_ENV));
      });
    }
  }

  mod file {
    use super::*;

    #[test]
    fn empty_file_is_default() {
      assert_eq!(NetpkgConfig::parse("").unwrap(), NetpkgConfig::default());
    }

    #[test]
    fn parses_toolchains_and_currencies() {
      let config = NetpkgConfig::parse(
        r#"
        currencies = ["BCH", "BTC"]
        microarchitectures = ["x86-64", "haswell"]

        [[toolchains]]
        os = "Linux"
        compiler = "gcc"
        version = "4.9"
        "#,
      )
      .unwrap();

      assert_eq!(config.currencies, vec![Currency::Bch, Currency::Btc]);
      assert_eq!(
        config.toolchains,
        vec![Toolchain::new(Os::Linux, Compiler::Gcc, CompilerVersion::new(4, Some(9)))]
      );
      assert_eq!(config.scoped_test_flags(), vec!["network:with_tests".to_string()]);
    }

    #[test]
    fn malformed_compiler_version_is_a_parse_error() {
      let result = NetpkgConfig::parse(
        r#"
        [[toolchains]]
        os = "Linux"
        compiler = "gcc"
        version = "latest"
        "#,
      );
      assert!(result.is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
      assert!(NetpkgConfig::parse("currency = \"BCH\"").is_err());
    }

    #[test]
    fn discover_prefers_file_in_dir() {
      let temp = TempDir::new().unwrap();
      std::fs::write(temp.path().join(CONFIG_FILE_NAME), "package = \"domain\"").unwrap();

      let config = NetpkgConfig::discover(None, temp.path()).unwrap();
      assert_eq!(config.package, "domain");
    }

    #[test]
    fn discover_without_file_uses_defaults() {
      let temp = TempDir::new().unwrap();
      assert_eq!(NetpkgConfig::discover(None, temp.path()).unwrap(), NetpkgConfig::default());
    }

    #[test]
    fn explicit_missing_path_fails() {
      let temp = TempDir::new().unwrap();
      let missing = temp.path().join("nope.toml");
      assert!(matches!(
        NetpkgConfig::discover(Some(&missing), temp.path()),
        Err(ConfigError::Read { .. })
      ));
    }
  }
}
