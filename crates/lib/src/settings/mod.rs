//! Build settings: the platform/toolchain half of a build job.
//!
//! A [`BuildSetting`] is the immutable (os, compiler, compiler version, build
//! type, arch) tuple identifying one toolchain/platform combination. The
//! (os, compiler, version) part is a [`Toolchain`], which is what the
//! microarchitecture catalog is keyed on.

mod arch;
mod compiler;
mod os;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arch::Arch;
pub use compiler::{Compiler, CompilerVersion};
pub use os::Os;

/// Errors raised while parsing or validating settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
  #[error("unknown operating system: {0}")]
  UnknownOs(String),

  #[error("unknown architecture: {0}")]
  UnknownArch(String),

  #[error("unknown compiler: {0}")]
  UnknownCompiler(String),

  #[error("unknown build type: {0}")]
  UnknownBuildType(String),

  #[error("malformed compiler version: {0:?}")]
  MalformedCompilerVersion(String),

  #[error("unknown {compiler} version: {version}")]
  UnknownCompilerVersion { compiler: Compiler, version: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildType {
  Release,
  Debug,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Release => "Release",
      Self::Debug => "Debug",
      Self::RelWithDebInfo => "RelWithDebInfo",
      Self::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = SettingsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Release" => Ok(Self::Release),
      "Debug" => Ok(Self::Debug),
      "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
      "MinSizeRel" => Ok(Self::MinSizeRel),
      _ => Err(SettingsError::UnknownBuildType(s.to_string())),
    }
  }
}

/// The (platform, compiler, compiler version) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Toolchain {
  pub os: Os,
  pub compiler: Compiler,
  #[serde(rename = "version", alias = "compiler_version")]
  pub compiler_version: CompilerVersion,
}

impl Toolchain {
  pub fn new(os: Os, compiler: Compiler, compiler_version: CompilerVersion) -> Self {
    Self {
      os,
      compiler,
      compiler_version,
    }
  }

  /// Fails if the compiler version is outside the range this tool knows about.
  pub fn validate(&self) -> Result<(), SettingsError> {
    self.compiler.check_version(&self.compiler_version)
  }

  /// Whether the compiler can run on the OS at all.
  ///
  /// apple-clang only exists on macOS and Visual Studio only on Windows.
  pub fn is_native(&self) -> bool {
    match self.compiler {
      Compiler::AppleClang => self.os == Os::Macos,
      Compiler::VisualStudio => self.os == Os::Windows,
      Compiler::Gcc | Compiler::Clang => true,
    }
  }
}

impl fmt::Display for Toolchain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {}", self.os, self.compiler, self.compiler_version)
  }
}

/// One toolchain/platform combination plus build type and arch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildSetting {
  pub os: Os,
  pub compiler: Compiler,
  #[serde(rename = "compiler.version", alias = "compiler_version")]
  pub compiler_version: CompilerVersion,
  pub build_type: BuildType,
  pub arch: Arch,
}

impl BuildSetting {
  pub fn new(toolchain: Toolchain, build_type: BuildType, arch: Arch) -> Self {
    Self {
      os: toolchain.os,
      compiler: toolchain.compiler,
      compiler_version: toolchain.compiler_version,
      build_type,
      arch,
    }
  }

  pub fn toolchain(&self) -> Toolchain {
    Toolchain::new(self.os, self.compiler, self.compiler_version)
  }
}
