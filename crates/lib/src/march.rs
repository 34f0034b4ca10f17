//! Microarchitecture catalog and resolution.
//!
//! The catalog lists the `-march` tuning targets the library can be built
//! for, each gated on the minimum compiler version that understands it.
//! [`MicroarchitectureCatalog::resolve`] narrows a requested list to what a
//! given toolchain actually supports.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MatrixConfig;
use crate::consts::BASELINE_MARCH;
use crate::settings::{Compiler, SettingsError, Toolchain};

/// Minimum `(major, minor)` compiler version, or `None` when unsupported.
type MinVersion = Option<(u32, u32)>;

/// One microarchitecture and the compilers that can target it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarchEntry {
  pub name: &'static str,
  gcc: MinVersion,
  clang: MinVersion,
  apple_clang: MinVersion,
  visual_studio: MinVersion,
  /// `/arch:` value for Visual Studio, `None` for the default SSE2 target.
  pub msvc_arch: Option<&'static str>,
}

impl MarchEntry {
  const fn new(
    name: &'static str,
    gcc: MinVersion,
    clang: MinVersion,
    apple_clang: MinVersion,
    visual_studio: MinVersion,
    msvc_arch: Option<&'static str>,
  ) -> Self {
    Self {
      name,
      gcc,
      clang,
      apple_clang,
      visual_studio,
      msvc_arch,
    }
  }

  fn min_version(&self, compiler: Compiler) -> MinVersion {
    match compiler {
      Compiler::Gcc => self.gcc,
      Compiler::Clang => self.clang,
      Compiler::AppleClang => self.apple_clang,
      Compiler::VisualStudio => self.visual_studio,
    }
  }

  /// Whether `toolchain` can generate code for this microarchitecture.
  pub fn supported_by(&self, toolchain: &Toolchain) -> bool {
    self
      .min_version(toolchain.compiler)
      .is_some_and(|(major, minor)| toolchain.compiler_version.at_least(major, minor))
  }
}

#[rustfmt::skip]
const BUILTIN: &[MarchEntry] = &[
  //             name              gcc             clang           apple-clang      Visual Studio    /arch
  MarchEntry::new("x86-64",         Some((4, 0)),  Some((3, 0)),  Some((7, 0)),   Some((12, 0)), None),
  MarchEntry::new("core2",          Some((4, 3)),  Some((3, 0)),  Some((7, 0)),   None,          None),
  MarchEntry::new("nehalem",        Some((4, 9)),  Some((3, 0)),  Some((7, 0)),   None,          None),
  MarchEntry::new("westmere",       Some((4, 9)),  Some((3, 0)),  Some((7, 0)),   None,          None),
  MarchEntry::new("sandybridge",    Some((4, 9)),  Some((3, 0)),  Some((7, 0)),   Some((12, 0)), Some("AVX")),
  MarchEntry::new("ivybridge",      Some((4, 9)),  Some((3, 0)),  Some((7, 0)),   Some((12, 0)), Some("AVX")),
  MarchEntry::new("haswell",        Some((4, 9)),  Some((3, 3)),  Some((7, 0)),   Some((12, 0)), Some("AVX2")),
  MarchEntry::new("broadwell",      Some((4, 9)),  Some((3, 6)),  Some((7, 0)),   Some((12, 0)), Some("AVX2")),
  MarchEntry::new("skylake",        Some((6, 0)),  Some((3, 8)),  Some((8, 0)),   Some((12, 0)), Some("AVX2")),
  MarchEntry::new("skylake-avx512", Some((6, 0)),  Some((3, 9)),  Some((9, 0)),   Some((15, 0)), Some("AVX512")),
  MarchEntry::new("cannonlake",     Some((8, 0)),  Some((5, 0)),  Some((10, 0)),  Some((15, 0)), Some("AVX512")),
  MarchEntry::new("icelake-client", Some((8, 0)),  Some((7, 0)),  Some((11, 0)),  Some((15, 0)), Some("AVX512")),
  MarchEntry::new("icelake-server", Some((8, 0)),  Some((7, 0)),  Some((11, 0)),  Some((15, 0)), Some("AVX512")),
  MarchEntry::new("znver1",         Some((6, 0)),  Some((4, 0)),  Some((9, 0)),   Some((12, 0)), Some("AVX2")),
  MarchEntry::new("znver2",         Some((9, 0)),  Some((9, 0)),  Some((12, 0)),  Some((12, 0)), Some("AVX2")),
  MarchEntry::new("znver3",         Some((11, 0)), Some((12, 0)), Some((13, 0)),  Some((12, 0)), Some("AVX2")),
];

/// Why a requested microarchitecture was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
  /// Not in the catalog at all.
  Unknown,
  /// In the catalog, but the toolchain cannot target it.
  Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedMarch {
  pub name: String,
  pub reason: RejectReason,
}

/// Outcome of resolving a requested list against a toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarchResolution {
  /// Supported names, in request order, without duplicates.
  pub resolved: Vec<String>,
  pub rejected: Vec<RejectedMarch>,
}

/// Ordered set of microarchitectures the library can be tuned for.
#[derive(Debug, Clone)]
pub struct MicroarchitectureCatalog {
  entries: Vec<MarchEntry>,
}

impl Default for MicroarchitectureCatalog {
  fn default() -> Self {
    Self {
      entries: BUILTIN.to_vec(),
    }
  }
}

impl MicroarchitectureCatalog {
  pub fn entries(&self) -> &[MarchEntry] {
    &self.entries
  }

  pub fn get(&self, name: &str) -> Option<&MarchEntry> {
    self.entries.iter().find(|e| e.name == name)
  }

  /// All catalog names, in catalog order.
  pub fn names(&self) -> Vec<String> {
    self.entries.iter().map(|e| e.name.to_string()).collect()
  }

  /// Catalog names the toolchain supports, in catalog order.
  pub fn supported(&self, toolchain: &Toolchain) -> Result<Vec<String>, SettingsError> {
    toolchain.validate()?;
    if !toolchain.is_native() {
      return Ok(Vec::new());
    }
    Ok(
      self
        .entries
        .iter()
        .filter(|e| e.supported_by(toolchain))
        .map(|e| e.name.to_string())
        .collect(),
    )
  }

  /// Narrow `requested` (or the whole catalog when `None`) to what `toolchain` supports.
  ///
  /// The compiler version is validated first and an unknown version is an
  /// error even in test mode. In test mode the result is always the baseline
  /// alone. Names that are unknown or unsupported are reported in
  /// [`MarchResolution::rejected`] and never fail the call.
  pub fn resolve(
    &self,
    toolchain: &Toolchain,
    requested: Option<&[String]>,
    config: &MatrixConfig,
  ) -> Result<MarchResolution, SettingsError> {
    toolchain.validate()?;

    if !toolchain.is_native() {
      warn!(toolchain = %toolchain, "compiler cannot run on this platform, no microarchitectures");
      return Ok(MarchResolution::default());
    }

    if config.run_tests {
      debug!(toolchain = %toolchain, "test build, using baseline microarchitecture only");
      return Ok(MarchResolution {
        resolved: vec![BASELINE_MARCH.to_string()],
        rejected: Vec::new(),
      });
    }

    let catalog_names;
    let requested = match requested {
      Some(requested) => requested,
      None => {
        catalog_names = self.names();
        &catalog_names[..]
      }
    };

    let mut resolution = MarchResolution::default();
    for name in requested {
      if resolution.resolved.contains(name) {
        continue;
      }
      match self.get(name) {
        Some(entry) if entry.supported_by(toolchain) => resolution.resolved.push(name.clone()),
        Some(_) => {
          warn!(march = %name, toolchain = %toolchain, "microarchitecture not supported by toolchain");
          resolution.rejected.push(RejectedMarch {
            name: name.clone(),
            reason: RejectReason::Unsupported,
          });
        }
        None => {
          warn!(march = %name, "unknown microarchitecture");
          resolution.rejected.push(RejectedMarch {
            name: name.clone(),
            reason: RejectReason::Unknown,
          });
        }
      }
    }

    debug!(toolchain = %toolchain, resolved = ?resolution.resolved, "resolved microarchitectures");
    Ok(resolution)
  }
}
