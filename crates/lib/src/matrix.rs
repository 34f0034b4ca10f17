//! Build matrix generation.
//!
//! Turns the raw enumerated settings/options space into the jobs that are
//! actually built:
//!
//! 1. [`filter_release_static`] drops everything but Release + static
//! 2. each surviving job is fanned out over currencies, then over the
//!    microarchitectures its toolchain supports
//! 3. [`narrow_for_tests`] collapses test jobs to the baseline march
//!
//! Output order is input job, then currency, then microarchitecture, each
//! in the order given, so identical inputs always give identical lists.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{MatrixConfig, NetpkgConfig};
use crate::consts::BASELINE_MARCH;
use crate::currency::Currency;
use crate::job::BuildJob;
use crate::march::{MarchResolution, MicroarchitectureCatalog, RejectReason};
use crate::options::{OptionSet, OptionValue};
use crate::settings::{BuildType, SettingsError, Toolchain};

#[derive(Debug, Error)]
pub enum MatrixError {
  #[error("cannot resolve microarchitectures for {toolchain}: {source}")]
  Toolchain {
    toolchain: Toolchain,
    #[source]
    source: SettingsError,
  },
}

/// Something the caller may want to surface, but that does not stop generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixWarning {
  /// A requested microarchitecture was filtered out for a toolchain.
  MarchRejected {
    toolchain: Toolchain,
    march: String,
    reason: RejectReason,
  },
  /// Nothing could be built for a toolchain.
  NoMicroarchitectures { toolchain: Toolchain },
}

/// Generated jobs plus non-fatal findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matrix {
  pub jobs: Vec<BuildJob>,
  pub warnings: Vec<MatrixWarning>,
}

/// Keep only Release jobs whose `shared_option` is false.
///
/// A job without the shared option cannot be shown to be static and is dropped.
pub fn filter_release_static(jobs: Vec<BuildJob>, shared_option: &str) -> Vec<BuildJob> {
  jobs
    .into_iter()
    .filter(|job| {
      job.settings.build_type == BuildType::Release
        && job.options.get(shared_option).and_then(OptionValue::as_bool) == Some(false)
    })
    .collect()
}

/// One option set per currency, each selecting exactly that currency.
pub fn expand_currency_variants(options: &OptionSet, currency_option: &str, currencies: &[Currency]) -> Vec<OptionSet> {
  currencies
    .iter()
    .map(|currency| options.with(currency_option, currency.as_str()))
    .collect()
}

/// Append one option set per microarchitecture to `out`.
pub fn expand_microarchitectures(options: &OptionSet, march_option: &str, marchs: &[String], out: &mut Vec<OptionSet>) {
  out.extend(marchs.iter().map(|march| options.with(march_option, march.as_str())));
}

/// Rewrite the march of every job with a test flag on to the baseline, then
/// drop the duplicates that creates, keeping first occurrences.
///
/// Applying it twice is the same as applying it once.
pub fn narrow_for_tests(jobs: Vec<BuildJob>, test_flag_options: &[String], march_option: &str) -> Vec<BuildJob> {
  let mut narrowed: Vec<BuildJob> = Vec::with_capacity(jobs.len());
  for job in jobs {
    let testing = test_flag_options.iter().any(|flag| job.options.is_enabled(flag));
    let job = if testing && job.option_str(march_option) != Some(BASELINE_MARCH) {
      job.with_options(job.options.with(march_option, BASELINE_MARCH))
    } else {
      job
    };
    if !narrowed.contains(&job) {
      narrowed.push(job);
    }
  }
  narrowed
}

/// The generator: configuration plus catalog, applied to a list of base jobs.
pub struct BuildMatrix<'a> {
  catalog: &'a MicroarchitectureCatalog,
  mode: MatrixConfig,
  currencies: Vec<Currency>,
  microarchitectures: Option<Vec<String>>,
  shared_option: String,
  currency_option: String,
  march_option: String,
  test_flag_options: Vec<String>,
}

impl<'a> BuildMatrix<'a> {
  pub fn new(config: &NetpkgConfig, mode: MatrixConfig, catalog: &'a MicroarchitectureCatalog) -> Self {
    Self {
      catalog,
      mode,
      currencies: config.currencies.clone(),
      microarchitectures: config.microarchitectures.clone(),
      shared_option: config.option_name("shared"),
      currency_option: config.option_name("currency"),
      march_option: config.option_name("microarchitecture"),
      test_flag_options: config.scoped_test_flags(),
    }
  }

  fn requested(&self) -> Option<Vec<String>> {
    if self.mode.full_build {
      self.microarchitectures.clone()
    } else {
      Some(vec![BASELINE_MARCH.to_string()])
    }
  }

  fn resolve(&self, toolchain: &Toolchain, warnings: &mut Vec<MatrixWarning>) -> Result<MarchResolution, MatrixError> {
    let requested = self.requested();
    let resolution = self
      .catalog
      .resolve(toolchain, requested.as_deref(), &self.mode)
      .map_err(|source| MatrixError::Toolchain {
        toolchain: *toolchain,
        source,
      })?;

    warnings.extend(resolution.rejected.iter().map(|r| MatrixWarning::MarchRejected {
      toolchain: *toolchain,
      march: r.name.clone(),
      reason: r.reason,
    }));
    if resolution.resolved.is_empty() {
      warn!(toolchain = %toolchain, "no microarchitectures to build");
      warnings.push(MatrixWarning::NoMicroarchitectures { toolchain: *toolchain });
    }
    Ok(resolution)
  }

  /// Filter `base_jobs` and fan them out into the final job list.
  pub fn generate(&self, base_jobs: Vec<BuildJob>) -> Result<Matrix, MatrixError> {
    let total = base_jobs.len();
    let filtered = filter_release_static(base_jobs, &self.shared_option);
    debug!(total, kept = filtered.len(), "filtered to release static jobs");

    let mut resolutions: HashMap<Toolchain, MarchResolution> = HashMap::new();
    let mut warnings = Vec::new();
    let mut jobs = Vec::new();

    for base in &filtered {
      let toolchain = base.settings.toolchain();
      if !resolutions.contains_key(&toolchain) {
        let resolution = self.resolve(&toolchain, &mut warnings)?;
        resolutions.insert(toolchain, resolution);
      }
      let marchs = &resolutions[&toolchain].resolved;

      let options = if self.mode.run_tests {
        self
          .test_flag_options
          .iter()
          .fold(base.options.clone(), |acc, flag| acc.with(flag, true))
      } else {
        base.options.clone()
      };

      for variant in expand_currency_variants(&options, &self.currency_option, &self.currencies) {
        let mut fanned = Vec::with_capacity(marchs.len());
        expand_microarchitectures(&variant, &self.march_option, marchs, &mut fanned);
        jobs.extend(fanned.into_iter().map(|o| base.with_options(o)));
      }
    }

    let jobs = narrow_for_tests(jobs, &self.test_flag_options, &self.march_option);
    info!(
      jobs = jobs.len(),
      full_build = self.mode.full_build,
      run_tests = self.mode.run_tests,
      "generated build matrix"
    );
    Ok(Matrix { jobs, warnings })
  }
}
