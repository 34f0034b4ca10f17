//! Implementation of the `netpkg matrix` command.
//!
//! Loads the base jobs (from `--input` or by enumerating the configured
//! toolchains), runs them through the generator and prints the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::debug;

use netpkg_lib::common::common_builds;
use netpkg_lib::config::{MatrixConfig, NetpkgConfig};
use netpkg_lib::consts::CONFIG_FILE_NAME;
use netpkg_lib::job::BuildJob;
use netpkg_lib::march::{MicroarchitectureCatalog, RejectReason};
use netpkg_lib::matrix::{BuildMatrix, MatrixWarning};
use netpkg_lib::recipe::Recipe;
use netpkg_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_json, print_success, print_warning, truncate_hash};

#[derive(Serialize)]
struct JobEntry<'a> {
  id: String,
  #[serde(flatten)]
  job: &'a BuildJob,
}

#[derive(Serialize)]
struct MatrixReport<'a> {
  mode: MatrixConfig,
  jobs: Vec<JobEntry<'a>>,
  warnings: &'a [MatrixWarning],
}

pub fn cmd_matrix(
  config_path: Option<&Path>,
  input: Option<&Path>,
  full: bool,
  tests: bool,
  format: OutputFormat,
) -> Result<()> {
  let cwd = std::env::current_dir().context("Failed to determine working directory")?;
  let config = NetpkgConfig::discover(config_path, &cwd).context("Failed to load configuration")?;

  let env_mode = MatrixConfig::from_env().context("Failed to read build mode from environment")?;
  let mode = MatrixConfig {
    full_build: env_mode.full_build || full,
    run_tests: env_mode.run_tests || tests,
  };

  let base_jobs = match input {
    Some(path) => load_jobs(path)?,
    None => {
      if config.toolchains.is_empty() {
        bail!(
          "No toolchains configured. Add [[toolchains]] to {} or pass --input",
          CONFIG_FILE_NAME
        );
      }
      common_builds(&config, &Recipe::network())
    }
  };

  debug!(
    base_jobs = base_jobs.len(),
    toolchains = config.toolchains.len(),
    full_build = mode.full_build,
    run_tests = mode.run_tests,
    "loaded matrix inputs"
  );

  let catalog = MicroarchitectureCatalog::default();
  let matrix = BuildMatrix::new(&config, mode, &catalog)
    .generate(base_jobs)
    .context("Failed to generate build matrix")?;

  let mut jobs = Vec::with_capacity(matrix.jobs.len());
  for job in &matrix.jobs {
    let id = job.compute_hash().context("Failed to hash job")?;
    jobs.push(JobEntry { id: id.0, job });
  }

  if format.is_json() {
    return print_json(&MatrixReport {
      mode,
      jobs,
      warnings: &matrix.warnings,
    });
  }

  for warning in &matrix.warnings {
    print_warning(&describe_warning(warning));
  }

  let currency_option = config.option_name("currency");
  let march_option = config.option_name("microarchitecture");
  for entry in &jobs {
    let settings = &entry.job.settings;
    println!(
      "{}  {} {} {} {} {}  {} {}",
      truncate_hash(&entry.id),
      settings.os,
      settings.compiler,
      settings.compiler_version,
      settings.arch,
      settings.build_type,
      entry.job.option_str(&currency_option).unwrap_or("-"),
      entry.job.option_str(&march_option).unwrap_or("-"),
    );
  }

  print_success(&format!(
    "Generated {} job(s) (full build: {}, tests: {})",
    jobs.len(),
    mode.full_build,
    mode.run_tests
  ));

  Ok(())
}

fn load_jobs(path: &Path) -> Result<Vec<BuildJob>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read jobs: {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse jobs: {}", path.display()))
}

fn describe_warning(warning: &MatrixWarning) -> String {
  match warning {
    MatrixWarning::MarchRejected {
      toolchain,
      march,
      reason,
    } => {
      let why = match reason {
        RejectReason::Unknown => "unknown microarchitecture",
        RejectReason::Unsupported => "not supported by compiler",
      };
      format!("{}: skipping {} ({})", toolchain, march, why)
    }
    MatrixWarning::NoMicroarchitectures { toolchain } => {
      format!("{}: no microarchitectures to build, toolchain skipped", toolchain)
    }
  }
}
