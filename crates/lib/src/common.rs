//! Enumeration of the raw build space.
//!
//! Produces, per toolchain and arch, every (build type, shared/static)
//! combination with the recipe's default options. This is the unfiltered
//! input the matrix generator narrows down.

use tracing::debug;

use crate::config::NetpkgConfig;
use crate::consts::{DEFAULT_CHANNEL, DEFAULT_USER};
use crate::job::BuildJob;
use crate::recipe::Recipe;
use crate::settings::{BuildSetting, BuildType};

const BUILD_TYPES: [BuildType; 2] = [BuildType::Release, BuildType::Debug];

/// All common builds for the configured toolchains and archs, in
/// toolchain, arch, build type, shared order.
pub fn common_builds(config: &NetpkgConfig, recipe: &Recipe) -> Vec<BuildJob> {
  let shared_option = config.option_name("shared");
  let reference = config
    .reference
    .clone()
    .unwrap_or_else(|| recipe.reference(DEFAULT_USER, DEFAULT_CHANNEL));
  let mut jobs = Vec::new();

  for toolchain in &config.toolchains {
    let defaults = recipe.schema.default_options(&config.package, toolchain.os);
    for arch in &config.archs {
      for build_type in BUILD_TYPES {
        for shared in [false, true] {
          let settings = BuildSetting::new(*toolchain, build_type, *arch);
          let job = BuildJob::new(settings, defaults.with(&shared_option, shared));
          jobs.push(job.with_reference(reference.as_str()));
        }
      }
    }
  }

  debug!(jobs = jobs.len(), toolchains = config.toolchains.len(), "enumerated common builds");
  jobs
}
