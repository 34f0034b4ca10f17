use std::collections::BTreeMap;

use tracing::debug;

use crate::job::BuildJob;
use crate::march::MicroarchitectureCatalog;
use crate::options::scoped;
use crate::settings::{Compiler, Os};

use super::{Recipe, RecipeError};

pub fn on_off(value: bool) -> &'static str {
  if value { "ON" } else { "OFF" }
}

/// CMake `-D` definitions for building `job` with `recipe`.
///
/// Options missing from the job fall back to the recipe defaults. The job's
/// compiler version is validated first; an unknown version is an error.
pub fn cmake_definitions(
  recipe: &Recipe,
  catalog: &MicroarchitectureCatalog,
  job: &BuildJob,
) -> Result<BTreeMap<String, String>, RecipeError> {
  let settings = &job.settings;
  settings.toolchain().validate()?;
  recipe.schema.validate(recipe.name, &job.options)?;

  let options = recipe.schema.effective(recipe.name, settings.os, &job.options);
  let flag = |name: &str| options.is_enabled(&scoped(recipe.name, name));
  let text = |name: &str| {
    options
      .get(&scoped(recipe.name, name))
      .map(|v| v.to_string())
      .unwrap_or_default()
  };

  let mut defs = BTreeMap::new();
  let mut define = |key: &str, value: &str| {
    defs.insert(key.to_string(), value.to_string());
  };

  define("USE_CONAN", "ON");
  define("NO_CONAN_AT_ALL", "OFF");
  define("CMAKE_VERBOSE_MAKEFILE", on_off(flag("verbose")));
  define("ENABLE_SHARED", on_off(flag("shared")));
  if settings.os != Os::Windows {
    define("ENABLE_POSITION_INDEPENDENT_CODE", on_off(flag("fPIC")));
  }
  define("WITH_TESTS", on_off(flag("with_tests")));
  define("CURRENCY", &text("currency"));

  let march = text("microarchitecture");
  let entry = catalog
    .get(&march)
    .ok_or_else(|| RecipeError::UnknownMicroarchitecture(march.clone()))?;
  define("MICROARCHITECTURE", &march);
  if settings.compiler.is_gnu_like() {
    define("MARCH_FLAGS", &format!("-march={}", entry.name));
  } else if let Some(arch) = entry.msvc_arch {
    define("MARCH_FLAGS", &format!("/arch:{}", arch));
  }

  // libstdc++ switched to the C++11 ABI in gcc 5
  if settings.compiler == Compiler::Gcc {
    define(
      "NOT_USE_CPP11_ABI",
      on_off(!settings.compiler_version.at_least(5, 0)),
    );
  }

  debug!(definitions = defs.len(), compiler = %settings.compiler, "computed cmake definitions");
  Ok(defs)
}
