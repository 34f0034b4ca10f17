use anyhow::{Context, Result, anyhow};

use netpkg_lib::job::BuildJob;
use netpkg_lib::march::MicroarchitectureCatalog;
use netpkg_lib::options::{OptionSet, OptionValue, scoped};
use netpkg_lib::recipe::{Recipe, cmake_definitions};
use netpkg_lib::settings::{Arch, BuildSetting, BuildType};

use crate::ToolchainArgs;
use crate::cmd::parse_toolchain;
use crate::output::{OutputFormat, print_json};

pub fn cmd_definitions(
  toolchain: &ToolchainArgs,
  arch: &str,
  build_type: &str,
  options: &[String],
  format: OutputFormat,
) -> Result<()> {
  let recipe = Recipe::network();
  let toolchain = parse_toolchain(toolchain)?;
  let arch: Arch = arch.parse()?;
  let build_type: BuildType = build_type.parse()?;

  let options = parse_options(recipe.name, options)?;
  let job = BuildJob::new(BuildSetting::new(toolchain, build_type, arch), options);

  let defs = cmake_definitions(&recipe, &MicroarchitectureCatalog::default(), &job)
    .context("Failed to compute CMake definitions")?;

  if format.is_json() {
    return print_json(&defs);
  }
  for (key, value) in &defs {
    println!("-D{}={}", key, value);
  }
  Ok(())
}

/// Parse `name=value` pairs into a scoped option set.
fn parse_options(package: &str, raw: &[String]) -> Result<OptionSet> {
  raw
    .iter()
    .map(|pair| -> Result<(String, OptionValue)> {
      let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid option {:?}, expected NAME=VALUE", pair))?;
      let name = if name.contains(':') {
        name.to_string()
      } else {
        scoped(package, name)
      };
      let value = match value {
        "True" | "true" => OptionValue::Bool(true),
        "False" | "false" => OptionValue::Bool(false),
        other => OptionValue::from(other),
      };
      Ok((name, value))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unscoped_names_get_package_prefix() {
    let options = parse_options("network", &["currency=BTC".to_string(), "boost:shared=true".to_string()]).unwrap();
    assert_eq!(options.get("network:currency"), Some(&OptionValue::from("BTC")));
    assert_eq!(options.get("boost:shared"), Some(&OptionValue::Bool(true)));
  }

  #[test]
  fn missing_equals_is_an_error() {
    assert!(parse_options("network", &["shared".to_string()]).is_err());
  }
}
