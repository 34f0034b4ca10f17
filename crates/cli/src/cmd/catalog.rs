use anyhow::{Context, Result};
use serde_json::json;

use netpkg_lib::march::{MarchEntry, MicroarchitectureCatalog};
use netpkg_lib::settings::Compiler;

use crate::ToolchainArgs;
use crate::cmd::parse_toolchain;
use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_catalog(toolchain: Option<&ToolchainArgs>, format: OutputFormat) -> Result<()> {
  let catalog = MicroarchitectureCatalog::default();

  let (toolchain, names) = match toolchain {
    Some(args) => {
      let toolchain = parse_toolchain(args)?;
      let names = catalog
        .supported(&toolchain)
        .with_context(|| format!("Failed to resolve microarchitectures for {}", toolchain))?;
      (Some(toolchain), names)
    }
    None => (None, catalog.names()),
  };

  let entries: Vec<&MarchEntry> = catalog
    .entries()
    .iter()
    .filter(|e| names.iter().any(|n| n == e.name))
    .collect();

  if format.is_json() {
    let marchs: Vec<_> = entries
      .iter()
      .map(|e| json!({ "name": e.name, "msvc_arch": e.msvc_arch }))
      .collect();
    return print_json(&json!({ "toolchain": toolchain, "microarchitectures": marchs }));
  }

  // `/arch:` only means something to Visual Studio; without a toolchain show it for every entry.
  let show_msvc = toolchain.is_none_or(|t| t.compiler == Compiler::VisualStudio);
  if let Some(toolchain) = toolchain {
    println!("{}:", toolchain);
  }
  for entry in entries {
    match entry.msvc_arch.filter(|_| show_msvc) {
      Some(arch) => println!("  {} {} (/arch:{})", symbols::INFO, entry.name, arch),
      None => println!("  {} {}", symbols::INFO, entry.name),
    }
  }
  Ok(())
}
