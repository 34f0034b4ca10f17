use anyhow::Result;
use serde_json::json;

use netpkg_lib::host_platform;
use netpkg_lib::recipe::{PackageLayout, Recipe};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let recipe = Recipe::network();
  let info = recipe.package_info();
  let layout = PackageLayout::network()?;
  let host = host_platform();

  if format.is_json() {
    let options: Vec<_> = recipe
      .schema
      .decls()
      .iter()
      .map(|d| json!({ "name": d.name, "default": d.default_value() }))
      .collect();
    let rules: Vec<_> = layout.rules().iter().map(|r| r.pattern()).collect();
    return print_json(&json!({
      "recipe": recipe,
      "options": options,
      "package_info": info,
      "copy_rules": rules,
      "host": host,
    }));
  }

  println!("{} {}", recipe.name, recipe.version);
  println!("{}", recipe.description);
  println!();
  print_stat("License", recipe.license);
  print_stat("Url", recipe.url);
  print_stat("Requires", &recipe.requires.join(", "));
  print_stat("Settings", &recipe.settings.join(", "));
  print_stat("Libs", &info.libs.join(", "));
  print_stat("Host", host.as_deref().unwrap_or("unsupported"));
  println!();
  println!("Options:");
  for decl in recipe.schema.decls() {
    println!("  {} = {}", decl.name, decl.default_value());
  }
  Ok(())
}
