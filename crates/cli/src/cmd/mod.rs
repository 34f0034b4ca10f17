mod catalog;
mod definitions;
mod info;
mod matrix;

pub use catalog::cmd_catalog;
pub use definitions::cmd_definitions;
pub use info::cmd_info;
pub use matrix::cmd_matrix;

use anyhow::{Context, Result};
use netpkg_lib::settings::{Compiler, Os, Toolchain};

use crate::ToolchainArgs;

/// Parse and validate a toolchain given on the command line.
pub(crate) fn parse_toolchain(args: &ToolchainArgs) -> Result<Toolchain> {
  let os: Os = args.os.parse()?;
  let compiler: Compiler = args.compiler.parse()?;
  let version = compiler
    .parse_version(&args.compiler_version)
    .with_context(|| format!("Invalid compiler version for {}", compiler))?;
  Ok(Toolchain::new(os, compiler, version))
}
