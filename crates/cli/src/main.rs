mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use output::OutputFormat;

/// netpkg - build matrix and recipe tooling for the network library
#[derive(Parser)]
#[command(name = "netpkg")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// A toolchain given on the command line.
#[derive(Args, Debug, Clone)]
pub struct ToolchainArgs {
  /// Target operating system (Linux, Macos, Windows)
  #[arg(long)]
  pub os: String,

  /// Compiler (gcc, clang, apple-clang, "Visual Studio")
  #[arg(long)]
  pub compiler: String,

  /// Compiler version, e.g. 9 or 4.9
  #[arg(long = "compiler-version")]
  pub compiler_version: String,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the filtered, fanned-out list of build jobs
  Matrix {
    /// Path to the configuration file (default: ./netpkg.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with the base jobs to filter (default: enumerate common builds)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Fan out over every supported microarchitecture (also NETPKG_FULL_BUILD)
    #[arg(long)]
    full: bool,

    /// Generate a test build (also NETPKG_RUN_TESTS)
    #[arg(long)]
    tests: bool,
  },

  /// Print the CMake definitions for one build job
  Definitions {
    #[command(flatten)]
    toolchain: ToolchainArgs,

    /// Target architecture
    #[arg(long, default_value = "x86_64")]
    arch: String,

    /// Build type
    #[arg(long, default_value = "Release")]
    build_type: String,

    /// Package option as name=value (unscoped names apply to the network package)
    #[arg(long = "option", value_name = "NAME=VALUE")]
    options: Vec<String>,
  },

  /// List the microarchitecture catalog, or what one toolchain supports
  Catalog {
    #[arg(long, requires_all = ["compiler", "compiler_version"])]
    os: Option<String>,

    #[arg(long, requires_all = ["os", "compiler_version"])]
    compiler: Option<String>,

    #[arg(long = "compiler-version", requires_all = ["os", "compiler"])]
    compiler_version: Option<String>,
  },

  /// Show recipe metadata and package layout
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Matrix {
      config,
      input,
      full,
      tests,
    } => cmd::cmd_matrix(config.as_deref(), input.as_deref(), full, tests, cli.format),
    Commands::Definitions {
      toolchain,
      arch,
      build_type,
      options,
    } => cmd::cmd_definitions(&toolchain, &arch, &build_type, &options, cli.format),
    Commands::Catalog {
      os,
      compiler,
      compiler_version,
    } => {
      let toolchain = match (os, compiler, compiler_version) {
        (Some(os), Some(compiler), Some(compiler_version)) => Some(ToolchainArgs {
          os,
          compiler,
          compiler_version,
        }),
        _ => None,
      };
      cmd::cmd_catalog(toolchain.as_ref(), cli.format)
    }
    Commands::Info => cmd::cmd_info(cli.format),
  };

  if let Err(err) = result {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
  Ok(())
}
