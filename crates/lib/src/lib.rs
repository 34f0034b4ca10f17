//! netpkg-lib: packaging recipe and build-matrix generation for the network library.
//!
//! This crate provides:
//! - `settings` / `options` / `job`: the (settings, options) shape of a build job
//! - `march`: the microarchitecture catalog and its toolchain gating
//! - `matrix`: filtering and currency/microarchitecture fan-out of jobs
//! - `common`: enumeration of the raw build space
//! - `recipe`: package metadata, option schema, CMake wiring and package layout
//! - `config`: explicit mode flags and the `netpkg.toml` file

pub mod common;
pub mod config;
pub mod consts;
pub mod currency;
pub mod job;
pub mod march;
pub mod matrix;
pub mod options;
pub mod recipe;
pub mod settings;
pub mod util;

use settings::{Arch, Os};

/// Host platform string, e.g. `"Linux-x86_64"`.
///
/// Returns `None` if the host OS or architecture is not one builds target.
pub fn host_platform() -> Option<String> {
  Some(format!("{}-{}", Os::current()?, Arch::current()?))
}
