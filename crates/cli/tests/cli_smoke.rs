//! CLI smoke tests for netpkg.
//!
//! These tests run the binary end to end and check exit codes and the shape
//! of what lands on stdout.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the netpkg binary with the mode flags cleared.
fn netpkg_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("netpkg");
  cmd.env_remove("NETPKG_FULL_BUILD").env_remove("NETPKG_RUN_TESTS");
  cmd
}

/// Create a temp directory with a netpkg.toml.
fn temp_config(content: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("netpkg.toml"), content).unwrap();
  temp
}

const GCC9_CONFIG: &str = r#"
currencies = ["BCH", "BTC"]
microarchitectures = ["x86-64", "haswell"]

[[toolchains]]
os = "Linux"
compiler = "gcc"
version = "9"
"#;

fn matrix_json(cmd: &mut Command) -> serde_json::Value {
  let output = cmd.output().unwrap();
  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  serde_json::from_slice(&output.stdout).unwrap()
}

fn pairs(report: &serde_json::Value) -> Vec<(String, String)> {
  report["jobs"]
    .as_array()
    .unwrap()
    .iter()
    .map(|job| {
      (
        job["options"]["network:currency"].as_str().unwrap().to_string(),
        job["options"]["network:microarchitecture"].as_str().unwrap().to_string(),
      )
    })
    .collect()
}

fn pair(currency: &str, march: &str) -> (String, String) {
  (currency.to_string(), march.to_string())
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  netpkg_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  netpkg_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("netpkg"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["matrix", "definitions", "catalog", "info"] {
    netpkg_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// matrix
// =============================================================================

#[test]
#[serial]
fn full_build_fans_out_currency_then_march() {
  let temp = temp_config(GCC9_CONFIG);
  let report = matrix_json(
    netpkg_cmd()
      .current_dir(temp.path())
      .args(["--format", "json", "matrix", "--full"]),
  );

  assert_eq!(
    pairs(&report),
    vec![
      pair("BCH", "x86-64"),
      pair("BCH", "haswell"),
      pair("BTC", "x86-64"),
      pair("BTC", "haswell"),
    ]
  );
  for job in report["jobs"].as_array().unwrap() {
    assert_eq!(job["settings"]["build_type"], "Release");
    assert_eq!(job["options"]["network:shared"], false);
    assert_eq!(job["id"].as_str().unwrap().len(), 20);
  }
}

#[test]
#[serial]
fn test_mode_from_environment_collapses_marchs() {
  let temp = temp_config(GCC9_CONFIG);
  let report = matrix_json(
    netpkg_cmd()
      .current_dir(temp.path())
      .env("NETPKG_FULL_BUILD", "true")
      .env("NETPKG_RUN_TESTS", "1")
      .args(["--format", "json", "matrix"]),
  );

  assert_eq!(pairs(&report), vec![pair("BCH", "x86-64"), pair("BTC", "x86-64")]);
  assert_eq!(report["mode"]["run_tests"], true);
}

#[test]
#[serial]
fn invalid_environment_flag_fails() {
  let temp = temp_config(GCC9_CONFIG);

  netpkg_cmd()
    .current_dir(temp.path())
    .env("NETPKG_RUN_TESTS", "perhaps")
    .arg("matrix")
    .assert()
    .failure()
    .stderr(predicate::str::contains("NETPKG_RUN_TESTS"));
}

#[test]
#[serial]
fn matrix_is_deterministic() {
  let temp = temp_config(GCC9_CONFIG);
  let run = || {
    netpkg_cmd()
      .current_dir(temp.path())
      .args(["--format", "json", "matrix", "--full"])
      .output()
      .unwrap()
      .stdout
  };

  assert_eq!(run(), run());
}

#[test]
#[serial]
fn matrix_from_input_file() {
  let temp = TempDir::new().unwrap();
  let input = temp.path().join("jobs.json");
  std::fs::write(
    &input,
    r#"[
      {
        "settings": {"os":"Linux","compiler":"clang","compiler.version":"10","build_type":"Release","arch":"x86_64"},
        "options": {"network:shared": false}
      },
      {
        "settings": {"os":"Linux","compiler":"clang","compiler.version":"10","build_type":"Debug","arch":"x86_64"},
        "options": {"network:shared": false}
      }
    ]"#,
  )
  .unwrap();

  let report = matrix_json(
    netpkg_cmd()
      .current_dir(temp.path())
      .args(["--format", "json", "matrix", "--input"])
      .arg(&input),
  );

  // Default config: three currencies, baseline march only.
  assert_eq!(
    pairs(&report),
    vec![pair("BCH", "x86-64"), pair("BTC", "x86-64"), pair("LTC", "x86-64")]
  );
}

#[test]
#[serial]
fn unknown_compiler_version_fails_fast() {
  let temp = TempDir::new().unwrap();
  let input = temp.path().join("jobs.json");
  std::fs::write(
    &input,
    r#"[{
      "settings": {"os":"Linux","compiler":"gcc","compiler.version":"99","build_type":"Release","arch":"x86_64"},
      "options": {"network:shared": false}
    }]"#,
  )
  .unwrap();

  netpkg_cmd()
    .current_dir(temp.path())
    .args(["matrix", "--input"])
    .arg(&input)
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown gcc version: 99"));
}

#[test]
#[serial]
fn matrix_without_toolchains_fails() {
  let temp = TempDir::new().unwrap();

  netpkg_cmd()
    .current_dir(temp.path())
    .arg("matrix")
    .assert()
    .failure()
    .stderr(predicate::str::contains("No toolchains configured"));
}

#[test]
#[serial]
fn text_output_lists_jobs() {
  let temp = temp_config(GCC9_CONFIG);

  netpkg_cmd()
    .current_dir(temp.path())
    .args(["matrix", "--full"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Linux gcc 9 x86_64 Release  BTC haswell"))
    .stderr(predicate::str::contains("Generated 4 job(s)"));
}

#[test]
#[serial]
fn verbose_logs_matrix_inputs() {
  let temp = temp_config(GCC9_CONFIG);

  netpkg_cmd()
    .env_remove("RUST_LOG")
    .current_dir(temp.path())
    .args(["--verbose", "matrix"])
    .assert()
    .success()
    .stderr(predicate::str::contains("loaded matrix inputs"));
}

#[test]
#[serial]
fn enumerated_jobs_carry_default_reference() {
  let temp = temp_config(GCC9_CONFIG);
  let report = matrix_json(netpkg_cmd().current_dir(temp.path()).args(["--format", "json", "matrix"]));

  for job in report["jobs"].as_array().unwrap() {
    assert_eq!(job["reference"], "network/0.1@kth/stable");
  }
}

// =============================================================================
// definitions
// =============================================================================

#[test]
fn definitions_for_old_gcc() {
  netpkg_cmd()
    .args([
      "definitions",
      "--os",
      "Linux",
      "--compiler",
      "gcc",
      "--compiler-version",
      "4.9",
      "--option",
      "microarchitecture=haswell",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("-DNOT_USE_CPP11_ABI=ON"))
    .stdout(predicate::str::contains("-DMARCH_FLAGS=-march=haswell"));
}

#[test]
fn definitions_reject_malformed_version() {
  netpkg_cmd()
    .args(["definitions", "--os", "Linux", "--compiler", "gcc", "--compiler-version", "seven"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed compiler version"));
}

// =============================================================================
// catalog & info
// =============================================================================

#[test]
fn catalog_for_toolchain() {
  netpkg_cmd()
    .args(["catalog", "--os", "Linux", "--compiler", "gcc", "--compiler-version", "4.8"])
    .assert()
    .success()
    .stdout(predicate::str::contains("core2"))
    .stdout(predicate::str::contains("haswell").not());
}

#[test]
fn catalog_shows_msvc_arch_for_visual_studio() {
  netpkg_cmd()
    .args(["catalog", "--os", "Windows", "--compiler", "msvc", "--compiler-version", "16"])
    .assert()
    .success()
    .stdout(predicate::str::contains("haswell (/arch:AVX2)"))
    .stdout(predicate::str::contains("core2").not());
}

#[test]
fn catalog_hides_msvc_arch_for_gcc() {
  netpkg_cmd()
    .args(["catalog", "--os", "Linux", "--compiler", "gcc", "--compiler-version", "9"])
    .assert()
    .success()
    .stdout(predicate::str::contains("haswell"))
    .stdout(predicate::str::contains("/arch:").not());
}

#[test]
fn info_shows_recipe() {
  netpkg_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("network 0.1"))
    .stdout(predicate::str::contains("microarchitecture = x86-64"));
}
