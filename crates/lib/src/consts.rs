/// Default configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "netpkg.toml";

/// Package name of the library being packaged.
pub const PACKAGE_NAME: &str = "network";

/// Environment flag enabling the full microarchitecture fan-out.
pub const FULL_BUILD_ENV: &str = "NETPKG_FULL_BUILD";

/// Environment flag requesting a test build.
pub const RUN_TESTS_ENV: &str = "NETPKG_RUN_TESTS";

/// Length of the truncated hex digest used for job ids.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Microarchitecture every known toolchain can target.
pub const BASELINE_MARCH: &str = "x86-64";

/// User and channel of the package reference when none is configured.
pub const DEFAULT_USER: &str = "kth";
pub const DEFAULT_CHANNEL: &str = "stable";
