/// Configuration source constants shared across crates
pub const CONFIG_FILE_STEM: &str = "recur";
pub const CONFIG_FILE_NAME: &str = const_str::concat!(CONFIG_FILE_STEM, ".toml");
pub const ENV_PREFIX: &str = "RECUR";

/// Zone identifier used when no governing zone is supplied.
pub const UTC_TZID: &str = "UTC";

pub const DEFAULT_LOG_LEVEL: &str = "info";
