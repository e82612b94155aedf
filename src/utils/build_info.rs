use std::fmt;

use once_cell::sync::Lazy;

/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("HUVUDBOK_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("HUVUDBOK_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("HUVUDBOK_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("HUVUDBOK_BUILD_TARGET").unwrap_or("unknown"),
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, built {} for {})",
            self.version, self.git_hash, self.git_status, self.timestamp, self.target
        )
    }
}

static LONG_VERSION: Lazy<String> = Lazy::new(|| current().to_string());

/// Long version string for `--version`.
pub fn long_version() -> &'static str {
    LONG_VERSION.as_str()
}
