//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `neon-snake <version> (<date>, <commit>)`
pub fn version_line() -> String {
    format!(
        "neon-snake {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}
