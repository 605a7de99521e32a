//! Global switch for shaping-pattern caching
//!
//! Pattern caching is **enabled by default**. It can be turned off for a
//! whole process through the `TYPESET_PATTERN_CACHE` environment variable or
//! at runtime with [`set_pattern_caching_enabled`].
//!
//! # Example
//!
//! ```
//! use typeset_core::cache_config;
//!
//! if cache_config::is_pattern_caching_enabled() {
//!     println!("Patterns are memoized per typeface");
//! }
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! TYPESET_PATTERN_CACHE=0 ./my_app
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Name of the environment variable read on first use
pub const PATTERN_CACHE_ENV: &str = "TYPESET_PATTERN_CACHE";

static PATTERN_CACHING_ENABLED: AtomicBool = AtomicBool::new(true);

static ENV_CHECKED: OnceLock<()> = OnceLock::new();

/// Interpret an environment value as an on/off switch
///
/// Returns `None` for values that are neither.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(value) = std::env::var(PATTERN_CACHE_ENV) {
            match parse_switch(&value) {
                Some(enabled) => {
                    PATTERN_CACHING_ENABLED.store(enabled, Ordering::SeqCst);
                    log::info!(
                        "Pattern caching {} via {PATTERN_CACHE_ENV}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                None => log::warn!("Ignoring {PATTERN_CACHE_ENV}={value:?}"),
            }
        }
    });
}

/// Check if pattern caching is enabled
///
/// The environment variable is consulted on the first call; runtime changes
/// made with [`set_pattern_caching_enabled`] take precedence afterwards.
pub fn is_pattern_caching_enabled() -> bool {
    check_env();
    PATTERN_CACHING_ENABLED.load(Ordering::SeqCst)
}

/// Enable or disable pattern caching globally at runtime
pub fn set_pattern_caching_enabled(enabled: bool) {
    check_env();
    PATTERN_CACHING_ENABLED.store(enabled, Ordering::SeqCst);
    log::debug!(
        "Pattern caching {} via runtime call",
        if enabled { "enabled" } else { "disabled" }
    );
}
