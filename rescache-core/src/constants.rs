//! Configuration defaults for RESCACHE.

// ═══════════════════════════════════════════════════════════════════════════════
// FRESHNESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default freshness window in milliseconds.
/// Entries at least this old are refreshed on their next lookup.
pub const DEFAULT_FRESHNESS_WINDOW_MS: u64 = 10_000;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable overriding the freshness window (milliseconds).
pub const FRESHNESS_WINDOW_ENV: &str = "RESCACHE_FRESHNESS_WINDOW_MS";

/// Message attached to a resource whose computation went away without settling.
pub const DROPPED_COMPUTATION_MESSAGE: &str = "computation dropped before settling";
