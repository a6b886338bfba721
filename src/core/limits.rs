/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide defaults and thresholds.
 * Grouped by domain (memory, scheduling, events).
 */

use std::time::Duration;

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Default simulated memory pool (1000 bytes)
/// Used as default capacity for the memory manager
pub const DEFAULT_MEMORY_POOL: usize = 1000;

/// Usage ratio reported as medium pressure
pub const MEMORY_MEDIUM_THRESHOLD: f64 = 0.60;

/// Usage ratio reported as high pressure
pub const MEMORY_WARNING_THRESHOLD: f64 = 0.80;

/// Usage ratio reported as critical pressure
pub const MEMORY_CRITICAL_THRESHOLD: f64 = 0.95;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Wall-clock interval between ticks when driven by a timer
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest accepted tick interval
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Longest accepted tick interval
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on ticks the runner executes before giving up
pub const DEFAULT_MAX_TICKS: u64 = 10_000;

// =============================================================================
// EVENTS
// =============================================================================

/// Per-subscriber channel capacity. Events past this are dropped for that
/// subscriber and counted in the stream stats.
pub const SUBSCRIBER_CHANNEL_CAPACITY: usize = 4096;
