//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Generation loop constants
pub mod generation {
    /// Total model calls per request: the first attempt plus one hinted retry
    pub const MAX_ATTEMPTS: u8 = 2;

    /// Raw validation messages carried into a retry hint
    pub const HINT_MAX_ERRORS: usize = 5;

    /// Length of the variation seed appended to user prompts
    pub const VARIATION_SEED_LEN: usize = 8;
}

/// Drill field limits
pub mod drill {
    pub const TITLE_MAX_CHARS: usize = 60;
    pub const GOAL_MAX_CHARS: usize = 150;

    pub const MIN_TIME_MINUTES: i64 = 5;
    pub const MAX_TIME_MINUTES: i64 = 60;
    pub const DEFAULT_TIME_MINUTES: i64 = 20;

    pub const MIN_SETUP_STEPS: usize = 2;
    pub const MIN_RULES: usize = 2;

    pub const MAX_ATTEMPTS_PER_DRILL: i64 = 100;
    pub const MAX_SHOTS_PER_STATION: i64 = 50;
    pub const MAX_RETRY_ATTEMPTS: i64 = 50;

    /// Used when the caller leaves the goal blank
    pub const DEFAULT_GOAL: &str = "Improve overall consistency";
}

/// Network constants
pub mod network {
    /// Default timeout for a single model call (seconds)
    pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

    /// Default timeout for auth verification calls (seconds)
    pub const AUTH_TIMEOUT_SECS: u64 = 10;

    /// Timeout for the provider health check run by `drillsmith check` (seconds)
    pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 15;

    pub const DEFAULT_PORT: u16 = 8787;
}

/// Storage constants
pub mod storage {
    pub const DEFAULT_DATABASE_PATH: &str = "drillsmith.db";
}
