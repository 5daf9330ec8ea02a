/// Runtime configuration for Tab Warden

/// Stale-tab age threshold: 24 hours in milliseconds.
pub const DEFAULT_STALE_THRESHOLD_MILLIS: f64 = 86_400_000.0;

/// Upper bound on a single host call before the action gives up.
pub const DEFAULT_HOST_TIMEOUT_MILLIS: i32 = 10_000;

/// Tunables for the tab actions. Nothing is persisted; callers construct one
/// and hand it to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct WardenConfig {
    pub stale_threshold_millis: f64,
    pub host_timeout_millis: i32,
}

impl Default for WardenConfig {
    fn default() -> Self {
        WardenConfig {
            stale_threshold_millis: DEFAULT_STALE_THRESHOLD_MILLIS,
            host_timeout_millis: DEFAULT_HOST_TIMEOUT_MILLIS,
        }
    }
}
