//! Recovery domain - degraded-mode mitigation

mod recovery_action;

pub use recovery_action::RecoveryAction;

/// Smallest memory size the platform accepts
pub const MIN_MEMORY_MB: u32 = 64;

/// Memory granularity used when toggling the configuration
pub const MEMORY_STEP_MB: u32 = 64;
