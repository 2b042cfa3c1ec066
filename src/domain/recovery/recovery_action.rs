//! Forced cold restart through a double memory reconfiguration

use tracing::{info, warn};

use crate::domain::interfaces::{ComputeController, InvocationContext};
use crate::shared::errors::RecoveryError;
use super::{MEMORY_STEP_MB, MIN_MEMORY_MB};

/// Makes the platform discard the warm execution environment.
///
/// There is no restart primitive, but any configuration change retires the
/// running instances. The memory size is moved one step and then restored,
/// so the function ends up with its original configuration.
pub struct RecoveryAction;

impl RecoveryAction {
    /// Memory size used for the intermediate reconfiguration
    pub fn alternate_memory_mb(current_mb: u32) -> u32 {
        if current_mb <= MIN_MEMORY_MB {
            MIN_MEMORY_MB + MEMORY_STEP_MB
        } else {
            current_mb - MEMORY_STEP_MB
        }
    }

    pub async fn force_cold_restart(
        controller: &dyn ComputeController,
        context: &InvocationContext,
    ) -> Result<(), RecoveryError> {
        let original = context.memory_limit_mb;
        let alternate = Self::alternate_memory_mb(original);

        info!("Forcing the next invocation to be a cold start.");

        controller
            .update_memory_size(&context.function_name, alternate)
            .await
            .map_err(|source| RecoveryError::StepFailed {
                memory_mb: alternate,
                source,
            })?;

        if let Err(source) = controller
            .update_memory_size(&context.function_name, original)
            .await
        {
            warn!(
                "⚠️ {} left at {} MB after failed restore",
                context.function_name, alternate
            );
            return Err(RecoveryError::RestoreFailed {
                memory_mb: original,
                source,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use crate::shared::errors::ComputeError;

    #[derive(Default)]
    struct RecordingController {
        calls: Mutex<Vec<(String, u32)>>,
        fail_on_call: Option<usize>,
    }

    #[async_trait]
    impl ComputeController for RecordingController {
        async fn update_memory_size(&self, function_name: &str, memory_mb: u32) -> Result<(), ComputeError> {
            let mut calls = self.calls.lock().await;
            calls.push((function_name.to_string(), memory_mb));
            if self.fail_on_call == Some(calls.len()) {
                return Err(ComputeError::UpdateFailed("throttled".to_string()));
            }
            Ok(())
        }
    }

    fn context(memory_limit_mb: u32) -> InvocationContext {
        InvocationContext {
            function_name: "checkPrices".to_string(),
            memory_limit_mb,
        }
    }

    #[test]
    fn test_alternate_memory() {
        assert_eq!(RecoveryAction::alternate_memory_mb(64), 128);
        assert_eq!(RecoveryAction::alternate_memory_mb(128), 64);
        assert_eq!(RecoveryAction::alternate_memory_mb(512), 448);
    }

    #[tokio::test]
    async fn test_steps_down_then_restores() {
        let controller = RecordingController::default();

        RecoveryAction::force_cold_restart(&controller, &context(256)).await.unwrap();

        let calls = controller.calls.lock().await;
        assert_eq!(
            *calls,
            vec![("checkPrices".to_string(), 192), ("checkPrices".to_string(), 256)]
        );
    }

    #[tokio::test]
    async fn test_steps_up_from_minimum() {
        let controller = RecordingController::default();

        RecoveryAction::force_cold_restart(&controller, &context(64)).await.unwrap();

        let calls = controller.calls.lock().await;
        let sizes: Vec<u32> = calls.iter().map(|(_, mb)| *mb).collect();
        assert_eq!(sizes, vec![128, 64]);
    }

    #[tokio::test]
    async fn test_first_failure_skips_restore() {
        let controller = RecordingController {
            fail_on_call: Some(1),
            ..Default::default()
        };

        let err = RecoveryAction::force_cold_restart(&controller, &context(128))
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::StepFailed { memory_mb: 64, .. }));
        assert_eq!(controller.calls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_failure_reported() {
        let controller = RecordingController {
            fail_on_call: Some(2),
            ..Default::default()
        };

        let err = RecoveryAction::force_cold_restart(&controller, &context(128))
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::RestoreFailed { memory_mb: 128, .. }));
    }
}
