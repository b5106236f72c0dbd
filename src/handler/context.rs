//! Serialized handler state carried between invocations.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StabilizeError};

/// Upper bound on stabilization polls for one operation.
///
/// At the default callback delay this allows ten minutes of settling,
/// which covers cluster shard reconfiguration with margin.
pub const MAX_STABILIZATION_POLLS: u32 = 120;

/// Delay the orchestrator should wait before re-invoking, in seconds.
pub const DEFAULT_CALLBACK_DELAY_SECS: u32 = 5;

/// Where a multi-invocation operation left off.
///
/// The context is serialized into the progress event and handed back
/// verbatim on the next invocation, so every field must round-trip
/// through JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallbackContext {
    /// The stage to resume at.
    pub stage: OperationStage,
    /// Resource ARN resolved earlier in the operation, cached so later
    /// stages skip the describe.
    pub resolved_arn: Option<String>,
    /// Stabilization polls consumed so far by this operation.
    pub polls_used: u32,
}

/// Stages of the multi-invocation operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStage {
    /// First invocation; no remote call issued yet.
    #[default]
    Begin,
    /// Waiting for a created resource to become stable.
    StabilizeCreate,
    /// Waiting for a core-attribute update to settle.
    StabilizeCore,
    /// Apply the tag additions.
    AddTags,
    /// Waiting for the resource to settle after tag additions.
    StabilizeAddTags,
    /// Apply the tag removals.
    RemoveTags,
    /// Waiting for the resource to settle after tag removals.
    StabilizeRemoveTags,
    /// Refresh the model from the service and succeed.
    FinalRead,
    /// Waiting for a deleted resource to disappear.
    StabilizeDelete,
}

impl CallbackContext {
    /// Creates a context positioned at the given stage.
    #[must_use]
    pub fn at_stage(stage: OperationStage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    /// Accounts for one stabilization poll.
    ///
    /// # Errors
    ///
    /// Returns a stabilization timeout once the poll budget is exhausted.
    pub fn consume_poll(&mut self, type_name: &'static str, identifier: &str) -> Result<()> {
        if self.polls_used >= MAX_STABILIZATION_POLLS {
            return Err(StabilizeError::Timeout {
                type_name,
                identifier: identifier.to_string(),
                attempts: self.polls_used,
            }
            .into());
        }
        self.polls_used += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_context_round_trips_through_json() {
        let context = CallbackContext {
            stage: OperationStage::StabilizeAddTags,
            resolved_arn: Some(String::from("arn:aws:memorydb:us-east-1:123:user/u")),
            polls_used: 7,
        };

        let json = serde_json::to_string(&context).unwrap();
        let restored: CallbackContext = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, context);
    }

    #[test]
    fn test_empty_context_defaults_to_begin() {
        let context: CallbackContext = serde_json::from_str("{}").unwrap();
        assert_eq!(context.stage, OperationStage::Begin);
        assert_eq!(context.polls_used, 0);
    }

    #[test]
    fn test_poll_budget_exhaustion_is_a_timeout() {
        let mut context = CallbackContext {
            polls_used: MAX_STABILIZATION_POLLS,
            ..CallbackContext::default()
        };

        let result = context.consume_poll("Cluster", "cache-1");
        assert!(matches!(
            result,
            Err(ProviderError::Stabilize(StabilizeError::Timeout {
                attempts: MAX_STABILIZATION_POLLS,
                ..
            }))
        ));
    }

    #[test]
    fn test_polls_accumulate() {
        let mut context = CallbackContext::default();
        context.consume_poll("User", "u").unwrap();
        context.consume_poll("User", "u").unwrap();
        assert_eq!(context.polls_used, 2);
    }
}
