//! Progress events returned to the provisioning orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::{HandlerErrorCode, ProviderError};

use super::context::{CallbackContext, DEFAULT_CALLBACK_DELAY_SECS};

/// Operation status reported in a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation needs another invocation to make progress.
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    /// The operation completed.
    #[serde(rename = "SUCCESS")]
    Success,
    /// The operation failed terminally.
    #[serde(rename = "FAILED")]
    Failed,
}

/// Outcome of one handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent<M> {
    /// Operation status.
    pub status: OperationStatus,
    /// Resource model, for single-resource operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<M>,
    /// Resource models, for list operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<M>>,
    /// Pagination token, for list operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// State to hand back on the next invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,
    /// Seconds the orchestrator should wait before re-invoking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_delay_seconds: Option<u32>,
    /// Error code, when the operation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<M> ProgressEvent<M> {
    fn base(status: OperationStatus) -> Self {
        Self {
            status,
            resource_model: None,
            resource_models: None,
            next_token: None,
            callback_context: None,
            callback_delay_seconds: None,
            error_code: None,
            message: None,
        }
    }

    /// An in-progress event that resumes at `context` after the default delay.
    #[must_use]
    pub fn in_progress(model: M, context: CallbackContext) -> Self {
        Self {
            resource_model: Some(model),
            callback_context: Some(context),
            callback_delay_seconds: Some(DEFAULT_CALLBACK_DELAY_SECS),
            ..Self::base(OperationStatus::InProgress)
        }
    }

    /// A terminal success carrying the refreshed model.
    #[must_use]
    pub fn success(model: M) -> Self {
        Self {
            resource_model: Some(model),
            ..Self::base(OperationStatus::Success)
        }
    }

    /// A terminal success for a list operation.
    #[must_use]
    pub fn success_list(models: Vec<M>, next_token: Option<String>) -> Self {
        Self {
            resource_models: Some(models),
            next_token,
            ..Self::base(OperationStatus::Success)
        }
    }

    /// A terminal success for a completed delete; carries no model.
    #[must_use]
    pub fn success_deleted() -> Self {
        Self::base(OperationStatus::Success)
    }

    /// A terminal failure mapped from a provider error.
    #[must_use]
    pub fn failed(err: &ProviderError) -> Self {
        Self {
            error_code: Some(err.error_code()),
            message: Some(err.to_string()),
            ..Self::base(OperationStatus::Failed)
        }
    }

    /// Returns true if no further invocation is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self.status, OperationStatus::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::handler::context::OperationStage;
    use crate::resource::UserModel;

    #[test]
    fn test_failed_event_carries_code_and_message() {
        let err = ProviderError::Api(ApiError::not_found("User", "test-user"));
        let event = ProgressEvent::<UserModel>::failed(&err);

        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
        assert!(event.message.unwrap().contains("test-user"));
        assert!(event.resource_model.is_none());
    }

    #[test]
    fn test_in_progress_event_serializes_status_and_context() {
        let context = CallbackContext::at_stage(OperationStage::StabilizeCreate);
        let event = ProgressEvent::in_progress(UserModel::default(), context);
        assert!(!event.is_terminal());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["status"], "IN_PROGRESS");
        assert_eq!(value["callbackContext"]["stage"], "stabilize_create");
        assert_eq!(
            value["callbackDelaySeconds"],
            u64::from(DEFAULT_CALLBACK_DELAY_SECS)
        );
    }

    #[test]
    fn test_deleted_success_has_no_model() {
        let event = ProgressEvent::<UserModel>::success_deleted();
        assert!(event.is_terminal());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["status"], "SUCCESS");
        assert!(value.get("resourceModel").is_none());
    }
}
