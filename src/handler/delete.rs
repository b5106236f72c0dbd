//! Delete handler.

use tracing::info;

use crate::api::MemoryDb;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::stabilize::{PollOutcome, StabilizeMode, poll_once};

use super::context::{CallbackContext, OperationStage};
use super::progress::ProgressEvent;
use super::request::ResourceHandlerRequest;

/// Deletes the resource, then polls until the service stops reporting it.
///
/// A delete of a resource that never existed fails with not-found; the
/// same signal arriving during stabilization is the success condition.
pub async fn handle_delete<R: Resource>(
    api: &dyn MemoryDb,
    request: &ResourceHandlerRequest<R::Model>,
    mut context: CallbackContext,
) -> Result<ProgressEvent<R::Model>> {
    let desired = request.desired_state()?;
    let identifier = R::identifier(desired)?;

    match context.stage {
        OperationStage::Begin => {
            info!("Deleting {} {identifier}", R::TYPE_NAME);
            R::delete(api, identifier).await?;

            context.stage = OperationStage::StabilizeDelete;
            Ok(ProgressEvent::in_progress(desired.clone(), context))
        }
        OperationStage::StabilizeDelete => {
            context.consume_poll(R::TYPE_NAME, identifier)?;
            match poll_once::<R>(api, identifier, StabilizeMode::UntilGone).await? {
                PollOutcome::Gone => {
                    info!("{} {identifier} deleted", R::TYPE_NAME);
                    Ok(ProgressEvent::success_deleted())
                }
                PollOutcome::NotStable(_) => {
                    Ok(ProgressEvent::in_progress(desired.clone(), context))
                }
                PollOutcome::Stable(_) => Err(ProviderError::internal(
                    "stable outcome while waiting for deletion",
                )),
            }
        }
        other => Err(ProviderError::internal(format!(
            "delete resumed at foreign stage {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMemoryDb, UserDescription};
    use crate::error::{ApiError, HandlerErrorCode};
    use crate::handler::progress::{OperationStatus, ProgressEvent};
    use crate::resource::{UserModel, UserResource};

    fn delete_request() -> ResourceHandlerRequest<UserModel> {
        ResourceHandlerRequest {
            desired_resource_state: Some(UserModel {
                user_name: Some(String::from("test-user")),
                ..UserModel::default()
            }),
            ..ResourceHandlerRequest::default()
        }
    }

    #[tokio::test]
    async fn test_first_invocation_deletes_and_defers() {
        let mut api = MockMemoryDb::new();
        api.expect_delete_user().times(1).returning(|_| Ok(()));

        let event =
            handle_delete::<UserResource>(&api, &delete_request(), CallbackContext::default())
                .await
                .unwrap();

        assert_eq!(event.status, OperationStatus::InProgress);
        assert_eq!(
            event.callback_context.unwrap().stage,
            OperationStage::StabilizeDelete
        );
    }

    #[tokio::test]
    async fn test_delete_of_missing_resource_fails_not_found() {
        let mut api = MockMemoryDb::new();
        api.expect_delete_user()
            .times(1)
            .returning(|_| Err(ApiError::not_found("User", "test-user").into()));

        let err =
            handle_delete::<UserResource>(&api, &delete_request(), CallbackContext::default())
                .await
                .unwrap_err();

        let event = ProgressEvent::<UserModel>::failed(&err);
        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
    }

    #[tokio::test]
    async fn test_stabilize_succeeds_once_resource_is_gone() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user()
            .times(1)
            .returning(|_| Err(ApiError::not_found("User", "test-user").into()));

        let context = CallbackContext::at_stage(OperationStage::StabilizeDelete);
        let event = handle_delete::<UserResource>(&api, &delete_request(), context)
            .await
            .unwrap();

        assert_eq!(event.status, OperationStatus::Success);
        assert!(event.resource_model.is_none());
    }

    #[tokio::test]
    async fn test_stabilize_defers_while_still_deleting() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user().times(1).returning(|_| {
            Ok(UserDescription {
                name: String::from("test-user"),
                status: Some(String::from("deleting")),
                arn: None,
                access_string: None,
                authentication_type: None,
            })
        });

        let context = CallbackContext::at_stage(OperationStage::StabilizeDelete);
        let event = handle_delete::<UserResource>(&api, &delete_request(), context)
            .await
            .unwrap();

        assert_eq!(event.status, OperationStatus::InProgress);
        assert_eq!(event.callback_context.unwrap().polls_used, 1);
    }
}
