//! Read handler.

use tracing::debug;

use crate::api::MemoryDb;
use crate::error::Result;
use crate::resource::Resource;
use crate::tags::tag_list;

use super::progress::ProgressEvent;
use super::request::ResourceHandlerRequest;

/// Reads the live resource and its attached tags.
pub async fn handle_read<R: Resource>(
    api: &dyn MemoryDb,
    request: &ResourceHandlerRequest<R::Model>,
) -> Result<ProgressEvent<R::Model>> {
    let desired = request.desired_state()?;
    let identifier = R::identifier(desired)?;
    debug!("Reading {} {identifier}", R::TYPE_NAME);

    let described = R::describe(api, identifier).await?;
    let mut model = described.model;
    if let Some(arn) = described.handle.arn.as_deref() {
        let tags = api.list_tags(arn).await?;
        R::attach_tags(&mut model, tag_list(&tags));
    }

    Ok(ProgressEvent::success(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMemoryDb, UserDescription};
    use crate::error::{ApiError, ProviderError};
    use crate::handler::progress::OperationStatus;
    use crate::resource::{UserModel, UserResource};

    fn read_request() -> ResourceHandlerRequest<UserModel> {
        ResourceHandlerRequest {
            desired_resource_state: Some(UserModel {
                user_name: Some(String::from("test-user")),
                ..UserModel::default()
            }),
            ..ResourceHandlerRequest::default()
        }
    }

    #[tokio::test]
    async fn test_read_attaches_live_tags() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user().times(1).returning(|_| {
            Ok(UserDescription {
                name: String::from("test-user"),
                status: Some(String::from("active")),
                arn: Some(String::from("arn:aws:memorydb:us-east-1:123:user/test-user")),
                access_string: Some(String::from("on ~* +@all")),
                authentication_type: Some(String::from("password")),
            })
        });
        api.expect_list_tags().times(1).returning(|_| {
            Ok([(String::from("env"), String::from("prod"))]
                .into_iter()
                .collect())
        });

        let event = handle_read::<UserResource>(&api, &read_request())
            .await
            .unwrap();

        assert_eq!(event.status, OperationStatus::Success);
        let model = event.resource_model.unwrap();
        assert_eq!(model.user_name.as_deref(), Some("test-user"));
        let tags = model.tags.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].key, "env");
    }

    #[tokio::test]
    async fn test_read_of_missing_resource_propagates_not_found() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user()
            .times(1)
            .returning(|_| Err(ApiError::not_found("User", "test-user").into()));

        let result = handle_read::<UserResource>(&api, &read_request()).await;
        assert!(matches!(
            result,
            Err(ProviderError::Api(ApiError::NotFound { .. }))
        ));
    }
}
