//! List handler.

use tracing::debug;

use crate::api::MemoryDb;
use crate::error::Result;
use crate::resource::Resource;

use super::progress::ProgressEvent;
use super::request::ResourceHandlerRequest;

/// Lists one page of resources, threading the pagination token through.
pub async fn handle_list<R: Resource>(
    api: &dyn MemoryDb,
    request: &ResourceHandlerRequest<R::Model>,
) -> Result<ProgressEvent<R::Model>> {
    debug!("Listing {} resources", R::TYPE_NAME);
    let page = R::list(api, request.next_token.as_deref()).await?;
    Ok(ProgressEvent::success_list(page.items, page.next_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMemoryDb, Page, UserDescription};
    use crate::handler::progress::OperationStatus;
    use crate::resource::{UserModel, UserResource};

    #[tokio::test]
    async fn test_list_returns_models_and_token() {
        let mut api = MockMemoryDb::new();
        api.expect_list_users()
            .times(1)
            .withf(|token| token.as_deref() == Some("page-1"))
            .returning(|_| {
                Ok(Page {
                    items: vec![UserDescription {
                        name: String::from("test-user"),
                        status: Some(String::from("active")),
                        arn: None,
                        access_string: None,
                        authentication_type: None,
                    }],
                    next_token: Some(String::from("page-2")),
                })
            });

        let request = ResourceHandlerRequest::<UserModel> {
            next_token: Some(String::from("page-1")),
            ..ResourceHandlerRequest::default()
        };
        let event = handle_list::<UserResource>(&api, &request).await.unwrap();

        assert_eq!(event.status, OperationStatus::Success);
        assert_eq!(event.next_token.as_deref(), Some("page-2"));
        let models = event.resource_models.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].user_name.as_deref(), Some("test-user"));
    }
}
