//! CRUDL handlers.
//!
//! The five operation handlers are generic over [`Resource`]; this module
//! adds the type-erased entry point the CLI drives: pick a resource type,
//! deserialize the request and callback context, run the action, and map
//! any error onto a terminal failed event.

mod context;
mod create;
mod delete;
mod list;
mod progress;
mod read;
mod request;
mod update;

pub use context::{
    CallbackContext, DEFAULT_CALLBACK_DELAY_SECS, MAX_STABILIZATION_POLLS, OperationStage,
};
pub use create::handle_create;
pub use delete::handle_delete;
pub use list::handle_list;
pub use progress::{OperationStatus, ProgressEvent};
pub use read::handle_read;
pub use request::ResourceHandlerRequest;
pub use update::handle_update;

use clap::ValueEnum;
use serde_json::Value;
use tracing::warn;

use crate::api::MemoryDb;
use crate::error::Result;
use crate::resource::{AclResource, ClusterResource, Resource, SubnetGroupResource, UserResource};

/// The MemoryDB sub-resource types this provider manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    /// Access control list.
    Acl,
    /// Cluster.
    Cluster,
    /// Subnet group.
    SubnetGroup,
    /// User.
    User,
}

/// The handler operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Create the resource.
    Create,
    /// Read the live resource state.
    Read,
    /// Reconcile the resource toward the desired state.
    Update,
    /// Delete the resource.
    Delete,
    /// List resources of this type.
    List,
}

/// Runs one handler invocation against JSON payloads.
///
/// Handler errors become terminal failed events; only malformed input
/// payloads surface as hard errors.
///
/// # Errors
///
/// Returns an error if the request or context payload does not deserialize.
pub async fn dispatch(
    api: &dyn MemoryDb,
    kind: ResourceKind,
    action: Action,
    request: Value,
    context: Option<Value>,
) -> Result<Value> {
    match kind {
        ResourceKind::Acl => invoke::<AclResource>(api, action, request, context).await,
        ResourceKind::Cluster => invoke::<ClusterResource>(api, action, request, context).await,
        ResourceKind::SubnetGroup => {
            invoke::<SubnetGroupResource>(api, action, request, context).await
        }
        ResourceKind::User => invoke::<UserResource>(api, action, request, context).await,
    }
}

async fn invoke<R: Resource>(
    api: &dyn MemoryDb,
    action: Action,
    request: Value,
    context: Option<Value>,
) -> Result<Value> {
    let request: ResourceHandlerRequest<R::Model> = serde_json::from_value(request)?;
    let context: CallbackContext = match context {
        Some(value) => serde_json::from_value(value)?,
        None => CallbackContext::default(),
    };

    let outcome = match action {
        Action::Create => handle_create::<R>(api, &request, context).await,
        Action::Read => handle_read::<R>(api, &request).await,
        Action::Update => handle_update::<R>(api, &request, context).await,
        Action::Delete => handle_delete::<R>(api, &request, context).await,
        Action::List => handle_list::<R>(api, &request).await,
    };

    let event = match outcome {
        Ok(event) => event,
        Err(err) => {
            warn!("{} {action:?} failed: {err}", R::TYPE_NAME);
            ProgressEvent::failed(&err)
        }
    };
    Ok(serde_json::to_value(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMemoryDb;
    use crate::error::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_handler_error_becomes_failed_event() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user()
            .times(1)
            .returning(|_| Err(ApiError::not_found("User", "test-user").into()));

        let request = json!({"desiredResourceState": {"UserName": "test-user"}});
        let value = dispatch(&api, ResourceKind::User, Action::Read, request, None)
            .await
            .unwrap();

        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["errorCode"], "NotFound");
    }

    #[tokio::test]
    async fn test_missing_previous_state_fails_as_invalid_request() {
        let api = MockMemoryDb::new();
        let request = json!({"desiredResourceState": {"ACLName": "test-acl"}});
        let value = dispatch(&api, ResourceKind::Acl, Action::Update, request, None)
            .await
            .unwrap();

        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["errorCode"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_context_round_trips_through_dispatch() {
        let mut api = MockMemoryDb::new();
        api.expect_create_subnet_group()
            .times(1)
            .returning(|_, _| Ok(()));

        let request = json!({
            "desiredResourceState": {
                "SubnetGroupName": "test-subnet-group",
                "SubnetIds": ["subnet-a"]
            }
        });
        let value = dispatch(
            &api,
            ResourceKind::SubnetGroup,
            Action::Create,
            request,
            None,
        )
        .await
        .unwrap();

        assert_eq!(value["status"], "IN_PROGRESS");
        assert_eq!(value["callbackContext"]["stage"], "stabilize_create");
    }
}
