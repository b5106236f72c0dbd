//! Create handler.

use tracing::info;

use crate::api::MemoryDb;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::stabilize::{PollOutcome, StabilizeMode, poll_once};
use crate::tags::merged_tags;

use super::context::{CallbackContext, OperationStage};
use super::progress::ProgressEvent;
use super::request::ResourceHandlerRequest;

/// Creates the resource, then stabilizes it one poll per invocation.
pub async fn handle_create<R: Resource>(
    api: &dyn MemoryDb,
    request: &ResourceHandlerRequest<R::Model>,
    mut context: CallbackContext,
) -> Result<ProgressEvent<R::Model>> {
    let desired = request.desired_state()?;
    let identifier = R::identifier(desired)?;

    match context.stage {
        OperationStage::Begin => {
            R::validate(desired)?;
            let tags = merged_tags(
                request.desired_resource_tags.as_ref(),
                R::resource_tags(desired),
            );
            info!("Creating {} {identifier}", R::TYPE_NAME);
            R::create(api, desired, &tags).await?;

            context.stage = OperationStage::StabilizeCreate;
            Ok(ProgressEvent::in_progress(desired.clone(), context))
        }
        OperationStage::StabilizeCreate => {
            context.consume_poll(R::TYPE_NAME, identifier)?;
            match poll_once::<R>(api, identifier, StabilizeMode::UntilStable).await? {
                PollOutcome::Stable(described) => {
                    info!("{} {identifier} created and stable", R::TYPE_NAME);
                    Ok(ProgressEvent::success(described.model))
                }
                PollOutcome::NotStable(_) => {
                    Ok(ProgressEvent::in_progress(desired.clone(), context))
                }
                PollOutcome::Gone => Err(ProviderError::internal(
                    "gone outcome while waiting for stability",
                )),
            }
        }
        other => Err(ProviderError::internal(format!(
            "create resumed at foreign stage {other:?}"
        ))),
    }
}
