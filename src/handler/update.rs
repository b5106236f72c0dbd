//! Update handler.
//!
//! An update runs as a staged pipeline: core-attribute changes first, tag
//! additions second, tag removals third, then a final read of the settled
//! resource. Each remote mutation and each stabilization poll ends the
//! current invocation with an in-progress event; stage transitions that
//! need no remote call fall through within the same invocation.
//!
//! Tag calls address the resource by ARN. The models only carry an ARN
//! after a read, so the handler resolves it lazily with a describe when
//! neither the context cache nor the desired model has one.

use tracing::{debug, info};

use crate::api::MemoryDb;
use crate::error::{ApiError, ProviderError, Result};
use crate::resource::Resource;
use crate::stabilize::{PollOutcome, StabilizeMode, poll_once};
use crate::tags::{TagDelta, merged_tags, tag_list};

use super::context::{CallbackContext, OperationStage};
use super::progress::ProgressEvent;
use super::request::ResourceHandlerRequest;

/// Applies core and tag changes, stabilizing after each mutation.
pub async fn handle_update<R: Resource>(
    api: &dyn MemoryDb,
    request: &ResourceHandlerRequest<R::Model>,
    mut context: CallbackContext,
) -> Result<ProgressEvent<R::Model>> {
    let desired = request.desired_state()?;
    let previous = request.previous_state()?;
    R::validate(desired)?;
    let identifier = R::identifier(desired)?;

    let previous_tags = merged_tags(
        request.previous_resource_tags.as_ref(),
        R::resource_tags(previous),
    );
    let desired_tags = merged_tags(
        request.desired_resource_tags.as_ref(),
        R::resource_tags(desired),
    );
    let delta = TagDelta::between(&previous_tags, &desired_tags);

    loop {
        match context.stage {
            OperationStage::Begin => {
                if R::has_core_changes(desired, previous) {
                    info!("Updating {} {identifier} core attributes", R::TYPE_NAME);
                    R::update_core(api, desired, previous).await?;
                    context.stage = OperationStage::StabilizeCore;
                    return Ok(ProgressEvent::in_progress(desired.clone(), context));
                }
                debug!("{} {identifier} has no core changes", R::TYPE_NAME);
                context.stage = OperationStage::AddTags;
            }
            OperationStage::StabilizeCore => {
                context.consume_poll(R::TYPE_NAME, identifier)?;
                match poll_once::<R>(api, identifier, StabilizeMode::UntilStable).await? {
                    PollOutcome::Stable(_) => context.stage = OperationStage::AddTags,
                    PollOutcome::NotStable(_) => {
                        return Ok(ProgressEvent::in_progress(desired.clone(), context));
                    }
                    PollOutcome::Gone => {
                        return Err(ProviderError::internal(
                            "gone outcome while waiting for stability",
                        ));
                    }
                }
            }
            OperationStage::AddTags => {
                if delta.to_add.is_empty() {
                    context.stage = OperationStage::RemoveTags;
                    continue;
                }
                let arn = resolve_arn::<R>(api, desired, identifier, &mut context).await?;
                info!(
                    "Adding {} tags to {} {identifier}",
                    delta.to_add.len(),
                    R::TYPE_NAME
                );
                api.tag_resource(&arn, &delta.to_add).await?;
                context.stage = OperationStage::StabilizeAddTags;
                return Ok(ProgressEvent::in_progress(desired.clone(), context));
            }
            OperationStage::StabilizeAddTags => {
                context.consume_poll(R::TYPE_NAME, identifier)?;
                match poll_once::<R>(api, identifier, StabilizeMode::UntilStable).await? {
                    PollOutcome::Stable(_) => context.stage = OperationStage::RemoveTags,
                    PollOutcome::NotStable(_) => {
                        return Ok(ProgressEvent::in_progress(desired.clone(), context));
                    }
                    PollOutcome::Gone => {
                        return Err(ProviderError::internal(
                            "gone outcome while waiting for stability",
                        ));
                    }
                }
            }
            OperationStage::RemoveTags => {
                if delta.to_remove.is_empty() {
                    context.stage = OperationStage::FinalRead;
                    continue;
                }
                let arn = resolve_arn::<R>(api, desired, identifier, &mut context).await?;
                info!(
                    "Removing {} tags from {} {identifier}",
                    delta.to_remove.len(),
                    R::TYPE_NAME
                );
                api.untag_resource(&arn, &delta.to_remove).await?;
                context.stage = OperationStage::StabilizeRemoveTags;
                return Ok(ProgressEvent::in_progress(desired.clone(), context));
            }
            OperationStage::StabilizeRemoveTags => {
                context.consume_poll(R::TYPE_NAME, identifier)?;
                match poll_once::<R>(api, identifier, StabilizeMode::UntilStable).await? {
                    PollOutcome::Stable(_) => context.stage = OperationStage::FinalRead,
                    PollOutcome::NotStable(_) => {
                        return Ok(ProgressEvent::in_progress(desired.clone(), context));
                    }
                    PollOutcome::Gone => {
                        return Err(ProviderError::internal(
                            "gone outcome while waiting for stability",
                        ));
                    }
                }
            }
            OperationStage::FinalRead => {
                let described = R::describe(api, identifier).await?;
                let mut model = described.model;
                if let Some(arn) = described.handle.arn.as_deref() {
                    let live_tags = api.list_tags(arn).await?;
                    R::attach_tags(&mut model, tag_list(&live_tags));
                }
                info!("{} {identifier} update complete", R::TYPE_NAME);
                return Ok(ProgressEvent::success(model));
            }
            other => {
                return Err(ProviderError::internal(format!(
                    "update resumed at foreign stage {other:?}"
                )));
            }
        }
    }
}

/// Resolves the resource ARN for tagging calls.
///
/// Checks the context cache, then the desired model, and only then spends
/// a describe call; the result is cached on the context so later stages of
/// the same operation reuse it.
async fn resolve_arn<R: Resource>(
    api: &dyn MemoryDb,
    desired: &R::Model,
    identifier: &str,
    context: &mut CallbackContext,
) -> Result<String> {
    if let Some(arn) = context.resolved_arn.as_deref() {
        return Ok(arn.to_string());
    }
    let arn = match R::arn(desired) {
        Some(arn) => arn.to_string(),
        None => {
            debug!("Resolving ARN for {} {identifier}", R::TYPE_NAME);
            let described = R::describe(api, identifier).await?;
            described.handle.arn.ok_or_else(|| {
                ApiError::invalid_response("describe response carries no resource ARN")
            })?
        }
    };
    context.resolved_arn = Some(arn.clone());
    Ok(arn)
}
