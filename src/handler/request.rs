//! Handler invocation payload.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::tags::TagMap;

/// One handler invocation as delivered by the provisioning orchestrator.
///
/// Stack-level tags travel outside the model in the two `*ResourceTags`
/// maps; resource-level tags travel inside the model itself. The handlers
/// merge both views before reconciling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceHandlerRequest<M> {
    /// Idempotency token for this operation.
    pub client_request_token: Option<String>,
    /// The state the caller wants the resource to reach.
    pub desired_resource_state: Option<M>,
    /// The state recorded after the last successful operation.
    pub previous_resource_state: Option<M>,
    /// Desired stack-level tags.
    pub desired_resource_tags: Option<TagMap>,
    /// Previously applied stack-level tags.
    pub previous_resource_tags: Option<TagMap>,
    /// Pagination token for list operations.
    pub next_token: Option<String>,
    /// Logical identifier assigned by the orchestrator.
    pub logical_resource_identifier: Option<String>,
}

impl<M> Default for ResourceHandlerRequest<M> {
    fn default() -> Self {
        Self {
            client_request_token: None,
            desired_resource_state: None,
            previous_resource_state: None,
            desired_resource_tags: None,
            previous_resource_tags: None,
            next_token: None,
            logical_resource_identifier: None,
        }
    }
}

impl<M> ResourceHandlerRequest<M> {
    /// Returns the desired resource state.
    ///
    /// # Errors
    ///
    /// Returns a model error if the request carries no desired state.
    pub fn desired_state(&self) -> Result<&M> {
        self.desired_resource_state
            .as_ref()
            .ok_or_else(|| ModelError::MissingState { which: "desired" }.into())
    }

    /// Returns the previous resource state.
    ///
    /// # Errors
    ///
    /// Returns a model error if the request carries no previous state.
    pub fn previous_state(&self) -> Result<&M> {
        self.previous_resource_state
            .as_ref()
            .ok_or_else(|| ModelError::MissingState { which: "previous" }.into())
    }
}
