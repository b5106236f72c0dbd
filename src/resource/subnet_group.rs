//! Subnet group resource provider.
//!
//! Subnet groups have no asynchronous lifecycle: the service applies
//! mutations synchronously and reports no status field, so the stability
//! predicate always holds and stabilization completes on the first poll.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::{MemoryDb, Page, SubnetGroupDescription};
use crate::error::{ModelError, Result};
use crate::stabilize::ResourceHandle;
use crate::tags::{Tag, TagMap};

use super::{Described, Resource, STATUS_ACTIVE, is_modified, unordered_modified, validation_error};

/// Declared model for a MemoryDB subnet group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubnetGroupModel {
    /// Subnet group name (primary identifier).
    #[validate(length(min = 1))]
    pub subnet_group_name: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Member subnet identifiers.
    pub subnet_ids: Option<Vec<String>>,
    /// Subnet group ARN (read-only, resolved on demand for tagging calls).
    #[serde(rename = "ARN")]
    pub arn: Option<String>,
    /// Resource-level tags.
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
}

/// Provider for the subnet group resource type.
#[derive(Debug)]
pub struct SubnetGroupResource;

#[async_trait]
impl Resource for SubnetGroupResource {
    type Model = SubnetGroupModel;

    const TYPE_NAME: &'static str = "SubnetGroup";

    fn identifier(model: &Self::Model) -> Result<&str> {
        model.subnet_group_name.as_deref().ok_or_else(|| {
            ModelError::MissingIdentifier {
                type_name: Self::TYPE_NAME,
            }
            .into()
        })
    }

    fn arn(model: &Self::Model) -> Option<&str> {
        model.arn.as_deref()
    }

    fn resource_tags(model: &Self::Model) -> Option<&[Tag]> {
        model.tags.as_deref()
    }

    fn attach_tags(model: &mut Self::Model, tags: Vec<Tag>) {
        model.tags = if tags.is_empty() { None } else { Some(tags) };
    }

    fn validate(model: &Self::Model) -> Result<()> {
        Validate::validate(model).map_err(|e| validation_error(Self::TYPE_NAME, &e))
    }

    fn has_core_changes(desired: &Self::Model, previous: &Self::Model) -> bool {
        is_modified(
            desired.description.as_deref(),
            previous.description.as_deref(),
        ) || unordered_modified(desired.subnet_ids.as_deref(), previous.subnet_ids.as_deref())
    }

    // Subnet group mutations are synchronous.
    fn is_stable(_handle: &ResourceHandle) -> bool {
        true
    }

    fn is_failed(_handle: &ResourceHandle) -> bool {
        false
    }

    async fn create(api: &dyn MemoryDb, model: &Self::Model, tags: &TagMap) -> Result<()> {
        api.create_subnet_group(model, tags).await
    }

    async fn update_core(
        api: &dyn MemoryDb,
        desired: &Self::Model,
        _previous: &Self::Model,
    ) -> Result<()> {
        api.update_subnet_group(desired).await
    }

    async fn delete(api: &dyn MemoryDb, identifier: &str) -> Result<()> {
        api.delete_subnet_group(identifier).await
    }

    async fn describe(api: &dyn MemoryDb, identifier: &str) -> Result<Described<Self::Model>> {
        let description = api.describe_subnet_group(identifier).await?;
        Ok(described_from(description))
    }

    async fn list(api: &dyn MemoryDb, next_token: Option<&str>) -> Result<Page<Self::Model>> {
        let page = api.list_subnet_groups(next_token.map(String::from)).await?;
        Ok(Page {
            items: page.items.into_iter().map(model_from).collect(),
            next_token: page.next_token,
        })
    }
}

fn described_from(description: SubnetGroupDescription) -> Described<SubnetGroupModel> {
    let handle = ResourceHandle {
        identifier: description.name.clone(),
        arn: description.arn.clone(),
        status: String::from(STATUS_ACTIVE),
    };
    Described {
        model: model_from(description),
        handle,
    }
}

fn model_from(description: SubnetGroupDescription) -> SubnetGroupModel {
    SubnetGroupModel {
        subnet_group_name: Some(description.name),
        description: description.description,
        subnet_ids: Some(description.subnet_ids),
        arn: description.arn,
        tags: None,
    }
}
