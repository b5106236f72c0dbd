//! ACL resource provider.
//!
//! A MemoryDB ACL is a named set of member users. The core update is
//! itself a small reconciliation: the service takes add/remove member
//! deltas, so the provider computes the unordered set difference between
//! the previous and desired member lists.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::{AclDescription, MemoryDb, Page};
use crate::error::{ModelError, Result};
use crate::stabilize::ResourceHandle;
use crate::tags::{Tag, TagMap};

use super::{Described, Resource, unordered_modified, validation_error};

/// Declared model for a MemoryDB ACL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase", default)]
pub struct AclModel {
    /// ACL name (primary identifier).
    #[serde(rename = "ACLName")]
    #[validate(length(min = 1))]
    pub acl_name: Option<String>,
    /// Member user names.
    pub user_names: Option<Vec<String>>,
    /// Lifecycle status (read-only).
    pub status: Option<String>,
    /// ACL ARN (read-only, resolved on demand for tagging calls).
    pub arn: Option<String>,
    /// Resource-level tags.
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
}

/// Provider for the ACL resource type.
#[derive(Debug)]
pub struct AclResource;

impl AclModel {
    /// Computes the member add/remove deltas against a previous model.
    #[must_use]
    pub fn member_delta(&self, previous: &Self) -> (Vec<String>, Vec<String>) {
        let want: BTreeSet<&str> = self
            .user_names
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();
        let have: BTreeSet<&str> = previous
            .user_names
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();

        let to_add = want.difference(&have).map(ToString::to_string).collect();
        let to_remove = have.difference(&want).map(ToString::to_string).collect();
        (to_add, to_remove)
    }
}

#[async_trait]
impl Resource for AclResource {
    type Model = AclModel;

    const TYPE_NAME: &'static str = "Acl";

    fn identifier(model: &Self::Model) -> Result<&str> {
        model.acl_name.as_deref().ok_or_else(|| {
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
        unordered_modified(desired.user_names.as_deref(), previous.user_names.as_deref())
    }

    async fn create(api: &dyn MemoryDb, model: &Self::Model, tags: &TagMap) -> Result<()> {
        api.create_acl(model, tags).await
    }

    async fn update_core(
        api: &dyn MemoryDb,
        desired: &Self::Model,
        previous: &Self::Model,
    ) -> Result<()> {
        let (to_add, to_remove) = desired.member_delta(previous);
        api.update_acl(Self::identifier(desired)?, &to_add, &to_remove)
            .await
    }

    async fn delete(api: &dyn MemoryDb, identifier: &str) -> Result<()> {
        api.delete_acl(identifier).await
    }

    async fn describe(api: &dyn MemoryDb, identifier: &str) -> Result<Described<Self::Model>> {
        let description = api.describe_acl(identifier).await?;
        Ok(described_from(description))
    }

    async fn list(api: &dyn MemoryDb, next_token: Option<&str>) -> Result<Page<Self::Model>> {
        let page = api.list_acls(next_token.map(String::from)).await?;
        Ok(Page {
            items: page.items.into_iter().map(model_from).collect(),
            next_token: page.next_token,
        })
    }
}

fn described_from(description: AclDescription) -> Described<AclModel> {
    let handle = ResourceHandle {
        identifier: description.name.clone(),
        arn: description.arn.clone(),
        status: description.status.clone().unwrap_or_default(),
    };
    Described {
        model: model_from(description),
        handle,
    }
}

fn model_from(description: AclDescription) -> AclModel {
    AclModel {
        acl_name: Some(description.name),
        user_names: Some(description.user_names),
        status: description.status,
        arn: description.arn,
        tags: None,
    }
}
