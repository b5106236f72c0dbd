//! Cluster resource provider.
//!
//! Clusters are the slowest-moving MemoryDB resource: every mutation passes
//! through long "creating"/"updating" phases, and failed provisioning is
//! reported through terminal `*-failed` statuses rather than an error on
//! the mutating call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::{ClusterDescription, MemoryDb, Page};
use crate::error::{ModelError, Result};
use crate::stabilize::ResourceHandle;
use crate::tags::{Tag, TagMap};

use super::{Described, Resource, is_modified, unordered_modified, validation_error};

/// Declared model for a MemoryDB cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterModel {
    /// Cluster name (primary identifier).
    #[validate(length(min = 1, max = 40))]
    pub cluster_name: Option<String>,
    /// Node instance type.
    #[validate(length(min = 1))]
    pub node_type: Option<String>,
    /// Associated ACL name.
    #[serde(rename = "ACLName")]
    pub acl_name: Option<String>,
    /// Cluster description.
    pub description: Option<String>,
    /// Number of shards.
    pub num_shards: Option<i32>,
    /// Number of replicas per shard.
    pub num_replicas_per_shard: Option<i32>,
    /// Subnet group name.
    pub subnet_group_name: Option<String>,
    /// Attached security group ids.
    pub security_group_ids: Option<Vec<String>>,
    /// Engine version.
    pub engine_version: Option<String>,
    /// Whether in-transit encryption is enabled.
    #[serde(rename = "TLSEnabled")]
    pub tls_enabled: Option<bool>,
    /// Service port.
    pub port: Option<i32>,
    /// Lifecycle status (read-only).
    pub status: Option<String>,
    /// Cluster ARN (read-only, resolved on demand for tagging calls).
    #[serde(rename = "ARN")]
    pub arn: Option<String>,
    /// Configuration endpoint address (read-only).
    pub endpoint_address: Option<String>,
    /// Configuration endpoint port (read-only).
    pub endpoint_port: Option<i32>,
    /// Resource-level tags.
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
}

/// Provider for the cluster resource type.
#[derive(Debug)]
pub struct ClusterResource;

#[async_trait]
impl Resource for ClusterResource {
    type Model = ClusterModel;

    const TYPE_NAME: &'static str = "Cluster";

    fn identifier(model: &Self::Model) -> Result<&str> {
        model.cluster_name.as_deref().ok_or_else(|| {
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
        is_modified(desired.node_type.as_deref(), previous.node_type.as_deref())
            || is_modified(desired.acl_name.as_deref(), previous.acl_name.as_deref())
            || is_modified(
                desired.description.as_deref(),
                previous.description.as_deref(),
            )
            || is_modified(
                desired.engine_version.as_deref(),
                previous.engine_version.as_deref(),
            )
            || is_modified(desired.num_shards.as_ref(), previous.num_shards.as_ref())
            || is_modified(
                desired.num_replicas_per_shard.as_ref(),
                previous.num_replicas_per_shard.as_ref(),
            )
            || unordered_modified(
                desired.security_group_ids.as_deref(),
                previous.security_group_ids.as_deref(),
            )
    }

    async fn create(api: &dyn MemoryDb, model: &Self::Model, tags: &TagMap) -> Result<()> {
        api.create_cluster(model, tags).await
    }

    async fn update_core(
        api: &dyn MemoryDb,
        desired: &Self::Model,
        _previous: &Self::Model,
    ) -> Result<()> {
        api.update_cluster(desired).await
    }

    async fn delete(api: &dyn MemoryDb, identifier: &str) -> Result<()> {
        api.delete_cluster(identifier).await
    }

    async fn describe(api: &dyn MemoryDb, identifier: &str) -> Result<Described<Self::Model>> {
        let description = api.describe_cluster(identifier).await?;
        Ok(described_from(description))
    }

    async fn list(api: &dyn MemoryDb, next_token: Option<&str>) -> Result<Page<Self::Model>> {
        let page = api.list_clusters(next_token.map(String::from)).await?;
        Ok(Page {
            items: page.items.into_iter().map(model_from).collect(),
            next_token: page.next_token,
        })
    }
}

fn described_from(description: ClusterDescription) -> Described<ClusterModel> {
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

fn model_from(description: ClusterDescription) -> ClusterModel {
    ClusterModel {
        cluster_name: Some(description.name),
        node_type: description.node_type,
        acl_name: description.acl_name,
        description: description.description,
        num_shards: description.num_shards,
        num_replicas_per_shard: None,
        subnet_group_name: description.subnet_group_name,
        security_group_ids: if description.security_group_ids.is_empty() {
            None
        } else {
            Some(description.security_group_ids)
        },
        engine_version: description.engine_version,
        tls_enabled: description.tls_enabled,
        port: description.endpoint_port,
        status: description.status,
        arn: description.arn,
        endpoint_address: description.endpoint_address,
        endpoint_port: description.endpoint_port,
        tags: None,
    }
}
