//! MemoryDB API client.
//!
//! The [`MemoryDb`] trait is the seam between the handlers and the remote
//! service: per-resource CRUDL calls plus the three tagging calls. The
//! production implementation wraps the AWS SDK client; tests mock the
//! trait directly.

use std::collections::BTreeSet;

use async_trait::async_trait;
use aws_sdk_memorydb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_memorydb::types as sdk;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::resource::{AclModel, ClusterModel, SubnetGroupModel, UserModel};
use crate::tags::TagMap;

use super::types::{
    AclDescription, ClusterDescription, Page, SubnetGroupDescription, UserDescription,
};

/// Maximum records requested per list page.
const MAX_RECORDS: i32 = 50;

/// Remote MemoryDB API surface used by the handlers.
///
/// Every describe call signals a distinguished not-found condition through
/// [`ApiError::NotFound`]; the stabilization poller and the delete handler
/// rely on that distinction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryDb: Send + Sync {
    /// Describes a user by name.
    async fn describe_user(&self, user_name: &str) -> Result<UserDescription>;
    /// Creates a user with the merged tag set.
    async fn create_user(&self, model: &UserModel, tags: &TagMap) -> Result<()>;
    /// Updates a user's core attributes.
    async fn update_user(&self, model: &UserModel) -> Result<()>;
    /// Deletes a user by name.
    async fn delete_user(&self, user_name: &str) -> Result<()>;
    /// Lists one page of users.
    async fn list_users(&self, next_token: Option<String>) -> Result<Page<UserDescription>>;

    /// Describes an ACL by name.
    async fn describe_acl(&self, acl_name: &str) -> Result<AclDescription>;
    /// Creates an ACL with the merged tag set.
    async fn create_acl(&self, model: &AclModel, tags: &TagMap) -> Result<()>;
    /// Applies member add/remove deltas to an ACL.
    async fn update_acl(&self, acl_name: &str, add: &[String], remove: &[String]) -> Result<()>;
    /// Deletes an ACL by name.
    async fn delete_acl(&self, acl_name: &str) -> Result<()>;
    /// Lists one page of ACLs.
    async fn list_acls(&self, next_token: Option<String>) -> Result<Page<AclDescription>>;

    /// Describes a cluster by name.
    async fn describe_cluster(&self, cluster_name: &str) -> Result<ClusterDescription>;
    /// Creates a cluster with the merged tag set.
    async fn create_cluster(&self, model: &ClusterModel, tags: &TagMap) -> Result<()>;
    /// Updates a cluster's core attributes.
    async fn update_cluster(&self, model: &ClusterModel) -> Result<()>;
    /// Deletes a cluster by name.
    async fn delete_cluster(&self, cluster_name: &str) -> Result<()>;
    /// Lists one page of clusters.
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<ClusterDescription>>;

    /// Describes a subnet group by name.
    async fn describe_subnet_group(&self, name: &str) -> Result<SubnetGroupDescription>;
    /// Creates a subnet group with the merged tag set.
    async fn create_subnet_group(&self, model: &SubnetGroupModel, tags: &TagMap) -> Result<()>;
    /// Updates a subnet group's core attributes.
    async fn update_subnet_group(&self, model: &SubnetGroupModel) -> Result<()>;
    /// Deletes a subnet group by name.
    async fn delete_subnet_group(&self, name: &str) -> Result<()>;
    /// Lists one page of subnet groups.
    async fn list_subnet_groups(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<SubnetGroupDescription>>;

    /// Attaches tags to the resource addressed by `arn`.
    async fn tag_resource(&self, arn: &str, tags: &TagMap) -> Result<()>;
    /// Removes the given tag keys from the resource addressed by `arn`.
    async fn untag_resource(&self, arn: &str, keys: &BTreeSet<String>) -> Result<()>;
    /// Lists the tags attached to the resource addressed by `arn`.
    async fn list_tags(&self, arn: &str) -> Result<TagMap>;
}

/// MemoryDB API implementation over the AWS SDK.
#[derive(Debug, Clone)]
pub struct SdkMemoryDb {
    /// Underlying SDK client.
    client: aws_sdk_memorydb::Client,
}

impl SdkMemoryDb {
    /// Creates a client from an existing SDK client.
    #[must_use]
    pub const fn new(client: aws_sdk_memorydb::Client) -> Self {
        Self { client }
    }

    /// Creates a client from ambient AWS configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_memorydb::Client::new(&config))
    }
}

#[async_trait]
impl MemoryDb for SdkMemoryDb {
    async fn describe_user(&self, user_name: &str) -> Result<UserDescription> {
        debug!("Describing user: {user_name}");
        let output = self
            .client
            .describe_users()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify_error("User", user_name, &e))?;
        let user = output
            .users()
            .first()
            .ok_or_else(|| ApiError::invalid_response("DescribeUsers returned no entries"))?;
        Ok(user_description(user))
    }

    async fn create_user(&self, model: &UserModel, tags: &TagMap) -> Result<()> {
        let name = model.user_name.clone().unwrap_or_default();
        debug!("Creating user: {name}");
        self.client
            .create_user()
            .user_name(&name)
            .set_access_string(model.access_string.clone())
            .set_authentication_mode(model.authentication_mode.as_ref().map(sdk_authentication))
            .set_tags(sdk_tags(tags))
            .send()
            .await
            .map_err(|e| classify_error("User", &name, &e))?;
        Ok(())
    }

    async fn update_user(&self, model: &UserModel) -> Result<()> {
        let name = model.user_name.clone().unwrap_or_default();
        debug!("Updating user: {name}");
        self.client
            .update_user()
            .user_name(&name)
            .set_access_string(model.access_string.clone())
            .set_authentication_mode(model.authentication_mode.as_ref().map(sdk_authentication))
            .send()
            .await
            .map_err(|e| classify_error("User", &name, &e))?;
        Ok(())
    }

    async fn delete_user(&self, user_name: &str) -> Result<()> {
        debug!("Deleting user: {user_name}");
        self.client
            .delete_user()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify_error("User", user_name, &e))?;
        Ok(())
    }

    async fn list_users(&self, next_token: Option<String>) -> Result<Page<UserDescription>> {
        let output = self
            .client
            .describe_users()
            .max_results(MAX_RECORDS)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_error("User", "<list>", &e))?;
        Ok(Page {
            items: output.users().iter().map(user_description).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_acl(&self, acl_name: &str) -> Result<AclDescription> {
        debug!("Describing ACL: {acl_name}");
        let output = self
            .client
            .describe_acls()
            .acl_name(acl_name)
            .send()
            .await
            .map_err(|e| classify_error("Acl", acl_name, &e))?;
        let acl = output
            .acls()
            .first()
            .ok_or_else(|| ApiError::invalid_response("DescribeACLs returned no entries"))?;
        Ok(acl_description(acl))
    }

    async fn create_acl(&self, model: &AclModel, tags: &TagMap) -> Result<()> {
        let name = model.acl_name.clone().unwrap_or_default();
        debug!("Creating ACL: {name}");
        self.client
            .create_acl()
            .acl_name(&name)
            .set_user_names(model.user_names.clone())
            .set_tags(sdk_tags(tags))
            .send()
            .await
            .map_err(|e| classify_error("Acl", &name, &e))?;
        Ok(())
    }

    async fn update_acl(&self, acl_name: &str, add: &[String], remove: &[String]) -> Result<()> {
        debug!(
            "Updating ACL {acl_name}: +{} members, -{} members",
            add.len(),
            remove.len()
        );
        self.client
            .update_acl()
            .acl_name(acl_name)
            .set_user_names_to_add(non_empty(add))
            .set_user_names_to_remove(non_empty(remove))
            .send()
            .await
            .map_err(|e| classify_error("Acl", acl_name, &e))?;
        Ok(())
    }

    async fn delete_acl(&self, acl_name: &str) -> Result<()> {
        debug!("Deleting ACL: {acl_name}");
        self.client
            .delete_acl()
            .acl_name(acl_name)
            .send()
            .await
            .map_err(|e| classify_error("Acl", acl_name, &e))?;
        Ok(())
    }

    async fn list_acls(&self, next_token: Option<String>) -> Result<Page<AclDescription>> {
        let output = self
            .client
            .describe_acls()
            .max_results(MAX_RECORDS)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_error("Acl", "<list>", &e))?;
        Ok(Page {
            items: output.acls().iter().map(acl_description).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_cluster(&self, cluster_name: &str) -> Result<ClusterDescription> {
        debug!("Describing cluster: {cluster_name}");
        let output = self
            .client
            .describe_clusters()
            .cluster_name(cluster_name)
            .send()
            .await
            .map_err(|e| classify_error("Cluster", cluster_name, &e))?;
        let cluster = output
            .clusters()
            .first()
            .ok_or_else(|| ApiError::invalid_response("DescribeClusters returned no entries"))?;
        Ok(cluster_description(cluster))
    }

    async fn create_cluster(&self, model: &ClusterModel, tags: &TagMap) -> Result<()> {
        let name = model.cluster_name.clone().unwrap_or_default();
        debug!("Creating cluster: {name}");
        self.client
            .create_cluster()
            .cluster_name(&name)
            .set_node_type(model.node_type.clone())
            .set_acl_name(model.acl_name.clone())
            .set_description(model.description.clone())
            .set_num_shards(model.num_shards)
            .set_num_replicas_per_shard(model.num_replicas_per_shard)
            .set_subnet_group_name(model.subnet_group_name.clone())
            .set_security_group_ids(model.security_group_ids.clone())
            .set_engine_version(model.engine_version.clone())
            .set_tls_enabled(model.tls_enabled)
            .set_port(model.port)
            .set_tags(sdk_tags(tags))
            .send()
            .await
            .map_err(|e| classify_error("Cluster", &name, &e))?;
        Ok(())
    }

    async fn update_cluster(&self, model: &ClusterModel) -> Result<()> {
        let name = model.cluster_name.clone().unwrap_or_default();
        debug!("Updating cluster: {name}");
        self.client
            .update_cluster()
            .cluster_name(&name)
            .set_node_type(model.node_type.clone())
            .set_acl_name(model.acl_name.clone())
            .set_description(model.description.clone())
            .set_engine_version(model.engine_version.clone())
            .set_security_group_ids(model.security_group_ids.clone())
            .set_shard_configuration(model.num_shards.map(|count| {
                sdk::ShardConfigurationRequest::builder()
                    .shard_count(count)
                    .build()
            }))
            .set_replica_configuration(model.num_replicas_per_shard.map(|count| {
                sdk::ReplicaConfigurationRequest::builder()
                    .replica_count(count)
                    .build()
            }))
            .send()
            .await
            .map_err(|e| classify_error("Cluster", &name, &e))?;
        Ok(())
    }

    async fn delete_cluster(&self, cluster_name: &str) -> Result<()> {
        debug!("Deleting cluster: {cluster_name}");
        self.client
            .delete_cluster()
            .cluster_name(cluster_name)
            .send()
            .await
            .map_err(|e| classify_error("Cluster", cluster_name, &e))?;
        Ok(())
    }

    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<ClusterDescription>> {
        let output = self
            .client
            .describe_clusters()
            .max_results(MAX_RECORDS)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_error("Cluster", "<list>", &e))?;
        Ok(Page {
            items: output.clusters().iter().map(cluster_description).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_subnet_group(&self, name: &str) -> Result<SubnetGroupDescription> {
        debug!("Describing subnet group: {name}");
        let output = self
            .client
            .describe_subnet_groups()
            .subnet_group_name(name)
            .send()
            .await
            .map_err(|e| classify_error("SubnetGroup", name, &e))?;
        let group = output.subnet_groups().first().ok_or_else(|| {
            ApiError::invalid_response("DescribeSubnetGroups returned no entries")
        })?;
        Ok(subnet_group_description(group))
    }

    async fn create_subnet_group(&self, model: &SubnetGroupModel, tags: &TagMap) -> Result<()> {
        let name = model.subnet_group_name.clone().unwrap_or_default();
        debug!("Creating subnet group: {name}");
        self.client
            .create_subnet_group()
            .subnet_group_name(&name)
            .set_description(model.description.clone())
            .set_subnet_ids(model.subnet_ids.clone())
            .set_tags(sdk_tags(tags))
            .send()
            .await
            .map_err(|e| classify_error("SubnetGroup", &name, &e))?;
        Ok(())
    }

    async fn update_subnet_group(&self, model: &SubnetGroupModel) -> Result<()> {
        let name = model.subnet_group_name.clone().unwrap_or_default();
        debug!("Updating subnet group: {name}");
        self.client
            .update_subnet_group()
            .subnet_group_name(&name)
            .set_description(model.description.clone())
            .set_subnet_ids(model.subnet_ids.clone())
            .send()
            .await
            .map_err(|e| classify_error("SubnetGroup", &name, &e))?;
        Ok(())
    }

    async fn delete_subnet_group(&self, name: &str) -> Result<()> {
        debug!("Deleting subnet group: {name}");
        self.client
            .delete_subnet_group()
            .subnet_group_name(name)
            .send()
            .await
            .map_err(|e| classify_error("SubnetGroup", name, &e))?;
        Ok(())
    }

    async fn list_subnet_groups(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<SubnetGroupDescription>> {
        let output = self
            .client
            .describe_subnet_groups()
            .max_results(MAX_RECORDS)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_error("SubnetGroup", "<list>", &e))?;
        Ok(Page {
            items: output
                .subnet_groups()
                .iter()
                .map(subnet_group_description)
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn tag_resource(&self, arn: &str, tags: &TagMap) -> Result<()> {
        debug!("Tagging {arn}: {} tags", tags.len());
        self.client
            .tag_resource()
            .resource_arn(arn)
            .set_tags(sdk_tags(tags))
            .send()
            .await
            .map_err(|e| classify_error("Resource", arn, &e))?;
        Ok(())
    }

    async fn untag_resource(&self, arn: &str, keys: &BTreeSet<String>) -> Result<()> {
        debug!("Untagging {arn}: {} keys", keys.len());
        self.client
            .untag_resource()
            .resource_arn(arn)
            .set_tag_keys(Some(keys.iter().cloned().collect()))
            .send()
            .await
            .map_err(|e| classify_error("Resource", arn, &e))?;
        Ok(())
    }

    async fn list_tags(&self, arn: &str) -> Result<TagMap> {
        let output = self
            .client
            .list_tags()
            .resource_arn(arn)
            .send()
            .await
            .map_err(|e| classify_error("Resource", arn, &e))?;
        Ok(tag_map_from_sdk(output.tag_list()))
    }
}

/// Classifies an SDK failure into the provider's error taxonomy.
fn classify_error<E>(type_name: &'static str, identifier: &str, err: &SdkError<E>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)) {
        return ApiError::network(err.to_string());
    }

    let code = err.code().unwrap_or_default();
    if code.contains("NotFound") {
        ApiError::not_found(type_name, identifier)
    } else if code == "ThrottlingException" || code == "Throttling" {
        ApiError::Throttling
    } else {
        ApiError::Service {
            code: code.to_string(),
            message: err.message().unwrap_or("no message").to_string(),
        }
    }
}

fn sdk_authentication(mode: &crate::resource::AuthenticationMode) -> sdk::AuthenticationMode {
    sdk::AuthenticationMode::builder()
        .set_type(
            mode.mode_type
                .as_deref()
                .map(sdk::InputAuthenticationType::from),
        )
        .set_passwords(mode.passwords.clone())
        .build()
}

fn sdk_tags(tags: &TagMap) -> Option<Vec<sdk::Tag>> {
    if tags.is_empty() {
        return None;
    }
    Some(
        tags.iter()
            .map(|(key, value)| sdk::Tag::builder().key(key).value(value).build())
            .collect(),
    )
}

/// Converts SDK tags to a map; value-less tags are treated as not present.
fn tag_map_from_sdk(tags: &[sdk::Tag]) -> TagMap {
    tags.iter()
        .filter_map(|tag| match (tag.key(), tag.value()) {
            (Some(key), Some(value)) => Some((key.to_string(), value.to_string())),
            _ => None,
        })
        .collect()
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn user_description(user: &sdk::User) -> UserDescription {
    UserDescription {
        name: user.name().unwrap_or_default().to_string(),
        status: user.status().map(str::to_string),
        arn: user.arn().map(str::to_string),
        access_string: user.access_string().map(str::to_string),
        authentication_type: user
            .authentication()
            .and_then(|auth| auth.r#type())
            .map(|t| t.as_str().to_string()),
    }
}

fn acl_description(acl: &sdk::Acl) -> AclDescription {
    AclDescription {
        name: acl.name().unwrap_or_default().to_string(),
        status: acl.status().map(str::to_string),
        arn: acl.arn().map(str::to_string),
        user_names: acl.user_names().to_vec(),
    }
}

fn cluster_description(cluster: &sdk::Cluster) -> ClusterDescription {
    ClusterDescription {
        name: cluster.name().unwrap_or_default().to_string(),
        status: cluster.status().map(str::to_string),
        arn: cluster.arn().map(str::to_string),
        node_type: cluster.node_type().map(str::to_string),
        acl_name: cluster.acl_name().map(str::to_string),
        description: cluster.description().map(str::to_string),
        num_shards: cluster.number_of_shards(),
        engine_version: cluster.engine_version().map(str::to_string),
        subnet_group_name: cluster.subnet_group_name().map(str::to_string),
        security_group_ids: cluster
            .security_groups()
            .iter()
            .filter_map(sdk::SecurityGroupMembership::security_group_id)
            .map(str::to_string)
            .collect(),
        tls_enabled: cluster.tls_enabled(),
        endpoint_address: cluster
            .cluster_endpoint()
            .and_then(sdk::Endpoint::address)
            .map(str::to_string),
        endpoint_port: cluster.cluster_endpoint().map(sdk::Endpoint::port),
    }
}

fn subnet_group_description(group: &sdk::SubnetGroup) -> SubnetGroupDescription {
    SubnetGroupDescription {
        name: group.name().unwrap_or_default().to_string(),
        arn: group.arn().map(str::to_string),
        description: group.description().map(str::to_string),
        vpc_id: group.vpc_id().map(str::to_string),
        subnet_ids: group
            .subnets()
            .iter()
            .filter_map(sdk::Subnet::identifier)
            .map(str::to_string)
            .collect(),
    }
}
