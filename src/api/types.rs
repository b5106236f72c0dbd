//! Wire-level descriptions returned by the MemoryDB API.
//!
//! These are the provider's view of describe/list responses, decoupled from
//! the SDK's generated output types so handlers and tests never touch the
//! SDK directly.

/// One page of a list call.
#[derive(Debug, Clone, Default)]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Token for the next page, if any.
    pub next_token: Option<String>,
}

/// Description of a MemoryDB user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDescription {
    /// User name.
    pub name: String,
    /// Lifecycle status ("active", "modifying", "deleting").
    pub status: Option<String>,
    /// User ARN.
    pub arn: Option<String>,
    /// Access policy string.
    pub access_string: Option<String>,
    /// Authentication type ("password", "iam", "no-password").
    pub authentication_type: Option<String>,
}

/// Description of a MemoryDB ACL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclDescription {
    /// ACL name.
    pub name: String,
    /// Lifecycle status.
    pub status: Option<String>,
    /// ACL ARN.
    pub arn: Option<String>,
    /// Member user names.
    pub user_names: Vec<String>,
}

/// Description of a MemoryDB cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterDescription {
    /// Cluster name.
    pub name: String,
    /// Lifecycle status.
    pub status: Option<String>,
    /// Cluster ARN.
    pub arn: Option<String>,
    /// Node instance type.
    pub node_type: Option<String>,
    /// Associated ACL name.
    pub acl_name: Option<String>,
    /// Cluster description.
    pub description: Option<String>,
    /// Number of shards.
    pub num_shards: Option<i32>,
    /// Engine version.
    pub engine_version: Option<String>,
    /// Subnet group name.
    pub subnet_group_name: Option<String>,
    /// Attached security group ids.
    pub security_group_ids: Vec<String>,
    /// Whether in-transit encryption is enabled.
    pub tls_enabled: Option<bool>,
    /// Configuration endpoint address.
    pub endpoint_address: Option<String>,
    /// Configuration endpoint port.
    pub endpoint_port: Option<i32>,
}

/// Description of a MemoryDB subnet group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetGroupDescription {
    /// Subnet group name.
    pub name: String,
    /// Subnet group ARN.
    pub arn: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// VPC the subnets belong to.
    pub vpc_id: Option<String>,
    /// Member subnet identifiers.
    pub subnet_ids: Vec<String>,
}
