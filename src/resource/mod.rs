//! Resource providers for MemoryDB sub-resources.
//!
//! Each provider implements the [`Resource`] trait: model accessors,
//! core-change detection, stability predicates, and the translation of
//! handler operations into MemoryDB API calls. The CRUDL handlers in
//! [`crate::handler`] are generic over this trait.

mod acl;
mod cluster;
mod subnet_group;
mod user;

pub use acl::{AclModel, AclResource};
pub use cluster::{ClusterModel, ClusterResource};
pub use subnet_group::{SubnetGroupModel, SubnetGroupResource};
pub use user::{AuthenticationMode, UserModel, UserResource};

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{MemoryDb, Page};
use crate::error::Result;
use crate::stabilize::ResourceHandle;
use crate::tags::{Tag, TagMap};

/// Status reported by stable resources.
pub const STATUS_ACTIVE: &str = "active";

/// A described resource: the refreshed model plus its live handle.
#[derive(Debug, Clone)]
pub struct Described<M> {
    /// Refreshed resource model.
    pub model: M,
    /// Identifier, ARN and current lifecycle status.
    pub handle: ResourceHandle,
}

/// A provisionable MemoryDB sub-resource.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// The declared resource model.
    type Model: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Resource type name used in errors and logging.
    const TYPE_NAME: &'static str;

    /// Returns the model's primary identifier.
    ///
    /// # Errors
    ///
    /// Returns a model error if the identifier is absent.
    fn identifier(model: &Self::Model) -> Result<&str>;

    /// Returns the model's ARN, if already resolved.
    fn arn(model: &Self::Model) -> Option<&str>;

    /// Returns the resource-level tags declared on the model.
    fn resource_tags(model: &Self::Model) -> Option<&[Tag]>;

    /// Replaces the model's tag list with live tags read from the service.
    fn attach_tags(model: &mut Self::Model, tags: Vec<Tag>);

    /// Validates the model before any remote call is issued.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first offending field.
    fn validate(model: &Self::Model) -> Result<()>;

    /// Returns true if any non-tag attribute differs between the two models.
    ///
    /// A property is considered modified only if the desired value is
    /// present and differs from the previous one; omitted properties
    /// request no change.
    fn has_core_changes(desired: &Self::Model, previous: &Self::Model) -> bool;

    /// Returns true once the resource has absorbed the last mutation.
    fn is_stable(handle: &ResourceHandle) -> bool {
        handle.status.eq_ignore_ascii_case(STATUS_ACTIVE)
    }

    /// Returns true if the resource reached a terminal failure status.
    fn is_failed(handle: &ResourceHandle) -> bool {
        handle.status.ends_with("-failed")
    }

    /// Issues the create call with the merged stack + resource tags.
    async fn create(api: &dyn MemoryDb, model: &Self::Model, tags: &TagMap) -> Result<()>;

    /// Issues the core-attribute update call.
    async fn update_core(
        api: &dyn MemoryDb,
        desired: &Self::Model,
        previous: &Self::Model,
    ) -> Result<()>;

    /// Issues the delete call.
    async fn delete(api: &dyn MemoryDb, identifier: &str) -> Result<()>;

    /// Describes the resource, returning the refreshed model and handle.
    async fn describe(api: &dyn MemoryDb, identifier: &str) -> Result<Described<Self::Model>>;

    /// Lists one page of resources.
    async fn list(api: &dyn MemoryDb, next_token: Option<&str>) -> Result<Page<Self::Model>>;
}

/// Returns true if `desired` is present and differs from `current`.
pub(crate) fn is_modified<T: PartialEq + ?Sized>(
    desired: Option<&T>,
    current: Option<&T>,
) -> bool {
    desired.is_some_and(|d| Some(d) != current)
}

/// Unordered comparison for list-valued properties.
///
/// An omitted desired list requests no change; otherwise the lists are
/// compared as sets, with an absent current list treated as empty.
pub(crate) fn unordered_modified(desired: Option<&[String]>, current: Option<&[String]>) -> bool {
    desired.is_some_and(|want| {
        let want: BTreeSet<&str> = want.iter().map(String::as_str).collect();
        let have: BTreeSet<&str> = current
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();
        want != have
    })
}

/// Maps validator output into the provider's validation error.
pub(crate) fn validation_error(
    type_name: &'static str,
    errors: &validator::ValidationErrors,
) -> crate::error::ProviderError {
    crate::error::ModelError::validation(type_name, errors.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_desired_value_is_not_modified() {
        assert!(!is_modified(None::<&str>, Some("current")));
        assert!(!is_modified(None::<&str>, None));
    }

    #[test]
    fn test_present_desired_value_compares() {
        assert!(is_modified(Some("new"), Some("old")));
        assert!(is_modified(Some("new"), None));
        assert!(!is_modified(Some("same"), Some("same")));
    }

    #[test]
    fn test_unordered_comparison_ignores_order() {
        let desired = vec![String::from("a"), String::from("b")];
        let current = vec![String::from("b"), String::from("a")];
        assert!(!unordered_modified(Some(&desired), Some(&current)));

        let changed = vec![String::from("a"), String::from("c")];
        assert!(unordered_modified(Some(&changed), Some(&current)));
    }

    #[test]
    fn test_unordered_comparison_absent_current_is_empty() {
        let desired = vec![String::from("a")];
        assert!(unordered_modified(Some(&desired), None));
        assert!(!unordered_modified(None, Some(&desired)));
    }
}
