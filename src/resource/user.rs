//! User resource provider.
//!
//! A MemoryDB user pairs an access policy string with an authentication
//! mode. Authentication passwords are compared as an unordered set: the
//! service does not distinguish password order, so a reordered list is not
//! a modification.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::{MemoryDb, Page, UserDescription};
use crate::error::{ModelError, Result};
use crate::stabilize::ResourceHandle;
use crate::tags::{Tag, TagMap};

use super::{Described, Resource, is_modified, validation_error};

/// Declared model for a MemoryDB user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserModel {
    /// User name (primary identifier).
    #[validate(length(min = 1, max = 40))]
    pub user_name: Option<String>,
    /// Access policy string.
    #[validate(length(min = 1))]
    pub access_string: Option<String>,
    /// Authentication mode.
    pub authentication_mode: Option<AuthenticationMode>,
    /// Lifecycle status (read-only).
    pub status: Option<String>,
    /// User ARN (read-only, resolved on demand for tagging calls).
    #[serde(rename = "Arn")]
    pub arn: Option<String>,
    /// Resource-level tags.
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
}

/// Authentication mode for a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthenticationMode {
    /// Authentication type ("password", "iam", "no-password").
    #[serde(rename = "Type")]
    pub mode_type: Option<String>,
    /// Passwords, when the type is "password".
    pub passwords: Option<Vec<String>>,
}

/// Provider for the user resource type.
#[derive(Debug)]
pub struct UserResource;

#[async_trait]
impl Resource for UserResource {
    type Model = UserModel;

    const TYPE_NAME: &'static str = "User";

    fn identifier(model: &Self::Model) -> Result<&str> {
        model.user_name.as_deref().ok_or_else(|| {
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
            desired.access_string.as_deref(),
            previous.access_string.as_deref(),
        ) || authentication_mode_modified(
            desired.authentication_mode.as_ref(),
            previous.authentication_mode.as_ref(),
        )
    }

    async fn create(api: &dyn MemoryDb, model: &Self::Model, tags: &TagMap) -> Result<()> {
        api.create_user(model, tags).await
    }

    async fn update_core(
        api: &dyn MemoryDb,
        desired: &Self::Model,
        _previous: &Self::Model,
    ) -> Result<()> {
        api.update_user(desired).await
    }

    async fn delete(api: &dyn MemoryDb, identifier: &str) -> Result<()> {
        api.delete_user(identifier).await
    }

    async fn describe(api: &dyn MemoryDb, identifier: &str) -> Result<Described<Self::Model>> {
        let description = api.describe_user(identifier).await?;
        Ok(described_from(description))
    }

    async fn list(api: &dyn MemoryDb, next_token: Option<&str>) -> Result<Page<Self::Model>> {
        let page = api.list_users(next_token.map(String::from)).await?;
        Ok(Page {
            items: page.items.into_iter().map(model_from).collect(),
            next_token: page.next_token,
        })
    }
}

fn described_from(description: UserDescription) -> Described<UserModel> {
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

fn model_from(description: UserDescription) -> UserModel {
    UserModel {
        user_name: Some(description.name),
        access_string: description.access_string,
        // The service never echoes passwords back.
        authentication_mode: description.authentication_type.map(|t| AuthenticationMode {
            mode_type: Some(t),
            passwords: None,
        }),
        status: description.status,
        arn: description.arn,
        tags: None,
    }
}

fn authentication_mode_modified(
    desired: Option<&AuthenticationMode>,
    current: Option<&AuthenticationMode>,
) -> bool {
    match (desired, current) {
        (None, None) => false,
        (Some(d), Some(c)) => {
            is_modified(d.mode_type.as_deref(), c.mode_type.as_deref())
                || password_list_modified(d.passwords.as_deref(), c.passwords.as_deref())
        }
        _ => true,
    }
}

fn password_list_modified(desired: Option<&[String]>, current: Option<&[String]>) -> bool {
    let desired_empty = desired.is_none_or(<[String]>::is_empty);
    let current_empty = current.is_none_or(<[String]>::is_empty);
    match (desired_empty, current_empty) {
        (true, true) => false,
        (false, false) => {
            let want: BTreeSet<&str> = desired
                .unwrap_or_default()
                .iter()
                .map(String::as_str)
                .collect();
            let have: BTreeSet<&str> = current
                .unwrap_or_default()
                .iter()
                .map(String::as_str)
                .collect();
            want != have
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_mode(passwords: &[&str]) -> AuthenticationMode {
        AuthenticationMode {
            mode_type: Some(String::from("password")),
            passwords: Some(passwords.iter().map(ToString::to_string).collect()),
        }
    }

    fn default_user() -> UserModel {
        UserModel {
            user_name: Some(String::from("test-user")),
            access_string: Some(String::from("on ~* +@all")),
            authentication_mode: Some(password_mode(&["secret-one"])),
            status: Some(String::from("active")),
            arn: Some(String::from("arn:aws:memorydb:us-east-1:123:user/test-user")),
            tags: None,
        }
    }

    #[test]
    fn test_access_string_change_is_core_change() {
        let previous = default_user();
        let mut desired = default_user();
        desired.access_string = Some(String::from("on ~* +@all v2"));

        assert!(UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_identical_models_have_no_core_change() {
        let previous = default_user();
        let desired = default_user();

        assert!(!UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_password_reorder_is_not_a_change() {
        let mut previous = default_user();
        previous.authentication_mode = Some(password_mode(&["one", "two"]));
        let mut desired = default_user();
        desired.authentication_mode = Some(password_mode(&["two", "one"]));

        assert!(!UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_password_rotation_is_a_change() {
        let previous = default_user();
        let mut desired = default_user();
        desired.authentication_mode = Some(password_mode(&["updated-password"]));

        assert!(UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_auth_type_change_is_a_change() {
        let previous = default_user();
        let mut desired = default_user();
        desired.authentication_mode = Some(AuthenticationMode {
            mode_type: Some(String::from("iam")),
            passwords: None,
        });

        assert!(UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_omitted_access_string_requests_no_change() {
        let previous = default_user();
        let mut desired = default_user();
        desired.access_string = None;

        assert!(!UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_dropped_authentication_mode_is_a_change() {
        // Authentication mode compares null-vs-non-null as modified.
        let previous = default_user();
        let desired = UserModel {
            user_name: Some(String::from("test-user")),
            ..UserModel::default()
        };

        assert!(UserResource::has_core_changes(&desired, &previous));
    }

    #[test]
    fn test_missing_identifier_is_a_model_error() {
        let model = UserModel::default();
        assert!(UserResource::identifier(&model).is_err());
    }

    #[test]
    fn test_model_serializes_with_pascal_case_keys() {
        let model = default_user();
        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("UserName").is_some());
        assert!(value.get("AccessString").is_some());
    }
}
