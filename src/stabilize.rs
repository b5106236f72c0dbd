//! Cooperative stabilization polling.
//!
//! Stabilization never blocks: each call to [`poll_once`] issues exactly
//! one describe against the service and reports whether the resource has
//! settled. The handlers persist their position in a callback context
//! between invocations, so a stabilization that spans minutes costs one
//! remote call per invocation instead of a long in-process wait loop.

use tracing::debug;

use crate::api::MemoryDb;
use crate::error::{ProviderError, Result, StabilizeError};
use crate::resource::{Described, Resource};

/// Identity and status snapshot of a remote resource.
///
/// This is the minimal view every resource type can produce from a
/// describe call, independent of its full model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Primary identifier (name).
    pub identifier: String,
    /// Resource ARN, when the service reports one.
    pub arn: Option<String>,
    /// Raw lifecycle status string as reported by the service.
    pub status: String,
}

/// What a stabilization poll is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizeMode {
    /// Wait until the resource reports a stable status.
    UntilStable,
    /// Wait until the resource no longer exists.
    UntilGone,
}

/// Result of a single stabilization poll.
#[derive(Debug, Clone)]
pub enum PollOutcome<M> {
    /// The resource reports a stable status; carries the refreshed model so
    /// callers finishing on this poll need no extra describe.
    Stable(Described<M>),
    /// The resource exists but is still transitioning.
    NotStable(ResourceHandle),
    /// The resource no longer exists.
    Gone,
}

/// Issues one describe call and classifies the result against `mode`.
///
/// In [`StabilizeMode::UntilStable`] a missing resource is a hard failure:
/// something the provider just created or updated has disappeared out from
/// under it. In [`StabilizeMode::UntilGone`] the same condition is the
/// success case. A terminal failed status is an error in both modes.
pub async fn poll_once<R: Resource>(
    api: &dyn MemoryDb,
    identifier: &str,
    mode: StabilizeMode,
) -> Result<PollOutcome<R::Model>> {
    let described = match R::describe(api, identifier).await {
        Ok(described) => described,
        Err(ProviderError::Api(err)) if err.is_not_found() => {
            return match mode {
                StabilizeMode::UntilGone => {
                    debug!("{} {identifier} is gone", R::TYPE_NAME);
                    Ok(PollOutcome::Gone)
                }
                StabilizeMode::UntilStable => Err(err.into()),
            };
        }
        Err(err) => return Err(err),
    };

    debug!(
        "{} {identifier} reports status: {}",
        R::TYPE_NAME,
        described.handle.status
    );

    if R::is_failed(&described.handle) {
        return Err(StabilizeError::Failed {
            type_name: R::TYPE_NAME,
            identifier: described.handle.identifier,
            status: described.handle.status,
        }
        .into());
    }

    match mode {
        StabilizeMode::UntilStable if R::is_stable(&described.handle) => {
            Ok(PollOutcome::Stable(described))
        }
        // Still present, so not gone; still transitioning, so not stable.
        _ => Ok(PollOutcome::NotStable(described.handle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMemoryDb, UserDescription};
    use crate::error::ApiError;
    use crate::resource::UserResource;

    fn user_with_status(status: &str) -> UserDescription {
        UserDescription {
            name: String::from("test-user"),
            status: Some(String::from(status)),
            arn: Some(String::from("arn:aws:memorydb:us-east-1:123:user/test-user")),
            access_string: Some(String::from("on ~* +@all")),
            authentication_type: Some(String::from("password")),
        }
    }

    #[tokio::test]
    async fn test_until_stable_reports_progress_then_stable() {
        let mut api = MockMemoryDb::new();
        let mut statuses = vec!["modifying", "modifying", "active"].into_iter();
        api.expect_describe_user()
            .times(3)
            .returning(move |_| Ok(user_with_status(statuses.next().unwrap())));

        for _ in 0..2 {
            let outcome = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilStable)
                .await
                .unwrap();
            assert!(matches!(outcome, PollOutcome::NotStable(_)));
        }

        let outcome = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilStable)
            .await
            .unwrap();
        match outcome {
            PollOutcome::Stable(described) => {
                assert_eq!(described.handle.identifier, "test-user");
                assert!(described.handle.arn.is_some());
                assert_eq!(
                    described.model.user_name.as_deref(),
                    Some("test-user")
                );
            }
            other => panic!("expected stable outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_until_stable_treats_missing_resource_as_failure() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user()
            .times(1)
            .returning(|_| Err(ApiError::not_found("User", "test-user").into()));

        let result = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilStable).await;
        assert!(matches!(
            result,
            Err(ProviderError::Api(ApiError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_until_gone_reports_progress_then_gone() {
        let mut api = MockMemoryDb::new();
        let mut calls = 0;
        api.expect_describe_user().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(user_with_status("deleting"))
            } else {
                Err(ApiError::not_found("User", "test-user").into())
            }
        });

        let outcome = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilGone)
            .await
            .unwrap();
        assert!(matches!(outcome, PollOutcome::NotStable(_)));

        let outcome = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilGone)
            .await
            .unwrap();
        assert!(matches!(outcome, PollOutcome::Gone));
    }

    #[tokio::test]
    async fn test_failed_status_is_terminal_in_both_modes() {
        for mode in [StabilizeMode::UntilStable, StabilizeMode::UntilGone] {
            let mut api = MockMemoryDb::new();
            api.expect_describe_user()
                .times(1)
                .returning(|_| Ok(user_with_status("create-failed")));

            let result = poll_once::<UserResource>(&api, "test-user", mode).await;
            assert!(matches!(
                result,
                Err(ProviderError::Stabilize(StabilizeError::Failed { .. }))
            ));
        }
    }

    #[tokio::test]
    async fn test_active_resource_is_not_gone() {
        let mut api = MockMemoryDb::new();
        api.expect_describe_user()
            .times(1)
            .returning(|_| Ok(user_with_status("active")));

        let outcome = poll_once::<UserResource>(&api, "test-user", StabilizeMode::UntilGone)
            .await
            .unwrap();
        assert!(matches!(outcome, PollOutcome::NotStable(_)));
    }
}
