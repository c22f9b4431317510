use std::sync::Arc;

use tracing::{info, instrument};

use models::ServiceStatus;

use crate::auth::domain::Identity;

use super::domain::{Action, CreateServiceInput, ServiceRequest};
use super::errors::LifecycleError;
use super::repository::LifecycleRepository;

/// Policy knobs for the state machine.
///
/// The legacy system let any client-role caller cancel any service (it
/// never compared the actor to the service's client). That behavior is
/// kept as the default; `enforce_cancel_ownership` restricts cancel to
/// the owning client.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy {
    pub enforce_cancel_ownership: bool,
}

/// State machine over a ride request's status.
///
/// States: pending, accepted, completed, cancelled. Initial: pending.
/// Terminal: completed, cancelled. Who may move what is decided here;
/// the repository only guarantees the swap is atomic.
pub struct ServiceLifecycle<R: LifecycleRepository> {
    repo: Arc<R>,
    policy: LifecyclePolicy,
}

impl<R: LifecycleRepository> ServiceLifecycle<R> {
    pub fn new(repo: Arc<R>, policy: LifecyclePolicy) -> Self {
        Self { repo, policy }
    }

    /// Create a new ride request for `input.client_id`.
    #[instrument(skip(self, input, actor), fields(client_id = input.client_id, actor = %actor.email))]
    pub async fn request(&self, input: CreateServiceInput, actor: &Identity) -> Result<ServiceRequest, LifecycleError> {
        let created = self.repo.create(&input, &actor.email).await?;
        info!(service_id = created.id, client_id = created.client_id, "service_requested");
        Ok(created)
    }

    pub async fn get(&self, service_id: i64) -> Result<ServiceRequest, LifecycleError> {
        self.repo.find(service_id).await?.ok_or(LifecycleError::NotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<ServiceRequest>, LifecycleError> {
        self.repo.list_all().await
    }

    /// Union of services where `user_id` is the client or the driver.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<ServiceRequest>, LifecycleError> {
        self.repo.list_for_user(user_id).await
    }

    /// Apply `action` to `service_id` on behalf of `actor`.
    ///
    /// Guard order matters: the actor's role and ownership are checked
    /// before the status, so a client poking their own service gets
    /// `Forbidden` regardless of its current status. The final write is
    /// a compare-and-swap; losing the race reads as `InvalidTransition`.
    #[instrument(skip(self, actor), fields(actor = %actor.email))]
    pub async fn transition(
        &self,
        service_id: i64,
        action: Action,
        actor: &Identity,
    ) -> Result<ServiceRequest, LifecycleError> {
        let svc = self.repo.find(service_id).await?.ok_or(LifecycleError::NotFound)?;

        let required = action.required_role();
        actor
            .require_role(required)
            .map_err(|_| LifecycleError::Forbidden(format!("only {}s may {} services", required, action)))?;

        let (expected, driver_id) = match action {
            Action::Accept => {
                if svc.client_id == actor.id {
                    return Err(LifecycleError::Forbidden("cannot accept your own service".into()));
                }
                if svc.status != ServiceStatus::Pending {
                    return Err(LifecycleError::InvalidTransition("service already accepted".into()));
                }
                (ServiceStatus::Pending, Some(actor.id))
            }
            Action::Complete => {
                if svc.client_id == actor.id {
                    return Err(LifecycleError::Forbidden("cannot complete your own service".into()));
                }
                if svc.status != ServiceStatus::Accepted {
                    return Err(LifecycleError::InvalidTransition(format!(
                        "cannot complete a {} service",
                        svc.status
                    )));
                }
                (ServiceStatus::Accepted, None)
            }
            Action::Cancel => {
                if self.policy.enforce_cancel_ownership && svc.client_id != actor.id {
                    return Err(LifecycleError::Forbidden(
                        "only the requesting client may cancel".into(),
                    ));
                }
                if svc.status.is_terminal() {
                    return Err(LifecycleError::InvalidTransition(format!(
                        "cannot cancel a {} service",
                        svc.status
                    )));
                }
                (svc.status, None)
            }
        };

        let updated = self
            .repo
            .transition(service_id, expected, action.target(), driver_id, &actor.email)
            .await?
            // Zero rows swapped: someone else moved the status first
            .ok_or_else(|| {
                LifecycleError::InvalidTransition(match action {
                    Action::Accept => "service already accepted".into(),
                    _ => "service status changed concurrently".into(),
                })
            })?;

        info!(
            service_id = updated.id,
            status = %updated.status,
            actor_id = actor.id,
            "service_transitioned"
        );
        Ok(updated)
    }
}
