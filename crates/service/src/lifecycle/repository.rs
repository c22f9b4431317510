use async_trait::async_trait;

use models::ServiceStatus;

use super::domain::{CreateServiceInput, ServiceRequest};
use super::errors::LifecycleError;

/// Repository abstraction for ride-request persistence.
///
/// `transition` is the concurrency-bearing operation: implementations
/// must apply the status change as an atomic compare-and-swap and
/// return `Ok(None)` when the row was not in `expected` status anymore.
#[async_trait]
pub trait LifecycleRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<ServiceRequest>, LifecycleError>;
    async fn create(&self, input: &CreateServiceInput, created_by: &str) -> Result<ServiceRequest, LifecycleError>;
    async fn transition(
        &self,
        id: i64,
        expected: ServiceStatus,
        next: ServiceStatus,
        driver_id: Option<i64>,
        updated_by: &str,
    ) -> Result<Option<ServiceRequest>, LifecycleError>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ServiceRequest>, LifecycleError>;
    async fn list_all(&self) -> Result<Vec<ServiceRequest>, LifecycleError>;
}

/// In-memory mock with real compare-and-swap semantics (single mutex),
/// good enough to exercise the concurrent-accept property in tests.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockLifecycleRepository {
        services: Mutex<BTreeMap<i64, ServiceRequest>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl LifecycleRepository for MockLifecycleRepository {
        async fn find(&self, id: i64) -> Result<Option<ServiceRequest>, LifecycleError> {
            Ok(self.services.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, input: &CreateServiceInput, created_by: &str) -> Result<ServiceRequest, LifecycleError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let now = Utc::now().into();
            let svc = ServiceRequest {
                id: *next_id,
                client_id: input.client_id,
                driver_id: None,
                pickup_lat: input.pickup_lat,
                pickup_lng: input.pickup_lng,
                destination_lat: input.destination_lat,
                destination_lng: input.destination_lng,
                status: ServiceStatus::Pending,
                created_by: Some(created_by.to_string()),
                created_at: now,
                updated_by: None,
                updated_at: now,
            };
            self.services.lock().unwrap().insert(svc.id, svc.clone());
            Ok(svc)
        }

        async fn transition(
            &self,
            id: i64,
            expected: ServiceStatus,
            next: ServiceStatus,
            driver_id: Option<i64>,
            updated_by: &str,
        ) -> Result<Option<ServiceRequest>, LifecycleError> {
            let mut services = self.services.lock().unwrap();
            match services.get_mut(&id) {
                Some(svc) if svc.status == expected => {
                    svc.status = next;
                    if driver_id.is_some() {
                        svc.driver_id = driver_id;
                    }
                    svc.updated_by = Some(updated_by.to_string());
                    svc.updated_at = Utc::now().into();
                    Ok(Some(svc.clone()))
                }
                // Row exists but the status moved, or no row at all:
                // either way the swap did not happen
                _ => Ok(None),
            }
        }

        async fn list_for_user(&self, user_id: i64) -> Result<Vec<ServiceRequest>, LifecycleError> {
            let services = self.services.lock().unwrap();
            Ok(services
                .values()
                .filter(|s| s.client_id == user_id || s.driver_id == Some(user_id))
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<ServiceRequest>, LifecycleError> {
            Ok(self.services.lock().unwrap().values().cloned().collect())
        }
    }
}
