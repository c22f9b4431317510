use sea_orm::DatabaseConnection;

use models::service_request;
use models::ServiceStatus;

use crate::lifecycle::domain::{CreateServiceInput, ServiceRequest};
use crate::lifecycle::errors::LifecycleError;
use crate::lifecycle::repository::LifecycleRepository;

pub struct SeaOrmLifecycleRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: service_request::Model) -> ServiceRequest {
    ServiceRequest {
        id: m.id,
        client_id: m.client_id,
        driver_id: m.driver_id,
        pickup_lat: m.pickup_lat,
        pickup_lng: m.pickup_lng,
        destination_lat: m.destination_lat,
        destination_lng: m.destination_lng,
        status: m.status,
        created_by: m.created_by,
        created_at: m.created_at,
        updated_by: m.updated_by,
        updated_at: m.updated_at,
    }
}

#[async_trait::async_trait]
impl LifecycleRepository for SeaOrmLifecycleRepository {
    async fn find(&self, id: i64) -> Result<Option<ServiceRequest>, LifecycleError> {
        let res = service_request::find_by_id(&self.db, id)
            .await
            .map_err(|e| LifecycleError::Repository(e.to_string()))?;
        Ok(res.map(to_domain))
    }

    async fn create(&self, input: &CreateServiceInput, created_by: &str) -> Result<ServiceRequest, LifecycleError> {
        let created = service_request::create(
            &self.db,
            input.client_id,
            (input.pickup_lat, input.pickup_lng),
            (input.destination_lat, input.destination_lng),
            created_by,
        )
        .await
        .map_err(|e| LifecycleError::Repository(e.to_string()))?;
        Ok(to_domain(created))
    }

    async fn transition(
        &self,
        id: i64,
        expected: ServiceStatus,
        next: ServiceStatus,
        driver_id: Option<i64>,
        updated_by: &str,
    ) -> Result<Option<ServiceRequest>, LifecycleError> {
        let res = service_request::transition_status(&self.db, id, expected, next, driver_id, updated_by)
            .await
            .map_err(|e| LifecycleError::Repository(e.to_string()))?;
        Ok(res.map(to_domain))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ServiceRequest>, LifecycleError> {
        let res = service_request::list_for_user(&self.db, user_id)
            .await
            .map_err(|e| LifecycleError::Repository(e.to_string()))?;
        Ok(res.into_iter().map(to_domain).collect())
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, LifecycleError> {
        let res = service_request::list_all(&self.db)
            .await
            .map_err(|e| LifecycleError::Repository(e.to_string()))?;
        Ok(res.into_iter().map(to_domain).collect())
    }
}
