use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use models::{Role, ServiceStatus};

/// One ride request as the business layer sees it.
///
/// Invariant: `driver_id` is set iff status is accepted or completed,
/// and is never the client's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub client_id: i64,
    pub driver_id: Option<i64>,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub status: ServiceStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<FixedOffset>,
}

/// Creation input (status starts at pending, no driver).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceInput {
    pub client_id: i64,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
}

/// The three caller-triggered transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Accept,
    Complete,
    Cancel,
}

impl Action {
    /// Role the actor's token must carry for this action.
    pub fn required_role(&self) -> Role {
        match self {
            Action::Accept | Action::Complete => Role::Driver,
            Action::Cancel => Role::Client,
        }
    }

    /// Status the service ends up in when the action succeeds.
    pub fn target(&self) -> ServiceStatus {
        match self {
            Action::Accept => ServiceStatus::Accepted,
            Action::Complete => ServiceStatus::Completed,
            Action::Cancel => ServiceStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Accept => "accept",
            Action::Complete => "complete",
            Action::Cancel => "cancel",
        };
        f.write_str(s)
    }
}
