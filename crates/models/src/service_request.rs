use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

/// Lifecycle status of a ride request. `completed` and `cancelled` are
/// terminal; no transition leaves them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ServiceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceStatus::Completed | ServiceStatus::Cancelled)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::Accepted => "accepted",
            ServiceStatus::Completed => "completed",
            ServiceStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub driver_id: Option<i64>,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub status: ServiceStatus,
    pub created_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_by: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Driver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(user::Entity)
                .from(Column::ClientId)
                .to(user::Column::Id)
                .into(),
            Relation::Driver => Entity::belongs_to(user::Entity)
                .from(Column::DriverId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    client_id: i64,
    pickup: (f64, f64),
    destination: (f64, f64),
    created_by: &str,
) -> Result<Model, errors::ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        client_id: Set(client_id),
        driver_id: Set(None),
        pickup_lat: Set(pickup.0),
        pickup_lng: Set(pickup.1),
        destination_lat: Set(destination.0),
        destination_lng: Set(destination.1),
        status: Set(ServiceStatus::Pending),
        created_by: Set(Some(created_by.to_string())),
        created_at: Set(now),
        updated_by: Set(None),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Services where the user appears as client or driver.
pub async fn list_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::ClientId.eq(user_id))
                .add(Column::DriverId.eq(user_id)),
        )
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Conditionally move `id` from `expected` to `next` in one statement.
///
/// The status filter makes this a compare-and-swap: when another request
/// already moved the row, zero rows match and `Ok(None)` is returned, so
/// concurrent transitions cannot both win.
pub async fn transition_status(
    db: &DatabaseConnection,
    id: i64,
    expected: ServiceStatus,
    next: ServiceStatus,
    driver_id: Option<i64>,
    updated_by: &str,
) -> Result<Option<Model>, errors::ModelError> {
    let mut update = Entity::update_many()
        .col_expr(Column::Status, Expr::value(next))
        .col_expr(Column::UpdatedBy, Expr::value(Some(updated_by.to_string())))
        .col_expr(Column::UpdatedAt, Expr::value(DateTimeWithTimeZone::from(Utc::now())));
    if let Some(driver) = driver_id {
        update = update.col_expr(Column::DriverId, Expr::value(Some(driver)));
    }
    let res = update
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(expected))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}
