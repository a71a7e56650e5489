use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RequestStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Regularization {
    pub id: Uuid,
    pub employee_id: String,
    pub date: NaiveDate,
    /// e.g. "on_duty", "work_from_home"
    pub request_type: String,
    pub reason: String,
    pub status: RequestStatus,
    pub admin_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularizationInput {
    pub employee_id: String,
    pub date: NaiveDate,
    pub request_type: String,
    pub reason: String,
}
