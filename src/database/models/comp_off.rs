use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RequestStatus;

/// Days a comp-off stays usable after it is awarded.
pub const COMP_OFF_VALIDITY_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompOff {
    pub id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub days: f64,
    pub reason: String,
    pub work_date: NaiveDate,
    pub awarded_by: String,
    pub awarded_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: RequestStatus,
    pub admin_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompOffInput {
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub days: Option<f64>,
    pub reason: String,
    pub work_date: NaiveDate,
    pub awarded_by: String,
    pub expiry_date: Option<NaiveDate>,
}
