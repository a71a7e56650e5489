use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// One employee's attendance for one day. `date` is the office-local
/// calendar day, normalized when the record is written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub employee_id: String,
    pub date: NaiveDate,
    /// "HH:MM" in office-local time
    pub login_time: String,
    pub logout_time: Option<String>,
    pub status: AttendanceStatus,
    pub location_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInInput {
    pub employee_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutInput {
    pub employee_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInResult {
    pub status: AttendanceStatus,
    pub login_time: String,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutResult {
    pub final_status: AttendanceStatus,
    pub logout_time: String,
    pub hours_worked: f64,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum AttendanceStatus {
        Present => "Present",
        Complete => "Complete",
        Late => "Late",
        Absent => "Absent",
        #[serde(rename = "Late-Complete")]
        LateComplete => "Late-Complete",
        #[serde(rename = "leave")]
        Leave => "leave",
    }
}
