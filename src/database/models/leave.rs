use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum LeaveType {
        El => "EL",
        Cl => "CL",
        Sl => "SL",
        Mml => "MML",
        Ml => "ML",
        Pl => "PL",
        Bl => "BL",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum RequestStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    /// Uppercase leave code. Kept as text so legacy codes still render.
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_days: f64,
    pub reason: String,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub admin_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    #[serde(deserialize_with = "leave_type_any_case")]
    pub leave_type: LeaveType,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub total_days: f64,
    pub reason: Option<String>,
    pub description: Option<String>,
}

/// Accepts leave codes in any case ("el", "El", "EL").
fn leave_type_any_case<'de, D>(deserializer: D) -> Result<LeaveType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Sum of approved `total_days` for one leave code.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsedLeaveRow {
    pub leave_type: String,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn leave_input_accepts_lowercase_codes() {
        let input: LeaveRequestInput = serde_json::from_value(json!({
            "employeeId": "EMP001",
            "leaveType": "el",
            "fromDate": "2024-05-06",
            "totalDays": 1.0
        }))
        .unwrap();

        assert_eq!(input.leave_type, LeaveType::El);
        assert_eq!(input.leave_type.to_string(), "EL");
    }

    #[test]
    fn leave_input_rejects_unknown_codes() {
        let result = serde_json::from_value::<LeaveRequestInput>(json!({
            "employeeId": "EMP001",
            "leaveType": "XL",
            "fromDate": "2024-05-06",
            "totalDays": 1.0
        }));

        assert!(result.is_err());
    }
}
