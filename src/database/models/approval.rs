use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CompOff, LeaveRequest, Regularization, RequestStatus, macros::string_enum};

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum RequestCategory {
        Leave => "Leave",
        #[serde(rename = "Comp Off")]
        CompOff => "Comp Off",
        Regularization => "Regularization",
    }
}

/// Flattened view of any request kind, used by the approval lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: Uuid,
    pub employee_id: String,
    pub category: RequestCategory,
    pub title: &'static str,
    pub sub_type: String,
    pub date: NaiveDate,
    pub status: RequestStatus,
    pub reason: String,
}

impl From<&LeaveRequest> for RequestSummary {
    fn from(leave: &LeaveRequest) -> Self {
        Self {
            id: leave.id,
            employee_id: leave.employee_id.clone(),
            category: RequestCategory::Leave,
            title: "Leave Request",
            sub_type: leave.leave_type.clone(),
            date: leave.from_date,
            status: leave.status,
            reason: leave.reason.clone(),
        }
    }
}

impl From<&CompOff> for RequestSummary {
    fn from(comp_off: &CompOff) -> Self {
        Self {
            id: comp_off.id,
            employee_id: comp_off.employee_id.clone(),
            category: RequestCategory::CompOff,
            title: "Comp-Off Request",
            sub_type: "N/A".to_string(),
            date: comp_off.work_date,
            status: comp_off.status,
            reason: comp_off.reason.clone(),
        }
    }
}

impl From<&Regularization> for RequestSummary {
    fn from(regularization: &Regularization) -> Self {
        Self {
            id: regularization.id,
            employee_id: regularization.employee_id.clone(),
            category: RequestCategory::Regularization,
            title: "Regularization Request",
            sub_type: regularization.request_type.clone(),
            date: regularization.date,
            status: regularization.status,
            reason: regularization.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondToRequestInput {
    pub request_id: Uuid,
    pub category: RequestCategory,
    pub status: RequestStatus,
    pub admin_remarks: Option<String>,
}
