use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    pub designation: String,
    pub department: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
    pub reporting_manager: Option<String>,
    /// Office coordinates used for the clock-in geofence
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_rotational: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_manager(&self) -> bool {
        self.designation.to_lowercase().contains("manager")
    }

    pub fn office_location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn gender(&self) -> Gender {
        Gender::from_optional(self.gender.as_deref())
    }
}

/// Birthday and work anniversary for the dashboard celebration widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeDates {
    pub dob: Option<NaiveDate>,
    pub doj: Option<NaiveDate>,
}

impl From<&Employee> for EmployeeDates {
    fn from(employee: &Employee) -> Self {
        Self {
            dob: employee.date_of_birth,
            doj: employee.date_of_joining,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    pub designation: String,
    pub department: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
    pub reporting_manager: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_rotational: bool,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

impl Gender {
    /// Missing or unrecognised values fall back to `Male`, i.e. the
    /// non-female leave rules.
    pub fn from_optional(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Gender::Male)
    }

    pub fn is_female(&self) -> bool {
        matches!(self, Gender::Female)
    }
}
