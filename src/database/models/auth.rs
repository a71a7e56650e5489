use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub employee_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub employee_id: String,
    pub current_password: String,
    pub new_password: String,
}

/// Where the client should route the user after login
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginAction {
    ResetPassword,
    ManagerDashboard,
    EmployeeDashboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub action: LoginAction,
    pub employee_id: String,
    pub name: String,
    pub department: Option<String>,
    /// Absent when the password must be reset first
    pub token: Option<String>,
}
