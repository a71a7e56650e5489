use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::{Gender, LeaveRequestInput, RegularizationInput};
use crate::database::repositories::{
    EmployeeRepository, LeaveBalanceRepository, LeaveRepository, RegularizationRepository,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Claims, TickRunner};
use crate::services::accrual::AccrualPeriod;
use crate::services::leave_calculator::{LeaveBalance, compute_balance};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub employee_id: String,
    pub name: String,
    pub gender: Gender,
    pub date_of_joining: Option<NaiveDate>,
    pub leave_balance: LeaveBalance,
}

#[derive(Debug, Deserialize)]
pub struct AccrualRunInput {
    pub year: i32,
    pub month: u32,
}

/// Accrued-to-date balances net of approved leave
pub async fn get_balances(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    claims.requires_self_or_manager(&employee_id)?;

    let employee = employees
        .find_by_employee_id(&employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let used = leaves.used_days(&employee.employee_id).await?;
    let gender = employee.gender();
    let leave_balance = compute_balance(employee.date_of_joining, gender, &used)?;

    Ok(ApiResponse::ok(BalanceResponse {
        employee_id: employee.employee_id,
        name: employee.name,
        gender,
        date_of_joining: employee.date_of_joining,
        leave_balance,
    }))
}

pub async fn apply_leave(
    claims: Claims,
    leaves: web::Data<LeaveRepository>,
    input: web::Json<LeaveRequestInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    claims.requires_self_or_manager(&input.employee_id)?;

    if !(input.total_days > 0.0) {
        return Err(AppError::BadRequest(
            "totalDays must be greater than zero".to_string(),
        ));
    }
    if input.to_date.is_some_and(|to| to < input.from_date) {
        return Err(AppError::BadRequest(
            "toDate cannot be before fromDate".to_string(),
        ));
    }

    let request = leaves.create_request(input).await?;
    let message = format!(
        "Leave application for {} day(s) submitted successfully. Waiting for approval.",
        request.total_days
    );

    Ok(ApiResponse::created(request, message))
}

pub async fn regularize(
    claims: Claims,
    regularizations: web::Data<RegularizationRepository>,
    input: web::Json<RegularizationInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    claims.requires_self_or_manager(&input.employee_id)?;

    if input.request_type.trim().is_empty() || input.reason.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Missing required fields for regularization request".to_string(),
        ));
    }

    let request = regularizations.create_request(input).await?;
    let message = format!(
        "Regularization request for {} submitted successfully. Waiting for approval.",
        request.request_type.replace('_', " ")
    );

    Ok(ApiResponse::created(request, message))
}

/// Runs the stored-balance ticks due for a period. Safe to repeat: periods
/// already applied are skipped.
pub async fn run_accrual(
    claims: Claims,
    runner: web::Data<TickRunner<LeaveBalanceRepository>>,
    balances: web::Data<LeaveBalanceRepository>,
    input: web::Json<AccrualRunInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_manager()?;

    let period = AccrualPeriod::new(input.year, input.month)?;
    balances.seed_missing().await?;

    log::info!("Leave ticks for {} triggered by {}", period, claims.employee_id());
    let reports = runner.run_period(period).await?;

    Ok(ApiResponse::ok(reports))
}
