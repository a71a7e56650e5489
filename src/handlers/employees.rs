use actix_web::{HttpResponse, web};

use crate::config::Config;
use crate::database::models::{EmployeeDates, EmployeeInput};
use crate::database::repositories::{EmployeeRepository, LeaveBalanceRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::auth::hash_password;

pub async fn get_profile(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    claims.requires_self_or_manager(&employee_id)?;

    let employee = employees
        .find_by_employee_id(&employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(ApiResponse::ok(employee))
}

pub async fn get_details(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    claims.requires_self_or_manager(&employee_id)?;

    let employee = employees
        .find_by_employee_id(&employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(ApiResponse::ok(EmployeeDates::from(&employee)))
}

/// Onboards an employee with the default password and a fresh leave
/// accumulator.
pub async fn create_employee(
    claims: Claims,
    config: web::Data<Config>,
    employees: web::Data<EmployeeRepository>,
    balances: web::Data<LeaveBalanceRepository>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_manager()?;
    let input = input.into_inner();

    if input.employee_id.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "employeeId and name are required".to_string(),
        ));
    }
    if employees.find_by_employee_id(&input.employee_id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Employee {} already exists",
            input.employee_id
        )));
    }

    let password_hash = hash_password(&config.default_password)?;
    let employee = employees.create(input, &password_hash).await?;
    balances.seed_missing().await?;

    log::info!(
        "Employee {} created by {}",
        employee.employee_id,
        claims.employee_id()
    );

    Ok(ApiResponse::created(employee, "Employee created successfully"))
}
