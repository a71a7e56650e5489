use actix_web::{HttpResponse, web};

use crate::database::models::{
    RequestCategory, RequestStatus, RequestSummary, RespondToRequestInput,
};
use crate::database::repositories::{
    CompOffRepository, EmployeeRepository, LeaveRepository, RegularizationRepository,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// Newest first by the request's own date; ties keep leave, comp-off,
/// regularization order.
fn newest_first(mut summaries: Vec<RequestSummary>) -> Vec<RequestSummary> {
    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    summaries
}

/// Every request an employee has raised, whatever its status
pub async fn pending_approvals(
    claims: Claims,
    leaves: web::Data<LeaveRepository>,
    comp_offs: web::Data<CompOffRepository>,
    regularizations: web::Data<RegularizationRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    claims.requires_self_or_manager(&employee_id)?;

    let (leaves, comp_offs, regularizations) = futures::try_join!(
        leaves.find_by_employee(&employee_id),
        comp_offs.find_by_employee(&employee_id),
        regularizations.find_by_employee(&employee_id),
    )?;

    let summaries = leaves
        .iter()
        .map(RequestSummary::from)
        .chain(comp_offs.iter().map(RequestSummary::from))
        .chain(regularizations.iter().map(RequestSummary::from))
        .collect();

    Ok(ApiResponse::ok(newest_first(summaries)))
}

/// Pending requests raised by the caller's direct reports
pub async fn manager_team_requests(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    comp_offs: web::Data<CompOffRepository>,
    regularizations: web::Data<RegularizationRepository>,
) -> Result<HttpResponse, AppError> {
    claims.requires_manager()?;

    let reports = employees
        .find_reports(claims.employee_id(), &claims.name)
        .await?;
    let report_ids: Vec<String> = reports.into_iter().map(|e| e.employee_id).collect();

    if report_ids.is_empty() {
        return Ok(ApiResponse::ok(Vec::<RequestSummary>::new()));
    }

    let (leaves, comp_offs, regularizations) = futures::try_join!(
        leaves.find_pending_for(&report_ids),
        comp_offs.find_pending_for(&report_ids),
        regularizations.find_pending_for(&report_ids),
    )?;

    let summaries = leaves
        .iter()
        .map(RequestSummary::from)
        .chain(comp_offs.iter().map(RequestSummary::from))
        .chain(regularizations.iter().map(RequestSummary::from))
        .collect();

    Ok(ApiResponse::ok(newest_first(summaries)))
}

pub async fn respond_to_request(
    claims: Claims,
    leaves: web::Data<LeaveRepository>,
    comp_offs: web::Data<CompOffRepository>,
    regularizations: web::Data<RegularizationRepository>,
    input: web::Json<RespondToRequestInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_manager()?;
    let input = input.into_inner();

    if input.status == RequestStatus::Pending {
        return Err(AppError::BadRequest(
            "status must be approved or rejected".to_string(),
        ));
    }

    let summary = match input.category {
        RequestCategory::Leave => leaves
            .respond(input.request_id, input.status, input.admin_remarks)
            .await?
            .as_ref()
            .map(RequestSummary::from),
        RequestCategory::CompOff => comp_offs
            .respond(input.request_id, input.status, input.admin_remarks)
            .await?
            .as_ref()
            .map(RequestSummary::from),
        RequestCategory::Regularization => regularizations
            .respond(input.request_id, input.status, input.admin_remarks)
            .await?
            .as_ref()
            .map(RequestSummary::from),
    };

    let summary = summary.ok_or_else(|| {
        AppError::NotFound(format!(
            "No pending {} request with id {}",
            input.category, input.request_id
        ))
    })?;

    log::info!(
        "{} request {} {} by {}",
        input.category,
        input.request_id,
        input.status,
        claims.employee_id()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        summary,
        format!("Request {} successfully.", input.status),
    )))
}
