use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::database::repositories::{
    AttendanceRepository, HolidayRepository, LeaveRepository, RegularizationRepository,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::calendar::{merge_calendar, month_bounds};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub employee_id: String,
    pub month: u32,
    pub year: i32,
}

/// Merged month view of holidays, approved leaves and regularizations, and
/// attendance for one employee.
pub async fn get_calendar_data(
    claims: Claims,
    attendance: web::Data<AttendanceRepository>,
    holidays: web::Data<HolidayRepository>,
    leaves: web::Data<LeaveRepository>,
    regularizations: web::Data<RegularizationRepository>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    claims.requires_self_or_manager(&query.employee_id)?;

    let (first, last) = month_bounds(query.month, query.year)?;
    let employee_id = query.employee_id.as_str();

    let (attendance, holidays, leaves, regularizations) = futures::try_join!(
        attendance.find_between(employee_id, first, last),
        holidays.find_between(first, last),
        leaves.find_approved_overlapping(employee_id, first, last),
        regularizations.find_approved_between(employee_id, first, last),
    )?;

    let summary = merge_calendar(
        query.month,
        query.year,
        &attendance,
        &holidays,
        &leaves,
        &regularizations,
    )?;

    Ok(ApiResponse::ok(summary))
}
