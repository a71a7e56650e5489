use actix_web::{HttpResponse, web};
use chrono::{Duration, Utc};

use crate::config::Config;
use crate::database::models::{ClockInInput, ClockInResult, ClockOutInput, ClockOutResult};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::attendance::{
    OfficeClock, ShiftWindow, clock_in_status, clock_out_status, distance_meters, format_clock,
    hours_worked, parse_clock, within_geofence, worked_since,
};

pub async fn clock_in(
    claims: Claims,
    config: web::Data<Config>,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    input: web::Json<ClockInInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    claims.requires_self_or_manager(&input.employee_id)?;

    let employee = employees
        .find_by_employee_id(&input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let (office_lat, office_lon) = employee
        .office_location()
        .ok_or_else(|| AppError::BadRequest("Office location not set".to_string()))?;

    let distance = distance_meters(input.latitude, input.longitude, office_lat, office_lon);
    if !within_geofence(distance, config.geofence_radius_meters) {
        log::info!(
            "Clock-in rejected for {}: {:.0} m from the office",
            employee.employee_id,
            distance
        );
        return Err(AppError::BadRequest("You are out of location".to_string()));
    }

    let clock = OfficeClock::new(config.attendance_utc_offset_minutes);
    let now = Utc::now();
    let status = clock_in_status(
        clock.local_time(now),
        ShiftWindow::for_employee(employee.is_rotational),
    );
    let login_time = format_clock(clock.local_time(now));

    let record = attendance
        .clock_in(
            &employee.employee_id,
            clock.local_day(now),
            login_time,
            status,
            true,
        )
        .await?;

    let result = ClockInResult {
        status: record.status,
        login_time: record.login_time,
        distance_meters: distance.round(),
    };
    let message = format!("Clocked in successfully. Status: {}", result.status);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(result, message)))
}

pub async fn clock_out(
    claims: Claims,
    config: web::Data<Config>,
    attendance: web::Data<AttendanceRepository>,
    input: web::Json<ClockOutInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    claims.requires_self_or_manager(&input.employee_id)?;

    let clock = OfficeClock::new(config.attendance_utc_offset_minutes);
    let now = Utc::now();
    let today = clock.local_day(now);

    // yesterday's record is still open for shifts that cross midnight
    let record = attendance
        .find_open(&input.employee_id, today - Duration::days(1))
        .await?
        .ok_or_else(|| AppError::NotFound("No active clock-in record found".to_string()))?;

    let login_time = parse_clock(&record.login_time).ok_or_else(|| {
        AppError::internal_server_error_message(format!(
            "Stored login time {:?} is not HH:MM",
            record.login_time
        ))
    })?;

    let worked = worked_since(record.date, login_time, clock.local_datetime(now));
    let final_status = clock_out_status(record.status, worked);
    let logout_time = format_clock(clock.local_time(now));

    let updated = attendance
        .clock_out(record.id, &logout_time, final_status)
        .await?;

    let result = ClockOutResult {
        final_status: updated.status,
        logout_time,
        hours_worked: hours_worked(worked),
    };
    let message = format!(
        "Clocked out successfully. Total hours: {:.2}",
        result.hours_worked
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(result, message)))
}
