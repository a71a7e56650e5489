use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::config::Config;
use crate::database::models::CompOffInput;
use crate::database::repositories::CompOffRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::attendance::OfficeClock;

pub async fn apply_comp_off(
    claims: Claims,
    config: web::Data<Config>,
    comp_offs: web::Data<CompOffRepository>,
    input: web::Json<CompOffInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    claims.requires_self_or_manager(&input.employee_id)?;

    if input.days.is_some_and(|days| !(days > 0.0)) {
        return Err(AppError::BadRequest("days must be greater than zero".to_string()));
    }

    let awarded_date = OfficeClock::new(config.attendance_utc_offset_minutes).local_day(Utc::now());
    let comp_off = comp_offs.create_request(input, awarded_date).await?;

    Ok(ApiResponse::created(
        comp_off,
        "Comp-off request submitted successfully. Waiting for approval.",
    ))
}
