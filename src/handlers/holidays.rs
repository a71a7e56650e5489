use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::repositories::HolidayRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

#[derive(Debug, Deserialize)]
pub struct HolidayInput {
    pub date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_holiday(
    claims: Claims,
    holidays: web::Data<HolidayRepository>,
    input: web::Json<HolidayInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_manager()?;

    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Holiday name is required".to_string()));
    }

    let holiday = holidays
        .create(input.date, input.name.trim(), input.description.as_deref())
        .await?;

    Ok(ApiResponse::created(holiday, "Holiday added"))
}
