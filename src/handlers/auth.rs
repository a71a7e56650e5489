use actix_web::{HttpResponse, web};

use crate::database::models::{LoginAction, LoginRequest, ResetPasswordRequest};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::AuthService;

pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let response = auth_service
        .login(&request.employee_id, &request.password)
        .await?;

    let message = match response.action {
        LoginAction::ResetPassword => "Password reset required",
        _ => "Login successful",
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(response, message)))
}

pub async fn reset_password(
    auth_service: web::Data<AuthService>,
    request: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    auth_service
        .reset_password(
            &request.employee_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        (),
        "Password updated successfully",
    )))
}
