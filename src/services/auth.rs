use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::config::Config;
use crate::database::models::{Employee, LoginAction, LoginResponse};
use crate::database::repositories::EmployeeRepository;
use crate::error::AppError;

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // employee id
    pub name: String,
    pub role: String,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn is_manager(&self) -> bool {
        self.role.eq_ignore_ascii_case(ROLE_MANAGER)
    }

    pub fn employee_id(&self) -> &str {
        &self.sub
    }

    pub fn requires_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied("Manager access required".to_string()))
        }
    }

    /// Employees may only touch their own records; managers anyone's.
    pub fn requires_self_or_manager(&self, employee_id: &str) -> Result<(), AppError> {
        if self.sub == employee_id || self.is_manager() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Cannot access another employee's records".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        match decode_token(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(claims)),
            Err(err) => {
                log::warn!("Rejected bearer token: {}", err);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

pub fn generate_token(
    employee: &Employee,
    secret: &str,
    expiration_days: i64,
) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(expiration_days))
        .ok_or_else(|| AppError::internal_server_error_message("token expiry out of range"))?
        .timestamp() as usize;

    let role = if employee.is_manager() {
        ROLE_MANAGER
    } else {
        ROLE_EMPLOYEE
    };

    let claims = Claims {
        sub: employee.employee_id.clone(),
        name: employee.name.clone(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::internal_server_error_message(e.to_string()))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::internal_server_error_message(e.to_string()))
}

#[derive(Clone)]
pub struct AuthService {
    employee_repository: EmployeeRepository,
    config: Config,
}

impl AuthService {
    pub fn new(employee_repository: EmployeeRepository, config: Config) -> Self {
        Self {
            employee_repository,
            config,
        }
    }

    pub async fn login(&self, employee_id: &str, password: &str) -> Result<LoginResponse, AppError> {
        let employee = self
            .employee_repository
            .find_by_employee_id(employee_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(password, &employee.password_hash).unwrap_or(false) {
            log::info!("Failed login for employee {}", employee_id);
            return Err(AppError::Unauthorized);
        }

        // Still on the initial password: no token until it is changed.
        if password == self.config.default_password {
            return Ok(LoginResponse {
                action: LoginAction::ResetPassword,
                employee_id: employee.employee_id,
                name: employee.name,
                department: employee.department,
                token: None,
            });
        }

        let token = generate_token(
            &employee,
            &self.config.jwt_secret,
            self.config.jwt_expiration_days,
        )?;
        let action = if employee.is_manager() {
            LoginAction::ManagerDashboard
        } else {
            LoginAction::EmployeeDashboard
        };

        Ok(LoginResponse {
            action,
            employee_id: employee.employee_id,
            name: employee.name,
            department: employee.department,
            token: Some(token),
        })
    }

    pub async fn reset_password(
        &self,
        employee_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if new_password.len() < 6 || new_password == self.config.default_password {
            return Err(AppError::BadRequest(
                "New password must be at least 6 characters and differ from the default".to_string(),
            ));
        }

        let employee = self
            .employee_repository
            .find_by_employee_id(employee_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(current_password, &employee.password_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let password_hash = hash_password(new_password)?;
        self.employee_repository
            .update_password(&employee.employee_id, &password_hash)
            .await?;

        log::info!("Password reset for employee {}", employee_id);
        Ok(())
    }
}
