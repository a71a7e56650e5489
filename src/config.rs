use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    /// Maximum distance from the office, in meters, accepted at clock-in.
    pub geofence_radius_meters: f64,
    /// Offset applied to UTC to get the office's wall-clock time (330 = IST).
    pub attendance_utc_offset_minutes: i32,
    /// Password given to new employees; logging in with it forces a reset.
    pub default_password: String,
    pub scheduler_enabled: bool,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let port = var_or("PORT", "3002")
            .parse()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            database_url: var_or("DATABASE_URL", "postgres://@localhost:5432/hmis"),
            jwt_secret: var_or(
                "JWT_SECRET",
                "your-super-secret-jwt-key-change-this-in-production-12345",
            ),
            jwt_expiration_days: parse_or("JWT_EXPIRATION_DAYS", 30),
            host: var_or("HOST", "127.0.0.1"),
            port,
            environment: var_or("ENVIRONMENT", "development"),
            client_base_url: var_or("CLIENT_BASE_URL", "http://localhost:3000"),
            geofence_radius_meters: parse_or("GEOFENCE_RADIUS_METERS", 500.0),
            attendance_utc_offset_minutes: parse_or("ATTENDANCE_UTC_OFFSET_MINUTES", 330),
            default_password: var_or("DEFAULT_PASSWORD", "12345"),
            scheduler_enabled: parse_or("SCHEDULER_ENABLED", true),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
