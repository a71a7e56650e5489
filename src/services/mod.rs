pub mod accrual;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod leave_calculator;
pub mod scheduler;

pub use auth::{AuthService, Claims};
pub use scheduler::{BalanceStore, TickRunner};

/// Rejection raised by the pure leave and calendar engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
