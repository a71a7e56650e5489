pub(crate) mod macros;

pub mod approval;
pub mod attendance;
pub mod auth;
pub mod comp_off;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod leave_balance;
pub mod regularization;

// Re-export all models for easy importing
pub use approval::*;
pub use attendance::*;
pub use auth::*;
pub use comp_off::*;
pub use employee::*;
pub use holiday::*;
pub use leave::*;
pub use leave_balance::*;
pub use regularization::*;
