pub mod approvals;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod comp_off;
pub mod employees;
pub mod holidays;
pub mod leave;
pub mod shared;
