pub mod attendance;
pub mod comp_off;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod leave_balance;
pub mod regularization;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use comp_off::CompOffRepository;
pub use employee::EmployeeRepository;
pub use holiday::HolidayRepository;
pub use leave::LeaveRepository;
pub use leave_balance::LeaveBalanceRepository;
pub use regularization::RegularizationRepository;
