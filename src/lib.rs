use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::AuthService;

use database::repositories::{
    AttendanceRepository, CompOffRepository, EmployeeRepository, HolidayRepository,
    LeaveBalanceRepository, LeaveRepository, RegularizationRepository,
};
use services::TickRunner;

/// Repositories and services shared by every worker, registered as app data.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub auth_service: web::Data<AuthService>,
    pub employees: web::Data<EmployeeRepository>,
    pub attendance: web::Data<AttendanceRepository>,
    pub holidays: web::Data<HolidayRepository>,
    pub leaves: web::Data<LeaveRepository>,
    pub regularizations: web::Data<RegularizationRepository>,
    pub comp_offs: web::Data<CompOffRepository>,
    pub balances: web::Data<LeaveBalanceRepository>,
    pub tick_runner: web::Data<TickRunner<LeaveBalanceRepository>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let employees = EmployeeRepository::new(pool.clone());
        let balances = LeaveBalanceRepository::new(pool.clone());
        let tick_runner = Arc::new(TickRunner::new(balances.clone()));

        Self {
            auth_service: web::Data::new(AuthService::new(employees.clone(), config.clone())),
            config: web::Data::new(config),
            employees: web::Data::new(employees),
            attendance: web::Data::new(AttendanceRepository::new(pool.clone())),
            holidays: web::Data::new(HolidayRepository::new(pool.clone())),
            leaves: web::Data::new(LeaveRepository::new(pool.clone())),
            regularizations: web::Data::new(RegularizationRepository::new(pool.clone())),
            comp_offs: web::Data::new(CompOffRepository::new(pool)),
            balances: web::Data::new(balances),
            tick_runner: web::Data::from(tick_runner),
        }
    }

    /// Shared handle to the tick runner for the background scheduler
    pub fn tick_runner(&self) -> Arc<TickRunner<LeaveBalanceRepository>> {
        self.tick_runner.clone().into_inner()
    }

    /// Registers the app data and the `/hmis` routes.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.employees.clone())
            .app_data(self.attendance.clone())
            .app_data(self.holidays.clone())
            .app_data(self.leaves.clone())
            .app_data(self.regularizations.clone())
            .app_data(self.comp_offs.clone())
            .app_data(self.balances.clone())
            .app_data(self.tick_runner.clone())
            .configure(routes::configure);
    }
}
