use actix_web::web;

pub mod approvals;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod comp_off;
pub mod employees;
pub mod leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/hmis")
            .configure(auth::configure)
            .configure(attendance::configure)
            .configure(calendar::configure)
            .configure(leave::configure)
            .configure(comp_off::configure)
            .configure(approvals::configure)
            .configure(employees::configure),
    );
}
