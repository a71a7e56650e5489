use actix_web::web;

use crate::handlers::leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            .route("/balances/{employee_id}", web::get().to(leave::get_balances))
            .route("/apply", web::post().to(leave::apply_leave))
            .route("/regularize", web::post().to(leave::regularize))
            .route("/accrual/run", web::post().to(leave::run_accrual)),
    );
}
