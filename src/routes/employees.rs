use actix_web::web;

use crate::handlers::{employees, holidays};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::post().to(employees::create_employee))
            .route("/profile/{employee_id}", web::get().to(employees::get_profile))
            .route("/details/{employee_id}", web::get().to(employees::get_details)),
    )
    .service(web::scope("/holidays").route("", web::post().to(holidays::create_holiday)));
}
