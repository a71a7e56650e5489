use actix_web::web;

use crate::handlers::calendar;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/calendar").route("/data", web::get().to(calendar::get_calendar_data)),
    );
}
