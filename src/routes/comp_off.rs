use actix_web::web;

use crate::handlers::comp_off;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/compoff").route("/apply", web::post().to(comp_off::apply_comp_off)));
}
