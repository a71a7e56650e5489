use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(auth::login))
        .route("/reset-password", web::post().to(auth::reset_password));
}
