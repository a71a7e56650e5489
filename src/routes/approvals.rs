use actix_web::web;

use crate::handlers::approvals;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/approvals")
            .route(
                "/pending-approvals/{employee_id}",
                web::get().to(approvals::pending_approvals),
            )
            .route(
                "/manager-team-requests",
                web::get().to(approvals::manager_team_requests),
            )
            .route(
                "/respond-to-request",
                web::post().to(approvals::respond_to_request),
            ),
    );
}
