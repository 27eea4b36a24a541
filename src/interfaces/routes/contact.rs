use actix_web::web;

use crate::handlers::submissions;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(submissions::create_submission))
            // Anything but POST on the intake resource is a 405
            .default_service(web::route().to(submissions::method_not_allowed)),
    );
}
