use actix_web::web;

use crate::handlers::{home::home, json_error::not_found, system::health_check};

mod contact;
mod json_error;
mod submissions;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(contact::config_routes)
            .configure(submissions::config_routes),
    );

    cfg.configure(json_error::config_routes);

    cfg.default_service(web::route().to(not_found));
}
