use actix_web::web;

use crate::handlers::submissions;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profiles/{profile_id}/submissions")
            .route(web::get().to(submissions::list_submissions)),
    );

    cfg.service(
        web::scope("/submissions")
            .service(
                web::resource("/{id}")
                    .route(web::get().to(submissions::get_submission))
                    .route(web::delete().to(submissions::delete_submission)),
            )
            .service(
                web::resource("/{id}/read")
                    .route(web::patch().to(submissions::mark_submission_read)),
            ),
    );
}
