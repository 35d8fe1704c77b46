use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/refresh-token", web::post().to(auth::refresh_token))
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me)),
    );
}
