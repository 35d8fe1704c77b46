use actix_web::web;

use crate::{constants::API_PREFIX, handlers::{home::home, uploads::serve_media}};

mod admin;
mod auth;
mod json_error;
mod public;

pub use json_error::{multipart_config, JsonError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.route("/", web::get().to(home));
    cfg.route("/uploads/{bucket}/{file}", web::get().to(serve_media));

    cfg.service(
        web::scope(API_PREFIX)
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(public::config_routes),
    );
}
