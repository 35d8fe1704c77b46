use actix_web::{web, HttpResponse, Responder};

use crate::{constants::API_PREFIX, AppState};

pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to the {} API", state.config.site_name),
        "status": "Ok",
        "name": state.config.name,
        "version": env!("CARGO_PKG_VERSION"),
        "api": API_PREFIX,
    }))
}
