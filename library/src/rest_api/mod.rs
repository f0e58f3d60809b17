use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

pub mod handlers;
use handlers::{devices, readings};

use crate::templates;

pub fn rest_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(templates::root)))
        .service(web::resource("/docs").route(web::get().to(templates::docs)))
        .service(
            web::scope("/register")
                .service(
                    web::resource("/device")
                        .app_data(json_config())
                        .route(web::post().to(devices::register_device)),
                )
                .service(
                    web::resource("/reading")
                        .app_data(json_config())
                        .route(web::post().to(readings::register_reading)),
                ),
        )
        .service(
            web::scope("/select").service(
                web::resource("/readings")
                    .app_data(json_config())
                    .route(web::post().to(readings::select_readings)),
            ),
        );
}

/// Undecodable bodies are answered with 422 and the parser's complaint
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::UnprocessableEntity().json(json!({ "detail": detail })),
        )
        .into()
    })
}
