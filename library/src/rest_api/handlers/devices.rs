use crate::{
    common::{validate_mac, RegisterDevice, StatusResponse},
    registry::Registry,
    ServiceError,
};
use actix_web::{web, HttpResponse};

pub async fn register_device(
    web::Json(body): web::Json<RegisterDevice>,
    registry: web::Data<Registry>,
) -> Result<HttpResponse, ServiceError> {
    let mac = validate_mac(&body.mac)?;
    let registration = registry
        .register_device(mac, body.nickname, body.danger_threshold)
        .await?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok(Some(registration))))
}
