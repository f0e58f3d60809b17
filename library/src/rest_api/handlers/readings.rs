use crate::{
    common::{validate_mac, ReadingsResponse, RegisterReading, SelectReadings, StatusResponse},
    registry::Registry,
    ServiceError,
};
use actix_web::{web, HttpResponse};

pub async fn register_reading(
    web::Json(body): web::Json<RegisterReading>,
    registry: web::Data<Registry>,
) -> Result<HttpResponse, ServiceError> {
    let mac = validate_mac(&body.mac)?;
    registry
        .register_reading(mac, body.reading)
        .await
        .map_err(|e| e.reported_as(&body.mac))?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok(None)))
}

pub async fn select_readings(
    web::Json(body): web::Json<SelectReadings>,
    registry: web::Data<Registry>,
) -> Result<HttpResponse, ServiceError> {
    let mac = validate_mac(&body.mac)?;
    let result = registry
        .select_readings(mac)
        .await
        .map_err(|e| e.reported_as(&body.mac))?;
    Ok(HttpResponse::Ok().json(ReadingsResponse { result }))
}
