//! Service error and conversions from the store, client and runtime errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use failure::Fail;
use serde_json::json;

#[derive(Debug, Fail)]
pub enum ServiceError {
    /// No device is registered under the mac.
    #[fail(display = "device {} not found", mac)]
    DeviceNotFound { mac: String },

    /// The request body was syntactically valid but unusable.
    #[fail(display = "{}", _0)]
    InvalidRequest(String),

    /// The backing store could not be reached or rejected the operation.
    #[fail(display = "store error: {}", _0)]
    Store(String),

    #[fail(display = "configuration error: {}", _0)]
    Config(String),
}

impl ServiceError {
    pub fn not_found<M: Into<String>>(mac: M) -> Self {
        ServiceError::DeviceNotFound { mac: mac.into() }
    }

    /// Name the device the way the caller spelled it, not the normalised lookup key.
    pub fn reported_as(self, submitted: &str) -> Self {
        match self {
            ServiceError::DeviceNotFound { .. } => ServiceError::not_found(submitted),
            other => other,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DeviceNotFound { .. } => StatusCode::NOT_ACCEPTABLE,
            ServiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Store(_) | ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            log::error!("{}", self);
            "Internal Server Error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "detail": detail }))
    }
}

macro_rules! store_error {
    ($type_:ty, $context:expr) => {
        impl From<$type_> for ServiceError {
            fn from(error: $type_) -> Self {
                ServiceError::Store(format!("{}: {}", $context, error))
            }
        }
    };
}

store_error!(diesel::result::Error, "query failed");
store_error!(r2d2::Error, "connection pool");
store_error!(diesel_migrations::RunMigrationsError, "migrations failed");
store_error!(actix::MailboxError, "store actor unavailable");
store_error!(awc::error::SendRequestError, "request failed");
store_error!(awc::error::JsonPayloadError, "bad response body");
store_error!(awc::error::PayloadError, "bad response body");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_acceptable() {
        let error = ServiceError::not_found("AA:BB:CC");
        assert_eq!(error.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(error.to_string(), "device AA:BB:CC not found");
    }

    #[test]
    fn not_found_reports_the_submitted_mac() {
        let error = ServiceError::not_found("AA:BB:CC").reported_as(" AA:BB:CC ");
        assert_eq!(error.to_string(), "device  AA:BB:CC  not found");

        let error = ServiceError::Store("down".into()).reported_as(" AA:BB:CC ");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let error = ServiceError::from(diesel::result::Error::NotFound);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_request_is_unprocessable() {
        let error = ServiceError::InvalidRequest("mac must not be empty".into());
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
