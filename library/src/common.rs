//! Request and response bodies shared by the REST api and the command line client.
use crate::db::model::Reading;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterDevice {
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(
        default,
        rename = "dangerThreshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub danger_threshold: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterReading {
    pub mac: String,
    pub reading: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectReadings {
    pub mac: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Fail,
}

/// Outcome of a device registration
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registration {
    Found,
    Created,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    pub message: Option<Registration>,
}

impl StatusResponse {
    pub fn ok(message: Option<Registration>) -> Self {
        StatusResponse {
            status: Status::Ok,
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceReadings {
    pub mac: String,
    pub readings: Vec<Reading>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadingsResponse {
    pub result: Vec<DeviceReadings>,
}

/// Error body returned for every non-2xx response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Blank macs never reach the store.
pub fn validate_mac(mac: &str) -> Result<&str, crate::ServiceError> {
    let mac = mac.trim();
    if mac.is_empty() {
        return Err(crate::ServiceError::InvalidRequest(
            "mac must not be empty".to_owned(),
        ));
    }
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_device_accepts_camel_case_threshold() {
        let req: RegisterDevice = serde_json::from_value(json!({
            "mac": "AA:BB:CC",
            "dangerThreshold": 12.5
        }))
        .unwrap();
        assert_eq!(req.danger_threshold, Some(12.5));
        assert_eq!(req.nickname, None);
    }

    #[test]
    fn status_response_serializes_null_message() {
        let body = serde_json::to_value(StatusResponse::ok(None)).unwrap();
        assert_eq!(body, json!({ "status": "ok", "message": null }));

        let body = serde_json::to_value(StatusResponse::ok(Some(Registration::Created))).unwrap();
        assert_eq!(body, json!({ "status": "ok", "message": "created" }));
    }

    #[test]
    fn blank_mac_is_rejected() {
        assert!(validate_mac("  ").is_err());
        assert_eq!(validate_mac(" AA:BB:CC ").unwrap(), "AA:BB:CC");
    }
}
