//! Client for the hosted store, a PostgREST endpoint exposing one resource per table.
//!
//! Every call is a single round trip; the service credential goes out with each
//! request as both `apikey` and bearer token.
use awc::{error::PayloadError, http::header, Client, ClientResponse};
use bytes::Bytes;
use futures::Stream;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    db::model::{Device, DeviceId, NewDevice, Reading},
    ServiceError,
};

const REST_PATH: &str = "rest/v1";
/// Upper bound for a decoded response body
const RESPONSE_LIMIT: usize = 16 * 1024 * 1024;

const RETURN_ROWS: &str = "return=representation";
const IGNORE_DUPLICATES: &str = "resolution=ignore-duplicates,return=representation";

#[derive(Clone, Debug, PartialEq)]
pub struct RemoteConfig {
    pub url: String,
    pub key: String,
}

pub struct RemoteStore {
    client: Client,
    base: String,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> RemoteStore {
        let client = Client::builder()
            .header("apikey", config.key.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", config.key))
            .finish();
        RemoteStore {
            client,
            base: config.url.clone(),
        }
    }

    pub async fn find_device(&self, mac: &str) -> Result<Option<Device>, ServiceError> {
        let rows = self.select::<Device>("devices", "mac", mac).await?;
        Ok(rows.into_iter().next())
    }

    /// Relies on the unique constraint on `devices.mac`: a conflicting row is
    /// dropped by the store and comes back as an empty array.
    pub async fn insert_device(&self, device: &NewDevice) -> Result<bool, ServiceError> {
        let rows = self
            .insert::<_, Device>("devices", &[("on_conflict", "mac")], IGNORE_DUPLICATES, &[device])
            .await?;
        Ok(!rows.is_empty())
    }

    pub async fn insert_reading(
        &self,
        device_id: &DeviceId,
        reading: f64,
    ) -> Result<Reading, ServiceError> {
        let body = [json!({ "device_id": device_id, "reading": reading })];
        let rows = self
            .insert::<_, Reading>("readings", &[], RETURN_ROWS, &body)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ServiceError::Store("insert into readings returned no row".to_owned()))
    }

    pub async fn readings(&self, device_id: &DeviceId) -> Result<Vec<Reading>, ServiceError> {
        self.select("readings", "device_id", &device_id.to_string())
            .await
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<T>, ServiceError> {
        let filter = eq_filter(column, value);
        let res = self
            .client
            .get(table_url(&self.base, table))
            .query(&filter)
            .map_err(|e| ServiceError::Store(e.to_string()))?
            .send()
            .await?;
        rows(res).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        prefer: &str,
        body: &B,
    ) -> Result<Vec<T>, ServiceError> {
        let mut req = self
            .client
            .post(table_url(&self.base, table))
            .header("Prefer", prefer);
        if !query.is_empty() {
            req = req
                .query(&query)
                .map_err(|e| ServiceError::Store(e.to_string()))?;
        }
        let res = req.send_json(body).await?;
        rows(res).await
    }
}

async fn rows<S, T>(mut res: ClientResponse<S>) -> Result<Vec<T>, ServiceError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
    T: DeserializeOwned,
{
    if !res.status().is_success() {
        let body = res.body().await?;
        return Err(ServiceError::Store(format!(
            "store responded {}: {}",
            res.status(),
            String::from_utf8_lossy(&body)
        )));
    }
    Ok(res.json::<Vec<T>>().limit(RESPONSE_LIMIT).await?)
}

fn table_url(base: &str, table: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), REST_PATH, table)
}

fn eq_filter(column: &str, value: &str) -> Vec<(String, String)> {
    vec![
        (column.to_owned(), format!("eq.{}", value)),
        ("select".to_owned(), "*".to_owned()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn table_url_joins_rest_path() {
        assert_eq!(
            table_url("https://abc.supabase.co/", "devices"),
            "https://abc.supabase.co/rest/v1/devices"
        );
        assert_eq!(
            table_url("http://localhost:3000", "readings"),
            "http://localhost:3000/rest/v1/readings"
        );
    }

    #[test]
    fn filter_matches_on_equality() {
        let filter = eq_filter("mac", "AA:BB:CC");
        assert_eq!(filter[0], ("mac".to_owned(), "eq.AA:BB:CC".to_owned()));
        assert_eq!(filter[1], ("select".to_owned(), "*".to_owned()));
    }

    #[test]
    fn device_rows_ignore_extra_columns() {
        let rows: Vec<Device> = serde_json::from_str(
            r#"[{"id": 7, "mac": "AA:BB:CC", "nickname": null,
                 "danger_threshold": 30.0, "created_at": "2021-06-01T10:00:00+00:00"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].id, DeviceId::Int(7));
        assert_eq!(rows[0].danger_threshold, Some(30.0));
    }

    #[test]
    fn reading_rows_parse_timestamptz() {
        let rows: Vec<Reading> = serde_json::from_str(
            r#"[{"id": 1, "device_id": 7, "reading": 42.5,
                 "created_at": "2021-06-01T10:00:00+00:00"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].reading, 42.5);
        assert_eq!(
            rows[0].created_at,
            "2021-06-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
