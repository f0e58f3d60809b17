use crate::schema::{devices, readings};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned device key. Sqlite hands out integers, a hosted table may
/// use anything (uuid, bigint); it is only ever passed back to the same store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Int(i64),
    Text(String),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceId::Int(id) => write!(f, "{}", id),
            DeviceId::Text(id) => f.write_str(id),
        }
    }
}

/// Registered device as handed to the registry, whichever store it came from
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub mac: String,
    pub nickname: Option<String>,
    pub danger_threshold: Option<f64>,
}

/// Stored reading as returned by `/select/readings`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub reading: f64,
}

#[derive(Insertable, Serialize, Debug, Clone)]
#[table_name = "devices"]
pub struct NewDevice {
    pub mac: String,
    pub nickname: Option<String>,
    pub danger_threshold: Option<f64>,
}

#[derive(Insertable, Serialize, Debug, Clone)]
#[table_name = "readings"]
pub struct NewReading {
    pub device_id: i32,
    pub reading: f64,
}

#[derive(Queryable, Debug, Clone)]
pub struct DbDevice {
    pub id: i32,
    pub mac: String,
    pub nickname: Option<String>,
    pub danger_threshold: Option<f64>,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone)]
pub struct DbReading {
    pub id: i32,
    pub device_id: i32,
    pub reading: f64,
    pub created_at: NaiveDateTime,
}

impl From<DbDevice> for Device {
    fn from(row: DbDevice) -> Self {
        Device {
            id: DeviceId::Int(i64::from(row.id)),
            mac: row.mac,
            nickname: row.nickname,
            danger_threshold: row.danger_threshold,
        }
    }
}

// sqlite CURRENT_TIMESTAMP is UTC
impl From<DbReading> for Reading {
    fn from(row: DbReading) -> Self {
        Reading {
            created_at: Utc.from_utc_datetime(&row.created_at),
            reading: row.reading,
        }
    }
}

/// Accepts rfc3339 as well as the offset-less form of a `timestamp` column,
/// which is taken to be UTC.
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    raw.replacen(' ', "T", 1)
        .parse::<NaiveDateTime>()
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| de::Error::custom(format!("not a timestamp: {}", raw)))
}
