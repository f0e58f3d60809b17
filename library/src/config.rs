//! Settings read from the process environment (and `.env`, when present).
use std::{env, str::FromStr};

use crate::{db::RemoteConfig, ServiceError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "moisture.db";
pub const DEFAULT_DB_WORKERS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum StoreSettings {
    /// sqlite file (or `:memory:`) served by the `Actions` actor
    Local { database_url: String, workers: usize },
    /// hosted PostgREST store
    Remote(RemoteConfig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreSettings,
}

impl Settings {
    pub fn from_env() -> Result<Settings, ServiceError> {
        dotenv::dotenv().ok();
        Settings::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Settings, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse(&var, "PORT", DEFAULT_PORT)?;

        let store = match (var("SUPABASE_URL"), var("SUPABASE_KEY")) {
            (Some(url), Some(key)) => StoreSettings::Remote(RemoteConfig { url, key }),
            (None, None) => StoreSettings::Local {
                database_url: var("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
                workers: parse(&var, "DB_WORKERS", DEFAULT_DB_WORKERS)?,
            },
            _ => {
                return Err(ServiceError::Config(
                    "SUPABASE_URL and SUPABASE_KEY must be set together".to_owned(),
                ))
            }
        };

        Ok(Settings { host, port, store })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<F, T>(var: &F, key: &str, default: T) -> Result<T, ServiceError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ServiceError::Config(format!("{} is not valid: {:?}", key, value))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ServiceError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_store_on_port_5000() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.address(), "0.0.0.0:5000");
        assert_eq!(
            settings.store,
            StoreSettings::Local {
                database_url: DEFAULT_DATABASE_URL.to_owned(),
                workers: DEFAULT_DB_WORKERS,
            }
        );
    }

    #[test]
    fn hosted_store_when_url_and_key_are_set() {
        let settings = settings(&[
            ("PORT", "8080"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(
            settings.store,
            StoreSettings::Remote(RemoteConfig {
                url: "https://abc.supabase.co".to_owned(),
                key: "secret".to_owned(),
            })
        );
    }

    #[test]
    fn half_configured_hosted_store_is_an_error() {
        assert!(settings(&[("SUPABASE_URL", "https://abc.supabase.co")]).is_err());
    }

    #[test]
    fn bad_port_names_the_variable() {
        let err = settings(&[("PORT", "fifty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
