use actix::prelude::*;

pub mod actions;
pub mod model;
pub mod remote;

pub use actions::Actions;
pub use remote::{RemoteConfig, RemoteStore};

use crate::{
    config::StoreSettings,
    db::{
        actions::{FindDevice, GetReadings, InsertDevice, InsertReading},
        model::{Device, DeviceId, NewDevice, Reading},
    },
    ServiceError,
};

/// Handle to whichever store backs the registry.
pub enum Store {
    Local(Addr<Actions>),
    Remote(RemoteStore),
}

impl Store {
    pub async fn find_device(&self, mac: &str) -> Result<Option<Device>, ServiceError> {
        match self {
            Store::Local(actions) => {
                actions
                    .send(FindDevice {
                        mac: mac.to_owned(),
                    })
                    .await?
            }
            Store::Remote(remote) => remote.find_device(mac).await,
        }
    }

    /// Resolves to `true` when the device was created, `false` when the mac was taken.
    pub async fn insert_device(&self, device: NewDevice) -> Result<bool, ServiceError> {
        match self {
            Store::Local(actions) => actions.send(InsertDevice(device)).await?,
            Store::Remote(remote) => remote.insert_device(&device).await,
        }
    }

    pub async fn insert_reading(
        &self,
        device_id: &DeviceId,
        reading: f64,
    ) -> Result<Reading, ServiceError> {
        match self {
            Store::Local(actions) => {
                actions
                    .send(InsertReading {
                        device_id: device_id.clone(),
                        reading,
                    })
                    .await?
            }
            Store::Remote(remote) => remote.insert_reading(device_id, reading).await,
        }
    }

    pub async fn readings(&self, device_id: &DeviceId) -> Result<Vec<Reading>, ServiceError> {
        match self {
            Store::Local(actions) => {
                actions
                    .send(GetReadings {
                        device_id: device_id.clone(),
                    })
                    .await?
            }
            Store::Remote(remote) => remote.readings(device_id).await,
        }
    }
}

/// Thread-safe recipe for a `Store`, cloned into every http worker.
///
/// The hosted store client is not `Send`, so each worker builds its own.
#[derive(Clone)]
pub enum Backend {
    Local(Addr<Actions>),
    Remote(RemoteConfig),
}

impl Backend {
    /// Must be called from within a running actix system.
    pub fn connect(settings: &StoreSettings) -> Result<Backend, ServiceError> {
        match settings {
            StoreSettings::Local {
                database_url,
                workers,
            } => {
                let pool = Actions::pool(database_url)?;
                Ok(Backend::Local(Actions::start(pool, *workers)))
            }
            StoreSettings::Remote(config) => {
                log::info!("using hosted store at {}", config.url);
                Ok(Backend::Remote(config.clone()))
            }
        }
    }

    pub fn store(&self) -> Store {
        match self {
            Backend::Local(actions) => Store::Local(actions.clone()),
            Backend::Remote(config) => Store::Remote(RemoteStore::new(config)),
        }
    }
}
