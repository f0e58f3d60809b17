//! Device registry and reading store, keyed by the devices' hardware address.
//!
//! The store identifies devices by an opaque id; callers only ever know the mac.
//! Devices are read-only after creation: registering a known mac again keeps
//! the stored nickname and danger threshold.
use crate::{
    common::{DeviceReadings, Registration},
    db::{
        model::{Device, NewDevice, Reading},
        Store,
    },
    ServiceError,
};

pub struct Registry {
    store: Store,
}

impl Registry {
    pub fn new(store: Store) -> Registry {
        Registry { store }
    }

    pub async fn register_device(
        &self,
        mac: &str,
        nickname: Option<String>,
        danger_threshold: Option<f64>,
    ) -> Result<Registration, ServiceError> {
        let created = self
            .store
            .insert_device(NewDevice {
                mac: mac.to_owned(),
                nickname,
                danger_threshold,
            })
            .await?;
        if created {
            log::info!("registered device {}", mac);
            Ok(Registration::Created)
        } else {
            Ok(Registration::Found)
        }
    }

    pub async fn register_reading(&self, mac: &str, reading: f64) -> Result<Reading, ServiceError> {
        let device = self.device(mac).await?;
        let stored = self.store.insert_reading(&device.id, reading).await?;
        log::info!("device {} read {}", mac, stored.reading);
        Ok(stored)
    }

    /// Readings come back in store order; a device without any yields an empty list.
    pub async fn select_readings(&self, mac: &str) -> Result<Vec<DeviceReadings>, ServiceError> {
        let device = self.device(mac).await?;
        let readings = self.store.readings(&device.id).await?;
        Ok(vec![DeviceReadings {
            mac: device.mac,
            readings,
        }])
    }

    async fn device(&self, mac: &str) -> Result<Device, ServiceError> {
        self.store
            .find_device(mac)
            .await?
            .ok_or_else(|| ServiceError::not_found(mac))
    }
}
