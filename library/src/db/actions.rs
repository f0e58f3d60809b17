use actix::prelude::*;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use std::convert::TryFrom;

use crate::{
    db::model::{DbDevice, DbReading, Device, DeviceId, NewDevice, NewReading, Reading},
    ServiceError,
};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Local sqlite store, run on a `SyncArbiter` so diesel may block
pub struct Actions {
    pool: DbPool,
}

impl Actor for Actions {
    type Context = SyncContext<Self>;
}

/// Look a device up by its hardware address
#[derive(Message, Debug)]
#[rtype(result = "Result<Option<Device>, ServiceError>")]
pub struct FindDevice {
    pub mac: String,
}

/// Insert a device unless its mac is taken, resolves to `true` when a row was created
#[derive(Message, Debug)]
#[rtype(result = "Result<bool, ServiceError>")]
pub struct InsertDevice(pub NewDevice);

#[derive(Message, Debug)]
#[rtype(result = "Result<Reading, ServiceError>")]
pub struct InsertReading {
    pub device_id: DeviceId,
    pub reading: f64,
}

/// All readings of one device, oldest first
#[derive(Message, Debug)]
#[rtype(result = "Result<Vec<Reading>, ServiceError>")]
pub struct GetReadings {
    pub device_id: DeviceId,
}

impl Handler<FindDevice> for Actions {
    type Result = Result<Option<Device>, ServiceError>;

    fn handle(&mut self, msg: FindDevice, _: &mut Self::Context) -> Self::Result {
        use crate::schema::devices::dsl::*;
        let conn = self.conn()?;
        let device = devices
            .filter(mac.eq(&msg.mac))
            .first::<DbDevice>(&conn)
            .optional()?;
        Ok(device.map(Device::from))
    }
}

impl Handler<InsertDevice> for Actions {
    type Result = Result<bool, ServiceError>;

    fn handle(&mut self, msg: InsertDevice, _: &mut Self::Context) -> Self::Result {
        use crate::schema::devices;
        let conn = self.conn()?;
        // the unique index on mac decides, not a prior lookup
        let inserted = diesel::insert_or_ignore_into(devices::table)
            .values(&msg.0)
            .execute(&conn)?;
        Ok(inserted == 1)
    }
}

impl Handler<InsertReading> for Actions {
    type Result = Result<Reading, ServiceError>;

    fn handle(&mut self, msg: InsertReading, _: &mut Self::Context) -> Self::Result {
        let new_reading = NewReading {
            device_id: row_id(&msg.device_id)?,
            reading: msg.reading,
        };
        let conn = self.conn()?;
        let row = conn.transaction::<_, diesel::result::Error, _>(|| {
            {
                use crate::schema::readings;
                diesel::insert_into(readings::table)
                    .values(&new_reading)
                    .execute(&conn)?;
            }
            use crate::schema::readings::dsl::*;
            readings.order(id.desc()).first::<DbReading>(&conn)
        })?;
        Ok(row.into())
    }
}

impl Handler<GetReadings> for Actions {
    type Result = Result<Vec<Reading>, ServiceError>;

    fn handle(&mut self, msg: GetReadings, _: &mut Self::Context) -> Self::Result {
        use crate::schema::readings::dsl::*;
        let device = row_id(&msg.device_id)?;
        let conn = self.conn()?;
        let rows = readings
            .filter(device_id.eq(device))
            .order(id.asc())
            .load::<DbReading>(&conn)?;
        Ok(rows.into_iter().map(Reading::from).collect())
    }
}

embed_migrations!("../migrations");

/// Pragmas applied to every pooled connection
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

impl Actions {
    /// Open a pool on `connspec` and bring the schema up to date.
    ///
    /// `:memory:` gets a single long-lived connection, since every sqlite
    /// connection to it is a separate database.
    pub fn pool(connspec: &str) -> Result<DbPool, ServiceError> {
        let manager = ConnectionManager::<SqliteConnection>::new(connspec);
        let mut builder = DbPool::builder().connection_customizer(Box::new(ConnectionOptions));
        if connspec == ":memory:" {
            builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = builder.build(manager)?;

        let conn = pool.get()?;
        embedded_migrations::run(&conn)?;
        log::info!("sqlite store ready at {}", connspec);
        Ok(pool)
    }

    pub fn start(pool: DbPool, workers: usize) -> Addr<Actions> {
        SyncArbiter::start(workers.max(1), move || Actions { pool: pool.clone() })
    }

    fn conn(
        &self,
    ) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, ServiceError> {
        Ok(self.pool.get()?)
    }
}

/// Sqlite only ever hands out integer ids that fit its `Integer` column.
fn row_id(id: &DeviceId) -> Result<i32, ServiceError> {
    let row = match id {
        DeviceId::Int(row) => i32::try_from(*row).ok(),
        DeviceId::Text(_) => None,
    };
    row.ok_or_else(|| ServiceError::Store(format!("device id {} is not a sqlite row id", id)))
}
