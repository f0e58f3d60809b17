#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod common;
pub mod config;
pub mod db;
pub mod error;
pub mod registry;
pub mod rest_api;
pub mod schema;
pub mod templates;

pub use config::Settings;
pub use db::{Actions, Backend, Store};
pub use error::ServiceError;
pub use registry::Registry;
pub use rest_api::rest_config;
