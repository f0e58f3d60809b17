pub mod devices;
pub mod readings;
