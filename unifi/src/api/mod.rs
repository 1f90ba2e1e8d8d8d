//! UniFi controller API client

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod pool;
pub mod users;

pub use client::{Client, Platform, RetryConfig};
pub use error::ApiError;
pub use models::{Device, DeviceConfigNetwork, DevicePortOverride, DeviceState, User};
