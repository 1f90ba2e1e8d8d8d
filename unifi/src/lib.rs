//! Terraform provider for UniFi network controllers
//!
//! Resources: `unifi_device_switch`, `unifi_user`.
//! Data sources: `unifi_device`, `unifi_device_switch`.

pub mod api;
pub mod data_sources;
pub mod mac;
pub mod plan_modifiers;
pub mod provider;
pub mod provider_data;
pub mod resources;
pub mod values;

pub use provider::UnifiProvider;
pub use provider_data::UnifiProviderData;
