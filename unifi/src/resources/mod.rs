//! Resource implementations

pub mod device_switch;
pub mod user;

pub use device_switch::DeviceSwitchResource;
pub use user::UserResource;
