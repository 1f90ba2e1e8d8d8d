pub mod device;
pub mod device_switch;

pub use device::DeviceDataSource;
pub use device_switch::DeviceSwitchDataSource;
