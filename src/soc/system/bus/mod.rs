pub mod device_bus;
pub mod error;

pub use device_bus::DeviceBus;
pub use error::{BusError, BusResult};
