//! Driver for the MAX44004 digital ambient light sensor over I2C.
//!
//! All register traffic for one [`MAX44004`] goes through its bus lock, so the driver can be
//! shared between threads (e.g. behind an `Arc`). Configuration writes are validated before they
//! reach the bus: bytes with reserved bits set are rejected. Nothing is cached; every query
//! re-reads the device.
//!
//! Any `embedded_hal::i2c::I2c` implementation works as the transport.

pub mod bus;
pub mod device;
pub mod error;
pub mod light;
pub mod register;
pub mod report;
pub mod sensor_config;

#[cfg(test)]
mod mock;

pub use bus::BusSession;
pub use device::{I2C_ADDR, MAX44004};
pub use error::{Error, UnknownVariant};
pub use light::LightReading;
pub use register::{ConversionTime, Gain, PersistTimer, Register, SensorMode};
pub use sensor_config::{
    MainConfig, MainConfigView, ReceiverConfig, ReceiverConfigView, StatusView,
};
