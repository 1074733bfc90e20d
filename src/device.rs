/// One MAX44004 attached at one I2C address, with the lock that serializes its bus traffic.
use std::sync::{Mutex, PoisonError};

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::bus::BusSession;

/// Default 7-bit I2C address of the MAX44004.
pub const I2C_ADDR: SevenBitAddress = 0x40;

pub struct MAX44004<I> {
    bus: Mutex<I>,
    address: SevenBitAddress,
}

impl<I: I2c> MAX44004<I> {
    /// Attach to a sensor at the default address. Performs no bus I/O.
    pub fn open(i2c: I) -> Self {
        Self::open_at(i2c, I2C_ADDR)
    }

    /// Attach to a sensor at a specific address. Performs no bus I/O.
    pub fn open_at(i2c: I, address: SevenBitAddress) -> Self {
        MAX44004 {
            bus: Mutex::new(i2c),
            address,
        }
    }

    /// Detach and hand the bus back. Performs no bus I/O.
    pub fn close(self) -> I {
        self.bus.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Run `operation` while holding this device's bus lock.
    ///
    /// At most one of these is in flight per device. The lock is released when `operation`
    /// returns, whether it succeeded or not. Failures are passed through unchanged, no retries.
    ///
    /// A poisoned lock is recovered: it only guards the bus handle, and every transaction on it
    /// is complete or not started.
    pub fn with_exclusive_access<T, E>(
        &self,
        operation: impl FnOnce(&mut BusSession<'_, I>) -> Result<T, E>,
    ) -> Result<T, E> {
        let guard = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        let mut session = BusSession::new(guard, self.address);
        operation(&mut session)
    }
}
