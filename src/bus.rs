/// Single-register reads and writes, available only while holding the device's bus lock.
use std::sync::MutexGuard;

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::device::MAX44004;
use crate::error::Error;
use crate::register::Register;

/// Exclusive access to one device's bus. Obtained through [`MAX44004::with_exclusive_access`];
/// the lock is dropped together with the session.
///
/// Outside this crate a session can only read. Writes go through the validated
/// `write_main_config`/`write_receiver_config` paths.
///
/// ```no_run
/// use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
/// use max44004::{MAX44004, Register};
///
/// let expectations: [Transaction; 0] = [];
/// let sensor = MAX44004::open(Mock::new(&expectations));
/// let _ = sensor.with_exclusive_access(|bus| bus.read_register(Register::MainConfig));
/// ```
///
/// ```compile_fail
/// use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
/// use max44004::{MAX44004, Register};
///
/// let expectations: [Transaction; 0] = [];
/// let sensor = MAX44004::open(Mock::new(&expectations));
/// let _ = sensor.with_exclusive_access(|bus| bus.write_register(Register::MainConfig, 0xFF));
/// ```
pub struct BusSession<'a, I> {
    i2c: MutexGuard<'a, I>,
    address: SevenBitAddress,
}

impl<'a, I: I2c> BusSession<'a, I> {
    pub(crate) fn new(i2c: MutexGuard<'a, I>, address: SevenBitAddress) -> Self {
        BusSession { i2c, address }
    }

    pub fn read_register(&mut self, register: Register) -> Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register.addr()], &mut buf)?;
        log::trace!("read {register:?} ({:#04x}) = {:#04x}", register.addr(), buf[0]);
        Ok(buf[0])
    }

    /// Unvalidated. Only reachable from the config writers in this crate.
    pub(crate) fn write_register(&mut self, register: Register, value: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[register.addr(), value])?;
        log::trace!("wrote {register:?} ({:#04x}) = {value:#04x}", register.addr());
        Ok(())
    }
}

impl<I: I2c> MAX44004<I> {
    /// Read one register as its own locked transaction.
    pub fn read_register(&self, register: Register) -> Result<u8, Error<I::Error>> {
        self.with_exclusive_access(|bus| bus.read_register(register))
            .map_err(Error::Bus)
    }

    /// Write one register as its own locked transaction. No validation happens here.
    pub(crate) fn write_register(&self, register: Register, value: u8) -> Result<(), Error<I::Error>> {
        self.with_exclusive_access(|bus| bus.write_register(register, value))
            .map_err(Error::Bus)
    }
}
