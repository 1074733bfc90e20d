/// Light value acquisition from the two data registers.
use embedded_hal::i2c::I2c;

use crate::device::MAX44004;
use crate::error::Error;
use crate::register::{Register, field};

/// A single ALS sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightReading {
    /// ADC counts, at most 14 bits (0..=16383).
    Counts(u16),
    /// The sensor saturated; the data bits carry no meaningful value.
    Overflow,
}

impl LightReading {
    /// Combine the data high and low bytes. Any overflow bit in `high` wins over the data.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        if high & field::OVERFLOW_MASK != 0 {
            return LightReading::Overflow;
        }
        let high = (high & field::DATA_HIGH_MASK) as u16;
        LightReading::Counts(high << 8 | low as u16)
    }

    pub fn counts(&self) -> Option<u16> {
        match self {
            LightReading::Counts(c) => Some(*c),
            LightReading::Overflow => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, LightReading::Overflow)
    }
}

impl<I: I2c> MAX44004<I> {
    /// Read the current light value.
    ///
    /// Both data bytes are read under one hold of the bus lock, low byte first, so no other
    /// caller's transaction can land between them. If the low byte read fails the high byte is
    /// not read.
    ///
    /// The chip does not latch the two bytes together, so a conversion finishing between the two
    /// reads can still produce a mixed sample.
    pub fn read_light_value(&self) -> Result<LightReading, Error<I::Error>> {
        let (high, low) = self
            .with_exclusive_access(|bus| {
                let low = bus.read_register(Register::DataLow)?;
                let high = bus.read_register(Register::DataHigh)?;
                Ok((high, low))
            })
            .map_err(Error::Bus)?;

        let reading = LightReading::from_bytes(high, low);
        if reading.is_overflow() {
            log::debug!("light reading overflowed (high={high:#04x}, low={low:#04x})");
        }
        Ok(reading)
    }
}
