/// Reading, validating and writing the status and configuration registers.
use embedded_hal::i2c::I2c;

use crate::device::MAX44004;
use crate::error::{Error, UnknownVariant};
use crate::register::{ConversionTime, Gain, Register, SensorMode, field};

/// Decoded interrupt status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    pub raw: u8,
    pub power_on: bool,
    pub als_interrupt: bool,
}

impl StatusView {
    pub fn decode(raw: u8) -> Self {
        StatusView {
            raw,
            power_on: raw & field::POWER_ON != 0,
            als_interrupt: raw & field::ALS_INTERRUPT != 0,
        }
    }
}

/// The defined fields of the main config register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainConfig {
    pub mode: SensorMode,
    pub trim: bool,
    pub interrupt_enable: bool,
}

impl MainConfig {
    pub fn decode(raw: u8) -> Result<Self, UnknownVariant> {
        Ok(MainConfig {
            mode: SensorMode::from_field((raw & field::MODE_MASK) >> field::MODE_SHIFT)?,
            trim: raw & field::TRIM != 0,
            interrupt_enable: raw & field::INTERRUPT_ENABLE != 0,
        })
    }

    /// Check that `raw` may be written to the main config register and decode it.
    /// No bus traffic; `E` is whatever transport error the caller works with.
    pub fn validate<E>(raw: u8) -> Result<Self, Error<E>> {
        check_reserved(Register::MainConfig, raw, field::MAIN_CONFIG_RESERVED)?;
        Ok(Self::decode(raw)?)
    }

    /// Register byte for these fields. Reserved bits are always clear.
    pub fn encode(&self) -> u8 {
        let mut raw = self.mode.field() << field::MODE_SHIFT;
        if self.trim {
            raw |= field::TRIM;
        }
        if self.interrupt_enable {
            raw |= field::INTERRUPT_ENABLE;
        }
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainConfigView {
    pub raw: u8,
    pub config: MainConfig,
}

/// The defined fields of the receiver config register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub conversion_time: ConversionTime,
    pub gain: Gain,
}

impl ReceiverConfig {
    pub fn decode(raw: u8) -> Result<Self, UnknownVariant> {
        Ok(ReceiverConfig {
            conversion_time: ConversionTime::from_field(
                (raw & field::CONVERSION_TIME_MASK) >> field::CONVERSION_TIME_SHIFT,
            )?,
            gain: Gain::from_field((raw & field::GAIN_MASK) >> field::GAIN_SHIFT)?,
        })
    }

    /// Check that `raw` may be written to the receiver config register and decode it.
    pub fn validate<E>(raw: u8) -> Result<Self, Error<E>> {
        check_reserved(Register::ReceiverConfig, raw, field::RECEIVER_CONFIG_RESERVED)?;
        Ok(Self::decode(raw)?)
    }

    /// Register byte for these fields. Reserved bits are always clear.
    pub fn encode(&self) -> u8 {
        (self.conversion_time.field() << field::CONVERSION_TIME_SHIFT)
            | (self.gain.field() << field::GAIN_SHIFT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfigView {
    pub raw: u8,
    pub config: ReceiverConfig,
}

/// Reject `value` if it sets any bit in `reserved`, before anything touches the bus.
fn check_reserved<E>(register: Register, value: u8, reserved: u8) -> Result<(), Error<E>> {
    let set = value & reserved;
    if set != 0 {
        log::debug!("rejecting {value:#04x} for {register:?}, reserved bits {set:#04x} set");
        return Err(Error::RejectedWrite {
            register,
            value,
            reserved: set,
        });
    }
    Ok(())
}

impl<I: I2c> MAX44004<I> {
    pub fn read_status(&self) -> Result<StatusView, Error<I::Error>> {
        let raw = self.read_register(Register::InterruptStatus)?;
        Ok(StatusView::decode(raw))
    }

    /// Read the main config register. Always goes to the device; nothing is cached.
    pub fn read_main_config(&self) -> Result<MainConfigView, Error<I::Error>> {
        let raw = self.read_register(Register::MainConfig)?;
        Ok(MainConfigView {
            raw,
            config: MainConfig::decode(raw)?,
        })
    }

    /// Write a raw main config byte. Fails with [`Error::RejectedWrite`] without any bus traffic
    /// if a reserved bit (1, 4, 6 or 7) is set.
    pub fn write_main_config(&self, value: u8) -> Result<(), Error<I::Error>> {
        MainConfig::validate::<I::Error>(value)?;
        self.write_register(Register::MainConfig, value)
    }

    pub fn set_main_config(&self, config: MainConfig) -> Result<(), Error<I::Error>> {
        self.write_main_config(config.encode())
    }

    pub fn read_receiver_config(&self) -> Result<ReceiverConfigView, Error<I::Error>> {
        let raw = self.read_register(Register::ReceiverConfig)?;
        Ok(ReceiverConfigView {
            raw,
            config: ReceiverConfig::decode(raw)?,
        })
    }

    /// Write a raw receiver config byte. Fails with [`Error::RejectedWrite`] without any bus
    /// traffic if any of the upper 4 bits is set.
    pub fn write_receiver_config(&self, value: u8) -> Result<(), Error<I::Error>> {
        ReceiverConfig::validate::<I::Error>(value)?;
        self.write_register(Register::ReceiverConfig, value)
    }

    pub fn set_receiver_config(&self, config: ReceiverConfig) -> Result<(), Error<I::Error>> {
        self.write_receiver_config(config.encode())
    }

    /// Write whichever of the two config bytes are given, main first.
    ///
    /// Both are validated before either is written, so a rejected byte leaves the device
    /// untouched. A bus failure on the receiver write still leaves the main write in place.
    pub fn apply_config(
        &self,
        main: Option<u8>,
        receiver: Option<u8>,
    ) -> Result<(), Error<I::Error>> {
        if let Some(main) = main {
            MainConfig::validate::<I::Error>(main)?;
        }
        if let Some(receiver) = receiver {
            ReceiverConfig::validate::<I::Error>(receiver)?;
        }

        if let Some(main) = main {
            self.write_register(Register::MainConfig, main)?;
        }
        if let Some(receiver) = receiver {
            self.write_register(Register::ReceiverConfig, receiver)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RegisterFile, StubError};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn main_config_reserved_bits_never_reach_bus() {
        let stub = RegisterFile::new();
        let log = stub.log();
        let sensor = MAX44004::open(stub);

        for value in 0..=u8::MAX {
            if value & 0b1101_0010 == 0 {
                continue;
            }
            match sensor.write_main_config(value) {
                Err(Error::RejectedWrite {
                    register: Register::MainConfig,
                    value: v,
                    reserved,
                }) => {
                    assert_eq!(value, v);
                    assert_eq!(value & 0b1101_0010, reserved);
                }
                other => panic!("{value:#04x} was not rejected: {other:?}"),
            }
        }

        assert_eq!(0, log.writes());
        assert!(log.operations().is_empty());
    }

    #[test]
    fn receiver_config_reserved_bits_never_reach_bus() {
        let stub = RegisterFile::new();
        let log = stub.log();
        let sensor = MAX44004::open(stub);

        for value in 0x10..=u8::MAX {
            assert!(matches!(
                sensor.write_receiver_config(value),
                Err(Error::RejectedWrite {
                    register: Register::ReceiverConfig,
                    ..
                })
            ));
        }

        assert_eq!(0, log.writes());
    }

    #[test]
    fn main_config_round_trip() {
        let stub = RegisterFile::new();
        let log = stub.log();
        let sensor = MAX44004::open(stub);

        for value in (0..=u8::MAX).filter(|v| v & field::MAIN_CONFIG_RESERVED == 0) {
            sensor.write_main_config(value).unwrap();
            let view = sensor.read_main_config().unwrap();

            assert_eq!(value, view.raw);
            assert_eq!(value, view.config.encode());
            assert_eq!(value & 0x20 != 0, view.config.trim);
            assert_eq!(value & 0x01 != 0, view.config.interrupt_enable);
            assert_eq!(
                SensorMode::from_field((value >> 2) & 0b11).unwrap(),
                view.config.mode
            );
        }

        // 3 defined fields, 16 combinations, one write and one read each
        assert_eq!(16, log.writes());
        assert_eq!(32, log.operations().len());
    }

    #[test]
    fn receiver_config_round_trip() {
        let sensor = MAX44004::open(RegisterFile::new());

        for value in 0..0x10 {
            sensor.write_receiver_config(value).unwrap();
            let view = sensor.read_receiver_config().unwrap();
            assert_eq!(value, view.raw);
            assert_eq!(value, view.config.encode());
        }
    }

    #[test]
    fn typed_config_writes() {
        let expectations = [
            I2cTransaction::write(0x40, vec![0x01, 0b0010_1001]),
            I2cTransaction::write(0x40, vec![0x02, 0b0000_0111]),
        ];
        let sensor = MAX44004::open(I2cMock::new(&expectations));

        sensor
            .set_main_config(MainConfig {
                mode: SensorMode::GreenOnly,
                trim: true,
                interrupt_enable: true,
            })
            .unwrap();
        sensor
            .set_receiver_config(ReceiverConfig {
                conversion_time: ConversionTime::Ms25,
                gain: Gain::X128,
            })
            .unwrap();

        sensor.close().done();
    }

    #[test]
    fn decode_views() {
        let expectations = [
            I2cTransaction::write_read(0x40, vec![0x00], vec![0b0000_0101]),
            I2cTransaction::write_read(0x40, vec![0x01], vec![0b0000_1100]),
            I2cTransaction::write_read(0x40, vec![0x02], vec![0b0000_1010]),
        ];
        let sensor = MAX44004::open(I2cMock::new(&expectations));

        assert_eq!(
            StatusView {
                raw: 0x05,
                power_on: true,
                als_interrupt: true,
            },
            sensor.read_status().unwrap()
        );
        assert_eq!(
            MainConfig {
                mode: SensorMode::IrOnly,
                trim: false,
                interrupt_enable: false,
            },
            sensor.read_main_config().unwrap().config
        );
        assert_eq!(
            ReceiverConfig {
                conversion_time: ConversionTime::Ms6_25,
                gain: Gain::X16,
            },
            sensor.read_receiver_config().unwrap().config
        );

        sensor.close().done();
    }

    #[test]
    fn reserved_bits_read_back_are_ignored() {
        let stub = RegisterFile::new();
        stub.set_register(Register::MainConfig, 0b1100_0100);
        let sensor = MAX44004::open(stub);

        let view = sensor.read_main_config().unwrap();
        assert_eq!(0b1100_0100, view.raw);
        assert_eq!(SensorMode::GreenAndIr, view.config.mode);
    }

    #[test]
    fn apply_config_validates_both_before_writing() {
        let stub = RegisterFile::new();
        let log = stub.log();
        let sensor = MAX44004::open(stub);

        assert_eq!(
            Err(Error::RejectedWrite {
                register: Register::ReceiverConfig,
                value: 0x10,
                reserved: 0x10,
            }),
            sensor.apply_config(Some(0x04), Some(0x10))
        );
        assert!(matches!(
            sensor.apply_config(Some(0x80), Some(0x00)),
            Err(Error::RejectedWrite {
                register: Register::MainConfig,
                ..
            })
        ));

        assert_eq!(0, log.writes());
    }

    #[test]
    fn apply_config_writes_main_then_receiver() {
        let expectations = [
            I2cTransaction::write(0x40, vec![0x01, 0x04]),
            I2cTransaction::write(0x40, vec![0x02, 0x03]),
            I2cTransaction::write(0x40, vec![0x02, 0x0F]),
        ];
        let sensor = MAX44004::open(I2cMock::new(&expectations));

        sensor.apply_config(Some(0x04), Some(0x03)).unwrap();
        sensor.apply_config(None, Some(0x0F)).unwrap();
        sensor.apply_config(None, None).unwrap();

        sensor.close().done();
    }

    #[test]
    fn validate_without_a_bus() {
        assert_eq!(
            Ok(MainConfig {
                mode: SensorMode::GreenAndIr,
                trim: true,
                interrupt_enable: false,
            }),
            MainConfig::validate::<()>(0x24)
        );
        assert_eq!(
            Err(Error::RejectedWrite {
                register: Register::MainConfig,
                value: 0x12,
                reserved: 0x12,
            }),
            MainConfig::validate::<()>(0x12)
        );
        assert_eq!(
            Ok(ReceiverConfig {
                conversion_time: ConversionTime::Ms100,
                gain: Gain::X128,
            }),
            ReceiverConfig::validate::<()>(0x03)
        );
        assert!(ReceiverConfig::validate::<()>(0xF0).is_err());
    }

    #[test]
    fn bus_errors_surface() {
        let stub = RegisterFile::new();
        stub.fail_next_read();
        stub.fail_next_write();
        let sensor = MAX44004::open(stub);

        assert_eq!(Err(Error::Bus(StubError)), sensor.read_status());
        assert_eq!(Err(Error::Bus(StubError)), sensor.write_main_config(0x04));
        assert_eq!(Ok(()), sensor.write_main_config(0x04));
    }
}
