//! Register map of the MAX44004 ambient light sensor.
//!
//! Datasheet: https://www.analog.com/media/en/technical-documentation/data-sheets/MAX44004.pdf
use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    InterruptStatus = 0x00,
    MainConfig = 0x01,
    ReceiverConfig = 0x02,
    DataHigh = 0x04,
    DataLow = 0x05,
    UpperThresholdHigh = 0x06,
    UpperThresholdLow = 0x07,
    LowerThresholdHigh = 0x08,
    LowerThresholdLow = 0x09,
    ThresholdPersistTimer = 0x0A,
    GainTrimHigh = 0x0F,
    GainTrimLow = 0x10,
}

impl Register {
    pub const ALL: [Register; 12] = [
        Register::InterruptStatus,
        Register::MainConfig,
        Register::ReceiverConfig,
        Register::DataHigh,
        Register::DataLow,
        Register::UpperThresholdHigh,
        Register::UpperThresholdLow,
        Register::LowerThresholdHigh,
        Register::LowerThresholdLow,
        Register::ThresholdPersistTimer,
        Register::GainTrimHigh,
        Register::GainTrimLow,
    ];

    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Bit positions and masks for each register field.
pub mod field {
    // Interrupt status
    pub const ALS_INTERRUPT: u8 = 0b0000_0001;
    pub const POWER_ON: u8 = 0b0000_0100;

    // Main config
    pub const INTERRUPT_ENABLE: u8 = 0b0000_0001;
    pub const MODE_MASK: u8 = 0b0000_1100;
    pub const MODE_SHIFT: u8 = 2;
    pub const TRIM: u8 = 0b0010_0000;
    pub const MAIN_CONFIG_RESERVED: u8 = !(MODE_MASK | TRIM | INTERRUPT_ENABLE);

    // Receiver config
    pub const GAIN_MASK: u8 = 0b0000_0011;
    pub const GAIN_SHIFT: u8 = 0;
    pub const CONVERSION_TIME_MASK: u8 = 0b0000_1100;
    pub const CONVERSION_TIME_SHIFT: u8 = 2;
    pub const RECEIVER_CONFIG_RESERVED: u8 = !(CONVERSION_TIME_MASK | GAIN_MASK);

    // Threshold persist timer
    pub const PERSIST_MASK: u8 = 0b0000_0011;

    // Data high byte
    pub const OVERFLOW_MASK: u8 = 0b1100_0000;
    pub const DATA_HIGH_MASK: u8 = 0b0011_1111;
}

/// Which photodiodes are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
    Off,
    GreenAndIr,
    GreenOnly,
    IrOnly,
}

impl SensorMode {
    /// Decode the 2-bit mode field (already shifted down to bits 1:0).
    pub fn from_field(value: u8) -> Result<Self, UnknownVariant> {
        match value {
            0b00 => Ok(SensorMode::Off),
            0b01 => Ok(SensorMode::GreenAndIr),
            0b10 => Ok(SensorMode::GreenOnly),
            0b11 => Ok(SensorMode::IrOnly),
            value => Err(UnknownVariant {
                field: "mode",
                value,
            }),
        }
    }

    pub const fn field(self) -> u8 {
        match self {
            SensorMode::Off => 0b00,
            SensorMode::GreenAndIr => 0b01,
            SensorMode::GreenOnly => 0b10,
            SensorMode::IrOnly => 0b11,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SensorMode::Off => "SENSORS OFF",
            SensorMode::GreenAndIr => "SENSORS GREEN + IR",
            SensorMode::GreenOnly => "SENSOR GREEN ONLY",
            SensorMode::IrOnly => "SENSOR IR ONLY",
        }
    }
}

/// ADC integration time, which also fixes the conversion resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTime {
    /// 100ms, 14 bits
    Ms100,
    /// 25ms, 12 bits
    Ms25,
    /// 6.25ms, 10 bits
    Ms6_25,
    /// 1.5625ms, 8 bits
    Ms1_5625,
}

impl ConversionTime {
    pub fn from_field(value: u8) -> Result<Self, UnknownVariant> {
        match value {
            0b00 => Ok(ConversionTime::Ms100),
            0b01 => Ok(ConversionTime::Ms25),
            0b10 => Ok(ConversionTime::Ms6_25),
            0b11 => Ok(ConversionTime::Ms1_5625),
            value => Err(UnknownVariant {
                field: "conversion time",
                value,
            }),
        }
    }

    pub const fn field(self) -> u8 {
        match self {
            ConversionTime::Ms100 => 0b00,
            ConversionTime::Ms25 => 0b01,
            ConversionTime::Ms6_25 => 0b10,
            ConversionTime::Ms1_5625 => 0b11,
        }
    }

    pub const fn micros(self) -> u32 {
        match self {
            ConversionTime::Ms100 => 100_000,
            ConversionTime::Ms25 => 25_000,
            ConversionTime::Ms6_25 => 6_250,
            ConversionTime::Ms1_5625 => 1_562,
        }
    }

    pub const fn resolution_bits(self) -> u8 {
        match self {
            ConversionTime::Ms100 => 14,
            ConversionTime::Ms25 => 12,
            ConversionTime::Ms6_25 => 10,
            ConversionTime::Ms1_5625 => 8,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConversionTime::Ms100 => "100ms",
            ConversionTime::Ms25 => "25ms",
            ConversionTime::Ms6_25 => "6.25ms",
            ConversionTime::Ms1_5625 => "1.5625ms",
        }
    }
}

/// Analog gain applied before digitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    X1,
    X4,
    X16,
    X128,
}

impl Gain {
    pub fn from_field(value: u8) -> Result<Self, UnknownVariant> {
        match value {
            0b00 => Ok(Gain::X1),
            0b01 => Ok(Gain::X4),
            0b10 => Ok(Gain::X16),
            0b11 => Ok(Gain::X128),
            value => Err(UnknownVariant {
                field: "gain",
                value,
            }),
        }
    }

    pub const fn field(self) -> u8 {
        match self {
            Gain::X1 => 0b00,
            Gain::X4 => 0b01,
            Gain::X16 => 0b10,
            Gain::X128 => 0b11,
        }
    }

    pub const fn factor(self) -> u16 {
        match self {
            Gain::X1 => 1,
            Gain::X4 => 4,
            Gain::X16 => 16,
            Gain::X128 => 128,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Gain::X1 => "1x",
            Gain::X4 => "4x",
            Gain::X16 => "16x",
            Gain::X128 => "128x",
        }
    }
}

/// Number of consecutive out-of-window samples before the ALS interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistTimer {
    One,
    Two,
    Four,
    Sixteen,
}

impl PersistTimer {
    pub fn from_field(value: u8) -> Result<Self, UnknownVariant> {
        match value {
            0b00 => Ok(PersistTimer::One),
            0b01 => Ok(PersistTimer::Two),
            0b10 => Ok(PersistTimer::Four),
            0b11 => Ok(PersistTimer::Sixteen),
            value => Err(UnknownVariant {
                field: "persist timer",
                value,
            }),
        }
    }

    pub const fn samples(self) -> u8 {
        match self {
            PersistTimer::One => 1,
            PersistTimer::Two => 2,
            PersistTimer::Four => 4,
            PersistTimer::Sixteen => 16,
        }
    }
}
