use crate::register::Register;

/// A raw field value that does not match any of the field's defined patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} field value {value:#04b}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: u8,
}

/// Errors returned by the driver. `E` is the bus transport's error type.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error<E> {
    /// The transport reported a failure (no ack, arbitration lost, timeout, ...). Passed through as-is.
    #[error("I2C bus transaction failed: {0:?}")]
    Bus(E),

    /// The requested byte sets reserved bits. Nothing was written to the device.
    #[error("rejected write of {value:#04x} to {register:?}: reserved bits set ({reserved:#04x})")]
    RejectedWrite {
        register: Register,
        value: u8,
        reserved: u8,
    },

    /// A register field did not decode to any known variant.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}
