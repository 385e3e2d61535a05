use core::fmt;

/// One wire communication error type.
#[derive(Debug, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device answered the reset pulse.
    NoDevicePresent,
    /// Computed CRC of a ROM or data block is invalid.
    InvalidCrc,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Display> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneWireError::Other(e) => write!(f, "bus error: {e}"),
            OneWireError::NoDevicePresent => f.write_str("no device present on the 1-Wire bus"),
            OneWireError::InvalidCrc => f.write_str("invalid 1-Wire CRC"),
        }
    }
}
