use crate::OneWireCrc;
use core::fmt;

/// A 64-bit 1-Wire ROM code.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0 | Family code (e.g., 0x28 for DS18B20) |
/// | 1-6 | 48-bit serial number, least significant byte first |
/// | 7 | CRC-8 of bytes 0-6 |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RomAddress(pub [u8; 8]);

impl RomAddress {
    /// Family code of the device.
    pub fn family(&self) -> u8 {
        self.0[0]
    }

    /// 48-bit serial number.
    pub fn serial(&self) -> u64 {
        let mut buf = [0; 8];
        buf[..6].copy_from_slice(&self.0[1..7]);
        u64::from_le_bytes(buf)
    }

    /// CRC byte carried in the ROM.
    pub fn crc(&self) -> u8 {
        self.0[7]
    }

    /// Check that the CRC byte matches the rest of the ROM.
    pub fn is_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }

    /// Raw bytes, in bus order.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Bit `n` (0 based, bus order) of the ROM.
    pub(crate) fn bit(&self, n: usize) -> bool {
        self.0[n / 8] & (1 << (n % 8)) != 0
    }
}

impl From<[u8; 8]> for RomAddress {
    fn from(value: [u8; 8]) -> Self {
        Self(value)
    }
}

impl From<u64> for RomAddress {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<RomAddress> for u64 {
    fn from(value: RomAddress) -> Self {
        u64::from_le_bytes(value.0)
    }
}

impl fmt::Display for RomAddress {
    /// Formats as `FF-SSSSSSSSSSSS-CC`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}-", self.family())?;
        for b in self.0[1..7].iter().rev() {
            write!(f, "{b:02x}")?;
        }
        write!(f, "-{:02x}", self.crc())
    }
}
