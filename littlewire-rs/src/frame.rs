//! Request and response framing.
//!
//! A request is a `bRequest` byte plus the 16-bit `wValue` and `wIndex` fields of a control
//! transfer. The firmware squeezes small payloads into these two fields, and a few requests
//! additionally carry a length and a mode flag inside the request byte itself. All of that
//! packing lives here as small pure functions.

use crate::commands::{I2C_WRITE_BASE, RESPONSE_LEN, SPI_SEND_BASE};
use bitfield_struct::bitfield;

/// Most bytes that fit into `wValue` and `wIndex`.
pub const MAX_PACKED: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One control request.
pub struct CommandFrame {
    /// `bRequest`.
    pub opcode: u8,
    /// `wValue`, the first parameter.
    pub value: u16,
    /// `wIndex`, the second parameter.
    pub index: u16,
}

impl CommandFrame {
    /// A request without parameters.
    pub const fn new(opcode: u8) -> Self {
        Self {
            opcode,
            value: 0,
            index: 0,
        }
    }

    /// Set the first parameter.
    pub const fn with_value(mut self, value: u16) -> Self {
        self.value = value;
        self
    }

    /// Set the second parameter.
    pub const fn with_index(mut self, index: u16) -> Self {
        self.index = index;
        self
    }

    /// Put up to four bytes in the two parameters, see [`pack_bytes`].
    pub fn with_bytes(self, bytes: &[u8]) -> Self {
        let (value, index) = pack_bytes(bytes);
        self.with_value(value).with_index(index)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// The 8-byte buffer returned by every request.
pub struct ResponseFrame(pub [u8; RESPONSE_LEN]);

impl ResponseFrame {
    /// Byte 0, the status or value of most requests.
    pub fn byte(&self) -> u8 {
        self.0[0]
    }

    /// Little-endian word in bytes 0 and 1.
    pub fn word(&self) -> u16 {
        u16::from_le_bytes([self.0[0], self.0[1]])
    }

    /// The whole buffer.
    pub fn bytes(&self) -> &[u8; RESPONSE_LEN] {
        &self.0
    }

    /// Copy the leading bytes into `out`, returning how many were copied.
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let n = out.len().min(RESPONSE_LEN);
        out[..n].copy_from_slice(&self.0[..n]);
        n
    }
}

/// Pack up to four bytes little-endian: `value = b1 << 8 | b0`, `index = b3 << 8 | b2`.
///
/// Missing bytes are sent as zero; bytes past the fourth are ignored.
pub fn pack_bytes(bytes: &[u8]) -> (u16, u16) {
    let mut buf = [0u8; MAX_PACKED];
    let n = bytes.len().min(MAX_PACKED);
    buf[..n].copy_from_slice(&bytes[..n]);
    (
        u16::from_le_bytes([buf[0], buf[1]]),
        u16::from_le_bytes([buf[2], buf[3]]),
    )
}

/// Inverse of [`pack_bytes`].
pub fn unpack_bytes(value: u16, index: u16) -> [u8; MAX_PACKED] {
    let [b0, b1] = value.to_le_bytes();
    let [b2, b3] = index.to_le_bytes();
    [b0, b1, b2, b3]
}

/// Request byte carrying a transfer length and a flag.
///
/// SPI sends use group `0xF` with the automatic chip select flag, I2C writes use group `0xE`
/// with the STOP flag, i.e. `base + length + (flag << 3)`.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct SizedOpcode {
    /// Number of payload bytes, 0 to 4.
    #[bits(3)]
    pub length: u8,
    /// Chip select mode (SPI) or STOP condition (I2C).
    pub flag: bool,
    /// Upper nibble of the request byte.
    #[bits(4)]
    pub group: u8,
}

impl SizedOpcode {
    fn sized(base: u8, length: usize, flag: bool) -> Self {
        Self::from_bits(base)
            .with_length(length.min(MAX_PACKED) as u8)
            .with_flag(flag)
    }
}

/// SPI send request byte for `length` bytes (clamped to 4).
pub fn spi_send_opcode(length: usize, auto_cs: bool) -> u8 {
    SizedOpcode::sized(SPI_SEND_BASE, length, auto_cs).into_bits()
}

/// I2C write request byte for `length` bytes (clamped to 4).
pub fn i2c_write_opcode(length: usize, stop: bool) -> u8 {
    SizedOpcode::sized(I2C_WRITE_BASE, length, stop).into_bits()
}

/// I2C address byte sent after START: `address << 1 | direction`.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct I2cAddressByte {
    /// Set for a read transfer.
    pub read: bool,
    /// 7-bit slave address.
    #[bits(7)]
    pub address: u8,
}

/// `wValue`/`wIndex` of an I2C read of `length` bytes: the length in the high byte of
/// `wValue`, the STOP flag in bit 0 of both.
pub fn i2c_read_params(length: u8, stop: bool) -> (u16, u16) {
    let stop = stop as u16;
    (((length as u16) << 8) | stop, stop)
}

/// `wValue` of the ADC init request: the reference selector in the high byte, the fixed
/// prescaler setting `0x07` in the low byte.
pub fn analog_init_value(reference: u8) -> u16 {
    ((reference as u16) << 8) | 0x07
}

/// Low byte of `wValue` for WS2812 requests: pin in the low nibble, action in the high nibble.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Ws2812Control {
    /// Output pin number.
    #[bits(4)]
    pub pin: u8,
    /// One of the `WS2812_*` actions.
    #[bits(4)]
    pub action: u8,
}

/// Push the preload buffer out to the LED string.
pub const WS2812_FLUSH: u8 = 1;
/// Append a pixel to the preload buffer.
pub const WS2812_PRELOAD: u8 = 2;
/// Append a pixel and push the buffer out.
pub const WS2812_WRITE: u8 = 3;

/// `wValue`/`wIndex` of a WS2812 request: `g << 8 | control`, `b << 8 | r`.
pub fn ws2812_params(control: Ws2812Control, r: u8, g: u8, b: u8) -> (u16, u16) {
    (
        u16::from_le_bytes([control.into_bits(), g]),
        u16::from_le_bytes([r, b]),
    )
}

/// Lowest serial number accepted by the firmware.
pub const SERIAL_MIN: u16 = 100;
/// Highest serial number accepted by the firmware.
pub const SERIAL_MAX: u16 = 999;

/// `wValue`/`wIndex` of a serial number change: the number is clamped to three decimal
/// digits and sent as ASCII, `d1 << 8 | d0` and `d2`.
pub fn serial_number_params(serial: u16) -> (u16, u16) {
    let serial = serial.clamp(SERIAL_MIN, SERIAL_MAX);
    let digits = [
        b'0' + (serial / 100) as u8,
        b'0' + (serial / 10 % 10) as u8,
        b'0' + (serial % 10) as u8,
    ];
    (u16::from_le_bytes([digits[0], digits[1]]), digits[2] as u16)
}
