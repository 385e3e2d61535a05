//! Firmware request codes.
//!
//! Every operation is a vendor, device-to-host control transfer whose `bRequest` is one of the
//! codes below. These values are fixed by the firmware and must not change.

/// USB vendor ID of the Little Wire.
pub const VENDOR_ID: u16 = 0x1781;
/// USB product ID of the Little Wire.
pub const PRODUCT_ID: u16 = 0x0c9f;
/// `bmRequestType` for every request: vendor, device recipient, device-to-host.
pub const REQUEST_TYPE: u8 = 0xc0;
/// Size of the response buffer read back by every request.
pub const RESPONSE_LEN: usize = 8;
/// Default timeout of a single request.
pub const DEFAULT_TIMEOUT_MS: u32 = 5000;

/// Read the firmware version; byte 0 is `0xXY` for version X.Y.
pub const FIRMWARE_VERSION: u8 = 34;
/// Store a new three digit USB serial number.
pub const CHANGE_SERIAL: u8 = 55;
/// Fetch the result of the previous two-phase request.
pub const FETCH_RESULT: u8 = 40;

/// Drive a pin high (or enable its pull-up when it is an input).
pub const DIGITAL_WRITE_HIGH: u8 = 18;
/// Drive a pin low (or disable its pull-up when it is an input).
pub const DIGITAL_WRITE_LOW: u8 = 19;
/// Configure a pin as an input.
pub const PIN_MODE_INPUT: u8 = 13;
/// Configure a pin as an output.
pub const PIN_MODE_OUTPUT: u8 = 14;
/// Read the level of a pin.
pub const DIGITAL_READ: u8 = 20;

/// Enable the ADC with a voltage reference.
pub const ANALOG_INIT: u8 = 35;
/// Sample an ADC channel.
pub const ANALOG_READ: u8 = 15;

/// Start the hardware PWM.
pub const PWM_INIT: u8 = 16;
/// Stop the hardware PWM.
pub const PWM_STOP: u8 = 32;
/// Set the compare values of both PWM channels.
pub const PWM_UPDATE_COMPARE: u8 = 17;
/// Set the PWM clock prescaler.
pub const PWM_UPDATE_PRESCALER: u8 = 22;

/// Configure the SPI pins.
pub const SPI_INIT: u8 = 23;
/// Base of the SPI send request; length and chip select mode are added in.
pub const SPI_SEND_BASE: u8 = 0xf0;
/// Shift one byte out on MOSI without chip select handling.
pub const SPI_DEBUG: u8 = 33;
/// Set the delay between SPI clock edges.
pub const SPI_UPDATE_DELAY: u8 = 31;

/// Configure the I2C pins.
pub const I2C_INIT: u8 = 44;
/// Send a START condition and an address byte.
pub const I2C_START: u8 = 45;
/// Base of the I2C write request; length and STOP flag are added in.
pub const I2C_WRITE_BASE: u8 = 0xe0;
/// Clock bytes in from the I2C bus.
pub const I2C_READ: u8 = 46;
/// Set the I2C signal delay.
pub const I2C_UPDATE_DELAY: u8 = 49;

/// Send a 1-Wire reset pulse.
pub const ONEWIRE_RESET: u8 = 41;
/// Write a byte to the 1-Wire bus.
pub const ONEWIRE_WRITE_BYTE: u8 = 42;
/// Read a byte from the 1-Wire bus.
pub const ONEWIRE_READ_BYTE: u8 = 43;
/// Read a single bit from the 1-Wire bus.
pub const ONEWIRE_READ_BIT: u8 = 50;
/// Write a single bit to the 1-Wire bus.
pub const ONEWIRE_SEND_BIT: u8 = 51;

/// Enable or disable the software PWM.
pub const SOFT_PWM_STATE: u8 = 47;
/// Set the three software PWM channels.
pub const SOFT_PWM_WRITE: u8 = 48;

/// WS2812 LED string request; the action is encoded in the parameters.
pub const WS2812: u8 = 54;
