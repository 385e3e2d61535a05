#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # Little Wire
 *
 * Host driver for the Little Wire, a USB multi-tool that exposes GPIO, a 10-bit ADC, hardware
 * and software PWM, SPI, I2C, a 1-Wire master and a WS2812 LED driver through vendor control
 * transfers.
 *
 * A [`LittleWire`] session owns a [`Transport`] (anything able to issue a device-to-host
 * control request and read back the 8-byte response) and a [`DelayNs`](embedded_hal::delay::DelayNs)
 * timer used for the fixed settle times of the firmware. The session records the status of the
 * most recent request, which is available through [`LittleWire::last_status`] and
 * [`LittleWire::last_error_name`] in addition to the `Result` returned by every operation.
 *
 * The 1-Wire master implements [`OneWire`], so the ROM search of
 * [`littlewire_onewire`] runs directly on top of it.
 */

pub use littlewire_onewire::{
    OneWire, OneWireError, OneWireResult, OneWireSearch, OneWireSearchKind, RomAddress,
    SearchPhase, SearchState,
};

mod analog;
pub mod commands;
mod device;
mod error;
pub mod frame;
mod gpio;
mod i2c;
mod led;
mod onewire;
mod pwm;
mod spi;
mod transport;

#[cfg(test)]
mod mock;

pub use analog::{AdcChannel, VoltageRef};
pub use device::FirmwareVersion;
pub use error::{LittleWireError, error_name};
pub use gpio::{GpioPin, Pin, PinMode};
pub use i2c::{I2cBus, I2cBusError, I2cDirection};
pub use led::WS2812_PRELOAD_CAPACITY;
pub use pwm::Prescaler;
pub use spi::ChipSelect;
pub use transport::Transport;

use commands::{DEFAULT_TIMEOUT_MS, RESPONSE_LEN};

/// Results of Little Wire operations.
pub type LittleWireResult<T> = Result<T, LittleWireError>;

/// A session with one Little Wire device.
///
/// Takes ownership of a [`Transport`] and a timer implementing the
/// [`DelayNs`](embedded_hal::delay::DelayNs) trait. All protocol state (status of the last
/// request, response buffer, 1-Wire search progress, WS2812 preload count) lives here, so
/// independent sessions never interfere. A session is not meant to be shared between threads
/// without external locking; the firmware handles one request at a time and multi-step
/// sequences must not interleave.
pub struct LittleWire<T, D> {
    pub(crate) transport: T,
    pub(crate) delay: D,
    pub(crate) timeout_ms: u32,
    pub(crate) status: i32,
    pub(crate) rx: [u8; RESPONSE_LEN],
    pub(crate) search: SearchState,
    pub(crate) preloaded: u8,
}

impl<T, D> LittleWire<T, D> {
    /// Creates a new session with the default request timeout.
    pub fn new(transport: T, delay: D) -> Self {
        LittleWireBuilder::new().build(transport, delay)
    }

    /// Timeout applied to every request.
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Ends the session and hands back the transport and timer.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Builder for [`LittleWire`] sessions.
pub struct LittleWireBuilder {
    timeout_ms: u32,
}

impl Default for LittleWireBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LittleWireBuilder {
    /// Starts from the defaults: a 5 s request timeout.
    pub const fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the request timeout.
    ///
    /// A request that does not complete in time fails with
    /// [`LittleWireError::Timeout`]; it is not retried.
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Creates the session.
    pub fn build<T, D>(self, transport: T, delay: D) -> LittleWire<T, D> {
        LittleWire {
            transport,
            delay,
            timeout_ms: self.timeout_ms,
            status: 0,
            rx: [0; RESPONSE_LEN],
            search: SearchState::default(),
            preloaded: 0,
        }
    }
}
