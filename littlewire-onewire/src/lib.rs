#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # littlewire-onewire
//! A no-std 1-Wire bus abstraction and ROM search.
//!
//! The [OneWire] trait captures the bit and byte primitives a bus master exposes: reset with presence
//! detection, writing and reading bytes, and writing and reading single bits. Anything that can perform
//! these primitives (a USB bridge, a bit-banged pin, an I2C bridge chip) can drive the
//! [ROM search](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html) implemented
//! by [SearchState] and [OneWireSearch].
//!
//! Discovered addresses are reported as [RomAddress] values and validated with the table-driven
//! Dallas/Maxim CRC-8 in [OneWireCrc].

mod error;
mod rom;
mod search;
mod traits;
mod utils;
pub use error::OneWireError;
pub use rom::RomAddress;
pub use search::{OneWireSearch, OneWireSearchKind, SearchPhase, SearchState};
pub use traits::OneWire;
pub use utils::OneWireCrc;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;

/// Command to match a specific ROM address.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to address every device on the bus at once.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to read the ROM of the only device on a single-drop bus.
pub const ONEWIRE_READ_ROM_CMD: u8 = 0x33;

/// Command to search for devices on the 1-Wire bus
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Command to search for devices in alarm state on the 1-Wire bus
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;
