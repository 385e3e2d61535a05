#![deny(missing_docs)]
//! # littlewire-linux
//! Finding and opening Little Wire devices through libusb.
//!
//! [`scan`] walks a [`DeviceSource`] (normally [`RusbSource`]) and collects the devices matching
//! a [`DeviceFilter`] into a bounded [`DeviceList`]. Entries can be picked by position or by
//! serial number and handed to [`connect`], which returns a ready [`littlewire::LittleWire`]
//! session backed by [`UsbTransport`].

mod discovery;
mod pattern;
mod usb;

pub use discovery::{
    Candidate, DEFAULT_CAPACITY, DeviceDescriptor, DeviceFilter, DeviceList, DeviceSource,
    DeviceStrings, parse_serial, scan,
};
pub use pattern::shell_match;
pub use usb::{RusbSource, UsbLittleWire, UsbTransport, connect, usb_error};
