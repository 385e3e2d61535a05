use crate::discovery::{Candidate, DeviceSource, DeviceStrings};
use linux_embedded_hal::Delay;
use littlewire::{LittleWire, LittleWireBuilder, LittleWireError, Transport, commands::RESPONSE_LEN};
use rusb::{Context, Device, DeviceHandle, Direction, Recipient, RequestType, UsbContext};
use std::time::Duration;

/// A Little Wire session over libusb.
pub type UsbLittleWire = LittleWire<UsbTransport, Delay>;

/// Maps a libusb error onto the Little Wire error table.
pub fn usb_error(err: rusb::Error) -> LittleWireError {
    match err {
        rusb::Error::Io => LittleWireError::Io,
        rusb::Error::InvalidParam => LittleWireError::InvalidParam,
        rusb::Error::Access => LittleWireError::Access,
        rusb::Error::NoDevice => LittleWireError::NoDevice,
        rusb::Error::NotFound => LittleWireError::NotFound,
        rusb::Error::Busy => LittleWireError::Busy,
        rusb::Error::Timeout => LittleWireError::Timeout,
        rusb::Error::Overflow => LittleWireError::Overflow,
        rusb::Error::Pipe => LittleWireError::Pipe,
        rusb::Error::Interrupted => LittleWireError::Interrupted,
        rusb::Error::NoMem => LittleWireError::NoMemory,
        rusb::Error::NotSupported => LittleWireError::NotSupported,
        rusb::Error::BadDescriptor | rusb::Error::Other => LittleWireError::Other,
    }
}

/// [`Transport`] over an open libusb handle.
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
}

impl UsbTransport {
    /// Opens the device.
    pub fn open(device: &Device<Context>) -> Result<Self, LittleWireError> {
        let handle = device.open().map_err(usb_error)?;
        Ok(Self { handle })
    }

    /// The underlying handle.
    pub fn handle(&self) -> &DeviceHandle<Context> {
        &self.handle
    }
}

impl Transport for UsbTransport {
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8; RESPONSE_LEN],
        timeout_ms: u32,
    ) -> Result<usize, LittleWireError> {
        self.handle
            .read_control(
                rusb::request_type(Direction::In, RequestType::Vendor, Recipient::Device),
                request,
                value,
                index,
                buf,
                Duration::from_millis(timeout_ms as u64),
            )
            .map_err(usb_error)
    }
}

/// Opens a session with a discovered device.
pub fn connect(
    device: &Device<Context>,
    builder: LittleWireBuilder,
) -> Result<UsbLittleWire, LittleWireError> {
    Ok(builder.build(UsbTransport::open(device)?, Delay))
}

/// [`DeviceSource`] listing the devices of a libusb context.
pub struct RusbSource {
    context: Context,
}

impl RusbSource {
    /// Creates a fresh libusb context.
    pub fn new() -> rusb::Result<Self> {
        Ok(Self::with_context(Context::new()?))
    }

    /// Uses an existing context.
    pub fn with_context(context: Context) -> Self {
        Self { context }
    }
}

impl DeviceSource for RusbSource {
    type Device = Device<Context>;
    type Error = rusb::Error;

    fn candidates(&mut self) -> rusb::Result<Vec<Candidate<Self::Device>>> {
        let mut out = Vec::new();
        for device in self.context.devices()?.iter() {
            match device.device_descriptor() {
                Ok(desc) => out.push(Candidate {
                    vendor_id: desc.vendor_id(),
                    product_id: desc.product_id(),
                    device,
                }),
                Err(e) => log::debug!(
                    "skipping bus {} address {}: {e}",
                    device.bus_number(),
                    device.address()
                ),
            }
        }
        Ok(out)
    }

    fn strings(&mut self, device: &Self::Device) -> rusb::Result<DeviceStrings> {
        let desc = device.device_descriptor()?;
        let handle = device.open()?;
        Ok(DeviceStrings {
            manufacturer: optional_string("manufacturer", desc.manufacturer_string_index(), || {
                handle.read_manufacturer_string_ascii(&desc)
            }),
            product: optional_string("product", desc.product_string_index(), || {
                handle.read_product_string_ascii(&desc)
            }),
            serial: optional_string("serial", desc.serial_number_string_index(), || {
                handle.read_serial_number_string_ascii(&desc)
            }),
        })
    }
}

/// Reads a string descriptor the device may lack; a failed read counts as absent.
fn optional_string(
    name: &str,
    index: Option<u8>,
    read: impl FnOnce() -> rusb::Result<String>,
) -> Option<String> {
    index?;
    match read() {
        Ok(s) => Some(s),
        Err(e) => {
            log::debug!("cannot read {name} string: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use littlewire::commands::REQUEST_TYPE;

    #[test]
    fn vendor_in_request_type() {
        assert_eq!(
            rusb::request_type(Direction::In, RequestType::Vendor, Recipient::Device),
            REQUEST_TYPE
        );
    }

    #[test]
    fn unreadable_string_is_absent() {
        assert_eq!(
            optional_string("manufacturer", Some(1), || Err(rusb::Error::Pipe)),
            None
        );
        assert_eq!(
            optional_string("serial", Some(3), || Ok("512".into())),
            Some("512".into())
        );
        assert_eq!(
            optional_string("product", None, || -> rusb::Result<String> {
                panic!("no descriptor index")
            }),
            None
        );
    }

    #[test]
    fn error_codes_follow_libusb() {
        let table = [
            (rusb::Error::Io, -1),
            (rusb::Error::InvalidParam, -2),
            (rusb::Error::Access, -3),
            (rusb::Error::NoDevice, -4),
            (rusb::Error::NotFound, -5),
            (rusb::Error::Busy, -6),
            (rusb::Error::Timeout, -7),
            (rusb::Error::Overflow, -8),
            (rusb::Error::Pipe, -9),
            (rusb::Error::Interrupted, -10),
            (rusb::Error::NoMem, -11),
            (rusb::Error::NotSupported, -12),
            (rusb::Error::BadDescriptor, -99),
            (rusb::Error::Other, -99),
        ];
        for (err, code) in table {
            assert_eq!(usb_error(err).code(), code, "{err:?}");
        }
    }
}
