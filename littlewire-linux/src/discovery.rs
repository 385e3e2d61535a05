use crate::pattern::shell_match;
use littlewire::commands::{PRODUCT_ID, VENDOR_ID};

/// Capacity of a [`DeviceList`] unless stated otherwise.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A USB device seen during a scan, identified by its descriptor IDs.
pub struct Candidate<D> {
    /// `idVendor`.
    pub vendor_id: u16,
    /// `idProduct`.
    pub product_id: u16,
    /// Native device reference.
    pub device: D,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// String descriptors of a device; `None` where the device has none.
pub struct DeviceStrings {
    /// Manufacturer string.
    pub manufacturer: Option<String>,
    /// Product string.
    pub product: Option<String>,
    /// Serial number string.
    pub serial: Option<String>,
}

/// Something that can list USB devices and read their strings.
pub trait DeviceSource {
    /// Native device reference.
    type Device;
    /// Error of the underlying USB stack.
    type Error: core::fmt::Debug;

    /// Lists every attached device without opening it.
    fn candidates(&mut self) -> Result<Vec<Candidate<Self::Device>>, Self::Error>;

    /// Opens a device long enough to read its string descriptors.
    fn strings(&mut self, device: &Self::Device) -> Result<DeviceStrings, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Which devices a scan reports.
///
/// IDs of 0 match any device. Patterns use [`shell_match`]; an absent pattern matches
/// anything, and a missing string descriptor is matched as the empty string.
pub struct DeviceFilter {
    vendor_id: u16,
    product_id: u16,
    manufacturer: Option<String>,
    product: Option<String>,
    serial: Option<String>,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            manufacturer: None,
            product: None,
            serial: None,
        }
    }
}

impl DeviceFilter {
    /// Matches every Little Wire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match other USB IDs.
    pub fn with_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    /// Pattern for the manufacturer string.
    pub fn with_manufacturer(mut self, pattern: impl Into<String>) -> Self {
        self.manufacturer = Some(pattern.into());
        self
    }

    /// Pattern for the product string.
    pub fn with_product(mut self, pattern: impl Into<String>) -> Self {
        self.product = Some(pattern.into());
        self
    }

    /// Pattern for the serial number string.
    pub fn with_serial(mut self, pattern: impl Into<String>) -> Self {
        self.serial = Some(pattern.into());
        self
    }

    /// Whether a device with these IDs is worth opening.
    pub fn matches_ids(&self, vendor_id: u16, product_id: u16) -> bool {
        (self.vendor_id == 0 || self.vendor_id == vendor_id)
            && (self.product_id == 0 || self.product_id == product_id)
    }

    /// Whether the string descriptors match every pattern.
    pub fn matches_strings(&self, strings: &DeviceStrings) -> bool {
        let check = |value: &Option<String>, pattern: &Option<String>| {
            shell_match(value.as_deref().unwrap_or(""), pattern.as_deref())
        };
        check(&strings.manufacturer, &self.manufacturer)
            && check(&strings.product, &self.product)
            && check(&strings.serial, &self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A matching device and the number in its serial string.
pub struct DeviceDescriptor<D> {
    /// Serial number, see [`parse_serial`].
    pub serial_number: i32,
    /// Native device reference.
    pub device: D,
}

/// Devices found by [`scan`], in discovery order.
///
/// Holds at most `N` devices; further matches are counted in [`dropped`](Self::dropped).
#[derive(Debug)]
pub struct DeviceList<D, const N: usize = DEFAULT_CAPACITY> {
    devices: heapless::Vec<DeviceDescriptor<D>, N>,
    dropped: usize,
}

impl<D, const N: usize> Default for DeviceList<D, N> {
    fn default() -> Self {
        Self {
            devices: heapless::Vec::new(),
            dropped: 0,
        }
    }
}

impl<D, const N: usize> DeviceList<D, N> {
    /// Appends a device, or counts it as dropped if the list is full.
    pub fn push(&mut self, descriptor: DeviceDescriptor<D>) -> bool {
        match self.devices.push(descriptor) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Number of devices held.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device was found.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Matching devices that did not fit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The device at `index`, `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&DeviceDescriptor<D>> {
        self.devices.get(index)
    }

    /// The device with the given serial number.
    ///
    /// If several devices share a serial number, the last one found is returned.
    pub fn find_by_serial(&self, serial: i32) -> Option<&DeviceDescriptor<D>> {
        self.devices
            .iter()
            .rev()
            .find(|d| d.serial_number == serial)
    }

    /// Iterates over the devices in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor<D>> {
        self.devices.iter()
    }
}

/// Parses the leading decimal number of a serial string.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first non-digit and an
/// unparseable string yields 0.
pub fn parse_serial(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| {
            acc.saturating_mul(10).saturating_add((d - b'0') as i32)
        });
    if negative { -value } else { value }
}

/// Scans `source` for devices matching `filter`.
///
/// Devices whose strings cannot be read (usually for lack of permissions) are skipped with a
/// warning.
///
/// # Errors
/// The source's error if the device list itself cannot be obtained.
pub fn scan<S: DeviceSource, const N: usize>(
    source: &mut S,
    filter: &DeviceFilter,
) -> Result<DeviceList<S::Device, N>, S::Error> {
    let mut list = DeviceList::default();
    for candidate in source.candidates()? {
        if !filter.matches_ids(candidate.vendor_id, candidate.product_id) {
            continue;
        }
        let strings = match source.strings(&candidate.device) {
            Ok(strings) => strings,
            Err(e) => {
                log::warn!(
                    "cannot query VID={:#06x} PID={:#06x}: {e:?}",
                    candidate.vendor_id,
                    candidate.product_id
                );
                continue;
            }
        };
        log::debug!(
            "seen VID={:#06x} PID={:#06x} {strings:?}",
            candidate.vendor_id,
            candidate.product_id
        );
        if !filter.matches_strings(&strings) {
            continue;
        }
        let serial_number = strings.serial.as_deref().map(parse_serial).unwrap_or(0);
        if !list.push(DeviceDescriptor {
            serial_number,
            device: candidate.device,
        }) {
            log::warn!("device list full ({}), skipping serial {serial_number}", N);
        }
    }
    Ok(list)
}
