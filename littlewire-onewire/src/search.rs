use crate::{
    ONEWIRE_CONDITIONAL_SEARCH_CMD, ONEWIRE_SEARCH_CMD, OneWire, OneWireResult, RomAddress,
    utils::OneWireCrc,
};

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Type of search performed using [`SearchState`] or [`OneWireSearch`].
pub enum OneWireSearchKind {
    /// Normal search
    #[default]
    Normal = ONEWIRE_SEARCH_CMD,
    /// Search only for devices with alarm
    Alarmed = ONEWIRE_CONDITIONAL_SEARCH_CMD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where an enumeration session currently stands.
pub enum SearchPhase {
    /// No search in progress; the next call starts from the beginning.
    Idle,
    /// At least one more device remains to be discovered.
    Searching,
    /// The last call returned the final device on the bus.
    Exhausted,
}

/// State of a ROM search carried across calls.
///
/// One enumeration session runs from [first](SearchState::first) through repeated
/// [next](SearchState::next) calls until `None` is returned. Bit positions are numbered from 1
/// (least significant bit of the family code) to 64 (most significant bit of the CRC byte), and
/// a discrepancy position of 0 means "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    cmd: u8,
    last_discrepancy: u8,
    last_family_discrepancy: u8,
    last_device: bool,
    crc: OneWireCrc,
    rom: RomAddress,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(OneWireSearchKind::Normal)
    }
}

impl SearchState {
    /// Creates an idle search state issuing the given search command.
    pub const fn new(kind: OneWireSearchKind) -> Self {
        Self {
            cmd: kind as u8,
            last_discrepancy: 0,
            last_family_discrepancy: 0,
            last_device: false,
            crc: OneWireCrc::new(),
            rom: RomAddress([0; 8]),
        }
    }

    /// Bit position of the last branch where the 0 path was taken.
    pub fn last_discrepancy(&self) -> u8 {
        self.last_discrepancy
    }

    /// Last discrepancy position within the family code byte.
    pub fn last_family_discrepancy(&self) -> u8 {
        self.last_family_discrepancy
    }

    /// Whether the previous call found the final device.
    pub fn last_device(&self) -> bool {
        self.last_device
    }

    /// CRC-8 accumulated over the ROM read by the previous call.
    pub fn crc(&self) -> u8 {
        self.crc.value()
    }

    /// The address buffer as left by the previous call.
    pub fn rom(&self) -> RomAddress {
        self.rom
    }

    /// Current phase of the enumeration session.
    pub fn phase(&self) -> SearchPhase {
        if self.last_device {
            SearchPhase::Exhausted
        } else if self.last_discrepancy != 0 {
            SearchPhase::Searching
        } else {
            SearchPhase::Idle
        }
    }

    /// Resets the search state.
    pub fn reset(&mut self) {
        self.last_discrepancy = 0;
        self.last_family_discrepancy = 0;
        self.last_device = false;
    }

    /// Restarts the enumeration and returns the first device found.
    ///
    /// # Errors
    /// Bus errors are passed through; the search state is reset.
    pub fn first<B: OneWire>(
        &mut self,
        bus: &mut B,
    ) -> OneWireResult<Option<RomAddress>, B::BusError> {
        self.reset();
        self.next(bus)
    }

    /// Searches for the next device on the 1-Wire bus.
    ///
    /// This method implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html).
    /// Returns `Ok(None)` when the bus is empty, when the ROM read fails its CRC, when the family
    /// code reads as zero, or when the previous call already returned the last device. In each of
    /// these cases the state is reset, so the following call starts a new enumeration.
    ///
    /// # Errors
    /// Bus errors are passed through; the search state is reset since a partially completed
    /// search cannot be resumed.
    pub fn next<B: OneWire>(
        &mut self,
        bus: &mut B,
    ) -> OneWireResult<Option<RomAddress>, B::BusError> {
        match self.search(bus) {
            Ok(Some(rom)) => {
                log::debug!("1-Wire search found {rom} ({:?})", self.phase());
                Ok(Some(rom))
            }
            Ok(None) => {
                self.reset();
                Ok(None)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn search<B: OneWire>(
        &mut self,
        bus: &mut B,
    ) -> OneWireResult<Option<RomAddress>, B::BusError> {
        if self.last_device {
            return Ok(None);
        }
        if !bus.reset()? {
            return Ok(None);
        }
        bus.write_byte(self.cmd)?;

        self.crc.reset();
        let mut id_bit_num: u8 = 1;
        let mut last_zero: u8 = 0;
        let mut idx: usize = 0; // Index in the ROM array
        let mut rom_mask: u8 = 1; // Mask for the current bit in the ROM byte
        let rom = &mut self.rom.0;
        while idx < rom.len() {
            let id_bit = bus.read_bit()?;
            let complement_bit = bus.read_bit()?;
            if id_bit && complement_bit {
                // Nobody is driving the bus any more.
                break;
            }
            let dir = if id_bit != complement_bit {
                id_bit
            } else {
                let dir = if id_bit_num < self.last_discrepancy {
                    rom[idx] & rom_mask != 0
                } else {
                    id_bit_num == self.last_discrepancy
                };
                if !dir {
                    last_zero = id_bit_num;
                    if last_zero < 9 {
                        self.last_family_discrepancy = last_zero;
                    }
                }
                dir
            };
            if dir {
                rom[idx] |= rom_mask;
            } else {
                rom[idx] &= !rom_mask;
            }
            bus.write_bit(dir)?;

            id_bit_num += 1;
            rom_mask <<= 1;
            if rom_mask == 0 {
                self.crc.update(rom[idx]);
                idx += 1;
                rom_mask = 1;
            }
        }

        if id_bit_num <= 64 || self.crc.value() != 0 {
            log::debug!(
                "1-Wire search aborted at bit {id_bit_num} (crc {:#04x})",
                self.crc.value()
            );
            return Ok(None);
        }
        self.last_discrepancy = last_zero;
        self.last_device = last_zero == 0;
        if self.rom.family() == 0 {
            return Ok(None);
        }
        Ok(Some(self.rom))
    }

    /// Verifies if the device with the given ROM code is present on the 1-Wire bus.
    ///
    /// The enumeration state is saved before the check and restored afterwards, so this may be
    /// called in the middle of an enumeration session.
    pub fn verify<B: OneWire>(
        &mut self,
        bus: &mut B,
        rom: RomAddress,
    ) -> OneWireResult<bool, B::BusError> {
        let saved = *self;
        self.rom = rom;
        self.last_discrepancy = 64;
        self.last_device = false;
        let res = self.search(bus);
        *self = saved;
        Ok(res? == Some(rom))
    }
}

/// A structure for searching devices on a 1-Wire bus.
///
/// Borrows the bus for the duration of the enumeration and keeps a [`SearchState`].
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    state: SearchState,
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    /// * `cmd` - The kind of search to run.
    pub fn new(onewire: &'a mut T, cmd: OneWireSearchKind) -> Self {
        Self {
            onewire,
            state: SearchState::new(cmd),
        }
    }

    /// The search state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Restarts the search and returns the first device found.
    pub fn first(&mut self) -> OneWireResult<Option<RomAddress>, T::BusError> {
        self.state.first(&mut *self.onewire)
    }

    /// Searches for the next device; see [`SearchState::next`].
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> OneWireResult<Option<RomAddress>, T::BusError> {
        self.state.next(&mut *self.onewire)
    }

    /// Verifies if the device with the given ROM code is present on the bus.
    pub fn verify(&mut self, rom: RomAddress) -> OneWireResult<bool, T::BusError> {
        self.state.verify(&mut *self.onewire, rom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::{collections::BTreeSet, vec::Vec};

    /// Wired-AND bus populated with a fixed set of ROMs.
    #[derive(Default)]
    struct SimulatedBus {
        devices: Vec<[u8; 8]>,
        active: Vec<bool>,
        bit: usize,
        complement: bool,
        commands: Vec<u8>,
        resets: usize,
    }

    impl SimulatedBus {
        fn new(devices: &[[u8; 8]]) -> Self {
            Self {
                devices: devices.to_vec(),
                ..Default::default()
            }
        }

        fn rom_bit(rom: &[u8; 8], n: usize) -> bool {
            RomAddress(*rom).bit(n)
        }
    }

    impl OneWire for SimulatedBus {
        type BusError = ();

        fn reset(&mut self) -> OneWireResult<bool, ()> {
            self.resets += 1;
            self.active = std::vec![true; self.devices.len()];
            self.bit = 0;
            self.complement = false;
            Ok(!self.devices.is_empty())
        }

        fn write_byte(&mut self, byte: u8) -> OneWireResult<(), ()> {
            self.commands.push(byte);
            Ok(())
        }

        fn read_byte(&mut self) -> OneWireResult<u8, ()> {
            Ok(0xff)
        }

        fn write_bit(&mut self, bit: bool) -> OneWireResult<(), ()> {
            for (rom, active) in self.devices.iter().zip(self.active.iter_mut()) {
                if Self::rom_bit(rom, self.bit) != bit {
                    *active = false;
                }
            }
            self.bit += 1;
            self.complement = false;
            Ok(())
        }

        fn read_bit(&mut self) -> OneWireResult<bool, ()> {
            let complement = self.complement;
            self.complement = !self.complement;
            // An idle line reads as 1; any device pulling low wins.
            Ok(self
                .devices
                .iter()
                .zip(self.active.iter())
                .filter(|&(_, &active)| active)
                .all(|(rom, _)| Self::rom_bit(rom, self.bit) != complement))
        }
    }

    fn with_crc(head: [u8; 7]) -> [u8; 8] {
        let mut rom = [0; 8];
        rom[..7].copy_from_slice(&head);
        rom[7] = OneWireCrc::compute(&head);
        rom
    }

    fn random_devices(seed: u64, count: usize) -> Vec<[u8; 8]> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut set = BTreeSet::new();
        while set.len() < count {
            let mut head = [0u8; 7];
            rng.fill(&mut head[..]);
            head[0] = rng.random_range(1..=255);
            set.insert(with_crc(head));
        }
        set.into_iter().collect()
    }

    fn enumerate(bus: &mut SimulatedBus, state: &mut SearchState) -> Vec<[u8; 8]> {
        let mut found = Vec::new();
        let mut next = state.first(bus).unwrap();
        while let Some(rom) = next {
            assert!(rom.is_valid());
            found.push(rom.0);
            next = state.next(bus).unwrap();
        }
        found
    }

    #[test]
    fn finds_every_device_exactly_once() {
        for (seed, count) in [(1, 2), (7, 5), (42, 16), (1234, 40)] {
            let devices = random_devices(seed, count);
            let mut bus = SimulatedBus::new(&devices);
            let mut state = SearchState::default();
            let mut found = enumerate(&mut bus, &mut state);
            assert_eq!(found.len(), count, "seed {seed}");
            found.sort();
            assert_eq!(found, devices, "seed {seed}");
            assert_eq!(state.phase(), SearchPhase::Idle);
        }
    }

    #[test]
    fn exhausted_search_does_not_touch_the_bus() {
        let devices = random_devices(3, 3);
        let mut bus = SimulatedBus::new(&devices);
        let mut state = SearchState::default();
        assert!(state.first(&mut bus).unwrap().is_some());
        assert_eq!(state.phase(), SearchPhase::Searching);
        assert!(state.next(&mut bus).unwrap().is_some());
        assert!(state.next(&mut bus).unwrap().is_some());
        assert_eq!(state.phase(), SearchPhase::Exhausted);
        assert!(state.last_device());
        let resets = bus.resets;
        assert_eq!(state.next(&mut bus).unwrap(), None);
        assert_eq!(bus.resets, resets);
        assert_eq!(state.phase(), SearchPhase::Idle);
    }

    #[test]
    fn empty_bus_resets_state() {
        let mut bus = SimulatedBus::new(&[]);
        let mut state = SearchState::default();
        assert_eq!(state.first(&mut bus).unwrap(), None);
        assert_eq!(state.last_discrepancy(), 0);
        assert_eq!(state.last_family_discrepancy(), 0);
        assert!(!state.last_device());
        assert_eq!(state.phase(), SearchPhase::Idle);
        assert!(bus.commands.is_empty());
    }

    #[test]
    fn single_device_is_last() {
        let rom = with_crc([0x28, 0xff, 0x64, 0x1e, 0x0f, 0x00, 0x00]);
        let mut bus = SimulatedBus::new(&[rom]);
        let mut state = SearchState::default();
        assert_eq!(state.first(&mut bus).unwrap(), Some(RomAddress(rom)));
        assert_eq!(state.last_discrepancy(), 0);
        assert_eq!(state.phase(), SearchPhase::Exhausted);
        assert_eq!(state.crc(), 0);
        assert_eq!(bus.commands, [ONEWIRE_SEARCH_CMD]);
    }

    #[test]
    fn family_discrepancy_is_tracked() {
        let a = with_crc([0x28, 1, 2, 3, 4, 5, 6]);
        let b = with_crc([0x29, 1, 2, 3, 4, 5, 6]);
        let mut bus = SimulatedBus::new(&[a, b]);
        let mut state = SearchState::default();
        assert_eq!(state.first(&mut bus).unwrap(), Some(RomAddress(a)));
        assert_eq!(state.last_family_discrepancy(), 1);
        assert!(state.last_discrepancy() >= 1);
        assert_eq!(state.next(&mut bus).unwrap(), Some(RomAddress(b)));
        assert_eq!(state.phase(), SearchPhase::Exhausted);
    }

    #[test]
    fn bad_crc_is_not_a_device() {
        let mut rom = with_crc([0x28, 1, 2, 3, 4, 5, 6]);
        rom[7] ^= 0x01;
        let mut bus = SimulatedBus::new(&[rom]);
        let mut state = SearchState::default();
        assert_eq!(state.first(&mut bus).unwrap(), None);
        assert_eq!(state.phase(), SearchPhase::Idle);
        assert_ne!(state.crc(), 0);
    }

    #[test]
    fn zero_family_is_not_a_device() {
        let rom = with_crc([0x00, 1, 2, 3, 4, 5, 6]);
        let mut bus = SimulatedBus::new(&[rom]);
        let mut state = SearchState::default();
        assert_eq!(state.first(&mut bus).unwrap(), None);
        assert!(!state.last_device());
        assert_eq!(state.last_discrepancy(), 0);
    }

    #[test]
    fn first_restarts_enumeration() {
        let devices = random_devices(9, 4);
        let mut bus = SimulatedBus::new(&devices);
        let mut state = SearchState::default();
        let first = state.first(&mut bus).unwrap();
        assert!(state.next(&mut bus).unwrap().is_some());
        assert_eq!(state.first(&mut bus).unwrap(), first);
    }

    #[test]
    fn verify_keeps_session() {
        let devices = random_devices(11, 3);
        let absent = with_crc([0x10, 9, 9, 9, 9, 9, 9]);
        let mut bus = SimulatedBus::new(&devices);
        let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
        assert!(search.first().unwrap().is_some());
        let before = *search.state();
        for rom in &devices {
            assert!(search.verify(RomAddress(*rom)).unwrap());
        }
        assert!(!search.verify(RomAddress(absent)).unwrap());
        assert_eq!(*search.state(), before);
        assert!(search.next().unwrap().is_some());
    }

    #[test]
    fn alarm_search_sends_conditional_command() {
        let devices = random_devices(5, 1);
        let mut bus = SimulatedBus::new(&devices);
        let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Alarmed);
        assert_eq!(search.next().unwrap(), Some(RomAddress(devices[0])));
        assert_eq!(search.next().unwrap(), None);
        assert_eq!(bus.commands, [ONEWIRE_CONDITIONAL_SEARCH_CMD]);
    }
}
