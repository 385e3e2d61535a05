use crate::{
    LittleWire, LittleWireError, Transport,
    commands::{
        ONEWIRE_READ_BIT, ONEWIRE_READ_BYTE, ONEWIRE_RESET, ONEWIRE_SEND_BIT, ONEWIRE_WRITE_BYTE,
    },
    frame::CommandFrame,
};
use embedded_hal::delay::DelayNs;
use littlewire_onewire::{
    OneWire, OneWireResult, OneWireSearchKind, RomAddress, SearchState,
};

/// Time the firmware needs for a reset pulse or a byte slot.
const ONEWIRE_SETTLE_MS: u32 = 3;

impl<T: Transport, D: DelayNs> OneWire for LittleWire<T, D> {
    type BusError = LittleWireError;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        let resp = self.invoke_then_fetch(
            CommandFrame::new(ONEWIRE_RESET),
            Some(ONEWIRE_SETTLE_MS),
        )?;
        Ok(resp.byte() != 0)
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        self.invoke(CommandFrame::new(ONEWIRE_WRITE_BYTE).with_value(byte as u16))?;
        self.delay.delay_ms(ONEWIRE_SETTLE_MS);
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let resp = self.invoke_then_fetch(
            CommandFrame::new(ONEWIRE_READ_BYTE),
            Some(ONEWIRE_SETTLE_MS),
        )?;
        Ok(resp.byte())
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        self.invoke(CommandFrame::new(ONEWIRE_SEND_BIT).with_value(bit as u16))?;
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        let resp = self.invoke_then_fetch(CommandFrame::new(ONEWIRE_READ_BIT), None)?;
        Ok(resp.byte() != 0)
    }
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Restarts the ROM search and returns the first device on the bus.
    ///
    /// Returns `Ok(None)` if the bus is empty or the address read back is corrupt.
    pub fn onewire_first_address(&mut self) -> OneWireResult<Option<RomAddress>, LittleWireError> {
        let mut search = core::mem::take(&mut self.search);
        let res = search.first(self);
        self.search = search;
        res
    }

    /// Continues the ROM search started by [`onewire_first_address`](Self::onewire_first_address).
    ///
    /// Returns `Ok(None)` once every device has been reported; the following call starts over.
    pub fn onewire_next_address(&mut self) -> OneWireResult<Option<RomAddress>, LittleWireError> {
        let mut search = core::mem::take(&mut self.search);
        let res = search.next(self);
        self.search = search;
        res
    }

    /// Checks whether the device with the given address is on the bus.
    ///
    /// The progress of an ongoing search is kept.
    pub fn onewire_verify(&mut self, rom: RomAddress) -> OneWireResult<bool, LittleWireError> {
        let mut search = core::mem::take(&mut self.search);
        let res = search.verify(self, rom);
        self.search = search;
        res
    }

    /// Selects between the normal and the alarm search, restarting the search.
    pub fn set_onewire_search_kind(&mut self, kind: OneWireSearchKind) {
        self.search = SearchState::new(kind);
    }

    /// Progress of the ROM search.
    pub fn onewire_search_state(&self) -> &SearchState {
        &self.search
    }
}
