use crate::{
    LittleWire, LittleWireError, LittleWireResult, Transport,
    commands::{SPI_DEBUG, SPI_INIT, SPI_UPDATE_DELAY},
    frame::{CommandFrame, MAX_PACKED, spi_send_opcode},
};
use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Chip select handling of an SPI message.
pub enum ChipSelect {
    /// The caller drives chip select through GPIO.
    #[default]
    Manual,
    /// The firmware asserts chip select around the message.
    Auto,
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Configures the SPI pins ([`Pin::SCK`](crate::Pin::SCK), [`Pin::MOSI`](crate::Pin::MOSI)
    /// and [`Pin::MISO`](crate::Pin::MISO)).
    pub fn spi_init(&mut self) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(SPI_INIT))?;
        Ok(())
    }

    /// Exchanges up to four bytes.
    ///
    /// Sends `tx` and stores the bytes clocked in at the same time into `rx`. Messages longer
    /// than four bytes are truncated.
    ///
    /// # Returns
    /// The number of bytes exchanged.
    ///
    /// # Errors
    /// [`LittleWireError::InvalidParam`] for an empty `tx`, without touching the device.
    pub fn spi_send_message(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        cs: ChipSelect,
    ) -> LittleWireResult<usize> {
        if tx.is_empty() {
            return Err(LittleWireError::InvalidParam);
        }
        if tx.len() > MAX_PACKED {
            log::warn!(
                "SPI message of {} bytes truncated to {MAX_PACKED}",
                tx.len()
            );
        }
        let len = tx.len().min(MAX_PACKED);
        let frame = CommandFrame::new(spi_send_opcode(len, cs == ChipSelect::Auto))
            .with_bytes(&tx[..len]);
        let resp = self.invoke_then_fetch(frame, None)?;
        let n = len.min(rx.len());
        resp.copy_to(&mut rx[..n]);
        Ok(len)
    }

    /// Shifts one byte out and returns the byte shifted in.
    ///
    /// The byte travels in `wValue`; the reference host library sends zeros here.
    pub fn spi_debug(&mut self, message: u8) -> LittleWireResult<u8> {
        let resp = self.invoke_then_fetch(
            CommandFrame::new(SPI_DEBUG).with_value(message as u16),
            None,
        )?;
        Ok(resp.byte())
    }

    /// Sets the delay between SPI clock edges, in firmware units.
    pub fn spi_update_delay(&mut self, duration: u16) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(SPI_UPDATE_DELAY).with_value(duration))?;
        Ok(())
    }
}
