use crate::{
    LittleWire, LittleWireError, LittleWireResult, Transport,
    commands::{CHANGE_SERIAL, FETCH_RESULT, FIRMWARE_VERSION, RESPONSE_LEN},
    error::error_name,
    frame::{CommandFrame, ResponseFrame, serial_number_params},
};
use bitfield_struct::bitfield;
use core::fmt;
use embedded_hal::delay::DelayNs;

/// Firmware version, reported as one byte `0xXY` for version X.Y.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Minor version.
    #[bits(4)]
    pub minor: u8,
    /// Major version.
    #[bits(4)]
    pub major: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl<T, D> LittleWire<T, D> {
    /// Status of the most recent request: the number of bytes transferred, or a negative
    /// error code.
    pub fn last_status(&self) -> i32 {
        self.status
    }

    /// Error of the most recent request, if it failed.
    pub fn last_error(&self) -> Option<LittleWireError> {
        LittleWireError::from_code(self.status)
    }

    /// Name of the error of the most recent request, `None` if it succeeded.
    pub fn last_error_name(&self) -> Option<&'static str> {
        error_name(self.status)
    }
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Issues one request and records its status.
    pub(crate) fn invoke(&mut self, frame: CommandFrame) -> LittleWireResult<ResponseFrame> {
        self.rx = [0; RESPONSE_LEN];
        let res = self.transport.control_in(
            frame.opcode,
            frame.value,
            frame.index,
            &mut self.rx,
            self.timeout_ms,
        );
        self.status = match res {
            Ok(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Err(e) => e.code(),
        };
        log::trace!(
            "request {:#04x} value {:#06x} index {:#06x}: status {}",
            frame.opcode,
            frame.value,
            frame.index,
            self.status
        );
        res.map(|_| ResponseFrame(self.rx))
    }

    /// Retrieves the result of the previous two-phase request.
    pub(crate) fn fetch(&mut self) -> LittleWireResult<ResponseFrame> {
        self.invoke(CommandFrame::new(FETCH_RESULT))
    }

    /// Issues a request, optionally waits for the firmware to finish, then fetches the result.
    ///
    /// The fetch is skipped if the first request fails.
    pub(crate) fn invoke_then_fetch(
        &mut self,
        frame: CommandFrame,
        settle_ms: Option<u32>,
    ) -> LittleWireResult<ResponseFrame> {
        self.invoke(frame)?;
        if let Some(ms) = settle_ms {
            self.delay.delay_ms(ms);
        }
        self.fetch()
    }

    /// Reads the firmware version.
    pub fn firmware_version(&mut self) -> LittleWireResult<FirmwareVersion> {
        let resp = self.invoke(CommandFrame::new(FIRMWARE_VERSION))?;
        Ok(FirmwareVersion::from_bits(resp.byte()))
    }

    /// Stores a new USB serial number.
    ///
    /// The value is clamped to `100..=999`. The device re-enumerates under the new serial
    /// after it is unplugged.
    pub fn change_serial_number(&mut self, serial: u16) -> LittleWireResult<()> {
        let (value, index) = serial_number_params(serial);
        self.invoke(
            CommandFrame::new(CHANGE_SERIAL)
                .with_value(value)
                .with_index(index),
        )?;
        Ok(())
    }

    /// Sends an arbitrary request and returns the raw response.
    ///
    /// The four data bytes are packed as `wValue = d2 << 8 | d1`, `wIndex = d4 << 8 | d3`.
    pub fn custom_message(&mut self, request: u8, data: [u8; 4]) -> LittleWireResult<ResponseFrame> {
        self.invoke(CommandFrame::new(request).with_bytes(&data))
    }
}
