use crate::{
    LittleWire, LittleWireError, LittleWireResult, Transport,
    commands::{I2C_INIT, I2C_READ, I2C_START, I2C_UPDATE_DELAY, RESPONSE_LEN},
    frame::{CommandFrame, I2cAddressByte, MAX_PACKED, i2c_read_params, i2c_write_opcode},
};
use core::fmt;
use embedded_hal::{
    delay::DelayNs,
    i2c::{self, ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress},
};

/// Time the firmware needs to clock in a read before it can be fetched.
const READ_SETTLE_MS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction bit sent with the address.
pub enum I2cDirection {
    /// Master to slave.
    Write,
    /// Slave to master.
    Read,
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Configures the I2C pins.
    pub fn i2c_init(&mut self) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(I2C_INIT))?;
        Ok(())
    }

    /// Sends a START (or repeated START) condition followed by the address byte.
    ///
    /// # Returns
    /// `true` if the slave acknowledged its address.
    ///
    /// # Errors
    /// [`LittleWireError::InvalidParam`] for an address wider than 7 bits.
    pub fn i2c_start(&mut self, address: u8, direction: I2cDirection) -> LittleWireResult<bool> {
        if address > 0x7f {
            return Err(LittleWireError::InvalidParam);
        }
        let addr = I2cAddressByte::new()
            .with_address(address)
            .with_read(direction == I2cDirection::Read);
        let resp = self.invoke_then_fetch(
            CommandFrame::new(I2C_START).with_value(addr.into_bits() as u16),
            None,
        )?;
        Ok(resp.byte() == 0)
    }

    /// Writes one to four bytes, optionally followed by a STOP condition.
    ///
    /// # Errors
    /// [`LittleWireError::InvalidParam`] for an empty or oversized buffer.
    pub fn i2c_write(&mut self, data: &[u8], stop: bool) -> LittleWireResult<()> {
        if data.is_empty() || data.len() > MAX_PACKED {
            return Err(LittleWireError::InvalidParam);
        }
        self.invoke(CommandFrame::new(i2c_write_opcode(data.len(), stop)).with_bytes(data))?;
        Ok(())
    }

    /// Sends a STOP condition without data.
    pub(crate) fn i2c_stop(&mut self) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(i2c_write_opcode(0, true)))?;
        Ok(())
    }

    /// Reads one to eight bytes into `buf`, optionally followed by a STOP condition.
    ///
    /// # Errors
    /// [`LittleWireError::InvalidParam`] for an empty or oversized buffer.
    pub fn i2c_read(&mut self, buf: &mut [u8], stop: bool) -> LittleWireResult<()> {
        if buf.is_empty() || buf.len() > RESPONSE_LEN {
            return Err(LittleWireError::InvalidParam);
        }
        let (value, index) = i2c_read_params(buf.len() as u8, stop);
        let resp = self.invoke_then_fetch(
            CommandFrame::new(I2C_READ).with_value(value).with_index(index),
            Some(READ_SETTLE_MS),
        )?;
        resp.copy_to(buf);
        Ok(())
    }

    /// Sets the I2C signal delay, in firmware units.
    pub fn i2c_update_delay(&mut self, duration: u16) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(I2C_UPDATE_DELAY).with_value(duration))?;
        Ok(())
    }

    /// Borrows the I2C master as an [`embedded_hal`] bus.
    ///
    /// Call [`i2c_init`](Self::i2c_init) once beforehand.
    pub fn i2c_bus(&mut self) -> I2cBus<'_, T, D> {
        I2cBus { lw: self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors of the [`I2cBus`] adapter.
pub enum I2cBusError {
    /// The request to the Little Wire failed.
    Transport(LittleWireError),
    /// No slave acknowledged the address.
    AddressNack,
}

impl From<LittleWireError> for I2cBusError {
    fn from(value: LittleWireError) -> Self {
        I2cBusError::Transport(value)
    }
}

impl fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cBusError::Transport(e) => write!(f, "transport error: {e}"),
            I2cBusError::AddressNack => write!(f, "address not acknowledged"),
        }
    }
}

impl i2c::Error for I2cBusError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cBusError::Transport(_) => ErrorKind::Other,
            I2cBusError::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
        }
    }
}

/// The I2C master of a [`LittleWire`] as an [`embedded_hal::i2c::I2c`] bus.
///
/// Operations are split into requests the firmware can carry: writes of at most four bytes,
/// reads of at most eight. A START is sent before the first operation and whenever the
/// direction changes; the STOP condition goes with the last chunk of the last operation.
/// An empty last operation is closed with a bare STOP.
pub struct I2cBus<'a, T, D> {
    lw: &'a mut LittleWire<T, D>,
}

impl<T, D> i2c::ErrorType for I2cBus<'_, T, D> {
    type Error = I2cBusError;
}

impl<T: Transport, D: DelayNs> i2c::I2c<SevenBitAddress> for I2cBus<'_, T, D> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let count = operations.len();
        let mut direction = None;
        for (i, op) in operations.iter_mut().enumerate() {
            let last_op = i + 1 == count;
            let (dir, empty) = match op {
                Operation::Read(buf) => (I2cDirection::Read, buf.is_empty()),
                Operation::Write(data) => (I2cDirection::Write, data.is_empty()),
            };
            if direction != Some(dir) {
                if !self.lw.i2c_start(address, dir)? {
                    return Err(I2cBusError::AddressNack);
                }
                direction = Some(dir);
            }
            if empty {
                if last_op {
                    self.lw.i2c_stop()?;
                }
                continue;
            }
            match op {
                Operation::Write(data) => {
                    let chunks = data.len().div_ceil(MAX_PACKED);
                    for (j, chunk) in data.chunks(MAX_PACKED).enumerate() {
                        self.lw.i2c_write(chunk, last_op && j + 1 == chunks)?;
                    }
                }
                Operation::Read(buf) => {
                    let chunks = buf.len().div_ceil(RESPONSE_LEN);
                    for (j, chunk) in buf.chunks_mut(RESPONSE_LEN).enumerate() {
                        self.lw.i2c_read(chunk, last_op && j + 1 == chunks)?;
                    }
                }
            }
        }
        Ok(())
    }
}
