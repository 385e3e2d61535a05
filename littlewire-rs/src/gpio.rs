use crate::{
    LittleWire, LittleWireError, LittleWireResult, Transport,
    commands::{DIGITAL_READ, DIGITAL_WRITE_HIGH, DIGITAL_WRITE_LOW, PIN_MODE_INPUT, PIN_MODE_OUTPUT},
    frame::CommandFrame,
};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The four general purpose pins, valued by their port bit on the microcontroller.
pub enum Pin {
    /// Pin 1, also PWM channel B and SPI MISO.
    Pin1 = 1,
    /// Pin 2, also SPI SCK.
    Pin2 = 2,
    /// Pin 3, shared with the reset line.
    Pin3 = 5,
    /// Pin 4, also PWM channel A and SPI MOSI.
    Pin4 = 0,
}

impl Pin {
    /// Hardware PWM channel A.
    pub const PWMA: Pin = Pin::Pin4;
    /// Hardware PWM channel B.
    pub const PWMB: Pin = Pin::Pin1;
    /// SPI clock.
    pub const SCK: Pin = Pin::Pin2;
    /// SPI data in.
    pub const MISO: Pin = Pin::Pin1;
    /// SPI data out.
    pub const MOSI: Pin = Pin::Pin4;
    /// Reset line.
    pub const RESET: Pin = Pin::Pin3;

    /// Port bit sent to the firmware.
    pub const fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction of a pin.
pub enum PinMode {
    /// High impedance input.
    Input,
    /// Push-pull output.
    Output,
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Drives a pin high or low.
    pub fn digital_write(&mut self, pin: Pin, high: bool) -> LittleWireResult<()> {
        let op = if high {
            DIGITAL_WRITE_HIGH
        } else {
            DIGITAL_WRITE_LOW
        };
        self.invoke(CommandFrame::new(op).with_value(pin.number() as u16))?;
        Ok(())
    }

    /// Sets the direction of a pin.
    pub fn pin_mode(&mut self, pin: Pin, mode: PinMode) -> LittleWireResult<()> {
        let op = match mode {
            PinMode::Input => PIN_MODE_INPUT,
            PinMode::Output => PIN_MODE_OUTPUT,
        };
        self.invoke(CommandFrame::new(op).with_value(pin.number() as u16))?;
        Ok(())
    }

    /// Reads the level of a pin.
    pub fn digital_read(&mut self, pin: Pin) -> LittleWireResult<bool> {
        let resp = self.invoke(CommandFrame::new(DIGITAL_READ).with_value(pin.number() as u16))?;
        Ok(resp.byte() != 0)
    }

    /// Enables or disables the internal pull-up of an input pin.
    ///
    /// The firmware has no dedicated request: writing to an input pin toggles its pull-up.
    pub fn internal_pullup(&mut self, pin: Pin, enabled: bool) -> LittleWireResult<()> {
        self.digital_write(pin, enabled)
    }

    /// Borrows one pin as an [`embedded_hal`] digital pin.
    ///
    /// The pin direction is not changed; configure it with [`pin_mode`](Self::pin_mode) first.
    pub fn pin(&mut self, pin: Pin) -> GpioPin<'_, T, D> {
        GpioPin { lw: self, pin }
    }
}

/// One pin of a [`LittleWire`], usable wherever an [`embedded_hal`] pin is expected.
pub struct GpioPin<'a, T, D> {
    lw: &'a mut LittleWire<T, D>,
    pin: Pin,
}

impl<T, D> ErrorType for GpioPin<'_, T, D> {
    type Error = LittleWireError;
}

impl<T: Transport, D: DelayNs> OutputPin for GpioPin<'_, T, D> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.lw.digital_write(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.lw.digital_write(self.pin, true)
    }
}

impl<T: Transport, D: DelayNs> InputPin for GpioPin<'_, T, D> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.lw.digital_read(self.pin)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.lw.digital_read(self.pin).map(|v| !v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn pin_numbers() {
        assert_eq!(Pin::Pin1.number(), 1);
        assert_eq!(Pin::Pin2.number(), 2);
        assert_eq!(Pin::Pin3.number(), 5);
        assert_eq!(Pin::Pin4.number(), 0);
        assert_eq!(Pin::PWMA, Pin::MOSI);
        assert_eq!(Pin::PWMB, Pin::MISO);
    }

    #[test]
    fn writes_and_modes() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        lw.pin_mode(Pin::Pin3, PinMode::Output).unwrap();
        lw.digital_write(Pin::Pin3, true).unwrap();
        lw.digital_write(Pin::Pin3, false).unwrap();
        lw.pin_mode(Pin::Pin2, PinMode::Input).unwrap();
        lw.internal_pullup(Pin::Pin2, true).unwrap();
        assert_eq!(
            mock.sent,
            [
                CommandFrame::new(PIN_MODE_OUTPUT).with_value(5),
                CommandFrame::new(DIGITAL_WRITE_HIGH).with_value(5),
                CommandFrame::new(DIGITAL_WRITE_LOW).with_value(5),
                CommandFrame::new(PIN_MODE_INPUT).with_value(2),
                CommandFrame::new(DIGITAL_WRITE_HIGH).with_value(2),
            ]
        );
    }

    #[test]
    fn read_level() {
        let mut mock = MockTransport::new();
        mock.respond(&[1]).respond(&[0]);
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        assert!(lw.digital_read(Pin::Pin1).unwrap());
        assert!(!lw.digital_read(Pin::Pin4).unwrap());
        assert_eq!(mock.last(), CommandFrame::new(DIGITAL_READ).with_value(0));
    }

    #[test]
    fn embedded_hal_pin() {
        let mut mock = MockTransport::new();
        mock.respond(&[]).respond(&[]).respond(&[0]);
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        let mut pin = lw.pin(Pin::Pin2);
        pin.set_high().unwrap();
        pin.set_low().unwrap();
        assert!(pin.is_low().unwrap());
        assert_eq!(mock.opcodes(), [DIGITAL_WRITE_HIGH, DIGITAL_WRITE_LOW, DIGITAL_READ]);
    }

    #[test]
    fn errors_surface_through_pin() {
        let mut mock = MockTransport::new();
        mock.fail(LittleWireError::NoDevice);
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        assert_eq!(lw.pin(Pin::Pin1).set_high(), Err(LittleWireError::NoDevice));
        assert_eq!(lw.last_error_name(), Some("No device"));
    }
}
