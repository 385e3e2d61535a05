use crate::{
    LittleWire, LittleWireResult, Transport,
    commands::{PWM_INIT, PWM_STOP, PWM_UPDATE_COMPARE, PWM_UPDATE_PRESCALER},
    frame::CommandFrame,
};
use embedded_hal::delay::DelayNs;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Clock divider of the hardware PWM, valued by its firmware code.
pub enum Prescaler {
    /// No division.
    Div1 = 0,
    /// Divide by 8.
    Div8 = 1,
    /// Divide by 64.
    Div64 = 2,
    /// Divide by 256.
    Div256 = 3,
    /// Divide by 1024.
    Div1024 = 4,
}

impl Prescaler {
    /// Looks up a divider, `None` for anything but 1, 8, 64, 256 and 1024.
    pub const fn from_divisor(divisor: u16) -> Option<Self> {
        Some(match divisor {
            1 => Self::Div1,
            8 => Self::Div8,
            64 => Self::Div64,
            256 => Self::Div256,
            1024 => Self::Div1024,
            _ => return None,
        })
    }

    /// Firmware code of this divider.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Starts the hardware PWM on [`Pin::PWMA`](crate::Pin::PWMA) and [`Pin::PWMB`](crate::Pin::PWMB).
    pub fn pwm_init(&mut self) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(PWM_INIT))?;
        Ok(())
    }

    /// Stops the hardware PWM.
    pub fn pwm_stop(&mut self) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(PWM_STOP))?;
        Ok(())
    }

    /// Sets the duty cycle of both channels, 0 to 255.
    pub fn pwm_update_compare(&mut self, channel_a: u8, channel_b: u8) -> LittleWireResult<()> {
        self.invoke(
            CommandFrame::new(PWM_UPDATE_COMPARE)
                .with_value(channel_a as u16)
                .with_index(channel_b as u16),
        )?;
        Ok(())
    }

    /// Sets the PWM clock divider.
    ///
    /// Only 1, 8, 64, 256 and 1024 are supported; any other value is ignored without talking
    /// to the device.
    pub fn pwm_update_prescaler(&mut self, divisor: u16) -> LittleWireResult<()> {
        let Some(prescaler) = Prescaler::from_divisor(divisor) else {
            log::trace!("ignoring PWM prescaler {divisor}");
            return Ok(());
        };
        self.invoke(CommandFrame::new(PWM_UPDATE_PRESCALER).with_value(prescaler.code() as u16))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn prescaler_codes() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        for divisor in [1024, 256, 64, 8, 1] {
            lw.pwm_update_prescaler(divisor).unwrap();
        }
        let codes: std::vec::Vec<_> = mock.sent.iter().map(|f| f.value).collect();
        assert_eq!(codes, [4, 3, 2, 1, 0]);
        assert!(mock.opcodes().iter().all(|&op| op == PWM_UPDATE_PRESCALER));
    }

    #[test]
    fn unknown_prescaler_is_ignored() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        for divisor in [0, 2, 128, 512, 4096, u16::MAX] {
            assert_eq!(lw.pwm_update_prescaler(divisor), Ok(()));
        }
        assert!(mock.sent.is_empty());
    }

    #[test]
    fn compare_uses_both_parameters() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        lw.pwm_init().unwrap();
        lw.pwm_update_compare(0x40, 0xc0).unwrap();
        lw.pwm_stop().unwrap();
        assert_eq!(
            mock.sent,
            [
                CommandFrame::new(PWM_INIT),
                CommandFrame::new(PWM_UPDATE_COMPARE)
                    .with_value(0x40)
                    .with_index(0xc0),
                CommandFrame::new(PWM_STOP),
            ]
        );
    }
}
