use crate::{
    LittleWire, LittleWireResult, Pin, Transport,
    commands::{SOFT_PWM_STATE, SOFT_PWM_WRITE, WS2812},
    frame::{
        CommandFrame, WS2812_FLUSH, WS2812_PRELOAD, WS2812_WRITE, Ws2812Control, ws2812_params,
    },
};
use embedded_hal::delay::DelayNs;

/// Pixels the firmware can buffer before a flush; further preloads are dropped by the device.
pub const WS2812_PRELOAD_CAPACITY: u8 = 64;

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Enables or disables the three software PWM channels.
    pub fn softpwm_state(&mut self, enabled: bool) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(SOFT_PWM_STATE).with_value(enabled as u16))?;
        Ok(())
    }

    /// Sets the duty cycles of the software PWM channels.
    pub fn softpwm_write(&mut self, ch1: u8, ch2: u8, ch3: u8) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(SOFT_PWM_WRITE).with_bytes(&[ch1, ch2, ch3]))?;
        Ok(())
    }

    fn ws2812(&mut self, control: Ws2812Control, r: u8, g: u8, b: u8) -> LittleWireResult<()> {
        let (value, index) = ws2812_params(control, r, g, b);
        self.invoke(CommandFrame::new(WS2812).with_value(value).with_index(index))?;
        Ok(())
    }

    /// Appends one pixel to the preloaded ones and sends the string out on `pin`.
    pub fn ws2812_write(&mut self, pin: Pin, r: u8, g: u8, b: u8) -> LittleWireResult<()> {
        let control = Ws2812Control::new()
            .with_pin(pin.number())
            .with_action(WS2812_WRITE);
        self.ws2812(control, r, g, b)?;
        self.preloaded = 0;
        Ok(())
    }

    /// Sends the preloaded pixels out on `pin`.
    pub fn ws2812_flush(&mut self, pin: Pin) -> LittleWireResult<()> {
        let control = Ws2812Control::new()
            .with_pin(pin.number())
            .with_action(WS2812_FLUSH);
        self.ws2812(control, 0, 0, 0)?;
        self.preloaded = 0;
        Ok(())
    }

    /// Buffers one pixel on the device for the next write or flush.
    ///
    /// The device holds at most [`WS2812_PRELOAD_CAPACITY`] pixels and silently drops the
    /// rest. The request is sent regardless; past the limit a warning is logged.
    pub fn ws2812_preload(&mut self, r: u8, g: u8, b: u8) -> LittleWireResult<()> {
        if self.preloaded >= WS2812_PRELOAD_CAPACITY {
            log::warn!("WS2812 preload buffer full, pixel will be dropped by the device");
        }
        let control = Ws2812Control::new().with_action(WS2812_PRELOAD);
        self.ws2812(control, r, g, b)?;
        self.preloaded = self.preloaded.saturating_add(1);
        Ok(())
    }

    /// Pixels preloaded since the last write or flush.
    pub fn ws2812_preloaded(&self) -> u8 {
        self.preloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LittleWireError, mock::MockTransport};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn softpwm_requests() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        lw.softpwm_state(true).unwrap();
        lw.softpwm_write(0x11, 0x22, 0x33).unwrap();
        lw.softpwm_state(false).unwrap();
        assert_eq!(
            mock.sent,
            [
                CommandFrame::new(SOFT_PWM_STATE).with_value(1),
                CommandFrame::new(SOFT_PWM_WRITE)
                    .with_value(0x2211)
                    .with_index(0x33),
                CommandFrame::new(SOFT_PWM_STATE).with_value(0),
            ]
        );
    }

    #[test]
    fn ws2812_requests() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        lw.ws2812_preload(0x01, 0x02, 0x03).unwrap();
        lw.ws2812_write(Pin::Pin2, 0x10, 0x20, 0x30).unwrap();
        lw.ws2812_flush(Pin::Pin3).unwrap();
        assert_eq!(
            mock.sent,
            [
                CommandFrame::new(WS2812).with_value(0x0220).with_index(0x0301),
                CommandFrame::new(WS2812).with_value(0x2032).with_index(0x3010),
                CommandFrame::new(WS2812).with_value(0x0015),
            ]
        );
    }

    #[test]
    fn preload_overflow_is_still_sent() {
        let mut mock = MockTransport::new();
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        for _ in 0..70 {
            lw.ws2812_preload(1, 1, 1).unwrap();
        }
        assert_eq!(lw.ws2812_preloaded(), 70);
        lw.ws2812_flush(Pin::Pin1).unwrap();
        assert_eq!(lw.ws2812_preloaded(), 0);
        assert_eq!(mock.sent.len(), 71);
    }

    #[test]
    fn failed_preload_is_not_counted() {
        let mut mock = MockTransport::new();
        mock.respond(&[]).fail(LittleWireError::Pipe);
        let mut lw = LittleWire::new(&mut mock, NoopDelay::new());
        lw.ws2812_preload(0, 0, 0).unwrap();
        assert_eq!(lw.ws2812_preload(0, 0, 0), Err(LittleWireError::Pipe));
        assert_eq!(lw.ws2812_preloaded(), 1);
    }
}
