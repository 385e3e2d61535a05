use crate::{
    LittleWire, LittleWireResult, Transport,
    commands::{ANALOG_INIT, ANALOG_READ},
    frame::{CommandFrame, analog_init_value},
};
use embedded_hal::delay::DelayNs;

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// ADC voltage reference.
pub enum VoltageRef {
    /// Supply voltage.
    #[default]
    Vcc = 0,
    /// Internal 1.1 V bandgap.
    Internal1V1 = 1,
    /// Internal 2.56 V reference.
    Internal2V56 = 2,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// ADC input.
pub enum AdcChannel {
    /// Pin 3.
    Pin3 = 0,
    /// Pin 2.
    Pin2 = 1,
    /// On-chip temperature sensor.
    TempSensor = 2,
}

impl<T: Transport, D: DelayNs> LittleWire<T, D> {
    /// Enables the ADC with the given voltage reference.
    pub fn analog_init(&mut self, reference: VoltageRef) -> LittleWireResult<()> {
        self.invoke(CommandFrame::new(ANALOG_INIT).with_value(analog_init_value(reference as u8)))?;
        Ok(())
    }

    /// Samples one channel, returning the 10-bit conversion result.
    pub fn analog_read(&mut self, channel: AdcChannel) -> LittleWireResult<u16> {
        let resp = self.invoke(CommandFrame::new(ANALOG_READ).with_value(channel as u16))?;
        Ok(resp.word())
    }
}
