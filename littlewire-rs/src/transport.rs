use crate::{LittleWireError, commands::RESPONSE_LEN};

/// The USB link to a Little Wire.
///
/// Implementors issue one vendor, device-to-host control request with the given `bRequest`,
/// `wValue` and `wIndex`, reading at most [`RESPONSE_LEN`] bytes into `buf`.
pub trait Transport {
    /// Performs one control request.
    ///
    /// # Returns
    /// The number of bytes transferred into `buf`.
    ///
    /// # Errors
    /// The USB stack's error, mapped onto [`LittleWireError`].
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8; RESPONSE_LEN],
        timeout_ms: u32,
    ) -> Result<usize, LittleWireError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8; RESPONSE_LEN],
        timeout_ms: u32,
    ) -> Result<usize, LittleWireError> {
        T::control_in(self, request, value, index, buf, timeout_ms)
    }
}
