use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Transport errors, one per negative status code reported by the USB stack.
pub enum LittleWireError {
    /// Input/output error (-1).
    Io,
    /// Invalid parameter (-2).
    InvalidParam,
    /// Access denied, usually insufficient permissions (-3).
    Access,
    /// The device has been disconnected (-4).
    NoDevice,
    /// Entity not found (-5).
    NotFound,
    /// Resource busy (-6).
    Busy,
    /// Operation timed out (-7).
    Timeout,
    /// Overflow (-8).
    Overflow,
    /// Pipe error, the device stalled the request (-9).
    Pipe,
    /// System call interrupted (-10).
    Interrupted,
    /// Insufficient memory (-11).
    NoMemory,
    /// Operation not supported or unimplemented on this platform (-12).
    NotSupported,
    /// Any other error (-99).
    Other,
}

impl LittleWireError {
    /// The status code recorded for this error.
    pub const fn code(self) -> i32 {
        use LittleWireError::*;
        match self {
            Io => -1,
            InvalidParam => -2,
            Access => -3,
            NoDevice => -4,
            NotFound => -5,
            Busy => -6,
            Timeout => -7,
            Overflow => -8,
            Pipe => -9,
            Interrupted => -10,
            NoMemory => -11,
            NotSupported => -12,
            Other => -99,
        }
    }

    /// Map a status code back to an error.
    ///
    /// Non-negative codes are successes and give `None`; negative codes outside the
    /// table map to [`LittleWireError::Other`].
    pub const fn from_code(code: i32) -> Option<Self> {
        use LittleWireError::*;
        Some(match code {
            c if c >= 0 => return None,
            -1 => Io,
            -2 => InvalidParam,
            -3 => Access,
            -4 => NoDevice,
            -5 => NotFound,
            -6 => Busy,
            -7 => Timeout,
            -8 => Overflow,
            -9 => Pipe,
            -10 => Interrupted,
            -11 => NoMemory,
            -12 => NotSupported,
            _ => Other,
        })
    }

    /// Human-readable name of the error.
    ///
    /// -2 is named "Invalid parameter", not the "Invalid paramenter" of the reference host
    /// library.
    pub const fn name(self) -> &'static str {
        use LittleWireError::*;
        match self {
            Io => "I/O Error",
            InvalidParam => "Invalid parameter",
            Access => "Access error",
            NoDevice => "No device",
            NotFound => "Not found",
            Busy => "Busy",
            Timeout => "Timeout",
            Overflow => "Overflow",
            Pipe => "Pipe",
            Interrupted => "Interrupted",
            NoMemory => "No memory",
            NotSupported => "Not supported",
            Other => "Other",
        }
    }
}

/// Name of the error behind a status code.
///
/// Returns `None` for success (non-negative) codes and `"unknown"` for negative codes that
/// are not part of the error table. Names follow [`LittleWireError::name`].
pub fn error_name(status: i32) -> Option<&'static str> {
    match LittleWireError::from_code(status) {
        None => None,
        Some(e) if e.code() == status => Some(e.name()),
        Some(_) => Some("unknown"),
    }
}

impl fmt::Display for LittleWireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl embedded_hal::digital::Error for LittleWireError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
