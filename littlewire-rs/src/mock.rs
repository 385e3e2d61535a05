//! Test doubles for the transport and the timer.

use crate::{LittleWireError, Transport, commands::RESPONSE_LEN, frame::CommandFrame};
use embedded_hal::delay::DelayNs;
use std::{collections::VecDeque, vec::Vec};

/// Records every request and answers from a script.
///
/// Requests beyond the end of the script succeed with an all-zero frame.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    pub sent: Vec<CommandFrame>,
    pub timeouts: Vec<u32>,
    script: VecDeque<Result<[u8; RESPONSE_LEN], LittleWireError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response; missing bytes are zero.
    pub fn respond(&mut self, bytes: &[u8]) -> &mut Self {
        let mut frame = [0; RESPONSE_LEN];
        frame[..bytes.len()].copy_from_slice(bytes);
        self.script.push_back(Ok(frame));
        self
    }

    /// Queue a failing request.
    pub fn fail(&mut self, err: LittleWireError) -> &mut Self {
        self.script.push_back(Err(err));
        self
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.sent.iter().map(|f| f.opcode).collect()
    }

    pub fn last(&self) -> CommandFrame {
        *self.sent.last().expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8; RESPONSE_LEN],
        timeout_ms: u32,
    ) -> Result<usize, LittleWireError> {
        self.sent.push(CommandFrame {
            opcode: request,
            value,
            index,
        });
        self.timeouts.push(timeout_ms);
        match self.script.pop_front() {
            Some(Ok(frame)) => {
                *buf = frame;
                Ok(RESPONSE_LEN)
            }
            Some(Err(e)) => Err(e),
            None => Ok(RESPONSE_LEN),
        }
    }
}

/// Sums up the requested delays.
#[derive(Debug, Default)]
pub(crate) struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
