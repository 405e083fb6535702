//! Types used in the OBD-II protocol.
use std::time::Duration;

use crate::can::{Frame, Identifier};
use crate::obd::constants::*;
use crate::obd::error::Error;

/// A single mode 1 request. Lives only for one send/receive cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticRequest {
    pub pid: u8,
    pub timeout: Duration,
}

impl DiagnosticRequest {
    pub fn new(pid: u8) -> Self {
        Self {
            pid,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(pid: u8, timeout: Duration) -> Self {
        Self { pid, timeout }
    }

    /// Query payload: length, service, PID, then padding up to a full frame.
    pub fn payload(&self) -> [u8; FRAME_LENGTH] {
        let mut buf = [PADDING; FRAME_LENGTH];
        buf[0] = QUERY_LENGTH;
        buf[1] = ServiceIdentifier::ShowCurrentData as u8;
        buf[2] = self.pid;
        buf
    }

    pub fn frame(&self) -> Frame {
        Frame {
            bus: 0,
            id: Identifier::Standard(QUERY_ID),
            data: self.payload().to_vec(),
            loopback: false,
        }
    }
}

impl From<Pid> for DiagnosticRequest {
    fn from(pid: Pid) -> Self {
        DiagnosticRequest::new(pid as u8)
    }
}

/// Payload of a frame received from [`REPLY_ID`]. The bytes the OBD-II PID tables call A, B, C and D start at offset 3,
/// after the length byte, the response service ID and the echoed PID.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticReply {
    data: [u8; FRAME_LENGTH],
}

impl DiagnosticReply {
    pub fn from_payload(data: &[u8]) -> Result<Self, Error> {
        let data: [u8; FRAME_LENGTH] = data.try_into().map_err(|_| Error::MalformedReply(data.len()))?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &[u8; FRAME_LENGTH] {
        &self.data
    }

    /// PID echoed by the ECU
    pub fn pid(&self) -> u8 {
        self.data[2]
    }

    pub fn a(&self) -> u8 {
        self.data[3]
    }

    pub fn b(&self) -> u8 {
        self.data[4]
    }

    pub fn c(&self) -> u8 {
        self.data[5]
    }

    pub fn d(&self) -> u8 {
        self.data[6]
    }
}

impl std::fmt::Debug for DiagnosticReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticReply")
            .field("data", &hex::encode(self.data))
            .finish()
    }
}

impl TryFrom<&Frame> for DiagnosticReply {
    type Error = Error;

    fn try_from(frame: &Frame) -> Result<Self, Error> {
        if frame.id != Identifier::Standard(REPLY_ID) {
            return Err(Error::UnexpectedIdentifier(frame.id.into()));
        }
        Self::from_payload(&frame.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_frame_layout() {
        let frame = DiagnosticRequest::new(0x2f).frame();
        assert_eq!(frame.id, Identifier::Standard(0x7df));
        assert_eq!(frame.data, vec![0x02, 0x01, 0x2f, 0x55, 0x55, 0x55, 0x55, 0x55]);
    }

    #[test]
    fn request_from_pid() {
        let request: DiagnosticRequest = Pid::ObdStandard.into();
        assert_eq!(request.pid, 0x1c);
        assert_eq!(request.timeout, Duration::from_secs(1));
    }

    #[test]
    fn reply_bytes() {
        let reply = DiagnosticReply::from_payload(&[0x04, 0x41, 0x1f, 0x12, 0x34, 0x56, 0x78, 0x00]).unwrap();
        assert_eq!(reply.pid(), 0x1f);
        assert_eq!((reply.a(), reply.b(), reply.c(), reply.d()), (0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn reply_rejects_short_payload() {
        assert_eq!(
            DiagnosticReply::from_payload(&[0x03, 0x41, 0x2f]),
            Err(Error::MalformedReply(3))
        );
    }

    #[test]
    fn reply_rejects_wrong_id() {
        let frame = Frame::new(0, 0x7e9.into(), &[0u8; 8]).unwrap();
        assert_eq!(
            DiagnosticReply::try_from(&frame),
            Err(Error::UnexpectedIdentifier(0x7e9))
        );
    }
}
