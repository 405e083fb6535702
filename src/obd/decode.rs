//! Formulas turning a [`DiagnosticReply`] into a value, see <https://en.wikipedia.org/wiki/OBD-II_PIDs#Service_01>.
//! Nothing in here looks at arbitration IDs, the client only hands over replies from [`REPLY_ID`](super::REPLY_ID).
use std::fmt;

use crate::obd::constants::{Pid, NOT_OBD_COMPLIANT, OBD_STANDARDS};
use crate::obd::types::DiagnosticReply;

/// A decoded PID value.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PidValue {
    Text(&'static str),
    /// 0.0 to 100.0
    Percent(f64),
    Seconds(u16),
}

impl PidValue {
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            PidValue::Text(_) => None,
            PidValue::Percent(_) => Some("percent"),
            PidValue::Seconds(_) => Some("seconds"),
        }
    }
}

impl fmt::Display for PidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PidValue::Text(text) => write!(f, "{}", text),
            PidValue::Percent(pct) => write!(f, "{:.1} percent", pct),
            PidValue::Seconds(s) => write!(f, "{} seconds", s),
        }
    }
}

/// PID 0x1C. Codes outside the table map to "Not OBD compliant".
pub fn decode_obd_standard(reply: &DiagnosticReply) -> &'static str {
    match reply.a() {
        code @ 1..=33 => OBD_STANDARDS[code as usize - 1],
        _ => NOT_OBD_COMPLIANT,
    }
}

/// PID 0x2F, `100 / 255 * A`
pub fn decode_fuel_tank_level(reply: &DiagnosticReply) -> f64 {
    reply.a() as f64 * 100.0 / 255.0
}

/// PID 0x1F, `256 * A + B`
pub fn decode_seconds_since_start(reply: &DiagnosticReply) -> u16 {
    u16::from_be_bytes([reply.a(), reply.b()])
}

pub fn decode(pid: Pid, reply: &DiagnosticReply) -> PidValue {
    match pid {
        Pid::ObdStandard => PidValue::Text(decode_obd_standard(reply)),
        Pid::FuelTankLevel => PidValue::Percent(decode_fuel_tank_level(reply)),
        Pid::RunTimeSinceEngineStart => PidValue::Seconds(decode_seconds_since_start(reply)),
    }
}
