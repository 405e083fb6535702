//! Constants for the OBD-II Client.
use std::time::Duration;
use strum_macros::{Display, EnumIter, FromRepr};

/// Functional broadcast address every emissions related ECU listens on (ISO 15765-4)
pub const QUERY_ID: u32 = 0x7df;
/// Physical response address of ECU #1, the engine control module
pub const REPLY_ID: u32 = 0x7e8;
/// Filler for the unused tail of a query frame
pub const PADDING: u8 = 0x55;
/// Query and reply frames always carry a full classic CAN payload
pub const FRAME_LENGTH: usize = 8;
/// Number of bytes following the length byte in a mode 1 query
pub const QUERY_LENGTH: u8 = 0x02;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

pub const NOT_OBD_COMPLIANT: &str = "Not OBD compliant";

/// Service Identifiers (modes) as defined in SAE J1979
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum ServiceIdentifier {
    ShowCurrentData = 0x01,
}

/// Mode 1 Parameter IDs this crate knows how to decode
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Display, EnumIter, FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Pid {
    #[strum(to_string = "OBD standard this vehicle conforms to")]
    ObdStandard = 0x1c,
    #[strum(to_string = "run time since engine start")]
    RunTimeSinceEngineStart = 0x1f,
    #[strum(to_string = "fuel tank level")]
    FuelTankLevel = 0x2f,
}

impl Pid {
    /// Heading printed in front of a decoded value
    pub fn label(&self) -> &'static str {
        match self {
            Pid::ObdStandard => "OBD standard this vehicle conforms to",
            Pid::RunTimeSinceEngineStart => "run time since engine start",
            Pid::FuelTankLevel => "Fuel tank level",
        }
    }
}

/// OBD standards reported by PID 0x1C, indexed by `code - 1`
pub static OBD_STANDARDS: [&str; 33] = [
    "OBD-II as defined by the [California Air Resources Board|CARB]",
    "OBD as defined by the [United States Environmental Protection Agency|EPA]",
    "OBD and OBD-II",
    "OBD-I",
    NOT_OBD_COMPLIANT,
    "EOBD (Europe)",
    "EOBD and OBD-II",
    "EOBD and OBD",
    "EOBD, OBD and OBD II",
    "JOBD (Japan)",
    "JOBD and OBD II",
    "JOBD and EOBD",
    "JOBD, EOBD, and OBD II",
    NOT_OBD_COMPLIANT,
    NOT_OBD_COMPLIANT,
    NOT_OBD_COMPLIANT,
    "Engine Manufacturer Diagnostics (EMD)",
    "Engine Manufacturer Diagnostics Enhanced (EMD+)",
    "Heavy Duty On-Board Diagnostics (Child/Partial) (HD OBD-C)",
    "Heavy Duty On-Board Diagnostics (HD OBD)",
    "World Wide Harmonized OBD (WWH OBD)",
    NOT_OBD_COMPLIANT,
    "Heavy Duty Euro OBD Stage I without NOx control (HD EOBD-I)",
    "Heavy Duty Euro OBD Stage I with NOx control (HD EOBD-I N)",
    "Heavy Duty Euro OBD Stage II without NOx control (HD EOBD-II)",
    "Heavy Duty Euro OBD Stage II with NOx control (HD EOBD-II N)",
    NOT_OBD_COMPLIANT,
    "Brazil OBD Phase 1 (OBDBr-1)",
    "Brazil OBD Phase 2 (OBDBr-2)",
    "Korean OBD (KOBD)",
    "India OBD I (IOBD I)",
    "India OBD II (IOBD II)",
    "Heavy Duty Euro OBD Stage VI (HD EOBD-IV)",
];
