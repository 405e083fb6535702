//! Convenience functions to get a CAN adapter.
use strum_macros::{Display, EnumIter, EnumString};

use crate::can::CanAdapter;
use crate::error::Error;

/// Kind of adapter backing a bus connection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum BusType {
    /// Linux SocketCAN. Also accepts the `socketcan_native` and `socketcan_ctypes` spellings.
    #[strum(to_string = "socketcan", serialize = "socketcan_native", serialize = "socketcan_ctypes")]
    SocketCan,
    /// In-process bus, see [`crate::virtual_bus`]
    #[strum(to_string = "virtual")]
    Virtual,
}

/// Open a bus connection on `channel`. Failing to reach the adapter results in [`Error::ConnectionFailed`], naming the bus type and channel.
///
/// SocketCAN interfaces have their bitrate configured by the system, so `bitrate` only applies to adapters that can set it.
pub fn open(bus_type: BusType, channel: &str, bitrate: u32) -> Result<Box<dyn CanAdapter + Send>, Error> {
    match bus_type {
        #[cfg(all(target_os = "linux", feature = "socketcan"))]
        BusType::SocketCan => {
            let socket = crate::socketcan::SocketCan::new(channel)?;
            if bitrate != crate::can::adapter_config::DEFAULT_BITRATE {
                tracing::warn!("Ignoring bitrate {} for {}, SocketCAN bitrate is set by the system", bitrate, channel);
            }
            Ok(Box::new(socket))
        }
        #[cfg(not(all(target_os = "linux", feature = "socketcan")))]
        BusType::SocketCan => Err(Error::UnsupportedBusType(bus_type.to_string())),
        BusType::Virtual => {
            let bus = crate::virtual_bus::VirtualBus::with_bitrate(channel, bitrate)?;
            Ok(Box::new(bus))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn bus_type_aliases() {
        assert_eq!(BusType::from_str("socketcan").unwrap(), BusType::SocketCan);
        assert_eq!(BusType::from_str("socketcan_native").unwrap(), BusType::SocketCan);
        assert_eq!(BusType::from_str("SocketCAN").unwrap(), BusType::SocketCan);
        assert_eq!(BusType::from_str("virtual").unwrap(), BusType::Virtual);
        assert!(BusType::from_str("pcan").is_err());
    }

    #[test]
    fn bus_type_display() {
        assert_eq!(BusType::SocketCan.to_string(), "socketcan");
        assert_eq!(BusType::Virtual.to_string(), "virtual");
    }

    #[test]
    fn open_virtual() {
        let adapter = open(BusType::Virtual, "adapter-open-virtual", 250_000);
        assert!(adapter.is_ok());
    }
}
