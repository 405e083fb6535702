use crate::can::{BusType, CanAdapter};

pub(crate) const DEFAULT_BITRATE: u32 = 500_000; // ISO 15765-4 high speed CAN
const DEFAULT_CHANNEL: &str = "can0";

/// Everything needed to open a bus connection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusConfig {
    pub bus_type: BusType,
    /// Interface name, e.g. `can0`. For the virtual bus any name works, handles sharing a name share a bus.
    pub channel: String,
    /// The bitrate in bits per second
    pub bitrate: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            bus_type: BusType::SocketCan,
            channel: DEFAULT_CHANNEL.to_string(),
            bitrate: DEFAULT_BITRATE,
        }
    }
}

impl BusConfig {
    pub fn open(&self) -> crate::Result<Box<dyn CanAdapter + Send>> {
        crate::can::open(self.bus_type, &self.channel, self.bitrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BusConfig::default();
        assert_eq!(config.bus_type, BusType::SocketCan);
        assert_eq!(config.channel, "can0");
        assert_eq!(config.bitrate, 500_000);
    }
}
