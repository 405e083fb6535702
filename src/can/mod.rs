//! Generic CAN types and traits

pub mod adapter;
pub mod adapter_config;

use std::fmt;
use std::time::Duration;

pub use adapter::{open, BusType};
pub use adapter_config::BusConfig;

/// Maximum payload of a classic CAN frame
pub const CAN_MAX_DLEN: usize = 8;

/// Identifier for a CAN frame
#[derive(Copy, Clone, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    Standard(u32),
    Extended(u32),
}

impl Identifier {
    pub fn is_standard(&self) -> bool {
        match self {
            Identifier::Standard(_) => true,
            Identifier::Extended(_) => false,
        }
    }
    pub fn is_extended(&self) -> bool {
        !self.is_standard()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Extended(id) => write!(f, "0x{:08x}", id),
            Identifier::Standard(id) => write!(f, "0x{:03x}", id),
        }
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Identifier {
        if id <= 0x7ff {
            Identifier::Standard(id)
        } else {
            Identifier::Extended(id)
        }
    }
}

impl From<Identifier> for u32 {
    fn from(val: Identifier) -> u32 {
        match val {
            Identifier::Standard(id) => id,
            Identifier::Extended(id) => id,
        }
    }
}

/// A classic CAN frame
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// The bus index for adapters supporting multiple CAN busses
    pub bus: u8,
    /// Arbitration ID
    pub id: Identifier,
    /// Frame Data
    pub data: Vec<u8>,
    /// Wheter the frame was sent out by the adapter
    pub loopback: bool,
}

impl Frame {
    pub fn new(bus: u8, id: Identifier, data: &[u8]) -> Result<Frame, crate::error::Error> {
        if data.len() > CAN_MAX_DLEN {
            return Err(crate::error::Error::MalformedFrame);
        }

        // Check if the ID makes sense
        match id {
            Identifier::Standard(id) if id > 0x7ff => return Err(crate::error::Error::MalformedFrame),
            Identifier::Extended(id) if id > 0x1fffffff => return Err(crate::error::Error::MalformedFrame),
            _ => {}
        };

        Ok(Frame {
            bus,
            id,
            data: data.to_vec(),
            loopback: false,
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bus", &self.bus)
            .field("id", &self.id)
            .field("data", &hex::encode(&self.data))
            .field("loopback", &self.loopback)
            .finish()
    }
}

/// Trait for a Blocking CAN Adapter
pub trait CanAdapter {
    /// Transmit a single frame, waiting at most `timeout` for the adapter to accept it.
    fn send(&mut self, frame: &Frame, timeout: Duration) -> crate::Result<()>;

    /// Wait up to `timeout` for the next frame. Returns `Ok(None)` when nothing arrived in time, an empty bus is not an error.
    fn recv(&mut self, timeout: Duration) -> crate::Result<Option<Frame>>;
}

impl<T: CanAdapter + ?Sized> CanAdapter for Box<T> {
    fn send(&mut self, frame: &Frame, timeout: Duration) -> crate::Result<()> {
        (**self).send(frame, timeout)
    }

    fn recv(&mut self, timeout: Duration) -> crate::Result<Option<Frame>> {
        (**self).recv(timeout)
    }
}

impl<T: CanAdapter + ?Sized> CanAdapter for &mut T {
    fn send(&mut self, frame: &Frame, timeout: Duration) -> crate::Result<()> {
        (**self).send(frame, timeout)
    }

    fn recv(&mut self, timeout: Duration) -> crate::Result<Option<Frame>> {
        (**self).recv(timeout)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_compare() {
        assert_eq!(true, Identifier::Standard(0x123) < Identifier::Standard(0x124));
        assert_eq!(true, Identifier::Standard(0x7ff) > Identifier::Standard(0x100));

        // Extended IDs always have lower priority than standard IDs
        assert_eq!(true, Identifier::Extended(0x1) > Identifier::Standard(0x100));
    }

    #[test]
    fn id_from_u32() {
        assert_eq!(Identifier::from(0x7df), Identifier::Standard(0x7df));
        assert_eq!(Identifier::from(0x18db33f1), Identifier::Extended(0x18db33f1));
        assert_eq!(u32::from(Identifier::Standard(0x7e8)), 0x7e8);
    }

    #[test]
    fn frame_rejects_fd_payload() {
        assert!(Frame::new(0, 0x7e8.into(), &[0u8; 8]).is_ok());
        assert!(matches!(
            Frame::new(0, 0x7e8.into(), &[0u8; 12]),
            Err(crate::Error::MalformedFrame)
        ));
    }

    #[test]
    fn frame_rejects_out_of_range_id() {
        assert!(matches!(
            Frame::new(0, Identifier::Standard(0x800), &[]),
            Err(crate::Error::MalformedFrame)
        ));
        assert!(matches!(
            Frame::new(0, Identifier::Extended(0x2000_0000), &[]),
            Err(crate::Error::MalformedFrame)
        ));
    }

    #[test]
    fn frame_debug_is_hex() {
        let frame = Frame::new(0, 0x7df.into(), &[0x02, 0x01, 0x2f]).unwrap();
        let debug = format!("{:?}", frame);
        assert!(debug.contains("0x7df"));
        assert!(debug.contains("02012f"));
    }
}
