//! This module provides a [`CanAdapter`] implementation for Linux SocketCAN interfaces.
use crate::can::{BusType, CanAdapter, Frame};
use crate::error::Error;
use crate::Result;

use std::time::{Duration, Instant};
use tracing::{debug, info};

mod frame;
mod socket;

use socket::CanSocket;

/// Adapter for a raw SocketCAN socket bound to a single interface.
pub struct SocketCan {
    socket: CanSocket,
}

impl SocketCan {
    /// Open interface `name`, e.g. `can0` or `vcan0`.
    pub fn new(name: &str) -> Result<Self> {
        let connection_failed = |source| Error::ConnectionFailed {
            bus_type: BusType::SocketCan,
            channel: name.to_string(),
            source,
        };

        let socket = CanSocket::open(name).map_err(connection_failed)?;
        socket.set_loopback(true).map_err(connection_failed)?;

        info!("Connected to SocketCan {}", name);
        Ok(Self { socket })
    }
}

impl CanAdapter for SocketCan {
    fn send(&mut self, frame: &Frame, timeout: Duration) -> Result<()> {
        debug!("TX {:?}", frame);
        let raw: libc::can_frame = frame.into();
        self.socket.write_frame(&raw, timeout).map_err(Error::Send)
    }

    fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            match self.socket.read_frame(remaining).map_err(Error::Recv)? {
                Some(raw) if frame::is_data_frame(&raw) => {
                    let frame: Frame = raw.into();
                    debug!("RX {:?}", frame);
                    return Ok(Some(frame));
                }
                Some(_) if !remaining.is_zero() => continue,
                _ => return Ok(None),
            }
        }
    }
}
