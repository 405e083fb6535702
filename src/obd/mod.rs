//! OBD-II mode 1 client, implements the single frame subset of SAE J1979 over ISO 15765-4
//! ## Example
//! ```rust
//! use can_we_talk::obd::{ObdClient, Pid};
//! use can_we_talk::virtual_bus::VirtualBus;
//!
//! let bus = VirtualBus::new("obd-doc-example").unwrap();
//! let mut client = ObdClient::new(bus);
//!
//! // Nobody answers on this bus, which is not an error
//! client.config_mut().timeout = std::time::Duration::from_millis(10);
//! assert_eq!(client.read(Pid::FuelTankLevel).unwrap(), None);
//! ```

mod constants;
pub mod decode;
pub mod error;
mod types;

use std::time::{Duration, Instant};

use crate::can::{CanAdapter, Identifier};
use crate::Result;
pub use constants::*;
pub use decode::{decode, decode_fuel_tank_level, decode_obd_standard, decode_seconds_since_start, PidValue};
pub use error::Error;
pub use types::*;

use tracing::{debug, warn};

/// How [`ObdClient::await_reply`] sizes each receive call while it waits for a reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PollStrategy {
    /// Every receive waits for the full timeout again. A steady stream of unrelated traffic can push the return up to one
    /// timeout past the deadline.
    FixedTimeout,
    /// Every receive waits only for the time left until the deadline.
    #[default]
    RemainingTime,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    /// Time to wait for a reply, also used as the send timeout
    pub timeout: Duration,
    pub poll: PollStrategy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll: PollStrategy::default(),
        }
    }
}

/// OBD-II Client. Owns a [`CanAdapter`] and runs one request/response cycle at a time.
///
/// Replies carry no tag tying them to a request, so a reply is matched on arbitration ID alone. Taking `&mut self`
/// for every query keeps requests strictly serialized.
pub struct ObdClient<T: CanAdapter> {
    adapter: T,
    config: ClientConfig,
}

impl<T: CanAdapter> ObdClient<T> {
    pub fn new(adapter: T) -> Self {
        Self::with_config(adapter, ClientConfig::default())
    }

    pub fn with_config(adapter: T, config: ClientConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn adapter_mut(&mut self) -> &mut T {
        &mut self.adapter
    }

    pub fn into_inner(self) -> T {
        self.adapter
    }

    /// Send a mode 1 request for `pid` to [`QUERY_ID`]. Send failures are returned as is, they are not retried.
    pub fn send_query(&mut self, pid: u8) -> Result<()> {
        let frame = DiagnosticRequest::new(pid).frame();
        debug!("TX query, pid 0x{:02x} data {}", pid, hex::encode(&frame.data));
        self.adapter.send(&frame, self.config.timeout)
    }

    /// Wait for the first frame from [`REPLY_ID`]. Every other frame is dropped. Returns `Ok(None)` once `timeout` has
    /// passed without a reply, even while unrelated frames keep arriving.
    ///
    /// A reply that is not exactly 8 bytes long results in [`Error::MalformedReply`]. A timeout too large to
    /// represent as a deadline waits without one.
    pub fn await_reply(&mut self, timeout: Duration) -> Result<Option<DiagnosticReply>> {
        let deadline = Instant::now().checked_add(timeout);

        loop {
            let poll_timeout = match (self.config.poll, deadline) {
                (PollStrategy::RemainingTime, Some(deadline)) => deadline.saturating_duration_since(Instant::now()),
                _ => timeout,
            };

            if let Some(frame) = self.adapter.recv(poll_timeout)? {
                if frame.id == Identifier::Standard(REPLY_ID) {
                    let reply = DiagnosticReply::try_from(&frame)?;
                    debug!("RX reply {:?}", reply);
                    return Ok(Some(reply));
                }
                debug!("Discarding {:?}", frame);
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                debug!("No reply within {:?}", timeout);
                return Ok(None);
            }
        }
    }

    /// Keep draining the bus for `duration`, throwing away whatever arrives, so no stale replies pile up while the
    /// caller waits.
    pub fn idle_wait(&mut self, duration: Duration) -> Result<()> {
        let end = Instant::now().checked_add(duration);

        loop {
            let remaining = match end {
                Some(end) => end.saturating_duration_since(Instant::now()),
                None => duration,
            };
            if remaining.is_zero() {
                return Ok(());
            }
            if let Some(frame) = self.adapter.recv(remaining.min(self.config.timeout))? {
                debug!("Discarding {:?}", frame);
            }
        }
    }

    /// Send `request` and wait for its reply.
    pub fn query(&mut self, request: &DiagnosticRequest) -> Result<Option<DiagnosticReply>> {
        self.send_query(request.pid)?;
        let reply = self.await_reply(request.timeout)?;

        if let Some(reply) = &reply {
            if reply.pid() != request.pid {
                warn!("Reply echoes pid 0x{:02x}, requested 0x{:02x}", reply.pid(), request.pid);
            }
        }

        Ok(reply)
    }

    /// Query and decode a known PID using the configured timeout.
    pub fn read(&mut self, pid: Pid) -> Result<Option<PidValue>> {
        let request = DiagnosticRequest::with_timeout(pid as u8, self.config.timeout);
        let reply = self.query(&request)?;
        Ok(reply.map(|reply| decode(pid, &reply)))
    }
}
