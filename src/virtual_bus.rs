//! In-process CAN bus. Every [`VirtualBus`] opened on the same channel name receives the frames sent by the others,
//! which makes it possible to run a simulated ECU next to the query engine without any hardware.
//!
//! ```rust
//! use can_we_talk::can::{CanAdapter, Frame};
//! use can_we_talk::virtual_bus::VirtualBus;
//! use std::time::Duration;
//!
//! let mut tester = VirtualBus::new("doc-example").unwrap();
//! let mut ecu = VirtualBus::new("doc-example").unwrap();
//!
//! let frame = Frame::new(0, 0x7df.into(), &[0x02, 0x01, 0x0d]).unwrap();
//! tester.send(&frame, Duration::from_millis(10)).unwrap();
//! assert_eq!(ecu.recv(Duration::from_millis(10)).unwrap(), Some(frame));
//! ```
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use tracing::{debug, info};

use crate::can::{BusType, CanAdapter, Frame};
use crate::error::Error;
use crate::Result;

/// Frames queued per participant. Frames for a participant that stopped receiving are dropped once its queue is full.
pub const RX_QUEUE_SIZE: usize = 1024;

type Participants = Vec<(usize, mpsc::SyncSender<Frame>)>;

static CHANNELS: OnceLock<Mutex<HashMap<String, Participants>>> = OnceLock::new();
static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn channels() -> &'static Mutex<HashMap<String, Participants>> {
    CHANNELS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// One participant on a named in-process bus. Each participant buffers at most [`RX_QUEUE_SIZE`] frames, like the
/// receive queue of a real adapter.
pub struct VirtualBus {
    channel: String,
    id: usize,
    bitrate: Option<u32>,
    receive_own_messages: bool,
    rx: mpsc::Receiver<Frame>,
}

impl VirtualBus {
    pub fn new(channel: &str) -> Result<Self> {
        if channel.is_empty() {
            return Err(Error::ConnectionFailed {
                bus_type: BusType::Virtual,
                channel: channel.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty channel name"),
            });
        }

        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::sync_channel(RX_QUEUE_SIZE);

        channels()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(channel.to_string())
            .or_default()
            .push((id, tx));

        info!("Connected to virtual bus {}", channel);

        Ok(Self {
            channel: channel.to_string(),
            id,
            bitrate: None,
            receive_own_messages: false,
            rx,
        })
    }

    /// Same as [`VirtualBus::new`], recording a nominal bitrate. Frames are delivered instantly regardless.
    pub fn with_bitrate(channel: &str, bitrate: u32) -> Result<Self> {
        let mut bus = Self::new(channel)?;
        bus.bitrate = Some(bitrate);
        Ok(bus)
    }

    /// Also deliver our own transmissions back to us, flagged as loopback.
    pub fn set_receive_own_messages(&mut self, enabled: bool) {
        self.receive_own_messages = enabled;
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn bitrate(&self) -> Option<u32> {
        self.bitrate
    }
}

/// Returns false once the receiving side is gone.
fn deliver(tx: &mpsc::SyncSender<Frame>, frame: Frame) -> bool {
    match tx.try_send(frame) {
        Ok(()) => true,
        Err(mpsc::TrySendError::Full(frame)) => {
            debug!("RX queue full, dropping {:?}", frame);
            true
        }
        Err(mpsc::TrySendError::Disconnected(_)) => false,
    }
}

impl CanAdapter for VirtualBus {
    fn send(&mut self, frame: &Frame, _timeout: Duration) -> Result<()> {
        debug!("TX {:?}", frame);

        let mut channels = channels().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(participants) = channels.get_mut(&self.channel) {
            participants.retain(|(id, tx)| {
                if *id == self.id {
                    if self.receive_own_messages {
                        let mut loopback = frame.clone();
                        loopback.loopback = true;
                        return deliver(tx, loopback);
                    }
                    return true;
                }
                deliver(tx, frame.clone())
            });
        }

        Ok(())
    }

    fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        match self.rx.recv_timeout(timeout) {
            Ok(frame) => {
                debug!("RX {:?}", frame);
                Ok(Some(frame))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

impl Drop for VirtualBus {
    fn drop(&mut self) {
        let mut channels = channels().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(participants) = channels.get_mut(&self.channel) {
            participants.retain(|(id, _)| *id != self.id);
            if participants.is_empty() {
                channels.remove(&self.channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_rejected() {
        match VirtualBus::new("") {
            Err(Error::ConnectionFailed { bus_type, .. }) => assert_eq!(bus_type, BusType::Virtual),
            _ => panic!("Expected ConnectionFailed error"),
        }
    }

    #[test]
    fn frames_reach_other_participants_only() {
        let mut a = VirtualBus::new("vbus-test-peers").unwrap();
        let mut b = VirtualBus::new("vbus-test-peers").unwrap();
        let mut other = VirtualBus::new("vbus-test-elsewhere").unwrap();

        let frame = Frame::new(0, 0x123.into(), &[1, 2, 3]).unwrap();
        a.send(&frame, Duration::ZERO).unwrap();

        assert_eq!(b.recv(Duration::from_millis(10)).unwrap(), Some(frame));
        assert_eq!(a.recv(Duration::from_millis(1)).unwrap(), None);
        assert_eq!(other.recv(Duration::from_millis(1)).unwrap(), None);
    }

    #[test]
    fn loopback_when_enabled() {
        let mut a = VirtualBus::new("vbus-test-loopback").unwrap();
        a.set_receive_own_messages(true);

        let frame = Frame::new(0, 0x123.into(), &[0xaa]).unwrap();
        a.send(&frame, Duration::ZERO).unwrap();

        let rx = a.recv(Duration::from_millis(10)).unwrap().unwrap();
        assert!(rx.loopback);
        assert_eq!(rx.data, frame.data);
    }

    #[test]
    fn recv_times_out_on_silent_bus() {
        let mut a = VirtualBus::new("vbus-test-silent").unwrap();
        let start = std::time::Instant::now();
        assert_eq!(a.recv(Duration::from_millis(20)).unwrap(), None);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn full_queue_drops_frames() {
        let mut a = VirtualBus::new("vbus-test-full").unwrap();
        let mut b = VirtualBus::new("vbus-test-full").unwrap();

        for i in 0..(RX_QUEUE_SIZE as u32 + 10) {
            let frame = Frame::new(0, 0x123.into(), &i.to_be_bytes()).unwrap();
            a.send(&frame, Duration::ZERO).unwrap();
        }

        let mut received = 0;
        while let Some(frame) = b.recv(Duration::from_millis(1)).unwrap() {
            assert_eq!(frame.data, (received as u32).to_be_bytes());
            received += 1;
        }
        assert_eq!(received, RX_QUEUE_SIZE);

        // Still a participant after overflowing
        let frame = Frame::new(0, 0x123.into(), &[0xff]).unwrap();
        a.send(&frame, Duration::ZERO).unwrap();
        assert_eq!(b.recv(Duration::from_millis(10)).unwrap(), Some(frame));
    }

    #[test]
    fn dropped_participant_is_removed() {
        let mut a = VirtualBus::new("vbus-test-drop").unwrap();
        {
            let _b = VirtualBus::new("vbus-test-drop").unwrap();
        }
        let frame = Frame::new(0, 0x123.into(), &[]).unwrap();
        a.send(&frame, Duration::ZERO).unwrap();

        let channels = channels().lock().unwrap();
        assert_eq!(channels["vbus-test-drop"].len(), 1);
    }
}
