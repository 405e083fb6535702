#![allow(dead_code, unused_imports)]
use can_we_talk::can::{BusType, CanAdapter, Frame};
use std::time::Duration;

static BULK_NUM_FRAMES: u64 = 0x100;
static BULK_TIMEOUT_MS: u64 = 1000;
static SEND_TIMEOUT: Duration = Duration::from_millis(100);

/// Sends a large number of frames from one adapter, and reads them back on another one on the same bus.
/// This verifies the adapter doesn't drop messages and delivers them in the same order as they are sent.
fn bulk_send<T: CanAdapter, U: CanAdapter>(tx: &mut T, rx: &mut U) {
    let mut frames = vec![];

    for i in 0..BULK_NUM_FRAMES {
        frames.push(Frame::new(0, 0x123.into(), &i.to_be_bytes()).unwrap());
    }

    for frame in &frames {
        tx.send(frame, SEND_TIMEOUT).unwrap();
    }

    let start = std::time::Instant::now();

    let mut received: Vec<Frame> = vec![];
    while received.len() < frames.len() && start.elapsed() < Duration::from_millis(BULK_TIMEOUT_MS) {
        if let Some(frame) = rx.recv(Duration::from_millis(10)).unwrap() {
            received.push(frame);
        }
    }

    assert_eq!(frames.len(), received.len());
    assert_eq!(frames, received);
}

#[test]
#[serial_test::serial]
fn virtual_bulk_send() {
    let mut tx = can_we_talk::can::open(BusType::Virtual, "bulk", 500_000).unwrap();
    let mut rx = can_we_talk::can::open(BusType::Virtual, "bulk", 500_000).unwrap();
    bulk_send(&mut tx, &mut rx);
}

#[cfg(feature = "test-vcan")]
#[test]
#[serial_test::serial]
fn vcan_bulk_send() {
    let mut tx = can_we_talk::socketcan::SocketCan::new("vcan0").unwrap();
    let mut rx = can_we_talk::socketcan::SocketCan::new("vcan0").unwrap();
    bulk_send(&mut tx, &mut rx);
}

#[cfg(feature = "test-vcan")]
#[test]
#[serial_test::serial]
fn vcan_recv_timeout() {
    let mut adapter = can_we_talk::socketcan::SocketCan::new("vcan0").unwrap();
    assert_eq!(adapter.recv(Duration::from_millis(10)).unwrap(), None);
}

#[cfg(all(target_os = "linux", feature = "socketcan"))]
#[test]
#[serial_test::serial]
fn socketcan_open_nonexistent() {
    let e = can_we_talk::can::open(BusType::SocketCan, "doestnotexist", 500_000);

    match e {
        Err(can_we_talk::Error::ConnectionFailed { bus_type, channel, .. }) => {
            assert_eq!(bus_type, BusType::SocketCan);
            assert_eq!(channel, "doestnotexist");
        }
        _ => panic!("Expected ConnectionFailed error"),
    }
}

#[test]
fn open_unknown_bus_type() {
    let e = "pcan".parse::<BusType>();
    assert!(e.is_err());
}
