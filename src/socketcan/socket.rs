//! Low Level SocketCAN code
//! Code based on https://github.com/socketcan-rs/socketcan-rs
use libc::{c_int, c_void, can_frame, sa_family_t, sockaddr_can, socklen_t, AF_CAN, CAN_RAW, CAN_RAW_LOOPBACK, SOL_CAN_RAW};
use std::ffi::CString;
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::time::Duration;

/// Raw sockets treat a zero timeout as "block forever".
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

pub struct CanSocket(socket2::Socket);

fn as_bytes<T: Sized>(val: &T) -> &[u8] {
    let sz = std::mem::size_of::<T>();
    unsafe { std::slice::from_raw_parts::<'_, u8>(val as *const _ as *const u8, sz) }
}

fn as_bytes_mut<T: Sized>(val: &mut T) -> &mut [u8] {
    let sz = std::mem::size_of::<T>();
    unsafe { std::slice::from_raw_parts_mut(val as *mut _ as *mut u8, sz) }
}

fn if_nametoindex(ifname: &str) -> std::io::Result<u32> {
    let name = CString::new(ifname).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    match unsafe { libc::if_nametoindex(name.as_ptr()) } {
        0 => Err(std::io::Error::last_os_error()),
        idx => Ok(idx),
    }
}

impl CanSocket {
    pub fn open(ifname: &str) -> std::io::Result<Self> {
        let ifindex = if_nametoindex(ifname)?;

        let ((), sock_addr) = unsafe {
            socket2::SockAddr::try_init(|storage, len| {
                let addr = storage.cast::<sockaddr_can>();
                (*addr).can_family = AF_CAN as sa_family_t;
                (*addr).can_ifindex = ifindex as c_int;
                *len = std::mem::size_of::<sockaddr_can>() as socklen_t;
                Ok(())
            })?
        };

        let af_can = socket2::Domain::from(AF_CAN);
        let can_raw = socket2::Protocol::from(CAN_RAW);

        let sock = socket2::Socket::new_raw(af_can, socket2::Type::from(libc::SOCK_RAW), Some(can_raw))?;
        sock.bind(&sock_addr)?;
        Ok(Self(sock))
    }

    pub fn set_loopback(&self, enabled: bool) -> std::io::Result<()> {
        let loopback = c_int::from(enabled);
        self.set_socket_option(SOL_CAN_RAW, CAN_RAW_LOOPBACK, &loopback)
    }

    /// Write one frame, blocking at most `timeout` while the transmit queue is full.
    pub fn write_frame(&self, frame: &can_frame, timeout: Duration) -> std::io::Result<()> {
        self.0.set_write_timeout(Some(timeout.max(MIN_TIMEOUT)))?;

        let bytes = as_bytes(frame);
        let written = (&self.0).write(bytes)?;
        if written != bytes.len() {
            return Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "short write of CAN frame"));
        }
        Ok(())
    }

    /// Read one frame, waiting at most `timeout`. Returns `Ok(None)` when the timeout expired.
    pub fn read_frame(&self, timeout: Duration) -> std::io::Result<Option<can_frame>> {
        self.0.set_read_timeout(Some(timeout.max(MIN_TIMEOUT)))?;

        let mut frame = super::frame::can_frame_default();
        match (&self.0).read(as_bytes_mut(&mut frame)) {
            Ok(n) if n == std::mem::size_of::<can_frame>() => Ok(Some(frame)),
            Ok(_) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "incomplete CAN frame")),
            Err(e) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.0.as_raw_fd()
    }

    fn set_socket_option<T>(&self, level: c_int, name: c_int, val: &T) -> std::io::Result<()> {
        let ret = unsafe {
            libc::setsockopt(
                self.as_raw_fd(),
                level,
                name,
                val as *const _ as *const c_void,
                std::mem::size_of::<T>() as socklen_t,
            )
        };

        match ret {
            0 => Ok(()),
            _ => Err(std::io::Error::last_os_error()),
        }
    }
}
