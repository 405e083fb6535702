//! # can-we-talk
//! Query a vehicle's OBD-II diagnostic bus over CAN. The crate sends mode 1 ("show current data") Parameter ID
//! requests to the functional broadcast address, waits for the engine ECU to answer, and decodes the reply.
//!
//! ## Example
//!
//! The following opens SocketCAN interface `can0`, and reads the fuel tank level.
//!
//! ```rust,no_run
//! use can_we_talk::can::BusType;
//! use can_we_talk::obd::{ObdClient, Pid};
//!
//! fn fuel_level() -> can_we_talk::Result<()> {
//!     let adapter = can_we_talk::can::open(BusType::SocketCan, "can0", 500_000)?;
//!     let mut client = ObdClient::new(adapter);
//!
//!     match client.read(Pid::FuelTankLevel)? {
//!         Some(value) => println!("Fuel tank level: {}", value),
//!         None => println!("unable to read fuel tank level"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Suported adapters
//!  - SocketCAN (Linux only, raw `AF_CAN` sockets)
//!  - Virtual, an in-process bus shared by every handle opened on the same channel name
//!

pub mod can;
mod error;
pub mod obd;
pub mod report;
pub mod virtual_bus;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub mod socketcan;
