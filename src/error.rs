//! Contains the main error type for the library.
use thiserror::Error;

use crate::can::BusType;

/// The main error type for the library. The OBD module has it's own error type that is contained by this error.
///
/// A missing reply is not an error, the query engine reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed Frame")]
    MalformedFrame,
    #[error("Unsupported bus type: {0}")]
    UnsupportedBusType(String),
    #[error(
        "unable to connect to CAN bus {bus_type} on channel {channel}, check that hardware is connected and that the interface is active"
    )]
    ConnectionFailed {
        bus_type: BusType,
        channel: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to send frame: {0}")]
    Send(#[source] std::io::Error),
    #[error("Failed to receive frame: {0}")]
    Recv(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ObdError(#[from] crate::obd::error::Error),
}
