//! Error types for the OBD-II protocol.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Malformed Reply: expected 8 bytes, got {0}")]
    MalformedReply(usize),
    #[error("Unexpected Reply Identifier: 0x{0:03x}")]
    UnexpectedIdentifier(u32),
}
