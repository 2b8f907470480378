use thiserror::Error;

/// Failure to interpret a datagram as a NetSIO packet.
///
/// Both variants are recoverable: per the bridge's error taxonomy, decode
/// failures are logged by the caller and the datagram is dropped. Nothing in
/// this crate aborts the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet for opcode {opcode:#04x} too short: got {got} bytes, need at least {need}")]
    ShortPacket { opcode: u8, got: usize, need: usize },

    #[error("unknown NetSIO opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("empty datagram")]
    Empty,
}
