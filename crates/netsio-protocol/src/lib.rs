//! NetSIO wire protocol: opcode taxonomy and packet encode/decode.
//!
//! This crate is pure — no sockets, no threads, no I/O. It exists so the
//! wire format can be fuzzed and unit-tested in isolation from the transport
//! and state-machine layers that use it.

mod error;
mod opcode;
mod packet;

pub use error::DecodeError;
pub use opcode::Opcode;
pub use packet::{AckType, EncodeError, Packet};
