//! The SIO bridge: the emulator-facing NetSIO API (spec.md §4.D–§4.F, §6).
//!
//! Owns the UDP transport, the RX queue, the SIO state machine, and the
//! receiver thread that runs the protocol engine. Everything else in this
//! workspace (`netsio-protocol`, `netsio-queue`, `netsio-transport`) is a
//! leaf dependency this crate wires together, matching the teacher's
//! convention of one "owns the shared state, spawns the worker thread"
//! crate sitting above its pure leaf crates (e.g. `aero-l2-proxy` over
//! `aero-l2-protocol`/`aero-net-stack`).

mod bridge;
mod clock;
mod engine;
mod error;
mod flags;
mod sio;

pub use bridge::NetSioBridge;
pub use clock::{NullClock, SerialClock, SioTiming};
pub use error::SendBlockError;
pub use sio::State;
