use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// The bridge's externally-visible state, readable without touching the SIO
/// state machine's mutex. Split out from `SioState` because these fields
/// are polled from the emulator's hot path (`is_enabled`, `is_sync_wait`)
/// and from the protocol engine thread concurrently.
#[derive(Default)]
pub(crate) struct BridgeFlags {
    /// Set once a DEVICE_CONNECTED arrives, cleared on DEVICE_DISCONNECTED.
    pub enabled: AtomicBool,
    /// Set while a COMMAND_OFF_SYNC round-trip is outstanding.
    pub sync_wait: AtomicBool,
    /// Mirrors the emulator's SIO command line, toggled via `toggle_cmd`.
    pub cmd_line: AtomicBool,
    /// Next sync tag to stamp on an outgoing COMMAND_OFF_SYNC.
    pub sync_num: AtomicU8,
    /// Write size advertised by the peer's most recent SYNC_RESPONSE.
    pub next_write_size: AtomicU32,
}

impl BridgeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current sync tag and arms the next one. Mirrors the
    /// original's "use then increment" ordering for `netsio_sync_num`.
    pub fn next_sync_num(&self) -> u8 {
        self.sync_num.fetch_add(1, Ordering::SeqCst)
    }
}
