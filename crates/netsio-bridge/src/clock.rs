//! The narrow contract this crate needs from the emulator it is bridging.
//!
//! Everything the SIO state machine does to pace responses ultimately comes
//! down to two questions the emulator alone can answer: "schedule my next
//! serial-in IRQ this many POKEY cycles from now" and "what's currently in
//! AUDF[CHAN3]" (the serial clock's baud divisor). Modeling the rest of
//! POKEY, the PIA, or the CPU is out of scope (spec.md §1) — this trait is
//! the entire surface the bridge asks of its host.
pub trait SerialClock: Send + Sync {
    /// Schedule a delayed serial-in IRQ `delay` POKEY cycles from now.
    fn schedule_serin_irq(&self, delay: u32);

    /// Current value of POKEY's AUDF[CHAN3], used by the ST_FRAME pacing
    /// formula (spec.md §4.D).
    fn audf_chan3(&self) -> u8;

    /// The NetSIO PROCEED line changed. Most hosts wire this straight to a
    /// PIA CA1/CB1 transition; we have no PIA to drive, so the default is a
    /// no-op.
    fn set_proceed(&self, _asserted: bool) {}

    /// The NetSIO INTERRUPT line changed. Same story as `set_proceed`.
    fn set_interrupt(&self, _asserted: bool) {}
}

/// A `SerialClock` that does nothing. Useful for standalone testing of the
/// bridge and as a placeholder until a real emulator is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClock;

impl SerialClock for NullClock {
    fn schedule_serin_irq(&self, _delay: u32) {}

    fn audf_chan3(&self) -> u8 {
        0
    }
}

/// Timing constants the ST_ACK/ST_FRAME pacing formulas are built from.
///
/// The real Atari SIO stack derives these from the POKEY serial clock; the
/// retrieval pack's copy of `netsio.c` references `SIO_SERIN_INTERVAL` and a
/// "credit"-style ACK delay but not the header defining their numeric
/// values, so they're exposed here as configuration rather than baked in as
/// unverifiable magic numbers. `Default` supplies placeholder values a real
/// integration is expected to override with the host's actual constants.
#[derive(Debug, Clone, Copy)]
pub struct SioTiming {
    /// Base serial-in interval, in POKEY cycles, used for single-byte
    /// pacing and as the ST_CMD → ST_ACK handoff delay.
    pub serin_interval: u32,
    /// Extra delay folded into the ST_CMD → ST_ACK handoff on top of
    /// `serin_interval`.
    pub ack_interval: u32,
}

impl Default for SioTiming {
    fn default() -> Self {
        Self {
            serin_interval: 40,
            ack_interval: 20,
        }
    }
}
