//! The SIO-side state machine: how command/data bytes coming from the
//! emulator's serial port turn into NetSIO traffic, and how bytes arriving
//! over NetSIO get paced back out as if a real peripheral were answering on
//! the wire.
//!
//! Grounded directly on `SIO_Net_PutByte`/`SIO_Net_GetByte` in the retrieval
//! pack's `netsio.c`. `ST_WAIT_ACK`, `ST_FRAME_FINAL`, and `ST_DATA` are
//! carried in the state enum because spec.md §3 and §4.E name them, but none
//! of the three is ever entered by a real transition here — `READ_PERCOM`
//! and `READ_SECTOR` schedule their pacing interval and stay in `ST_ACK`
//! rather than moving to `ST_DATA` (spec.md §4.E: "remain ST_ACK until
//! payload arrives"), and `ST_FRAME_FINAL` is dead code in the source it was
//! copied from. They're kept here only so `get_byte`'s match stays
//! exhaustive without a silent catch-all swallowing a state we didn't
//! anticipate.

use netsio_queue::RxQueue;

use crate::clock::{SerialClock, SioTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Cmd,
    WaitAck,
    Ack,
    Frame,
    FrameFinal,
    Data,
}

/// Command-response opcodes this bridge gives a concrete response shape to.
/// `netsio.c` didn't carry its `netsio.h` opcode header into the retrieval
/// pack, but these SIO command bytes (not NetSIO opcodes) are read directly
/// out of `cmd_frame[1]` in the source and are standard Atari SIO device
/// commands, not something this crate invented.
mod sio_cmd {
    pub const READ_PERCOM: u8 = 0x4E;
    pub const READ_SECTOR: u8 = 0x52;
    pub const STATUS_A: u8 = 0x53;
    pub const STATUS_B: u8 = 0xD3;
}

const ACK_BYTE: u8 = 0x41;
const COMPLETE_BYTE: u8 = 0x43;

pub struct SioState {
    pub state: State,
    pub cmd_frame: [u8; 5],
    pub cmd_index: usize,
    data_buffer: [u8; 6],
    data_index: usize,
    expected_bytes: usize,
}

impl Default for SioState {
    fn default() -> Self {
        Self::new()
    }
}

impl SioState {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            cmd_frame: [0; 5],
            cmd_index: 0,
            data_buffer: [0; 6],
            data_index: 0,
            expected_bytes: 0,
        }
    }

    /// A byte arrived from the emulator's SIO port, command line asserted.
    /// Only `ST_IDLE` and `ST_CMD` collect command bytes; everywhere else
    /// this is a no-op (spec.md §4.D: "transitions not listed are self-loops
    /// or no-ops").
    pub fn put_byte(&mut self, b: u8, clock: &dyn SerialClock, timing: &SioTiming) {
        match self.state {
            State::Idle => {
                self.cmd_index = 0;
                self.state = State::Cmd;
                self.buffer_cmd_byte(b, clock, timing);
            }
            State::Cmd => self.buffer_cmd_byte(b, clock, timing),
            _ => {}
        }
    }

    fn buffer_cmd_byte(&mut self, b: u8, clock: &dyn SerialClock, timing: &SioTiming) {
        if self.cmd_index < self.cmd_frame.len() {
            self.cmd_frame[self.cmd_index] = b;
            self.cmd_index += 1;
        }
        if self.cmd_index == self.cmd_frame.len() {
            self.state = State::Ack;
            clock.schedule_serin_irq(timing.serin_interval + timing.ack_interval);
        }
    }

    /// The emulator wants its next serial-in byte. Blocks on the RX queue
    /// when the state needs a peer byte to proceed.
    pub fn get_byte(&mut self, rx: &RxQueue, clock: &dyn SerialClock, timing: &SioTiming) -> u8 {
        match self.state {
            State::Ack => self.get_byte_ack(rx, clock, timing),
            State::Frame => self.get_byte_frame(clock, timing),
            State::Data => rx.pop_blocking(),
            State::FrameFinal => {
                // Never reached by any transition below; ported from the
                // original's equally unreachable ST_FRAME_FINAL arm so the
                // state doesn't silently vanish if something someday drives
                // into it.
                self.state = State::Idle;
                clock.schedule_serin_irq(timing.serin_interval);
                0
            }
            State::Idle | State::Cmd | State::WaitAck => 0,
        }
    }

    fn get_byte_ack(&mut self, rx: &RxQueue, clock: &dyn SerialClock, timing: &SioTiming) -> u8 {
        let b = rx.pop_blocking();
        if b != ACK_BYTE {
            self.state = State::Idle;
            return 0;
        }

        match self.cmd_frame[1] {
            sio_cmd::READ_PERCOM => {
                clock.schedule_serin_irq(timing.serin_interval);
                0
            }
            sio_cmd::READ_SECTOR => {
                clock.schedule_serin_irq(timing.serin_interval * 4);
                0
            }
            sio_cmd::STATUS_A | sio_cmd::STATUS_B => self.complete_status_frame(rx, clock, timing),
            _ => {
                // No response shape is defined for this command; schedule
                // the base pacing interval and stay in ST_ACK, same as
                // READ_PERCOM (spec.md §4.E names a response shape only for
                // the opcodes above — everything else just paces and waits).
                clock.schedule_serin_irq(timing.serin_interval);
                0
            }
        }
    }

    fn complete_status_frame(
        &mut self,
        rx: &RxQueue,
        clock: &dyn SerialClock,
        timing: &SioTiming,
    ) -> u8 {
        let complete = rx.pop_blocking();
        if complete != COMPLETE_BYTE {
            self.state = State::Idle;
            return 0;
        }

        self.data_buffer[0] = b'C';
        for slot in &mut self.data_buffer[1..5] {
            *slot = rx.pop_blocking();
        }
        self.data_buffer[5] = rx.pop_blocking();

        self.data_index = 0;
        self.expected_bytes = self.data_buffer.len();
        self.state = State::Frame;
        clock.schedule_serin_irq(timing.serin_interval);
        ACK_BYTE
    }

    fn get_byte_frame(&mut self, clock: &dyn SerialClock, timing: &SioTiming) -> u8 {
        if self.data_index >= self.expected_bytes {
            self.state = State::Idle;
            return 0;
        }

        let b = self.data_buffer[self.data_index];
        self.data_index += 1;

        if self.data_index >= self.expected_bytes {
            self.state = State::Idle;
        } else if self.data_index == 1 {
            clock.schedule_serin_irq(timing.serin_interval);
        } else {
            let audf3 = clock.audf_chan3() as u32;
            let delay = (timing.serin_interval.saturating_mul(audf3).saturating_sub(1)) / 0x28 + 1;
            clock.schedule_serin_irq(delay);
        }

        b
    }
}
