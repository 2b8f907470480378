//! Single-producer/single-consumer byte queue carrying bytes extracted from
//! inbound NetSIO packets toward the emulator.
//!
//! The original implementation used an OS pipe for this (see spec.md §9,
//! "OS pipe used as a byte queue"); that was an implementation accident, not
//! a requirement, so this is a plain `Mutex<VecDeque<u8>>` guarded by a
//! `Condvar` for the blocking consumer path `get_byte()` needs.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// FIFO byte queue. `push` never blocks and never drops — the producer (the
/// NetSIO receiver thread) always succeeds; the consumer (the emulator,
/// polling via `available`/`try_pop`, or blocking via `pop_blocking`) drains
/// it strictly in order.
pub struct RxQueue {
    buf: Mutex<VecDeque<u8>>,
    not_empty: Condvar,
}

impl Default for RxQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RxQueue {
    pub fn new() -> Self {
        Self {
            buf: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue all of `bytes`, in order. Bytes from a single packet are
    /// always contiguous in the queue because the lock is held for the
    /// whole extend.
    pub fn push(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        buf.extend(bytes.iter().copied());
        drop(buf);
        self.not_empty.notify_all();
    }

    /// Non-blocking pop of the oldest byte, or `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<u8> {
        let mut buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        buf.pop_front()
    }

    /// Block until at least one byte is available, then pop and return it.
    /// Retries on spurious wakeups, per spec.md §4.E.
    pub fn pop_blocking(&self) -> u8 {
        let mut buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(b) = buf.pop_front() {
                return b;
            }
            buf = self
                .not_empty
                .wait(buf)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Bytes currently buffered, for `available()` polling.
    pub fn available(&self) -> usize {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
