//! The protocol engine: the receive thread that turns inbound NetSIO
//! datagrams into bridge-state transitions and emulator-bound bytes.
//!
//! Grounded on `fujinet_rx_thread` in the retrieval pack's `netsio.c`, which
//! runs exactly this loop (recv, decode, dispatch) for the life of the
//! process.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use netsio_protocol::{AckType, Packet};

use crate::bridge::Inner;
use crate::sio::State;

pub(crate) fn run(inner: Arc<Inner>) {
    loop {
        match inner.transport.recv() {
            Ok((bytes, _from)) => match Packet::decode(&bytes) {
                Ok(pkt) => handle_packet(&inner, pkt),
                Err(e) => tracing::warn!(error = %e, "netsio: dropping undecodable datagram"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "netsio: recv failed");
            }
        }
    }
}

pub(crate) fn handle_packet(inner: &Inner, pkt: Packet) {
    match pkt {
        Packet::PingRequest => reply(inner, Packet::PingResponse),
        Packet::AliveRequest => reply(inner, Packet::AliveResponse),
        Packet::DeviceConnected => {
            inner.flags.enabled.store(true, Ordering::Relaxed);
            tracing::info!("netsio: peer device connected");
        }
        Packet::DeviceDisconnected => {
            inner.flags.enabled.store(false, Ordering::Relaxed);
            tracing::info!("netsio: peer device disconnected");
        }
        Packet::CreditStatus(requested) => {
            tracing::trace!(requested, "netsio: credit status, granting 3");
            reply(inner, Packet::CreditUpdate(3));
        }
        Packet::SpeedChange(baud) => {
            tracing::debug!(baud, "netsio: peer changed serial speed");
        }
        Packet::DataByte(b) => inner.rx.push(&[b]),
        Packet::DataBlock(payload) => inner.rx.push(&payload),
        Packet::SyncResponse {
            sync_tag,
            ack_type,
            ack_byte,
            write_size,
        } => handle_sync_response(inner, sync_tag, ack_type, ack_byte, write_size),
        Packet::ProceedOn => inner.clock.set_proceed(true),
        Packet::ProceedOff => inner.clock.set_proceed(false),
        Packet::InterruptOn => inner.clock.set_interrupt(true),
        Packet::InterruptOff => inner.clock.set_interrupt(false),
        Packet::PingResponse
        | Packet::AliveResponse
        | Packet::CommandOn
        | Packet::CommandOff
        | Packet::CommandOffSync { .. }
        | Packet::CreditUpdate(_) => {
            tracing::warn!(opcode = ?pkt.opcode(), "netsio: received emulator-to-peer opcode, ignoring");
        }
    }
}

fn handle_sync_response(
    inner: &Inner,
    sync_tag: u8,
    ack_type: AckType,
    ack_byte: u8,
    write_size: u16,
) {
    inner
        .flags
        .next_write_size
        .store(write_size as u32, Ordering::Relaxed);

    // `next_sync_num()` already armed the tag for the *next* round when
    // `cmd_off_sync` ran, so the outstanding one is one behind it.
    let expected = inner.flags.sync_num.load(Ordering::SeqCst).wrapping_sub(1);
    if sync_tag != expected {
        tracing::warn!(sync_tag, expected, "netsio: sync tag mismatch, dropping to idle");
        set_state(inner, State::Idle);
        inner.flags.sync_wait.store(false, Ordering::SeqCst);
        return;
    }

    match ack_type {
        AckType::Nak => set_state(inner, State::Idle),
        AckType::Ack => {
            inner.rx.push(&[ack_byte]);
            set_state(inner, State::Ack);
        }
        AckType::Unknown(b) => {
            tracing::warn!(ack_type = b, "netsio: unrecognized sync ack type");
            set_state(inner, State::Idle);
        }
    }

    inner.flags.sync_wait.store(false, Ordering::SeqCst);
}

fn set_state(inner: &Inner, state: State) {
    let mut sio = inner.sio.lock().unwrap_or_else(|e| e.into_inner());
    sio.state = state;
}

fn reply(inner: &Inner, pkt: Packet) {
    match pkt.encode() {
        Ok(bytes) => inner.transport.send(&bytes),
        Err(e) => tracing::warn!(error = %e, "netsio: failed to encode reply"),
    }
}
