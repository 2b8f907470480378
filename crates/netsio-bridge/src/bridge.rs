use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use netsio_protocol::Packet;
use netsio_queue::RxQueue;
use netsio_transport::{TransportError, UdpTransport};

use crate::clock::{NullClock, SerialClock, SioTiming};
use crate::engine;
use crate::error::SendBlockError;
use crate::flags::BridgeFlags;
use crate::sio::{SioState, State};

pub(crate) struct Inner {
    pub(crate) transport: UdpTransport,
    pub(crate) rx: RxQueue,
    pub(crate) sio: Mutex<SioState>,
    pub(crate) flags: BridgeFlags,
    pub(crate) clock: Box<dyn SerialClock>,
    pub(crate) timing: SioTiming,
}

/// The emulator-facing NetSIO bridge: a UDP socket, a receive thread running
/// the protocol engine, and the SIO state machine the emulator's serial port
/// drives through `put_byte`/`get_byte` (spec.md §6).
pub struct NetSioBridge {
    inner: Arc<Inner>,
    rx_thread: Mutex<Option<JoinHandle<()>>>,
}

impl NetSioBridge {
    /// Bind the NetSIO UDP socket on `port` and start the protocol engine
    /// thread. Uses `NullClock` — wire in a real `SerialClock` with
    /// `with_clock` before `init` if one is available.
    pub fn init(port: u16) -> Result<Self, TransportError> {
        Self::init_with(port, Box::new(NullClock), SioTiming::default())
    }

    /// Same as `init`, but with an explicit `SerialClock` and timing
    /// configuration. This is the constructor a real emulator integration
    /// should use.
    pub fn init_with(
        port: u16,
        clock: Box<dyn SerialClock>,
        timing: SioTiming,
    ) -> Result<Self, TransportError> {
        let transport = UdpTransport::bind(port)?;
        let inner = Arc::new(Inner {
            transport,
            rx: RxQueue::new(),
            sio: Mutex::new(SioState::new()),
            flags: BridgeFlags::new(),
            clock,
            timing,
        });

        let engine_inner = inner.clone();
        let rx_thread = std::thread::Builder::new()
            .name("netsio-rx".into())
            .spawn(move || engine::run(engine_inner))
            .expect("failed to spawn netsio-rx thread");

        Ok(Self {
            inner,
            rx_thread: Mutex::new(Some(rx_thread)),
        })
    }

    /// Bytes currently buffered for the emulator to read.
    pub fn available(&self) -> usize {
        self.inner.rx.available()
    }

    /// Feed one byte from the emulator's serial port into the command
    /// collector.
    pub fn put_byte(&self, b: u8) {
        let mut sio = self.inner.sio.lock().unwrap_or_else(|e| e.into_inner());
        sio.put_byte(b, self.inner.clock.as_ref(), &self.inner.timing);
    }

    /// The emulator wants its next serial-in byte.
    pub fn get_byte(&self) -> u8 {
        let mut sio = self.inner.sio.lock().unwrap_or_else(|e| e.into_inner());
        sio.get_byte(&self.inner.rx, self.inner.clock.as_ref(), &self.inner.timing)
    }

    /// Send a single unconditional DATA_BYTE to the peer.
    pub fn send_byte(&self, b: u8) {
        if let Ok(bytes) = Packet::DataByte(b).encode() {
            self.inner.transport.send(&bytes);
        }
    }

    /// Send `buf` as a DATA_BLOCK. `buf` must be 1..=512 bytes.
    pub fn send_block(&self, buf: &[u8]) -> Result<(), SendBlockError> {
        if buf.is_empty() {
            return Err(SendBlockError::Empty);
        }
        if buf.len() > 512 {
            return Err(SendBlockError::TooLarge(buf.len()));
        }
        let encoded = Packet::DataBlock(buf.to_vec())
            .encode()
            .expect("length already validated");
        self.inner.transport.send(&encoded);
        Ok(())
    }

    /// Assert the emulator's SIO command line: sends COMMAND_ON and starts
    /// collecting a fresh command frame.
    pub fn cmd_on(&self) {
        {
            let mut sio = self.inner.sio.lock().unwrap_or_else(|e| e.into_inner());
            sio.cmd_index = 0;
            sio.state = State::Cmd;
        }
        self.inner.flags.cmd_line.store(true, Ordering::Relaxed);
        if let Ok(bytes) = Packet::CommandOn.encode() {
            self.inner.transport.send(&bytes);
        }
    }

    /// Deassert the command line with a synchronized handshake: the
    /// buffered command frame is sent as a DATA_BLOCK, followed by
    /// COMMAND_OFF_SYNC carrying the next sync tag, and the bridge enters
    /// `sync_wait` until the matching SYNC_RESPONSE arrives (spec.md §4.D).
    pub fn cmd_off_sync(&self) {
        let cmd_frame = {
            let mut sio = self.inner.sio.lock().unwrap_or_else(|e| e.into_inner());
            sio.state = State::Ack;
            sio.cmd_frame
        };

        if let Ok(bytes) = Packet::DataBlock(cmd_frame.to_vec()).encode() {
            self.inner.transport.send(&bytes);
        }

        let sync_num = self.inner.flags.next_sync_num();
        if let Ok(bytes) = Packet::CommandOffSync { sync_num }.encode() {
            self.inner.transport.send(&bytes);
        }

        self.inner.flags.sync_wait.store(true, Ordering::SeqCst);
        self.inner.flags.cmd_line.store(false, Ordering::Relaxed);
    }

    /// Deassert the command line without a synchronized handshake: a bare
    /// COMMAND_OFF, used when the emulator doesn't need the peer to confirm
    /// receipt before continuing (spec.md §4.D).
    pub fn cmd_off(&self) {
        self.inner.flags.cmd_line.store(false, Ordering::Relaxed);
        if let Ok(bytes) = Packet::CommandOff.encode() {
            self.inner.transport.send(&bytes);
        }
    }

    /// Toggle the command line: `true` calls `cmd_on`, `false` calls
    /// `cmd_off_sync` (spec.md §4.F).
    pub fn toggle_cmd(&self, asserted: bool) {
        if asserted {
            self.cmd_on();
        } else {
            self.cmd_off_sync();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.flags.enabled.load(Ordering::Relaxed)
    }

    pub fn is_sync_wait(&self) -> bool {
        self.inner.flags.sync_wait.load(Ordering::SeqCst)
    }

    /// The peer's write-size advertisement from its most recent
    /// SYNC_RESPONSE, if any has arrived yet.
    pub fn next_write_size(&self) -> u32 {
        self.inner.flags.next_write_size.load(Ordering::Relaxed)
    }

    /// The learned peer address, once a datagram has arrived.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.transport.peer()
    }

    /// The UDP address this bridge is bound to. Useful for tests and
    /// diagnostics that bind to port 0 and need the OS-assigned port.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.transport.local_addr()
    }

    /// Send the canned device-probe command frame used by `netsio_test_cmd`
    /// in the original: a status request bracketed by a command-on/off
    /// handshake, useful as a bring-up diagnostic with no real emulator
    /// attached.
    pub fn test_cmd(&self) {
        const PROBE: [u8; 5] = [0x70, 0xE8, 0x00, 0x00, 0x59];
        self.cmd_on();
        for b in PROBE {
            self.put_byte(b);
        }
        self.cmd_off_sync();
    }
}

impl Drop for NetSioBridge {
    fn drop(&mut self) {
        // The RX thread blocks forever on `recv_from` with no shutdown
        // signal (spec.md §3: "Terminal: none, runs for the life of the
        // process"); we only reap the handle if it already exited.
        if let Ok(mut guard) = self.rx_thread.lock() {
            if let Some(handle) = guard.take() {
                if handle.is_finished() {
                    let _ = handle.join();
                } else {
                    drop(handle);
                }
            }
        }
    }
}
