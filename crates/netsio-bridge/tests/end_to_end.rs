//! Literal end-to-end scenarios from spec.md §8, driven against a real
//! `NetSioBridge` over loopback UDP with a hand-rolled peer socket standing
//! in for FujiNet-PC.

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use netsio_bridge::NetSioBridge;

fn peer_socket_for(bridge: &NetSioBridge) -> UdpSocket {
    let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
    peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    peer.connect(bridge.local_addr().unwrap()).unwrap();
    peer
}

fn recv_one(peer: &UdpSocket) -> Vec<u8> {
    let mut buf = [0u8; 1024];
    let n = peer.recv(&mut buf).expect("expected a datagram from the bridge");
    buf[..n].to_vec()
}

fn wait_until(mut pred: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    pred()
}

/// spec.md §8 scenario 1: ping.
#[test]
fn ping_scenario() {
    let bridge = NetSioBridge::init(0).unwrap();
    let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
    peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    peer.send_to(&[0x01], bridge.local_addr().unwrap()).unwrap();
    let mut buf = [0u8; 8];
    let (n, from) = peer.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], &[0x02]);
    assert_eq!(Some(from), Some(peer.local_addr().unwrap()));

    assert!(wait_until(|| bridge.peer_addr().is_some(), Duration::from_secs(1)));
}

/// spec.md §8 scenario 2: status command, full round trip.
#[test]
fn status_command_scenario() {
    let bridge = NetSioBridge::init(0).unwrap();
    let peer = peer_socket_for(&bridge);

    // Learn the bridge as a peer first so later sends from the bridge have
    // somewhere to go; a single datagram from the peer suffices.
    peer.send(&[0x03]).unwrap(); // ALIVE_REQUEST
    let alive_resp = recv_one(&peer);
    assert_eq!(alive_resp, vec![0x04]); // ALIVE_RESPONSE

    bridge.cmd_on();
    assert_eq!(recv_one(&peer), vec![0x07]); // COMMAND_ON

    for b in [0x31, 0x53, 0x00, 0x00, 0x62] {
        bridge.put_byte(b);
    }
    bridge.cmd_off_sync();

    let data_block = recv_one(&peer);
    assert_eq!(data_block, vec![0x0B, 0x31, 0x53, 0x00, 0x00, 0x62, 0xFF]);

    let command_off_sync = recv_one(&peer);
    assert_eq!(command_off_sync[0], 0x09);
    let sync_num = command_off_sync[1];

    assert!(bridge.is_sync_wait());

    // The peer answers from its own thread, as it would over a real
    // network: the SYNC_RESPONSE (ack, ack_byte 0x41, write_size 0) and,
    // a beat later, the status response block. The `get_byte()` call below
    // blocks on both: it pops the ack byte out of the RX queue and then
    // synchronously drains the whole status frame before returning
    // (spec.md §4.E's "synchronously consume the next 6 peer bytes"), so
    // the bytes have to arrive asynchronously rather than being sent by
    // the same thread that's blocked waiting on them — sending them
    // sequentially on the test's own thread after the call would deadlock.
    let peer_clone = peer.try_clone().unwrap();
    let responder = std::thread::spawn(move || {
        peer_clone
            .send(&[0x0C, sync_num, 0x01, 0x41, 0x00, 0x00])
            .unwrap();
        std::thread::sleep(Duration::from_millis(20));
        peer_clone
            .send(&[0x0B, 0x43, 0x01, 0x02, 0x03, 0x04, 0x0A])
            .unwrap();
    });

    assert_eq!(bridge.get_byte(), 0x41);
    responder.join().unwrap();
    assert!(!bridge.is_sync_wait());

    let mut out = Vec::new();
    for _ in 0..6 {
        out.push(bridge.get_byte());
    }
    assert_eq!(out, vec![0x43, 0x01, 0x02, 0x03, 0x04, 0x0A]);
}

/// spec.md §8 scenario 3: NAK resets to idle without touching the RX queue.
#[test]
fn nak_scenario() {
    let bridge = NetSioBridge::init(0).unwrap();
    let peer = peer_socket_for(&bridge);

    peer.send(&[0x03]).unwrap();
    recv_one(&peer);

    bridge.cmd_on();
    recv_one(&peer);
    for b in [0x31, 0x53, 0x00, 0x00, 0x62] {
        bridge.put_byte(b);
    }
    bridge.cmd_off_sync();
    recv_one(&peer); // DATA_BLOCK
    let command_off_sync = recv_one(&peer);
    let sync_num = command_off_sync[1];

    peer.send(&[0x0C, sync_num, 0x00, 0x00, 0x00, 0x00]).unwrap();
    assert!(wait_until(|| !bridge.is_sync_wait(), Duration::from_secs(1)));
    assert_eq!(bridge.available(), 0);
}

/// spec.md §8 scenario 5: device connect/disconnect flips `is_enabled`.
#[test]
fn device_connect_disconnect_scenario() {
    let bridge = NetSioBridge::init(0).unwrap();
    let peer = peer_socket_for(&bridge);

    assert!(!bridge.is_enabled());
    peer.send(&[0x05]).unwrap(); // DEVICE_CONNECTED
    assert!(wait_until(|| bridge.is_enabled(), Duration::from_secs(1)));

    peer.send(&[0x06]).unwrap(); // DEVICE_DISCONNECTED
    assert!(wait_until(|| !bridge.is_enabled(), Duration::from_secs(1)));
}

/// spec.md §8 scenario 6: credit negotiation always grants 3.
#[test]
fn credit_negotiation_scenario() {
    let bridge = NetSioBridge::init(0).unwrap();
    let peer = peer_socket_for(&bridge);

    peer.send(&[0x0D, 0x99]).unwrap(); // CREDIT_STATUS
    assert_eq!(recv_one(&peer), vec![0x0E, 3]); // CREDIT_UPDATE[3]
}
