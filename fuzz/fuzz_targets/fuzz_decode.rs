#![no_main]

use libfuzzer_sys::fuzz_target;
use netsio_protocol::Packet;

// Arbitrary bytes from the network must never panic or read out of bounds,
// regardless of opcode or claimed payload length (spec.md §4.A, §7).
fuzz_target!(|data: &[u8]| {
    let _ = Packet::decode(data);
});
