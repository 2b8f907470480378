use crate::error::DecodeError;
use crate::opcode::Opcode;
use thiserror::Error;

/// Outcome of a `SYNC_RESPONSE`'s ack byte, per spec.md §4.D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckType {
    Nak,
    Ack,
    Unknown(u8),
}

impl AckType {
    fn from_u8(b: u8) -> Self {
        match b {
            0 => AckType::Nak,
            1 => AckType::Ack,
            other => AckType::Unknown(other),
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            AckType::Nak => 0,
            AckType::Ack => 1,
            AckType::Unknown(b) => b,
        }
    }
}

/// A decoded/to-be-encoded NetSIO datagram.
///
/// Encoding is pure: buffer in, buffer out, no I/O. Decoding never panics on
/// malformed input — it returns `DecodeError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    DataByte(u8),
    DataBlock(Vec<u8>),
    CommandOn,
    CommandOff,
    CommandOffSync { sync_num: u8 },
    SyncResponse {
        sync_tag: u8,
        ack_type: AckType,
        ack_byte: u8,
        write_size: u16,
    },
    PingRequest,
    PingResponse,
    AliveRequest,
    AliveResponse,
    CreditStatus(u8),
    CreditUpdate(u8),
    DeviceConnected,
    DeviceDisconnected,
    SpeedChange(u32),
    ProceedOn,
    ProceedOff,
    InterruptOn,
    InterruptOff,
}

/// `DataBlock` payloads must fit the wire contract (spec.md §4.A, §8).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("DATA_BLOCK payload must be 1..=512 bytes, got {0}")]
    BlockLenOutOfRange(usize),
}

impl Packet {
    pub fn opcode(&self) -> Opcode {
        match self {
            Packet::DataByte(_) => Opcode::DataByte,
            Packet::DataBlock(_) => Opcode::DataBlock,
            Packet::CommandOn => Opcode::CommandOn,
            Packet::CommandOff => Opcode::CommandOff,
            Packet::CommandOffSync { .. } => Opcode::CommandOffSync,
            Packet::SyncResponse { .. } => Opcode::SyncResponse,
            Packet::PingRequest => Opcode::PingRequest,
            Packet::PingResponse => Opcode::PingResponse,
            Packet::AliveRequest => Opcode::AliveRequest,
            Packet::AliveResponse => Opcode::AliveResponse,
            Packet::CreditStatus(_) => Opcode::CreditStatus,
            Packet::CreditUpdate(_) => Opcode::CreditUpdate,
            Packet::DeviceConnected => Opcode::DeviceConnected,
            Packet::DeviceDisconnected => Opcode::DeviceDisconnected,
            Packet::SpeedChange(_) => Opcode::SpeedChange,
            Packet::ProceedOn => Opcode::ProceedOn,
            Packet::ProceedOff => Opcode::ProceedOff,
            Packet::InterruptOn => Opcode::InterruptOn,
            Packet::InterruptOff => Opcode::InterruptOff,
        }
    }

    /// Encode this packet as a standalone datagram.
    ///
    /// `DATA_BLOCK` gets the mandatory trailing `0xFF` pad byte per spec.md
    /// §6 ("FujiNet-PC rejects the packet otherwise").
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![self.opcode().as_u8()];
        match self {
            Packet::DataByte(b) => buf.push(*b),
            Packet::DataBlock(payload) => {
                if payload.is_empty() || payload.len() > 512 {
                    return Err(EncodeError::BlockLenOutOfRange(payload.len()));
                }
                buf.extend_from_slice(payload);
                buf.push(0xFF);
            }
            Packet::CommandOn | Packet::CommandOff => {}
            Packet::CommandOffSync { sync_num } => buf.push(*sync_num),
            Packet::SyncResponse {
                sync_tag,
                ack_type,
                ack_byte,
                write_size,
            } => {
                buf.push(*sync_tag);
                buf.push(ack_type.as_u8());
                buf.push(*ack_byte);
                let [lo, hi] = write_size.to_le_bytes();
                buf.push(lo);
                buf.push(hi);
            }
            Packet::PingRequest
            | Packet::PingResponse
            | Packet::AliveRequest
            | Packet::AliveResponse
            | Packet::DeviceConnected
            | Packet::DeviceDisconnected
            | Packet::ProceedOn
            | Packet::ProceedOff
            | Packet::InterruptOn
            | Packet::InterruptOff => {}
            Packet::CreditStatus(status) => buf.push(*status),
            Packet::CreditUpdate(credit) => buf.push(*credit),
            Packet::SpeedChange(baud) => buf.extend_from_slice(&baud.to_le_bytes()),
        }
        Ok(buf)
    }

    /// Decode a datagram payload (opcode byte first) into a `Packet`.
    pub fn decode(buf: &[u8]) -> Result<Packet, DecodeError> {
        let &opcode_byte = buf.first().ok_or(DecodeError::Empty)?;
        let opcode = Opcode::try_from(opcode_byte).map_err(DecodeError::UnknownOpcode)?;

        if buf.len() < opcode.min_len() {
            return Err(DecodeError::ShortPacket {
                opcode: opcode_byte,
                got: buf.len(),
                need: opcode.min_len(),
            });
        }

        Ok(match opcode {
            Opcode::PingRequest => Packet::PingRequest,
            Opcode::PingResponse => Packet::PingResponse,
            Opcode::AliveRequest => Packet::AliveRequest,
            Opcode::AliveResponse => Packet::AliveResponse,
            Opcode::DeviceConnected => Packet::DeviceConnected,
            Opcode::DeviceDisconnected => Packet::DeviceDisconnected,
            Opcode::CommandOn => Packet::CommandOn,
            Opcode::CommandOff => Packet::CommandOff,
            Opcode::ProceedOn => Packet::ProceedOn,
            Opcode::ProceedOff => Packet::ProceedOff,
            Opcode::InterruptOn => Packet::InterruptOn,
            Opcode::InterruptOff => Packet::InterruptOff,
            Opcode::CommandOffSync => Packet::CommandOffSync { sync_num: buf[1] },
            Opcode::DataByte => Packet::DataByte(buf[1]),
            Opcode::DataBlock => Packet::DataBlock(buf[1..].to_vec()),
            Opcode::CreditStatus => Packet::CreditStatus(buf[1]),
            Opcode::CreditUpdate => Packet::CreditUpdate(buf[1]),
            Opcode::SpeedChange => {
                let baud = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]);
                Packet::SpeedChange(baud)
            }
            Opcode::SyncResponse => Packet::SyncResponse {
                sync_tag: buf[1],
                ack_type: AckType::from_u8(buf[2]),
                ack_byte: buf[3],
                write_size: u16::from_le_bytes([buf[4], buf[5]]),
            },
        })
    }
}
