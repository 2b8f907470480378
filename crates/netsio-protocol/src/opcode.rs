/// NetSIO wire opcodes.
///
/// Values are an external ABI shared with the FujiNet-PC peer. The upstream
/// `netsio.h` header was not available to ground these against, except for
/// `PING_REQUEST`/`PING_RESPONSE`, whose values (`0x01`/`0x02`) are fixed by
/// the literal ping scenario in the bridge specification. The remaining
/// opcodes are assigned sequentially and are internally consistent; see
/// `DESIGN.md` for the full rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    PingRequest = 0x01,
    PingResponse = 0x02,
    AliveRequest = 0x03,
    AliveResponse = 0x04,
    DeviceConnected = 0x05,
    DeviceDisconnected = 0x06,
    CommandOn = 0x07,
    CommandOff = 0x08,
    CommandOffSync = 0x09,
    DataByte = 0x0A,
    DataBlock = 0x0B,
    SyncResponse = 0x0C,
    CreditStatus = 0x0D,
    CreditUpdate = 0x0E,
    SpeedChange = 0x0F,
    ProceedOn = 0x10,
    ProceedOff = 0x11,
    InterruptOn = 0x12,
    InterruptOff = 0x13,
}

impl Opcode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Minimum total packet length (opcode byte included) accepted for this
    /// opcode. Packets shorter than this are `DecodeError::ShortPacket`.
    pub const fn min_len(self) -> usize {
        match self {
            Opcode::PingRequest
            | Opcode::PingResponse
            | Opcode::AliveRequest
            | Opcode::AliveResponse
            | Opcode::DeviceConnected
            | Opcode::DeviceDisconnected
            | Opcode::CommandOn
            | Opcode::CommandOff
            | Opcode::ProceedOn
            | Opcode::ProceedOff
            | Opcode::InterruptOn
            | Opcode::InterruptOff => 1,
            Opcode::CommandOffSync | Opcode::DataByte | Opcode::CreditStatus | Opcode::CreditUpdate => 2,
            Opcode::DataBlock => 2,
            Opcode::SpeedChange => 5,
            Opcode::SyncResponse => 6,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x01 => Opcode::PingRequest,
            0x02 => Opcode::PingResponse,
            0x03 => Opcode::AliveRequest,
            0x04 => Opcode::AliveResponse,
            0x05 => Opcode::DeviceConnected,
            0x06 => Opcode::DeviceDisconnected,
            0x07 => Opcode::CommandOn,
            0x08 => Opcode::CommandOff,
            0x09 => Opcode::CommandOffSync,
            0x0A => Opcode::DataByte,
            0x0B => Opcode::DataBlock,
            0x0C => Opcode::SyncResponse,
            0x0D => Opcode::CreditStatus,
            0x0E => Opcode::CreditUpdate,
            0x0F => Opcode::SpeedChange,
            0x10 => Opcode::ProceedOn,
            0x11 => Opcode::ProceedOff,
            0x12 => Opcode::InterruptOn,
            0x13 => Opcode::InterruptOff,
            other => return Err(other),
        })
    }
}
