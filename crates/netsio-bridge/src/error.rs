use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendBlockError {
    #[error("cannot send an empty block")]
    Empty,
    #[error("block of {0} bytes exceeds the 512-byte NetSIO payload limit")]
    TooLarge(usize),
}
