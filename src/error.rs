// Bus construction error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bank register value {0:#08X} is not a 32K window of the 24-bit bus")]
    MisalignedBank(u32),

    #[error("bank {index:#04X} maps offset {offset:#X} past the end of a {len:#X} byte buffer")]
    BufferTooSmall { index: u8, offset: usize, len: usize },

    #[error("bank range {first:#04X}..={last:#04X} is empty")]
    EmptyBankRange { first: u8, last: u8 },

    #[error("invalid bus configuration: {0}")]
    Config(#[from] serde_json::Error),
}
