use thiserror::Error;

pub type Result<T> = std::result::Result<T, DexError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// Fee does not fit the 24-bit fee field of an encoded exchange
    #[error("Fee {fee} exceeds the 24-bit fee field (max {max})")]
    FeeOutOfRange { fee: u32, max: u32 },

    #[error("Failed to encode {call} input: {reason}")]
    Encoding { call: String, reason: String },

    #[error("Failed to decode {call} output: {reason}")]
    Decoding { call: String, reason: String },
}
