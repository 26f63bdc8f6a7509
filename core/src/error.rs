use thiserror::Error;

pub type RangecrackResult<T> = std::result::Result<T, RangecrackError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangecrackError {
    #[error("Counter {counter} is outside of the search space of size {n}")]
    OutOfRange { counter: u64, n: u64 },

    #[error("The character {0:?} is not part of the charset")]
    InvalidCharacter(char),

    #[error("Password length should be between 1 and {max}, got {len}")]
    PasswordLength { len: usize, max: u8 },

    #[error("The charset should be made of unique ASCII characters")]
    Charset,

    #[error("Rangecrack only supports spaces up to 2^64, but the provided space is 2^{0}")]
    Space(u8),

    #[error("The search space should be split in at least one chunk")]
    NoChunks,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
