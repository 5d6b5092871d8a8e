use {core::fmt::Display, thiserror::Error};

/// Errors produced while encoding or decoding instruction payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The value has a shape outside the closed set the format supports.
    ///
    /// This is raised while encoding and indicates a programming error in the
    /// caller's payload type, never a data condition.
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),
    /// Fewer bytes remain than the value requires.
    #[error("insufficient data")]
    InsufficientData,
    #[error("invalid bool encoding: {0}")]
    InvalidBoolEncoding(u8),
    #[error("invalid option tag: {0}")]
    InvalidOptionTag(u8),
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    /// A length prefix that cannot be addressed on this platform.
    #[error("length {0} overflows usize")]
    LengthOverflow(u64),
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde::de::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}
