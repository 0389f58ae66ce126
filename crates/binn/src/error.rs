use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BinnError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unknown binn type tag: 0x{0:02x}")]
    UnknownTag(u8),
    #[error("malformed binn container")]
    Malformed,
    #[error("invalid utf-8 in binn string")]
    InvalidUtf8,
    #[error("integer does not fit a signed 64-bit container")]
    IntOutOfRange,
    #[error("object key longer than 255 bytes")]
    KeyTooLong,
    #[error("value too large for a binn size field")]
    SizeOverflow,
}
