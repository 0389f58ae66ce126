//! Error taxonomy for the DOM layer.
//!
//! One error enum covers the whole decode/resolve/apply/encode pipeline;
//! any variant aborts the batch and leaves the document's committed
//! bytes untouched.

use docbin_binn::BinnError;
use docbin_json_pointer::PointerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("arena allocation failed")]
    Alloc,
    #[error("binary value could not be constructed or carried an unrepresentable type")]
    Creation,
    #[error("binary container could not be iterated")]
    Invalid,
    #[error("add/replace operation carries no value")]
    PatchNoValue,
    #[error("path does not resolve: {0}")]
    PathNotFound(String),
    #[error("patch target is not a container: {0}")]
    PatchTargetInvalid(String),
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("invalid json in patch value: {0}")]
    Json(String),
    #[error("invalid patch operation: {0}")]
    InvalidOp(String),
}

impl From<BinnError> for DomError {
    fn from(err: BinnError) -> Self {
        match err {
            // Unrepresentable tagged types and construction failures
            BinnError::UnknownTag(_)
            | BinnError::IntOutOfRange
            | BinnError::KeyTooLong
            | BinnError::SizeOverflow => DomError::Creation,
            // Payloads that cannot be walked
            BinnError::UnexpectedEof | BinnError::Malformed | BinnError::InvalidUtf8 => {
                DomError::Invalid
            }
        }
    }
}
