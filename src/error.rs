use std::io;
use thiserror::Error;

/// Broad class of an [`EdfError`]
///
/// Batch callers use this to decide whether a failure is specific to one file
/// (format), to one request (range), or to the underlying stream (I/O).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Range,
    Io,
}

#[derive(Debug, Error)]
pub enum EdfError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Short read at byte {offset}: expected {expected} bytes, got {actual}")]
    ShortRead { offset: u64, expected: usize, actual: usize },

    #[error("Header too short: expected {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    #[error("Cannot extract {field} from {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("Invalid {field}: {value} is not positive")]
    NonPositive { field: &'static str, value: u64 },

    #[error("Header length {0} is smaller than the 256-byte fixed header")]
    HeaderLengthTooSmall(u64),

    #[error("Invalid number of signals: {0}")]
    InvalidSignalCount(u64),

    #[error("Signal header truncated: header declares {expected} bytes, only {actual} available")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("Signal header block of {actual} bytes cannot hold {signals} signals ({required} bytes required)")]
    SignalBlockTooSmall { signals: usize, required: usize, actual: usize },

    #[error("Invalid samples per record for signal {signal}: {raw:?}")]
    InvalidSamplesPerRecord { signal: usize, raw: String },

    #[error("No 'EDF Annotations' signal in file")]
    MissingAnnotationSignal,

    #[error("Multiple 'EDF Annotations' signals in file (signals {first} and {second})")]
    DuplicateAnnotationSignal { first: usize, second: usize },

    #[error("Record layout overflows 64-bit byte offsets")]
    LayoutOverflow,

    #[error("Invalid record number range: [{first}, {last}] (valid range [1, {record_count}])")]
    RecordRangeInverted { first: u64, last: u64, record_count: u64 },

    #[error("Requested range [{first}, {last}] out of range [1, {record_count}]")]
    RecordOutOfRange { first: u64, last: u64, record_count: u64 },
}

impl EdfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EdfError::FileNotFound(_) | EdfError::Io(_) | EdfError::ShortRead { .. } => ErrorKind::Io,
            EdfError::RecordRangeInverted { .. } | EdfError::RecordOutOfRange { .. } => ErrorKind::Range,
            _ => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdfError>;
