/// Failures surfaced by the codec. None of them are transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("access of {requested} bytes at offset {position} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds {
        position: usize,
        requested: usize,
        len: usize,
    },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unsupported channel count {0}, expected 3 or 4")]
    UnsupportedChannels(u8),

    #[error("stream is truncated at byte {offset}")]
    TruncatedStream { offset: usize },

    #[error("encoded output exceeded its worst-case capacity of {capacity} bytes")]
    BufferOverflow { capacity: usize },

    #[error("a {width}x{height} image needs {expected} pixels, found {actual}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("a {width}x{height} image is too large to address")]
    TooLarge { width: u32, height: u32 },

    #[error("{what} of {actual} exceeds the limit of {max}")]
    LimitExceeded {
        what: &'static str,
        actual: u64,
        max: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
