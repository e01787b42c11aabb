use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArcioError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("range {offset}..{offset}+{width} out of bounds for buffer of length {len}")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },
    #[error("unexpected end of stream: wanted {expected} bytes, got {actual}")]
    UnexpectedEndOfStream { expected: usize, actual: usize },
    #[error("operation cancelled")]
    Cancelled,
    #[error("timestamp out of representable range")]
    TimestampRange,
}

pub type Result<T> = std::result::Result<T, ArcioError>;

impl ArcioError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        ArcioError::InvalidArgument(msg.into())
    }
}
