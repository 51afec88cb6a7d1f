use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Router configuration changed while advertising
    #[error("advertisement session is busy")]
    Busy,

    #[error("prefix {prefix} overlaps configured prefix {existing}")]
    AlreadyExists { prefix: String, existing: String },

    /// Router lifetime 0 requested while preference is not medium (RFC 4191 2.2)
    #[error("router lifetime 0 requires medium router preference")]
    InvalidTiming,

    #[error("not ready: {0}")]
    NotReady(String),
}

pub type Result<T> = std::result::Result<T, Error>;
