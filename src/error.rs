use std::{io, str::Utf8Error, string::FromUtf8Error};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the host rather than of the evaluated program. Runtime errors
/// of the language itself are `MObject::Err` values and never end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 in source: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("invalid UTF-8 in source: {0}")]
    Utf8Slice(#[from] Utf8Error),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("macro expansion failed: {0}")]
    Macro(String),

    #[error("bad configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn new(msg: String) -> Self {
        Error::Message(msg)
    }
}
