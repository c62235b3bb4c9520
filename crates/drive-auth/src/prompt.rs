//! Authorization code input
//!
//! The flow asks a [`CodeSource`] for the code instead of reading the
//! terminal directly, so tests can script the operator.

use std::io::BufRead;

use crate::error::{Error, Result};

/// Supplies the authorization code pasted by the operator.
///
/// Implementations may block indefinitely; there is no timeout.
pub trait CodeSource {
    fn read_code(&mut self) -> Result<String>;
}

/// Reads one line and takes its first whitespace-separated word.
pub struct LineCodeSource<R> {
    reader: R,
}

impl<R: BufRead> LineCodeSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineCodeSource<std::io::StdinLock<'static>> {
    /// Source backed by the process's standard input.
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> CodeSource for LineCodeSource<R> {
    fn read_code(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| Error::InputRead(e.to_string()))?;
        if read == 0 {
            return Err(Error::InputRead("input closed before a code was entered".into()));
        }

        line.split_whitespace()
            .next()
            .map(str::to_owned)
            .ok_or_else(|| Error::InputRead("no authorization code entered".into()))
    }
}
