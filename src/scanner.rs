//! The streaming lexer.

use std::fmt;
use std::io::{self, Read};

use crate::buffer::Buffer;
use crate::token::{Accept, Pending, Token};

/// A lazy tokenizer over PGN text.
///
/// Tokens are produced on demand through the [`Iterator`] impl. Every
/// input byte is examined exactly once: a byte that terminates a token
/// without belonging to it stays put and starts the next one.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use pgn_replay::{Scanner, Token};
///
/// let mut scanner = Scanner::new(Cursor::new("1. e4"));
/// assert_eq!(scanner.next().unwrap()?, Token::Integer("1".to_owned()));
/// assert_eq!(scanner.next().unwrap()?, Token::Period);
/// assert_eq!(scanner.next().unwrap()?, Token::Symbol("e4".to_owned()));
/// assert!(scanner.next().is_none());
/// # Ok::<_, pgn_replay::ScanError>(())
/// ```
#[derive(Debug)]
pub struct Scanner<R> {
    inner: R,
    buffer: Buffer,
}

impl<R: Read> Scanner<R> {
    pub fn new(inner: R) -> Scanner<R> {
        Scanner {
            inner,
            buffer: Buffer::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn scan_token(&mut self) -> Result<Option<Token>, ScanError> {
        let first = loop {
            match self.buffer.peek(&mut self.inner)? {
                None => return Ok(None),
                Some(byte) if is_separator(byte) => self.buffer.bump(),
                Some(byte) => break byte,
            }
        };

        let mut pending =
            Pending::dispatch(first).ok_or(ScanError::UnexpectedByte(first))?;

        loop {
            let Some(byte) = self.buffer.peek(&mut self.inner)? else {
                return if pending.unterminated_at_eof() {
                    Err(ScanError::UnterminatedToken)
                } else {
                    Ok(Some(pending.finish()))
                };
            };
            match pending.accept(byte) {
                Accept::Consumed => self.buffer.bump(),
                Accept::TerminatedConsumed => {
                    self.buffer.bump();
                    return Ok(Some(pending.finish()));
                }
                Accept::TerminatedNonconsumed => return Ok(Some(pending.finish())),
                Accept::Invalid => return Err(ScanError::UnexpectedByte(byte)),
            }
        }
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan_token().transpose()
    }
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Error while tokenizing PGN text.
#[derive(Debug)]
pub enum ScanError {
    /// Reading from the underlying stream failed.
    Io(io::Error),
    /// A byte that no token class accepts at this point.
    UnexpectedByte(u8),
    /// The input ended inside a string or brace comment.
    UnterminatedToken,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io(err) => write!(f, "read error: {err}"),
            ScanError::UnexpectedByte(byte) => {
                write!(f, "unexpected byte {:?} in game text", char::from(*byte))
            }
            ScanError::UnterminatedToken => {
                f.write_str("unterminated string or comment at end of input")
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> ScanError {
        ScanError::Io(err)
    }
}
