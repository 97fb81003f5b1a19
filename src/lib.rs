//! Replay chess games in PGN notation.
//!
//! A three-stage pipeline turns raw characters into the final position
//! of a game: a [`Scanner`] lexes bytes into [`Token`]s, a [`Parser`]
//! drives the PGN grammar and emits [`San`] half-move descriptors, and a
//! [`Board`] resolves each descriptor against the position and applies
//! it. Data flows one way only; the board never informs the earlier
//! stages.
//!
//! The game is replayed, not validated: movement rules, pin detection
//! and en passant are used solely to disambiguate the notation of a
//! presumed-valid game. There is no check or draw detection and no move
//! generation. Header tag pairs are parsed syntactically and discarded,
//! and parenthesized variations are skipped wholesale.
//!
//! # Examples
//!
//! Replay a short game and inspect the final position:
//!
//! ```
//! use std::io::Cursor;
//! use pgn_replay::{replay, Color, Role, Square};
//!
//! let board = replay(Cursor::new("1. e4 e5 2. Nf3 *"))?;
//! assert_eq!(board.piece_at(Square::new(5, 5)), Some(Role::Knight.of(Color::White)));
//! assert_eq!(board.piece_at(Square::new(4, 4)), Some(Role::Pawn.of(Color::White)));
//! # Ok::<_, pgn_replay::ReplayError>(())
//! ```
//!
//! The rendering of a [`Board`] prints one row per line, rank 8 first,
//! with `|`-separated cells like `wK` and `bP`:
//!
//! ```
//! use std::io::Cursor;
//! use pgn_replay::replay;
//!
//! let board = replay(Cursor::new("1. d4 *"))?;
//! assert!(board.to_string().starts_with("bR|bN|bB|bQ|bK|bB|bN|bR\n"));
//! # Ok::<_, pgn_replay::ReplayError>(())
//! ```

pub mod board;
mod buffer;
pub mod color;
pub mod parser;
pub mod role;
pub mod san;
pub mod scanner;
pub mod square;
pub mod token;

pub use crate::board::{Board, Cell, PlayError};
pub use crate::color::Color;
pub use crate::parser::{ParseError, Parser};
pub use crate::role::{Piece, Role};
pub use crate::san::{InvalidSan, Outcome, San};
pub use crate::scanner::{ScanError, Scanner};
pub use crate::square::{PartialSquare, Square};
pub use crate::token::Token;

use std::fmt;
use std::io::Read;

/// Replays the mainline of one PGN game from a byte stream.
///
/// Consumes the stream until it is exhausted or a termination marker
/// (`1-0`, `0-1`, `1/2-1/2` or `*`) is reached, and returns the board
/// position after the last applied half-move.
///
/// # Errors
///
/// Any lexical, grammar, interpretation or board error is fatal and
/// surfaces here; there is no local recovery.
pub fn replay<R: Read>(input: R) -> Result<Board, ReplayError> {
    let mut board = Board::default();
    let mut parser = Parser::new();
    for token in Scanner::new(input) {
        if let Some(san) = parser.feed(&token?)? {
            if let San::End(_) = san {
                break;
            }
            board.play(&san)?;
        }
    }
    Ok(board)
}

/// Any error from the replay pipeline.
#[derive(Debug)]
pub enum ReplayError {
    Scan(ScanError),
    Parse(ParseError),
    Play(PlayError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Scan(err) => err.fmt(f),
            ReplayError::Parse(err) => err.fmt(f),
            ReplayError::Play(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Scan(err) => Some(err),
            ReplayError::Parse(err) => Some(err),
            ReplayError::Play(err) => Some(err),
        }
    }
}

impl From<ScanError> for ReplayError {
    fn from(err: ScanError) -> ReplayError {
        ReplayError::Scan(err)
    }
}

impl From<ParseError> for ReplayError {
    fn from(err: ParseError) -> ReplayError {
        ReplayError::Parse(err)
    }
}

impl From<PlayError> for ReplayError {
    fn from(err: PlayError) -> ReplayError {
        ReplayError::Play(err)
    }
}
