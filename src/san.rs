//! Half-move descriptors and the movetext interpreter.
//!
//! [`San::parse`] turns one movetext symbol into a descriptor without
//! consulting the board: source squares stay as optional hints and
//! legality is left entirely to the board engine.

use std::fmt;

use crate::color::Color;
use crate::role::Role;
use crate::square::{col_from_file, row_from_rank, PartialSquare};

/// A game result marker found in movetext.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
    /// `*`: the game was terminated without a recorded result.
    Unknown,
}

/// A half-move descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum San {
    /// An ordinary move of one piece.
    Normal {
        role: Role,
        color: Color,
        capture: bool,
        check: bool,
        checkmate: bool,
        from: PartialSquare,
        to: PartialSquare,
        promotion: Option<Role>,
    },
    /// `O-O`.
    CastleShort { color: Color },
    /// `O-O-O`.
    CastleLong { color: Color },
    /// A termination marker: `1-0`, `0-1`, `1/2-1/2` or `*`.
    End(Outcome),
    /// Recognized but semantically empty text, such as the lone `e` or
    /// `p` left over from an `e.p.` annotation.
    Ignore,
}

impl San {
    /// Interprets one movetext symbol for the given side to move.
    ///
    /// The text is scanned right to left: suffix flags first (`#`, `+`,
    /// `:`), then an optional promotion piece with its `=`, `/` or
    /// bracket separator, the destination, an `x` or `:` capture marker,
    /// the source hints and finally the piece letter. A move with no
    /// piece letter is a pawn move.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_replay::{Color, PartialSquare, Role, San};
    ///
    /// let san = San::parse("Nbd2", Color::White)?;
    /// assert_eq!(san, San::Normal {
    ///     role: Role::Knight,
    ///     color: Color::White,
    ///     capture: false,
    ///     check: false,
    ///     checkmate: false,
    ///     from: PartialSquare { row: None, col: Some(1) },
    ///     to: PartialSquare { row: Some(6), col: Some(3) },
    ///     promotion: None,
    /// });
    /// # Ok::<_, pgn_replay::InvalidSan>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Errors if the text is not a half-move: an unknown piece letter,
    /// leftover characters after a full parse, or no destination at all.
    pub fn parse(san: &str, color: Color) -> Result<San, InvalidSan> {
        match san {
            // Remnants of an `e.p.` annotation; en passant is derived
            // on the board instead.
            "e" | "p" => return Ok(San::Ignore),
            "O-O" => return Ok(San::CastleShort { color }),
            "O-O-O" => return Ok(San::CastleLong { color }),
            "1-0" => {
                return Ok(San::End(Outcome::Decisive {
                    winner: Color::White,
                }))
            }
            "0-1" => {
                return Ok(San::End(Outcome::Decisive {
                    winner: Color::Black,
                }))
            }
            "1/2-1/2" => return Ok(San::End(Outcome::Draw)),
            _ => {}
        }

        let bytes = san.as_bytes();
        let mut i = bytes.len();
        let mut capture = false;
        let mut check = false;
        let mut checkmate = false;

        // Up to two suffix flags.
        for _ in 0..2 {
            match last(bytes, i)? {
                b'#' => checkmate = true,
                b'+' => check = true,
                b':' => capture = true,
                _ => break,
            }
            i -= 1;
        }

        // The closing half of a `b8(Q)`-style promotion.
        if last(bytes, i)? == b')' {
            i -= 1;
        }

        let mut promotion = None;
        if let Some(role) = Role::from_char(char::from(last(bytes, i)?)) {
            promotion = Some(role);
            i -= 1;
            if matches!(last(bytes, i)?, b'=' | b'/' | b'(') {
                i -= 1;
            }
        }

        // Destination; the rank digit comes first when reading backwards.
        let mut to = PartialSquare::default();
        if i > 0 {
            if let Some(row) = row_from_rank(char::from(bytes[i - 1])) {
                to.row = Some(row);
                i -= 1;
            }
        }
        if i > 0 {
            if let Some(col) = col_from_file(char::from(bytes[i - 1])) {
                to.col = Some(col);
                i -= 1;
            }
        }
        if to.is_open() {
            return Err(InvalidSan { _priv: () });
        }

        if i == 0 {
            // Nothing before the destination: an unmarked pawn move.
            return Ok(San::Normal {
                role: Role::Pawn,
                color,
                capture,
                check,
                checkmate,
                from: PartialSquare::default(),
                to,
                promotion,
            });
        }

        if matches!(bytes[i - 1], b'x' | b':') {
            capture = true;
            i -= 1;
        }

        let mut from = PartialSquare::default();
        if i > 0 {
            if let Some(row) = row_from_rank(char::from(bytes[i - 1])) {
                from.row = Some(row);
                i -= 1;
            }
        }
        if i > 0 {
            if let Some(col) = col_from_file(char::from(bytes[i - 1])) {
                from.col = Some(col);
                i -= 1;
            }
        }

        let role = if i > 0 {
            let role = Role::from_char(char::from(bytes[i - 1]))
                .ok_or(InvalidSan { _priv: () })?;
            i -= 1;
            role
        } else {
            Role::Pawn
        };

        if i > 0 {
            return Err(InvalidSan { _priv: () });
        }

        Ok(San::Normal {
            role,
            color,
            capture,
            check,
            checkmate,
            from,
            to,
            promotion,
        })
    }
}

fn last(bytes: &[u8], i: usize) -> Result<u8, InvalidSan> {
    if i == 0 {
        Err(InvalidSan { _priv: () })
    } else {
        Ok(bytes[i - 1])
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            San::Normal {
                role,
                capture,
                check,
                checkmate,
                from,
                to,
                promotion,
                ..
            } => {
                if role != Role::Pawn {
                    write!(f, "{}", role.upper_char())?;
                }
                if let Some(col) = from.col {
                    write!(f, "{}", char::from(b'a' + col as u8))?;
                }
                if let Some(row) = from.row {
                    write!(f, "{}", char::from(b'8' - row as u8))?;
                }
                if capture {
                    f.write_str("x")?;
                }
                if let Some(col) = to.col {
                    write!(f, "{}", char::from(b'a' + col as u8))?;
                }
                if let Some(row) = to.row {
                    write!(f, "{}", char::from(b'8' - row as u8))?;
                }
                if let Some(role) = promotion {
                    write!(f, "={}", role.upper_char())?;
                }
                if checkmate {
                    f.write_str("#")
                } else if check {
                    f.write_str("+")
                } else {
                    Ok(())
                }
            }
            San::CastleShort { .. } => f.write_str("O-O"),
            San::CastleLong { .. } => f.write_str("O-O-O"),
            San::End(Outcome::Decisive {
                winner: Color::White,
            }) => f.write_str("1-0"),
            San::End(Outcome::Decisive {
                winner: Color::Black,
            }) => f.write_str("0-1"),
            San::End(Outcome::Draw) => f.write_str("1/2-1/2"),
            San::End(Outcome::Unknown) => f.write_str("*"),
            San::Ignore => Ok(()),
        }
    }
}

/// Error when interpreting malformed half-move text.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct InvalidSan {
    _priv: (),
}

impl fmt::Debug for InvalidSan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidSan").finish()
    }
}

impl fmt::Display for InvalidSan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid san")
    }
}

impl std::error::Error for InvalidSan {}
