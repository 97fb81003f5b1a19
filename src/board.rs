//! The board engine.
//!
//! Resolves half-move descriptors against the current position and
//! mutates the grid. Movement rules, pin detection and en passant exist
//! only to disambiguate the notation of a presumed-valid game; the
//! engine never checks that a move was actually legal to play.

use std::fmt;

use arrayvec::ArrayVec;

use crate::color::Color;
use crate::role::{Piece, Role};
use crate::san::San;
use crate::square::{PartialSquare, Square};

const N: i8 = 8;

/// The eight compass rays, starting straight up and rotating clockwise.
/// Opposites differ by four; odd indexes are the diagonals.
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// One board square: its occupant, if any, and the marker left by a
/// pawn that just advanced two squares (the en-passant window).
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Cell {
    pub piece: Option<Piece>,
    pub double_move: bool,
}

type Candidates = ArrayVec<Square, 64>;

/// An 8×8 grid of [`Cell`]s, mutated exclusively through [`Board::play`]
/// and the manual setup helpers.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Board {
    cells: [[Cell; N as usize]; N as usize],
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Board {
        const BACK_RANK: [Role; 8] = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];

        let mut board = Board::empty();
        for (col, role) in BACK_RANK.into_iter().enumerate() {
            let col = col as i8;
            board.put(Square::new(0, col), role.of(Color::Black));
            board.put(Square::new(1, col), Role::Pawn.of(Color::Black));
            board.put(Square::new(6, col), Role::Pawn.of(Color::White));
            board.put(Square::new(7, col), role.of(Color::White));
        }
        board
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Board {
        Board {
            cells: [[Cell::default(); N as usize]; N as usize],
        }
    }

    /// Puts a piece on a square, replacing whatever was there.
    pub fn put(&mut self, square: Square, piece: Piece) {
        *self.cell_mut(square) = Cell {
            piece: Some(piece),
            double_move: false,
        };
    }

    /// The cell at the given square.
    pub fn cell(&self, square: Square) -> &Cell {
        &self.cells[square.row as usize][square.col as usize]
    }

    /// The piece on the given square, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cell(square).piece
    }

    fn cell_mut(&mut self, square: Square) -> &mut Cell {
        &mut self.cells[square.row as usize][square.col as usize]
    }

    fn is_free(&self, square: Square) -> bool {
        self.cell(square).piece.is_none()
    }

    /// Applies one half-move descriptor.
    ///
    /// Exactly one (source, destination) pair may satisfy the
    /// descriptor; well-formed PGN guarantees that through its
    /// disambiguation hints. `End` and `Ignore` descriptors leave the
    /// board untouched.
    ///
    /// # Errors
    ///
    /// Errors if no pair or more than one pair resolves, or if a
    /// castling target square is occupied.
    pub fn play(&mut self, san: &San) -> Result<(), PlayError> {
        match *san {
            San::Normal {
                role,
                color,
                capture,
                from,
                to,
                promotion,
                ..
            } => self.play_normal(role, color, capture, from, to, promotion),
            San::CastleShort { color } => self.castle(color, 6, 7, 5),
            San::CastleLong { color } => self.castle(color, 2, 0, 3),
            San::End(_) | San::Ignore => Ok(()),
        }
    }

    fn play_normal(
        &mut self,
        role: Role,
        color: Color,
        capture: bool,
        from: PartialSquare,
        to: PartialSquare,
        promotion: Option<Role>,
    ) -> Result<(), PlayError> {
        let sources = self.source_candidates(role.of(color), from);
        let targets = self.target_candidates(to, capture);

        let mut resolved = None;
        for &src in &sources {
            for &dst in &targets {
                if self.is_locked(src, dst, capture, color) {
                    continue;
                }
                if !self.can_move(role, src, dst, capture, color) {
                    continue;
                }
                if resolved.replace((src, dst)).is_some() {
                    return Err(PlayError::AmbiguousMove);
                }
            }
        }
        let (src, dst) = resolved.ok_or(PlayError::IllegalMove)?;

        // A pawn capture landing on an empty square is en passant: the
        // bypassed pawn sits beside the source, on the destination file.
        if role == Role::Pawn && capture && self.is_free(dst) {
            *self.cell_mut(Square::new(src.row, dst.col)) = Cell::default();
        }

        let double_push = role == Role::Pawn && (src.row - dst.row).abs() == 2;
        *self.cell_mut(dst) = Cell {
            piece: Some(promotion.unwrap_or(role).of(color)),
            double_move: double_push,
        };
        *self.cell_mut(src) = Cell::default();
        self.expire_double_moves(double_push.then_some(dst));
        Ok(())
    }

    /// Moves the king to `king_to` and the rook from `rook_from` to
    /// `rook_to` on the caller's back rank. Both target squares must be
    /// empty; king and rook are assumed to stand on their home squares.
    fn castle(
        &mut self,
        color: Color,
        king_to: i8,
        rook_from: i8,
        rook_to: i8,
    ) -> Result<(), PlayError> {
        let row = color.fold_wb(7, 0);
        for col in [king_to, rook_to] {
            if !self.is_free(Square::new(row, col)) {
                return Err(PlayError::ObstructedCastling);
            }
        }
        self.relocate(Square::new(row, 4), Square::new(row, king_to));
        self.relocate(Square::new(row, rook_from), Square::new(row, rook_to));
        self.expire_double_moves(None);
        Ok(())
    }

    fn relocate(&mut self, from: Square, to: Square) {
        *self.cell_mut(to) = *self.cell(from);
        *self.cell_mut(from) = Cell::default();
    }

    /// En-passant rights last one half-move: every double-move marker
    /// except the one just planted expires.
    fn expire_double_moves(&mut self, keep: Option<Square>) {
        for square in squares() {
            if keep != Some(square) {
                self.cell_mut(square).double_move = false;
            }
        }
    }

    /// Source squares compatible with the descriptor's hints. A fully
    /// specified hint is taken at face value; open coordinates are
    /// scanned for cells holding the moving piece.
    fn source_candidates(&self, piece: Piece, hint: PartialSquare) -> Candidates {
        let mut candidates = Candidates::new();
        if let Some(square) = hint.square() {
            candidates.push(square);
        } else {
            for square in squares() {
                if hint.admits(square) && self.piece_at(square) == Some(piece) {
                    candidates.push(square);
                }
            }
        }
        candidates
    }

    /// Destination squares compatible with the descriptor. When one
    /// coordinate is open, the other dimension is scanned for squares
    /// that are empty or, on a capture, occupied.
    fn target_candidates(&self, hint: PartialSquare, capture: bool) -> Candidates {
        let mut candidates = Candidates::new();
        if let Some(square) = hint.square() {
            candidates.push(square);
        } else if !hint.is_open() {
            for square in squares() {
                if hint.admits(square) && (self.is_free(square) || capture) {
                    candidates.push(square);
                }
            }
        }
        candidates
    }

    fn can_move(&self, role: Role, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        match role {
            Role::Pawn => self.can_move_pawn(src, dst, capture, color),
            Role::Knight => self.can_move_knight(src, dst, capture, color),
            Role::Bishop => self.can_move_bishop(src, dst, capture, color),
            Role::Rook => self.can_move_rook(src, dst, capture, color),
            Role::Queen => {
                self.can_move_rook(src, dst, capture, color)
                    || self.can_move_bishop(src, dst, capture, color)
            }
            Role::King => self.can_move_king(src, dst, capture, color),
        }
    }

    fn can_move_pawn(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        let forward = match color {
            Color::White => src.row - dst.row,
            Color::Black => dst.row - src.row,
        };
        let sideways = (dst.col - src.col).abs();

        if capture {
            if forward != 1 || sideways != 1 {
                return false;
            }
            if self.is_free(dst) {
                // Capturing onto an empty square is only possible en
                // passant: the bypassed pawn stands beside the source,
                // still inside its double-move window.
                let bypassed = self.cell(Square::new(src.row, dst.col));
                return bypassed.double_move
                    && bypassed.piece == Some(Role::Pawn.of(color.other()));
            }
            return self.valid_target(dst, capture, color);
        }

        if sideways != 0 {
            return false;
        }
        match forward {
            1 => self.valid_target(dst, capture, color),
            2 => {
                src.row == color.fold_wb(6, 1)
                    && self.is_free(Square::new((src.row + dst.row) / 2, src.col))
                    && self.valid_target(dst, capture, color)
            }
            _ => false,
        }
    }

    fn can_move_rook(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        // Same rank or same file, but not the null move.
        (src.row == dst.row) != (src.col == dst.col)
            && self.ray_is_clear(src, dst)
            && self.valid_target(dst, capture, color)
    }

    fn can_move_bishop(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        let dr = (dst.row - src.row).abs();
        let dc = (dst.col - src.col).abs();
        dr == dc
            && dr >= 1
            && self.ray_is_clear(src, dst)
            && self.valid_target(dst, capture, color)
    }

    fn can_move_knight(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        let dr = (dst.row - src.row).abs();
        let dc = (dst.col - src.col).abs();
        matches!((dr, dc), (1, 2) | (2, 1)) && self.valid_target(dst, capture, color)
    }

    fn can_move_king(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        let dr = (dst.row - src.row).abs();
        let dc = (dst.col - src.col).abs();
        (dr | dc) != 0 && dr <= 1 && dc <= 1 && self.valid_target(dst, capture, color)
    }

    /// Every square strictly between `src` and `dst` is empty. The two
    /// squares must share a rank, file or diagonal.
    fn ray_is_clear(&self, src: Square, dst: Square) -> bool {
        let dr = (dst.row - src.row).signum();
        let dc = (dst.col - src.col).signum();
        let mut square = src;
        loop {
            square = Square::new(square.row + dr, square.col + dc);
            if square == dst {
                return true;
            }
            if !self.is_free(square) {
                return false;
            }
        }
    }

    /// A landing square is valid when it is empty (quiet move) or holds
    /// an enemy piece other than the king (capture).
    fn valid_target(&self, dst: Square, capture: bool, color: Color) -> bool {
        match self.piece_at(dst) {
            Some(piece) => capture && piece.color != color && piece.role != Role::King,
            None => !capture,
        }
    }

    /// Pin detection. Looks for the friendly king as the first piece
    /// along one of the eight rays from `src`; if found, walks the
    /// opposite ray. The move is locked when that walk runs into an
    /// enemy queen, an enemy rook on a straight ray, or an enemy bishop
    /// on a diagonal one. A walk that reaches `dst` first is the moving
    /// piece staying on the pin line (not locked) or capturing the
    /// attacker itself, in which case one more step checks for a second
    /// slider hiding behind it.
    fn is_locked(&self, src: Square, dst: Square, capture: bool, color: Color) -> bool {
        let king = Role::King.of(color);
        let Some(pin_direction) = (0..DIRECTIONS.len()).find(|&direction| {
            let (dr, dc) = DIRECTIONS[direction];
            self.first_piece_along(src, dr, dc)
                .is_some_and(|piece| piece == king)
        }) else {
            return false;
        };

        let (dr, dc) = DIRECTIONS[(pin_direction + 4) % DIRECTIONS.len()];
        let mut square = src;
        loop {
            square = match square.offset(dr, dc) {
                Some(next) => next,
                None => return false,
            };
            if square == dst {
                return if self.is_free(dst) || !capture {
                    // The moving piece stays on the pin ray.
                    false
                } else {
                    match square.offset(dr, dc) {
                        Some(behind) => self.attacks_along(pin_direction, behind, color),
                        None => false,
                    }
                };
            }
            if !self.is_free(square) {
                return self.attacks_along(pin_direction, square, color);
            }
        }
    }

    fn first_piece_along(&self, from: Square, dr: i8, dc: i8) -> Option<Piece> {
        let mut square = from;
        loop {
            square = square.offset(dr, dc)?;
            if let Some(piece) = self.piece_at(square) {
                return Some(piece);
            }
        }
    }

    /// Whether an enemy slider on `square` attacks back along ray
    /// `direction`: a queen always, a rook on straight rays, a bishop on
    /// diagonal ones.
    fn attacks_along(&self, direction: usize, square: Square, color: Color) -> bool {
        match self.piece_at(square) {
            Some(piece) if piece.color != color => match piece.role {
                Role::Queen => true,
                Role::Rook => direction % 2 == 0,
                Role::Bishop => direction % 2 == 1,
                _ => false,
            },
            _ => false,
        }
    }
}

fn squares() -> impl Iterator<Item = Square> {
    (0..N).flat_map(|row| (0..N).map(move |col| Square::new(row, col)))
}

impl fmt::Display for Board {
    /// Renders the grid one row per line, rank 8 first, cells separated
    /// by `|`: two spaces for an empty cell, otherwise the color tag and
    /// the piece letter, as in `wK` or `bP`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str("|")?;
                }
                match cell.piece {
                    Some(piece) => {
                        write!(f, "{}{}", piece.color.char(), piece.role.upper_char())?
                    }
                    None => f.write_str("  ")?,
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Error when a half-move cannot be resolved against the position.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PlayError {
    /// No (source, destination) pair satisfies the descriptor.
    IllegalMove,
    /// More than one pair satisfies the descriptor.
    AmbiguousMove,
    /// A castling target square is occupied.
    ObstructedCastling,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayError::IllegalMove => "no piece can make this move",
            PlayError::AmbiguousMove => "more than one piece can make this move",
            PlayError::ObstructedCastling => "castling squares are occupied",
        })
    }
}

impl std::error::Error for PlayError {}
