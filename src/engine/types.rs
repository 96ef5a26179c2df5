use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row of this side's back rank (White=7, Black=0).
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row direction this side's pawns advance in (White=-1, Black=+1).
    #[inline]
    pub const fn pawn_dir(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Number of piece types.
    pub const COUNT: usize = 6;

    /// Index for array lookups: Pawn=0 .. King=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a piece character; case encodes the color.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((color, piece))
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A colored piece. Where it stands is the board's business, not the
/// piece's; rule queries take the origin square explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// FEN-style symbol: uppercase white, lowercase black.
    #[inline]
    pub fn symbol(self) -> char {
        self.kind.to_char(self.color)
    }

    /// Parse a FEN-style symbol back into a piece.
    pub fn from_symbol(c: char) -> Option<Piece> {
        PieceType::from_char(c).map(|(color, kind)| Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A board square addressed as (row, col). Row 0 is rank 8 (Black's back
/// rank), row 7 is rank 1; col 0 is file a. Both fields stay below 8, so
/// off-board squares are unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "square out of range: ({row}, {col})");
        Square { row, col }
    }

    /// Checked construction for coordinates arriving from outside.
    pub fn try_new(row: u8, col: u8) -> Result<Self, ChessError> {
        if row < 8 && col < 8 {
            Ok(Square { row, col })
        } else {
            Err(ChessError::OutOfBounds { row, col })
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Step by a (row, col) delta, `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if col < 8 && rank < 8 {
            Some(Square { row: 7 - rank, col })
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col) as char;
        let rank = (b'8' - self.row) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// What a move does beyond relocating its piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
    Promotion(PieceType),
}

/// A fully described move: squares, the moving piece, the victim if any,
/// and the special-move tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            kind: MoveKind::Normal,
        }
    }

    pub fn capture(from: Square, to: Square, piece: Piece, victim: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: Some(victim),
            kind: MoveKind::Normal,
        }
    }

    pub fn with_kind(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        kind: MoveKind,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            kind,
        }
    }

    /// True when the move removes an opposing piece (en passant included).
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// The piece type a promotion resolves to, if this is one.
    #[inline]
    pub fn promotion(&self) -> Option<PieceType> {
        match self.kind {
            MoveKind::Promotion(pt) => Some(pt),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.to_char(Color::White).to_ascii_lowercase())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    #[inline]
    pub fn can_castle_kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_KINGSIDE),
            Color::Black => self.has(Self::BLACK_KINGSIDE),
        }
    }

    #[inline]
    pub fn can_castle_queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_QUEENSIDE),
            Color::Black => self.has(Self::BLACK_QUEENSIDE),
        }
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// GameStatus & Difficulty
// ---------------------------------------------------------------------------

/// Current status of a game. Closed set: stalemate is the only draw
/// this engine adjudicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI difficulty levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Harmless,
    Easy,
    Medium,
    Hard,
    Expert,
    Godlike,
}

impl Difficulty {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "harmless" => Some(Difficulty::Harmless),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            "godlike" => Some(Difficulty::Godlike),
            _ => None,
        }
    }

    /// Search depth for minimax.
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Harmless => 0, // random
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
            Difficulty::Expert => 6,
            Difficulty::Godlike => 8,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Harmless => write!(f, "harmless"),
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Expert => write!(f, "expert"),
            Difficulty::Godlike => write!(f, "godlike"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("coordinates out of bounds: ({row}, {col})")]
    OutOfBounds { row: u8, col: u8 },

    #[error("illegal move: {from} -> {to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: String,
    },

    #[error("it is not {player}'s turn")]
    WrongTurn { player: Color },

    #[error("no moves to undo")]
    NoHistory,

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("board invariant violated: {0}")]
    InvariantViolation(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.to_string(), "black");
    }

    #[test]
    fn color_index() {
        assert_eq!(Color::White.index(), 0);
        assert_eq!(Color::Black.index(), 1);
    }

    #[test]
    fn color_geometry() {
        assert_eq!(Color::White.back_row(), 7);
        assert_eq!(Color::Black.back_row(), 0);
        assert_eq!(Color::White.pawn_dir(), -1);
        assert_eq!(Color::Black.pawn_dir(), 1);
    }

    #[test]
    fn piece_type_char_round_trip() {
        for pt in PieceType::ALL {
            let wc = pt.to_char(Color::White);
            let bc = pt.to_char(Color::Black);
            assert!(wc.is_ascii_uppercase());
            assert!(bc.is_ascii_lowercase());
            assert_eq!(PieceType::from_char(wc), Some((Color::White, pt)));
            assert_eq!(PieceType::from_char(bc), Some((Color::Black, pt)));
        }
    }

    #[test]
    fn piece_type_from_char_invalid() {
        assert_eq!(PieceType::from_char('x'), None);
        assert_eq!(PieceType::from_char('1'), None);
    }

    #[test]
    fn piece_type_all_constant() {
        assert_eq!(PieceType::ALL.len(), PieceType::COUNT);
        for (i, &pt) in PieceType::ALL.iter().enumerate() {
            assert_eq!(pt.index(), i);
        }
    }

    #[test]
    fn piece_symbols() {
        let wn = Piece::new(Color::White, PieceType::Knight);
        let bq = Piece::new(Color::Black, PieceType::Queen);
        assert_eq!(wn.symbol(), 'N');
        assert_eq!(bq.symbol(), 'q');
        assert_eq!(Piece::from_symbol('N'), Some(wn));
        assert_eq!(Piece::from_symbol('q'), Some(bq));
        assert_eq!(Piece::from_symbol('.'), None);
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::new(7, 0)));
        assert_eq!(Square::from_algebraic("h1"), Some(Square::new(7, 7)));
        assert_eq!(Square::from_algebraic("a8"), Some(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::new(0, 7)));
        assert_eq!(Square::from_algebraic("e4"), Some(Square::new(4, 4)));
    }

    #[test]
    fn square_to_algebraic() {
        assert_eq!(Square::new(7, 0).to_algebraic(), "a1");
        assert_eq!(Square::new(7, 7).to_algebraic(), "h1");
        assert_eq!(Square::new(0, 0).to_algebraic(), "a8");
        assert_eq!(Square::new(0, 7).to_algebraic(), "h8");
        assert_eq!(Square::new(4, 4).to_algebraic(), "e4");
    }

    #[test]
    fn square_algebraic_round_trip() {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::new(row, col);
                let alg = sq.to_algebraic();
                assert_eq!(Square::from_algebraic(&alg), Some(sq));
            }
        }
    }

    #[test]
    fn square_from_algebraic_invalid() {
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("a"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("abc"), None);
    }

    #[test]
    fn square_try_new_bounds() {
        assert!(Square::try_new(0, 0).is_ok());
        assert!(Square::try_new(7, 7).is_ok());
        assert!(matches!(
            Square::try_new(8, 0),
            Err(ChessError::OutOfBounds { row: 8, col: 0 })
        ));
        assert!(matches!(
            Square::try_new(3, 200),
            Err(ChessError::OutOfBounds { row: 3, col: 200 })
        ));
    }

    #[test]
    fn square_offset_stays_on_board() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.offset(-1, 0), Square::from_algebraic("e5"));
        assert_eq!(e4.offset(1, 1), Square::from_algebraic("f3"));

        let a1 = Square::from_algebraic("a1").unwrap();
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        let h8 = Square::from_algebraic("h8").unwrap();
        assert_eq!(h8.offset(-1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
    }

    #[test]
    fn move_display() {
        let pawn = Piece::new(Color::White, PieceType::Pawn);
        let m = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
            pawn,
        );
        assert_eq!(m.to_string(), "e2e4");

        let promo = Move::with_kind(
            Square::from_algebraic("e7").unwrap(),
            Square::from_algebraic("e8").unwrap(),
            pawn,
            None,
            MoveKind::Promotion(PieceType::Queen),
        );
        assert_eq!(promo.to_string(), "e7e8=q");
        assert_eq!(promo.promotion(), Some(PieceType::Queen));
    }

    #[test]
    fn move_capture_flag() {
        let knight = Piece::new(Color::White, PieceType::Knight);
        let victim = Piece::new(Color::Black, PieceType::Rook);
        let quiet = Move::new(
            Square::from_algebraic("g1").unwrap(),
            Square::from_algebraic("f3").unwrap(),
            knight,
        );
        let take = Move::capture(
            Square::from_algebraic("f3").unwrap(),
            Square::from_algebraic("e5").unwrap(),
            knight,
            victim,
        );
        assert!(!quiet.is_capture());
        assert!(take.is_capture());
        assert_eq!(take.captured, Some(victim));
    }

    #[test]
    fn castling_rights_fen_round_trip() {
        let cases = ["-", "K", "Kq", "KQkq", "kq", "Q"];
        for s in cases {
            let cr = CastlingRights::from_fen(s).unwrap();
            assert_eq!(cr.to_fen(), s);
        }
    }

    #[test]
    fn castling_rights_flags() {
        let all = CastlingRights::ALL;
        assert!(all.can_castle_kingside(Color::White));
        assert!(all.can_castle_queenside(Color::White));
        assert!(all.can_castle_kingside(Color::Black));
        assert!(all.can_castle_queenside(Color::Black));

        let mut cr = CastlingRights::ALL;
        cr.remove(CastlingRights::WHITE_KINGSIDE);
        assert!(!cr.can_castle_kingside(Color::White));
        assert!(cr.can_castle_queenside(Color::White));
    }

    #[test]
    fn castling_rights_from_fen_invalid() {
        assert_eq!(CastlingRights::from_fen("X"), None);
        assert_eq!(CastlingRights::from_fen("KZ"), None);
    }

    #[test]
    fn game_status_strings() {
        assert_eq!(GameStatus::Active.as_str(), "active");
        assert_eq!(GameStatus::Check.as_str(), "check");
        assert_eq!(GameStatus::Checkmate.as_str(), "checkmate");
        assert_eq!(GameStatus::Stalemate.as_str(), "stalemate");
    }

    #[test]
    fn game_status_is_game_over() {
        assert!(!GameStatus::Active.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
        assert!(GameStatus::Checkmate.is_game_over());
        assert!(GameStatus::Stalemate.is_game_over());
    }

    #[test]
    fn difficulty_depth_mapping() {
        assert_eq!(Difficulty::Harmless.depth(), 0);
        assert_eq!(Difficulty::Easy.depth(), 1);
        assert_eq!(Difficulty::Medium.depth(), 3);
        assert_eq!(Difficulty::Hard.depth(), 5);
        assert_eq!(Difficulty::Expert.depth(), 6);
        assert_eq!(Difficulty::Godlike.depth(), 8);
    }

    #[test]
    fn difficulty_from_str() {
        assert_eq!(
            Difficulty::from_str_loose("medium"),
            Some(Difficulty::Medium)
        );
        assert_eq!(
            Difficulty::from_str_loose("GODLIKE"),
            Some(Difficulty::Godlike)
        );
        assert_eq!(Difficulty::from_str_loose("invalid"), None);
    }

    #[test]
    fn error_messages() {
        let e = ChessError::WrongTurn {
            player: Color::Black,
        };
        assert_eq!(e.to_string(), "it is not black's turn");
        assert_eq!(ChessError::NoHistory.to_string(), "no moves to undo");
        let oob = ChessError::OutOfBounds { row: 9, col: 2 };
        assert_eq!(oob.to_string(), "coordinates out of bounds: (9, 2)");
    }
}
