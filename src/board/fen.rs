use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece, Position, piece_index};
use crate::errors::EngineError;
use crate::square::Square;
use crate::utils::pop_lsb;

// O(1) FEN glyph <-> (color, piece) maps.
const CHAR_TO_PC: [Option<(Color, Piece)>; 128] = {
    let mut table: [Option<(Color, Piece)>; 128] = [None; 128];

    table['P' as usize] = Some((Color::White, Piece::Pawn));
    table['N' as usize] = Some((Color::White, Piece::Knight));
    table['B' as usize] = Some((Color::White, Piece::Bishop));
    table['R' as usize] = Some((Color::White, Piece::Rook));
    table['Q' as usize] = Some((Color::White, Piece::Queen));
    table['K' as usize] = Some((Color::White, Piece::King));

    table['p' as usize] = Some((Color::Black, Piece::Pawn));
    table['n' as usize] = Some((Color::Black, Piece::Knight));
    table['b' as usize] = Some((Color::Black, Piece::Bishop));
    table['r' as usize] = Some((Color::Black, Piece::Rook));
    table['q' as usize] = Some((Color::Black, Piece::Queen));
    table['k' as usize] = Some((Color::Black, Piece::King));

    table
};

const PC_TO_CHAR: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidFen(msg.into())
}

impl Position {
    /// Parses the six space-separated FEN fields into a fresh position.
    /// The Zobrist hash is recomputed from scratch.
    pub fn from_fen(fen: &str) -> Result<Position, EngineError> {
        let mut pos = Position::empty();
        pos.set_fen(fen)?;
        Ok(pos)
    }

    pub fn set_fen(&mut self, fen: &str) -> Result<(), EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(invalid(format!(
                "expected 6 fields, found {}",
                fields.len()
            )));
        }

        // 1. Piece placement, rank 8 first.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }
        let mut bitboards = [0u64; 12];
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: u32 = 0;
            for ch in rank_str.chars() {
                if let Some(run) = ch.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(invalid(format!("bad empty-square run {:?}", ch)));
                    }
                    col += run;
                } else {
                    let entry = if ch.is_ascii() {
                        CHAR_TO_PC[ch as usize]
                    } else {
                        None
                    };
                    let (color, piece) =
                        entry.ok_or_else(|| invalid(format!("unknown piece {:?}", ch)))?;
                    if col > 7 {
                        return Err(invalid(format!("rank {} overflows", 8 - row)));
                    }
                    bitboards[piece_index(color, piece)] |= 1u64 << (row as u32 * 8 + col);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(invalid(format!(
                    "rank {} has {} squares",
                    8 - row,
                    col
                )));
            }
        }

        // 2. Side to move.
        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad side field {:?}", other))),
        };

        // 3. Castling rights: "-" or a subset of "KQkq".
        let mut rights = 0u8;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(invalid(format!("bad castling flag {:?}", other))),
                };
            }
        }

        // 4. En-passant target: "-" or a square on rank 3 / rank 6.
        let ep = if fields[3] == "-" {
            None
        } else {
            let sq: Square = fields[3]
                .parse()
                .map_err(|_| invalid(format!("bad en-passant target {:?}", fields[3])))?;
            if sq.rank() != 3 && sq.rank() != 6 {
                return Err(invalid(format!("en-passant target {} off rank 3/6", sq)));
            }
            Some(sq)
        };

        // 5/6. Clocks.
        let halfmove: u16 = fields[4]
            .parse()
            .map_err(|_| invalid(format!("bad halfmove clock {:?}", fields[4])))?;
        let fullmove: u32 = fields[5]
            .parse()
            .map_err(|_| invalid(format!("bad fullmove number {:?}", fields[5])))?;

        self.bitboards = bitboards;
        self.metadata.set_castling(rights);
        self.metadata.set_ep_square(ep);
        self.metadata.set_halfmove(halfmove);
        self.metadata.set_side_to_move(side);
        self.fullmove = fullmove.max(1);
        self.rebuild_occupancy();
        self.refresh_zobrist();
        Ok(())
    }

    /// Emits the position as a FEN string, castling letters in KQkq order.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        // Per-square piece lookup via a scratch table, one pass over the
        // twelve boards instead of 64 board scans.
        let mut grid = [None::<usize>; 64];
        for (pc, board) in self.bitboards.iter().enumerate() {
            let mut bb = *board;
            while bb != 0 {
                grid[pop_lsb(&mut bb) as usize] = Some(pc);
            }
        }

        for row in 0..8 {
            let mut empty_run = 0;
            for col in 0..8 {
                match grid[row * 8 + col] {
                    Some(pc) => {
                        if empty_run > 0 {
                            fen.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        fen.push(PC_TO_CHAR[pc]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push((b'0' + empty_run) as char);
            }
            if row != 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.metadata.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights = self.metadata.castling();
        if rights == 0 {
            fen.push('-');
        } else {
            if rights & CASTLE_WK != 0 {
                fen.push('K');
            }
            if rights & CASTLE_WQ != 0 {
                fen.push('Q');
            }
            if rights & CASTLE_BK != 0 {
                fen.push('k');
            }
            if rights & CASTLE_BQ != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.metadata.ep_square() {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.metadata.halfmove(),
            self.fullmove
        ));
        fen
    }
}
