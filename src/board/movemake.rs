use super::{
    CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece, Position, piece_index,
};
use crate::bitboard::BitboardExt;
use crate::hash::zobrist::zobrist_keys;
use crate::moves::types::{
    FLAG_CASTLE_KINGSIDE, FLAG_CASTLE_QUEENSIDE, FLAG_EN_PASSANT, Move, NullUndo, Undo,
};
use crate::square::Square;

/// Rook relocation for a castle, keyed by the king's destination square.
#[inline(always)]
fn rook_castle_squares(king_to: u8) -> (u8, u8) {
    match king_to {
        62 => (63, 61), // white O-O:   h1 -> f1
        58 => (56, 59), // white O-O-O: a1 -> d1
        6 => (7, 5),    // black O-O:   h8 -> f8
        2 => (0, 3),    // black O-O-O: a8 -> d8
        _ => unreachable!("castle flag with king destination {}", king_to),
    }
}

/// Right lost when a rook leaves, or is captured on, its home square.
#[inline(always)]
fn rook_home_right(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 56) => CASTLE_WQ, // a1
        (Color::White, 63) => CASTLE_WK, // h1
        (Color::Black, 0) => CASTLE_BQ,  // a8
        (Color::Black, 7) => CASTLE_BK,  // h8
        _ => 0,
    }
}

impl Position {
    #[inline(always)]
    fn place_piece(&mut self, color: Color, piece: Piece, sq: u8) {
        let idx = piece_index(color, piece);
        self.bitboards[idx].set_bit(sq);
        self.zobrist ^= zobrist_keys().piece[idx][sq as usize];
    }

    #[inline(always)]
    fn remove_piece(&mut self, color: Color, piece: Piece, sq: u8) {
        let idx = piece_index(color, piece);
        debug_assert!(self.bitboards[idx].test_bit(sq));
        self.bitboards[idx].clear_bit(sq);
        self.zobrist ^= zobrist_keys().piece[idx][sq as usize];
    }

    /// Applies `mv` in place and returns the undo record. The move must be
    /// legal: the generator filters, and `make` trusts its caller.
    pub fn make(&mut self, mv: Move) -> Undo {
        let keys = zobrist_keys();
        let prev_meta = self.metadata;
        let side = prev_meta.side_to_move();
        let from = mv.from();
        let to = mv.to();
        let flag = mv.flag();

        let piece = self
            .piece_of(side, from)
            .expect("make: no piece on from-square");

        // What sits on the capture square. For en passant the captured pawn
        // is beside the from-square, not on the destination.
        let (captured, capture_sq) = if flag == FLAG_EN_PASSANT {
            let cap = Square::from_coords(from.row(), to.col());
            (Some((side.opposite(), Piece::Pawn)), cap)
        } else {
            match self.piece_at(to) {
                Some((c, p)) => (Some((c, p)), to),
                None => (None, to),
            }
        };

        let undo = Undo {
            metadata: prev_meta,
            zobrist: self.zobrist,
            captured,
        };

        if let Some((cap_color, cap_piece)) = captured {
            self.remove_piece(cap_color, cap_piece, capture_sq.index());
        }

        // Execute the move per flag.
        match flag {
            FLAG_CASTLE_KINGSIDE | FLAG_CASTLE_QUEENSIDE => {
                self.remove_piece(side, Piece::King, from.index());
                self.place_piece(side, Piece::King, to.index());
                let (rook_from, rook_to) = rook_castle_squares(to.index());
                self.remove_piece(side, Piece::Rook, rook_from);
                self.place_piece(side, Piece::Rook, rook_to);
            }
            _ => {
                self.remove_piece(side, piece, from.index());
                match mv.promotion() {
                    Some(promo) => {
                        debug_assert_eq!(piece, Piece::Pawn);
                        self.place_piece(side, promo, to.index());
                    }
                    None => self.place_piece(side, piece, to.index()),
                }
            }
        }

        // Castling rights only ever decay: king moves clear both of the
        // mover's rights, rook moves and rook captures clear one.
        let old_rights = prev_meta.castling();
        let mut lost: u8 = 0;
        if piece == Piece::King {
            lost |= match side {
                Color::White => CASTLE_WK | CASTLE_WQ,
                Color::Black => CASTLE_BK | CASTLE_BQ,
            };
        }
        if piece == Piece::Rook {
            lost |= rook_home_right(side, from.index());
        }
        if let Some((cap_color, Piece::Rook)) = captured {
            lost |= rook_home_right(cap_color, capture_sq.index());
        }
        let new_rights = old_rights & !lost;
        if new_rights != old_rights {
            self.zobrist ^= keys.castling[old_rights as usize] ^ keys.castling[new_rights as usize];
        }

        // En-passant square: set iff this is a pawn double push, else clear.
        if let Some(old_ep) = prev_meta.ep_square() {
            self.zobrist ^= keys.ep_file[old_ep.col() as usize];
        }
        let new_ep = if piece == Piece::Pawn
            && (from.index() as i16 - to.index() as i16).abs() == 16
        {
            Some(Square::from_index((from.index() + to.index()) / 2))
        } else {
            None
        };
        if let Some(ep) = new_ep {
            self.zobrist ^= keys.ep_file[ep.col() as usize];
        }

        let halfmove = if captured.is_some() || piece == Piece::Pawn {
            0
        } else {
            prev_meta.halfmove() + 1
        };

        self.metadata.set_castling(new_rights);
        self.metadata.set_ep_square(new_ep);
        self.metadata.set_halfmove(halfmove);
        self.metadata.flip_side();
        self.zobrist ^= keys.side_to_move;

        self.rebuild_occupancy();
        if side == Color::Black {
            self.fullmove += 1;
        }

        undo
    }

    /// Reverses `make`. Metadata and hash are restored wholesale from the
    /// undo record; piece placement is undone move-by-move.
    pub fn unmake(&mut self, mv: Move, undo: Undo) {
        let mover = undo.metadata.side_to_move();
        let from = mv.from();
        let to = mv.to();
        let base = mover as usize * 6;

        match mv.flag() {
            FLAG_CASTLE_KINGSIDE | FLAG_CASTLE_QUEENSIDE => {
                let king = base + Piece::King as usize;
                self.bitboards[king] &= !to.bb();
                self.bitboards[king] |= from.bb();
                let (rook_from, rook_to) = rook_castle_squares(to.index());
                let rook = base + Piece::Rook as usize;
                self.bitboards[rook] &= !(1u64 << rook_to);
                self.bitboards[rook] |= 1u64 << rook_from;
            }
            FLAG_EN_PASSANT => {
                let pawn = base + Piece::Pawn as usize;
                self.bitboards[pawn] &= !to.bb();
                self.bitboards[pawn] |= from.bb();
                let cap = Square::from_coords(from.row(), to.col());
                let (cap_color, cap_piece) = undo.captured.expect("en passant undo without pawn");
                self.bitboards[piece_index(cap_color, cap_piece)] |= cap.bb();
            }
            _ => {
                match mv.promotion() {
                    Some(promo) => {
                        self.bitboards[base + promo as usize] &= !to.bb();
                        self.bitboards[base + Piece::Pawn as usize] |= from.bb();
                    }
                    None => {
                        let moved = self
                            .piece_of(mover, to)
                            .expect("unmake: no piece on to-square");
                        self.bitboards[base + moved as usize] &= !to.bb();
                        self.bitboards[base + moved as usize] |= from.bb();
                    }
                }
                if let Some((cap_color, cap_piece)) = undo.captured {
                    self.bitboards[piece_index(cap_color, cap_piece)] |= to.bb();
                }
            }
        }

        self.metadata = undo.metadata;
        self.zobrist = undo.zobrist;
        self.rebuild_occupancy();
        if mover == Color::Black {
            self.fullmove -= 1;
        }
    }

    /// Passes the turn: flip side, clear en passant. Used only by null-move
    /// pruning, never while the side to move is in check.
    pub fn make_null(&mut self) -> NullUndo {
        let keys = zobrist_keys();
        let undo = NullUndo {
            metadata: self.metadata,
            zobrist: self.zobrist,
        };

        if let Some(ep) = self.metadata.ep_square() {
            self.zobrist ^= keys.ep_file[ep.col() as usize];
        }
        self.metadata.set_ep_square(None);
        self.metadata.flip_side();
        self.zobrist ^= keys.side_to_move;

        undo
    }

    pub fn unmake_null(&mut self, undo: NullUndo) {
        self.metadata = undo.metadata;
        self.zobrist = undo.zobrist;
    }
}
