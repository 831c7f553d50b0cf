use crate::board::{Color, PIECES, Piece, Position};
use crate::tables::psqt::{PIECE_VALUES, psqt_value};
use crate::utils::pop_lsb;

/// Below this much total non-king material the king switches to its
/// endgame table.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 2500;

/// Vertical board flip, used to index the white tables for black pieces.
#[inline(always)]
pub fn mirror_vert(sq: u8) -> usize {
    (sq ^ 56) as usize
}

fn non_king_material(position: &Position) -> i32 {
    let mut total = 0;
    for color in [Color::White, Color::Black] {
        for piece in [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
        ] {
            let count = position.pieces(color, piece).count_ones() as i32;
            total += count * PIECE_VALUES[piece as usize] as i32;
        }
    }
    total
}

/// Static score in centipawns from the side-to-move's perspective:
/// material plus piece-square bonuses, white minus black, negated when
/// black is to move.
pub fn evaluate(position: &Position) -> i32 {
    let endgame = non_king_material(position) < ENDGAME_MATERIAL_THRESHOLD;
    let mut score = 0i32;

    for &piece in &PIECES {
        let value = PIECE_VALUES[piece as usize] as i32;

        let mut bb = position.pieces(Color::White, piece);
        while bb != 0 {
            let sq = pop_lsb(&mut bb);
            score += value + psqt_value(piece, sq as usize, endgame) as i32;
        }

        let mut bb = position.pieces(Color::Black, piece);
        while bb != 0 {
            let sq = pop_lsb(&mut bb);
            score -= value + psqt_value(piece, mirror_vert(sq), endgame) as i32;
        }
    }

    match position.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        let pos = Position::new();
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn score_is_side_to_move_relative() {
        // White up a rook: positive for white to move, negative for black.
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let w = evaluate(&white);
        let b = evaluate(&black);
        assert!(w > 400, "white should be winning, got {}", w);
        assert_eq!(w, -b);
    }

    #[test]
    fn endgame_switch_tracks_material() {
        // Kings and one rook: deep endgame.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(non_king_material(&pos) < ENDGAME_MATERIAL_THRESHOLD);
        assert!(non_king_material(&Position::new()) >= ENDGAME_MATERIAL_THRESHOLD);
    }
}
