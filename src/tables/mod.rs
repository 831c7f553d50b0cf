pub mod psqt;

use once_cell::sync::Lazy;

use crate::hash::zobrist::zobrist_keys;
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::pawn::{BLACK_PAWN_ATTACKS, WHITE_PAWN_ATTACKS};

/// Forces every lazily built table (Zobrist keys, leaper attacks) so the
/// generation cost lands at engine construction instead of mid-search.
pub fn init_tables() {
    let _ = zobrist_keys();
    let _ = Lazy::force(&KNIGHT_ATTACKS);
    let _ = Lazy::force(&KING_ATTACKS);
    let _ = Lazy::force(&WHITE_PAWN_ATTACKS);
    let _ = Lazy::force(&BLACK_PAWN_ATTACKS);
}
