use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Seed for the key PRNG. Fixed so hashes are stable across runs and the
/// transposition table stays comparable between debug sessions.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

/// Per-feature random keys. XOR-composed into the position fingerprint.
pub struct ZobristKeys {
    /// `[piece][square]` with piece 0..5 white P,N,B,R,Q,K and 6..11 black.
    pub piece: [[u64; 64]; 12],
    /// Indexed by the whole 4-bit castling-rights mask.
    pub castling: [u64; 16],
    /// En-passant file, a..h.
    pub ep_file: [u64; 8],
    /// XOR-ed in when black is to move.
    pub side_to_move: u64,
}

/// Global keys, generated once on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(rng: &mut StdRng) -> u64 {
        // zero keys would alias "feature absent"
        let mut v = rng.next_u64();
        while v == 0 {
            v = rng.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[0u64; 64]; 12],
        castling: [0u64; 16],
        ep_file: [0u64; 8],
        side_to_move: 0,
    };

    for pc in 0..12 {
        for sq in 0..64 {
            keys.piece[pc][sq] = non_zero(&mut rng);
        }
    }
    for mask in 0..16 {
        keys.castling[mask] = non_zero(&mut rng);
    }
    for file in 0..8 {
        keys.ep_file[file] = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_and_nonzero() {
        let a = zobrist_keys();
        let b = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.piece[5][28], b.piece[5][28]);
        assert!(a.castling.iter().all(|&k| k != 0));
        assert!(a.ep_file.iter().all(|&k| k != 0));
    }
}
