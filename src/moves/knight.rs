use once_cell::sync::Lazy;

/// Knight attack masks, one per source square, computed by offsetting the
/// source by the eight knight deltas and clipping to the board.
pub static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let deltas: [(i8, i8); 8] = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let row = (sq / 8) as i8;
        let col = (sq % 8) as i8;
        let mut mask = 0u64;
        for (dr, dc) in deltas {
            let r = row + dr;
            let c = col + dc;
            if (0..8).contains(&r) && (0..8).contains(&c) {
                mask |= 1u64 << (r as usize * 8 + c as usize);
            }
        }
        *slot = mask;
    }
    attacks
});
