use once_cell::sync::Lazy;

/// King attack masks, one per source square.
pub static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let deltas: [(i8, i8); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
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
