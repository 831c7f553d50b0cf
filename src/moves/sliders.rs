//! On-the-fly sliding attacks by classical ray walking: from the source
//! square, step one square at a time in each direction, include every
//! square up to and including the first blocker.

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
fn walk_rays(sq: u8, occupancy: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let row = (sq / 8) as i8;
    let col = (sq % 8) as i8;
    let mut attacks = 0u64;

    for &(dr, dc) in dirs {
        let mut r = row + dr;
        let mut c = col + dc;
        while (0..8).contains(&r) && (0..8).contains(&c) {
            let bit = 1u64 << (r as usize * 8 + c as usize);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            c += dc;
        }
    }
    attacks
}

#[inline]
pub fn rook_attacks(sq: u8, occupancy: u64) -> u64 {
    walk_rays(sq, occupancy, &ROOK_DIRS)
}

#[inline]
pub fn bishop_attacks(sq: u8, occupancy: u64) -> u64 {
    walk_rays(sq, occupancy, &BISHOP_DIRS)
}

#[inline]
pub fn queen_attacks(sq: u8, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_on_empty_board_sees_fourteen_squares() {
        for sq in 0..64u8 {
            assert_eq!(rook_attacks(sq, 0).count_ones(), 14);
        }
    }

    #[test]
    fn bishop_in_corner_sees_one_diagonal() {
        // a8 = 0: diagonal b7..h1
        assert_eq!(bishop_attacks(0, 0).count_ones(), 7);
    }

    #[test]
    fn blockers_stop_rays_inclusively() {
        // rook on a8 (0), blocker on a5 (24): a7, a6, a5 on the file
        let occ = 1u64 << 24;
        let file_part = rook_attacks(0, occ) & 0x0101_0101_0101_0100;
        assert_eq!(file_part, (1 << 8) | (1 << 16) | (1 << 24));
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let occ = (1 << 20) | (1 << 44) | (1 << 3);
        for sq in [0u8, 27, 36, 63] {
            assert_eq!(
                queen_attacks(sq, occ),
                rook_attacks(sq, occ) | bishop_attacks(sq, occ)
            );
        }
    }
}
