use crate::errors::EngineError;
use crate::moves::types::Move;

/// Default table budget in MiB.
pub const DEFAULT_TT_MIB: usize = 64;

/// How a stored score bounds the true value of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    Exact = 0,
    /// Beta cutoff: the true score is at least this.
    Lower = 1,
    /// Fail low: the true score is at most this.
    Upper = 2,
}

// 16 bytes per slot: hash, score, move, depth, bound, age.
#[derive(Debug, Clone, Copy)]
struct Entry {
    key: u64,
    score: i16,
    best_move: Move,
    depth: i8,
    bound: Bound,
    age: u8,
}

const EMPTY_ENTRY: Entry = Entry {
    key: 0,
    score: 0,
    best_move: Move::NULL,
    depth: 0,
    bound: Bound::Exact,
    age: 0,
};

/// Outcome of a probe: a score usable for a cutoff, a best move usable
/// only for ordering, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Score(i32, Move),
    MoveHint(Move),
    Miss,
}

/// Fixed-size transposition table, indexed by `hash & (slots - 1)`.
/// Allocated once; `new_search` only bumps the age counter.
pub struct TranspositionTable {
    entries: Vec<Entry>,
    mask: usize,
    age: u8,
}

impl TranspositionTable {
    /// Builds a table from a memory budget. The slot count is the largest
    /// power of two that fits.
    pub fn new(size_mib: usize) -> Result<Self, EngineError> {
        let bytes = size_mib
            .checked_mul(1024 * 1024)
            .ok_or_else(|| EngineError::Config(format!("table size {} MiB overflows", size_mib)))?;
        let slots = bytes / std::mem::size_of::<Entry>();
        if slots == 0 {
            return Err(EngineError::Config(format!(
                "table size {} MiB holds no entries",
                size_mib
            )));
        }
        let capacity = 1usize << (usize::BITS - 1 - slots.leading_zeros());

        Ok(TranspositionTable {
            entries: vec![EMPTY_ENTRY; capacity],
            mask: capacity - 1,
            age: 0,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Ages out the previous search's entries without clearing them.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.entries.fill(EMPTY_ENTRY);
        self.age = 0;
    }

    pub fn probe(&self, hash: u64, depth: i32, alpha: i32, beta: i32) -> Probe {
        let entry = &self.entries[hash as usize & self.mask];
        if entry.key != hash {
            return Probe::Miss;
        }

        if entry.depth as i32 >= depth {
            let score = entry.score as i32;
            let usable = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
            };
            if usable {
                return Probe::Score(score, entry.best_move);
            }
        }

        // Depth too shallow or bound not decisive: the move still orders.
        if entry.best_move.is_null() {
            Probe::Miss
        } else {
            Probe::MoveHint(entry.best_move)
        }
    }

    /// Replacement: always overwrite an empty slot, the same position, a
    /// shallower entry, or an entry from an older search.
    pub fn store(&mut self, hash: u64, score: i32, best_move: Move, depth: i32, bound: Bound) {
        let age = self.age;
        let entry = &mut self.entries[hash as usize & self.mask];

        let replace = entry.key == 0
            || entry.key == hash
            || depth >= entry.depth as i32
            || entry.age != age;
        if !replace {
            return;
        }

        entry.key = hash;
        entry.score = score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        entry.best_move = best_move;
        entry.depth = depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        entry.bound = bound;
        entry.age = age;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Entry>(), 16);
    }

    #[test]
    fn capacity_is_a_power_of_two() {
        let tt = TranspositionTable::new(1).unwrap();
        assert!(tt.capacity().is_power_of_two());
        assert_eq!(tt.capacity(), 65536);
    }

    #[test]
    fn zero_budget_is_a_config_error() {
        assert!(matches!(
            TranspositionTable::new(0),
            Err(EngineError::Config(_))
        ));
    }
}
