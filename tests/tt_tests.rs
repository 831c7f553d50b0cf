use meridian::errors::EngineError;
use meridian::moves::types::Move;
use meridian::search::tt::{Bound, Probe, TranspositionTable};
use meridian::square::Square;

fn mv(from: u8, to: u8) -> Move {
    Move::new(Square::from_index(from), Square::from_index(to), 0)
}

#[test]
fn exact_entries_cut_at_any_window() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let best = mv(52, 36);
    tt.store(0xDEAD_BEEF, 123, best, 5, Bound::Exact);

    assert_eq!(tt.probe(0xDEAD_BEEF, 5, -100, 100), Probe::Score(123, best));
    assert_eq!(tt.probe(0xDEAD_BEEF, 3, 500, 600), Probe::Score(123, best));
    assert_eq!(tt.probe(0xBAD_F00D, 3, -100, 100), Probe::Miss);
}

#[test]
fn lower_bound_cuts_only_at_or_above_beta() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let best = mv(12, 28);
    tt.store(42, 250, best, 6, Bound::Lower);

    // score 250 >= beta 200: usable
    assert_eq!(tt.probe(42, 6, 100, 200), Probe::Score(250, best));
    // beta 300 above the bound: only the move survives
    assert_eq!(tt.probe(42, 6, 100, 300), Probe::MoveHint(best));
}

#[test]
fn upper_bound_cuts_only_at_or_below_alpha() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let best = mv(8, 16);
    tt.store(7, -80, best, 4, Bound::Upper);

    assert_eq!(tt.probe(7, 4, -50, 50), Probe::Score(-80, best));
    assert_eq!(tt.probe(7, 4, -200, 50), Probe::MoveHint(best));
}

#[test]
fn shallow_entries_degrade_to_move_hints() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let best = mv(1, 18);
    tt.store(99, 10, best, 3, Bound::Exact);

    assert_eq!(tt.probe(99, 3, -100, 100), Probe::Score(10, best));
    assert_eq!(tt.probe(99, 7, -100, 100), Probe::MoveHint(best));
}

#[test]
fn deeper_entries_survive_shallow_collisions() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let cap = tt.capacity() as u64;
    let deep = mv(0, 1);
    let shallow = mv(2, 3);

    // Same slot, different keys, same age.
    tt.store(5, 500, deep, 9, Bound::Exact);
    tt.store(5 + cap, -1, shallow, 2, Bound::Exact);

    assert_eq!(tt.probe(5, 1, -600, 600), Probe::Score(500, deep));
    assert_eq!(tt.probe(5 + cap, 1, -600, 600), Probe::Miss);

    // Deeper replacement always lands.
    tt.store(5 + cap, -1, shallow, 9, Bound::Exact);
    assert_eq!(tt.probe(5 + cap, 1, -600, 600), Probe::Score(-1, shallow));
}

#[test]
fn aged_entries_are_replaced() {
    let mut tt = TranspositionTable::new(1).unwrap();
    let cap = tt.capacity() as u64;
    let old = mv(0, 1);
    let new = mv(2, 3);

    tt.store(5, 500, old, 9, Bound::Exact);
    tt.new_search();
    // Shallower, colliding, but the stored age is stale.
    tt.store(5 + cap, -1, new, 1, Bound::Exact);
    assert_eq!(tt.probe(5 + cap, 1, -600, 600), Probe::Score(-1, new));
}

#[test]
fn same_position_is_always_overwritten() {
    let mut tt = TranspositionTable::new(1).unwrap();
    tt.store(77, 30, mv(0, 1), 9, Bound::Exact);
    tt.store(77, 60, mv(2, 3), 1, Bound::Lower);
    assert_eq!(tt.probe(77, 1, -600, 600), Probe::MoveHint(mv(2, 3)));
}

#[test]
fn clear_empties_every_slot() {
    let mut tt = TranspositionTable::new(1).unwrap();
    tt.store(123, 1, mv(0, 1), 1, Bound::Exact);
    tt.clear();
    assert_eq!(tt.probe(123, 0, -100, 100), Probe::Miss);
}

#[test]
fn config_errors_on_degenerate_sizes() {
    assert!(matches!(
        TranspositionTable::new(0),
        Err(EngineError::Config(_))
    ));
    assert!(TranspositionTable::new(1).is_ok());
}
