use tracing::{debug, instrument};

use crate::board::Position;
use crate::moves::movegen::generate_legal;
use crate::moves::types::Move;

const MAX_PERFT_DEPTH: usize = 16;

fn make_move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(
    position: &mut Position,
    depth: u32,
    ply: usize,
    buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let moves = &mut buffers[ply];
        moves.clear();
        generate_legal(position, moves);
    }

    if depth == 1 {
        return buffers[ply].len() as u64;
    }

    let move_count = buffers[ply].len();
    let mut nodes = 0;
    for i in 0..move_count {
        let mv = buffers[ply][i];
        let undo = position.make(mv);
        nodes += perft_recursive(position, depth - 1, ply + 1, buffers);
        position.unmake(mv, undo);
    }
    nodes
}

/// Counts the leaf nodes of the legal-move tree to `depth`. The canonical
/// correctness oracle for move generation.
#[instrument(skip(position))]
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    assert!(
        (depth as usize) < MAX_PERFT_DEPTH,
        "perft depth {} exceeds the buffer stack",
        depth
    );
    let mut buffers = make_move_buffers();
    perft_recursive(position, depth, 0, &mut buffers)
}

/// Per-root-move node totals, returned alongside the grand total.
#[instrument(skip(position))]
pub fn perft_divide(position: &mut Position, depth: u32) -> (Vec<(Move, u64)>, u64) {
    assert!(depth >= 1 && (depth as usize) < MAX_PERFT_DEPTH);
    let mut buffers = make_move_buffers();

    let mut roots = Vec::with_capacity(64);
    generate_legal(position, &mut roots);

    let mut breakdown = Vec::with_capacity(roots.len());
    let mut total = 0;
    for mv in roots {
        let undo = position.make(mv);
        let nodes = perft_recursive(position, depth - 1, 1, &mut buffers);
        position.unmake(mv, undo);
        debug!(%mv, nodes, "divide");
        breakdown.push((mv, nodes));
        total += nodes;
    }
    debug!(depth, total, "divide total");
    (breakdown, total)
}
