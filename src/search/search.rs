use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::board::{Color, Position};
use crate::errors::EngineError;
use crate::moves::attacks::in_check;
use crate::moves::movegen::{generate_captures, generate_legal};
use crate::moves::types::{Move, MoveList};
use crate::search::eval::evaluate;
use crate::search::ordering::{order_captures, order_moves};
use crate::search::tt::{Bound, DEFAULT_TT_MIB, Probe, TranspositionTable};
use crate::tables::init_tables;

/// Mate score; fits in the table's 16-bit score field with room for
/// mate-distance encoding (`MATE_SCORE - ply`).
pub const MATE_SCORE: i32 = 30_000;
/// Scores at least this large are treated as "near mate" by every guard.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 100;

const INF: i32 = MATE_SCORE;
const MAX_PLY: usize = 128;

// Aspiration windows.
const ASPIRATION_WINDOW: i32 = 50;
const ASPIRATION_MIN_DEPTH: i32 = 3;

// Null-move pruning.
const NULL_MOVE_REDUCTION: i32 = 2;
const NULL_MOVE_MIN_DEPTH: i32 = 3;

// Late-move reductions.
const LMR_MIN_DEPTH: i32 = 3;
const LMR_FULL_DEPTH_MOVES: usize = 4;

// Quiescence delta pruning: a queen's worth.
const DELTA_MARGIN: i32 = 900;

// Wall-clock checks happen once per this many nodes.
const TIME_CHECK_MASK: u64 = 1023;

// History counters are halved once any entry grows past this.
const HISTORY_LIMIT: i32 = 1 << 20;

/// Frontier futility margins by remaining depth.
#[inline(always)]
fn futility_margin(depth: i32) -> Option<i32> {
    match depth {
        1 => Some(200),
        2 => Some(400),
        _ => None,
    }
}

/// Reverse futility (static null move) margins by remaining depth.
#[inline(always)]
fn rfp_margin(depth: i32) -> Option<i32> {
    match depth {
        1 => Some(200),
        2 => Some(300),
        3 => Some(500),
        _ => None,
    }
}

/// Wall-clock budget with a cooperative stop flag. Checked roughly every
/// 1024 nodes; each recursive frame unwinds with a neutral score once the
/// flag is set.
pub struct TimeManager {
    start: Instant,
    limit: Option<Duration>,
    stopped: bool,
}

impl TimeManager {
    pub fn new(limit: Option<Duration>) -> Self {
        TimeManager {
            start: Instant::now(),
            limit,
            stopped: false,
        }
    }

    #[inline(always)]
    pub fn check_time(&mut self) {
        if !self.stopped
            && let Some(limit) = self.limit
            && self.start.elapsed() >= limit
        {
            self.stopped = true;
        }
    }

    #[inline(always)]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Per-search counters, logged at the end of every iteration.
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
    pub null_cutoffs: u64,
    pub lmr_reductions: u64,
    pub lmr_researches: u64,
    pub check_extensions: u64,
    pub aspiration_researches: u64,
    pub futility_prunes: u64,
    pub rfp_prunes: u64,
    pub depth_reached: i32,
}

/// Iterative-deepening negamax searcher. Owns the transposition table,
/// killer slots and history counters; the position is borrowed per search
/// and left unchanged on return.
pub struct Searcher {
    pub tt: TranspositionTable,
    pub stats: SearchStats,
    pub killers: Vec<[Option<Move>; 2]>,
    pub history: [[[i32; 64]; 64]; 2],
    time: TimeManager,
    max_depth: i32,
    in_null: bool,
    rec_ply: usize,
}

impl Searcher {
    pub fn new(tt_size_mib: usize) -> Result<Self, EngineError> {
        init_tables();
        Ok(Searcher {
            tt: TranspositionTable::new(tt_size_mib)?,
            stats: SearchStats::default(),
            killers: vec![[None; 2]; MAX_PLY],
            history: [[[0; 64]; 64]; 2],
            time: TimeManager::new(None),
            max_depth: 0,
            in_null: false,
            rec_ply: 0,
        })
    }

    /// Distance from the root, reconstructed from the remaining depth.
    #[inline(always)]
    fn ply(&self, depth: i32) -> usize {
        (self.max_depth - depth).clamp(0, MAX_PLY as i32 - 1) as usize
    }

    /// Best move and score for `position`, searching to `max_depth` plies
    /// with an optional wall-clock budget.
    ///
    /// Never fails: a stopped search returns the last completed
    /// iteration's result, and a position with no legal moves returns the
    /// null-move sentinel with a stalemate or mate score.
    #[instrument(skip(self, position))]
    pub fn search(
        &mut self,
        position: &mut Position,
        max_depth: i32,
        time_limit: Option<Duration>,
    ) -> (Move, i32) {
        self.stats = SearchStats::default();
        self.time = TimeManager::new(time_limit);
        self.in_null = false;
        self.rec_ply = 0;
        self.tt.new_search();

        let mut root_moves = MoveList::new();
        generate_legal(position, &mut root_moves);

        if root_moves.is_empty() {
            let score = if in_check(position, position.side_to_move()) {
                -MATE_SCORE
            } else {
                0
            };
            return (Move::NULL, score);
        }
        if root_moves.len() == 1 {
            return (root_moves[0], 0);
        }

        let mut best_move = root_moves[0];
        let mut best_score: i32 = 0;

        for depth in 1..=max_depth {
            self.max_depth = depth;

            let (mv, score) =
                if depth >= ASPIRATION_MIN_DEPTH && best_score.abs() < MATE_THRESHOLD {
                    // Narrow window around the previous score; re-search
                    // wide on a fail in either direction.
                    let alpha = best_score - ASPIRATION_WINDOW;
                    let beta = best_score + ASPIRATION_WINDOW;
                    let (mv, score) = self.search_root(position, depth, alpha, beta);
                    if !self.time.stopped() && (score <= alpha || score >= beta) {
                        self.stats.aspiration_researches += 1;
                        self.search_root(position, depth, -INF, INF)
                    } else {
                        (mv, score)
                    }
                } else {
                    self.search_root(position, depth, -INF, INF)
                };

            // A stopped iteration is incomplete; keep the previous result.
            if self.time.stopped() {
                break;
            }

            if let Some(mv) = mv {
                best_move = mv;
                best_score = score;
                self.stats.depth_reached = depth;

                let pv = self.principal_variation(position, 10);
                let pv_text = pv
                    .iter()
                    .map(|m| m.to_uci())
                    .collect::<Vec<_>>()
                    .join(" ");
                debug!(
                    depth,
                    score,
                    nodes = self.stats.nodes,
                    qnodes = self.stats.qnodes,
                    elapsed_ms = self.time.elapsed().as_millis() as u64,
                    pv = %pv_text,
                    "iteration complete"
                );
            }

            if best_score.abs() >= MATE_THRESHOLD {
                break;
            }
            self.time.check_time();
            if self.time.stopped() {
                break;
            }
        }

        debug!(stats = ?self.stats, "search finished");
        (best_move, best_score)
    }

    fn search_root(
        &mut self,
        position: &mut Position,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> (Option<Move>, i32) {
        let hash = position.zobrist;
        let tt_move = match self.tt.probe(hash, depth, alpha, beta) {
            Probe::Score(_, mv) | Probe::MoveHint(mv) => Some(mv),
            Probe::Miss => None,
        };

        let mut moves = MoveList::new();
        generate_legal(position, &mut moves);
        let side = position.side_to_move();
        order_moves(
            position,
            &mut moves,
            tt_move,
            &self.killers[0],
            &self.history[side as usize],
        );

        let mut best: Option<Move> = None;
        let mut best_score = -INF;

        for mv in moves {
            let undo = position.make(mv);
            let score = -self.negamax(position, depth - 1, -beta, -alpha);
            position.unmake(mv, undo);

            if self.time.stopped() {
                break;
            }
            if score > best_score {
                best_score = score;
                best = Some(mv);
            }
            if score >= beta {
                break;
            }
            alpha = alpha.max(score);
        }

        if let Some(mv) = best
            && !self.time.stopped()
        {
            self.tt.store(hash, best_score, mv, depth, Bound::Exact);
        }
        (best, best_score)
    }

    fn negamax(&mut self, position: &mut Position, depth: i32, alpha: i32, beta: i32) -> i32 {
        // Check extensions keep the remaining depth constant; cap the real
        // recursion depth so a mutual checking sequence cannot run away.
        if self.rec_ply >= MAX_PLY {
            return evaluate(position);
        }
        self.rec_ply += 1;
        let score = self.negamax_node(position, depth, alpha, beta);
        self.rec_ply -= 1;
        score
    }

    fn negamax_node(
        &mut self,
        position: &mut Position,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;
        if self.stats.nodes & TIME_CHECK_MASK == 0 {
            self.time.check_time();
        }
        if self.time.stopped() {
            return 0;
        }

        let ply = self.ply(depth);
        let hash = position.zobrist;

        let mut tt_move = None;
        match self.tt.probe(hash, depth, alpha, beta) {
            Probe::Score(score, _) => {
                self.stats.tt_hits += 1;
                return score;
            }
            Probe::MoveHint(mv) => tt_move = Some(mv),
            Probe::Miss => {}
        }

        if depth <= 0 {
            return self.quiescence(position, alpha, beta);
        }

        let mut moves = MoveList::new();
        generate_legal(position, &mut moves);
        let side = position.side_to_move();
        let in_check_now = in_check(position, side);

        if moves.is_empty() {
            // Shallower mates dominate through the ply offset.
            return if in_check_now {
                -MATE_SCORE + ply as i32
            } else {
                0
            };
        }

        // Reverse futility: statically so far above beta that the margin
        // cannot close the gap.
        if !in_check_now
            && beta.abs() < MATE_THRESHOLD
            && let Some(margin) = rfp_margin(depth)
        {
            let static_eval = evaluate(position);
            if static_eval - margin >= beta {
                self.stats.rfp_prunes += 1;
                return static_eval;
            }
        }

        // Null move: hand the opponent a free tempo; if the reduced reply
        // still cannot reach beta, the node is a cutoff.
        if !self.in_null && !in_check_now && depth >= NULL_MOVE_MIN_DEPTH && beta < MATE_THRESHOLD
        {
            self.in_null = true;
            let undo = position.make_null();
            let score = -self.negamax(
                position,
                depth - 1 - NULL_MOVE_REDUCTION,
                -beta,
                -beta + 1,
            );
            position.unmake_null(undo);
            self.in_null = false;

            if score >= beta && !self.time.stopped() {
                self.stats.null_cutoffs += 1;
                return beta;
            }
        }

        order_moves(
            position,
            &mut moves,
            tt_move,
            &self.killers[ply],
            &self.history[side as usize],
        );

        let futility = if !in_check_now && alpha.abs() < MATE_THRESHOLD {
            futility_margin(depth).map(|margin| (evaluate(position), margin))
        } else {
            None
        };

        let mut best_score = -INF;
        let mut best_move = Move::NULL;
        let mut moves_searched = 0usize;

        for mv in moves {
            let is_capture = position.is_capture(mv);

            // Frontier futility: a quiet move cannot lift a hopeless
            // static eval back to alpha. The first move always runs.
            if let Some((base, margin)) = futility
                && !is_capture
                && moves_searched > 0
                && base + margin <= alpha
            {
                self.stats.futility_prunes += 1;
                continue;
            }

            let undo = position.make(mv);
            let gives_check = in_check(position, position.side_to_move());

            let new_depth = if gives_check {
                self.stats.check_extensions += 1;
                depth
            } else {
                depth - 1
            };

            let score = if depth >= LMR_MIN_DEPTH
                && moves_searched >= LMR_FULL_DEPTH_MOVES
                && !in_check_now
                && !gives_check
                && !is_capture
            {
                // Late quiet move: try a reduced null-window probe first,
                // re-search at full depth only if it surprises.
                self.stats.lmr_reductions += 1;
                let reduced = -self.negamax(position, new_depth - 1, -alpha - 1, -alpha);
                if reduced > alpha {
                    self.stats.lmr_researches += 1;
                    -self.negamax(position, new_depth, -beta, -alpha)
                } else {
                    reduced
                }
            } else {
                -self.negamax(position, new_depth, -beta, -alpha)
            };

            position.unmake(mv, undo);
            moves_searched += 1;

            if self.time.stopped() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(score);

            if alpha >= beta {
                self.stats.cutoffs += 1;
                if !is_capture {
                    self.store_killer(ply, mv);
                    self.bump_history(side, mv, depth);
                }
                break;
            }
        }

        if !best_move.is_null() {
            let bound = if alpha >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(hash, best_score, best_move, depth, bound);
        }

        best_score
    }

    /// Resolves captures past the nominal horizon so leaves are evaluated
    /// at quiet positions.
    fn quiescence(&mut self, position: &mut Position, mut alpha: i32, beta: i32) -> i32 {
        self.stats.qnodes += 1;
        if self.stats.qnodes & TIME_CHECK_MASK == 0 {
            self.time.check_time();
        }
        if self.time.stopped() {
            return 0;
        }

        let stand_pat = evaluate(position);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        // Delta pruning: even winning a queen cannot reach alpha.
        if stand_pat + DELTA_MARGIN < alpha {
            return alpha;
        }

        let mut captures = MoveList::new();
        generate_captures(position, &mut captures);
        order_captures(position, &mut captures);

        for mv in captures {
            let undo = position.make(mv);
            let score = -self.quiescence(position, -beta, -alpha);
            position.unmake(mv, undo);

            if self.time.stopped() {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    #[inline]
    fn store_killer(&mut self, ply: usize, mv: Move) {
        let slots = &mut self.killers[ply];
        if slots[0] != Some(mv) {
            slots[1] = slots[0];
            slots[0] = Some(mv);
        }
    }

    #[inline]
    fn bump_history(&mut self, side: Color, mv: Move, depth: i32) {
        let entry = &mut self.history[side as usize][mv.from().index() as usize]
            [mv.to().index() as usize];
        *entry += depth * depth;
        let overflow = *entry > HISTORY_LIMIT;
        if overflow {
            for table in self.history.iter_mut() {
                for row in table.iter_mut() {
                    for counter in row.iter_mut() {
                        *counter /= 2;
                    }
                }
            }
        }
    }

    /// Walks the transposition table from `position`, following best
    /// moves until the line runs out, turns illegal, or repeats.
    pub fn principal_variation(&self, position: &Position, max_len: usize) -> Vec<Move> {
        let mut pos = position.clone();
        let mut seen = HashSet::new();
        let mut pv = Vec::new();

        for _ in 0..max_len {
            if !seen.insert(pos.zobrist) {
                break;
            }
            let mv = match self.tt.probe(pos.zobrist, 0, -INF, INF) {
                Probe::Score(_, mv) | Probe::MoveHint(mv) => mv,
                Probe::Miss => break,
            };
            if mv.is_null() {
                break;
            }

            let mut legal = MoveList::new();
            generate_legal(&mut pos, &mut legal);
            if !legal.contains(&mv) {
                break;
            }

            pv.push(mv);
            pos.make(mv);
        }
        pv
    }
}

/// One-shot entry point with the default table budget: best move and
/// score for `position` within `max_depth` plies and an optional
/// millisecond deadline.
pub fn search(position: &mut Position, max_depth: i32, time_ms: Option<u64>) -> (Move, i32) {
    let mut searcher = Searcher::new(DEFAULT_TT_MIB).expect("default table size is valid");
    searcher.search(position, max_depth, time_ms.map(Duration::from_millis))
}
