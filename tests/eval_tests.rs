use meridian::board::Position;
use meridian::search::eval::evaluate;

#[test]
fn starting_position_scores_zero() {
    assert_eq!(evaluate(&Position::new()), 0);
}

#[test]
fn score_flips_sign_with_the_side_to_move() {
    let fens = [
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R",
        "4k3/8/8/8/8/8/8/QQQQK3",
        "rnbqkbnr/pppppppp/8/8/8/8/8/4K3",
    ];
    for placement in fens {
        let white = Position::from_fen(&format!("{} w - - 0 1", placement)).unwrap();
        let black = Position::from_fen(&format!("{} b - - 0 1", placement)).unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black), "fen {}", placement);
    }
}

#[test]
fn material_dominates() {
    // White has an extra queen.
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
    assert!(evaluate(&pos) > 800);
    // Black up a rook, black to move: positive for black.
    let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert!(evaluate(&pos) > 400);
}

#[test]
fn mirrored_positions_evaluate_identically() {
    // A white pawn on e4 and a black pawn on e5 sit on mirrored squares.
    let white = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
    let black = Position::from_fen("4k3/8/8/4p3/8/8/8/4K3 b - - 0 1").unwrap();
    assert_eq!(evaluate(&white), evaluate(&black));
}

#[test]
fn piece_square_tables_prefer_developed_pieces() {
    // Same material, knight on f3 versus knight on g1.
    let developed = Position::from_fen("4k3/8/8/8/8/5N2/8/4K3 w - - 0 1").unwrap();
    let undeveloped = Position::from_fen("4k3/8/8/8/8/8/8/4K1N1 w - - 0 1").unwrap();
    assert!(evaluate(&developed) > evaluate(&undeveloped));
}

#[test]
fn centralized_king_gains_in_the_endgame() {
    // Bare kings: deep endgame, the endgame table rewards the center.
    let central = Position::from_fen("4k3/8/8/8/4K3/8/8/8 w - - 0 1").unwrap();
    let cornered = Position::from_fen("4k3/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
    assert!(evaluate(&central) > evaluate(&cornered));
}
