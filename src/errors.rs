use thiserror::Error;

/// Errors surfaced by the engine core.
///
/// Search itself never fails; time exhaustion is handled internally and the
/// last completed iteration's result is returned instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The FEN string is structurally malformed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A caller-supplied move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A construction-time parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}
