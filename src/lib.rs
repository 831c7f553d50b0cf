pub mod bitboard;
pub mod board;
pub mod errors;
pub mod hash;
#[cfg(feature = "logging")]
pub mod logger;
pub mod moves;
pub mod search;
pub mod square;
pub mod tables;
pub mod utils;

pub use board::{Color, Piece, Position};
pub use errors::EngineError;
pub use moves::types::{Move, MoveList, NullUndo, Undo};
pub use search::search::{Searcher, search};
