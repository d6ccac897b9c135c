//! Startup configuration errors
//!
//! Everything here is raised before the frame loop starts. Per-frame queries
//! are total and never return these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map has no rows")]
    EmptyMap,

    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map cell {ch:?} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, ch: char },

    #[error("map has no player start ('P')")]
    MissingPlayerStart,

    #[error("map has no stalker spawn ('S')")]
    MissingStalkerSpawn,

    #[error("map marker {0:?} appears more than once")]
    DuplicateMarker(char),

    #[error("map has no open cells")]
    NoOpenCells,

    #[error("stalker spawn at ({col}, {row}) is not reachable from the player start")]
    UnreachableSpawn { col: usize, row: usize },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}
