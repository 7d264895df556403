use faha_core::transport::TransportError;
use thiserror::Error;

use crate::stats::Stat;

/// Everything that can go wrong between a raw API response and a ranked
/// list of players or teams. None of these are retried.
#[derive(Debug, Error)]
pub enum LeagueError {
    /// A stat name has no identifier in the league settings or the fixed table.
    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// A player's position type is neither `P` nor `G`.
    #[error("unknown position type: {0:?}")]
    UnknownPositionClass(String),

    /// The payload does not have the shape the extractor relies on.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: String, value: String },

    #[error("missing stat category: {0}")]
    MissingCategory(Stat),

    #[error("no weight configured for {0}")]
    MissingWeight(Stat),

    #[error("reference magnitude for {0} is zero")]
    DegenerateBaseline(Stat),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
