// Library root: hockey stat taxonomy, player extraction, paginated fetching,
// the per-league cache, and the valuation engine.

pub mod draft;
pub mod error;
pub mod fetch;
pub mod league;
pub mod payload;
pub mod player;
pub mod settings;
pub mod stats;
pub mod valuation;
pub mod yahoo;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::LeagueError;
