//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! - [`transport`]: `ScriptedTransport`, an in-memory [`Transport`] that
//!   answers from canned JSON and records every request.
//! - [`payload`]: builders for Yahoo-shaped responses (settings, players,
//!   listing pages, team stats and rosters).
//!
//! [`Transport`]: faha_core::transport::Transport

pub mod payload;
pub mod transport;
