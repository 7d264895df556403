// League settings and game metadata.

use serde_json::Value;

use crate::error::LeagueError;
use crate::payload::{as_count, content, require_attr, require_text};
use crate::stats::StatCategoryResolver;

/// What the valuation needs from a league's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSettings {
    pub num_teams: usize,
    pub resolver: StatCategoryResolver,
}

impl LeagueSettings {
    /// Parse a `league/{league_key}/settings` response.
    pub fn from_response(response: &Value) -> Result<Self, LeagueError> {
        let league = require_attr(content(response)?, "league")?;

        let raw_teams = require_attr(league, "num_teams")?;
        let num_teams = as_count(raw_teams).ok_or_else(|| LeagueError::InvalidValue {
            field: "num_teams".into(),
            value: raw_teams.to_string(),
        })?;

        let settings = require_attr(league, "settings")?;
        let stat_categories = require_attr(settings, "stat_categories")?;
        let resolver = StatCategoryResolver::from_stat_categories(stat_categories)?;

        Ok(Self {
            num_teams,
            resolver,
        })
    }

    /// Manager ids are the team numbers `1..=num_teams`.
    pub fn manager_ids(&self) -> Vec<String> {
        (1..=self.num_teams).map(|id| id.to_string()).collect()
    }
}

/// The current season's game, from `game/nhl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub game_key: String,
    pub season: i32,
}

impl GameInfo {
    pub fn from_response(response: &Value) -> Result<Self, LeagueError> {
        let game = require_attr(content(response)?, "game")?;
        let game_key = require_text(game, "game_key")?;
        let raw_season = require_text(game, "season")?;
        let season = raw_season
            .trim()
            .parse()
            .map_err(|_| LeagueError::InvalidValue {
                field: "season".into(),
                value: raw_season.clone(),
            })?;
        Ok(Self { game_key, season })
    }
}
