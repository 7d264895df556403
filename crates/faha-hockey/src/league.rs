// One fantasy league: settings, memoized league data, and valuation entry
// points.
//
// Everything fetched through a `League` is cached for the lifetime of the
// value (or until `invalidate`). Each `League` owns its cache; there is no
// sharing between instances.

use std::collections::{BTreeMap, HashMap};

use faha_core::transport::Transport;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::LeagueError;
use crate::fetch::PlayerFetcher;
use crate::payload::{
    as_text, collection_entries, content, field, is_unobserved, require_attr, require_text,
};
use crate::player::{extract_player_id, Player, PositionClass};
use crate::settings::{GameInfo, LeagueSettings};
use crate::stats::{Stat, StatCategoryResolver};
use crate::valuation::engine::{sort_by_value, value_players, ValuedPlayer, Weights};
use crate::valuation::teams::{rank_teams, TeamValuation};
use crate::valuation::weights::derive_weights;
use crate::yahoo::{LeagueKeys, PlayerStatus, YahooApi};

// ---------------------------------------------------------------------------
// Team data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Manager {
    /// Team number within the league, `1..=num_teams`.
    pub id: String,
    pub name: String,
}

/// A manager's season totals, keyed by category name.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub manager: Manager,
    pub totals: BTreeMap<String, f64>,
}

impl TeamStats {
    pub fn total(&self, stat: Stat) -> Option<f64> {
        self.totals.get(stat.name()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    pub manager: Manager,
    pub player_ids: Vec<String>,
}

fn team_entries(response: &Value) -> Result<Vec<&Value>, LeagueError> {
    let teams = require_attr(content(response)?, "teams")?;
    collection_entries(teams)
        .into_iter()
        .map(|entry| field(entry, "team"))
        .collect()
}

fn parse_manager(team: &Value) -> Result<Manager, LeagueError> {
    Ok(Manager {
        id: require_text(team, "team_id")?,
        name: require_text(team, "name")?,
    })
}

/// Totals for the league's scored categories. Unscored stats in the payload
/// are skipped; save percentage stays fractional.
fn parse_team_stats(team: &Value, resolver: &StatCategoryResolver) -> Result<TeamStats, LeagueError> {
    let manager = parse_manager(team)?;
    let stats = field(require_attr(team, "team_stats")?, "stats")?;

    let mut totals = BTreeMap::new();
    for entry in collection_entries(stats) {
        let Some(stat) = entry.get("stat") else {
            continue;
        };
        let Some(id) = stat.get("stat_id").and_then(as_text) else {
            continue;
        };
        let Some(category) = resolver.categories().iter().find(|c| c.id == id) else {
            continue;
        };
        let text = stat.get("value").and_then(as_text).unwrap_or_default();
        let total = if is_unobserved(&text) {
            0.0
        } else {
            text.trim().parse::<f64>().map_err(|_| LeagueError::InvalidValue {
                field: category.name.clone(),
                value: text.clone(),
            })?
        };
        totals.insert(category.name.clone(), total);
    }

    Ok(TeamStats { manager, totals })
}

fn parse_team_roster(team: &Value) -> Result<TeamRoster, LeagueError> {
    let manager = parse_manager(team)?;
    let roster = require_attr(team, "roster")?;
    let players = collection_entries(roster)
        .into_iter()
        .find_map(|r| r.get("players"))
        .ok_or_else(|| LeagueError::FieldNotFound("roster.players".into()))?;
    let player_ids = collection_entries(players)
        .into_iter()
        .map(extract_player_id)
        .collect::<Result<_, _>>()?;
    Ok(TeamRoster {
        manager,
        player_ids,
    })
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Lazily filled league data. Entries never expire on their own.
#[derive(Debug, Default)]
pub struct LeagueDataCache {
    team_stats: HashMap<String, TeamStats>,
    team_rosters: HashMap<String, TeamRoster>,
    taken_players: HashMap<Option<String>, Vec<Player>>,
    available_players: HashMap<Option<String>, Vec<Player>>,
}

impl LeagueDataCache {
    pub fn is_empty(&self) -> bool {
        self.team_stats.is_empty()
            && self.team_rosters.is_empty()
            && self.taken_players.is_empty()
            && self.available_players.is_empty()
    }

    pub fn invalidate(&mut self) {
        self.team_stats.clear();
        self.team_rosters.clear();
        self.taken_players.clear();
        self.available_players.clear();
    }

    /// Player sets for `Taken` or `Available`, keyed by position filter.
    fn player_sets(&mut self, status: PlayerStatus) -> &mut HashMap<Option<String>, Vec<Player>> {
        match status {
            PlayerStatus::Taken => &mut self.taken_players,
            _ => &mut self.available_players,
        }
    }
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

pub struct League<T> {
    api: YahooApi<T>,
    keys: LeagueKeys,
    settings: LeagueSettings,
    cache: LeagueDataCache,
}

impl<T: Transport> League<T> {
    /// The NHL game currently in season. Its key only addresses that season's
    /// leagues.
    pub async fn current_game(api: &YahooApi<T>) -> Result<GameInfo, LeagueError> {
        GameInfo::from_response(&api.game().await?)
    }

    /// Fetch the league's settings and start with an empty cache.
    pub async fn connect(api: YahooApi<T>, keys: LeagueKeys) -> Result<Self, LeagueError> {
        let settings = LeagueSettings::from_response(&api.league_settings(&keys).await?)?;
        info!(
            league = %keys.league_key(),
            teams = settings.num_teams,
            categories = settings.resolver.categories().len(),
            "connected to league"
        );
        Ok(Self::new(api, keys, settings))
    }

    pub fn new(api: YahooApi<T>, keys: LeagueKeys, settings: LeagueSettings) -> Self {
        Self {
            api,
            keys,
            settings,
            cache: LeagueDataCache::default(),
        }
    }

    pub fn keys(&self) -> &LeagueKeys {
        &self.keys
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &StatCategoryResolver {
        &self.settings.resolver
    }

    pub fn cache(&self) -> &LeagueDataCache {
        &self.cache
    }

    /// Drop everything cached so far; the next access refetches.
    pub fn invalidate(&mut self) {
        debug!(league = %self.keys.league_key(), "invalidating league cache");
        self.cache.invalidate();
    }

    pub fn manager_ids(&self) -> Vec<String> {
        self.settings.manager_ids()
    }

    fn fetcher(&self) -> PlayerFetcher<'_, T> {
        PlayerFetcher::new(&self.api, &self.keys, &self.settings.resolver)
    }

    /// Every manager, with team names, in team order.
    pub async fn managers(&self) -> Result<Vec<Manager>, LeagueError> {
        let ids = self.manager_ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.api.team_info(&self.keys, &ids).await?;
        team_entries(&response)?
            .into_iter()
            .map(parse_manager)
            .collect()
    }

    /// Season totals for the given managers, in the order asked. Only
    /// managers not cached yet are requested.
    pub async fn team_stats(&mut self, manager_ids: &[String]) -> Result<Vec<TeamStats>, LeagueError> {
        let missing: Vec<String> = manager_ids
            .iter()
            .filter(|id| !self.cache.team_stats.contains_key(*id))
            .cloned()
            .collect();

        if missing.is_empty() {
            debug!(count = manager_ids.len(), "team stats cache hit");
        } else {
            info!(count = missing.len(), "fetching team stats");
            let response = self.api.team_stats(&self.keys, &missing).await?;
            for team in team_entries(&response)? {
                let stats = parse_team_stats(team, &self.settings.resolver)?;
                self.cache.team_stats.insert(stats.manager.id.clone(), stats);
            }
        }

        manager_ids
            .iter()
            .map(|id| {
                self.cache
                    .team_stats
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LeagueError::FieldNotFound(format!("team stats for manager {id}")))
            })
            .collect()
    }

    /// Rosters for the given managers, in the order asked. Only managers not
    /// cached yet are requested.
    pub async fn team_rosters(&mut self, manager_ids: &[String]) -> Result<Vec<TeamRoster>, LeagueError> {
        let missing: Vec<String> = manager_ids
            .iter()
            .filter(|id| !self.cache.team_rosters.contains_key(*id))
            .cloned()
            .collect();

        if missing.is_empty() {
            debug!(count = manager_ids.len(), "team roster cache hit");
        } else {
            info!(count = missing.len(), "fetching team rosters");
            let response = self.api.team_rosters(&self.keys, &missing).await?;
            for team in team_entries(&response)? {
                let roster = parse_team_roster(team)?;
                self.cache
                    .team_rosters
                    .insert(roster.manager.id.clone(), roster);
            }
        }

        manager_ids
            .iter()
            .map(|id| {
                self.cache
                    .team_rosters
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LeagueError::FieldNotFound(format!("roster for manager {id}")))
            })
            .collect()
    }

    /// Full records for specific players. Not cached.
    pub async fn players(&self, player_ids: &[String]) -> Result<Vec<Player>, LeagueError> {
        self.fetcher().players_by_id(player_ids).await
    }

    /// Rostered players who have appeared this season.
    pub async fn taken_players(&mut self, position: Option<&str>) -> Result<&[Player], LeagueError> {
        self.player_set(PlayerStatus::Taken, position).await
    }

    /// Free agents and waiver players who have appeared this season.
    pub async fn available_players(
        &mut self,
        position: Option<&str>,
    ) -> Result<&[Player], LeagueError> {
        self.player_set(PlayerStatus::Available, position).await
    }

    async fn player_set(
        &mut self,
        status: PlayerStatus,
        position: Option<&str>,
    ) -> Result<&[Player], LeagueError> {
        let key = position.map(str::to_string);
        if self.cache.player_sets(status).contains_key(&key) {
            debug!(?status, ?position, "player set cache hit");
        } else {
            let players = self.fetcher().players(status, position).await?;
            self.cache.player_sets(status).insert(key.clone(), players);
        }
        Ok(self
            .cache
            .player_sets(status)
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Each valued category's season totals across all managers, in team
    /// order. Scored categories the engine doesn't value are left out.
    pub async fn category_totals(&mut self) -> Result<BTreeMap<Stat, Vec<f64>>, LeagueError> {
        let ids = self.manager_ids();
        let teams = self.team_stats(&ids).await?;

        let mut totals = BTreeMap::new();
        for category in self.settings.resolver.categories() {
            let Some(stat) = Stat::from_name(&category.name) else {
                debug!(category = %category.name, "category is not valued");
                continue;
            };
            let values = teams
                .iter()
                .map(|team| {
                    team.totals.get(&category.name).copied().ok_or_else(|| {
                        LeagueError::FieldNotFound(format!(
                            "{} total for manager {}",
                            category.name, team.manager.id
                        ))
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            totals.insert(stat, values);
        }
        Ok(totals)
    }

    /// Category weights derived from this league's team totals.
    pub async fn stat_weights(&mut self) -> Result<Weights, LeagueError> {
        let totals = self.category_totals().await?;
        derive_weights(&totals)
    }

    /// Valued players on one manager's roster, best first, optionally only
    /// skaters or only goalies.
    pub async fn team_player_values(
        &mut self,
        manager_id: &str,
        weights: &Weights,
        class: Option<PositionClass>,
    ) -> Result<Vec<ValuedPlayer>, LeagueError> {
        let roster = self
            .team_rosters(&[manager_id.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LeagueError::FieldNotFound(format!("roster for manager {manager_id}")))?;

        let mut players = self.players(&roster.player_ids).await?;
        if let Some(class) = class {
            players.retain(|p| p.position_class() == class);
        }
        let mut valued = value_players(&players, weights)?;
        sort_by_value(&mut valued);
        Ok(valued)
    }

    /// Every team's value, best first.
    pub async fn team_values(&mut self, weights: &Weights) -> Result<Vec<TeamValuation>, LeagueError> {
        let ids = self.manager_ids();
        let rosters = self.team_rosters(&ids).await?;

        let mut teams = Vec::with_capacity(rosters.len());
        for roster in rosters {
            let players = self.players(&roster.player_ids).await?;
            debug!(manager = %roster.manager.name, players = players.len(), "valuing roster");
            teams.push((roster.manager, value_players(&players, weights)?));
        }
        Ok(rank_teams(teams))
    }
}
