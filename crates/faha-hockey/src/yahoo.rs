// Yahoo Fantasy resource paths and keys.
//
// Every request is a GET of a resource path (with matrix parameters such as
// `;start=25`) plus `format=json`.

use faha_core::transport::Transport;
use serde_json::Value;
use tracing::debug;

use crate::error::LeagueError;

/// Ownership filter for league player listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    FreeAgent,
    Waivers,
    Taken,
    Keeper,
    /// Free agents and waivers.
    Available,
    All,
}

impl PlayerStatus {
    /// Matrix parameter value; `All` sends no status at all.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PlayerStatus::FreeAgent => Some("FA"),
            PlayerStatus::Waivers => Some("W"),
            PlayerStatus::Taken => Some("T"),
            PlayerStatus::Keeper => Some("K"),
            PlayerStatus::Available => Some("A"),
            PlayerStatus::All => None,
        }
    }
}

/// League, team and player keys for one league in one game (season).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueKeys {
    pub game_key: String,
    pub league_id: String,
}

impl LeagueKeys {
    pub fn new(game_key: impl Into<String>, league_id: impl Into<String>) -> Self {
        Self {
            game_key: game_key.into(),
            league_id: league_id.into(),
        }
    }

    pub fn league_key(&self) -> String {
        format!("{}.l.{}", self.game_key, self.league_id)
    }

    pub fn team_key(&self, manager_id: &str) -> String {
        format!("{}.t.{}", self.league_key(), manager_id)
    }

    pub fn player_key(&self, player_id: &str) -> String {
        format!("{}.p.{}", self.game_key, player_id)
    }

    pub fn team_keys(&self, manager_ids: &[String]) -> String {
        join_keys(manager_ids.iter().map(|id| self.team_key(id)))
    }

    pub fn player_keys(&self, player_ids: &[String]) -> String {
        join_keys(player_ids.iter().map(|id| self.player_key(id)))
    }
}

fn join_keys(keys: impl Iterator<Item = String>) -> String {
    keys.collect::<Vec<_>>().join(",")
}

/// Typed request builders over a [`Transport`].
pub struct YahooApi<T> {
    transport: T,
}

impl<T: Transport> YahooApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn get(&self, path: &str) -> Result<Value, LeagueError> {
        debug!(%path, "fetching resource");
        Ok(self.transport.get(path, &[("format", "json")]).await?)
    }

    /// Current NHL game (key and season).
    pub async fn game(&self) -> Result<Value, LeagueError> {
        self.get("game/nhl").await
    }

    pub async fn league_settings(&self, keys: &LeagueKeys) -> Result<Value, LeagueError> {
        self.get(&format!("league/{}/settings", keys.league_key())).await
    }

    pub async fn team_info(
        &self,
        keys: &LeagueKeys,
        manager_ids: &[String],
    ) -> Result<Value, LeagueError> {
        self.get(&format!("teams;team_keys={}", keys.team_keys(manager_ids)))
            .await
    }

    pub async fn team_stats(
        &self,
        keys: &LeagueKeys,
        manager_ids: &[String],
    ) -> Result<Value, LeagueError> {
        self.get(&format!(
            "teams;team_keys={}/stats;type=season",
            keys.team_keys(manager_ids)
        ))
        .await
    }

    pub async fn team_rosters(
        &self,
        keys: &LeagueKeys,
        manager_ids: &[String],
    ) -> Result<Value, LeagueError> {
        self.get(&format!(
            "teams;team_keys={}/roster/players",
            keys.team_keys(manager_ids)
        ))
        .await
    }

    pub async fn player_stats(
        &self,
        keys: &LeagueKeys,
        player_ids: &[String],
    ) -> Result<Value, LeagueError> {
        self.get(&format!(
            "players;player_keys={}/stats;type=season",
            keys.player_keys(player_ids)
        ))
        .await
    }

    /// One page of the league's player listing, starting at `start`.
    pub async fn player_page(
        &self,
        keys: &LeagueKeys,
        start: usize,
        count: usize,
        status: PlayerStatus,
        position: Option<&str>,
    ) -> Result<Value, LeagueError> {
        self.get(&player_page_path(keys, start, count, status, position))
            .await
    }
}

pub fn player_page_path(
    keys: &LeagueKeys,
    start: usize,
    count: usize,
    status: PlayerStatus,
    position: Option<&str>,
) -> String {
    let mut path = format!(
        "league/{}/players;start={start};count={count}",
        keys.league_key()
    );
    if let Some(code) = status.code() {
        path.push_str(";status=");
        path.push_str(code);
    }
    if let Some(position) = position {
        path.push_str(";position=");
        path.push_str(position);
    }
    path.push_str("/stats;type=season");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::transport::ScriptedTransport;
    use serde_json::json;

    fn keys() -> LeagueKeys {
        LeagueKeys::new("427", "48213")
    }

    #[test]
    fn key_formats() {
        let keys = keys();
        assert_eq!(keys.league_key(), "427.l.48213");
        assert_eq!(keys.team_key("3"), "427.l.48213.t.3");
        assert_eq!(keys.player_key("6743"), "427.p.6743");
        assert_eq!(
            keys.team_keys(&["1".into(), "2".into()]),
            "427.l.48213.t.1,427.l.48213.t.2"
        );
    }

    #[test]
    fn page_path_matrix_parameters() {
        let keys = keys();
        assert_eq!(
            player_page_path(&keys, 50, 25, PlayerStatus::Taken, Some("G")),
            "league/427.l.48213/players;start=50;count=25;status=T;position=G/stats;type=season"
        );
        assert_eq!(
            player_page_path(&keys, 0, 25, PlayerStatus::All, None),
            "league/427.l.48213/players;start=0;count=25/stats;type=season"
        );
    }

    #[test]
    fn status_codes() {
        let codes: Vec<Option<&str>> = [
            PlayerStatus::FreeAgent,
            PlayerStatus::Waivers,
            PlayerStatus::Taken,
            PlayerStatus::Keeper,
            PlayerStatus::Available,
            PlayerStatus::All,
        ]
        .iter()
        .map(PlayerStatus::code)
        .collect();
        assert_eq!(
            codes,
            vec![Some("FA"), Some("W"), Some("T"), Some("K"), Some("A"), None]
        );
    }

    #[tokio::test]
    async fn requests_ask_for_json() {
        let transport = ScriptedTransport::new().with("game/nhl", json!({ "ok": true }));
        let api = YahooApi::new(transport);
        api.game().await.unwrap();
        assert_eq!(
            api.transport().queries(),
            vec![vec![("format".to_string(), "json".to_string())]]
        );
    }

    #[tokio::test]
    async fn transport_failures_pass_through() {
        let api = YahooApi::new(ScriptedTransport::new());
        match api.league_settings(&keys()).await {
            Err(LeagueError::Transport(err)) => {
                assert!(err.body().unwrap_or_default().contains("427.l.48213"))
            }
            other => panic!("expected transport error, got: {other:?}"),
        }
    }
}
