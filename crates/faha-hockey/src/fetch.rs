// Paginated player listing and chunked detail lookups.

use faha_core::transport::Transport;
use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::LeagueError;
use crate::payload::{collection_entries, content, require_attr};
use crate::player::{extract_player_id, extract_players, Player};
use crate::stats::StatCategoryResolver;
use crate::yahoo::{LeagueKeys, PlayerStatus, YahooApi};

/// Players per listing page and per detail lookup. Yahoo caps both at 25.
pub const PAGE_SIZE: usize = 25;

/// Player ids on one listing page. `"players": []` and `{"count": 0}` both
/// read as an empty page.
pub fn page_player_ids(response: &Value) -> Result<Vec<String>, LeagueError> {
    let league = require_attr(content(response)?, "league")?;
    let players = require_attr(league, "players")?;
    collection_entries(players)
        .into_iter()
        .map(extract_player_id)
        .collect()
}

/// Assembles player sets for one league.
pub struct PlayerFetcher<'a, T> {
    api: &'a YahooApi<T>,
    keys: &'a LeagueKeys,
    resolver: &'a StatCategoryResolver,
}

impl<'a, T: Transport> PlayerFetcher<'a, T> {
    pub fn new(
        api: &'a YahooApi<T>,
        keys: &'a LeagueKeys,
        resolver: &'a StatCategoryResolver,
    ) -> Self {
        Self {
            api,
            keys,
            resolver,
        }
    }

    /// Every player id matching the filters. Pages are requested one after
    /// another, each starting where the previous one ended, until a page
    /// comes back short (an exactly full last page costs one extra, empty
    /// request).
    pub async fn player_ids(
        &self,
        status: PlayerStatus,
        position: Option<&str>,
    ) -> Result<Vec<String>, LeagueError> {
        let mut ids: Vec<String> = Vec::new();
        loop {
            let start = ids.len();
            let response = self
                .api
                .player_page(self.keys, start, PAGE_SIZE, status, position)
                .await?;
            let page = page_player_ids(&response)?;
            let page_len = page.len();
            debug!(start, page_len, ?status, ?position, "player page");
            ids.extend(page);
            if page_len < PAGE_SIZE {
                break;
            }
        }
        Ok(ids)
    }

    /// Full records for `ids`, looked up 25 at a time. Chunks are requested
    /// concurrently; the result keeps the order of `ids`.
    pub async fn players_by_id(&self, ids: &[String]) -> Result<Vec<Player>, LeagueError> {
        let chunks = try_join_all(ids.chunks(PAGE_SIZE).map(|chunk| self.fetch_chunk(chunk))).await?;
        Ok(chunks.into_iter().flatten().collect())
    }

    async fn fetch_chunk(&self, chunk: &[String]) -> Result<Vec<Player>, LeagueError> {
        let response = self.api.player_stats(self.keys, chunk).await?;
        extract_players(&response, self.resolver)
    }

    /// Players matching the filters who have appeared this season (games
    /// played for skaters, games started for goalies).
    pub async fn players(
        &self,
        status: PlayerStatus,
        position: Option<&str>,
    ) -> Result<Vec<Player>, LeagueError> {
        let ids = self.player_ids(status, position).await?;
        let mut players = self.players_by_id(&ids).await?;

        let before = players.len();
        players.retain(|p| p.stats.appearances() > 0);
        let dropped = before - players.len();
        if dropped > 0 {
            debug!(dropped, "dropped players without appearances");
        }
        info!(count = players.len(), ?status, ?position, "fetched players");
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::payload::{
        empty_player_page, goalie_entry, player_ids, player_page, players_response,
        settings_resolver, skater_entry, GoalieLine, SkaterLine,
    };
    use crate::testkit::transport::ScriptedTransport;
    use crate::yahoo::player_page_path;
    use serde_json::json;

    fn keys() -> LeagueKeys {
        LeagueKeys::new("427", "48213")
    }

    fn taken_page(start: usize) -> String {
        player_page_path(&keys(), start, PAGE_SIZE, PlayerStatus::Taken, None)
    }

    fn stat_path(ids: &[String]) -> String {
        format!("players;player_keys={}/stats;type=season", keys().player_keys(ids))
    }

    fn skater(id: &str, games_played: &'static str) -> Value {
        let line = SkaterLine {
            games_played,
            goals: "10",
            ..SkaterLine::default()
        };
        skater_entry(id, &format!("Skater {id}"), "Tor", &["C"], &line)
    }

    #[tokio::test]
    async fn short_last_page_ends_pagination() {
        let transport = ScriptedTransport::new()
            .with(taken_page(0), player_page(&player_ids(1, 25)))
            .with(taken_page(25), player_page(&player_ids(26, 25)))
            .with(taken_page(50), player_page(&player_ids(51, 10)));
        let probe = transport.clone();
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        let ids = fetcher.player_ids(PlayerStatus::Taken, None).await.unwrap();
        assert_eq!(ids.len(), 60);
        assert_eq!(ids, player_ids(1, 60));
        assert_eq!(probe.paths(), vec![taken_page(0), taken_page(25), taken_page(50)]);
    }

    #[tokio::test]
    async fn full_last_page_costs_one_empty_request() {
        let transport = ScriptedTransport::new()
            .with(taken_page(0), player_page(&player_ids(1, 25)))
            .with(taken_page(25), player_page(&player_ids(26, 25)))
            .with(taken_page(50), empty_player_page());
        let probe = transport.clone();
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        let ids = fetcher.player_ids(PlayerStatus::Taken, None).await.unwrap();
        assert_eq!(ids.len(), 50);
        assert_eq!(probe.request_count(), 3);
    }

    #[test]
    fn count_zero_page_is_empty() {
        let page = json!({ "fantasy_content": { "league": [
            { "league_key": "427.l.48213" },
            { "players": { "count": 0 } }
        ] } });
        assert!(page_player_ids(&page).unwrap().is_empty());
        assert!(page_player_ids(&empty_player_page()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_lookups_are_chunked_and_keep_order() {
        let ids = player_ids(1, 30);
        let first: Vec<Value> = ids[..25].iter().map(|id| skater(id, "5")).collect();
        let second: Vec<Value> = ids[25..].iter().map(|id| skater(id, "5")).collect();
        let transport = ScriptedTransport::new()
            .with(stat_path(&ids[..25]), players_response(first))
            .with(stat_path(&ids[25..]), players_response(second));
        let probe = transport.clone();
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        let players = fetcher.players_by_id(&ids).await.unwrap();
        let got: Vec<String> = players.into_iter().map(|p| p.id).collect();
        assert_eq!(got, ids);
        assert_eq!(probe.count_matching("players;player_keys="), 2);
    }

    #[tokio::test]
    async fn failing_chunk_fails_the_fetch() {
        let ids = player_ids(1, 30);
        let first: Vec<Value> = ids[..25].iter().map(|id| skater(id, "5")).collect();
        let transport = ScriptedTransport::new()
            .with(stat_path(&ids[..25]), players_response(first))
            .with_failure(stat_path(&ids[25..]), 999, "Request denied");
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        match fetcher.players_by_id(&ids).await {
            Err(LeagueError::Transport(err)) => assert_eq!(err.body(), Some("Request denied")),
            other => panic!("expected transport error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn players_without_appearances_are_dropped() {
        let ids = player_ids(1, 3);
        let idle_goalie = goalie_entry(
            "3",
            "Backup",
            "Tor",
            &GoalieLine {
                games_started: "0",
                save_percentage: "-",
                ..GoalieLine::default()
            },
        );
        let transport = ScriptedTransport::new()
            .with(taken_page(0), player_page(&ids))
            .with(
                stat_path(&ids),
                players_response(vec![skater("1", "40"), skater("2", "0"), idle_goalie]),
            );
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        let players = fetcher.players(PlayerStatus::Taken, None).await.unwrap();
        let got: Vec<&str> = players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(got, vec!["1"]);
    }

    #[tokio::test]
    async fn no_ids_means_no_detail_requests() {
        let transport = ScriptedTransport::new();
        let probe = transport.clone();
        let api = YahooApi::new(transport);
        let resolver = settings_resolver();
        let keys = keys();
        let fetcher = PlayerFetcher::new(&api, &keys, &resolver);

        assert!(fetcher.players_by_id(&[]).await.unwrap().is_empty());
        assert_eq!(probe.request_count(), 0);
    }
}
