// Typed player records and their extraction from raw player payloads.

use serde_json::Value;

use crate::error::LeagueError;
use crate::payload::{
    as_text, collection_entries, content, field, find_attr, is_unobserved, require_attr,
    require_text,
};
use crate::stats::{Stat, StatCategoryResolver};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionClass {
    Skater,
    Goalie,
}

impl PositionClass {
    /// Yahoo's `position_type`: `P` for skaters, `G` for goalies.
    pub fn from_tag(tag: &str) -> Result<Self, LeagueError> {
        match tag {
            "P" => Ok(PositionClass::Skater),
            "G" => Ok(PositionClass::Goalie),
            other => Err(LeagueError::UnknownPositionClass(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkaterStats {
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub plus_minus: i32,
    pub powerplay_points: u32,
    pub shots_on_goal: u32,
    pub faceoffs_won: u32,
    pub hits: u32,
    pub blocks: u32,
}

impl SkaterStats {
    /// Valued categories with their season totals, in [`Stat::SKATER`] order.
    pub fn categories(&self) -> [(Stat, f64); 8] {
        [
            (Stat::Goals, self.goals as f64),
            (Stat::Assists, self.assists as f64),
            (Stat::PlusMinus, self.plus_minus as f64),
            (Stat::PowerplayPoints, self.powerplay_points as f64),
            (Stat::ShotsOnGoal, self.shots_on_goal as f64),
            (Stat::FaceoffsWon, self.faceoffs_won as f64),
            (Stat::Hits, self.hits as f64),
            (Stat::Blocks, self.blocks as f64),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalieStats {
    pub games_started: u32,
    pub wins: u32,
    pub saves: u32,
    pub save_percentage: f64,
    pub shutouts: u32,
}

impl GoalieStats {
    /// Categories normalized per game started (everything but save percentage).
    pub fn counting_categories(&self) -> [(Stat, f64); 3] {
        [
            (Stat::Wins, self.wins as f64),
            (Stat::Saves, self.saves as f64),
            (Stat::Shutouts, self.shutouts as f64),
        ]
    }
}

/// Season totals, tagged by position class.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonStats {
    Skater(SkaterStats),
    Goalie(GoalieStats),
}

impl SeasonStats {
    pub fn position_class(&self) -> PositionClass {
        match self {
            SeasonStats::Skater(_) => PositionClass::Skater,
            SeasonStats::Goalie(_) => PositionClass::Goalie,
        }
    }

    /// Games played for skaters, games started for goalies.
    pub fn appearances(&self) -> u32 {
        match self {
            SeasonStats::Skater(s) => s.games_played,
            SeasonStats::Goalie(g) => g.games_started,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// NHL team abbreviation.
    pub team: String,
    /// Eligible positions, without the `Util` pseudo-position.
    pub positions: Vec<String>,
    pub stats: SeasonStats,
}

impl Player {
    pub fn position_class(&self) -> PositionClass {
        self.stats.position_class()
    }

    pub fn is_eligible(&self, position: &str) -> bool {
        self.positions.iter().any(|p| p == position)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

const UTILITY_POSITION: &str = "Util";

/// Id of a `{"player": [[meta...], ...]}` entry. Used for listings and
/// rosters, which carry no stat block.
pub fn extract_player_id(entry: &Value) -> Result<String, LeagueError> {
    require_text(field(entry, "player")?, "player_id")
}

/// Build a typed player from one `{"player": [[meta...], {"player_stats": ..}]}`
/// entry.
pub fn extract_player(entry: &Value, resolver: &StatCategoryResolver) -> Result<Player, LeagueError> {
    let player = field(entry, "player")?;

    let id = require_text(player, "player_id")?;
    let name = require_attr(player, "name")?
        .get("full")
        .and_then(as_text)
        .ok_or_else(|| LeagueError::FieldNotFound("name.full".into()))?;
    let team = require_text(player, "editorial_team_abbr")?;
    let positions = collection_entries(require_attr(player, "eligible_positions")?)
        .into_iter()
        .filter_map(|p| find_attr(p, "position").and_then(as_text))
        .filter(|p| p != UTILITY_POSITION)
        .collect();
    let class = PositionClass::from_tag(&require_text(player, "position_type")?)?;

    let stat_list = field(require_attr(player, "player_stats")?, "stats")?;
    let stats = StatReader {
        stats: stat_list,
        resolver,
    };

    let stats = match class {
        PositionClass::Skater => SeasonStats::Skater(SkaterStats {
            games_played: stats.count(Stat::GamesPlayed)?,
            goals: stats.count(Stat::Goals)?,
            assists: stats.count(Stat::Assists)?,
            plus_minus: stats.signed(Stat::PlusMinus)?,
            powerplay_points: stats.count(Stat::PowerplayPoints)?,
            shots_on_goal: stats.count(Stat::ShotsOnGoal)?,
            faceoffs_won: stats.count(Stat::FaceoffsWon)?,
            hits: stats.count(Stat::Hits)?,
            blocks: stats.count(Stat::Blocks)?,
        }),
        PositionClass::Goalie => SeasonStats::Goalie(GoalieStats {
            games_started: stats.count(Stat::GamesStarted)?,
            wins: stats.count(Stat::Wins)?,
            saves: stats.count(Stat::Saves)?,
            save_percentage: stats.ratio(Stat::SavePercentage)?,
            shutouts: stats.count(Stat::Shutouts)?,
        }),
    };

    Ok(Player {
        id,
        name,
        team,
        positions,
        stats,
    })
}

/// Every player in a `players;player_keys=../stats` response, in response
/// order.
pub fn extract_players(
    response: &Value,
    resolver: &StatCategoryResolver,
) -> Result<Vec<Player>, LeagueError> {
    let players = require_attr(content(response)?, "players")?;
    collection_entries(players)
        .into_iter()
        .map(|entry| extract_player(entry, resolver))
        .collect()
}

/// Looks stats up by id in a flat `[{"stat": {"stat_id", "value"}}]` list.
struct StatReader<'a> {
    stats: &'a Value,
    resolver: &'a StatCategoryResolver,
}

impl StatReader<'_> {
    /// Raw text of a stat. Unobserved values (`-`) read as `"0"`.
    fn text(&self, stat: Stat) -> Result<String, LeagueError> {
        let id = self.resolver.id_for_stat(stat)?;
        let value = collection_entries(self.stats)
            .into_iter()
            .filter_map(|entry| entry.get("stat"))
            .find(|s| s.get("stat_id").and_then(as_text).as_deref() == Some(id))
            .and_then(|s| s.get("value"))
            .ok_or_else(|| LeagueError::FieldNotFound(format!("stat {stat} (id {id})")))?;

        match as_text(value) {
            Some(text) if is_unobserved(&text) => Ok("0".to_string()),
            Some(text) => Ok(text.trim().to_string()),
            None if value.is_null() => Ok("0".to_string()),
            None => Err(invalid(stat, &value.to_string())),
        }
    }

    fn count(&self, stat: Stat) -> Result<u32, LeagueError> {
        let text = self.text(stat)?;
        text.parse().map_err(|_| invalid(stat, &text))
    }

    fn signed(&self, stat: Stat) -> Result<i32, LeagueError> {
        let text = self.text(stat)?;
        text.parse().map_err(|_| invalid(stat, &text))
    }

    fn ratio(&self, stat: Stat) -> Result<f64, LeagueError> {
        let text = self.text(stat)?;
        text.parse().map_err(|_| invalid(stat, &text))
    }
}

fn invalid(stat: Stat, value: &str) -> LeagueError {
    LeagueError::InvalidValue {
        field: stat.name().to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::payload::{
        goalie_entry, settings_resolver, skater_entry, stat_entry, GoalieLine, SkaterLine,
    };
    use serde_json::json;

    fn mcdavid() -> SkaterLine {
        SkaterLine {
            games_played: "82",
            goals: "64",
            assists: "89",
            plus_minus: "-3",
            powerplay_points: "34",
            shots_on_goal: "352",
            faceoffs_won: "773",
            hits: "63",
            blocks: "35",
        }
    }

    #[test]
    fn extracts_skater() {
        let resolver = settings_resolver();
        let entry = skater_entry("6743", "Connor McDavid", "Edm", &["C", "Util"], &mcdavid());
        let player = extract_player(&entry, &resolver).unwrap();

        assert_eq!(player.id, "6743");
        assert_eq!(player.name, "Connor McDavid");
        assert_eq!(player.team, "Edm");
        assert_eq!(player.positions, vec!["C".to_string()]);
        assert_eq!(player.position_class(), PositionClass::Skater);
        match &player.stats {
            SeasonStats::Skater(s) => {
                assert_eq!(s.games_played, 82);
                assert_eq!(s.goals, 64);
                assert_eq!(s.plus_minus, -3);
                assert_eq!(s.blocks, 35);
            }
            other => panic!("expected skater stats, got: {other:?}"),
        }
    }

    #[test]
    fn extracts_goalie_with_fractional_save_percentage() {
        let resolver = settings_resolver();
        let line = GoalieLine {
            games_started: "55",
            wins: "36",
            saves: "1492",
            save_percentage: ".915",
            shutouts: "-",
        };
        let entry = goalie_entry("5986", "Igor Shesterkin", "NYR", &line);
        let player = extract_player(&entry, &resolver).unwrap();

        assert_eq!(player.position_class(), PositionClass::Goalie);
        assert_eq!(player.positions, vec!["G".to_string()]);
        match &player.stats {
            SeasonStats::Goalie(g) => {
                assert_eq!(g.games_started, 55);
                assert!((g.save_percentage - 0.915).abs() < 1e-12);
                assert_eq!(g.shutouts, 0);
            }
            other => panic!("expected goalie stats, got: {other:?}"),
        }
    }

    #[test]
    fn unobserved_stats_read_as_zero() {
        let resolver = settings_resolver();
        let line = SkaterLine {
            games_played: "0",
            goals: "-",
            ..mcdavid()
        };
        let entry = skater_entry("1", "Call Up", "Ari", &["LW"], &line);
        let player = extract_player(&entry, &resolver).unwrap();
        assert_eq!(player.stats.appearances(), 0);
        assert!(matches!(&player.stats, SeasonStats::Skater(s) if s.goals == 0));
    }

    #[test]
    fn attributes_are_found_at_any_position() {
        let resolver = settings_resolver();
        let entry = json!({ "player": [
            [
                { "eligible_positions": [ { "position": "D" } ] },
                { "position_type": "P" },
                [],
                { "editorial_team_abbr": "Bos" },
                { "name": { "full": "Charlie McAvoy", "first": "Charlie" } },
                { "player_id": 7 },
                { "player_key": "427.p.7" }
            ],
            { "player_stats": { "coverage_type": "season", "stats": [
                stat_entry("29", "70"), stat_entry("1", "7"), stat_entry("2", "40"),
                stat_entry("4", "23"), stat_entry("8", "16"), stat_entry("14", "169"),
                stat_entry("16", "0"), stat_entry("31", "185"), stat_entry("32", "113")
            ] } }
        ]});
        let player = extract_player(&entry, &resolver).unwrap();
        assert_eq!(player.id, "7");
        assert_eq!(player.name, "Charlie McAvoy");
        assert!(player.is_eligible("D"));
    }

    #[test]
    fn unknown_position_type_is_rejected() {
        let resolver = settings_resolver();
        let mut entry = skater_entry("1", "Someone", "Tor", &["C"], &mcdavid());
        entry["player"][0][4] = json!({ "position_type": "X" });
        match extract_player(&entry, &resolver) {
            Err(LeagueError::UnknownPositionClass(tag)) => assert_eq!(tag, "X"),
            other => panic!("expected UnknownPositionClass, got: {other:?}"),
        }
    }

    #[test]
    fn missing_stat_is_field_not_found() {
        let resolver = settings_resolver();
        let mut entry = skater_entry("1", "Someone", "Tor", &["C"], &mcdavid());
        entry["player"][1]["player_stats"]["stats"] = json!([stat_entry("29", "10")]);
        assert!(matches!(
            extract_player(&entry, &resolver),
            Err(LeagueError::FieldNotFound(_))
        ));
    }

    #[test]
    fn missing_team_is_field_not_found() {
        let resolver = settings_resolver();
        let mut entry = skater_entry("1", "Someone", "Tor", &["C"], &mcdavid());
        entry["player"][0][3] = json!({});
        match extract_player(&entry, &resolver) {
            Err(LeagueError::FieldNotFound(field)) => assert_eq!(field, "editorial_team_abbr"),
            other => panic!("expected FieldNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_stat_is_invalid() {
        let resolver = settings_resolver();
        let line = SkaterLine {
            hits: "lots",
            ..mcdavid()
        };
        let entry = skater_entry("1", "Someone", "Tor", &["C"], &line);
        match extract_player(&entry, &resolver) {
            Err(LeagueError::InvalidValue { field, value }) => {
                assert_eq!(field, "Hits");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn class_always_matches_bundle() {
        let resolver = settings_resolver();
        let skater = extract_player(
            &skater_entry("1", "A", "Tor", &["C"], &mcdavid()),
            &resolver,
        )
        .unwrap();
        let goalie = extract_player(
            &goalie_entry("2", "B", "Tor", &GoalieLine::default()),
            &resolver,
        )
        .unwrap();
        assert!(matches!(skater.stats, SeasonStats::Skater(_)));
        assert_eq!(skater.position_class(), PositionClass::Skater);
        assert!(matches!(goalie.stats, SeasonStats::Goalie(_)));
        assert_eq!(goalie.position_class(), PositionClass::Goalie);
    }

    #[test]
    fn extract_player_id_ignores_missing_stats() {
        let entry = json!({ "player": [[ { "player_key": "427.p.9" }, { "player_id": "9" } ]] });
        assert_eq!(extract_player_id(&entry).unwrap(), "9");
    }
}
