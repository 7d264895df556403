//! Builders for Yahoo-shaped JSON responses.
//!
//! Stat ids follow Yahoo's NHL numbering: skaters use games played `29`,
//! goals `1`, assists `2`, plus/minus `4`, powerplay points `8`, shots `14`,
//! faceoffs won `16`, hits `31` and blocks `32`. Goalies use games started
//! `18`, wins `19`, saves `25`, save percentage `26` and shutouts `27`.

use serde_json::{json, Map, Value};

use crate::settings::LeagueSettings;
use crate::stats::StatCategoryResolver;

/// `(stat_id, name, display_name, group, display_only)` for a standard
/// head-to-head categories league.
pub const STANDARD_CATEGORIES: [(u32, &str, &str, &str, bool); 14] = [
    (1, "Goals", "G", "offense", false),
    (2, "Assists", "A", "offense", false),
    (4, "Plus/Minus", "+/-", "offense", false),
    (8, "Powerplay Points", "PPP", "offense", false),
    (14, "Shots on Goal", "SOG", "offense", false),
    (16, "Faceoffs Won", "FW", "offense", false),
    (31, "Hits", "HIT", "offense", false),
    (32, "Blocks", "BLK", "offense", false),
    (19, "Wins", "W", "goaltending", false),
    (22, "Goals Against", "GA", "goaltending", true),
    (23, "Goals Against Average", "GAA", "goaltending", true),
    (25, "Saves", "SV", "goaltending", false),
    (26, "Save Percentage", "SV%", "goaltending", false),
    (27, "Shutouts", "SHO", "goaltending", false),
];

/// Yahoo collection object, `{"0": .., "1": .., "count": N}`, over
/// already wrapped entries (`{"player": ..}`, `{"team": ..}`).
pub fn wrapped_collection(entries: Vec<Value>) -> Value {
    let mut map = Map::new();
    let count = entries.len();
    for (i, entry) in entries.into_iter().enumerate() {
        map.insert(i.to_string(), entry);
    }
    map.insert("count".into(), json!(count));
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Settings and game
// ---------------------------------------------------------------------------

pub fn settings_response(num_teams: usize) -> Value {
    let stats: Vec<Value> = STANDARD_CATEGORIES
        .iter()
        .map(|(id, name, display, group, display_only)| {
            let position_type = if *group == "offense" { "P" } else { "G" };
            let mut stat = json!({
                "stat_id": id,
                "enabled": "1",
                "name": name,
                "display_name": display,
                "sort_order": "1",
                "position_type": position_type,
                "group": group,
            });
            if *display_only {
                stat["is_only_display_stat"] = json!("1");
            }
            json!({ "stat": stat })
        })
        .collect();

    json!({ "fantasy_content": { "league": [
        {
            "league_key": "427.l.48213",
            "league_id": "48213",
            "name": "Test League",
            "num_teams": num_teams,
            "season": "2023"
        },
        { "settings": [
            { "draft_type": "live", "scoring_type": "head", "stat_categories": { "stats": stats } }
        ] }
    ] } })
}

pub fn settings_resolver() -> StatCategoryResolver {
    LeagueSettings::from_response(&settings_response(12))
        .map(|s| s.resolver)
        .unwrap_or_default()
}

pub fn game_response(game_key: &str, season: i32) -> Value {
    json!({ "fantasy_content": { "game": [
        { "game_key": game_key, "game_id": game_key, "name": "Hockey", "code": "nhl", "season": season.to_string() }
    ] } })
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

pub fn stat_entry(id: &str, value: &str) -> Value {
    json!({ "stat": { "stat_id": id, "value": value } })
}

/// Season line for a skater, as the strings Yahoo sends.
#[derive(Debug, Clone, Default)]
pub struct SkaterLine {
    pub games_played: &'static str,
    pub goals: &'static str,
    pub assists: &'static str,
    pub plus_minus: &'static str,
    pub powerplay_points: &'static str,
    pub shots_on_goal: &'static str,
    pub faceoffs_won: &'static str,
    pub hits: &'static str,
    pub blocks: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct GoalieLine {
    pub games_started: &'static str,
    pub wins: &'static str,
    pub saves: &'static str,
    pub save_percentage: &'static str,
    pub shutouts: &'static str,
}

/// Player metadata, laid out as `[player_key, player_id, name, team,
/// position_type, eligible_positions]`.
fn player_meta(id: &str, name: &str, team: &str, position_type: &str, positions: &[&str]) -> Value {
    let eligible: Vec<Value> = positions.iter().map(|p| json!({ "position": p })).collect();
    json!([
        { "player_key": format!("427.p.{id}") },
        { "player_id": id },
        { "name": { "full": name, "ascii_first": "", "ascii_last": "" } },
        { "editorial_team_abbr": team },
        { "position_type": position_type },
        { "eligible_positions": eligible }
    ])
}

fn with_stats(meta: Value, stats: Vec<Value>) -> Value {
    json!({ "player": [
        meta,
        { "player_stats": { "0": { "coverage_type": "season", "season": "2023" }, "stats": stats } }
    ] })
}

pub fn skater_entry(id: &str, name: &str, team: &str, positions: &[&str], line: &SkaterLine) -> Value {
    with_stats(
        player_meta(id, name, team, "P", positions),
        vec![
            stat_entry("29", line.games_played),
            stat_entry("1", line.goals),
            stat_entry("2", line.assists),
            stat_entry("4", line.plus_minus),
            stat_entry("8", line.powerplay_points),
            stat_entry("14", line.shots_on_goal),
            stat_entry("16", line.faceoffs_won),
            stat_entry("31", line.hits),
            stat_entry("32", line.blocks),
        ],
    )
}

pub fn goalie_entry(id: &str, name: &str, team: &str, line: &GoalieLine) -> Value {
    with_stats(
        player_meta(id, name, team, "G", &["G"]),
        vec![
            stat_entry("18", line.games_started),
            stat_entry("19", line.wins),
            stat_entry("22", "120"),
            stat_entry("25", line.saves),
            stat_entry("26", line.save_percentage),
            stat_entry("27", line.shutouts),
        ],
    )
}

/// `players;player_keys=../stats` response.
pub fn players_response(entries: Vec<Value>) -> Value {
    json!({ "fantasy_content": { "players": wrapped_collection(entries) } })
}

/// One page of the league player listing, holding `ids`.
pub fn player_page(ids: &[String]) -> Value {
    let entries = ids
        .iter()
        .map(|id| json!({ "player": [[ { "player_key": format!("427.p.{id}") }, { "player_id": id } ]] }))
        .collect();
    json!({ "fantasy_content": { "league": [
        { "league_key": "427.l.48213" },
        { "players": wrapped_collection(entries) }
    ] } })
}

/// An exhausted listing page, encoded the way Yahoo does: `"players": []`.
pub fn empty_player_page() -> Value {
    json!({ "fantasy_content": { "league": [
        { "league_key": "427.l.48213" },
        { "players": [] }
    ] } })
}

/// `n` sequential player ids starting at `first`.
pub fn player_ids(first: usize, n: usize) -> Vec<String> {
    (first..first + n).map(|i| i.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

fn team_meta(manager_id: &str, name: &str) -> Value {
    json!([
        { "team_key": format!("427.l.48213.t.{manager_id}") },
        { "team_id": manager_id },
        { "name": name },
        [],
        { "url": "https://hockey.fantasysports.yahoo.com/" }
    ])
}

pub fn team_info_response(teams: &[(&str, &str)]) -> Value {
    let entries = teams
        .iter()
        .map(|(id, name)| json!({ "team": [team_meta(id, name)] }))
        .collect();
    json!({ "fantasy_content": { "teams": wrapped_collection(entries) } })
}

/// Season totals per manager: `(manager_id, team_name, [(stat_id, value)])`.
pub fn team_stats_response(teams: &[(&str, &str, Vec<(&str, &str)>)]) -> Value {
    let entries = teams
        .iter()
        .map(|(id, name, totals)| {
            let stats: Vec<Value> = totals.iter().map(|(sid, v)| stat_entry(sid, v)).collect();
            json!({ "team": [
                team_meta(id, name),
                { "team_stats": { "coverage_type": "season", "season": "2023", "stats": stats } }
            ] })
        })
        .collect();
    json!({ "fantasy_content": { "teams": wrapped_collection(entries) } })
}

/// Rosters per manager: `(manager_id, team_name, [player_id])`.
pub fn roster_response(teams: &[(&str, &str, Vec<&str>)]) -> Value {
    let entries = teams
        .iter()
        .map(|(id, name, players)| {
            let players: Vec<Value> = players
                .iter()
                .map(|pid| {
                    json!({ "player": [
                        [ { "player_key": format!("427.p.{pid}") }, { "player_id": pid } ],
                        { "selected_position": [ { "coverage_type": "date" }, { "position": "BN" } ] }
                    ] })
                })
                .collect();
            let players = if players.is_empty() {
                json!([])
            } else {
                wrapped_collection(players)
            };
            json!({ "team": [
                team_meta(id, name),
                { "roster": { "coverage_type": "date", "is_editable": 0, "0": { "players": players } } }
            ] })
        })
        .collect();
    json!({ "fantasy_content": { "teams": wrapped_collection(entries) } })
}
