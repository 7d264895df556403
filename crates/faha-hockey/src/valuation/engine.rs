// Player valuation: per-game rates scaled by category weights.

use std::collections::BTreeMap;

use crate::error::LeagueError;
use crate::player::{GoalieStats, Player, SeasonStats, SkaterStats};
use crate::stats::Stat;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// How a category's per-game rate turns into value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    /// `value = rate * coefficient`.
    Linear(f64),
    /// Maps `[floor, ceiling]` linearly onto `[0, max_score]`. Not clamped:
    /// rates outside the band score below zero or above `max_score`.
    SavePercentageCurve {
        floor: f64,
        ceiling: f64,
        max_score: f64,
    },
}

impl Weight {
    /// `60 * (x - 0.890)`: .890 is worth nothing, .940 is worth 3.
    pub const SAVE_PERCENTAGE: Weight = Weight::SavePercentageCurve {
        floor: 0.890,
        ceiling: 0.940,
        max_score: 3.0,
    };

    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Weight::Linear(coefficient) => value * coefficient,
            Weight::SavePercentageCurve {
                floor,
                ceiling,
                max_score,
            } => max_score * ((value - floor) / (ceiling - floor)),
        }
    }
}

/// Category weights for one league.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weights {
    weights: BTreeMap<Stat, Weight>,
}

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, stat: Stat, weight: Weight) {
        self.weights.insert(stat, weight);
    }

    pub fn with(mut self, stat: Stat, weight: Weight) -> Self {
        self.set(stat, weight);
        self
    }

    pub fn get(&self, stat: Stat) -> Option<Weight> {
        self.weights.get(&stat).copied()
    }

    pub fn require(&self, stat: Stat) -> Result<Weight, LeagueError> {
        self.get(stat).ok_or(LeagueError::MissingWeight(stat))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, Weight)> + '_ {
        self.weights.iter().map(|(stat, weight)| (*stat, *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl FromIterator<(Stat, Weight)> for Weights {
    fn from_iter<I: IntoIterator<Item = (Stat, Weight)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-category contributions
// ---------------------------------------------------------------------------

/// Weighted per-game contribution of each skater category. A skater with no
/// games played contributes zero everywhere.
pub fn skater_stat_values(
    stats: &SkaterStats,
    weights: &Weights,
) -> Result<Vec<(Stat, f64)>, LeagueError> {
    if stats.games_played == 0 {
        return Ok(Stat::SKATER.iter().map(|&stat| (stat, 0.0)).collect());
    }
    let games = stats.games_played as f64;
    stats
        .categories()
        .into_iter()
        .map(|(stat, total)| Ok((stat, weights.require(stat)?.apply(total / games))))
        .collect()
}

/// Weighted contribution of each goalie category. Save percentage is already
/// a rate and goes through its weight as is; the rest are divided by games
/// started. A goalie with no starts contributes zero everywhere.
pub fn goalie_stat_values(
    stats: &GoalieStats,
    weights: &Weights,
) -> Result<Vec<(Stat, f64)>, LeagueError> {
    if stats.games_started == 0 {
        return Ok(Stat::GOALIE.iter().map(|&stat| (stat, 0.0)).collect());
    }
    let starts = stats.games_started as f64;
    let mut values = Vec::with_capacity(Stat::GOALIE.len());
    values.push((
        Stat::SavePercentage,
        weights
            .require(Stat::SavePercentage)?
            .apply(stats.save_percentage),
    ));
    for (stat, total) in stats.counting_categories() {
        values.push((stat, weights.require(stat)?.apply(total / starts)));
    }
    Ok(values)
}

pub fn stat_values(stats: &SeasonStats, weights: &Weights) -> Result<Vec<(Stat, f64)>, LeagueError> {
    match stats {
        SeasonStats::Skater(s) => skater_stat_values(s, weights),
        SeasonStats::Goalie(g) => goalie_stat_values(g, weights),
    }
}

/// Per-category contributions, largest first. For explaining a value.
pub fn stat_breakdown(stats: &SeasonStats, weights: &Weights) -> Result<Vec<(Stat, f64)>, LeagueError> {
    let mut values = stat_values(stats, weights)?;
    values.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(values)
}

// ---------------------------------------------------------------------------
// Player values
// ---------------------------------------------------------------------------

pub fn season_value(stats: &SeasonStats, weights: &Weights) -> Result<f64, LeagueError> {
    Ok(stat_values(stats, weights)?.iter().map(|(_, v)| v).sum())
}

pub fn player_value(player: &Player, weights: &Weights) -> Result<f64, LeagueError> {
    season_value(&player.stats, weights)
}

/// A player with the value computed from one set of weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedPlayer {
    pub player: Player,
    pub value: f64,
}

/// Value every player. Inputs are left untouched; any missing weight fails
/// the whole batch.
pub fn value_players(players: &[Player], weights: &Weights) -> Result<Vec<ValuedPlayer>, LeagueError> {
    players
        .iter()
        .map(|player| {
            Ok(ValuedPlayer {
                value: player_value(player, weights)?,
                player: player.clone(),
            })
        })
        .collect()
}

/// Highest value first. Stable, so equal values keep their input order.
pub fn sort_by_value(players: &mut [ValuedPlayer]) {
    players.sort_by(|a, b| b.value.total_cmp(&a.value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn unit_weights() -> Weights {
        Stat::SKATER
            .iter()
            .chain(Stat::GOALIE.iter())
            .map(|&stat| (stat, Weight::Linear(1.0)))
            .collect::<Weights>()
            .with(Stat::SavePercentage, Weight::SAVE_PERCENTAGE)
    }

    fn skater(games_played: u32) -> SkaterStats {
        SkaterStats {
            games_played,
            goals: 40,
            assists: 60,
            plus_minus: -8,
            powerplay_points: 30,
            shots_on_goal: 250,
            faceoffs_won: 600,
            hits: 50,
            blocks: 30,
        }
    }

    fn goalie(games_started: u32, save_percentage: f64) -> GoalieStats {
        GoalieStats {
            games_started,
            wins: 30,
            saves: 1500,
            save_percentage,
            shutouts: 4,
        }
    }

    fn player(id: &str, stats: SeasonStats) -> Player {
        Player {
            id: id.into(),
            name: format!("Player {id}"),
            team: "Tor".into(),
            positions: vec!["C".into()],
            stats,
        }
    }

    #[test]
    fn save_percentage_curve_anchors() {
        let curve = Weight::SAVE_PERCENTAGE;
        assert_eq!(curve.apply(0.89), 0.0);
        assert_eq!(curve.apply(0.94), 3.0);
        assert!(approx_eq(curve.apply(0.915), 1.5, 1e-9));
        // unclamped outside the band
        assert!(curve.apply(0.88) < 0.0);
        assert!(curve.apply(0.95) > 3.0);
        assert!(approx_eq(curve.apply(0.95), 60.0 * (0.95 - 0.89), 1e-9));
    }

    #[test]
    fn skater_without_games_is_worth_nothing() {
        let weights = unit_weights();
        let value = season_value(&SeasonStats::Skater(skater(0)), &weights).unwrap();
        assert_eq!(value, 0.0);
        let contributions = skater_stat_values(&skater(0), &weights).unwrap();
        assert_eq!(contributions.len(), Stat::SKATER.len());
        assert!(contributions.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn skater_contributions_are_per_game_rates_times_weight() {
        let weights = unit_weights()
            .with(Stat::Goals, Weight::Linear(1.0))
            .with(Stat::Hits, Weight::Linear(0.25));
        let stats = skater(80);
        let contributions = skater_stat_values(&stats, &weights).unwrap();

        let goals = contributions.iter().find(|(s, _)| *s == Stat::Goals).unwrap().1;
        let hits = contributions.iter().find(|(s, _)| *s == Stat::Hits).unwrap().1;
        let plus_minus = contributions.iter().find(|(s, _)| *s == Stat::PlusMinus).unwrap().1;
        assert!(approx_eq(goals, 40.0 / 80.0, 1e-12));
        assert!(approx_eq(hits, 50.0 / 80.0 * 0.25, 1e-12));
        assert!(approx_eq(plus_minus, -8.0 / 80.0, 1e-12));

        let total = season_value(&SeasonStats::Skater(stats), &weights).unwrap();
        let sum: f64 = contributions.iter().map(|(_, v)| v).sum();
        assert_eq!(total, sum);
    }

    #[test]
    fn goalie_save_percentage_term_ignores_starts() {
        let weights = unit_weights();
        let term = |starts| {
            goalie_stat_values(&goalie(starts, 0.915), &weights)
                .unwrap()
                .into_iter()
                .find(|(s, _)| *s == Stat::SavePercentage)
                .unwrap()
                .1
        };
        assert_eq!(term(10), term(60));
        assert!(approx_eq(term(10), 1.5, 1e-9));
    }

    #[test]
    fn goalie_value_adds_save_percentage_to_rates() {
        let weights = unit_weights().with(Stat::Shutouts, Weight::Linear(1.0 / 3.0));
        let value = season_value(&SeasonStats::Goalie(goalie(50, 0.92)), &weights).unwrap();
        let expected = 60.0 * (0.92 - 0.89) + 30.0 / 50.0 + 1500.0 / 50.0 + 4.0 / 50.0 / 3.0;
        assert!(approx_eq(value, expected, 1e-9));
    }

    #[test]
    fn goalie_without_starts_is_worth_nothing() {
        let weights = unit_weights();
        let contributions = goalie_stat_values(&goalie(0, 0.95), &weights).unwrap();
        assert!(contributions.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn missing_weight_is_reported() {
        let weights = Weights::new().with(Stat::Goals, Weight::Linear(1.0));
        match skater_stat_values(&skater(10), &weights) {
            Err(LeagueError::MissingWeight(stat)) => assert_eq!(stat, Stat::Assists),
            other => panic!("expected MissingWeight, got: {other:?}"),
        }
    }

    #[test]
    fn breakdown_is_sorted_descending() {
        let weights = unit_weights();
        let breakdown = stat_breakdown(&SeasonStats::Skater(skater(80)), &weights).unwrap();
        assert_eq!(breakdown[0].0, Stat::FaceoffsWon);
        assert!(breakdown.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn value_players_leaves_input_untouched() {
        let weights = unit_weights();
        let players = vec![
            player("1", SeasonStats::Skater(skater(80))),
            player("2", SeasonStats::Goalie(goalie(50, 0.92))),
        ];
        let snapshot = players.clone();
        let valued = value_players(&players, &weights).unwrap();
        assert_eq!(players, snapshot);
        assert_eq!(valued.len(), 2);
        assert_eq!(valued[0].player.id, "1");
        assert!(approx_eq(
            valued[1].value,
            player_value(&players[1], &weights).unwrap(),
            1e-12
        ));
    }

    #[test]
    fn sort_by_value_is_stable_for_ties() {
        let stats = SeasonStats::Skater(skater(10));
        let mut valued: Vec<ValuedPlayer> = [("a", 1.0), ("b", 3.0), ("c", 1.0), ("d", 3.0)]
            .into_iter()
            .map(|(id, value)| ValuedPlayer {
                player: player(id, stats.clone()),
                value,
            })
            .collect();
        sort_by_value(&mut valued);
        let order: Vec<&str> = valued.iter().map(|v| v.player.id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn sort_by_value_orders_around_nan() {
        let stats = SeasonStats::Goalie(goalie(10, 0.9));
        let mut valued: Vec<ValuedPlayer> = [("a", 1.0), ("b", f64::NAN), ("c", 3.0), ("d", 1.0)]
            .into_iter()
            .map(|(id, value)| ValuedPlayer {
                player: player(id, stats.clone()),
                value,
            })
            .collect();
        sort_by_value(&mut valued);
        let order: Vec<&str> = valued
            .iter()
            .filter(|v| !v.value.is_nan())
            .map(|v| v.player.id.as_str())
            .collect();
        assert_eq!(order, vec!["c", "a", "d"]);
        assert_eq!(valued.len(), 4);
    }
}
