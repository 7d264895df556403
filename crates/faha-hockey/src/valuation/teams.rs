// Team values from the values of rostered players.

use crate::league::Manager;
use crate::player::PositionClass;
use crate::valuation::engine::ValuedPlayer;

// A lineup starts 11 skaters and 2 goalies. The 8:4 split approximates that
// ratio; it is not exact.
const SKATER_SHARE: f64 = 8.0;
const GOALIE_SHARE: f64 = 4.0;
const TOTAL_SHARE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TeamValuation {
    pub manager: Manager,
    pub value: f64,
}

/// `skater_sum * 8/12 + goalie_sum * 4/12`.
pub fn combine(skater_sum: f64, goalie_sum: f64) -> f64 {
    skater_sum * SKATER_SHARE / TOTAL_SHARE + goalie_sum * GOALIE_SHARE / TOTAL_SHARE
}

/// Sum of skater and goalie values, weighted by [`combine`].
pub fn team_value(players: &[ValuedPlayer]) -> f64 {
    let (mut skaters, mut goalies) = (0.0, 0.0);
    for valued in players {
        match valued.player.position_class() {
            PositionClass::Skater => skaters += valued.value,
            PositionClass::Goalie => goalies += valued.value,
        }
    }
    combine(skaters, goalies)
}

/// Team values, best first. Equal values keep the order managers were given in.
pub fn rank_teams(teams: Vec<(Manager, Vec<ValuedPlayer>)>) -> Vec<TeamValuation> {
    let mut ranked: Vec<TeamValuation> = teams
        .into_iter()
        .map(|(manager, players)| TeamValuation {
            value: team_value(&players),
            manager,
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}
