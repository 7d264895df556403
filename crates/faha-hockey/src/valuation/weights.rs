// Category weights derived from how the league's teams actually perform.
//
// Each category is scaled so that what the top teams accumulate in it is
// worth as much as what they accumulate in goals.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::LeagueError;
use crate::stats::Stat;
use crate::valuation::engine::{Weight, Weights};

/// Plus/minus is too noisy to scale from team totals.
pub const PLUS_MINUS_WEIGHT: f64 = 1.0 / 3.0;

/// Shutouts are rare enough that the derived weight overstates them.
pub const SHUTOUT_DAMPING: f64 = 3.0;

/// Reference magnitudes below this are treated as zero.
const REFERENCE_EPSILON: f64 = 1e-9;

/// Mean of the two largest values. One value counts as a pair with zero;
/// no values give zero.
pub fn top_two_average(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.iter().take(2).sum::<f64>() / 2.0
}

/// Weights from each category's season totals across managers.
///
/// `weight(c) = top_two_average(goals) / top_two_average(c)`, then the fixed
/// overrides: plus/minus is [`PLUS_MINUS_WEIGHT`], save percentage uses
/// [`Weight::SAVE_PERCENTAGE`], shutouts are divided by [`SHUTOUT_DAMPING`].
pub fn derive_weights(totals: &BTreeMap<Stat, Vec<f64>>) -> Result<Weights, LeagueError> {
    let goals = totals
        .get(&Stat::Goals)
        .ok_or(LeagueError::MissingCategory(Stat::Goals))?;
    let baseline = top_two_average(goals);
    if baseline.abs() < REFERENCE_EPSILON {
        return Err(LeagueError::DegenerateBaseline(Stat::Goals));
    }

    let mut weights = Weights::new();
    for (&stat, values) in totals {
        let reference = top_two_average(values);
        let weight = if reference.abs() < REFERENCE_EPSILON {
            warn!(%stat, "no team has accumulated any {stat}; weighting it at zero");
            0.0
        } else {
            baseline / reference
        };
        weights.set(stat, Weight::Linear(weight));
    }

    weights.set(Stat::PlusMinus, Weight::Linear(PLUS_MINUS_WEIGHT));
    weights.set(Stat::SavePercentage, Weight::SAVE_PERCENTAGE);
    if let Some(Weight::Linear(shutouts)) = weights.get(Stat::Shutouts) {
        weights.set(Stat::Shutouts, Weight::Linear(shutouts / SHUTOUT_DAMPING));
    }

    for (stat, weight) in weights.iter() {
        debug!(%stat, ?weight, "derived weight");
    }
    Ok(weights)
}
