// Plain-text report printed to stdout.

use faha_hockey::draft::board::{DraftBoard, PositionGroup};
use faha_hockey::valuation::engine::{Weight, Weights};
use faha_hockey::valuation::teams::TeamValuation;

pub fn print_weights(weights: &Weights) {
    println!("Category weights");
    for (stat, weight) in weights.iter() {
        match weight {
            Weight::Linear(coefficient) => println!("  {:<18} {:>10.4}", stat.name(), coefficient),
            Weight::SavePercentageCurve {
                floor,
                ceiling,
                max_score,
            } => println!(
                "  {:<18} {:.3} -> 0, {:.3} -> {}",
                stat.name(),
                floor,
                ceiling,
                max_score
            ),
        }
    }
    println!();
}

pub fn print_rankings(ranked: &[TeamValuation]) {
    println!("Team rankings");
    for (rank, team) in ranked.iter().enumerate() {
        println!("  {:>2}. {:<30} {:>8.2}", rank + 1, team.manager.name, team.value);
    }
    println!();
}

pub fn print_board(board: &DraftBoard, depth: usize) {
    for group in PositionGroup::ALL {
        println!("{}", group.label());
        for valued in board.top(group, depth) {
            let player = &valued.player;
            println!(
                "  {:<26} {:<4} {:<10} {:>7.2}",
                player.name,
                player.team,
                player.positions.join(","),
                valued.value
            );
        }
        println!();
    }
}
