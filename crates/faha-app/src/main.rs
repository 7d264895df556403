// faha entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout is for the report)
// 2. Load config
// 3. Resolve the game key and connect to the league
// 4. Derive category weights from team totals
// 5. Rank teams
// 6. Build the draft board from taken players, minus keepers

mod report;

use anyhow::Context;
use faha_core::config;
use faha_core::transport::HttpTransport;
use faha_hockey::draft::board::DraftBoard;
use faha_hockey::league::League;
use faha_hockey::valuation::engine::value_players;
use faha_hockey::yahoo::{LeagueKeys, YahooApi};
use tracing::{info, warn};

/// Players shown per draft-board table.
const BOARD_DEPTH: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("faha starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, season={}, {} keepers",
        config.league.league_id,
        config.league.season,
        config.league.keepers.len()
    );

    // 3. Resolve the game key and connect
    let api = YahooApi::new(HttpTransport::from_config(&config));
    let game_key = match &config.league.game_key {
        Some(key) => key.clone(),
        None => {
            let game = League::current_game(&api)
                .await
                .context("failed to look up the current NHL game")?;
            if game.season != config.league.season {
                warn!(
                    configured = config.league.season,
                    current = game.season,
                    "no game_key configured; using the current season's game"
                );
            }
            game.game_key
        }
    };
    let keys = LeagueKeys::new(game_key, config.league.league_id.clone());
    let mut league = League::connect(api, keys)
        .await
        .context("failed to load league settings")?;

    // 4. Weights
    let weights = league
        .stat_weights()
        .await
        .context("failed to derive category weights")?;
    report::print_weights(&weights);

    // 5. Team rankings
    let ranked = league
        .team_values(&weights)
        .await
        .context("failed to value teams")?;
    report::print_rankings(&ranked);

    // 6. Draft board
    let taken = league
        .taken_players(None)
        .await
        .context("failed to fetch taken players")?
        .to_vec();
    let mut board = DraftBoard::new(value_players(&taken, &weights)?);
    for name in board.remove_keepers(&config.league.keepers) {
        warn!(keeper = %name, "keeper is not on the draft board");
    }
    report::print_board(&board, BOARD_DEPTH);

    info!("faha done");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("faha.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("faha=info,faha_core=info,faha_hockey=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
