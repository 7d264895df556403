// Configuration loading and parsing (league.toml, credentials.toml).

use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base URL of the Yahoo Fantasy Sports v2 API.
pub const DEFAULT_ENDPOINT: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub api: ApiConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    #[serde(default)]
    api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    league_id: String,
    #[serde(default)]
    season: Option<i32>,
    #[serde(default)]
    game_key: Option<String>,
    #[serde(default)]
    keepers: Vec<String>,
}

/// The public league config, with the season resolved.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub league_id: String,
    /// Year the season started in.
    pub season: i32,
    /// Game key of the season. When absent it is looked up from the API,
    /// which only knows the current season's key.
    pub game_key: Option<String>,
    /// Player names kept by their managers; excluded from the draft board.
    pub keepers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// OAuth bearer token obtained out of band. Refreshing it is not handled here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub access_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Season helpers
// ---------------------------------------------------------------------------

/// Season a given date belongs to. Hockey seasons start in the fall, so
/// anything before September counts toward the previous year's season.
pub fn season_for_date(date: NaiveDate) -> i32 {
    if date.month() >= 9 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Season in progress today (local time).
pub fn current_season() -> i32 {
    season_for_date(chrono::Local::now().date_naive())
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    load_from_dir(&base_dir.join("config"))
}

/// Load configuration from `./config` when it exists, otherwise from the
/// platform configuration directory (e.g. `~/.config/faha` on Linux).
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").join("league.toml").exists() {
        return load_config_from(&cwd);
    }

    let dirs = ProjectDirs::from("", "", "faha").ok_or_else(|| ConfigError::FileNotFound {
        path: cwd.join("config"),
    })?;
    load_from_dir(dirs.config_dir())
}

fn load_from_dir(config_dir: &Path) -> Result<Config, ConfigError> {
    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let section = league_file.league;
    let league = LeagueConfig {
        league_id: section.league_id.trim().to_string(),
        season: section.season.unwrap_or_else(current_season),
        game_key: section
            .game_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()),
        keepers: section
            .keepers
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league,
        api: league_file.api,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must not be empty".into(),
        });
    }

    if config.league.season < 1917 {
        return Err(ConfigError::ValidationError {
            field: "league.season".into(),
            message: format!("must be a season year, got {}", config.league.season),
        });
    }

    let endpoint = &config.api.endpoint;
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field: "api.endpoint".into(),
            message: format!("must be an http(s) URL, got {endpoint:?}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
