// Stat taxonomy and the category resolver (stat name <-> league stat id).

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::LeagueError;
use crate::payload::{as_flag, as_text, collection_entries, find_attr};

// ---------------------------------------------------------------------------
// Stat
// ---------------------------------------------------------------------------

/// Every stat the valuation engine reads. Names are the ones Yahoo uses in
/// league settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stat {
    GamesPlayed,
    Goals,
    Assists,
    PlusMinus,
    PowerplayPoints,
    ShotsOnGoal,
    FaceoffsWon,
    Hits,
    Blocks,
    GamesStarted,
    Wins,
    Saves,
    SavePercentage,
    Shutouts,
}

impl Stat {
    /// Skater categories that are valued (games played is the denominator).
    pub const SKATER: [Stat; 8] = [
        Stat::Goals,
        Stat::Assists,
        Stat::PlusMinus,
        Stat::PowerplayPoints,
        Stat::ShotsOnGoal,
        Stat::FaceoffsWon,
        Stat::Hits,
        Stat::Blocks,
    ];

    /// Goalie categories that are valued (games started is the denominator).
    pub const GOALIE: [Stat; 4] = [
        Stat::Wins,
        Stat::Saves,
        Stat::SavePercentage,
        Stat::Shutouts,
    ];

    pub const ALL: [Stat; 14] = [
        Stat::GamesPlayed,
        Stat::Goals,
        Stat::Assists,
        Stat::PlusMinus,
        Stat::PowerplayPoints,
        Stat::ShotsOnGoal,
        Stat::FaceoffsWon,
        Stat::Hits,
        Stat::Blocks,
        Stat::GamesStarted,
        Stat::Wins,
        Stat::Saves,
        Stat::SavePercentage,
        Stat::Shutouts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::GamesPlayed => "Games Played",
            Stat::Goals => "Goals",
            Stat::Assists => "Assists",
            Stat::PlusMinus => "Plus/Minus",
            Stat::PowerplayPoints => "Powerplay Points",
            Stat::ShotsOnGoal => "Shots on Goal",
            Stat::FaceoffsWon => "Faceoffs Won",
            Stat::Hits => "Hits",
            Stat::Blocks => "Blocks",
            Stat::GamesStarted => "Games Started",
            Stat::Wins => "Wins",
            Stat::Saves => "Saves",
            Stat::SavePercentage => "Save Percentage",
            Stat::Shutouts => "Shutouts",
        }
    }

    pub fn from_name(name: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|stat| stat.name() == name)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifiers of stats the league settings never list but player stat
/// blocks always carry.
pub const FIXED_STAT_IDS: [(&str, &str); 4] = [
    ("Games Played", "29"),
    ("Games Started", "18"),
    ("Minutes", "28"),
    ("Time on Ice", "33"),
];

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatGroup {
    Offense,
    Goaltending,
}

impl StatGroup {
    pub fn from_tag(tag: &str) -> Option<StatGroup> {
        match tag {
            "offense" => Some(StatGroup::Offense),
            "goaltending" => Some(StatGroup::Goaltending),
            _ => None,
        }
    }
}

/// One scored category from the league settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCategory {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub group: StatGroup,
}

impl StatCategory {
    /// Parse one `{"stat": {...}}` descriptor. Returns `Ok(None)` for
    /// display-only categories and groups the league doesn't score.
    pub fn from_descriptor(descriptor: &Value) -> Result<Option<StatCategory>, LeagueError> {
        let stat = descriptor.get("stat").unwrap_or(descriptor);

        if stat.get("is_only_display_stat").is_some_and(as_flag) {
            return Ok(None);
        }

        let text = |key: &str| {
            stat.get(key)
                .and_then(as_text)
                .ok_or_else(|| LeagueError::FieldNotFound(format!("stat_categories.{key}")))
        };
        let id = text("stat_id")?;
        let name = text("name")?;
        let display_name = stat
            .get("display_name")
            .and_then(as_text)
            .unwrap_or_else(|| name.clone());

        let Some(group) = stat
            .get("group")
            .and_then(Value::as_str)
            .and_then(StatGroup::from_tag)
        else {
            debug!(%name, "ignoring stat category outside offense/goaltending");
            return Ok(None);
        };

        Ok(Some(StatCategory {
            id,
            name,
            display_name,
            group,
        }))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Maps stat names to the identifiers used in stat payloads and back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatCategoryResolver {
    categories: Vec<StatCategory>,
}

impl StatCategoryResolver {
    pub fn new(categories: Vec<StatCategory>) -> Self {
        Self { categories }
    }

    /// Build from the settings' `stat_categories` object (or its `stats`
    /// list directly).
    pub fn from_stat_categories(stat_categories: &Value) -> Result<Self, LeagueError> {
        let stats = find_attr(stat_categories, "stats").unwrap_or(stat_categories);
        let mut categories = Vec::new();
        for descriptor in collection_entries(stats) {
            if let Some(category) = StatCategory::from_descriptor(descriptor)? {
                categories.push(category);
            }
        }
        Ok(Self::new(categories))
    }

    /// Scored categories in settings order.
    pub fn categories(&self) -> &[StatCategory] {
        &self.categories
    }

    /// Identifier of a stat name. League settings win over the fixed table.
    pub fn id_for(&self, name: &str) -> Result<&str, LeagueError> {
        if let Some(category) = self.categories.iter().find(|c| c.name == name) {
            return Ok(&category.id);
        }
        FIXED_STAT_IDS
            .iter()
            .find(|(fixed, _)| *fixed == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| LeagueError::UnknownStat(name.to_string()))
    }

    pub fn id_for_stat(&self, stat: Stat) -> Result<&str, LeagueError> {
        self.id_for(stat.name())
    }

    pub fn name_for(&self, id: &str) -> Option<&str> {
        if let Some(category) = self.categories.iter().find(|c| c.id == id) {
            return Some(&category.name);
        }
        FIXED_STAT_IDS
            .iter()
            .find(|(_, fixed)| *fixed == id)
            .map(|(name, _)| *name)
    }

    /// Scored categories' id -> name, across both groups.
    pub fn flattened(&self) -> BTreeMap<&str, &str> {
        self.categories
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect()
    }

    /// Scored categories' id -> name, per group.
    pub fn grouped(&self) -> BTreeMap<StatGroup, BTreeMap<&str, &str>> {
        let mut groups: BTreeMap<StatGroup, BTreeMap<&str, &str>> = BTreeMap::new();
        for c in &self.categories {
            groups
                .entry(c.group)
                .or_default()
                .insert(c.id.as_str(), c.name.as_str());
        }
        groups
    }
}
