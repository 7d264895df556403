// Draft board: valued players split into positional tables.

use std::collections::BTreeMap;

use crate::valuation::engine::{sort_by_value, ValuedPlayer};

/// Board table a player can appear in. A player eligible at several
/// positions appears in each matching table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PositionGroup {
    Center,
    Winger,
    Defense,
    Goalie,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 4] = [
        PositionGroup::Center,
        PositionGroup::Winger,
        PositionGroup::Defense,
        PositionGroup::Goalie,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PositionGroup::Center => "Center",
            PositionGroup::Winger => "Winger",
            PositionGroup::Defense => "Defense",
            PositionGroup::Goalie => "Goalie",
        }
    }

    /// Whether an eligible position (Yahoo abbreviation) belongs to this group.
    pub fn accepts(&self, position: &str) -> bool {
        match self {
            PositionGroup::Center => position == "C",
            PositionGroup::Winger => matches!(position, "LW" | "RW" | "W"),
            PositionGroup::Defense => position == "D",
            PositionGroup::Goalie => position == "G",
        }
    }

    fn includes(&self, valued: &ValuedPlayer) -> bool {
        valued.player.positions.iter().any(|p| self.accepts(p))
    }
}

/// Positional tables, each sorted by value, with a stack of removed players
/// so removals can be undone.
#[derive(Debug, Clone, Default)]
pub struct DraftBoard {
    tables: BTreeMap<PositionGroup, Vec<ValuedPlayer>>,
    removed: Vec<ValuedPlayer>,
}

impl DraftBoard {
    pub fn new(players: Vec<ValuedPlayer>) -> Self {
        let mut tables: BTreeMap<PositionGroup, Vec<ValuedPlayer>> =
            PositionGroup::ALL.iter().map(|&g| (g, Vec::new())).collect();
        for valued in players {
            for (group, table) in tables.iter_mut() {
                if group.includes(&valued) {
                    table.push(valued.clone());
                }
            }
        }
        for table in tables.values_mut() {
            sort_by_value(table);
        }
        Self {
            tables,
            removed: Vec::new(),
        }
    }

    pub fn table(&self, group: PositionGroup) -> &[ValuedPlayer] {
        self.tables.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    /// The `n` most valuable players left in a table.
    pub fn top(&self, group: PositionGroup, n: usize) -> &[ValuedPlayer] {
        let table = self.table(group);
        &table[..n.min(table.len())]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<&ValuedPlayer> {
        let name = name.trim();
        self.tables
            .values()
            .flat_map(|table| table.iter())
            .find(|v| v.player.name == name)
    }

    /// Take a player (drafted or kept) off every table. Returns false when
    /// no player with that name is on the board.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(found) = self.find(name).cloned() else {
            return false;
        };
        for table in self.tables.values_mut() {
            table.retain(|v| v.player.id != found.player.id);
        }
        self.removed.push(found);
        true
    }

    /// Remove every keeper. Returns the names that were not on the board.
    pub fn remove_keepers(&mut self, keepers: &[String]) -> Vec<String> {
        keepers
            .iter()
            .filter(|name| !self.remove(name))
            .cloned()
            .collect()
    }

    /// Put the most recently removed player back.
    pub fn undo(&mut self) -> Option<&ValuedPlayer> {
        let restored = self.removed.pop()?;
        for (group, table) in self.tables.iter_mut() {
            if group.includes(&restored) {
                table.push(restored.clone());
                sort_by_value(table);
            }
        }
        self.tables
            .values()
            .flat_map(|table| table.iter())
            .find(|v| v.player.id == restored.player.id)
    }

    /// Removed players, oldest first.
    pub fn removed(&self) -> &[ValuedPlayer] {
        &self.removed
    }
}
