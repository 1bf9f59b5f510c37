//! Table loader: reads the raw table set from a [TableSource] and decodes it
//! into typed documents. The whole set loads or nothing does.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::data::raw::{
    Entries, RawBattleEquip, RawCharacter, RawFavorTable, RawHandbookTable, RawSkill, RawTeam,
    RawUniEquipTable,
};

pub const DEFAULT_DATA_DIR: &str = "data_cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableId {
    Character,
    Handbook,
    Skill,
    Favor,
    UniEquip,
    BattleEquip,
    HandbookTeam,
}

impl TableId {
    pub const ALL: [TableId; 7] = [
        TableId::Character,
        TableId::Handbook,
        TableId::Skill,
        TableId::Favor,
        TableId::UniEquip,
        TableId::BattleEquip,
        TableId::HandbookTeam,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Character => "character_table.json",
            Self::Handbook => "handbook_info_table.json",
            Self::Skill => "skill_table.json",
            Self::Favor => "favor_table.json",
            Self::UniEquip => "uniequip_table.json",
            Self::BattleEquip => "battle_equip_table.json",
            Self::HandbookTeam => "handbook_team_table.json",
        }
    }

    /// The team table only feeds the nation name map; without it the map is empty.
    pub fn is_required(self) -> bool {
        !matches!(self, Self::HandbookTeam)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("required table '{}' is missing", .0.file_name())]
    Missing(TableId),
    #[error("table '{}' is malformed: {source}", .table.file_name())]
    Malformed {
        table: TableId,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read table '{}': {source}", .table.file_name())]
    Io {
        table: TableId,
        #[source]
        source: io::Error,
    },
}

/// Supplies raw bytes per table. `Ok(None)` means the table does not exist.
pub trait TableSource: Send + Sync {
    fn read(&self, table: TableId) -> io::Result<Option<Vec<u8>>>;

    /// Human-readable origin, recorded with each snapshot.
    fn describe(&self) -> String;
}

/// Table files named by [TableId::file_name] inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TableSource for DirectorySource {
    fn read(&self, table: TableId) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.root.join(table.file_name())) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory table set, used by tests and by callers that fetch tables themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<TableId, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: TableId, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(table, bytes.into());
        self
    }

    pub fn insert_json(&mut self, table: TableId, document: &serde_json::Value) -> &mut Self {
        self.insert(table, document.to_string())
    }

    pub fn remove(&mut self, table: TableId) -> &mut Self {
        self.tables.remove(&table);
        self
    }
}

impl TableSource for MemorySource {
    fn read(&self, table: TableId) -> io::Result<Option<Vec<u8>>> {
        Ok(self.tables.get(&table).cloned())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Row counts for one loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: TableId,
    pub file: &'static str,
    pub rows: usize,
    pub rejected: usize,
}

impl TableSummary {
    fn of<T>(table: TableId, entries: &Entries<T>) -> Self {
        Self {
            table,
            file: table.file_name(),
            rows: entries.len(),
            rejected: entries.rejected().len(),
        }
    }
}

/// The complete decoded table set for one ingestion cycle.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub characters: Entries<RawCharacter>,
    pub handbook: RawHandbookTable,
    pub skills: Entries<RawSkill>,
    pub favor: RawFavorTable,
    pub uniequip: RawUniEquipTable,
    pub battle_equip: Entries<RawBattleEquip>,
    pub teams: Option<Entries<RawTeam>>,
}

impl TableSet {
    pub fn summary(&self) -> Vec<TableSummary> {
        let mut summary = vec![
            TableSummary::of(TableId::Character, &self.characters),
            TableSummary::of(TableId::Handbook, &self.handbook.handbook_dict),
            TableSummary::of(TableId::Skill, &self.skills),
            TableSummary {
                table: TableId::Favor,
                file: TableId::Favor.file_name(),
                rows: self.favor.favor_frames.len(),
                rejected: 0,
            },
            TableSummary::of(TableId::UniEquip, &self.uniequip.equip_dict),
            TableSummary::of(TableId::BattleEquip, &self.battle_equip),
        ];
        if let Some(teams) = &self.teams {
            summary.push(TableSummary::of(TableId::HandbookTeam, teams));
        }
        summary
    }
}

fn fetch(source: &dyn TableSource, table: TableId) -> Result<Option<Vec<u8>>, TableError> {
    source
        .read(table)
        .map_err(|source| TableError::Io { table, source })
}

fn decode<T: DeserializeOwned>(table: TableId, bytes: &[u8]) -> Result<T, TableError> {
    serde_json::from_slice(bytes).map_err(|source| TableError::Malformed { table, source })
}

/// Read and decode every table. Presence of all required tables is checked
/// before anything is decoded.
pub fn load_tables(source: &dyn TableSource) -> Result<TableSet, TableError> {
    let mut raw = HashMap::new();
    for table in TableId::ALL {
        match fetch(source, table)? {
            Some(bytes) => {
                raw.insert(table, bytes);
            }
            None if table.is_required() => return Err(TableError::Missing(table)),
            None => {}
        }
    }

    let required = |table: TableId| raw.get(&table).ok_or(TableError::Missing(table));

    Ok(TableSet {
        characters: decode(TableId::Character, required(TableId::Character)?)?,
        handbook: decode(TableId::Handbook, required(TableId::Handbook)?)?,
        skills: decode(TableId::Skill, required(TableId::Skill)?)?,
        favor: decode(TableId::Favor, required(TableId::Favor)?)?,
        uniequip: decode(TableId::UniEquip, required(TableId::UniEquip)?)?,
        battle_equip: decode(TableId::BattleEquip, required(TableId::BattleEquip)?)?,
        teams: raw
            .get(&TableId::HandbookTeam)
            .map(|bytes| decode(TableId::HandbookTeam, bytes))
            .transpose()?,
    })
}
