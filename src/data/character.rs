//! Normalized, self-contained character records. Built once per ingestion
//! cycle and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::stats::AttributeType;
use crate::template::Blackboard;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub appellation: Option<String>,
    pub display_number: Option<String>,
    pub profession: String,
    pub sub_profession: String,
    pub rarity: Rarity,
    pub position: Position,
    pub nation_id: Option<String>,
    pub group_id: Option<String>,
    pub team_id: Option<String>,
    pub tags: Vec<String>,
    pub item_usage: Option<String>,
    pub item_desc: Option<String>,
    pub item_obtain_approach: Option<String>,
    pub can_use_general_potential_item: bool,
    pub potential_item_id: Option<String>,
    pub is_not_obtainable: bool,
    pub is_sp_char: bool,
    pub max_potential_level: u32,
    #[serde(flatten)]
    pub profile: HandbookProfile,
    /// One per elite tier; index 0 is the base tier. Never empty.
    pub phases: Vec<Phase>,
    pub favor_keyframes: Vec<Keyframe>,
    pub potential_ranks: Vec<PotentialRank>,
    pub skills: Vec<Skill>,
    pub modules: Vec<Module>,
    pub tokens: Vec<Token>,
}

impl CharacterRecord {
    pub fn max_elite(&self) -> usize {
        self.phases.len().saturating_sub(1)
    }

    pub fn phase(&self, elite: usize) -> Option<&Phase> {
        self.phases.get(elite)
    }

    pub fn potential_rank_count(&self) -> usize {
        self.potential_ranks.len()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own.to_lowercase() == tag.to_lowercase())
    }
}

/// Fields pulled out of the handbook basic file (`【性别】…` lines).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandbookProfile {
    pub gender: Option<String>,
    pub birth_place: Option<String>,
    pub race: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    Tier5,
    Tier6,
}

impl Rarity {
    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Tier1),
            2 => Some(Self::Tier2),
            3 => Some(Self::Tier3),
            4 => Some(Self::Tier4),
            5 => Some(Self::Tier5),
            6 => Some(Self::Tier6),
            _ => None,
        }
    }

    /// Parse the `TIER_n` code.
    pub fn from_code(code: &str) -> Option<Self> {
        code.trim()
            .strip_prefix("TIER_")
            .and_then(|tier| tier.parse::<u8>().ok())
            .and_then(Self::from_tier)
    }

    pub fn tier(self) -> u8 {
        match self {
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
            Self::Tier4 => 4,
            Self::Tier5 => 5,
            Self::Tier6 => 6,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIER_{}", self.tier())
    }
}

impl Serialize for Rarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Deployment position. Serialized as its upstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Melee,
    Ranged,
    All,
    /// `NONE`, and any code upstream has not used before.
    None,
}

impl Position {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "MELEE" => Self::Melee,
            "RANGED" => Self::Ranged,
            "ALL" => Self::All,
            _ => Self::None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Melee => "MELEE",
            Self::Ranged => "RANGED",
            Self::All => "ALL",
            Self::None => "NONE",
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    pub elite: usize,
    pub max_level: u32,
    /// Level-ascending anchors bounding this tier's interpolation domain.
    pub keyframes: Vec<Keyframe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyframe {
    pub level: u32,
    pub stats: StatFrame,
}

/// One keyframe's stat block. Missing upstream fields take the defaults of
/// [StatFrame::default] (speed-like fields default to their neutral value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase"))]
pub struct StatFrame {
    pub max_hp: f64,
    pub atk: f64,
    pub def: f64,
    pub magic_resistance: f64,
    pub cost: f64,
    pub block_cnt: f64,
    pub move_speed: f64,
    pub attack_speed: f64,
    pub base_attack_time: f64,
    pub respawn_time: f64,
    pub hp_recovery_per_sec: f64,
    pub sp_recovery_per_sec: f64,
    pub max_deploy_count: f64,
    pub max_deck_stack_cnt: f64,
    pub taunt_level: f64,
    pub mass_level: f64,
    pub base_force_level: f64,
    pub stun_immune: bool,
    pub silence_immune: bool,
    pub sleep_immune: bool,
    pub frozen_immune: bool,
    pub levitate_immune: bool,
}

impl Default for StatFrame {
    fn default() -> Self {
        Self {
            max_hp: 0.0,
            atk: 0.0,
            def: 0.0,
            magic_resistance: 0.0,
            cost: 0.0,
            block_cnt: 0.0,
            move_speed: 1.0,
            attack_speed: 100.0,
            base_attack_time: 1.0,
            respawn_time: 0.0,
            hp_recovery_per_sec: 0.0,
            sp_recovery_per_sec: 0.0,
            max_deploy_count: 0.0,
            max_deck_stack_cnt: 0.0,
            taunt_level: 0.0,
            mass_level: 0.0,
            base_force_level: 0.0,
            stun_immune: false,
            silence_immune: false,
            sleep_immune: false,
            frozen_immune: false,
            levitate_immune: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialRank {
    /// Displayed rank number; the first listed entry is rank 2.
    pub rank: u32,
    pub label: String,
    pub description: Option<String>,
    pub bonus: Option<AttributeDelta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeDelta {
    pub attribute: AttributeType,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub id: String,
    pub levels: Vec<SkillLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillLevel {
    pub level: SkillRank,
    pub name: Option<String>,
    pub description: String,
    pub sp_cost: u32,
    pub initial_sp: u32,
    pub duration: f64,
    pub blackboard: Blackboard,
}

/// Skill level label: ordinary levels 1..=7, then mastery levels from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillRank {
    Level(u8),
    Mastery(u8),
}

impl SkillRank {
    const ORDINARY_LEVELS: usize = 7;

    pub fn from_index(index: usize) -> Self {
        if index < Self::ORDINARY_LEVELS {
            Self::Level((index + 1) as u8)
        } else {
            Self::Mastery((index + 1 - Self::ORDINARY_LEVELS) as u8)
        }
    }
}

impl fmt::Display for SkillRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => write!(f, "{level}"),
            Self::Mastery(rank) => write!(f, "专{rank}"),
        }
    }
}

impl Serialize for SkillRank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub type_icon: String,
    pub type_name: String,
    pub levels: Vec<ModuleLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleLevel {
    pub level: u32,
    pub attributes: Blackboard,
    pub trait_upgrade: Option<String>,
    pub talent_upgrade: Option<String>,
}

/// A summon or deployable unit a character spawns through a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub profession: String,
    pub sub_profession: String,
}
