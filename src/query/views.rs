//! Serialized shapes of a filter result, borrowed from the snapshot.

use serde::Serialize;

use crate::data::character::{CharacterRecord, HandbookProfile, Module, Position, Rarity, Skill};
use crate::query::ResolvedHit;
use crate::stats::AttributeVector;

/// Record plus its resolved attributes.
#[derive(Debug, Serialize)]
pub struct FullView<'a> {
    #[serde(flatten)]
    pub record: &'a CharacterRecord,
    pub attributes: AttributeVector,
}

/// Descriptive fields only; no progression data.
#[derive(Debug, Serialize)]
pub struct SummaryView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub appellation: Option<&'a str>,
    pub display_number: Option<&'a str>,
    pub profession: &'a str,
    pub sub_profession: &'a str,
    pub rarity: Rarity,
    pub position: Position,
    pub nation_id: Option<&'a str>,
    pub group_id: Option<&'a str>,
    pub team_id: Option<&'a str>,
    pub tags: &'a [String],
    pub item_usage: Option<&'a str>,
    pub item_desc: Option<&'a str>,
    pub item_obtain_approach: Option<&'a str>,
    pub can_use_general_potential_item: bool,
    pub potential_item_id: Option<&'a str>,
    pub is_not_obtainable: bool,
    pub is_sp_char: bool,
    pub max_potential_level: u32,
    #[serde(flatten)]
    pub profile: &'a HandbookProfile,
}

#[derive(Debug, Serialize)]
pub struct AttributesView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub attributes: AttributeVector,
}

#[derive(Debug, Serialize)]
pub struct SkillsView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub skills: &'a [Skill],
}

#[derive(Debug, Serialize)]
pub struct ModulesView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub modules: &'a [Module],
}

impl<'a> From<&'a ResolvedHit> for FullView<'a> {
    fn from(hit: &'a ResolvedHit) -> Self {
        Self {
            record: &hit.record,
            attributes: hit.attributes,
        }
    }
}

impl<'a> From<&'a ResolvedHit> for AttributesView<'a> {
    fn from(hit: &'a ResolvedHit) -> Self {
        Self {
            id: &hit.record.id,
            name: &hit.record.name,
            attributes: hit.attributes,
        }
    }
}

impl<'a> From<&'a CharacterRecord> for SummaryView<'a> {
    fn from(record: &'a CharacterRecord) -> Self {
        Self {
            id: &record.id,
            name: &record.name,
            description: record.description.as_deref(),
            appellation: record.appellation.as_deref(),
            display_number: record.display_number.as_deref(),
            profession: &record.profession,
            sub_profession: &record.sub_profession,
            rarity: record.rarity,
            position: record.position,
            nation_id: record.nation_id.as_deref(),
            group_id: record.group_id.as_deref(),
            team_id: record.team_id.as_deref(),
            tags: &record.tags,
            item_usage: record.item_usage.as_deref(),
            item_desc: record.item_desc.as_deref(),
            item_obtain_approach: record.item_obtain_approach.as_deref(),
            can_use_general_potential_item: record.can_use_general_potential_item,
            potential_item_id: record.potential_item_id.as_deref(),
            is_not_obtainable: record.is_not_obtainable,
            is_sp_char: record.is_sp_char,
            max_potential_level: record.max_potential_level,
            profile: &record.profile,
        }
    }
}

impl<'a> From<&'a CharacterRecord> for SkillsView<'a> {
    fn from(record: &'a CharacterRecord) -> Self {
        Self {
            id: &record.id,
            name: &record.name,
            skills: &record.skills,
        }
    }
}

impl<'a> From<&'a CharacterRecord> for ModulesView<'a> {
    fn from(record: &'a CharacterRecord) -> Self {
        Self {
            id: &record.id,
            name: &record.name,
            modules: &record.modules,
        }
    }
}
