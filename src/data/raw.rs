//! Raw game-table shapes as they appear in the upstream JSON excel dumps.
//! Only the fields the normalizer reads are modelled; everything is defaulted
//! so that upstream additions never break decoding.

use std::collections::HashMap;
use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::data::character::StatFrame;

/// Accept `null` wherever a list is expected.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An id-keyed table decoded entry by entry. Entries that do not match `T`
/// are kept aside in [Entries::rejected] instead of failing the whole table.
#[derive(Debug, Clone)]
pub struct Entries<T> {
    items: Vec<(String, T)>,
    index: HashMap<String, usize>,
    rejected: Vec<RejectedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub id: String,
    pub reason: String,
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> Entries<T> {
    pub fn from_map(raw: Map<String, Value>) -> Self {
        let mut entries = Self::default();
        for (id, value) in raw {
            match serde_json::from_value::<T>(value) {
                Ok(item) => {
                    entries.index.insert(id.clone(), entries.items.len());
                    entries.items.push((id, item));
                }
                Err(err) => entries.rejected.push(RejectedEntry {
                    id,
                    reason: err.to_string(),
                }),
            }
        }
        entries
    }
}

impl<T> Entries<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.items[slot].1)
    }

    /// Entries in document order.
    pub fn items(&self) -> &[(String, T)] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entries<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(raw))
    }
}

// ----- character_table.json -----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub can_use_general_potential_item: bool,
    #[serde(default)]
    pub potential_item_id: Option<String>,
    #[serde(default)]
    pub nation_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub display_number: Option<String>,
    #[serde(default)]
    pub appellation: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub item_usage: Option<String>,
    #[serde(default)]
    pub item_desc: Option<String>,
    #[serde(default)]
    pub item_obtain_approach: Option<String>,
    #[serde(default)]
    pub is_not_obtainable: bool,
    #[serde(default)]
    pub is_sp_char: bool,
    #[serde(default)]
    pub max_potential_level: u32,
    #[serde(default)]
    pub rarity: Option<RawRarity>,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub sub_profession_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phases: Vec<RawPhase>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<RawSkillRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub favor_key_frames: Vec<RawKeyFrame>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub potential_ranks: Vec<RawPotentialRank>,
}

/// Rarity appears as `"TIER_6"` in current dumps and as a zero-based integer in older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRarity {
    Tier(String),
    Index(u8),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhase {
    #[serde(default)]
    pub max_level: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes_key_frames: Vec<RawKeyFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawKeyFrame {
    pub level: u32,
    #[serde(default)]
    pub data: StatFrame,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSkillRef {
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub override_token_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPotentialRank {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buff: Option<RawBuff>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBuff {
    #[serde(default)]
    pub attributes: Option<RawBuffAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuffAttributes {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attribute_modifiers: Vec<RawAttributeModifier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributeModifier {
    pub attribute_type: RawAttributeType,
    #[serde(default)]
    pub value: f64,
}

/// Attribute type as a numeric code (`1`) or a symbolic name (`"ATK"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAttributeType {
    Code(i64),
    Name(String),
}

impl fmt::Display for RawAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

// ----- skill_table.json -----

#[derive(Debug, Clone, Deserialize)]
pub struct RawSkill {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub levels: Vec<RawSkillLevel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSkillLevel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sp_data: Option<RawSpData>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blackboard: Vec<RawBlackboardEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpData {
    #[serde(default)]
    pub sp_cost: u32,
    #[serde(default)]
    pub init_sp: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBlackboardEntry {
    pub key: String,
    #[serde(default)]
    pub value: Option<f64>,
}

// ----- favor_table.json -----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFavorTable {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub favor_frames: Vec<RawFavorFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFavorFrame {
    pub level: u32,
    #[serde(default)]
    pub data: RawFavorData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFavorData {
    #[serde(default)]
    pub favor_point: u32,
    #[serde(default)]
    pub percent: u32,
}

// ----- uniequip_table.json -----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUniEquipTable {
    #[serde(default)]
    pub equip_dict: Entries<RawUniEquip>,
    #[serde(default)]
    pub sub_prof_dict: Entries<RawSubProfession>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUniEquip {
    pub uni_equip_id: String,
    #[serde(default)]
    pub uni_equip_name: String,
    #[serde(default)]
    pub uni_equip_desc: Option<String>,
    #[serde(default)]
    pub type_icon: String,
    #[serde(default)]
    pub type_name1: String,
    #[serde(default)]
    pub type_name2: Option<String>,
    #[serde(default)]
    pub char_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubProfession {
    #[serde(default)]
    pub sub_profession_id: Option<String>,
    pub sub_profession_name: String,
}

// ----- battle_equip_table.json -----

#[derive(Debug, Clone, Deserialize)]
pub struct RawBattleEquip {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phases: Vec<RawEquipPhase>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEquipPhase {
    #[serde(default)]
    pub equip_level: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parts: Vec<RawEquipPart>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attribute_blackboard: Vec<RawBlackboardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEquipPart {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub override_trait_data_bundle: Option<RawCandidateBundle<RawTraitCandidate>>,
    #[serde(default)]
    pub add_or_override_talent_data_bundle: Option<RawCandidateBundle<RawTalentCandidate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "C: Deserialize<'de>"))]
pub struct RawCandidateBundle<C> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub candidates: Vec<C>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTraitCandidate {
    /// Upstream spelling.
    #[serde(default, rename = "overrideDescripton")]
    pub override_description: Option<String>,
    #[serde(default)]
    pub additional_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blackboard: Vec<RawBlackboardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTalentCandidate {
    #[serde(default)]
    pub upgrade_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blackboard: Vec<RawBlackboardEntry>,
}

// ----- handbook_info_table.json -----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHandbookTable {
    #[serde(default)]
    pub handbook_dict: Entries<RawHandbookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHandbookEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub story_text_audio: Vec<RawStorySection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStorySection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stories: Vec<RawStory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStory {
    #[serde(default)]
    pub story_text: String,
}

impl RawHandbookEntry {
    /// The first story of the first section: the basic file with the `【label】` lines.
    pub fn basic_file(&self) -> Option<&str> {
        self.story_text_audio
            .first()?
            .stories
            .first()
            .map(|story| story.story_text.as_str())
    }
}

// ----- handbook_team_table.json -----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    #[serde(default)]
    pub power_name: Option<String>,
}

/// Collapse a raw blackboard list into a flat lookup table; entries without
/// a numeric value are dropped.
pub fn blackboard_of(entries: &[RawBlackboardEntry]) -> crate::template::Blackboard {
    entries
        .iter()
        .filter_map(|entry| entry.value.map(|value| (entry.key.clone(), value)))
        .collect()
}
