use serde::Serialize;

use crate::data::raw::RawAttributeType;

/// Attribute types a potential rank can raise. Upstream encodes these as
/// integer codes (or, in newer dumps, symbolic names); codes outside this set
/// are reported during ingestion instead of being silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    MaxHp,
    Atk,
    Def,
    MagicResistance,
    AttackSpeed,
    Cost,
    BlockCnt,
    RespawnTime,
}

const CODE_TABLE: &[(i64, &str, AttributeType)] = &[
    (0, "MAX_HP", AttributeType::MaxHp),
    (1, "ATK", AttributeType::Atk),
    (2, "DEF", AttributeType::Def),
    (3, "MAGIC_RESISTANCE", AttributeType::MagicResistance),
    (7, "ATTACK_SPEED", AttributeType::AttackSpeed),
    (21, "COST", AttributeType::Cost),
    (22, "BLOCK_CNT", AttributeType::BlockCnt),
    (23, "RESPAWN_TIME", AttributeType::RespawnTime),
];

impl AttributeType {
    pub fn from_code(code: i64) -> Option<Self> {
        CODE_TABLE
            .iter()
            .find(|(known, _, _)| *known == code)
            .map(|(_, _, attribute)| *attribute)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        CODE_TABLE
            .iter()
            .find(|(_, known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, _, attribute)| *attribute)
    }

    pub fn from_raw(raw: &RawAttributeType) -> Option<Self> {
        match raw {
            RawAttributeType::Code(code) => Self::from_code(*code),
            RawAttributeType::Name(name) => name
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Self::from_code)
                .or_else(|| Self::from_name(name)),
        }
    }

    pub fn code(self) -> i64 {
        CODE_TABLE
            .iter()
            .find(|(_, _, attribute)| *attribute == self)
            .map(|(code, _, _)| *code)
            .unwrap_or_default()
    }
}

/// Effective attributes at one progression point. Always fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeVector {
    pub max_hp: i64,
    pub atk: i64,
    pub def: i64,
    pub magic_resistance: f64,
    pub cost: i64,
    pub block_cnt: i64,
    pub move_speed: f64,
    pub attack_speed: f64,
    pub base_attack_time: f64,
    pub respawn_time: i64,
}
