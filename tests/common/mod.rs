//! Hand-built table set shared by the integration tests.
//!
//! Playable: char_002_sniper (6*, three tiers), char_003_medic (5*, summons a
//! drone twice), char_004_guard (integer rarity, one tier, odd data).
//! Filtered or skipped: a token, a trap, a malformed entry, an unknown rarity.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use opdex::data::tables::{MemorySource, TableId};
use serde_json::{json, Value};

pub const SNIPER: &str = "char_002_sniper";
pub const MEDIC: &str = "char_003_medic";
pub const GUARD: &str = "char_004_guard";
pub const DRONE: &str = "token_10001_drone";

fn stats(max_hp: f64, atk: f64, def: f64, cost: f64) -> Value {
    json!({
        "maxHp": max_hp,
        "atk": atk,
        "def": def,
        "magicResistance": 10.0,
        "cost": cost,
        "blockCnt": 1,
        "moveSpeed": 1.0,
        "attackSpeed": 100.0,
        "baseAttackTime": 1.0,
        "respawnTime": 70,
        "stunImmune": false
    })
}

fn phase(max_level: u32, low: Value, high: Value) -> Value {
    json!({
        "characterPrefabKey": "x",
        "maxLevel": max_level,
        "attributesKeyFrames": [
            { "level": 1, "data": low },
            { "level": max_level, "data": high }
        ]
    })
}

fn modifier(attribute_type: Value, value: f64) -> Value {
    json!({
        "description": "potential",
        "buff": { "attributes": { "attributeModifiers": [
            { "attributeType": attribute_type, "value": value }
        ] } }
    })
}

pub fn character_table() -> Value {
    json!({
        SNIPER: {
            "name": "Exusiai",
            "description": "<@ba.kw>Attacks</> one enemy at a time",
            "canUseGeneralPotentialItem": true,
            "potentialItemId": "p_char_002_sniper",
            "nationId": "laterano",
            "groupId": null,
            "teamId": null,
            "displayNumber": "R001",
            "appellation": "Exusiai",
            "position": "RANGED",
            "tagList": ["远程位", "输出"],
            "itemUsage": "Penguin Logistics courier.",
            "itemDesc": "Apple pie enthusiast.",
            "itemObtainApproach": "招募寻访",
            "isNotObtainable": false,
            "isSpChar": false,
            "maxPotentialLevel": 5,
            "rarity": "TIER_6",
            "profession": "SNIPER",
            "subProfessionId": "fastshot",
            "phases": [
                phase(50, stats(600.0, 200.0, 50.0, 12.0), stats(1000.0, 350.0, 90.0, 12.0)),
                phase(80, stats(1000.0, 350.0, 90.0, 14.0), stats(1400.0, 450.0, 100.0, 14.0)),
                phase(70, stats(1400.0, 100.0, 100.0, 14.0), stats(2100.0, 500.0, 160.0, 14.0))
            ],
            "skills": [
                { "skillId": "skchr_snip_1", "overrideTokenKey": null },
                { "skillId": "skchr_missing", "overrideTokenKey": null }
            ],
            "favorKeyFrames": [
                { "level": 0, "data": { "maxHp": 0, "atk": 0, "def": 0 } },
                { "level": 50, "data": { "maxHp": 100, "atk": 30, "def": 10 } },
                { "level": 100, "data": { "maxHp": 200, "atk": 60, "def": 20, "magicResistance": 5.0 } }
            ],
            "potentialRanks": [
                modifier(json!(21), 1.0),
                modifier(json!("ATK"), 25.0),
                { "description": "<@ba.talpu>Talent</> enhanced", "buff": null },
                modifier(json!(0), 150.0),
                modifier(json!(23), 4.0)
            ]
        },
        MEDIC: {
            "name": "Warfarin",
            "description": "Restores HP",
            "nationId": "rhodes",
            "position": "RANGED",
            "tagList": ["远程位", "治疗"],
            "itemObtainApproach": "招募寻访",
            "maxPotentialLevel": 0,
            "rarity": "TIER_5",
            "profession": "MEDIC",
            "subProfessionId": "physician",
            "phases": [
                phase(50, stats(700.0, 150.0, 60.0, 16.0), stats(1100.0, 260.0, 90.0, 16.0)),
                phase(70, stats(1100.0, 260.0, 90.0, 18.0), stats(1500.0, 380.0, 120.0, 18.0))
            ],
            "skills": [
                { "skillId": "skchr_medic_1", "overrideTokenKey": DRONE },
                { "skillId": "skchr_medic_2", "overrideTokenKey": DRONE }
            ],
            "favorKeyFrames": null,
            "potentialRanks": []
        },
        GUARD: {
            "name": "Mudrock",
            "position": "MELEE",
            "tagList": ["输出", "近战位"],
            "rarity": 3,
            "profession": "WARRIOR",
            "subProfessionId": "lord",
            "phases": [
                {
                    "maxLevel": 40,
                    "attributesKeyFrames": [
                        { "level": 40, "data": stats(900.0, 300.0, 120.0, 15.0) },
                        { "level": 1, "data": stats(500.0, 180.0, 80.0, 15.0) }
                    ]
                }
            ],
            "skills": [],
            "potentialRanks": [ modifier(json!(99), 3.0) ]
        },
        DRONE: {
            "name": "Drone",
            "description": "A <@ba.kw>medical</> drone",
            "position": "RANGED",
            "rarity": "TIER_1",
            "profession": "TOKEN",
            "subProfessionId": "notchar1",
            "phases": [ phase(1, stats(100.0, 0.0, 0.0, 0.0), stats(100.0, 0.0, 0.0, 0.0)) ]
        },
        "trap_001_crate": {
            "name": "Crate",
            "position": "MELEE",
            "rarity": "TIER_1",
            "profession": "TRAP",
            "subProfessionId": "notchar2",
            "phases": []
        },
        "char_005_broken": {
            "name": "Broken",
            "rarity": "TIER_3",
            "profession": "CASTER",
            "subProfessionId": "corecaster",
            "phases": "not a list"
        },
        "char_006_unranked": {
            "name": "Unranked",
            "rarity": "TIER_9",
            "profession": "SUPPORT",
            "subProfessionId": "bard",
            "phases": [ phase(30, stats(1.0, 1.0, 1.0, 1.0), stats(2.0, 2.0, 2.0, 1.0)) ]
        }
    })
}

pub fn skill_table() -> Value {
    let sniper_levels: Vec<Value> = (0..10)
        .map(|index| {
            json!({
                "name": "<@ba.kw>Overload</>",
                "description": "Deals {atk_scale:%.0} damage for {duration} seconds {missing_key}",
                "spData": { "spType": 1, "spCost": 40 - index, "initSp": 10 },
                "duration": 0,
                "blackboard": [
                    { "key": "atk_scale", "value": 2.5 },
                    { "key": "duration", "value": 20.0 },
                    { "key": "note", "value": null, "valueStr": "text" }
                ]
            })
        })
        .collect();

    json!({
        "skchr_snip_1": { "skillId": "skchr_snip_1", "levels": sniper_levels },
        "skchr_medic_1": {
            "levels": [{
                "name": "Deploy Drone",
                "description": "Heals {heal_scale:.1%} of ATK",
                "spData": { "spCost": 20, "initSp": 5 },
                "blackboard": [{ "key": "heal_scale", "value": 0.35 }]
            }]
        },
        "skchr_medic_2": {
            "levels": [{
                "name": "Drone Swarm",
                "description": "No placeholders",
                "spData": null,
                "blackboard": []
            }]
        }
    })
}

pub fn favor_table() -> Value {
    json!({
        "maxFavor": 200,
        "favorFrames": [
            { "level": 0, "data": { "favorPoint": 0, "percent": 0, "battlePhase": 0 } },
            { "level": 100, "data": { "favorPoint": 25570, "percent": 100, "battlePhase": 1 } }
        ]
    })
}

pub fn uniequip_table() -> Value {
    json!({
        "equipDict": {
            "uniequip_002_sniper": {
                "uniEquipId": "uniequip_002_sniper",
                "uniEquipName": "Rapid-Fire Module",
                "uniEquipDesc": "<@ba.kw>Field</> notes",
                "typeIcon": "sni-y",
                "typeName1": "SNI",
                "typeName2": "Y",
                "charId": SNIPER
            },
            "uniequip_001_guard": {
                "uniEquipId": "uniequip_001_guard",
                "uniEquipName": "Original",
                "typeIcon": "original",
                "typeName1": "ORIGINAL",
                "typeName2": null,
                "charId": GUARD
            }
        },
        "subProfDict": {
            "fastshot": { "subProfessionId": "fastshot", "subProfessionName": "速射手" },
            "physician": { "subProfessionId": "physician", "subProfessionName": "医师" },
            "lord": { "subProfessionName": "领主" }
        }
    })
}

pub fn battle_equip_table() -> Value {
    json!({
        "uniequip_002_sniper": {
            "phases": [{
                "equipLevel": 1,
                "parts": [
                    {
                        "target": "TRAIT",
                        "overrideTraitDataBundle": { "candidates": [
                            { "additionalDescription": "Outdated {atk}", "blackboard": [] },
                            {
                                "overrideDescripton": "<@ba.kw>ATK</> +{atk:0%} against {target_count} targets",
                                "blackboard": [{ "key": "target_count", "value": 2 }]
                            }
                        ] }
                    },
                    {
                        "target": "TALENT_DATA_ONLY",
                        "addOrOverrideTalentDataBundle": { "candidates": [{
                            "upgradeDescription": "Talent now grants {atk}",
                            "blackboard": [{ "key": "atk", "value": 0.08 }]
                        }] }
                    }
                ],
                "attributeBlackboard": [{ "key": "atk", "value": 0.05 }]
            }, {
                "equipLevel": 2,
                "parts": [{
                    "target": "TRAIT",
                    "overrideTraitDataBundle": { "candidates": [{
                        "overrideDescripton": "",
                        "additionalDescription": "extra {atk:0%}",
                        "blackboard": []
                    }] }
                }],
                "attributeBlackboard": [{ "key": "atk", "value": 0.1 }]
            }]
        }
    })
}

pub fn handbook_table() -> Value {
    json!({
        "handbookDict": {
            SNIPER: { "storyTextAudio": [{ "stories": [{
                "storyText": "【代号】Exusiai\n【性别】女\n【出身地】拉特兰\n【种族】萨科塔\n"
            }] }] },
            MEDIC: { "storyTextAudio": [{ "stories": [{
                "storyText": "【代号】Warfarin\n【性别】女\n【出身地】哥伦比亚\n【种族】萨卡兹\n"
            }] }] }
        }
    })
}

pub fn team_table() -> Value {
    json!({
        "laterano": { "powerId": "laterano", "powerName": "拉特兰" },
        "rhodes": { "powerId": "rhodes", "powerName": "罗德岛" }
    })
}

pub fn tables() -> Vec<(TableId, Value)> {
    vec![
        (TableId::Character, character_table()),
        (TableId::Handbook, handbook_table()),
        (TableId::Skill, skill_table()),
        (TableId::Favor, favor_table()),
        (TableId::UniEquip, uniequip_table()),
        (TableId::BattleEquip, battle_equip_table()),
        (TableId::HandbookTeam, team_table()),
    ]
}

pub fn fixture_source() -> MemorySource {
    let mut source = MemorySource::new();
    for (table, document) in tables() {
        source.insert_json(table, &document);
    }
    source
}

pub fn write_fixture_dir(dir: &Path) {
    for (table, document) in tables() {
        fs::write(dir.join(table.file_name()), document.to_string())
            .expect("fixture table should be written");
    }
}
