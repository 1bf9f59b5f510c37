//! Entity normalizer: fuses the character, skill, equipment and handbook
//! tables into one self-contained [CharacterRecord] per playable character.
//!
//! Data inconsistencies never fail the cycle. A character that cannot be
//! normalized is skipped; a sub-entity whose reference does not resolve is
//! omitted. Both leave a [Diagnostic] behind.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::data::character::{
    AttributeDelta, CharacterRecord, HandbookProfile, Keyframe, Module, ModuleLevel, Phase,
    Position, PotentialRank, Rarity, Skill, SkillLevel, SkillRank, Token,
};
use crate::data::handbook::parse_profile;
use crate::data::lookups::LookupTables;
use crate::data::raw::{
    blackboard_of, RawCharacter, RawEquipPhase, RawKeyFrame, RawPotentialRank, RawRarity,
    RawSkill, RawUniEquip,
};
use crate::data::report::{Diagnostic, IngestReport, Severity};
use crate::data::tables::TableSet;
use crate::stats::AttributeType;
use crate::template::{fill_description, fill_optional, strip_markup, Blackboard};

const TOKEN_PROFESSION: &str = "TOKEN";
const NON_CHARACTER_PREFIX: &str = "notchar";

#[derive(Debug, Clone, Default)]
pub struct NormalizedDataset {
    pub characters: Vec<CharacterRecord>,
    pub lookups: LookupTables,
    pub report: IngestReport,
}

/// Playable characters only: summon tokens and non-character entries
/// (traps, devices) stay reachable as [Token]s but are not listed.
pub fn is_playable(raw: &RawCharacter) -> bool {
    !raw.sub_profession_id.starts_with(NON_CHARACTER_PREFIX) && raw.profession != TOKEN_PROFESSION
}

/// Shared read-only context for building every record of one cycle.
struct Context<'t> {
    tables: &'t TableSet,
    modules_by_char: HashMap<&'t str, Vec<&'t RawUniEquip>>,
}

type Built = Result<(CharacterRecord, Vec<Diagnostic>), Diagnostic>;

pub fn normalize(tables: &TableSet) -> NormalizedDataset {
    let mut report = IngestReport::default();
    report_rejections(tables, &mut report);

    let lookups = LookupTables::build(tables.teams.as_ref(), &tables.uniequip.sub_prof_dict);

    let mut modules_by_char: HashMap<&str, Vec<&RawUniEquip>> = HashMap::new();
    for (_, equip) in tables.uniequip.equip_dict.iter() {
        if let Some(char_id) = equip.char_id.as_deref() {
            modules_by_char.entry(char_id).or_default().push(equip);
        }
    }
    let context = Context {
        tables,
        modules_by_char,
    };

    let outcomes: Vec<Built> = tables
        .characters
        .items()
        .par_iter()
        .filter(|(_, raw)| is_playable(raw))
        .map(|(id, raw)| build_character(&context, id, raw))
        .collect();

    let mut characters = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok((record, diagnostics)) => {
                characters.push(record);
                report.extend(diagnostics);
            }
            Err(diagnostic) => {
                warn!(context = %diagnostic.context, "skipping character: {}", diagnostic.message);
                report.push(diagnostic);
            }
        }
    }
    debug!(
        characters = characters.len(),
        diagnostics = report.diagnostics.len(),
        "normalization finished"
    );

    NormalizedDataset {
        characters,
        lookups,
        report,
    }
}

fn report_rejections(tables: &TableSet, report: &mut IngestReport) {
    let sections = [
        ("character_table", tables.characters.rejected()),
        ("skill_table", tables.skills.rejected()),
        ("battle_equip_table", tables.battle_equip.rejected()),
        ("uniequip_table.equipDict", tables.uniequip.equip_dict.rejected()),
        ("uniequip_table.subProfDict", tables.uniequip.sub_prof_dict.rejected()),
        ("handbook_info_table", tables.handbook.handbook_dict.rejected()),
    ];
    for (table, rejected) in sections {
        for entry in rejected {
            report.push(Diagnostic::warning(
                format!("{table}.{}", entry.id),
                format!("entry skipped: {}", entry.reason),
            ));
        }
    }
}

fn parse_rarity(raw: Option<&RawRarity>) -> Option<Rarity> {
    match raw? {
        RawRarity::Tier(code) => Rarity::from_code(code),
        RawRarity::Index(index) => Rarity::from_tier(index.saturating_add(1)),
    }
}

fn build_character(context: &Context<'_>, id: &str, raw: &RawCharacter) -> Built {
    let rarity = parse_rarity(raw.rarity.as_ref())
        .ok_or_else(|| Diagnostic::warning(id, "missing or unknown rarity"))?;
    if raw.phases.is_empty() {
        return Err(Diagnostic::warning(id, "character has no phases"));
    }

    let mut diagnostics = Vec::new();
    let no_blackboard = Blackboard::new();

    let phases = build_phases(id, raw, &mut diagnostics);
    let favor_keyframes = sorted_keyframes(
        &raw.favor_key_frames,
        &format!("{id}.favorKeyFrames"),
        &mut diagnostics,
    );
    let potential_ranks = build_potential_ranks(id, &raw.potential_ranks, &mut diagnostics);
    let (skills, tokens) = build_skills_and_tokens(context, id, raw, &mut diagnostics);
    let modules = build_modules(context, id, &mut diagnostics);

    let profile = context
        .tables
        .handbook
        .handbook_dict
        .get(id)
        .and_then(|entry| entry.basic_file())
        .map(parse_profile)
        .unwrap_or_else(HandbookProfile::default);

    let record = CharacterRecord {
        id: id.to_string(),
        name: raw.name.clone(),
        description: fill_optional(raw.description.as_deref(), &no_blackboard),
        appellation: raw.appellation.clone(),
        display_number: raw.display_number.clone(),
        profession: raw.profession.clone(),
        sub_profession: raw.sub_profession_id.clone(),
        rarity,
        position: Position::from_code(&raw.position),
        nation_id: raw.nation_id.clone(),
        group_id: raw.group_id.clone(),
        team_id: raw.team_id.clone(),
        tags: raw.tag_list.clone(),
        item_usage: raw.item_usage.clone(),
        item_desc: raw.item_desc.clone(),
        item_obtain_approach: raw.item_obtain_approach.clone(),
        can_use_general_potential_item: raw.can_use_general_potential_item,
        potential_item_id: raw.potential_item_id.clone(),
        is_not_obtainable: raw.is_not_obtainable,
        is_sp_char: raw.is_sp_char,
        max_potential_level: raw.max_potential_level,
        profile,
        phases,
        favor_keyframes,
        potential_ranks,
        skills,
        modules,
        tokens,
    };
    Ok((record, diagnostics))
}

/// Keyframes in ascending level order. Out-of-order input is sorted (stable)
/// and reported.
fn sorted_keyframes(
    raw: &[RawKeyFrame],
    context: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Keyframe> {
    let mut frames: Vec<Keyframe> = raw
        .iter()
        .map(|frame| Keyframe {
            level: frame.level,
            stats: frame.data.clone(),
        })
        .collect();
    if frames.windows(2).any(|pair| pair[0].level > pair[1].level) {
        diagnostics.push(Diagnostic::warning(context, "keyframes out of level order; sorted"));
        frames.sort_by_key(|frame| frame.level);
    }
    frames
}

fn build_phases(id: &str, raw: &RawCharacter, diagnostics: &mut Vec<Diagnostic>) -> Vec<Phase> {
    raw.phases
        .iter()
        .enumerate()
        .map(|(elite, phase)| {
            let context = format!("{id}.phases[{elite}]");
            let keyframes = sorted_keyframes(&phase.attributes_key_frames, &context, diagnostics);
            if keyframes.is_empty() {
                diagnostics.push(Diagnostic::warning(&context, "phase has no keyframes"));
            }
            Phase {
                elite,
                max_level: phase.max_level,
                keyframes,
            }
        })
        .collect()
}

fn build_potential_ranks(
    id: &str,
    raw: &[RawPotentialRank],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<PotentialRank> {
    raw.iter()
        .enumerate()
        .map(|(index, rank)| {
            let modifier = rank
                .buff
                .as_ref()
                .and_then(|buff| buff.attributes.as_ref())
                .and_then(|attributes| attributes.attribute_modifiers.first());
            let bonus = modifier.and_then(|modifier| {
                match AttributeType::from_raw(&modifier.attribute_type) {
                    Some(attribute) => Some(AttributeDelta {
                        attribute,
                        value: modifier.value,
                    }),
                    None => {
                        diagnostics.push(Diagnostic::warning(
                            format!("{id}.potentialRanks[{index}]"),
                            format!("unmapped attribute type '{}'", modifier.attribute_type),
                        ));
                        None
                    }
                }
            });
            let rank_number = index as u32 + 2;
            PotentialRank {
                rank: rank_number,
                label: format!("潜能{rank_number}"),
                description: rank
                    .description
                    .as_deref()
                    .map(|text| strip_markup(text).into_owned()),
                bonus,
            }
        })
        .collect()
}

fn build_skills_and_tokens(
    context: &Context<'_>,
    id: &str,
    raw: &RawCharacter,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Vec<Skill>, Vec<Token>) {
    let mut skills = Vec::new();
    let mut tokens = Vec::new();
    let mut seen_tokens = HashSet::new();

    for (slot, skill_ref) in raw.skills.iter().enumerate() {
        if let Some(token_id) = skill_ref.override_token_key.as_deref() {
            if seen_tokens.insert(token_id) {
                match context.tables.characters.get(token_id) {
                    Some(token) => tokens.push(build_token(token_id, token)),
                    None => diagnostics.push(Diagnostic::info(
                        format!("{id}.skills[{slot}]"),
                        format!("token '{token_id}' not found in character table"),
                    )),
                }
            }
        }

        let Some(skill_id) = skill_ref.skill_id.as_deref() else {
            continue;
        };
        match context.tables.skills.get(skill_id) {
            Some(skill) => skills.push(build_skill(skill_id, skill)),
            None => diagnostics.push(Diagnostic::warning(
                format!("{id}.skills[{slot}]"),
                format!("skill '{skill_id}' not found in skill table"),
            )),
        }
    }
    (skills, tokens)
}

fn build_token(token_id: &str, raw: &RawCharacter) -> Token {
    Token {
        id: token_id.to_string(),
        name: raw.name.clone(),
        description: raw
            .description
            .as_deref()
            .map(|text| strip_markup(text).into_owned()),
        profession: raw.profession.clone(),
        sub_profession: raw.sub_profession_id.clone(),
    }
}

fn build_skill(skill_id: &str, raw: &RawSkill) -> Skill {
    let levels = raw
        .levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            let blackboard = blackboard_of(&level.blackboard);
            let sp = level.sp_data.clone().unwrap_or_default();
            SkillLevel {
                level: SkillRank::from_index(index),
                name: level
                    .name
                    .as_deref()
                    .map(|name| strip_markup(name).into_owned()),
                description: level
                    .description
                    .as_deref()
                    .map(|text| fill_description(text, &blackboard))
                    .unwrap_or_default(),
                sp_cost: sp.sp_cost,
                initial_sp: sp.init_sp,
                duration: blackboard.get("duration").copied().unwrap_or(0.0),
                blackboard,
            }
        })
        .collect();
    Skill {
        id: skill_id.to_string(),
        levels,
    }
}

fn build_modules(
    context: &Context<'_>,
    id: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Module> {
    let Some(equips) = context.modules_by_char.get(id) else {
        return Vec::new();
    };
    let no_blackboard = Blackboard::new();
    equips
        .iter()
        .map(|equip| {
            let levels = match context.tables.battle_equip.get(&equip.uni_equip_id) {
                Some(battle) => battle.phases.iter().map(build_module_level).collect(),
                None => {
                    diagnostics.push(Diagnostic::new(
                        Severity::Info,
                        format!("{id}.modules.{}", equip.uni_equip_id),
                        "no battle equipment entry; module has no levels",
                    ));
                    Vec::new()
                }
            };
            let type_name = match equip.type_name2.as_deref().filter(|second| !second.is_empty()) {
                Some(second) => format!("{}-{second}", equip.type_name1),
                None => equip.type_name1.clone(),
            };
            Module {
                id: equip.uni_equip_id.clone(),
                name: equip.uni_equip_name.clone(),
                description: fill_optional(equip.uni_equip_desc.as_deref(), &no_blackboard),
                type_icon: equip.type_icon.clone(),
                type_name,
                levels,
            }
        })
        .collect()
}

/// Merge the module level's own attributes with a candidate's blackboard
/// (candidate entries win) and fill `template`.
fn fill_upgrade(template: &str, base: &Blackboard, candidate: Blackboard) -> String {
    let mut merged = base.clone();
    merged.extend(candidate);
    fill_description(template, &merged)
}

fn build_module_level(phase: &RawEquipPhase) -> ModuleLevel {
    let attributes = blackboard_of(&phase.attribute_blackboard);
    let mut trait_upgrade = None;
    let mut talent_upgrade = None;

    for part in &phase.parts {
        let target = part.target.as_deref().unwrap_or_default();

        if target == "TRAIT" {
            let latest = part
                .override_trait_data_bundle
                .as_ref()
                .and_then(|bundle| bundle.candidates.last());
            if let Some(candidate) = latest {
                let template = candidate
                    .override_description
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .or(candidate.additional_description.as_deref());
                if let Some(template) = template {
                    trait_upgrade = Some(fill_upgrade(
                        template,
                        &attributes,
                        blackboard_of(&candidate.blackboard),
                    ));
                }
            }
        }

        if matches!(target, "TALENT" | "TALENT_DATA_ONLY") {
            let latest = part
                .add_or_override_talent_data_bundle
                .as_ref()
                .and_then(|bundle| bundle.candidates.last());
            if let Some(candidate) = latest {
                if let Some(template) = candidate.upgrade_description.as_deref() {
                    talent_upgrade = Some(fill_upgrade(
                        template,
                        &attributes,
                        blackboard_of(&candidate.blackboard),
                    ));
                }
            }
        }
    }

    ModuleLevel {
        level: phase.equip_level,
        attributes,
        trait_upgrade,
        talent_upgrade,
    }
}
