//! Display-name -> internal-code lookups used by the facet filter.
//!
//! Profession and position names are fixed; nation and sub-profession names
//! come from the team table and the `subProfDict` section of the equipment
//! table and are rebuilt on every ingestion cycle.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::raw::{Entries, RawSubProfession, RawTeam};

const PROFESSION_NAMES: &[(&str, &str)] = &[
    ("近卫", "WARRIOR"),
    ("狙击", "SNIPER"),
    ("重装", "TANK"),
    ("医疗", "MEDIC"),
    ("辅助", "SUPPORT"),
    ("术师", "CASTER"),
    ("特种", "SPECIAL"),
    ("先锋", "PIONEER"),
];

const POSITION_NAMES: &[(&str, &str)] = &[("近战位", "MELEE"), ("远程位", "RANGED")];

fn fixed_lookup<'a>(table: &[(&str, &'a str)], input: &'a str) -> &'a str {
    table
        .iter()
        .find(|(name, _)| *name == input)
        .map(|(_, code)| *code)
        .unwrap_or(input)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupTables {
    /// `powerName` -> team/nation id.
    pub nations: BTreeMap<String, String>,
    /// `subProfessionName` -> sub-profession id.
    pub sub_professions: BTreeMap<String, String>,
}

impl LookupTables {
    pub fn build(
        teams: Option<&Entries<RawTeam>>,
        sub_professions: &Entries<RawSubProfession>,
    ) -> Self {
        let nations = teams
            .into_iter()
            .flat_map(|entries| entries.iter())
            .filter_map(|(team_id, team)| {
                team.power_name
                    .as_ref()
                    .map(|name| (name.clone(), team_id.to_string()))
            })
            .collect();

        let sub_professions = sub_professions
            .iter()
            .map(|(key, sub)| {
                let id = sub.sub_profession_id.as_deref().unwrap_or(key);
                (sub.sub_profession_name.clone(), id.to_string())
            })
            .collect();

        Self {
            nations,
            sub_professions,
        }
    }

    pub fn profession<'a>(&self, input: &'a str) -> &'a str {
        fixed_lookup(PROFESSION_NAMES, input)
    }

    pub fn position<'a>(&self, input: &'a str) -> &'a str {
        fixed_lookup(POSITION_NAMES, input)
    }

    pub fn nation<'a>(&'a self, input: &'a str) -> &'a str {
        self.nations.get(input).map(String::as_str).unwrap_or(input)
    }

    pub fn sub_profession<'a>(&'a self, input: &'a str) -> &'a str {
        self.sub_professions
            .get(input)
            .map(String::as_str)
            .unwrap_or(input)
    }
}
