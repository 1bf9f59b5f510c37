use serde::Deserialize;

use crate::data::character::CharacterRecord;
use crate::data::lookups::LookupTables;
use crate::query::QueryError;

pub const RARITY_RANGE: (i64, i64) = (1, 6);

/// Facets are ANDed; an unset facet does not narrow the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FacetQuery {
    pub char_id: Option<String>,
    pub name: Option<String>,
    pub profession: Option<String>,
    pub sub_profession: Option<String>,
    pub rarity: Option<i64>,
    pub position: Option<String>,
    /// Every listed tag must be present.
    #[serde(default)]
    pub tags: Vec<String>,
    pub nation: Option<String>,
    pub gender: Option<String>,
    pub birth_place: Option<String>,
    pub race: Option<String>,
    pub obtain_approach: Option<String>,
}

fn same_text(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}

fn same_optional(actual: Option<&str>, wanted: &str) -> bool {
    actual.is_some_and(|actual| same_text(actual, wanted))
}

impl FacetQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn check_bounds(&self) -> Result<(), QueryError> {
        if let Some(rarity) = self.rarity {
            QueryError::check_range("rarity", rarity, RARITY_RANGE)?;
        }
        Ok(())
    }

    pub fn matches(&self, record: &CharacterRecord, lookups: &LookupTables) -> bool {
        if let Some(id) = &self.char_id {
            if record.id != *id {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !record.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(profession) = &self.profession {
            if !same_text(&record.profession, lookups.profession(profession)) {
                return false;
            }
        }
        if let Some(sub_profession) = &self.sub_profession {
            if !same_text(&record.sub_profession, lookups.sub_profession(sub_profession)) {
                return false;
            }
        }
        if let Some(rarity) = self.rarity {
            if i64::from(record.rarity.tier()) != rarity {
                return false;
            }
        }
        if let Some(position) = &self.position {
            if !same_text(record.position.code(), lookups.position(position)) {
                return false;
            }
        }
        if !self.tags.iter().all(|tag| record.has_tag(tag)) {
            return false;
        }
        if let Some(nation) = &self.nation {
            if !same_optional(record.nation_id.as_deref(), lookups.nation(nation)) {
                return false;
            }
        }

        let profile = &record.profile;
        let text_facets = [
            (&self.gender, profile.gender.as_deref()),
            (&self.birth_place, profile.birth_place.as_deref()),
            (&self.race, profile.race.as_deref()),
            (&self.obtain_approach, record.item_obtain_approach.as_deref()),
        ];
        text_facets.into_iter().all(|(wanted, actual)| match wanted {
            Some(wanted) => same_optional(actual, wanted),
            None => true,
        })
    }
}
