//! Facet filter engine over the committed snapshot.
//!
//! Facets narrow the candidate set with AND semantics. Calculation parameters
//! are range-checked at the boundary for every query, but checked against a
//! character's actual tiers and ranks only when the filter leaves exactly one
//! match; a multi-match result is resolved per character with clamping.

mod facets;
mod params;
pub mod views;

use std::sync::Arc;

use thiserror::Error;

use crate::data::character::CharacterRecord;
use crate::data::repository::Snapshot;
use crate::stats::{resolve, AttributeVector};

pub use facets::{FacetQuery, RARITY_RANGE};
pub use params::{
    CalcParams, ValidationError, ELITE_RANGE, LEVEL_RANGE, POTENTIAL_RANGE, TRUST_RANGE,
};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{parameter} must be between {min} and {max}, got {value}")]
    Boundary {
        parameter: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown character id '{0}'")]
    UnknownCharacter(String),
}

impl QueryError {
    pub(crate) fn check_range(
        parameter: &'static str,
        value: i64,
        (min, max): (i64, i64),
    ) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::Boundary {
                parameter,
                value,
                min,
                max,
            })
        }
    }
}

/// A matched character with attributes resolved at the requested progression.
#[derive(Debug, Clone)]
pub struct ResolvedHit {
    pub record: Arc<CharacterRecord>,
    pub attributes: AttributeVector,
}

/// Matching characters in snapshot order.
pub fn search(
    snapshot: &Snapshot,
    facets: &FacetQuery,
    params: &CalcParams,
) -> Result<Vec<Arc<CharacterRecord>>, QueryError> {
    facets.check_bounds()?;
    params.check_bounds()?;

    let matched = snapshot.filter(|record| facets.matches(record, &snapshot.lookups));
    if let [only] = matched.as_slice() {
        if !params.is_empty() {
            params.validate_for(only)?;
        }
    }
    Ok(matched)
}

pub fn resolve_hits(records: &[Arc<CharacterRecord>], params: &CalcParams) -> Vec<ResolvedHit> {
    let progression = params.progression();
    records
        .iter()
        .map(|record| ResolvedHit {
            attributes: resolve(record, &progression),
            record: Arc::clone(record),
        })
        .collect()
}

/// [search] followed by attribute resolution of every match.
pub fn search_resolved(
    snapshot: &Snapshot,
    facets: &FacetQuery,
    params: &CalcParams,
) -> Result<Vec<ResolvedHit>, QueryError> {
    let matched = search(snapshot, facets, params)?;
    Ok(resolve_hits(&matched, params))
}

/// Resolve one character by id. A single named character is always strictly
/// validated.
pub fn resolve_by_id(
    snapshot: &Snapshot,
    id: &str,
    params: &CalcParams,
) -> Result<ResolvedHit, QueryError> {
    params.check_bounds()?;
    let record = snapshot
        .get(id)
        .ok_or_else(|| QueryError::UnknownCharacter(id.to_string()))?;
    params.validate_for(record)?;
    Ok(ResolvedHit {
        attributes: resolve(record, &params.progression()),
        record: Arc::clone(record),
    })
}
