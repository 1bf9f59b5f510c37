use serde::Deserialize;
use thiserror::Error;

use crate::data::character::CharacterRecord;
use crate::query::QueryError;
use crate::stats::{Progression, DEFAULT_POTENTIAL, DEFAULT_TRUST};

pub const ELITE_RANGE: (i64, i64) = (0, 2);
pub const LEVEL_RANGE: (i64, i64) = (1, 90);
pub const POTENTIAL_RANGE: (i64, i64) = (0, 5);
/// Display range; the bonus itself stops growing at 100.
pub const TRUST_RANGE: (i64, i64) = (0, 200);

/// Calculation parameters as the caller supplied them. Unset fields take the
/// resolver defaults and are never checked against a specific character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CalcParams {
    pub elite: Option<i64>,
    pub level: Option<i64>,
    pub trust: Option<i64>,
    pub potential: Option<i64>,
}

/// A supplied parameter that the matched character cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Operator '{name}' cannot reach Elite {requested}. Max Elite phase is {max}.")]
    Elite {
        name: String,
        requested: i64,
        max: usize,
    },
    #[error("Operator '{name}' at Elite {elite} cannot reach Level {requested}. Max Level is {max}.")]
    Level {
        name: String,
        elite: usize,
        requested: i64,
        max: u32,
    },
    #[error(
        "Operator '{name}' does not have {requested} potential levels. Max potential upgrade count is {max}."
    )]
    Potential {
        name: String,
        requested: i64,
        max: usize,
    },
}

impl ValidationError {
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::Elite { .. } => "elite",
            Self::Level { .. } => "level",
            Self::Potential { .. } => "potential",
        }
    }
}

impl CalcParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Range check at the boundary, independent of any character.
    pub fn check_bounds(&self) -> Result<(), QueryError> {
        let checks = [
            ("elite", self.elite, ELITE_RANGE),
            ("level", self.level, LEVEL_RANGE),
            ("trust", self.trust, TRUST_RANGE),
            ("potential", self.potential, POTENTIAL_RANGE),
        ];
        for (parameter, value, range) in checks {
            if let Some(value) = value {
                QueryError::check_range(parameter, value, range)?;
            }
        }
        Ok(())
    }

    /// Strict check against one character. Level is checked against the
    /// requested tier, or the highest tier when no elite was given.
    pub fn validate_for(&self, record: &CharacterRecord) -> Result<(), ValidationError> {
        let max_elite = record.max_elite();
        if let Some(elite) = self.elite {
            if elite < 0 || elite as usize > max_elite {
                return Err(ValidationError::Elite {
                    name: record.name.clone(),
                    requested: elite,
                    max: max_elite,
                });
            }
        }

        if let Some(level) = self.level {
            let elite = self.elite.map_or(max_elite, |elite| elite as usize);
            if let Some(phase) = record.phase(elite) {
                if level > i64::from(phase.max_level) {
                    return Err(ValidationError::Level {
                        name: record.name.clone(),
                        elite,
                        requested: level,
                        max: phase.max_level,
                    });
                }
            }
        }

        if let Some(potential) = self.potential {
            let max = record.potential_rank_count();
            if potential > max as i64 {
                return Err(ValidationError::Potential {
                    name: record.name.clone(),
                    requested: potential,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn progression(&self) -> Progression {
        Progression {
            elite: self.elite,
            level: self.level,
            trust: self.trust.unwrap_or(DEFAULT_TRUST),
            potential: self.potential.unwrap_or(DEFAULT_POTENTIAL),
        }
    }
}
