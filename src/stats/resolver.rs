//! Attribute resolution: base interpolation + bond bonus + potential bonus.

use crate::data::character::{CharacterRecord, PotentialRank, StatFrame};
use crate::stats::attribute::{AttributeType, AttributeVector};
use crate::stats::interpolate::interpolate;

pub const DEFAULT_TRUST: i64 = 100;
pub const DEFAULT_POTENTIAL: i64 = 5;
/// Trust above this value gives no further bonus.
pub const TRUST_BONUS_CAP: i64 = 100;

/// Requested progression point. `None` elite/level mean "highest available".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub elite: Option<i64>,
    pub level: Option<i64>,
    pub trust: i64,
    pub potential: i64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            elite: None,
            level: None,
            trust: DEFAULT_TRUST,
            potential: DEFAULT_POTENTIAL,
        }
    }
}

impl Progression {
    pub fn at(elite: i64, level: i64) -> Self {
        Self {
            elite: Some(elite),
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn with_trust(mut self, trust: i64) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_potential(mut self, potential: i64) -> Self {
        self.potential = potential;
        self
    }
}

/// Bond bonus: only the four survivability/damage stats.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BondBonus {
    pub max_hp: f64,
    pub atk: f64,
    pub def: f64,
    pub magic_resistance: f64,
}

impl BondBonus {
    fn from_frame(stats: &StatFrame) -> Self {
        Self {
            max_hp: stats.max_hp,
            atk: stats.atk,
            def: stats.def,
            magic_resistance: stats.magic_resistance,
        }
    }
}

/// Accumulated potential deltas, already signed for direct addition.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PotentialBonus {
    pub max_hp: f64,
    pub atk: f64,
    pub def: f64,
    pub magic_resistance: f64,
    pub attack_speed: f64,
    pub cost: f64,
    pub block_cnt: f64,
    pub respawn_time: f64,
}

impl PotentialBonus {
    pub fn apply(&mut self, attribute: AttributeType, value: f64) {
        match attribute {
            AttributeType::MaxHp => self.max_hp += value,
            AttributeType::Atk => self.atk += value,
            AttributeType::Def => self.def += value,
            AttributeType::MagicResistance => self.magic_resistance += value,
            AttributeType::AttackSpeed => self.attack_speed += value,
            AttributeType::BlockCnt => self.block_cnt += value,
            // Reductions: potentials shave deployment cost and redeploy time.
            AttributeType::Cost => self.cost -= value,
            AttributeType::RespawnTime => self.respawn_time -= value,
        }
    }
}

/// Clamp into `[low, high]` without panicking when `high < low`.
fn clamp_index(value: i64, low: i64, high: i64) -> i64 {
    value.min(high).max(low)
}

/// Interpolated base stats for the selected tier/level, plus the tier and
/// level actually used after clamping.
pub fn base_stats(record: &CharacterRecord, progression: &Progression) -> (usize, u32, StatFrame) {
    let last_elite = record.max_elite() as i64;
    let elite = clamp_index(progression.elite.unwrap_or(last_elite), 0, last_elite) as usize;
    let Some(phase) = record.phase(elite) else {
        return (elite, 1, StatFrame::default());
    };

    let max_level = i64::from(phase.max_level);
    let level = clamp_index(progression.level.unwrap_or(max_level), 1, max_level) as u32;
    let stats = interpolate(&phase.keyframes, level).unwrap_or_default();
    (elite, level, stats)
}

pub fn bond_bonus(record: &CharacterRecord, trust: i64) -> BondBonus {
    let trust = clamp_index(trust, 0, TRUST_BONUS_CAP) as u32;
    interpolate(&record.favor_keyframes, trust)
        .map(|stats| BondBonus::from_frame(&stats))
        .unwrap_or_default()
}

/// Sum of the deltas of the first `potential` ranks.
pub fn potential_bonus(ranks: &[PotentialRank], potential: i64) -> PotentialBonus {
    let count = clamp_index(potential, 0, ranks.len() as i64) as usize;
    let mut bonus = PotentialBonus::default();
    for delta in ranks[..count].iter().filter_map(|rank| rank.bonus) {
        bonus.apply(delta.attribute, delta.value);
    }
    bonus
}

/// Effective attributes of `record` at `progression`. Pure and reentrant.
pub fn resolve(record: &CharacterRecord, progression: &Progression) -> AttributeVector {
    let (_, _, base) = base_stats(record, progression);
    let bond = bond_bonus(record, progression.trust);
    let potential = potential_bonus(&record.potential_ranks, progression.potential);

    AttributeVector {
        max_hp: (base.max_hp + bond.max_hp + potential.max_hp) as i64,
        atk: (base.atk + bond.atk + potential.atk) as i64,
        def: (base.def + bond.def + potential.def) as i64,
        magic_resistance: base.magic_resistance + bond.magic_resistance + potential.magic_resistance,
        cost: (base.cost + potential.cost) as i64,
        block_cnt: (base.block_cnt + potential.block_cnt) as i64,
        move_speed: base.move_speed,
        attack_speed: base.attack_speed + potential.attack_speed,
        base_attack_time: base.base_attack_time,
        respawn_time: (base.respawn_time + potential.respawn_time) as i64,
    }
}
