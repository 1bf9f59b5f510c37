//! Attribute resolution engine.
//!
//! Turns a [CharacterRecord](crate::data::character::CharacterRecord) and a
//! requested progression point into an [AttributeVector]:
//! keyframe interpolation inside the selected elite tier, then the bond
//! bonus (trust capped at 100), then the cumulative potential bonus.

mod attribute;
mod interpolate;
mod resolver;

pub use attribute::{AttributeType, AttributeVector};
pub use interpolate::{bounding_frames, interpolate};
pub use resolver::{
    base_stats, bond_bonus, potential_bonus, resolve, BondBonus, PotentialBonus, Progression,
    DEFAULT_POTENTIAL, DEFAULT_TRUST, TRUST_BONUS_CAP,
};
