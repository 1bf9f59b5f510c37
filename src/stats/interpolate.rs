//! Piecewise-linear keyframe interpolation.

use crate::data::character::{Keyframe, StatFrame};

fn lerp(lower: f64, upper: f64, ratio: f64) -> f64 {
    lower + (upper - lower) * ratio
}

/// Find the keyframe pair bounding `target`.
///
/// Scans in ascending order: the last frame with `level <= target` is the
/// lower bound, the first frame with `level >= target` is the upper bound.
/// Targets outside the domain fall back to the first/last frame.
pub fn bounding_frames(frames: &[Keyframe], target: u32) -> Option<(&Keyframe, &Keyframe)> {
    let mut lower = frames.first()?;
    let mut upper = frames.last()?;
    for frame in frames {
        if frame.level <= target {
            lower = frame;
        }
        if frame.level >= target {
            upper = frame;
            break;
        }
    }
    Some((lower, upper))
}

/// Interpolate every numeric stat at `target`. Flags come from the lower frame.
/// An exact keyframe hit returns that frame unchanged.
pub fn interpolate(frames: &[Keyframe], target: u32) -> Option<StatFrame> {
    let (lower, upper) = bounding_frames(frames, target)?;
    if lower.level == upper.level {
        return Some(lower.stats.clone());
    }

    let ratio = (f64::from(target) - f64::from(lower.level))
        / (f64::from(upper.level) - f64::from(lower.level));
    let (lo, up) = (&lower.stats, &upper.stats);
    Some(StatFrame {
        max_hp: lerp(lo.max_hp, up.max_hp, ratio),
        atk: lerp(lo.atk, up.atk, ratio),
        def: lerp(lo.def, up.def, ratio),
        magic_resistance: lerp(lo.magic_resistance, up.magic_resistance, ratio),
        cost: lerp(lo.cost, up.cost, ratio),
        block_cnt: lerp(lo.block_cnt, up.block_cnt, ratio),
        move_speed: lerp(lo.move_speed, up.move_speed, ratio),
        attack_speed: lerp(lo.attack_speed, up.attack_speed, ratio),
        base_attack_time: lerp(lo.base_attack_time, up.base_attack_time, ratio),
        respawn_time: lerp(lo.respawn_time, up.respawn_time, ratio),
        hp_recovery_per_sec: lerp(lo.hp_recovery_per_sec, up.hp_recovery_per_sec, ratio),
        sp_recovery_per_sec: lerp(lo.sp_recovery_per_sec, up.sp_recovery_per_sec, ratio),
        max_deploy_count: lerp(lo.max_deploy_count, up.max_deploy_count, ratio),
        max_deck_stack_cnt: lerp(lo.max_deck_stack_cnt, up.max_deck_stack_cnt, ratio),
        taunt_level: lerp(lo.taunt_level, up.taunt_level, ratio),
        mass_level: lerp(lo.mass_level, up.mass_level, ratio),
        base_force_level: lerp(lo.base_force_level, up.base_force_level, ratio),
        ..lo.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(level: u32, atk: f64) -> Keyframe {
        Keyframe {
            level,
            stats: StatFrame {
                atk,
                stun_immune: level == 1,
                ..StatFrame::default()
            },
        }
    }

    #[test]
    fn bounding_pair_stops_at_first_upper() {
        let frames = vec![frame(1, 10.0), frame(30, 20.0), frame(30, 25.0), frame(50, 40.0)];
        let (lower, upper) = bounding_frames(&frames, 30).unwrap();
        assert_eq!((lower.level, lower.stats.atk), (30, 20.0));
        assert_eq!((upper.level, upper.stats.atk), (30, 20.0));
    }

    #[test]
    fn flags_follow_lower_frame() {
        let frames = vec![frame(1, 0.0), frame(11, 100.0)];
        let stats = interpolate(&frames, 6).unwrap();
        assert_eq!(stats.atk, 50.0);
        assert!(stats.stun_immune);
    }

    #[test]
    fn single_frame_is_returned_for_any_target() {
        let frames = vec![frame(1, 42.0)];
        assert_eq!(interpolate(&frames, 70).unwrap().atk, 42.0);
    }

    #[test]
    fn empty_frames_yield_none() {
        assert!(interpolate(&[], 1).is_none());
    }
}
