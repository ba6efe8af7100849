//! Difficulty curves
//!
//! Pure functions of elapsed session time. Both the world tick period and the
//! spawn interval only ever go down; the wall cap and ramped spawn weights
//! only ever go up.

use crate::config::{CurveParams, CurveProfile, DifficultyConfig, Keyframe, SpawnWeight};

/// Piecewise-linear lookup; holds the first/last value outside the key range
fn keyframed(keys: &[Keyframe], t: f32) -> Option<f32> {
    let first = keys.first()?;
    if t <= first.at_ms {
        return Some(first.value);
    }
    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t < b.at_ms {
            let span = b.at_ms - a.at_ms;
            if span <= 0.0 {
                return Some(b.value);
            }
            let f = (t - a.at_ms) / span;
            return Some(a.value + (b.value - a.value) * f);
        }
    }
    keys.last().map(|k| k.value)
}

impl CurveParams {
    /// Evaluate at `elapsed_ms` under `profile`, never below `floor`
    pub fn eval(&self, profile: CurveProfile, elapsed_ms: f32) -> f32 {
        let t = elapsed_ms.max(0.0);
        let value = match profile {
            CurveProfile::Linear => self.start - self.slope_per_min.max(0.0) * (t / 60_000.0),
            CurveProfile::Plateau => keyframed(&self.keys, t).unwrap_or(self.start),
            CurveProfile::SqrtDecay => {
                let decay = self.decay_ms.max(1.0);
                self.floor + (self.start - self.floor) / (1.0 + t / decay).sqrt()
            }
        };
        value.max(self.floor)
    }
}

impl DifficultyConfig {
    /// World clock period (ms) at this point in the session
    pub fn tick_ms(&self, elapsed_ms: f32) -> f32 {
        self.tick_ms.eval(self.profile, elapsed_ms)
    }

    /// World ticks per spawn at this point in the session
    pub fn spawn_interval(&self, elapsed_ms: f32) -> f32 {
        self.spawn_interval.eval(self.profile, elapsed_ms)
    }

    /// Live wall obstacles allowed before walls drop out of the spawn table
    pub fn wall_cap(&self, elapsed_ms: f32) -> usize {
        let steps = if self.wall_cap_step_ms > 0.0 {
            (elapsed_ms.max(0.0) / self.wall_cap_step_ms) as usize
        } else {
            0
        };
        (self.wall_cap_base + steps).min(self.wall_cap_max.max(self.wall_cap_base))
    }
}

impl SpawnWeight {
    /// Draw weight at `elapsed_ms` (0 while locked)
    pub fn weight_at(&self, elapsed_ms: f32) -> f32 {
        if elapsed_ms < self.unlock_ms {
            return 0.0;
        }
        let weight = match self.ramp {
            None => self.weight,
            Some(ramp) => {
                let span = ramp.saturate_ms - self.unlock_ms;
                let f = if span > 0.0 {
                    ((elapsed_ms - self.unlock_ms) / span).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                ramp.start_weight + (ramp.end_weight - ramp.start_weight) * f
            }
        };
        weight.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TunnelConfig, WeightRamp};
    use crate::sim::entity::EntityType;
    use proptest::prelude::*;

    #[test]
    fn test_plateau_values() {
        let d = TunnelConfig::default().difficulty;
        assert_eq!(d.tick_ms(0.0), 800.0);
        assert_eq!(d.tick_ms(30_000.0), 650.0);
        assert_eq!(d.tick_ms(45_000.0), 650.0, "plateau holds");
        assert_eq!(d.tick_ms(10_000_000.0), 380.0);
        assert_eq!(d.spawn_interval(0.0), 3.0);
        assert!((d.spawn_interval(15_000.0) - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_linear_hits_floor() {
        let d = TunnelConfig::with_profile(CurveProfile::Linear).difficulty;
        assert_eq!(d.tick_ms(0.0), 800.0);
        assert_eq!(d.tick_ms(60_000.0), 740.0);
        assert_eq!(d.tick_ms(3_600_000.0), 380.0);
    }

    #[test]
    fn test_sqrt_decay_shape() {
        let d = TunnelConfig::with_profile(CurveProfile::SqrtDecay).difficulty;
        assert_eq!(d.tick_ms(0.0), 800.0);
        // 1 + t/decay = 4 -> halfway between start and floor
        let t = 3.0 * d.tick_ms.decay_ms;
        assert!((d.tick_ms(t) - 590.0).abs() < 1e-2);
    }

    #[test]
    fn test_wall_cap_grows_to_max() {
        let d = TunnelConfig::default().difficulty;
        assert_eq!(d.wall_cap(0.0), 2);
        assert_eq!(d.wall_cap(60_000.0), 3);
        assert_eq!(d.wall_cap(600_000.0), 5);
    }

    #[test]
    fn test_ramped_weight() {
        let w = SpawnWeight {
            kind: EntityType::Heart,
            weight: 0.0,
            unlock_ms: 10_000.0,
            ramp: Some(WeightRamp {
                saturate_ms: 20_000.0,
                start_weight: 2.0,
                end_weight: 6.0,
            }),
        };
        assert_eq!(w.weight_at(5_000.0), 0.0);
        assert_eq!(w.weight_at(10_000.0), 2.0);
        assert_eq!(w.weight_at(15_000.0), 4.0);
        assert_eq!(w.weight_at(50_000.0), 6.0);
    }

    #[test]
    fn test_empty_keys_fall_back_to_start() {
        let params = CurveParams {
            start: 500.0,
            floor: 100.0,
            ..Default::default()
        };
        assert_eq!(params.eval(CurveProfile::Plateau, 1_000.0), 500.0);
    }

    proptest! {
        #[test]
        fn prop_curves_never_increase(
            profile_idx in 0usize..3,
            a in 0.0f32..2_000_000.0,
            b in 0.0f32..2_000_000.0,
        ) {
            let profile =
                [CurveProfile::Linear, CurveProfile::Plateau, CurveProfile::SqrtDecay][profile_idx];
            let d = TunnelConfig::with_profile(profile).difficulty;
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(d.tick_ms(late) <= d.tick_ms(early) + 1e-3);
            prop_assert!(d.spawn_interval(late) <= d.spawn_interval(early) + 1e-4);
            prop_assert!(d.tick_ms(late) >= d.tick_ms.floor);
            prop_assert!(d.wall_cap(late) >= d.wall_cap(early));
        }
    }
}
