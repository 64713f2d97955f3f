//! Success zone: the target arc on the dial
//!
//! Angles are whole degrees in `[0, 360)`. A zone whose `start` is greater than
//! its `end` wraps through 0°.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// An arc of the dial counting as a correct input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessZone {
    pub start: u16,
    pub end: u16,
    /// Angular width in degrees, always in `1..=360`
    pub width: u16,
}

impl SuccessZone {
    /// Build a zone starting at `start` spanning `width` degrees.
    ///
    /// `start` is wrapped into `[0, 360)` and `width` clamped to `1..=360`.
    pub fn new(start: u16, width: u16) -> Self {
        let start = start % 360;
        let width = width.clamp(1, 360);
        Self {
            start,
            end: (start + width) % 360,
            width,
        }
    }

    /// Whether the zone wraps through 0°
    #[inline]
    pub fn wraps(&self) -> bool {
        self.start >= self.end
    }

    /// Check if a cursor angle falls inside the zone (edges inclusive)
    pub fn contains(&self, angle: f32) -> bool {
        let start = self.start as f32;
        let end = self.end as f32;

        if self.start < self.end {
            angle >= start && angle <= end
        } else {
            // Wraparound case (e.g., 350° → 10°)
            angle >= start || angle <= end
        }
    }
}

/// Owns the current target zone and the RNG that places new ones
#[derive(Debug, Clone)]
pub struct SuccessZoneEngine {
    rng: Pcg32,
    zone: SuccessZone,
}

impl SuccessZoneEngine {
    pub fn new(seed: u64, width: u16) -> Self {
        let mut engine = Self {
            rng: Pcg32::seed_from_u64(seed),
            zone: SuccessZone::new(0, width),
        };
        engine.randomize(width);
        engine
    }

    /// Current zone
    #[inline]
    pub fn zone(&self) -> SuccessZone {
        self.zone
    }

    /// Replace the zone with an explicit one
    pub fn set_zone(&mut self, zone: SuccessZone) {
        self.zone = zone;
    }

    /// Place a new zone of `width` degrees at a uniformly random start
    pub fn randomize(&mut self, width: u16) -> SuccessZone {
        let start = self.rng.random_range(0..360u16);
        self.zone = SuccessZone::new(start, width);
        self.zone
    }

    /// Re-roll the zone at its current width
    pub fn regenerate(&mut self) -> SuccessZone {
        self.randomize(self.zone.width)
    }

    pub fn contains(&self, angle: f32) -> bool {
        self.zone.contains(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contains_no_wrap() {
        let zone = SuccessZone::new(40, 120);
        assert_eq!(zone.end, 160);
        assert!(zone.contains(40.0));
        assert!(zone.contains(100.5));
        assert!(zone.contains(160.0));
        assert!(!zone.contains(39.9));
        assert!(!zone.contains(200.0));
    }

    #[test]
    fn test_contains_wraparound() {
        let zone = SuccessZone::new(350, 20);
        assert_eq!((zone.start, zone.end), (350, 10));
        assert!(zone.wraps());
        assert!(zone.contains(5.0));
        assert!(zone.contains(355.0));
        assert!(zone.contains(0.0));
        assert!(!zone.contains(180.0));
        assert!(!zone.contains(10.5));
    }

    #[test]
    fn test_full_circle_zone_contains_everything() {
        let zone = SuccessZone::new(123, 360);
        assert_eq!(zone.start, zone.end);
        for angle in [0.0, 90.0, 122.9, 123.0, 359.9] {
            assert!(zone.contains(angle));
        }
    }

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(SuccessZone::new(0, 0).width, 1);
        assert_eq!(SuccessZone::new(0, 500).width, 360);
        assert_eq!(SuccessZone::new(400, 10).start, 40);
    }

    #[test]
    fn test_engine_is_deterministic_per_seed() {
        let mut a = SuccessZoneEngine::new(7, 90);
        let mut b = SuccessZoneEngine::new(7, 90);
        for _ in 0..20 {
            assert_eq!(a.regenerate(), b.regenerate());
        }
    }

    proptest! {
        #[test]
        fn prop_randomized_zone_is_well_formed(seed in any::<u64>(), width in 1u16..=360) {
            let mut engine = SuccessZoneEngine::new(seed, width);
            let zone = engine.randomize(width);
            prop_assert!(zone.start < 360);
            prop_assert!(zone.end < 360);
            prop_assert_eq!(zone.width, width);
            prop_assert_eq!(zone.end, (zone.start + width) % 360);
            // Both edges always count
            prop_assert!(zone.contains(zone.start as f32));
            prop_assert!(zone.contains(zone.end as f32));
        }
    }
}
