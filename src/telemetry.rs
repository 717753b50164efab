//! Telemetry field binding and the simulated development feed.
//!
//! Incoming records arrive as already-extracted scalars keyed by a
//! [`Field`]; the binding routes each value to the matching gauge
//! setter through a static match instead of a per-instance table of
//! method pointers. Values with absolute magnitude beyond
//! [`ABNORMAL_LIMIT`] are sensor noise and are dropped, not applied;
//! the gauge keeps showing the last good value.

use crate::gauge::GaugeState;
use rand::Rng;
use std::time::Duration;

/// Raw magnitudes beyond this are treated as corrupt telemetry.
pub const ABNORMAL_LIMIT: f64 = 100_000.0;

/// Cadence of the simulated feed.
pub const FEED_INTERVAL: Duration = Duration::from_millis(100);

/// Semantic telemetry fields the gauge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PlatformLon,
    PlatformLat,
    UavLon,
    UavLat,
    Direction,
    Distance,
    UavHeading,
}

/// Routes validated samples to gauge state and keeps the raw platform
/// and vehicle coordinates for consumers that need them.
#[derive(Debug, Default)]
pub struct TelemetryBinding {
    platform_lon: f64,
    platform_lat: f64,
    uav_lon: f64,
    uav_lat: f64,
    dropped_samples: u64,
}

impl TelemetryBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one sample. Abnormal or non-finite values are silently
    /// dropped and only counted; valid ones go to the field's setter.
    pub fn apply(&mut self, state: &mut GaugeState, field: Field, value: f64) {
        if !value.is_finite() || value.abs() > ABNORMAL_LIMIT {
            self.dropped_samples += 1;
            log::trace!("dropped abnormal sample {value} for {field:?}");
            return;
        }

        match field {
            Field::PlatformLon => self.platform_lon = value,
            Field::PlatformLat => self.platform_lat = value,
            Field::UavLon => self.uav_lon = value,
            Field::UavLat => self.uav_lat = value,
            Field::Direction => state.set_direction(value),
            Field::Distance => state.set_distance(value),
            Field::UavHeading => state.set_uav_heading(value),
        }
    }

    pub fn platform_position(&self) -> (f64, f64) {
        (self.platform_lon, self.platform_lat)
    }

    pub fn uav_position(&self) -> (f64, f64) {
        (self.uav_lon, self.uav_lat)
    }

    /// How many samples the abnormal-value guard has discarded.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }
}

/// One tick of simulated telemetry.
#[derive(Debug, Clone, Copy)]
pub struct FeedSample {
    /// Bearing in radians.
    pub direction: f64,
    /// Distance in meters.
    pub distance: f64,
    /// Vehicle heading in radians.
    pub uav_heading: f64,
}

impl FeedSample {
    pub fn fields(self) -> [(Field, f64); 3] {
        [
            (Field::Direction, self.direction),
            (Field::Distance, self.distance),
            (Field::UavHeading, self.uav_heading),
        ]
    }
}

/// Development fixture: an approach ramp with a slowly turning bearing,
/// jittered so the gauge visibly moves. Not part of the production
/// contract; real deployments feed [`TelemetryBinding`] directly.
#[derive(Debug)]
pub struct SimulatedFeed {
    distance: f64,
    direction_deg: f64,
    heading_deg: f64,
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self {
            distance: 600.0,
            direction_deg: 60.0,
            heading_deg: 30.0,
        }
    }

    pub fn next_sample(&mut self) -> FeedSample {
        let mut rng = rand::rng();
        self.distance = (self.distance - 1.23 + rng.random_range(-0.2..0.2)).max(0.0);
        self.direction_deg += 0.5;
        self.heading_deg -= 0.5;

        FeedSample {
            direction: self.direction_deg.to_radians(),
            distance: self.distance,
            uav_heading: self.heading_deg.to_radians(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abnormal_samples_are_dropped_and_counted() {
        let mut state = GaugeState::new();
        let mut binding = TelemetryBinding::new();

        binding.apply(&mut state, Field::Distance, 250.0);
        assert_eq!(state.distance(), 250.0);

        binding.apply(&mut state, Field::Distance, 100_001.0);
        binding.apply(&mut state, Field::Distance, -200_000.0);
        binding.apply(&mut state, Field::Direction, f64::NAN);
        assert_eq!(state.distance(), 250.0, "last good value survives");
        assert_eq!(state.direction(), 0.0);
        assert_eq!(binding.dropped_samples(), 3);
    }

    #[test]
    fn limit_is_inclusive() {
        let mut state = GaugeState::new();
        let mut binding = TelemetryBinding::new();
        binding.apply(&mut state, Field::Distance, 100_000.0);
        assert_eq!(state.distance(), 100_000.0);
        assert_eq!(binding.dropped_samples(), 0);
    }

    #[test]
    fn geo_fields_route_to_binding_storage() {
        let mut state = GaugeState::new();
        let mut binding = TelemetryBinding::new();
        binding.apply(&mut state, Field::PlatformLon, 116.39);
        binding.apply(&mut state, Field::PlatformLat, 39.91);
        binding.apply(&mut state, Field::UavLon, 116.40);
        binding.apply(&mut state, Field::UavLat, 39.92);
        assert_eq!(binding.platform_position(), (116.39, 39.91));
        assert_eq!(binding.uav_position(), (116.40, 39.92));
    }

    #[test]
    fn simulated_feed_ramps_toward_the_platform() {
        let mut feed = SimulatedFeed::new();
        let first = feed.next_sample();
        assert!(first.distance < 600.0);
        assert!(first.distance > 590.0);

        let mut last = first;
        for _ in 0..100 {
            last = feed.next_sample();
        }
        assert!(last.distance < first.distance);
        assert!(last.distance >= 0.0);
        assert!(last.direction > first.direction);
        assert!(last.uav_heading < first.uav_heading);
    }

    #[test]
    fn feed_sample_field_mapping() {
        let sample = FeedSample {
            direction: 1.0,
            distance: 2.0,
            uav_heading: 3.0,
        };
        let mut state = GaugeState::new();
        let mut binding = TelemetryBinding::new();
        for (field, value) in sample.fields() {
            binding.apply(&mut state, field, value);
        }
        assert_eq!(state.direction(), 1.0);
        assert_eq!(state.distance(), 2.0);
        assert_eq!(state.uav_heading(), 3.0);
    }
}
