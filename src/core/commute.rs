use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Great-circle distance between two points in kilometers
///
/// # Arguments
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let from = Point::new(lon1, lat1);
    let to = Point::new(lon2, lat2);

    from.haversine_distance(&to) / 1000.0
}

/// Straight-line commute estimate used when annotating inventory
///
/// minutes = distance / average speed + fixed overhead (walking, waiting).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteModel {
    pub average_speed_kmh: f64,
    pub overhead_minutes: f64,
}

impl Default for CommuteModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: 25.0,
            overhead_minutes: 10.0,
        }
    }
}

impl CommuteModel {
    /// Estimated commute in whole minutes between `(lat, lon)` pairs
    pub fn estimate_minutes(&self, from: (f64, f64), to: (f64, f64)) -> u32 {
        let km = haversine_km(from.0, from.1, to.0, to.1);
        let speed = self.average_speed_kmh.max(1.0);
        let minutes = km / speed * 60.0 + self.overhead_minutes.max(0.0);

        minutes.round().clamp(0.0, u32::MAX as f64) as u32
    }
}
