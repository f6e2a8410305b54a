// SPDX-License-Identifier: MIT

//! Geofence evaluation against the school's reference coordinate.
//!
//! Great-circle distance via the haversine formula. At city scale this is
//! accurate to within meters, which is plenty for a 100 m geofence, and it
//! avoids dragging in projected-coordinate math.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance verdict for a captured coordinate.
#[derive(Debug, Clone, Copy)]
pub struct GeofenceVerdict {
    /// Great-circle distance to the reference point, meters. NaN when the
    /// input coordinate was not a finite number.
    pub distance_m: f64,
    /// `distance_m <= radius`. Always false for NaN distance.
    pub within_range: bool,
}

impl GeofenceVerdict {
    /// True when the distance could not be computed. Callers must treat
    /// this as "unknown location" and block submission, never pass.
    pub fn is_unknown(&self) -> bool {
        self.distance_m.is_nan()
    }
}

/// Evaluates captured coordinates against a fixed center and radius.
#[derive(Debug, Clone)]
pub struct GeofenceService {
    latitude: f64,
    longitude: f64,
    radius_m: f64,
}

impl GeofenceService {
    pub fn new(latitude: f64, longitude: f64, radius_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m,
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn evaluate(&self, latitude: f64, longitude: f64) -> GeofenceVerdict {
        let distance_m = haversine_distance_m(latitude, longitude, self.latitude, self.longitude);
        GeofenceVerdict {
            distance_m,
            // NaN compares false, so an unknown distance never passes.
            within_range: distance_m <= self.radius_m,
        }
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
/// NaN inputs propagate to a NaN result.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
