//! Great-circle distance on the WGS84 mean sphere.

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two (lat, lon) points in degrees.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_m(40.0, -3.0, 40.0, -3.0), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is ~111.19 km on the mean sphere.
        let d = haversine_m(40.0, -3.0, 41.0, -3.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let d1 = haversine_m(40.4168, -3.7038, 41.3874, 2.1686); // Madrid -> Barcelona
        let d2 = haversine_m(41.3874, 2.1686, 40.4168, -3.7038);
        assert!((d1 - d2).abs() < 1e-9);
        // Roughly 505 km.
        assert!((d1 - 505_000.0).abs() < 5_000.0, "got {d1}");
    }

    #[test]
    fn test_small_offset_precision() {
        // ~0.00045 degrees of latitude is ~50 m.
        let d = haversine_m(40.0, -3.0, 40.00045, -3.0);
        assert!((d - 50.0).abs() < 0.5, "got {d}");
    }
}
