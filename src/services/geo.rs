use crate::models::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (Haversine).
/// Inputs are degrees; callers must ensure coordinates are present and valid
/// before invoking, NaN inputs propagate into the result.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates {
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let manila = point(14.5995, 120.9842);
        assert_eq!(haversine_km(manila, manila), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = point(14.5995, 120.9842);
        let b = point(14.6760, 121.0437);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_non_negative() {
        let a = point(-33.8688, 151.2093);
        let b = point(51.5074, -0.1278);
        assert!(haversine_km(a, b) >= 0.0);
    }

    #[test]
    fn test_nearby_points_within_dedup_radius() {
        // The pair from the submission scenario: ~0.06 km apart.
        let a = point(14.5995, 120.9842);
        let b = point(14.6000, 120.9850);
        let d = haversine_km(a, b);
        assert!(d < 0.5, "expected < 0.5 km, got {}", d);
        assert!(d > 0.0);
    }

    #[test]
    fn test_known_city_pair_distance() {
        // Manila to Quezon City center, roughly 10.6 km.
        let manila = point(14.5995, 120.9842);
        let quezon = point(14.6760, 121.0437);
        let d = haversine_km(manila, quezon);
        assert!((9.0..12.0).contains(&d), "got {}", d);
    }
}
