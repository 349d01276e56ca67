use crate::models::GeoPoint;

/// Great-circle distance provider. Injected so tests can pin distances
/// without fabricating coordinates.
pub trait Distance: Send + Sync {
    fn between_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

/// Haversine distance over a spherical Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl Distance for Haversine {
    fn between_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        const R: f64 = 6371.0; // Earth radius in km
        let d_lat = (to.latitude - from.latitude).to_radians();
        let d_lng = (to.longitude - from.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + from.latitude.to_radians().cos()
                * to.latitude.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        R * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        assert!(Haversine.between_km(p, p) < 1e-9);
    }

    #[test]
    fn paris_to_london_is_about_344_km() {
        let paris = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        let london = GeoPoint { latitude: 51.5074, longitude: -0.1278 };
        let km = Haversine.between_km(paris, london);
        assert!((km - 344.0).abs() < 5.0, "got {km}");
    }
}
