use super::Vec2;

/// Geographic point in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Longitude shrink factor at this latitude (`cos(lat)`).
    pub fn lng_scale(&self) -> f64 {
        self.lat.to_radians().cos()
    }

    /// Offset as a `(lat, lng)` vector, `x = lat`, `y = lng`.
    pub fn delta_to(self, other: GeoPoint) -> Vec2 {
        Vec2::new(other.lat - self.lat, other.lng - self.lng)
    }

    pub fn offset(self, d: Vec2) -> GeoPoint {
        GeoPoint::new(self.lat + d.x, self.lng + d.y)
    }

    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lat + other.lat) / 2.0, (self.lng + other.lng) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;
    use crate::math::Vec2;

    #[test]
    fn delta_and_offset_are_inverse() {
        let a = GeoPoint::new(37.09, -95.71);
        let b = GeoPoint::new(51.17, 10.45);
        let d = a.delta_to(b);
        assert_eq!(d, Vec2::new(51.17 - 37.09, 10.45 - -95.71));
        assert_eq!(a.offset(d), GeoPoint::new(37.09 + d.x, -95.71 + d.y));
    }

    #[test]
    fn midpoint_is_componentwise() {
        let m = GeoPoint::new(0.0, 10.0).midpoint(GeoPoint::new(10.0, 20.0));
        assert_eq!(m, GeoPoint::new(5.0, 15.0));
    }

    #[test]
    fn lng_scale_shrinks_towards_poles() {
        assert_eq!(GeoPoint::new(0.0, 0.0).lng_scale(), 1.0);
        assert!((GeoPoint::new(60.0, 0.0).lng_scale() - 0.5).abs() < 1e-12);
    }
}
