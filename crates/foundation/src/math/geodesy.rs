use super::GeoPoint;

/// Mean Earth radius (kilometers) for great-circle estimates.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;
/// Rough meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Meters per degree of longitude at `lat_deg`.
pub fn meters_per_degree_lng(lat_deg: f64) -> f64 {
    METERS_PER_DEGREE_LAT * lat_deg.to_radians().cos()
}

/// Haversine distance in kilometers. An estimate, not a route length.
pub fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// `|dlat| + |dlng|` in degrees. Used for ordering, never as a distance.
pub fn manhattan_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lat - b.lat).abs() + (a.lng - b.lng).abs()
}
