//! Curved origin→destination connectors.
//!
//! A connector is a quadratic Bezier whose control point is pushed sideways
//! off the straight segment. Side, bulge and jitter all come from the seed
//! key's hash, so a given destination curves the same way in every session
//! without any stored state.

use foundation::hash::{seed_hash, seed_magnitude};
use foundation::math::{GeoPoint, Vec2, great_circle_km};

/// Number of samples along every connector (`t = i / 60`).
pub const CURVE_SAMPLES: usize = 61;

const NORTH_BIAS: f64 = 1.1;
const WEST_BIAS: f64 = 0.9;
const JITTER_STEP: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorError {
    /// Start and end coincide; there is no perpendicular to bend along.
    ZeroLength,
    EmptySeed,
    NonFinite,
}

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorError::ZeroLength => write!(f, "connector start and end coincide"),
            ConnectorError::EmptySeed => write!(f, "connector seed key is empty"),
            ConnectorError::NonFinite => write!(f, "connector endpoint is not finite"),
        }
    }
}

impl std::error::Error for ConnectorError {}

/// Curve shape derived from a seed key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub hash: i32,
    /// `+1` or `-1`: which side of the segment the curve bulges to.
    pub direction: f64,
    /// Fraction of the segment length used as bulge, in `[0.2, 0.333)`.
    pub intensity: f64,
    /// Upper bound on the bulge in degrees, in `[10, 30)`.
    pub height_variation: f64,
    /// Added to both control point components, in `[-0.9, 0.6]`.
    pub jitter: f64,
}

impl CurveParams {
    pub fn from_seed(seed_key: &str) -> Self {
        Self::from_hash(seed_hash(seed_key))
    }

    pub fn from_hash(hash: i32) -> Self {
        let magnitude = seed_magnitude(hash);
        // Truncating remainder: negative odd hashes land on -1 as well.
        let direction = if hash % 2 == 0 { 1.0 } else { -1.0 };
        let intensity = 0.2 + f64::from(magnitude % 3) / 15.0;
        let height_variation = f64::from(magnitude % 20) + 10.0;
        let jitter = (f64::from(magnitude % 6) - 3.0) * JITTER_STEP;
        Self {
            hash,
            direction,
            intensity,
            height_variation,
            jitter,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEdge {
    pub destination_id: String,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub control_point: GeoPoint,
    pub params: CurveParams,
    pub curve_points: Vec<GeoPoint>,
}

impl DeliveryEdge {
    /// Great-circle estimate between the endpoints (not the curve length).
    pub fn great_circle_km(&self) -> f64 {
        great_circle_km(self.start, self.end)
    }
}

/// Builds the connector from `start` to `end`. Pure: identical inputs give
/// bit-identical points.
pub fn generate_connector(
    start: GeoPoint,
    end: GeoPoint,
    seed_key: &str,
) -> Result<DeliveryEdge, ConnectorError> {
    if seed_key.is_empty() {
        return Err(ConnectorError::EmptySeed);
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(ConnectorError::NonFinite);
    }

    let delta = start.delta_to(end);
    let distance = delta.length();
    if distance == 0.0 {
        return Err(ConnectorError::ZeroLength);
    }

    let params = CurveParams::from_seed(seed_key);
    let control_point = control_point(start, end, delta, distance, &params);

    let mut curve_points = Vec::with_capacity(CURVE_SAMPLES);
    let last = (CURVE_SAMPLES - 1) as f64;
    for i in 0..CURVE_SAMPLES {
        let t = i as f64 / last;
        curve_points.push(quadratic_bezier(start, control_point, end, t));
    }
    curve_points[0] = start;
    curve_points[CURVE_SAMPLES - 1] = end;

    Ok(DeliveryEdge {
        destination_id: seed_key.to_string(),
        start,
        end,
        control_point,
        params,
        curve_points,
    })
}

fn control_point(
    start: GeoPoint,
    end: GeoPoint,
    delta: Vec2,
    distance: f64,
    params: &CurveParams,
) -> GeoPoint {
    let mut curve_offset = (distance * params.intensity).min(params.height_variation);
    // Stylistic bias only; there is no geometric reason behind these factors.
    if end.lat > start.lat {
        curve_offset *= NORTH_BIAS;
    }
    if end.lng < start.lng {
        curve_offset *= WEST_BIAS;
    }

    // `delta` is (lat, lng); rotate it a quarter turn and scale to the offset.
    let perp = Vec2::new(
        -delta.y / distance * curve_offset * params.direction,
        delta.x / distance * curve_offset * params.direction,
    );
    start
        .midpoint(end)
        .offset(perp)
        .offset(Vec2::new(params.jitter, params.jitter))
}

fn quadratic_bezier(p0: GeoPoint, c: GeoPoint, p1: GeoPoint, t: f64) -> GeoPoint {
    let u = 1.0 - t;
    GeoPoint::new(
        u * u * p0.lat + 2.0 * u * t * c.lat + t * t * p1.lat,
        u * u * p0.lng + 2.0 * u * t * c.lng + t * t * p1.lng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(37.09, -95.71);
    const GERMANY: GeoPoint = GeoPoint::new(51.17, 10.45);

    #[test]
    fn endpoints_are_pinned_and_sample_count_fixed() {
        let edge = generate_connector(ORIGIN, GERMANY, "Germany").unwrap();
        assert_eq!(edge.curve_points.len(), CURVE_SAMPLES);
        assert_eq!(edge.curve_points[0], ORIGIN);
        assert_eq!(edge.curve_points[60], GERMANY);
        assert_eq!(edge.destination_id, "Germany");
    }

    #[test]
    fn generation_is_reproducible() {
        let a = generate_connector(ORIGIN, GERMANY, "Germany").unwrap();
        let b = generate_connector(ORIGIN, GERMANY, "Germany").unwrap();
        assert_eq!(a, b);
        for (p, q) in a.curve_points.iter().zip(&b.curve_points) {
            assert_eq!(p.lat.to_bits(), q.lat.to_bits());
            assert_eq!(p.lng.to_bits(), q.lng.to_bits());
        }
    }

    #[test]
    fn direction_follows_hash_parity() {
        // "Germany" hashes odd, "Canada" hashes even.
        assert_eq!(CurveParams::from_seed("Germany").direction, -1.0);
        assert_eq!(CurveParams::from_seed("Canada").direction, 1.0);
        // Negative odd hash.
        assert_eq!(CurveParams::from_hash(-3).direction, -1.0);
        assert_eq!(CurveParams::from_hash(-4).direction, 1.0);
    }

    #[test]
    fn params_stay_in_range() {
        for key in ["Germany", "Canada", "United States", "France", "Japan", "x", "Åland"] {
            let p = CurveParams::from_seed(key);
            assert!(p.intensity >= 0.2 && p.intensity < 0.34, "{key}: {p:?}");
            assert!(p.height_variation >= 10.0 && p.height_variation < 30.0);
            assert!(p.jitter >= -0.9 - 1e-12 && p.jitter <= 0.6 + 1e-12);
        }
        let min = CurveParams::from_hash(i32::MIN);
        assert_eq!(min.direction, 1.0);
    }

    #[test]
    fn germany_control_point_matches_formula() {
        let p = CurveParams::from_seed("Germany");
        // |1588421523| % 3 == 0, % 20 == 3, % 6 == 3
        assert_eq!(p.intensity, 0.2);
        assert_eq!(p.height_variation, 13.0);
        assert_eq!(p.jitter, 0.0);

        let edge = generate_connector(ORIGIN, GERMANY, "Germany").unwrap();
        let d_lat = GERMANY.lat - ORIGIN.lat;
        let d_lng = GERMANY.lng - ORIGIN.lng;
        let dist = (d_lat * d_lat + d_lng * d_lng).sqrt();
        // min(dist * 0.2, 13) == 13; north of origin, east of origin.
        let offset = 13.0 * 1.1;
        let expected_lat = (ORIGIN.lat + GERMANY.lat) / 2.0 + (-d_lng / dist * offset * -1.0);
        let expected_lng = (ORIGIN.lng + GERMANY.lng) / 2.0 + (d_lat / dist * offset * -1.0);
        assert!((edge.control_point.lat - expected_lat).abs() < 1e-9);
        assert!((edge.control_point.lng - expected_lng).abs() < 1e-9);
    }

    #[test]
    fn curve_bulges_to_one_side() {
        let edge = generate_connector(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 40.0), "Canada")
            .unwrap();
        // Eastward segment with direction +1 bends to the south.
        let mid = edge.curve_points[30];
        assert!(mid.lat < -5.0, "mid {mid:?}");
        let flipped =
            generate_connector(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 40.0), "Germany")
                .unwrap();
        assert!(flipped.curve_points[30].lat > 0.0);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(
            generate_connector(ORIGIN, ORIGIN, "Germany"),
            Err(ConnectorError::ZeroLength)
        );
        assert_eq!(
            generate_connector(ORIGIN, GERMANY, ""),
            Err(ConnectorError::EmptySeed)
        );
        assert_eq!(
            generate_connector(ORIGIN, GeoPoint::new(f64::NAN, 0.0), "Germany"),
            Err(ConnectorError::NonFinite)
        );
    }

    #[test]
    fn great_circle_estimate_is_exposed() {
        let edge = generate_connector(ORIGIN, GERMANY, "Germany").unwrap();
        let km = edge.great_circle_km();
        assert!(km > 7_500.0 && km < 8_500.0);
    }
}
