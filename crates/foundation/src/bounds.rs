use crate::math::GeoPoint;

/// Axis-aligned box in degree space.
///
/// `left`/`right` are longitudes, `top`/`bottom` are latitudes with
/// `top >= bottom` for a well-formed box. This is a footprint for overlap
/// tests, not a pixel-space rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl GeoRect {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        GeoRect {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = GeoRect::new(first.lng, first.lng, first.lat, first.lat);
        for p in iter {
            rect.left = rect.left.min(p.lng);
            rect.right = rect.right.max(p.lng);
            rect.top = rect.top.max(p.lat);
            rect.bottom = rect.bottom.min(p.lat);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.top + self.bottom) * 0.5,
            (self.left + self.right) * 0.5,
        )
    }

    /// Overlap test. Touching edges count as a collision.
    pub fn intersects(&self, other: &GeoRect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom > other.top
            || self.top < other.bottom)
    }

    /// Grows the box by `ratio` of its size on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let dx = self.width() * ratio;
        let dy = self.height() * ratio;
        GeoRect::new(
            self.left - dx,
            self.right + dx,
            self.top + dy,
            self.bottom - dy,
        )
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lng >= self.left
            && point.lng <= self.right
            && point.lat >= self.bottom
            && point.lat <= self.top
    }
}

#[cfg(test)]
mod tests {
    use super::GeoRect;
    use crate::math::GeoPoint;

    #[test]
    fn overlapping_boxes_intersect() {
        let a = GeoRect::new(0.0, 2.0, 2.0, 0.0);
        let b = GeoRect::new(1.0, 3.0, 3.0, 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = GeoRect::new(0.0, 1.0, 1.0, 0.0);
        let right = GeoRect::new(1.5, 2.0, 1.0, 0.0);
        let above = GeoRect::new(0.0, 1.0, 3.0, 2.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn shared_edge_counts_as_collision() {
        let a = GeoRect::new(0.0, 1.0, 1.0, 0.0);
        let b = GeoRect::new(1.0, 2.0, 1.0, 0.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn from_points_and_pad() {
        let pts = [GeoPoint::new(10.0, -5.0), GeoPoint::new(-10.0, 15.0)];
        let rect = GeoRect::from_points(&pts).unwrap();
        assert_eq!(rect, GeoRect::new(-5.0, 15.0, 10.0, -10.0));
        let padded = rect.pad(0.1);
        assert_eq!(padded, GeoRect::new(-7.0, 17.0, 12.0, -12.0));
        assert!(padded.contains(GeoPoint::new(0.0, 0.0)));
        assert!(GeoRect::from_points(&[]).is_none());
    }
}
