use foundation::bounds::GeoRect;
use foundation::math::{GeoPoint, METERS_PER_DEGREE_LAT, meters_per_degree_lng};
use rand::Rng;
use tracing::trace;

/// Estimated width per character (fixed-width label font).
pub const CHAR_WIDTH: f64 = 6.0;
pub const MIN_TEXT_WIDTH: f64 = 40.0;
pub const TEXT_HEIGHT: f64 = 16.0;
/// Horizontal padding added to the rendered label box.
pub const LABEL_PADDING: f64 = 8.0;
/// Scale from label units to the footprint's meter-like units.
const FOOTPRINT_SCALE: f64 = 10.0;

const FALLBACK_DISTANCE_MIN: f64 = 60.0;
const FALLBACK_DISTANCE_MAX: f64 = 80.0;

/// Polar offset of a label from its anchor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelCandidate {
    pub distance: f64,
    pub angle_deg: f64,
    /// 1 is tried first.
    pub priority: u8,
}

const fn candidate(distance: f64, angle_deg: f64, priority: u8) -> LabelCandidate {
    LabelCandidate {
        distance,
        angle_deg,
        priority,
    }
}

/// Ranked offsets: near ring first (right, left, above, below, diagonals),
/// then the far ring.
pub const LABEL_CANDIDATES: [LabelCandidate; 12] = [
    candidate(25.0, 0.0, 1),
    candidate(25.0, 180.0, 2),
    candidate(30.0, 270.0, 3),
    candidate(30.0, 90.0, 4),
    candidate(35.0, 315.0, 5),
    candidate(35.0, 225.0, 6),
    candidate(35.0, 45.0, 7),
    candidate(35.0, 135.0, 8),
    candidate(45.0, 0.0, 9),
    candidate(45.0, 180.0, 10),
    candidate(50.0, 270.0, 11),
    candidate(50.0, 90.0, 12),
];

/// Rendering hints for the adapter that turns a placement into a marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelMetrics {
    /// Box width including padding.
    pub width: f64,
    pub height: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub owner_id: String,
    pub anchor: GeoPoint,
    pub display_text: String,
    pub bounds: GeoRect,
    /// Index into [`LABEL_CANDIDATES`], `None` for the random fallback.
    pub candidate: Option<usize>,
    pub metrics: LabelMetrics,
}

impl LabelPlacement {
    pub fn is_fallback(&self) -> bool {
        self.candidate.is_none()
    }
}

/// Placed labels in placement order. Earlier entries win; nothing here ever
/// moves an existing placement.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelRegistry {
    entries: Vec<LabelPlacement>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, owner_id: &str) -> Option<&LabelPlacement> {
        self.entries.iter().find(|p| p.owner_id == owner_id)
    }

    pub fn contains(&self, owner_id: &str) -> bool {
        self.get(owner_id).is_some()
    }

    /// Inserts a placement. An existing entry for the same owner is replaced
    /// in place (keeping its rank) and returned.
    pub fn insert(&mut self, placement: LabelPlacement) -> Option<LabelPlacement> {
        match self
            .entries
            .iter_mut()
            .find(|p| p.owner_id == placement.owner_id)
        {
            Some(slot) => Some(std::mem::replace(slot, placement)),
            None => {
                self.entries.push(placement);
                None
            }
        }
    }

    pub fn remove(&mut self, owner_id: &str) -> Option<LabelPlacement> {
        let idx = self.entries.iter().position(|p| p.owner_id == owner_id)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelPlacement> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[LabelPlacement] {
        &self.entries
    }

    /// Replaces the shown text without touching the footprint.
    pub fn set_display_text(&mut self, owner_id: &str, text: &str) -> bool {
        match self.entries.iter_mut().find(|p| p.owner_id == owner_id) {
            Some(p) if p.display_text != text => {
                p.display_text = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Whether `bounds` overlaps any placement not owned by `owner_id`.
    pub fn collides(&self, bounds: &GeoRect, owner_id: &str) -> bool {
        self.entries
            .iter()
            .any(|p| p.owner_id != owner_id && p.bounds.intersects(bounds))
    }

    /// Pairs of owners whose footprints overlap.
    pub fn overlapping_pairs(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.bounds.intersects(&b.bounds) {
                    out.push((a.owner_id.as_str(), b.owner_id.as_str()));
                }
            }
        }
        out
    }
}

/// `[width, height]` in label units.
pub fn estimate_text_size(text: &str) -> [f64; 2] {
    let width = (text.chars().count() as f64 * CHAR_WIDTH).max(MIN_TEXT_WIDTH);
    [width, TEXT_HEIGHT]
}

/// Footprints of all ranked candidates for `text` at `target`, in rank order.
pub fn candidate_bounds(target: GeoPoint, text: &str) -> [GeoRect; 12] {
    let [width, height] = estimate_text_size(text);
    LABEL_CANDIDATES.map(|c| {
        let (dx, dy) = polar_offset(c.distance, c.angle_deg);
        footprint(target, width, height, dx, dy)
    })
}

/// Picks the first ranked candidate that does not collide with `existing`,
/// or a random far offset if every candidate collides.
///
/// The fallback is accepted without re-checking, so dense clusters can still
/// overlap.
pub fn place_label<R: Rng>(
    target: GeoPoint,
    owner_id: &str,
    text: &str,
    existing: &LabelRegistry,
    rng: &mut R,
) -> LabelPlacement {
    let [width, height] = estimate_text_size(text);

    for (idx, c) in LABEL_CANDIDATES.iter().enumerate() {
        let (dx, dy) = polar_offset(c.distance, c.angle_deg);
        let bounds = footprint(target, width, height, dx, dy);
        if !existing.collides(&bounds, owner_id) {
            return placement(target, owner_id, text, bounds, Some(idx), width, dx, dy);
        }
    }

    let angle = rng.gen_range(0.0..360.0);
    let distance = rng.gen_range(FALLBACK_DISTANCE_MIN..FALLBACK_DISTANCE_MAX);
    trace!(owner = owner_id, angle, distance, "label candidates exhausted");
    let (dx, dy) = polar_offset(distance, angle);
    let bounds = footprint(target, width, height, dx, dy);
    placement(target, owner_id, text, bounds, None, width, dx, dy)
}

fn polar_offset(distance: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (rad.cos() * distance, rad.sin() * distance)
}

fn footprint(target: GeoPoint, width: f64, height: f64, dx: f64, dy: f64) -> GeoRect {
    let lat_scale = METERS_PER_DEGREE_LAT;
    let lng_scale = meters_per_degree_lng(target.lat);
    let left = target.lng + dx / lng_scale;
    let top = target.lat + dy / lat_scale;
    GeoRect {
        left,
        right: left + width * FOOTPRINT_SCALE / lng_scale,
        top,
        bottom: top - height * FOOTPRINT_SCALE / lat_scale,
    }
}

#[allow(clippy::too_many_arguments)]
fn placement(
    target: GeoPoint,
    owner_id: &str,
    text: &str,
    bounds: GeoRect,
    candidate: Option<usize>,
    text_width: f64,
    dx: f64,
    dy: f64,
) -> LabelPlacement {
    let width = text_width + LABEL_PADDING;
    LabelPlacement {
        owner_id: owner_id.to_string(),
        anchor: target,
        display_text: text.to_string(),
        bounds,
        candidate,
        metrics: LabelMetrics {
            width,
            height: TEXT_HEIGHT,
            anchor_x: width / 2.0 - dx,
            anchor_y: TEXT_HEIGHT / 2.0 - dy,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn blocker(owner: &str, bounds: GeoRect) -> LabelPlacement {
        LabelPlacement {
            owner_id: owner.to_string(),
            anchor: bounds.center(),
            display_text: owner.to_string(),
            bounds,
            candidate: None,
            metrics: LabelMetrics {
                width: 0.0,
                height: 0.0,
                anchor_x: 0.0,
                anchor_y: 0.0,
            },
        }
    }

    #[test]
    fn text_size_has_minimum_width() {
        assert_eq!(estimate_text_size("DE"), [40.0, 16.0]);
        assert_eq!(estimate_text_size("United Kingdom"), [84.0, 16.0]);
    }

    #[test]
    fn candidates_are_ranked() {
        for (i, c) in LABEL_CANDIDATES.iter().enumerate() {
            assert_eq!(usize::from(c.priority), i + 1);
        }
    }

    #[test]
    fn empty_registry_uses_first_candidate() {
        let target = GeoPoint::new(51.17, 10.45);
        let registry = LabelRegistry::new();
        let placed = place_label(target, "Germany", "DE", &registry, &mut rng());
        assert_eq!(placed.candidate, Some(0));
        assert_eq!(placed.bounds, candidate_bounds(target, "DE")[0]);
        assert!(placed.bounds.top > placed.bounds.bottom);
        assert!(placed.bounds.right > placed.bounds.left);
        assert_eq!(placed.metrics.width, 48.0);
    }

    #[test]
    fn blocked_top_three_fall_through() {
        let target = GeoPoint::new(10.0, 20.0);
        let text = "Kenya";
        let all = candidate_bounds(target, text);

        let mut registry = LabelRegistry::new();
        for (i, b) in all.iter().take(3).enumerate() {
            let c = b.center();
            let tiny = GeoRect::new(c.lng, c.lng, c.lat, c.lat);
            assert!(b.intersects(&tiny));
            registry.insert(blocker(&format!("blocker-{i}"), tiny));
        }

        let placed = place_label(target, "Kenya", text, &registry, &mut rng());
        let expected = (3..12).find(|&i| !registry.collides(&all[i], "Kenya"));
        assert_eq!(placed.candidate, expected);
        if let Some(i) = placed.candidate {
            assert!(LABEL_CANDIDATES[i].priority >= 4);
            assert_eq!(placed.bounds, all[i]);
        }
    }

    #[test]
    fn one_box_over_top_three_skips_them() {
        let target = GeoPoint::new(10.0, 20.0);
        let text = "Kenya";
        let all = candidate_bounds(target, text);
        let corners: Vec<GeoPoint> = all[..3]
            .iter()
            .flat_map(|b| {
                [
                    GeoPoint::new(b.top, b.left),
                    GeoPoint::new(b.bottom, b.right),
                ]
            })
            .collect();
        let cover = GeoRect::from_points(&corners).unwrap();

        let mut registry = LabelRegistry::new();
        registry.insert(blocker("cover", cover));
        for b in &all[..3] {
            assert!(registry.collides(b, "Kenya"));
        }

        let placed = place_label(target, "Kenya", text, &registry, &mut rng());
        assert!(placed.candidate.is_none() || placed.candidate >= Some(3));
        if let Some(i) = placed.candidate {
            assert!(LABEL_CANDIDATES[i].priority >= 4);
            assert!(!registry.collides(&placed.bounds, "Kenya"));
        }
    }

    #[test]
    fn falls_back_when_everything_collides() {
        let target = GeoPoint::new(0.0, 0.0);
        let mut registry = LabelRegistry::new();
        registry.insert(blocker("wall", GeoRect::new(-1.0, 1.0, 1.0, -1.0)));

        let placed = place_label(target, "Ghana", "GH", &registry, &mut rng());
        assert!(placed.is_fallback());
        // Offset of the box's left edge from the anchor, in label units.
        let dx = (placed.bounds.left - target.lng) * METERS_PER_DEGREE_LAT;
        let dy = (placed.bounds.top - target.lat) * METERS_PER_DEGREE_LAT;
        let dist = (dx * dx + dy * dy).sqrt();
        assert!((60.0 - 1e-6..80.0 + 1e-6).contains(&dist), "dist {dist}");
    }

    #[test]
    fn own_previous_placement_does_not_block() {
        let target = GeoPoint::new(40.0, -3.7);
        let mut registry = LabelRegistry::new();
        let first = place_label(target, "Spain", "ES", &registry, &mut rng());
        registry.insert(first.clone());
        let again = place_label(target, "Spain", "ES", &registry, &mut rng());
        assert_eq!(again, first);
        assert_eq!(registry.insert(again), Some(first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distant_labels_do_not_collide() {
        let mut registry = LabelRegistry::new();
        let a = place_label(GeoPoint::new(51.17, 10.45), "Germany", "DE", &registry, &mut rng());
        registry.insert(a);
        let b = place_label(GeoPoint::new(46.6, 1.89), "France", "FR", &registry, &mut rng());
        assert_eq!(b.candidate, Some(0));
        registry.insert(b);
        assert!(registry.overlapping_pairs().is_empty());
    }

    #[test]
    fn registry_keeps_insertion_order() {
        let mut registry = LabelRegistry::new();
        for (i, name) in ["b", "a", "c"].iter().enumerate() {
            let x = i as f64;
            registry.insert(blocker(name, GeoRect::new(x, x + 0.5, 0.5, 0.0)));
        }
        let order: Vec<_> = registry.iter().map(|p| p.owner_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        let order: Vec<_> = registry.iter().map(|p| p.owner_id.as_str()).collect();
        assert_eq!(order, vec!["b", "c"]);
        assert!(registry.set_display_text("b", "Bee"));
        assert!(!registry.set_display_text("b", "Bee"));
        assert_eq!(registry.get("b").map(|p| p.display_text.as_str()), Some("Bee"));
    }
}
