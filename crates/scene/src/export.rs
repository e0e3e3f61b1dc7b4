//! Static exports of the network: a serde snapshot and an SVG rendering.

use std::fmt::Write as _;

use foundation::bounds::GeoRect;
use foundation::math::GeoPoint;
use layers::symbology::{LineStyle, MarkerStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::network::DeliveryNetwork;

const DEFAULT_TITLE: &str = "Delivery Network";
const RENDER_PADDING: f64 = 0.15;
/// Half-extent used when everything sits on one point.
const MIN_HALF_EXTENT_DEG: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    Serialize(String),
    Format(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Serialize(msg) => write!(f, "snapshot serialization failed: {msg}"),
            ExportError::Format(msg) => write!(f, "svg rendering failed: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::fmt::Error> for ExportError {
    fn from(e: std::fmt::Error) -> Self {
        ExportError::Format(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    pub id: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub destination_id: String,
    pub control_point: GeoPoint,
    pub curve_points: Vec<GeoPoint>,
    pub great_circle_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLabel {
    pub owner_id: String,
    pub display_text: String,
    pub anchor: GeoPoint,
    pub bounds: GeoRect,
    /// `None` when the random fallback placed it.
    pub candidate: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLineStyle {
    pub color: String,
    pub weight: f32,
    pub opacity: f32,
    pub dash: String,
}

impl From<LineStyle> for SnapshotLineStyle {
    fn from(s: LineStyle) -> Self {
        Self {
            color: s.color.to_string(),
            weight: s.weight,
            opacity: s.opacity,
            dash: s.dash.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub delivery_count: usize,
    pub coverage_countries: usize,
    pub coverage_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub title: String,
    pub origin: Option<SnapshotPoint>,
    pub origin_label: Option<SnapshotLabel>,
    pub destinations: Vec<SnapshotPoint>,
    pub edges: Vec<SnapshotEdge>,
    pub labels: Vec<SnapshotLabel>,
    pub stats: SnapshotStats,
    pub line_style: SnapshotLineStyle,
}

impl NetworkSnapshot {
    pub fn capture(network: &DeliveryNetwork, title: Option<&str>, export: bool) -> Self {
        let stats = network.stats();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
        Self {
            title,
            origin: network.origin().map(|o| SnapshotPoint {
                id: o.id.clone(),
                point: o.point,
            }),
            origin_label: network.origin_label().map(|l| SnapshotLabel {
                owner_id: l.id,
                display_text: l.display_text,
                anchor: l.point,
                bounds: GeoRect::new(l.point.lng, l.point.lng, l.point.lat, l.point.lat),
                candidate: None,
            }),
            destinations: network
                .destinations()
                .iter()
                .map(|d| SnapshotPoint {
                    id: d.id.clone(),
                    point: d.point,
                })
                .collect(),
            edges: network
                .edges()
                .map(|e| SnapshotEdge {
                    destination_id: e.destination_id.clone(),
                    control_point: e.control_point,
                    curve_points: e.curve_points.clone(),
                    great_circle_km: e.great_circle_km(),
                })
                .collect(),
            labels: network
                .labels()
                .iter()
                .map(|p| SnapshotLabel {
                    owner_id: p.owner_id.clone(),
                    display_text: p.display_text.clone(),
                    anchor: p.anchor,
                    bounds: p.bounds,
                    candidate: p.candidate,
                })
                .collect(),
            stats: SnapshotStats {
                delivery_count: stats.delivery_count,
                coverage_countries: stats.coverage_countries,
                coverage_text: stats.coverage_text(),
            },
            line_style: LineStyle::for_export(export).into(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::Serialize(e.to_string()))
    }

    fn extent(&self) -> GeoRect {
        let points = self
            .origin
            .iter()
            .map(|o| &o.point)
            .chain(self.destinations.iter().map(|d| &d.point))
            .chain(self.edges.iter().flat_map(|e| e.curve_points.iter()));
        let Some(rect) = GeoRect::from_points(points) else {
            return GeoRect::new(-180.0, 180.0, 90.0, -90.0);
        };
        let mut rect = rect.pad(RENDER_PADDING);
        if rect.width() <= 0.0 {
            rect.left -= MIN_HALF_EXTENT_DEG;
            rect.right += MIN_HALF_EXTENT_DEG;
        }
        if rect.height() <= 0.0 {
            rect.top += MIN_HALF_EXTENT_DEG;
            rect.bottom -= MIN_HALF_EXTENT_DEG;
        }
        rect
    }
}

struct Viewport {
    extent: GeoRect,
    width: f64,
    height: f64,
}

impl Viewport {
    fn project(&self, p: GeoPoint) -> (f64, f64) {
        let x = (p.lng - self.extent.left) / self.extent.width() * self.width;
        let y = (self.extent.top - p.lat) / self.extent.height() * self.height;
        (x, y)
    }
}

/// Renders the snapshot as a standalone SVG document.
pub fn render_svg(
    snapshot: &NetworkSnapshot,
    width: u32,
    height: u32,
) -> Result<String, ExportError> {
    let view = Viewport {
        extent: snapshot.extent(),
        width: f64::from(width),
        height: f64::from(height),
    };
    let style = &snapshot.line_style;
    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(svg, "  <title>{}</title>", escape(&snapshot.title))?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##)?;

    writeln!(svg, r#"  <g class="connectors">"#)?;
    for edge in &snapshot.edges {
        let mut points = String::new();
        for (i, p) in edge.curve_points.iter().enumerate() {
            let (x, y) = view.project(*p);
            if i > 0 {
                points.push(' ');
            }
            write!(points, "{x:.2},{y:.2}")?;
        }
        writeln!(
            svg,
            r#"    <polyline data-destination="{}" points="{points}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-dasharray="{}"/>"#,
            escape(&edge.destination_id),
            style.color,
            style.weight,
            style.opacity,
            style.dash,
        )?;
    }
    writeln!(svg, "  </g>")?;

    writeln!(svg, r#"  <g class="markers">"#)?;
    for dest in &snapshot.destinations {
        marker(&mut svg, &view, dest, MarkerStyle::DESTINATION)?;
    }
    if let Some(origin) = &snapshot.origin {
        marker(&mut svg, &view, origin, MarkerStyle::ORIGIN)?;
    }
    writeln!(svg, "  </g>")?;

    writeln!(svg, r#"  <g class="labels" font-family="sans-serif">"#)?;
    for label in snapshot.labels.iter().chain(snapshot.origin_label.iter()) {
        let corner = GeoPoint::new(label.bounds.top, label.bounds.left);
        let (x, y) = view.project(corner);
        writeln!(
            svg,
            r#"    <text x="{x:.2}" y="{y:.2}" font-size="11" dominant-baseline="hanging">{}</text>"#,
            escape(&label.display_text)
        )?;
    }
    writeln!(svg, "  </g>")?;
    svg.push_str("</svg>\n");

    debug!(
        edges = snapshot.edges.len(),
        labels = snapshot.labels.len(),
        bytes = svg.len(),
        "svg rendered"
    );
    Ok(svg)
}

fn marker(
    svg: &mut String,
    view: &Viewport,
    at: &SnapshotPoint,
    style: MarkerStyle,
) -> Result<(), ExportError> {
    let (x, y) = view.project(at.point);
    writeln!(
        svg,
        r#"    <circle data-country="{}" cx="{x:.2}" cy="{y:.2}" r="{}" fill="{}" stroke="{}"/>"#,
        escape(&at.id),
        style.size / 2.0,
        style.fill,
        style.stroke,
    )?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn transliterate(c: char) -> Option<char> {
    Some(match c {
        'ā' => 'a',
        'Ā' => 'A',
        'č' => 'c',
        'Č' => 'C',
        'ē' => 'e',
        'Ē' => 'E',
        'ģ' => 'g',
        'Ģ' => 'G',
        'ī' => 'i',
        'Ī' => 'I',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ļ' => 'l',
        'Ļ' => 'L',
        'ņ' => 'n',
        'Ņ' => 'N',
        'š' => 's',
        'Š' => 'S',
        'ū' => 'u',
        'Ū' => 'U',
        'ž' => 'z',
        'Ž' => 'Z',
        _ => return None,
    })
}

/// File-name stem for a title: Latvian letters are transliterated, anything
/// outside `[A-Za-z0-9_ -]` is dropped and whitespace runs become `_`.
pub fn safe_file_name(title: &str) -> String {
    let kept: String = title
        .chars()
        .map(|c| transliterate(c).unwrap_or(c))
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `<stem>_<date>.<ext>`, or `<stem>.<ext>` without a date.
pub fn export_file_name(title: &str, date: Option<&str>, ext: &str) -> String {
    let mut stem = safe_file_name(title);
    if stem.is_empty() {
        stem = safe_file_name(DEFAULT_TITLE);
    }
    match date {
        Some(date) => format!("{stem}_{date}.{ext}"),
        None => format!("{stem}.{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn network() -> DeliveryNetwork {
        let mut net = DeliveryNetwork::default();
        net.set_origin("Latvia", GeoPoint::new(56.88, 24.6));
        net.set_label_visibility(true);
        net.add_destination("Germany", GeoPoint::new(51.17, 10.45));
        net.add_destination("Bosnia & Herzegovina", GeoPoint::new(43.9, 17.7));
        net
    }

    #[test]
    fn snapshot_survives_json() {
        let snap = NetworkSnapshot::capture(&network(), Some("  Our network "), false);
        assert_eq!(snap.title, "Our network");
        assert_eq!(snap.edges.len(), 2);
        assert_eq!(snap.labels.len(), 2);
        assert_eq!(snap.stats.coverage_text, "3 countries");
        assert_eq!(snap.line_style.dash, "6, 3");

        let json = snap.to_json().unwrap();
        let back: NetworkSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, snap.title);
        assert_eq!(back.stats, snap.stats);
        assert_eq!(back.origin.map(|o| o.id), Some("Latvia".to_string()));
        let owners: Vec<_> = back.labels.iter().map(|l| l.owner_id.as_str()).collect();
        assert_eq!(owners, vec!["Germany", "Bosnia & Herzegovina"]);
        let (a, b) = (back.edges[0].curve_points[30], snap.edges[0].curve_points[30]);
        assert!((a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9);
    }

    #[test]
    fn svg_contains_every_part() {
        let snap = NetworkSnapshot::capture(&network(), None, true);
        let svg = render_svg(&snap, 1200, 800).unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 3);
        // Two destination labels plus the origin label.
        assert_eq!(svg.matches("<text").count(), 3);
        assert!(svg.contains(r#"stroke-dasharray="8,4""#));
        assert!(svg.contains("Bosnia &amp; Herzegovina"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn empty_network_renders_world() {
        let snap = NetworkSnapshot::capture(&DeliveryNetwork::default(), None, false);
        let svg = render_svg(&snap, 400, 200).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 0);
        assert!(svg.contains("<title>Delivery Network</title>"));
    }

    #[test]
    fn file_names_are_filesystem_safe() {
        assert_eq!(safe_file_name("Piegādes tīkls: 2024!"), "Piegades_tikls_2024");
        assert_eq!(safe_file_name("  a   b\tc "), "a_b_c");
        assert_eq!(
            export_file_name("Žūrijas karte", Some("2024-05-01"), "svg"),
            "Zurijas_karte_2024-05-01.svg"
        );
        assert_eq!(export_file_name("???", None, "json"), "Delivery_Network.json");
    }
}
