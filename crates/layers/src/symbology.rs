/// Stroke for connectors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
    pub dash: &'static str,
}

impl LineStyle {
    /// On-screen connectors.
    pub const NORMAL: LineStyle = LineStyle {
        color: "#27ae60",
        weight: 1.5,
        opacity: 0.6,
        dash: "6, 3",
    };

    /// Heavier stroke used while capturing an image.
    pub const EXPORT: LineStyle = LineStyle {
        color: "#27ae60",
        weight: 4.0,
        opacity: 1.0,
        dash: "8,4",
    };

    pub fn for_export(export: bool) -> Self {
        if export { Self::EXPORT } else { Self::NORMAL }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Diameter in pixels.
    pub size: f32,
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl MarkerStyle {
    pub const ORIGIN: MarkerStyle = MarkerStyle {
        size: 12.0,
        fill: "#e74c3c",
        stroke: "#ffffff",
    };
    pub const DESTINATION: MarkerStyle = MarkerStyle {
        size: 8.0,
        fill: "#27ae60",
        stroke: "#ffffff",
    };
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size: f32,
    pub color: &'static str,
    pub background: &'static str,
}

impl LabelStyle {
    pub const DESTINATION: LabelStyle = LabelStyle {
        font_size: 11.0,
        color: "#2c3e50",
        background: "rgba(255, 255, 255, 0.9)",
    };
    pub const ORIGIN: LabelStyle = LabelStyle {
        font_size: 13.0,
        color: "#c0392b",
        background: "rgba(255, 255, 255, 0.95)",
    };
}
