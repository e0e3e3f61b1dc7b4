//! Map widget seam and the view helpers that drive it.

use std::collections::{BTreeMap, BTreeSet};

use foundation::bounds::GeoRect;
use foundation::math::GeoPoint;
use layers::symbology::{LabelStyle, LineStyle, MarkerStyle};
use layers::{LabelMetrics, Layer, LayerId, LayerKind};
use tracing::debug;

use crate::network::DeliveryNetwork;

pub const WORLD_CENTER: GeoPoint = GeoPoint::new(20.0, 0.0);
pub const WORLD_ZOOM: f64 = 2.0;
pub const ORIGIN_ZOOM: f64 = 4.0;
pub const FIT_PADDING: f64 = 0.15;
pub const FIT_MAX_ZOOM: f64 = 5.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 18.0;
/// Zoom levels snap to quarter steps.
pub const ZOOM_SNAP: f64 = 0.25;
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapLayerData {
    Polyline {
        points: Vec<GeoPoint>,
        style: LineStyle,
    },
    Marker {
        point: GeoPoint,
        style: MarkerStyle,
    },
    Label {
        point: GeoPoint,
        text: String,
        style: LabelStyle,
        metrics: Option<LabelMetrics>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub id: LayerId,
    pub data: MapLayerData,
}

/// What the network needs from a map widget.
pub trait MapFacade {
    fn project_point(&self, point: GeoPoint) -> ScreenPoint;
    /// Adds a layer, replacing any layer with the same id.
    fn add_layer(&mut self, layer: MapLayer);
    fn remove_layer(&mut self, id: &LayerId) -> bool;
    fn layer_ids(&self) -> Vec<LayerId>;
    fn zoom(&self) -> f64;
    /// Visible area.
    fn bounds(&self) -> GeoRect;
    fn fit_bounds(&mut self, bounds: GeoRect, max_zoom: f64);
    fn set_view(&mut self, center: GeoPoint, zoom: f64);
    /// The container was resized.
    fn invalidate_size(&mut self, width: f64, height: f64);
}

/// Headless map: equirectangular projection into a pixel viewport.
#[derive(Debug, Clone)]
pub struct InMemoryMap {
    center: GeoPoint,
    zoom: f64,
    width: f64,
    height: f64,
    layers: BTreeMap<LayerId, MapLayer>,
}

impl InMemoryMap {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            center: WORLD_CENTER,
            zoom: WORLD_ZOOM,
            width,
            height,
            layers: BTreeMap::new(),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&MapLayer> {
        self.layers.get(id)
    }

    pub fn layers(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers.values()
    }

    fn pixels_per_degree(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2() / 360.0
    }
}

impl MapFacade for InMemoryMap {
    fn project_point(&self, point: GeoPoint) -> ScreenPoint {
        let ppd = self.pixels_per_degree();
        ScreenPoint {
            x: self.width / 2.0 + (point.lng - self.center.lng) * ppd,
            y: self.height / 2.0 - (point.lat - self.center.lat) * ppd,
        }
    }

    fn add_layer(&mut self, layer: MapLayer) {
        self.layers.insert(layer.id.clone(), layer);
    }

    fn remove_layer(&mut self, id: &LayerId) -> bool {
        self.layers.remove(id).is_some()
    }

    fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.keys().cloned().collect()
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn bounds(&self) -> GeoRect {
        let ppd = self.pixels_per_degree();
        let half_w = self.width / 2.0 / ppd;
        let half_h = self.height / 2.0 / ppd;
        GeoRect::new(
            self.center.lng - half_w,
            self.center.lng + half_w,
            self.center.lat + half_h,
            self.center.lat - half_h,
        )
    }

    fn fit_bounds(&mut self, bounds: GeoRect, max_zoom: f64) {
        let fit = |pixels: f64, degrees: f64| {
            if degrees > 0.0 {
                (pixels * 360.0 / (TILE_SIZE * degrees)).log2()
            } else {
                f64::INFINITY
            }
        };
        let zoom = fit(self.width, bounds.width())
            .min(fit(self.height, bounds.height()))
            .min(max_zoom);
        let zoom = (zoom / ZOOM_SNAP).floor() * ZOOM_SNAP;
        self.center = bounds.center();
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn invalidate_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

/// Layers that represent the network's current state.
pub fn network_layers(network: &DeliveryNetwork, export: bool) -> Vec<MapLayer> {
    let mut out = Vec::new();
    if let Some(origin) = network.origin() {
        out.push(MapLayer {
            id: LayerId::new(LayerKind::OriginMarker, origin.id.as_str()),
            data: MapLayerData::Marker {
                point: origin.point,
                style: MarkerStyle::ORIGIN,
            },
        });
    }
    if let Some(label) = network.origin_label() {
        out.push(MapLayer {
            id: LayerId::new(LayerKind::OriginLabel, label.id.as_str()),
            data: MapLayerData::Label {
                point: label.point,
                text: label.display_text,
                style: LabelStyle::ORIGIN,
                metrics: None,
            },
        });
    }
    for dest in network.destinations() {
        out.push(MapLayer {
            id: LayerId::new(LayerKind::DestinationMarker, dest.id.as_str()),
            data: MapLayerData::Marker {
                point: dest.point,
                style: MarkerStyle::DESTINATION,
            },
        });
    }
    for edge in network.edges() {
        out.push(MapLayer {
            id: edge.id(),
            data: MapLayerData::Polyline {
                points: edge.curve_points.clone(),
                style: LineStyle::for_export(export),
            },
        });
    }
    for label in network.labels().iter() {
        out.push(MapLayer {
            id: label.id(),
            data: MapLayerData::Label {
                point: label.anchor,
                text: label.display_text.clone(),
                style: LabelStyle::DESTINATION,
                metrics: Some(label.metrics),
            },
        });
    }
    out
}

/// Makes the map's layers mirror the network: stale layers are removed,
/// current ones added or replaced.
pub fn sync_layers(network: &DeliveryNetwork, map: &mut impl MapFacade, export: bool) {
    let wanted = network_layers(network, export);
    let keep: BTreeSet<&LayerId> = wanted.iter().map(|l| &l.id).collect();
    let mut removed = 0usize;
    for id in map.layer_ids() {
        if !keep.contains(&id) && map.remove_layer(&id) {
            removed += 1;
        }
    }
    let added = wanted.len();
    for layer in wanted {
        map.add_layer(layer);
    }
    debug!(added, removed, "map layers synced");
}

/// Origin at a country-level zoom, or the whole world without one.
pub fn reset_view(network: &mut DeliveryNetwork, map: &mut impl MapFacade) {
    match network.origin() {
        Some(origin) => map.set_view(origin.point, ORIGIN_ZOOM),
        None => map.set_view(WORLD_CENTER, WORLD_ZOOM),
    }
    network.set_zoom(map.zoom());
}

/// Frames the origin and every destination.
pub fn fit_to_points(network: &mut DeliveryNetwork, map: &mut impl MapFacade) {
    if network.destinations().is_empty() {
        reset_view(network, map);
        return;
    }
    let points: Vec<GeoPoint> = network
        .origin()
        .map(|o| o.point)
        .into_iter()
        .chain(network.destinations().iter().map(|d| d.point))
        .collect();
    if let Some(bounds) = GeoRect::from_points(&points) {
        map.fit_bounds(bounds.pad(FIT_PADDING), FIT_MAX_ZOOM);
    }
    network.set_zoom(map.zoom());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn europe_network() -> DeliveryNetwork {
        let mut net = DeliveryNetwork::default();
        net.set_origin("Latvia", GeoPoint::new(56.88, 24.6));
        net.add_destination("Germany", GeoPoint::new(51.17, 10.45));
        net.add_destination("Estonia", GeoPoint::new(58.6, 25.0));
        net
    }

    #[test]
    fn projection_centers_the_view() {
        let mut map = InMemoryMap::new(800.0, 600.0);
        map.set_view(GeoPoint::new(10.0, 20.0), 3.0);
        let p = map.project_point(GeoPoint::new(10.0, 20.0));
        assert_eq!(p, ScreenPoint { x: 400.0, y: 300.0 });
        let east = map.project_point(GeoPoint::new(10.0, 21.0));
        assert!(east.x > 400.0);
        let north = map.project_point(GeoPoint::new(11.0, 20.0));
        assert!(north.y < 300.0);
        assert!(map.bounds().contains(GeoPoint::new(10.0, 20.0)));
    }

    #[test]
    fn sync_adds_and_prunes_layers() {
        let mut net = europe_network();
        net.set_label_visibility(true);
        let mut map = InMemoryMap::new(800.0, 600.0);

        sync_layers(&net, &mut map, false);
        // origin marker + origin label + 2 markers + 2 connectors + 2 labels
        assert_eq!(map.layer_ids().len(), 8);

        net.remove_destination("Germany");
        net.set_label_visibility(false);
        sync_layers(&net, &mut map, false);
        assert_eq!(map.layer_ids().len(), 3);
        assert!(map
            .layer(&LayerId::new(LayerKind::Connector, "Germany"))
            .is_none());
    }

    #[test]
    fn export_sync_uses_heavier_lines() {
        let net = europe_network();
        let mut map = InMemoryMap::new(800.0, 600.0);
        sync_layers(&net, &mut map, true);
        let layer = map
            .layer(&LayerId::new(LayerKind::Connector, "Estonia"))
            .unwrap();
        match &layer.data {
            MapLayerData::Polyline { points, style } => {
                assert_eq!(points.len(), 61);
                assert_eq!(*style, LineStyle::EXPORT);
            }
            other => panic!("unexpected layer {other:?}"),
        }
    }

    #[test]
    fn reset_view_without_origin_shows_world() {
        let mut net = DeliveryNetwork::default();
        let mut map = InMemoryMap::new(800.0, 600.0);
        map.set_view(GeoPoint::new(0.0, 0.0), 9.0);
        reset_view(&mut net, &mut map);
        assert_eq!(map.center(), WORLD_CENTER);
        assert_eq!(map.zoom(), WORLD_ZOOM);
        assert_eq!(net.zoom(), WORLD_ZOOM);
    }

    #[test]
    fn fit_frames_everything_and_caps_zoom() {
        let mut net = europe_network();
        let mut map = InMemoryMap::new(1200.0, 800.0);
        fit_to_points(&mut net, &mut map);
        assert!(map.zoom() <= FIT_MAX_ZOOM);
        assert_eq!(map.zoom() % ZOOM_SNAP, 0.0);
        let view = map.bounds();
        for d in net.destinations() {
            assert!(view.contains(d.point), "{} not visible", d.id);
        }
        assert_eq!(net.zoom(), map.zoom());

        net.clear();
        fit_to_points(&mut net, &mut map);
        assert_eq!(map.zoom(), ORIGIN_ZOOM);
        assert_eq!(map.center(), GeoPoint::new(56.88, 24.6));
    }
}
