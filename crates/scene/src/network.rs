//! The delivery network: one origin, its destinations, their connectors and
//! their labels. Every mutation goes through [`DeliveryNetwork`], which owns
//! all three registries and keeps them consistent.

use std::collections::HashMap;

use catalog::{CountryCatalog, abbreviate};
use foundation::math::{GeoPoint, manhattan_degrees};
use layers::{DeliveryEdge, LabelPlacement, LabelRegistry, generate_connector, place_label};
use rand::SeedableRng;
use rand::rngs::StdRng;
use runtime::{Event, EventBus};
use tracing::{debug, info, warn};

/// Label offset for the origin, in degrees.
const ORIGIN_LABEL_OFFSET: (f64, f64) = (0.3, 0.8);
/// Russia is anchored at Moscow; nudge its label clear of the marker.
const ORIGIN_LABEL_OFFSET_RUSSIA: (f64, f64) = (0.2, 1.0);

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Full names at or above this zoom, abbreviations below.
    pub zoom_threshold: f64,
    pub labels_visible: bool,
    /// Seed for fallback label offsets; reapplied on every reorganize.
    pub layout_seed: u64,
    pub initial_zoom: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            zoom_threshold: catalog::prefs::DEFAULT_ZOOM_THRESHOLD,
            labels_visible: false,
            layout_seed: 0x5eed,
            initial_zoom: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginRecord {
    pub id: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: String,
    pub point: GeoPoint,
}

/// Label next to the origin marker. Not part of the collision registry.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginLabel {
    pub id: String,
    pub point: GeoPoint,
    pub display_text: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NetworkStats {
    pub delivery_count: usize,
    /// Destinations plus the origin country.
    pub coverage_countries: usize,
}

impl NetworkStats {
    pub fn coverage_text(&self) -> String {
        match self.coverage_countries {
            1 => "1 country".to_string(),
            n => format!("{n} countries"),
        }
    }
}

#[derive(Debug)]
pub struct DeliveryNetwork {
    config: NetworkConfig,
    origin: Option<OriginRecord>,
    destinations: Vec<Destination>,
    edges: HashMap<String, DeliveryEdge>,
    labels: LabelRegistry,
    zoom: f64,
    rng: StdRng,
    events: EventBus,
}

impl Default for DeliveryNetwork {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl DeliveryNetwork {
    pub fn new(config: NetworkConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.layout_seed);
        let zoom = config.initial_zoom;
        Self {
            config,
            origin: None,
            destinations: Vec::new(),
            edges: HashMap::new(),
            labels: LabelRegistry::new(),
            zoom,
            rng,
            events: EventBus::new(),
        }
    }

    /// Sets (or moves) the origin and regenerates every connector from it.
    ///
    /// Destinations that coincide with the new origin are dropped. Returns
    /// `false` for invalid input or when nothing changes.
    pub fn set_origin(&mut self, id: &str, point: GeoPoint) -> bool {
        let id = id.trim();
        if id.is_empty() || !point.is_finite() {
            warn!(origin = id, "rejected origin");
            return false;
        }
        if self
            .origin
            .as_ref()
            .is_some_and(|o| o.id == id && o.point == point)
        {
            return false;
        }

        self.origin = Some(OriginRecord {
            id: id.to_string(),
            point,
        });

        let previous = std::mem::take(&mut self.destinations);
        self.edges.clear();
        self.labels.clear();
        let mut dropped = 0usize;
        for dest in previous {
            if dest.id == id {
                dropped += 1;
                continue;
            }
            match generate_connector(point, dest.point, &dest.id) {
                Ok(edge) => {
                    self.edges.insert(dest.id.clone(), edge);
                    self.destinations.push(dest);
                }
                Err(e) => {
                    debug!(destination = %dest.id, error = %e, "dropping destination");
                    dropped += 1;
                }
            }
        }

        if self.config.labels_visible {
            self.reorganize_all_labels();
        }

        info!(
            origin = id,
            destinations = self.destinations.len(),
            dropped,
            "origin set"
        );
        self.events.emit("origin", format!("Origin set to {id}"));
        true
    }

    /// Adds one destination. Returns `false` (and changes nothing) if there is
    /// no origin, the id is already present or is the origin, or no connector
    /// can be drawn.
    pub fn add_destination(&mut self, id: &str, point: GeoPoint) -> bool {
        if !self.insert_destination(id, point) {
            return false;
        }
        if self.config.labels_visible {
            let placement = self.place(id, point);
            self.labels.insert(placement);
        }
        true
    }

    /// Adds every named country the catalog can locate, then lays labels out
    /// once. Returns how many were added.
    pub fn add_destinations<S: AsRef<str>>(
        &mut self,
        catalog: &CountryCatalog,
        names: impl IntoIterator<Item = S>,
    ) -> usize {
        let mut added = 0usize;
        for name in names {
            let name = name.as_ref();
            let Some(point) = catalog.coords(name) else {
                warn!(country = name, "no coordinates, skipping");
                continue;
            };
            if self.insert_destination(name, point) {
                added += 1;
            }
        }

        if added > 0 && self.config.labels_visible {
            self.reorganize_all_labels();
        }
        match added {
            0 => self.events.emit(
                "warning",
                "No new countries were added. They may already be in your delivery network.",
            ),
            1 => self.events.emit("added", "Added 1 delivery point"),
            n => self.events.emit("added", format!("Added {n} delivery points")),
        }
        added
    }

    fn insert_destination(&mut self, id: &str, point: GeoPoint) -> bool {
        let Some(origin) = &self.origin else {
            debug!(destination = id, "no origin set");
            return false;
        };
        if id.is_empty() || id == origin.id || self.contains(id) {
            return false;
        }
        let edge = match generate_connector(origin.point, point, id) {
            Ok(edge) => edge,
            Err(e) => {
                debug!(destination = id, error = %e, "connector rejected");
                return false;
            }
        };
        self.edges.insert(id.to_string(), edge);
        self.destinations.push(Destination {
            id: id.to_string(),
            point,
        });
        debug!(destination = id, "destination added");
        true
    }

    /// Removes a destination with its connector and label. Other labels stay
    /// where they are.
    pub fn remove_destination(&mut self, id: &str) -> bool {
        let Some(idx) = self.destinations.iter().position(|d| d.id == id) else {
            return false;
        };
        self.destinations.remove(idx);
        self.edges.remove(id);
        self.labels.remove(id);
        debug!(destination = id, "destination removed");
        true
    }

    /// Removes every destination. The origin stays.
    pub fn clear(&mut self) -> usize {
        let removed = self.destinations.len();
        self.destinations.clear();
        self.edges.clear();
        self.labels.clear();
        if removed > 0 {
            info!(removed, "network cleared");
            self.events.emit("cleared", "All delivery points removed");
        }
        removed
    }

    /// Replaces every label placement, nearest destination first
    /// (Manhattan distance in degrees from the origin).
    pub fn reorganize_all_labels(&mut self) {
        if !self.config.labels_visible {
            return;
        }
        self.labels.clear();
        self.rng = StdRng::seed_from_u64(self.config.layout_seed);

        let mut order: Vec<(String, GeoPoint)> = self
            .destinations
            .iter()
            .map(|d| (d.id.clone(), d.point))
            .collect();
        if let Some(origin) = &self.origin {
            let from = origin.point;
            order.sort_by(|a, b| {
                manhattan_degrees(from, a.1).total_cmp(&manhattan_degrees(from, b.1))
            });
        }

        for (id, point) in order {
            let placement = self.place(&id, point);
            self.labels.insert(placement);
        }
        debug!(labels = self.labels.len(), "labels reorganized");
    }

    /// Places a label sized for the full name `id`, whatever text is shown.
    /// Abbreviated labels therefore reserve the full-name footprint, and a
    /// zoom change only swaps the text without moving any label.
    fn place(&mut self, id: &str, point: GeoPoint) -> LabelPlacement {
        let mut placement = place_label(point, id, id, &self.labels, &mut self.rng);
        placement.display_text = self.display_text(id);
        placement
    }

    pub fn set_label_visibility(&mut self, visible: bool) {
        if self.config.labels_visible == visible {
            return;
        }
        self.config.labels_visible = visible;
        if visible {
            self.reorganize_all_labels();
            self.events.emit("labels", "Country names organized and visible");
        } else {
            self.labels.clear();
            self.events.emit("labels", "Country names hidden");
        }
    }

    /// Zoom-change notification. Label texts switch between full names and
    /// abbreviations; bounds stay put.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom;
        self.refresh_label_texts();
    }

    pub fn set_zoom_threshold(&mut self, threshold: f64) -> bool {
        if !threshold.is_finite() {
            return false;
        }
        self.config.zoom_threshold = threshold;
        self.refresh_label_texts();
        self.events
            .emit("settings", format!("Zoom threshold set to {threshold}"));
        true
    }

    fn refresh_label_texts(&mut self) {
        let ids: Vec<String> = self.labels.iter().map(|p| p.owner_id.clone()).collect();
        for id in ids {
            let text = self.display_text(&id);
            self.labels.set_display_text(&id, &text);
        }
    }

    pub fn uses_full_names(&self) -> bool {
        self.zoom >= self.config.zoom_threshold
    }

    pub fn display_text(&self, id: &str) -> String {
        if self.uses_full_names() {
            id.to_string()
        } else {
            abbreviate(id)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn origin(&self) -> Option<&OriginRecord> {
        self.origin.as_ref()
    }

    pub fn origin_label(&self) -> Option<OriginLabel> {
        if !self.config.labels_visible {
            return None;
        }
        let origin = self.origin.as_ref()?;
        let (d_lat, d_lng) = if origin.id == "Russia" {
            ORIGIN_LABEL_OFFSET_RUSSIA
        } else {
            ORIGIN_LABEL_OFFSET
        };
        Some(OriginLabel {
            id: origin.id.clone(),
            point: GeoPoint::new(origin.point.lat + d_lat, origin.point.lng + d_lng),
            display_text: self.display_text(&origin.id),
        })
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination_ids(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.id.as_str()).collect()
    }

    /// Connectors in the order their destinations were added.
    pub fn edges(&self) -> impl Iterator<Item = &DeliveryEdge> {
        self.destinations
            .iter()
            .filter_map(|d| self.edges.get(&d.id))
    }

    pub fn edge(&self, id: &str) -> Option<&DeliveryEdge> {
        self.edges.get(id)
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn labels_visible(&self) -> bool {
        self.config.labels_visible
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_threshold(&self) -> f64 {
        self.config.zoom_threshold
    }

    pub fn stats(&self) -> NetworkStats {
        let delivery_count = self.destinations.len();
        NetworkStats {
            delivery_count,
            coverage_countries: delivery_count + usize::from(self.origin.is_some()),
        }
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
