//! Command logic behind the `deliverymap` binary. Everything here returns
//! plain strings so it can be tested without a terminal.

use std::fmt::Write as _;
use std::path::Path;

use catalog::prefs::{FilePreferenceStore, Preferences};
use catalog::{CountryCatalog, Region, abbreviate, flag, parse_rest_countries};
use foundation::time::Millis;
use runtime::presentation::{Presentation, Speed, Step};
use scene::map::InMemoryMap;
use scene::{DeliveryNetwork, NetworkConfig, NetworkSnapshot, fit_to_points, render_svg};
use tracing::{info, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
}

/// Fetches the remote dataset; any failure falls back to the embedded table.
pub async fn load_catalog(client: &reqwest::Client, url: &str) -> CountryCatalog {
    match fetch_records(client, url).await {
        Ok(records) => {
            info!(countries = records.len(), "loaded remote country dataset");
            CountryCatalog::with_remote(records)
        }
        Err(e) => {
            warn!(error = %e, "could not load world countries, using embedded list");
            CountryCatalog::embedded()
        }
    }
}

async fn fetch_records(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<catalog::CountryRecord>, String> {
    let resp = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("{url} returned {}", resp.status()));
    }
    let body = resp.text().await.map_err(|e| e.to_string())?;
    parse_rest_countries(&body).map_err(|e| e.to_string())
}

pub fn resolve_country(catalog: &CountryCatalog, input: &str) -> Result<String, String> {
    catalog
        .resolve(input)
        .ok_or_else(|| format!("country not recognized: {input}"))
}

/// Destination names from explicit arguments plus an optional region,
/// resolved and deduplicated in argument order.
pub fn collect_destinations(
    catalog: &CountryCatalog,
    names: &[String],
    region: Option<Region>,
    origin: Option<&str>,
) -> Result<Vec<String>, String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let resolved = resolve_country(catalog, name)?;
        if !out.contains(&resolved) {
            out.push(resolved);
        }
    }
    if let Some(region) = region {
        let available = catalog.destination_candidates(origin);
        for name in region.members() {
            if available.iter().any(|a| a == name) && !out.iter().any(|o| o == name) {
                out.push(name.to_string());
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub origin: String,
    pub destinations: Vec<String>,
    pub labels: bool,
    /// Fixed zoom; `None` frames all points like the map would.
    pub zoom: Option<f64>,
    pub zoom_threshold: f64,
    pub width: u32,
    pub height: u32,
}

pub fn build_network(
    catalog: &CountryCatalog,
    request: &RenderRequest,
) -> Result<DeliveryNetwork, String> {
    let origin = resolve_country(catalog, &request.origin)?;
    let point = catalog
        .coords(&origin)
        .ok_or_else(|| format!("no coordinates for {origin}"))?;

    let mut network = DeliveryNetwork::new(NetworkConfig {
        zoom_threshold: request.zoom_threshold,
        labels_visible: request.labels,
        ..NetworkConfig::default()
    });
    network.set_origin(&origin, point);
    network.add_destinations(catalog, &request.destinations);

    match request.zoom {
        Some(zoom) => network.set_zoom(zoom),
        None => {
            let mut map = InMemoryMap::new(f64::from(request.width), f64::from(request.height));
            fit_to_points(&mut network, &mut map);
        }
    }
    Ok(network)
}

pub fn render(
    network: &DeliveryNetwork,
    format: OutputFormat,
    title: Option<&str>,
    width: u32,
    height: u32,
) -> Result<String, String> {
    let snapshot = NetworkSnapshot::capture(network, title, format == OutputFormat::Svg);
    match format {
        OutputFormat::Json => snapshot.to_json().map_err(|e| e.to_string()),
        OutputFormat::Svg => render_svg(&snapshot, width, height).map_err(|e| e.to_string()),
    }
}

/// One line per country: flag, name, label abbreviation, coordinates.
pub fn list_countries(catalog: &CountryCatalog, region: Option<Region>) -> String {
    let names: Vec<String> = match region {
        Some(region) => region
            .members()
            .into_iter()
            .filter(|n| catalog.coords(n).is_some())
            .map(str::to_string)
            .collect(),
        None => catalog.origin_candidates(),
    };
    let mut out = String::new();
    for name in names {
        let Some(p) = catalog.coords(&name) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{} {name}\t{}\t{:.4}\t{:.4}",
            flag(&name),
            abbreviate(&name),
            p.lat,
            p.lng
        );
    }
    out
}

/// Opens the preference file. Loaded values fall back to defaults when the
/// file cannot be opened; the error is kept for commands that write.
pub fn open_prefs(path: &Path) -> (Result<FilePreferenceStore, String>, Preferences) {
    match FilePreferenceStore::open(path) {
        Ok(store) => {
            let prefs = Preferences::load(&store);
            (Ok(store), prefs)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preferences unavailable, using defaults");
            (Err(e.to_string()), Preferences::default())
        }
    }
}

pub fn show_prefs(prefs: &Preferences) -> String {
    format!(
        "origin: {}\nzoom threshold: {}\npanel width: {}\n",
        prefs.origin_id.as_deref().unwrap_or("(not set)"),
        prefs.zoom_threshold,
        prefs.panel_width.as_deref().unwrap_or("(default)"),
    )
}

/// Runs a presentation to completion on a simulated clock and reports when
/// each country appears.
pub fn presentation_timeline(
    catalog: &CountryCatalog,
    origin: &str,
    countries: Vec<String>,
    speed: Speed,
    labels: bool,
) -> Result<String, String> {
    let origin = resolve_country(catalog, origin)?;
    let point = catalog
        .coords(&origin)
        .ok_or_else(|| format!("no coordinates for {origin}"))?;
    let mut network = DeliveryNetwork::default();
    network.set_origin(&origin, point);

    let Some(mut presentation) =
        scene::start_presentation(&mut network, catalog, countries, speed, labels, Millis::ZERO)
    else {
        return Err("nothing to present".to_string());
    };

    let mut out = String::new();
    let mut now = Millis::ZERO;
    loop {
        match scene::run_presentation_step(&mut presentation, &mut network, catalog, now) {
            Step::Add(name) => {
                let progress = presentation.progress();
                let _ = writeln!(
                    out,
                    "{:>7} ms  {} {name}  ({}/{}, {}%)",
                    now.0,
                    flag(&name),
                    progress.added,
                    progress.total,
                    progress.coverage_percent
                );
            }
            Step::Finished | Step::Stopped => break,
            Step::Idle => {}
        }
        match presentation.next_due() {
            Some(due) => now = due,
            None => break,
        }
    }
    let stats = network.stats();
    let _ = writeln!(
        out,
        "{} deliveries, {} covered",
        stats.delivery_count,
        stats.coverage_text()
    );
    Ok(out)
}

/// Builds a presentation only to report its order and pacing.
pub fn presentation_order(countries: Vec<String>, speed: Speed) -> Option<(Vec<String>, u64)> {
    Presentation::start(countries, speed, Millis::ZERO)
        .map(|p| (p.countries().to_vec(), p.interval_ms()))
}
