use std::collections::{BTreeMap, HashMap};

use foundation::math::GeoPoint;
use tracing::debug;

pub mod countries;
pub mod names;
pub mod prefs;
pub mod remote;

pub use countries::{COUNTRY_DATA, DEFAULT_FLAG, embedded_coords, flag};
pub use names::{Region, abbreviate};
pub use prefs::{
    FilePreferenceStore, InMemoryPreferenceStore, LocalStoragePreferenceStore, PreferenceStore,
    Preferences,
};
pub use remote::{CountryRecord, DEFAULT_COUNTRIES_URL, parse_rest_countries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    StorageUnavailable,
    Corrupt(String),
    Io(String),
    UnknownRegion(String),
    InvalidValue(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "country not found"),
            CatalogError::StorageUnavailable => write!(f, "browser storage unavailable"),
            CatalogError::Corrupt(msg) => write!(f, "catalog data corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog storage error: {msg}"),
            CatalogError::UnknownRegion(name) => write!(f, "unknown region: {name}"),
            CatalogError::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Which table answered a coordinate lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CountrySource {
    Embedded,
    Remote,
}

/// Country lookup over the embedded table and, when loaded, the remote
/// dataset. The embedded table always wins for names it knows.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    remote: BTreeMap<String, GeoPoint>,
    /// Lower-cased variant -> canonical name.
    aliases: HashMap<String, String>,
}

impl CountryCatalog {
    pub fn embedded() -> Self {
        let mut catalog = Self::default();
        catalog.index_embedded_names();
        catalog
    }

    pub fn with_remote(records: impl IntoIterator<Item = CountryRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            // Remote variants are indexed first; the common name claims its own key.
            for alias in &record.aliases {
                catalog
                    .aliases
                    .insert(alias.to_lowercase(), record.name.clone());
            }
            catalog
                .aliases
                .insert(record.name.to_lowercase(), record.name.clone());
            catalog.remote.insert(record.name, record.point);
        }
        catalog.index_embedded_names();
        debug!(
            remote = catalog.remote.len(),
            aliases = catalog.aliases.len(),
            "country catalog built"
        );
        catalog
    }

    fn index_embedded_names(&mut self) {
        for name in countries::embedded_names() {
            self.aliases
                .entry(name.to_lowercase())
                .or_insert_with(|| name.to_string());
        }
    }

    pub fn has_remote(&self) -> bool {
        !self.remote.is_empty()
    }

    pub fn coords(&self, name: &str) -> Option<GeoPoint> {
        embedded_coords(name).or_else(|| self.remote.get(name).copied())
    }

    pub fn source(&self, name: &str) -> Option<CountrySource> {
        if embedded_coords(name).is_some() {
            Some(CountrySource::Embedded)
        } else if self.remote.contains_key(name) {
            Some(CountrySource::Remote)
        } else {
            None
        }
    }

    /// Canonical name for user input (any case, official names, alternative
    /// spellings), or `None` if the country is unknown.
    pub fn resolve(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let candidate = self
            .aliases
            .get(&trimmed.to_lowercase())
            .cloned()
            .unwrap_or_else(|| trimmed.to_string());
        self.coords(&candidate).map(|_| candidate)
    }

    /// Every country usable as an origin, sorted.
    pub fn origin_candidates(&self) -> Vec<String> {
        let mut names: Vec<String> = countries::embedded_names()
            .map(str::to_string)
            .chain(self.remote.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Destinations come from the embedded table only, minus the origin.
    pub fn destination_candidates(&self, origin: Option<&str>) -> Vec<String> {
        countries::embedded_names()
            .filter(|n| Some(*n) != origin)
            .map(str::to_string)
            .collect()
    }
}
