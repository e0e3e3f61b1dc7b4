//! Persisted user preferences.
//!
//! Values are stored as strings under fixed keys so the same records work in
//! browser storage and in a JSON file.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::CatalogError;

pub const KEY_ORIGIN: &str = "originCountry";
pub const KEY_ZOOM_THRESHOLD: &str = "zoomThreshold";
pub const KEY_PANEL_WIDTH: &str = "panelWidth";

pub const DEFAULT_ZOOM_THRESHOLD: f64 = 4.25;
pub const ZOOM_THRESHOLD_RANGE: RangeInclusive<f64> = 2.0..=12.0;
/// Allowed panel widths in CSS pixels.
pub const PANEL_WIDTH_RANGE: RangeInclusive<f64> = 200.0..=500.0;

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError>;
    fn remove(&mut self, key: &str) -> Result<bool, CatalogError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, CatalogError> {
        Ok(self.values.remove(key).is_some())
    }
}

/// Preferences kept as a flat JSON object on disk. Every write rewrites the
/// whole file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens `path`; a missing or empty file is an empty store. Entries that
    /// are not strings are dropped, and an unparseable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => decode_entries(&path, &raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CatalogError::Io(format!("{}: {e}", path.display()))),
        };
        debug!(path = %path.display(), keys = values.len(), "opened preference file");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    fn flush(&self) -> Result<(), CatalogError> {
        let raw = serde_json::to_string_pretty(&self.values)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Io(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, raw)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", self.path.display())))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<bool, CatalogError> {
        let existed = self.values.remove(key).is_some();
        if existed {
            self.flush()?;
        }
        Ok(existed)
    }
}

fn decode_entries(path: &Path, raw: &str) -> BTreeMap<String, String> {
    let map = match serde_json::from_str::<serde_json::Map<String, Value>>(raw) {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preference file unreadable, starting empty");
            return BTreeMap::new();
        }
    };
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            other => {
                warn!(key = %key, value = %other, "dropping non-string preference");
                None
            }
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::PreferenceStore;
    use crate::CatalogError;

    /// `window.localStorage`, keys used verbatim.
    #[derive(Debug)]
    pub struct LocalStoragePreferenceStore {
        storage: web_sys::Storage,
    }

    impl LocalStoragePreferenceStore {
        pub fn new() -> Result<Self, CatalogError> {
            let win = web_sys::window().ok_or(CatalogError::StorageUnavailable)?;
            let storage = win
                .local_storage()
                .map_err(|e| CatalogError::Io(format!("localStorage error: {:?}", e)))?
                .ok_or(CatalogError::StorageUnavailable)?;
            Ok(Self { storage })
        }
    }

    impl PreferenceStore for LocalStoragePreferenceStore {
        fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
            self.storage
                .get_item(key)
                .map_err(|e| CatalogError::Io(format!("get_item({key}) failed: {:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| CatalogError::Io(format!("set_item({key}) failed: {:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<bool, CatalogError> {
            let existed = self.get(key)?.is_some();
            self.storage
                .remove_item(key)
                .map_err(|e| CatalogError::Io(format!("remove_item({key}) failed: {:?}", e)))?;
            Ok(existed)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePreferenceStore {
    pub fn new() -> Result<Self, CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for LocalStoragePreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<bool, CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }
}

/// `Some(value)` if `raw` is a usable zoom threshold.
pub fn parse_zoom_threshold(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && ZOOM_THRESHOLD_RANGE.contains(&value)).then_some(value)
}

/// `Some("<n>px")` if `raw` is a pixel width inside [`PANEL_WIDTH_RANGE`].
pub fn parse_panel_width(raw: &str) -> Option<String> {
    let number = raw.trim().strip_suffix("px")?.trim_end();
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && PANEL_WIDTH_RANGE.contains(&value)).then(|| format!("{value}px"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub origin_id: Option<String>,
    pub zoom_threshold: f64,
    /// CSS length as the panel reported it, e.g. `"380px"`.
    pub panel_width: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            origin_id: None,
            zoom_threshold: DEFAULT_ZOOM_THRESHOLD,
            panel_width: None,
        }
    }
}

impl Preferences {
    /// Reads every key. Unreadable or invalid values fall back to defaults.
    pub fn load(store: &impl PreferenceStore) -> Self {
        let mut prefs = Preferences::default();

        if let Some(origin) = read(store, KEY_ORIGIN).filter(|s| !s.trim().is_empty()) {
            prefs.origin_id = Some(origin.trim().to_string());
        }

        if let Some(raw) = read(store, KEY_ZOOM_THRESHOLD) {
            match parse_zoom_threshold(&raw) {
                Some(v) => prefs.zoom_threshold = v,
                None => warn!(value = %raw, "ignoring stored zoom threshold"),
            }
        }

        if let Some(raw) = read(store, KEY_PANEL_WIDTH) {
            match parse_panel_width(&raw) {
                Some(width) => prefs.panel_width = Some(width),
                None => warn!(value = %raw, "ignoring stored panel width"),
            }
        }
        prefs
    }

    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<(), CatalogError> {
        match &self.origin_id {
            Some(origin) => store.set(KEY_ORIGIN, origin)?,
            None => {
                store.remove(KEY_ORIGIN)?;
            }
        }
        store.set(KEY_ZOOM_THRESHOLD, &self.zoom_threshold.to_string())?;
        match &self.panel_width {
            Some(width) => store.set(KEY_PANEL_WIDTH, width)?,
            None => {
                store.remove(KEY_PANEL_WIDTH)?;
            }
        }
        Ok(())
    }

    /// Validates and stores a new threshold.
    pub fn set_zoom_threshold(
        &mut self,
        value: f64,
        store: &mut impl PreferenceStore,
    ) -> Result<(), CatalogError> {
        if !value.is_finite() || !ZOOM_THRESHOLD_RANGE.contains(&value) {
            return Err(CatalogError::InvalidValue(format!(
                "zoom threshold {value} outside {}..={}",
                ZOOM_THRESHOLD_RANGE.start(),
                ZOOM_THRESHOLD_RANGE.end()
            )));
        }
        self.zoom_threshold = value;
        store.set(KEY_ZOOM_THRESHOLD, &value.to_string())
    }

    /// Back to the default threshold; the stored key is removed.
    pub fn reset_zoom_threshold(
        &mut self,
        store: &mut impl PreferenceStore,
    ) -> Result<(), CatalogError> {
        self.zoom_threshold = DEFAULT_ZOOM_THRESHOLD;
        store.remove(KEY_ZOOM_THRESHOLD)?;
        Ok(())
    }

    /// Validates and stores a panel width such as `"380px"`.
    pub fn set_panel_width(
        &mut self,
        raw: &str,
        store: &mut impl PreferenceStore,
    ) -> Result<(), CatalogError> {
        let width = parse_panel_width(raw).ok_or_else(|| {
            CatalogError::InvalidValue(format!(
                "panel width {raw:?} must be {}px..={}px",
                PANEL_WIDTH_RANGE.start(),
                PANEL_WIDTH_RANGE.end()
            ))
        })?;
        store.set(KEY_PANEL_WIDTH, &width)?;
        self.panel_width = Some(width);
        Ok(())
    }
}

fn read(store: &impl PreferenceStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(v) => v,
        Err(e) => {
            warn!(key, error = %e, "preference read failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_store_is_empty() {
        let store = InMemoryPreferenceStore::new();
        assert_eq!(Preferences::load(&store), Preferences::default());
        assert_eq!(Preferences::default().zoom_threshold, 4.25);
    }

    #[test]
    fn out_of_range_threshold_is_discarded() {
        for raw in ["1.5", "12.5", "NaN", "inf", "", "abc"] {
            let mut store = InMemoryPreferenceStore::new();
            store.set(KEY_ZOOM_THRESHOLD, raw).unwrap();
            assert_eq!(Preferences::load(&store).zoom_threshold, DEFAULT_ZOOM_THRESHOLD, "{raw}");
        }
        let mut store = InMemoryPreferenceStore::new();
        store.set(KEY_ZOOM_THRESHOLD, "12").unwrap();
        assert_eq!(Preferences::load(&store).zoom_threshold, 12.0);
    }

    #[test]
    fn save_then_load() {
        let mut store = InMemoryPreferenceStore::new();
        let prefs = Preferences {
            origin_id: Some("Latvia".to_string()),
            zoom_threshold: 5.5,
            panel_width: Some("420px".to_string()),
        };
        prefs.save(&mut store).unwrap();
        assert_eq!(store.get(KEY_ORIGIN).unwrap().as_deref(), Some("Latvia"));
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn reset_removes_threshold_key() {
        let mut store = InMemoryPreferenceStore::new();
        let mut prefs = Preferences::default();
        prefs.set_zoom_threshold(6.0, &mut store).unwrap();
        assert!(prefs.set_zoom_threshold(20.0, &mut store).is_err());
        assert_eq!(prefs.zoom_threshold, 6.0);
        prefs.reset_zoom_threshold(&mut store).unwrap();
        assert_eq!(prefs.zoom_threshold, DEFAULT_ZOOM_THRESHOLD);
        assert_eq!(store.get(KEY_ZOOM_THRESHOLD).unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = FilePreferenceStore::open(&path).unwrap();
        assert!(store.entries().is_empty());
        store.set(KEY_ORIGIN, "Germany").unwrap();
        store.set(KEY_PANEL_WIDTH, "380px").unwrap();
        assert!(store.remove(KEY_PANEL_WIDTH).unwrap());
        assert!(!store.remove(KEY_PANEL_WIDTH).unwrap());

        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_ORIGIN).unwrap().as_deref(), Some("Germany"));
        assert_eq!(reopened.get(KEY_PANEL_WIDTH).unwrap(), None);
    }

    #[test]
    fn unreadable_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FilePreferenceStore::open(&path).unwrap();
        assert!(store.entries().is_empty());
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn non_string_entries_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"originCountry":"Latvia","zoomThreshold":5}"#).unwrap();
        let store = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_ZOOM_THRESHOLD).unwrap(), None);

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.origin_id.as_deref(), Some("Latvia"));
        assert_eq!(prefs.zoom_threshold, DEFAULT_ZOOM_THRESHOLD);
    }

    #[test]
    fn invalid_panel_width_is_discarded() {
        for raw in ["banana", "380", "150px", "501px", "px", "NaNpx"] {
            let mut store = InMemoryPreferenceStore::new();
            store.set(KEY_PANEL_WIDTH, raw).unwrap();
            assert_eq!(Preferences::load(&store).panel_width, None, "{raw}");
        }
        let mut store = InMemoryPreferenceStore::new();
        store.set(KEY_PANEL_WIDTH, " 500px ").unwrap();
        assert_eq!(Preferences::load(&store).panel_width.as_deref(), Some("500px"));
    }

    #[test]
    fn set_panel_width_validates() {
        let mut store = InMemoryPreferenceStore::new();
        let mut prefs = Preferences::default();
        assert!(matches!(
            prefs.set_panel_width("banana", &mut store),
            Err(CatalogError::InvalidValue(_))
        ));
        assert_eq!(store.get(KEY_PANEL_WIDTH).unwrap(), None);

        prefs.set_panel_width("250.5px", &mut store).unwrap();
        assert_eq!(prefs.panel_width.as_deref(), Some("250.5px"));
        assert_eq!(store.get(KEY_PANEL_WIDTH).unwrap().as_deref(), Some("250.5px"));
    }

    #[test]
    fn local_storage_is_unavailable_natively() {
        assert_eq!(
            LocalStoragePreferenceStore::new().unwrap_err(),
            CatalogError::StorageUnavailable
        );
    }
}
