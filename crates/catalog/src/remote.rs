//! Parsing for the REST Countries dataset
//! (`/v3.1/all?fields=name,latlng,altSpellings`).

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::CatalogError;

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,latlng,altSpellings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Common name; the canonical id everywhere else.
    pub name: String,
    pub point: GeoPoint,
    /// Official name and alternative spellings.
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(default)]
    name: Option<RawName>,
    #[serde(default)]
    latlng: Option<Vec<f64>>,
    #[serde(default, rename = "altSpellings")]
    alt_spellings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    #[serde(default)]
    common: Option<String>,
    #[serde(default)]
    official: Option<String>,
}

/// Parses the dataset. Entries without a common name or with fewer than two
/// coordinates are skipped; only a malformed top level is an error.
pub fn parse_rest_countries(json: &str) -> Result<Vec<CountryRecord>, CatalogError> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
    let total = raw.len();

    let mut out = Vec::with_capacity(total);
    for value in raw {
        let entry: RawCountry = match serde_json::from_value(value) {
            Ok(e) => e,
            Err(e) => {
                trace!(error = %e, "skipping malformed country entry");
                continue;
            }
        };
        let Some(name) = entry.name else { continue };
        let Some(common) = name.common.filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        let point = match entry.latlng.as_deref() {
            Some([lat, lng, ..]) => GeoPoint::new(*lat, *lng),
            _ => continue,
        };
        if !point.is_finite() {
            continue;
        }

        let mut aliases: Vec<String> = name.official.into_iter().collect();
        aliases.extend(entry.alt_spellings);
        aliases.retain(|a| !a.trim().is_empty());

        out.push(CountryRecord {
            name: common,
            point,
            aliases,
        });
    }

    debug!(parsed = out.len(), total, "parsed remote country dataset");
    Ok(out)
}
