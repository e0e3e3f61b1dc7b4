use std::collections::BTreeSet;

use catalog::Region;
use tracing::debug;

use crate::network::DeliveryNetwork;

/// Pending picks from the destination list, before they are added to the
/// network.
///
/// Iteration is always in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationSelection {
    available: Vec<String>,
    filtered: Vec<String>,
    selected: BTreeSet<String>,
}

impl DestinationSelection {
    pub fn new(available: impl IntoIterator<Item = String>) -> Self {
        let mut s = Self::default();
        s.set_available(available);
        s
    }

    /// Replaces the pickable names (e.g. after the origin changed). Picks
    /// that are no longer available are dropped and the filter is reset.
    pub fn set_available(&mut self, available: impl IntoIterator<Item = String>) {
        let mut names: Vec<String> = available.into_iter().collect();
        names.sort();
        names.dedup();
        self.selected.retain(|n| names.binary_search(n).is_ok());
        self.filtered = names.clone();
        self.available = names;
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    fn is_available(&self, name: &str) -> bool {
        self.available
            .binary_search_by(|n| n.as_str().cmp(name))
            .is_ok()
    }

    /// Flips one pick. Names already delivered or not available are ignored.
    /// Returns whether the name is selected afterwards.
    pub fn toggle(&mut self, name: &str, network: &DeliveryNetwork) -> bool {
        if network.contains(name) || !self.is_available(name) {
            return false;
        }
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
            return true;
        }
        false
    }

    /// Case-insensitive substring filter over the available names.
    pub fn filter(&mut self, term: &str) -> &[String] {
        let term = term.to_lowercase();
        self.filtered = self
            .available
            .iter()
            .filter(|n| n.to_lowercase().contains(&term))
            .cloned()
            .collect();
        &self.filtered
    }

    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    /// Selects every filtered name that is not yet delivered.
    pub fn select_all_filtered(&mut self, network: &DeliveryNetwork) -> usize {
        let before = self.selected.len();
        for name in &self.filtered {
            if !network.contains(name) {
                self.selected.insert(name.clone());
            }
        }
        self.selected.len() - before
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replaces the selection with the region's available members, minus the
    /// origin and anything already delivered.
    pub fn select_region(&mut self, region: Region, network: &DeliveryNetwork) -> usize {
        self.selected.clear();
        let origin = network.origin().map(|o| o.id.as_str());
        for name in region.members() {
            if Some(name) == origin || network.contains(name) {
                continue;
            }
            if self.is_available(name) {
                self.selected.insert(name.to_string());
            }
        }
        debug!(region = %region, selected = self.selected.len(), "region selected");
        self.selected.len()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn selected(&self) -> Vec<&str> {
        self.selected.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Hands the picks over (for adding to the network) and clears them.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }
}
