//! Saved locations, deduplicated by `(name, country)`.

use std::collections::HashSet;

use crate::location::{Location, LocationKey};

/// Ordered set of favorite locations.
///
/// Entries keep insertion order. Membership is decided by [`LocationKey`], so
/// two separately constructed values for the same place count as duplicates.
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    entries: Vec<Location>,
    keys: HashSet<LocationKey>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `location` unless an entry for the same place exists.
    ///
    /// Returns `true` if it was added.
    pub fn add(&mut self, location: &Location) -> bool {
        if !self.keys.insert(location.key()) {
            tracing::debug!("{} is already a favorite", location.name);
            return false;
        }
        self.entries.push(location.clone());
        tracing::info!("Added {} to favorites", location);
        true
    }

    /// Remove the entry for the same place as `location`, if any.
    ///
    /// Returns `true` if something was removed.
    pub fn remove(&mut self, location: &Location) -> bool {
        if !self.keys.remove(&location.key()) {
            return false;
        }
        self.entries.retain(|entry| !entry.same_place(location));
        tracing::info!("Removed {} from favorites", location);
        true
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.keys.contains(&location.key())
    }

    /// Add if absent, remove if present. Returns the new membership.
    pub fn toggle(&mut self, location: &Location) -> bool {
        if self.remove(location) {
            false
        } else {
            self.add(location)
        }
    }

    /// Snapshot of the current favorites in insertion order.
    pub fn list(&self) -> Vec<Location> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
