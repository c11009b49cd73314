//! Geographic locations and their identity.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::LocationError;

/// A named place that can be searched for and saved as a favorite.
///
/// Two locations are equal when they share `name` and `country`; region and
/// coordinates are descriptive only. Deserializing runs [`Location::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LocationFields")]
pub struct Location {
    pub name: String,
    pub country: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Unchecked wire form of a [`Location`].
#[derive(Deserialize)]
struct LocationFields {
    name: String,
    country: String,
    #[serde(default)]
    region: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<LocationFields> for Location {
    type Error = LocationError;

    fn try_from(fields: LocationFields) -> Result<Self, Self::Error> {
        Location::new(
            fields.name,
            fields.country,
            fields.region,
            fields.latitude,
            fields.longitude,
        )
    }
}

/// Identity of a [`Location`]: the `(name, country)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey {
    pub name: String,
    pub country: String,
}

impl Location {
    /// Build a validated location.
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, LocationError> {
        let location = Self {
            name: name.into(),
            country: country.into(),
            region: region.into(),
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Check required fields and coordinate ranges.
    pub fn validate(&self) -> Result<(), LocationError> {
        if self.name.trim().is_empty() {
            return Err(LocationError::MissingName);
        }
        if self.country.trim().is_empty() {
            return Err(LocationError::MissingCountry);
        }
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LocationError::InvalidLatitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    pub fn key(&self) -> LocationKey {
        LocationKey {
            name: self.name.clone(),
            country: self.country.clone(),
        }
    }

    /// True if `other` names the same place.
    pub fn same_place(&self, other: &Location) -> bool {
        self.name == other.name && self.country == other.country
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.same_place(other)
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.country.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.region.is_empty() {
            write!(f, "{}, {}", self.name, self.country)
        } else {
            write!(f, "{}, {}, {}", self.name, self.region, self.country)
        }
    }
}
