//! Weather data and location search for SkyCast
//!
//! Provides the debounced location search controller, the favorites store,
//! and an in-memory mock data service with simulated latency.

pub mod types;
pub mod favorites;
pub mod location;
pub mod lookup;
pub mod mock;
pub mod search;

pub use types::*;
pub use favorites::FavoritesStore;
pub use location::{Location, LocationKey};
pub use lookup::{ErrorReporter, LocationLookup, TracingReporter};
pub use mock::MockWeatherService;
pub use search::{SearchController, SearchOptions, SearchPhase, SearchState};
