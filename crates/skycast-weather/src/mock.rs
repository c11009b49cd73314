//! In-memory weather data with simulated network latency.
//!
//! Stands in for a real provider: a fixed location catalog, baseline current
//! conditions and a five-day forecast. Every call sleeps first so callers see
//! the same asynchronous timing a network round-trip would give them.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use parking_lot::Mutex;
use rand::Rng;
use skycast_core::MockConfig;

use crate::location::Location;
use crate::lookup::LocationLookup;
use crate::types::{CurrentWeather, DayForecast, HourlyForecast, LookupError, WeatherCondition};

/// Label of the location the baseline conditions describe
pub const DEFAULT_LOCATION: &str = "New York, NY";

const SEARCH_LATENCY_MS: u64 = 500;
const WEATHER_LATENCY_MS: u64 = 1000;

#[derive(Debug)]
pub struct MockWeatherService {
    search_latency: Duration,
    weather_latency: Duration,
    search_failure: Mutex<Option<LookupError>>,
}

impl Default for MockWeatherService {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(SEARCH_LATENCY_MS),
            Duration::from_millis(WEATHER_LATENCY_MS),
        )
    }
}

impl MockWeatherService {
    pub fn new(search_latency: Duration, weather_latency: Duration) -> Self {
        Self {
            search_latency,
            weather_latency,
            search_failure: Mutex::new(None),
        }
    }

    pub fn from_config(config: &MockConfig) -> Self {
        Self::new(
            Duration::from_millis(config.search_latency_ms),
            Duration::from_millis(config.weather_latency_ms),
        )
    }

    /// Make every following search fail with `error`.
    pub fn with_search_failure(self, error: LookupError) -> Self {
        self.set_search_failure(Some(error));
        self
    }

    /// Switch search failure injection on (`Some`) or off (`None`).
    pub fn set_search_failure(&self, error: Option<LookupError>) {
        *self.search_failure.lock() = error;
    }

    /// Catalog entries whose name or country contains `query`, ignoring case.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, LookupError> {
        tokio::time::sleep(self.search_latency).await;

        let failure = self.search_failure.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let needle = query.to_lowercase();
        Ok(catalog()
            .into_iter()
            .filter(|location| {
                location.name.to_lowercase().contains(&needle)
                    || location.country.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Current conditions for `location` (defaults to [`DEFAULT_LOCATION`]).
    ///
    /// Any other location gets randomized temperature, humidity and wind over
    /// the baseline.
    pub async fn current_weather(&self, location: Option<&str>) -> CurrentWeather {
        tokio::time::sleep(self.weather_latency).await;

        let mut weather = baseline_weather();
        if let Some(label) = location.filter(|label| *label != DEFAULT_LOCATION) {
            let mut rng = rand::thread_rng();
            weather.location = label.to_string();
            weather.temperature = f64::from(rng.gen_range(10..40_i32));
            weather.humidity = rng.gen_range(40..80);
            weather.wind_speed = f64::from(rng.gen_range(5..25_i32));
        }
        weather
    }

    /// Five-day forecast starting today.
    pub async fn forecast(&self) -> Vec<DayForecast> {
        self.forecast_from(chrono::Local::now().date_naive()).await
    }

    /// Five-day forecast starting at `today`.
    pub async fn forecast_from(&self, today: NaiveDate) -> Vec<DayForecast> {
        tokio::time::sleep(self.weather_latency).await;
        build_forecast(today)
    }
}

impl LocationLookup for MockWeatherService {
    async fn search(&self, query: &str) -> Result<Vec<Location>, LookupError> {
        self.search_locations(query).await
    }
}

fn place(name: &str, country: &str, region: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        name: name.to_string(),
        country: country.to_string(),
        region: region.to_string(),
        latitude,
        longitude,
    }
}

/// Locations the mock search knows about, in result order.
pub fn catalog() -> Vec<Location> {
    vec![
        place("New York", "USA", "NY", 40.7128, -74.0060),
        place("London", "UK", "England", 51.5074, -0.1278),
        place("Tokyo", "Japan", "Tokyo", 35.6762, 139.6503),
        place("Sydney", "Australia", "NSW", -33.8688, 151.2093),
        place("Paris", "France", "Île-de-France", 48.8566, 2.3522),
    ]
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn baseline_weather() -> CurrentWeather {
    CurrentWeather {
        location: DEFAULT_LOCATION.to_string(),
        temperature: 22.0,
        feels_like: 24.0,
        condition: WeatherCondition::PartlyCloudy,
        description: "Partly cloudy with light breeze".to_string(),
        humidity: 65,
        wind_speed: 12.0,
        wind_direction: 180,
        pressure: 1013,
        uv_index: 6,
        visibility: 10.0,
        sunrise: hm(6, 30),
        sunset: hm(19, 45),
    }
}

fn hour(time: NaiveTime, temperature: f64, condition: WeatherCondition, precip: u8) -> HourlyForecast {
    HourlyForecast {
        time,
        temperature,
        condition,
        precipitation_chance: precip,
    }
}

fn build_forecast(today: NaiveDate) -> Vec<DayForecast> {
    use WeatherCondition::{Cloudy, PartlyCloudy, Rainy, Sunny};

    // (high, low, condition, humidity, wind, precipitation)
    let days = [
        (24.0, 18.0, PartlyCloudy, 65, 12.0, 20),
        (26.0, 20.0, Sunny, 55, 8.0, 5),
        (28.0, 22.0, Sunny, 50, 10.0, 0),
        (25.0, 19.0, Rainy, 80, 15.0, 85),
        (23.0, 17.0, Cloudy, 70, 14.0, 40),
    ];

    days.into_iter()
        .enumerate()
        .map(|(offset, (high, low, condition, humidity, wind_speed, precip))| {
            let hourly = if offset == 0 {
                vec![
                    hour(hm(12, 0), 22.0, Sunny, 0),
                    hour(hm(13, 0), 23.0, Sunny, 0),
                    hour(hm(14, 0), 24.0, PartlyCloudy, 10),
                    hour(hm(15, 0), 23.0, Cloudy, 30),
                ]
            } else {
                Vec::new()
            };

            DayForecast {
                date: today + chrono::Duration::days(offset as i64),
                high,
                low,
                condition,
                humidity,
                wind_speed,
                precipitation_chance: precip,
                hourly,
            }
        })
        .collect()
}
