use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use skycast_core::{AppError, WeatherError};

/// Weather condition categories produced by the data layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
}

impl WeatherCondition {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
        }
    }
}

/// Current weather conditions (metric units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Display label, e.g. "New York, NY"
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: WeatherCondition,
    pub description: String,
    pub humidity: u8,
    /// km/h
    pub wind_speed: f64,
    /// Degrees clockwise from north
    pub wind_direction: u16,
    /// hPa
    pub pressure: u16,
    pub uv_index: u8,
    /// km
    pub visibility: f64,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

/// Hourly forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: NaiveTime,
    pub temperature: f64,
    pub condition: WeatherCondition,
    pub precipitation_chance: u8,
}

/// Daily forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub condition: WeatherCondition,
    pub humidity: u8,
    pub wind_speed: f64,
    pub precipitation_chance: u8,
    pub hourly: Vec<HourlyForecast>,
}

impl DayForecast {
    /// "Today", "Tomorrow", or the weekday name relative to `today`.
    pub fn label(&self, today: NaiveDate) -> String {
        match (self.date - today).num_days() {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => weekday_name(self.date.weekday()).to_string(),
        }
    }
}

fn weekday_name(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

/// Location validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location name is required")]
    MissingName,
    #[error("Location country is required")]
    MissingCountry,
    #[error("Latitude {0} is outside -90..=90")]
    InvalidLatitude(f64),
    #[error("Longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),
}

/// Location lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Lookup timed out")]
    Timeout,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Lookup error: {0}")]
    Other(String),
}

impl From<LookupError> for WeatherError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Timeout => WeatherError::Timeout,
            LookupError::Unavailable => WeatherError::ServiceUnavailable,
            LookupError::Network(s) | LookupError::Other(s) => WeatherError::SearchFailed(s),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        AppError::Weather(e.into())
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        AppError::Weather(WeatherError::InvalidLocation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_description() {
        assert_eq!(WeatherCondition::Sunny.description(), "Sunny");
        assert_eq!(WeatherCondition::PartlyCloudy.description(), "Partly Cloudy");
        assert_eq!(WeatherCondition::Rainy.description(), "Rainy");
    }

    #[test]
    fn test_condition_serde_name() {
        let json = serde_json::to_string(&WeatherCondition::PartlyCloudy).unwrap();
        assert_eq!(json, "\"partly_cloudy\"");
    }

    fn day(date: NaiveDate) -> DayForecast {
        DayForecast {
            date,
            high: 20.0,
            low: 10.0,
            condition: WeatherCondition::Sunny,
            humidity: 50,
            wind_speed: 10.0,
            precipitation_chance: 0,
            hourly: Vec::new(),
        }
    }

    #[test]
    fn test_day_label() {
        // 2024-06-03 is a Monday
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(day(today).label(today), "Today");
        assert_eq!(day(today.succ_opt().unwrap()).label(today), "Tomorrow");
        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(day(wednesday).label(today), "Wednesday");
    }

    #[test]
    fn test_lookup_error_maps_to_app_error() {
        let app_err: AppError = LookupError::Unavailable.into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherError::ServiceUnavailable)
        ));

        let app_err: AppError = LookupError::Network("reset".into()).into();
        assert_eq!(
            app_err.user_message(),
            "Location search failed. Please try again."
        );
    }

    #[test]
    fn test_location_error_maps_to_app_error() {
        let app_err: AppError = LocationError::MissingName.into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherError::InvalidLocation(_))
        ));
    }
}
