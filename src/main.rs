use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use skycast_core::{Config, UnitsConfig};
use skycast_weather::{FavoritesStore, MockWeatherService, SearchController, SearchOptions};

/// Keystrokes of someone typing "London" into the search box
const TYPED: [&str; 6] = ["L", "Lo", "Lon", "Lond", "Londo", "London"];
const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(80);

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _) = Config::load_validated()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let service = Arc::new(MockWeatherService::from_config(&config.mock));
    let mut search = SearchController::new(
        Arc::clone(&service),
        SearchOptions::from(&config.search),
        tokio::runtime::Handle::current(),
    );

    for keystroke in TYPED {
        search.set_query(keystroke);
        tokio::time::sleep(KEYSTROKE_INTERVAL).await;
    }
    search.settle().await;

    println!("SkyCast - Weather");
    println!("\nSearch results for {:?}:", search.query());
    if search.results().is_empty() {
        println!("  No locations found");
    }
    for location in search.results() {
        println!("  {}", location);
    }

    let mut favorites = FavoritesStore::new();
    for location in search.results() {
        favorites.add(location);
    }
    search.set_query("Tokyo");
    search.settle().await;
    for location in search.results() {
        favorites.add(location);
    }

    println!("\nFavorite locations:");
    for location in favorites.iter() {
        println!("  ★ {}", location);
    }

    let label = favorites
        .iter()
        .next()
        .map(|location| format!("{}, {}", location.name, location.country));
    let current = service.current_weather(label.as_deref()).await;
    let units = &config.units;

    println!("\nCurrent conditions in {}:", current.location);
    println!(
        "  {} {}, feels like {}",
        format_temp(current.temperature, units),
        current.condition.description(),
        format_temp(current.feels_like, units),
    );
    println!(
        "  Humidity {}%, wind {:.0} {}",
        current.humidity,
        units.wind.from_kmh(current.wind_speed),
        units.wind.symbol(),
    );
    println!(
        "  Sunrise {}, sunset {}",
        current.sunrise.format("%H:%M"),
        current.sunset.format("%H:%M"),
    );

    let today = chrono::Local::now().date_naive();
    println!("\n5-day forecast:");
    for day in service.forecast_from(today).await {
        println!(
            "  {:<10} {:>7} / {:<7} {:<14} {:>3}% rain",
            day.label(today),
            format_temp(day.high, units),
            format_temp(day.low, units),
            day.condition.description(),
            day.precipitation_chance,
        );
    }

    search.cancel();
    Ok(())
}

fn format_temp(celsius: f64, units: &UnitsConfig) -> String {
    format!(
        "{:.0}{}",
        units.temperature.from_celsius(celsius),
        units.temperature.symbol()
    )
}
