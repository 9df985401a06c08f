//! Host-supplied day weather lookup.
//!
//! # Responsibility
//! - Look up weather by ISO calendar-date key (`YYYY-MM-DD`).
//!
//! # Invariants
//! - The core never computes or generates weather; it only reads what the
//!   host supplies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One day's weather as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWeather {
    /// Temperature in degrees Celsius.
    pub temp: i32,
    /// Free-form condition tag (`sunny`, `rainy`, `hot`, ...).
    pub condition: String,
    #[serde(default)]
    pub humidity: String,
}

/// ISO date key shared by host and core.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Read-only weather enrichment source.
pub trait WeatherLookup {
    fn weather_for(&self, key: &str) -> Option<DayWeather>;

    fn weather_on(&self, date: NaiveDate) -> Option<DayWeather> {
        self.weather_for(&date_key(date))
    }
}

/// Weather keyed by ISO date, typically deserialized from a host JSON map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherTable {
    days: HashMap<String, DayWeather>,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, date: NaiveDate, weather: DayWeather) {
        self.days.insert(date_key(date), weather);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl WeatherLookup for WeatherTable {
    fn weather_for(&self, key: &str) -> Option<DayWeather> {
        self.days.get(key.trim()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::{date_key, WeatherLookup, WeatherTable};
    use chrono::NaiveDate;

    #[test]
    fn date_key_is_zero_padded_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert_eq!(date_key(date), "2025-06-04");
    }

    #[test]
    fn table_loads_host_json_map() {
        let table = WeatherTable::from_json(
            r#"{"2025-06-24": {"temp": 35, "condition": "hot", "humidity": "high"}}"#,
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let weather = table.weather_on(date).unwrap();
        assert_eq!(weather.temp, 35);
        assert_eq!(weather.condition, "hot");
        assert!(table
            .weather_on(NaiveDate::from_ymd_opt(2025, 6, 25).unwrap())
            .is_none());
    }
}
