//! Demographic data types

use serde::{Deserialize, Serialize};

/// Population by race for one county
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceBreakdown {
    pub white: u64,
    pub black: u64,
    pub american_indian: u64,
    pub asian: u64,
    /// Everyone not counted above
    pub other: u64,
}

/// Census statistics for one county
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyStats {
    /// Postal abbreviation
    pub state: String,
    /// County name without its "County"/"Parish" suffix
    pub county: String,
    pub population: u64,
    /// Median household income; `None` when the Census suppresses it
    #[serde(default)]
    pub median_income: Option<u64>,
    #[serde(default)]
    pub race: RaceBreakdown,
    /// People with income below the poverty level
    #[serde(default)]
    pub poverty_count: u64,
}

impl CountyStats {
    pub fn new(state: impl Into<String>, county: impl Into<String>, population: u64) -> Self {
        Self {
            state: state.into(),
            county: county_display_name(&county.into()),
            population,
            median_income: None,
            race: RaceBreakdown::default(),
            poverty_count: 0,
        }
    }

    /// Share of the population below the poverty level
    pub fn poverty_rate(&self) -> Option<f64> {
        if self.population == 0 {
            return None;
        }
        Some(self.poverty_count as f64 / self.population as f64)
    }

    /// Lookup key for this county
    pub fn key(&self) -> (String, String) {
        (self.state.clone(), county_key(&self.county))
    }
}

const COUNTY_SUFFIXES: &[&str] = &[" county", " parish", " borough", " census area"];

/// Strip a trailing "County"/"Parish" suffix, keeping the original case
pub fn county_display_name(name: &str) -> String {
    let name = name.trim();
    let lower = name.to_ascii_lowercase();

    for suffix in COUNTY_SUFFIXES {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            return name[..name.len() - suffix.len()].trim_end().to_string();
        }
    }
    name.to_string()
}

/// Case-insensitive key for matching county names from different sources
pub fn county_key(name: &str) -> String {
    county_display_name(name).to_lowercase()
}
