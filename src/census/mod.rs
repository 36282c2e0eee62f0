//! Demographic Sources
//!
//! County-level statistics (population, income, race, poverty) joined with
//! incident counts for display:
//! - `CensusClient`: US Census API (ACS 5-year estimates)
//! - `CensusCache`: JSON file written by a previous fetch
//! - `Demographics`: in-memory lookup by state and county

mod cache;
mod client;
pub mod states;
mod types;

pub use cache::CensusCache;
pub use client::{parse_table, CensusClient, CensusConfig, CENSUS_VARIABLES};
pub use types::{county_display_name, county_key, CountyStats, RaceBreakdown};

use async_trait::async_trait;
use std::collections::HashMap;

/// Common trait for anything that can supply county statistics
#[async_trait]
pub trait DemographicSource: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Statistics for every county of a state (postal code or full name)
    async fn county_stats(&self, state: &str) -> Result<Vec<CountyStats>, CensusError>;
}

/// Errors that can occur while fetching or caching demographic data
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Census API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// County statistics keyed by (postal code, county key)
#[derive(Debug, Clone, Default)]
pub struct Demographics {
    counties: HashMap<(String, String), CountyStats>,
}

impl Demographics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a county
    pub fn insert(&mut self, stats: CountyStats) {
        self.counties.insert(stats.key(), stats);
    }

    /// Find a county; the state may be a postal code or a full name
    pub fn get(&self, state: &str, county: &str) -> Option<&CountyStats> {
        self.counties
            .get(&(states::canonical(state), county_key(county)))
    }

    /// All counties of a state
    pub fn for_state<'a>(&'a self, state: &str) -> impl Iterator<Item = &'a CountyStats> {
        let state = states::canonical(state);
        self.counties.values().filter(move |s| s.state == state)
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    /// All counties, sorted by state then county
    pub fn to_vec(&self) -> Vec<CountyStats> {
        let mut all: Vec<CountyStats> = self.counties.values().cloned().collect();
        all.sort_by(|a, b| (&a.state, &a.county).cmp(&(&b.state, &b.county)));
        all
    }

    /// Fetch every listed state from a source
    pub async fn collect<S>(source: &S, states: &[String]) -> Result<Self, CensusError>
    where
        S: DemographicSource + ?Sized,
    {
        let mut demographics = Self::new();
        for state in states {
            let stats = source.county_stats(state).await?;
            tracing::info!(
                source = source.name(),
                state = %state,
                counties = stats.len(),
                "Fetched county statistics"
            );
            demographics.extend(stats);
        }
        Ok(demographics)
    }
}

impl Extend<CountyStats> for Demographics {
    fn extend<I: IntoIterator<Item = CountyStats>>(&mut self, iter: I) {
        for stats in iter {
            self.insert(stats);
        }
    }
}

impl FromIterator<CountyStats> for Demographics {
    fn from_iter<I: IntoIterator<Item = CountyStats>>(iter: I) -> Self {
        let mut demographics = Self::new();
        demographics.extend(iter);
        demographics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Vec<CountyStats>);

    #[async_trait]
    impl DemographicSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn county_stats(&self, state: &str) -> Result<Vec<CountyStats>, CensusError> {
            let info = states::lookup(state)
                .ok_or_else(|| CensusError::UnknownState(state.to_string()))?;
            Ok(self.0.iter().filter(|s| s.state == info.abbr).cloned().collect())
        }
    }

    fn sample() -> Vec<CountyStats> {
        vec![
            CountyStats::new("AL", "Jefferson County", 600),
            CountyStats::new("AL", "Mobile County", 400),
            CountyStats::new("LA", "Orleans Parish", 350),
        ]
    }

    #[test]
    fn test_lookup_normalizes_names() {
        let demographics: Demographics = sample().into_iter().collect();

        assert_eq!(demographics.len(), 3);
        assert_eq!(demographics.get("AL", "Jefferson").unwrap().population, 600);
        assert_eq!(demographics.get("Alabama", "mobile county").unwrap().population, 400);
        assert_eq!(demographics.get("LA", " Orleans ").unwrap().county, "Orleans");
        assert!(demographics.get("GA", "Fulton").is_none());
        assert_eq!(demographics.for_state("al").count(), 2);
    }

    #[test]
    fn test_to_vec_sorted() {
        let demographics: Demographics = sample().into_iter().rev().collect();
        let names: Vec<_> = demographics.to_vec().into_iter().map(|s| s.county).collect();
        assert_eq!(names, vec!["Jefferson", "Mobile", "Orleans"]);
    }

    #[tokio::test]
    async fn test_collect_from_source() {
        let source = FixedSource(sample());

        let demographics = Demographics::collect(&source, &["AL".to_string()]).await.unwrap();
        assert_eq!(demographics.len(), 2);

        let err = Demographics::collect(&source, &["Atlantis".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CensusError::UnknownState(_)));
    }
}
