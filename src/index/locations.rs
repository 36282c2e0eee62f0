//! Location counts - per state, per county incident tallies
//!
//! Maintained incrementally by the index: every inserted record credits its
//! own `(state, trimmed county)` pair exactly once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// County key used for records with no county
pub const UNKNOWN_COUNTY: &str = "";

/// state → county → number of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationCounts {
    states: BTreeMap<String, BTreeMap<String, u64>>,
}

impl LocationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one record to a location
    pub fn credit(&mut self, state: &str, county: Option<&str>) {
        let county = county.map(str::trim).unwrap_or(UNKNOWN_COUNTY);

        *self
            .states
            .entry(state.to_string())
            .or_default()
            .entry(county.to_string())
            .or_insert(0) += 1;
    }

    /// Count for an exact location (county is trimmed before lookup)
    pub fn get(&self, state: &str, county: &str) -> u64 {
        self.states
            .get(state)
            .and_then(|counties| counties.get(county.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// All county counts for a state
    pub fn state(&self, state: &str) -> Option<&BTreeMap<String, u64>> {
        self.states.get(state)
    }

    /// Total records credited to a state
    pub fn state_total(&self, state: &str) -> u64 {
        self.states
            .get(state)
            .map(|counties| counties.values().sum())
            .unwrap_or(0)
    }

    /// Total records credited anywhere
    pub fn total(&self) -> u64 {
        self.states.values().flat_map(|c| c.values()).sum()
    }

    /// Iterate `(state, county, count)` in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.states.iter().flat_map(|(state, counties)| {
            counties
                .iter()
                .map(move |(county, count)| (state.as_str(), county.as_str(), *count))
        })
    }

    /// Known state names
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Number of distinct states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of distinct (state, county) pairs
    pub fn location_count(&self) -> usize {
        self.states.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Borrow the underlying nested map
    pub fn as_map(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_trims_county() {
        let mut counts = LocationCounts::new();
        counts.credit("AL", Some("Jefferson"));
        counts.credit("AL", Some("  Jefferson "));
        counts.credit("AL", Some("Mobile"));

        assert_eq!(counts.get("AL", "Jefferson"), 2);
        assert_eq!(counts.get("AL", " Jefferson"), 2);
        assert_eq!(counts.get("AL", "Mobile"), 1);
        assert_eq!(counts.get("GA", "Mobile"), 0);
        assert_eq!(counts.state_total("AL"), 3);
    }

    #[test]
    fn test_missing_county() {
        let mut counts = LocationCounts::new();
        counts.credit("MS", None);
        counts.credit("MS", Some("   "));

        assert_eq!(counts.get("MS", UNKNOWN_COUNTY), 2);
        assert_eq!(counts.location_count(), 1);
    }

    #[test]
    fn test_iteration_and_totals() {
        let mut counts = LocationCounts::new();
        counts.credit("GA", Some("Fulton"));
        counts.credit("AL", Some("Mobile"));
        counts.credit("AL", Some("Baldwin"));

        let rows: Vec<_> = counts.iter().collect();
        assert_eq!(
            rows,
            vec![("AL", "Baldwin", 1), ("AL", "Mobile", 1), ("GA", "Fulton", 1)]
        );
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.state_count(), 2);
        assert_eq!(counts.states().collect::<Vec<_>>(), vec!["AL", "GA"]);
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut counts = LocationCounts::new();
        counts.credit("AL", Some("Mobile"));

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"AL":{"Mobile":1}}"#);
    }
}
