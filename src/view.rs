//! Display views over the combined data
//!
//! Pure functions that shape index query results (optionally joined with
//! county statistics) for the presentation layer. Nothing here does I/O.

use crate::census::{states, CountyStats, Demographics};
use crate::index::RecordIndex;
use crate::record::{Attribute, Record, RecordResult};
use serde::Serialize;

/// Records matching one attribute filter, in date order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub attribute: Attribute,
    pub value: String,
    /// Number of matching records (before `limit`)
    pub total: usize,
    pub records: Vec<Record>,
}

/// Incident count for one county joined with its statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub state: String,
    pub county: String,
    pub incidents: u64,
    pub stats: Option<CountyStats>,
    /// Incidents per 100,000 residents at the time of the census
    pub incidents_per_100k: Option<f64>,
}

/// Filter the index and collect the matches in date order
///
/// `limit` caps the returned records; `total` always counts every match.
pub fn filtered(
    index: &RecordIndex,
    attribute: &str,
    value: &str,
    limit: Option<usize>,
) -> RecordResult<FilteredView> {
    let filter = index.filter(attribute, value)?;
    let attribute = filter.attribute();

    let mut records: Vec<Record> = filter.cloned().collect();
    records.sort_by_key(Record::date);

    let total = records.len();
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    Ok(FilteredView {
        attribute,
        value: value.to_string(),
        total,
        records,
    })
}

/// Map a requested state to the name used in the index
///
/// An exact match in the index wins; otherwise full names and postal codes
/// resolve to the postal code. `None` when the state is unknown.
pub fn resolve_state(index: &RecordIndex, state: &str) -> Option<String> {
    let state = state.trim();
    if index.location_counts().state(state).is_some() {
        return Some(state.to_string());
    }
    states::lookup(state).map(|info| info.abbr.to_string())
}

/// Join the index's location counts with county statistics
///
/// Restricted to one state when `state` is given (see [`resolve_state`]);
/// `None` when that state is unknown. Sorted by state, then by incident count
/// (highest first), then by county name.
pub fn location_summaries(
    index: &RecordIndex,
    demographics: &Demographics,
    state: Option<&str>,
) -> Option<Vec<LocationSummary>> {
    let state = match state {
        Some(requested) => Some(resolve_state(index, requested)?),
        None => None,
    };
    let state = state.as_deref();

    let mut summaries: Vec<LocationSummary> = index
        .location_counts()
        .iter()
        .filter(|(s, _, _)| state.map_or(true, |wanted| *s == wanted))
        .map(|(state, county, incidents)| {
            let stats = demographics.get(state, county).cloned();
            let incidents_per_100k = stats
                .as_ref()
                .filter(|s| s.population > 0)
                .map(|s| incidents as f64 * 100_000.0 / s.population as f64);

            LocationSummary {
                state: state.to_string(),
                county: county.to_string(),
                incidents,
                stats,
                incidents_per_100k,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.state
            .cmp(&b.state)
            .then(b.incidents.cmp(&a.incidents))
            .then_with(|| a.county.cmp(&b.county))
    });
    Some(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;
    use chrono::NaiveDate;

    fn index() -> RecordIndex {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        RecordIndex::load(vec![
            Record::with_date("AL", date(1921, 3, 1)).county("Jefferson"),
            Record::with_date("AL", date(1919, 7, 4)).county("Jefferson"),
            Record::with_date("AL", date(1900, 1, 1)).county("Mobile"),
            Record::with_date("GA", date(1921, 3, 1)).county("Fulton"),
        ])
    }

    #[test]
    fn test_filtered_sorted_and_limited() {
        let view = filtered(&index(), "state", "AL", Some(2)).unwrap();

        assert_eq!(view.attribute, Attribute::State);
        assert_eq!(view.total, 3);
        assert_eq!(view.records.len(), 2);
        assert!(view.records[0].date() < view.records[1].date());
    }

    #[test]
    fn test_filtered_unknown_attribute() {
        let err = filtered(&index(), "height", "6", None).unwrap_err();
        assert!(matches!(err, RecordError::UnknownAttribute(_)));
    }

    #[test]
    fn test_location_summaries() {
        let demographics: Demographics = vec![CountyStats::new("AL", "Jefferson County", 200_000)]
            .into_iter()
            .collect();

        let all = location_summaries(&index(), &demographics, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].county, "Jefferson");
        assert_eq!(all[0].incidents, 2);
        assert_eq!(all[0].incidents_per_100k, Some(1.0));
        assert!(all[1].stats.is_none());
        assert_eq!(all[2].state, "GA");

        let georgia = location_summaries(&index(), &demographics, Some("GA")).unwrap();
        assert_eq!(georgia.len(), 1);
        assert_eq!(georgia[0].incidents_per_100k, None);
    }

    #[test]
    fn test_location_summaries_resolve_state_names() {
        let demographics = Demographics::new();

        let by_name = location_summaries(&index(), &demographics, Some("Alabama")).unwrap();
        let by_code = location_summaries(&index(), &demographics, Some("AL")).unwrap();
        assert_eq!(by_name.len(), 2);
        assert_eq!(by_name.len(), by_code.len());
        assert!(by_name.iter().all(|s| s.state == "AL"));

        // Known state with no records
        let texas = location_summaries(&index(), &demographics, Some("texas")).unwrap();
        assert!(texas.is_empty());

        assert!(location_summaries(&index(), &demographics, Some("Atlantis")).is_none());
        assert_eq!(resolve_state(&index(), " georgia "), Some("GA".to_string()));
    }
}
