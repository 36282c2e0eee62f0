//! Record Index - binary search tree ordered by incident date
//!
//! Records are kept in a plain (unbalanced) binary search tree keyed by
//! date. Equal dates are not deduplicated: a record whose date equals the
//! visited node's date descends right, so records sharing a date form a
//! right-leaning chain in insertion order.
//!
//! # Invariants
//! - Left subtree dates are strictly less than the node's date
//! - Right subtree dates are greater than or equal to the node's date
//! - `locations` credits each inserted record once, by its own location
//!
//! # Performance
//! - Insert: O(depth); date-sorted input degrades to O(n) depth
//! - Filter: O(n), every node is visited
//! - All traversals use an explicit stack, so depth never hits the call stack

use crate::index::locations::LocationCounts;
use crate::index::IndexStats;
use crate::record::{Attribute, Record, RecordResult};
use chrono::NaiveDate;
use std::fmt;

struct Node {
    record: Record,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(record: Record) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }
}

/// Date-ordered, append-only index of incident records
///
/// Built once during a load phase, then only read. Share it behind an `Arc`
/// once loading has finished; no mutation may happen while readers traverse.
#[derive(Default)]
pub struct RecordIndex {
    root: Option<Box<Node>>,
    len: usize,
    locations: LocationCounts,
}

impl RecordIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by inserting records in sequence order
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut index = Self::new();
        index.extend(records);
        index
    }

    /// Insert a record
    ///
    /// Also credits the record's `(state, trimmed county)` in the location
    /// table, exactly once, regardless of where the record lands.
    pub fn insert(&mut self, record: Record) {
        self.locations.credit(record.state(), record.county_name());

        let date = record.date();
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if node.record.date() > date {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(Node::new(record)));
        self.len += 1;
    }

    /// Number of records in the index
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Select records whose named attribute equals `value`
    ///
    /// Fails with `UnknownAttribute` if `attribute` is not a record field.
    /// The returned iterator is lazy and visits nodes in pre-order.
    pub fn filter(&self, attribute: &str, value: &str) -> RecordResult<Filter<'_>> {
        let attribute: Attribute = attribute.parse()?;
        Ok(self.filter_by(attribute, value))
    }

    /// Typed variant of [`RecordIndex::filter`]
    pub fn filter_by(&self, attribute: Attribute, value: &str) -> Filter<'_> {
        tracing::debug!(attribute = %attribute, value, "Filtering record index");

        Filter {
            nodes: self.preorder(),
            attribute,
            value: value.to_string(),
        }
    }

    /// In-order traversal: non-decreasing dates, equal dates in insertion order
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Pre-order traversal
    pub fn preorder(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Records dated within `[start, end]`, in date order
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &Record> {
        self.iter()
            .skip_while(move |r| r.date() < start)
            .take_while(move |r| r.date() <= end)
    }

    /// Per-state, per-county record counts
    pub fn location_counts(&self) -> &LocationCounts {
        &self.locations
    }

    /// Earliest and latest dates in the index
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut first = self.root.as_deref()?;
        while let Some(left) = first.left.as_deref() {
            first = left;
        }

        let mut last = self.root.as_deref()?;
        while let Some(right) = last.right.as_deref() {
            last = right;
        }

        Some((first.record.date(), last.record.date()))
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node, usize)> = self
            .root
            .as_deref()
            .map(|root| (root, 1))
            .into_iter()
            .collect();

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }

        max_depth
    }

    /// Summary statistics
    pub fn stats(&self) -> IndexStats {
        let bounds = self.date_bounds();
        IndexStats {
            records: self.len,
            depth: self.depth(),
            states: self.locations.state_count(),
            locations: self.locations.location_count(),
            earliest: bounds.map(|(first, _)| first),
            latest: bounds.map(|(_, last)| last),
        }
    }
}

impl Extend<Record> for RecordIndex {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl FromIterator<Record> for RecordIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(records: I) -> Self {
        Self::load(records)
    }
}

impl<'a> IntoIterator for &'a RecordIndex {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for RecordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordIndex")
            .field("len", &self.len)
            .field("locations", &self.locations)
            .finish_non_exhaustive()
    }
}

impl Drop for RecordIndex {
    fn drop(&mut self) {
        // Unlink nodes one at a time; the default drop would recurse once per level.
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// In-order iterator over an index
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Pre-order iterator over an index
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.record)
    }
}

/// Lazy attribute filter over an index
pub struct Filter<'a> {
    nodes: PreOrder<'a>,
    attribute: Attribute,
    value: String,
}

impl Filter<'_> {
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<'a> Iterator for Filter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let attribute = self.attribute;
        let value = self.value.as_str();
        self.nodes.find(|record| record.matches(attribute, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;
    use std::collections::HashSet;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(state: &str, date: NaiveDate, county: &str) -> Record {
        Record::with_date(state, date).county(county)
    }

    /// Small deterministic generator so tests do not need a rand dependency
    fn sample_records(count: usize) -> Vec<Record> {
        let states = ["AL", "GA", "MS", "TX", "LA"];
        let counties = ["Adams", " Baker", "Clay ", "Dale"];
        let mut seed: u64 = 0x2545_f491;

        (0..count)
            .map(|i| {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                let year = 1882 + (seed % 50) as i32;
                let month = 1 + ((seed >> 8) % 12) as u32;
                let day = 1 + ((seed >> 16) % 28) as u32;
                Record::with_date(states[i % states.len()], ymd(year, month, day))
                    .county(counties[(seed >> 24) as usize % counties.len()])
                    .victim(format!("victim-{}", i))
            })
            .collect()
    }

    fn scenario_a() -> RecordIndex {
        RecordIndex::load(vec![
            record("AL", ymd(1921, 3, 1), "Jefferson"),
            record("AL", ymd(1919, 7, 4), "Jefferson"),
            record("GA", ymd(1921, 3, 1), "Fulton"),
        ])
    }

    #[test]
    fn test_scenario_a_ordering() {
        let index = scenario_a();

        let ordered: Vec<_> = index.iter().map(|r| (r.date(), r.state())).collect();
        assert_eq!(
            ordered,
            vec![
                (ymd(1919, 7, 4), "AL"),
                (ymd(1921, 3, 1), "AL"),
                (ymd(1921, 3, 1), "GA"),
            ]
        );
    }

    #[test]
    fn test_scenario_a_filter_and_counts() {
        let index = scenario_a();

        let alabama: Vec<_> = index.filter("state", "AL").unwrap().collect();
        assert_eq!(alabama.len(), 2);
        assert!(alabama.iter().all(|r| r.state() == "AL"));

        let counts = index.location_counts();
        assert_eq!(counts.get("AL", "Jefferson"), 2);
        assert_eq!(counts.get("GA", "Fulton"), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_unknown_attribute() {
        let index = scenario_a();
        let err = index.filter("nonexistentField", "x").err().unwrap();
        assert_eq!(err, RecordError::UnknownAttribute("nonexistentField".to_string()));
    }

    #[test]
    fn test_empty_index() {
        let index = RecordIndex::new();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.depth(), 0);
        assert!(index.date_bounds().is_none());
        assert!(index.location_counts().is_empty());
        for attribute in Attribute::all() {
            assert_eq!(index.filter_by(*attribute, "AL").count(), 0);
        }
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn test_in_order_is_sorted() {
        let index = RecordIndex::load(sample_records(500));

        let dates: Vec<_> = index.iter().map(Record::date).collect();
        assert_eq!(dates.len(), 500);
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(index.iter().len(), 500);
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let date = ymd(1900, 1, 1);
        let index = RecordIndex::load(vec![
            Record::with_date("AL", date).victim("first"),
            Record::with_date("AL", ymd(1899, 1, 1)),
            Record::with_date("AL", date).victim("second"),
            Record::with_date("AL", ymd(1901, 1, 1)),
            Record::with_date("AL", date).victim("third"),
        ]);

        let names: Vec<_> = index
            .iter()
            .filter(|r| r.date() == date)
            .map(|r| r.victim_name().unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_state_partitions_are_complete() {
        let records = sample_records(300);
        let index = RecordIndex::load(records.clone());

        let states: HashSet<&str> = records.iter().map(Record::state).collect();
        let mut seen = Vec::new();
        for state in states {
            seen.extend(index.filter("state", state).unwrap().map(|r| r.victim_name().unwrap()));
        }

        seen.sort_unstable();
        let mut expected: Vec<_> = records.iter().map(|r| r.victim_name().unwrap()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_counts_independent_of_order() {
        let records = sample_records(200);
        let forward = RecordIndex::load(records.clone());
        let reversed = RecordIndex::load(records.iter().rev().cloned());

        assert_eq!(forward.location_counts(), reversed.location_counts());

        for (state, county, count) in forward.location_counts().iter() {
            let expected = records
                .iter()
                .filter(|r| r.state() == state && r.county_name().map(str::trim) == Some(county))
                .count() as u64;
            assert_eq!(count, expected, "{} / {}", state, county);
        }
        assert_eq!(forward.location_counts().total(), 200);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let index = RecordIndex::load(sample_records(100));

        let first: Vec<_> = index.filter("state", "GA").unwrap().cloned().collect();
        let second: Vec<_> = index.filter("state", "GA").unwrap().cloned().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_filter_short_circuits() {
        let index = RecordIndex::load(sample_records(100));
        let first = index.filter("state", "TX").unwrap().next();
        assert_eq!(first.map(Record::state), Some("TX"));
    }

    #[test]
    fn test_filter_optional_fields() {
        let index = RecordIndex::load(vec![
            Record::with_date("AL", ymd(1900, 1, 1)).race("Black"),
            Record::with_date("AL", ymd(1901, 1, 1)),
            Record::with_date("GA", ymd(1902, 1, 1)).race("White"),
        ]);

        assert_eq!(index.filter("victimRace", "Black").unwrap().count(), 1);
        assert_eq!(index.filter("victim_race", "White").unwrap().count(), 1);
        assert_eq!(index.filter("victimRace", "").unwrap().count(), 0);
        assert_eq!(index.filter("date", "1901-01-01").unwrap().count(), 1);
    }

    #[test]
    fn test_sorted_input_builds_chain_without_overflow() {
        let start = ymd(1880, 1, 1);
        let records = (0..10_000).map(|i| {
            Record::with_date("AL", start + chrono::Duration::days(i))
        });

        let index = RecordIndex::load(records);
        assert_eq!(index.depth(), 10_000);
        assert_eq!(index.iter().count(), 10_000);
        assert_eq!(index.filter("state", "AL").unwrap().count(), 10_000);
        drop(index);
    }

    #[test]
    fn test_bounds_between_and_stats() {
        let index = scenario_a();

        assert_eq!(index.date_bounds(), Some((ymd(1919, 7, 4), ymd(1921, 3, 1))));

        let in_1921: Vec<_> = index.between(ymd(1921, 1, 1), ymd(1921, 12, 31)).collect();
        assert_eq!(in_1921.len(), 2);

        let stats = index.stats();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.states, 2);
        assert_eq!(stats.locations, 2);
        assert_eq!(stats.earliest, Some(ymd(1919, 7, 4)));
    }

    #[test]
    fn test_preorder_visits_every_record() {
        let index = RecordIndex::load(sample_records(64));
        assert_eq!(index.preorder().count(), 64);
        assert_eq!(index.preorder().next(), index.filter_by(Attribute::State, "AL").next());
    }
}
