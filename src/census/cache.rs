//! Census Cache - county statistics persisted as JSON
//!
//! Lets the Census API be queried once and the results reused across runs.
//! A missing or unreadable cache is not an error: it loads empty and
//! reports that nothing was loaded, so callers can decide to fetch.

use super::{states, CensusError, CountyStats, DemographicSource, Demographics};
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// On-disk JSON cache of county statistics
#[derive(Debug, Clone)]
pub struct CensusCache {
    path: PathBuf,
    stats: Vec<CountyStats>,
    loaded: bool,
}

impl CensusCache {
    /// Load a cache file, or start empty if it cannot be read
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        match Self::read_file(&path) {
            Ok(stats) => {
                tracing::info!("Loaded {} counties from census cache {:?}", stats.len(), path);
                Self {
                    path,
                    stats,
                    loaded: true,
                }
            }
            Err(e) => {
                tracing::warn!("Census cache {:?} not loaded: {}", path, e);
                Self {
                    path,
                    stats: Vec::new(),
                    loaded: false,
                }
            }
        }
    }

    /// Create a cache from fetched statistics (not yet written)
    pub fn from_stats(path: impl Into<PathBuf>, stats: Vec<CountyStats>) -> Self {
        Self {
            path: path.into(),
            stats,
            loaded: false,
        }
    }

    fn read_file(path: &Path) -> Result<Vec<CountyStats>, CensusError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Whether the data came from an existing cache file
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> &[CountyStats] {
        &self.stats
    }

    /// Replace or add counties
    pub fn merge(&mut self, stats: Vec<CountyStats>) {
        for incoming in stats {
            let key = incoming.key();
            match self.stats.iter_mut().find(|s| s.key() == key) {
                Some(existing) => *existing = incoming,
                None => self.stats.push(incoming),
            }
        }
    }

    /// Write the cache as pretty JSON
    pub fn save(&self) -> Result<(), CensusError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.stats)?;

        tracing::info!("Saved {} counties to census cache {:?}", self.stats.len(), self.path);
        Ok(())
    }

    /// Build an in-memory lookup from the cached counties
    pub fn to_demographics(&self) -> Demographics {
        self.stats.iter().cloned().collect()
    }
}

#[async_trait]
impl DemographicSource for CensusCache {
    fn name(&self) -> &str {
        "census-cache"
    }

    async fn county_stats(&self, state: &str) -> Result<Vec<CountyStats>, CensusError> {
        let info = states::lookup(state).ok_or_else(|| CensusError::UnknownState(state.to_string()))?;

        Ok(self
            .stats
            .iter()
            .filter(|s| s.state == info.abbr)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_cache_loads_empty() {
        let dir = tempdir().unwrap();
        let cache = CensusCache::load(dir.path().join("census.json"));

        assert!(!cache.is_loaded());
        assert!(cache.stats().is_empty());
    }

    #[test]
    fn test_corrupt_cache_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("census.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = CensusCache::load(&path);
        assert!(!cache.is_loaded());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("census.json");

        let mut stats = CountyStats::new("GA", "Fulton County", 1000);
        stats.median_income = Some(52_000);
        CensusCache::from_stats(&path, vec![stats.clone()]).save().unwrap();

        let cache = CensusCache::load(&path);
        assert!(cache.is_loaded());
        assert_eq!(cache.stats(), &[stats]);
        assert_eq!(cache.to_demographics().get("GA", "Fulton").unwrap().population, 1000);
    }

    #[test]
    fn test_merge_replaces_existing() {
        let mut cache = CensusCache::from_stats(
            "unused.json",
            vec![CountyStats::new("AL", "Mobile", 1), CountyStats::new("AL", "Dale", 2)],
        );

        cache.merge(vec![
            CountyStats::new("AL", "Mobile County", 10),
            CountyStats::new("GA", "Fulton", 3),
        ]);

        assert_eq!(cache.stats().len(), 3);
        assert_eq!(cache.stats()[0].population, 10);
    }

    #[tokio::test]
    async fn test_cache_as_source() {
        let cache = CensusCache::from_stats(
            "unused.json",
            vec![CountyStats::new("AL", "Mobile", 1), CountyStats::new("GA", "Fulton", 2)],
        );

        let alabama = cache.county_stats("Alabama").await.unwrap();
        assert_eq!(alabama.len(), 1);
        assert!(cache.county_stats("Atlantis").await.is_err());
    }
}
