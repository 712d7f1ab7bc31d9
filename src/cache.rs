//! File-backed result cache with TTL eviction on write
//!
//! The cache is best-effort: a missing, unreadable, or unparseable backing
//! file degrades to a miss or a no-op and never reaches the caller.

use crate::config::CacheConfig;
use crate::error::Result;
use crate::types::AuditResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use tracing::debug;

/// One stored result with its creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Epoch milliseconds when the entry was stored
    timestamp: i64,
    data: AuditResult,
}

/// Keyed store mapping normalized URLs to previously computed results
pub struct ResultCache {
    config: CacheConfig,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Cached result for `key`, only while younger than the TTL.
    ///
    /// Expired entries are left in place; eviction happens on the next
    /// write, not on read.
    pub fn get(&self, key: &str) -> Option<AuditResult> {
        if !self.config.enabled {
            return None;
        }
        let entries = self.read_entries();
        let entry = entries.get(key)?;
        if self.is_fresh(entry, Utc::now().timestamp_millis()) {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Store `result` under `key`, sweeping out every expired entry first.
    pub fn put(&self, key: &str, result: &AuditResult) {
        if !self.config.enabled {
            return;
        }
        let now = Utc::now().timestamp_millis();
        let mut entries = self.read_entries();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            key.to_string(),
            CacheEntry {
                timestamp: now,
                data: result.clone(),
            },
        );
        if let Err(e) = self.write_entries(&entries) {
            debug!("Ignoring cache write failure: {}", e);
        }
    }

    // Signed age: an entry stamped in the future counts as fresh.
    fn is_fresh(&self, entry: &CacheEntry, now_ms: i64) -> bool {
        now_ms - entry.timestamp < self.config.ttl_ms as i64
    }

    fn read_entries(&self) -> HashMap<String, CacheEntry> {
        match fs::read_to_string(&self.config.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Ignoring unreadable cache file: {}", e);
                    HashMap::new()
                }
            },
            // An absent file is a normal cold start
            Err(_) => HashMap::new(),
        }
    }

    fn write_entries(&self, entries: &HashMap<String, CacheEntry>) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        fs::write(&self.config.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        MetricValue, PerformanceMetrics, CLS_THRESHOLDS, FCP_THRESHOLDS, FID_THRESHOLDS,
        LCP_THRESHOLDS,
    };
    use std::path::Path;
    use tempfile::TempDir;

    fn cache_at(dir: &Path, ttl_ms: u64) -> ResultCache {
        ResultCache::new(&CacheConfig {
            enabled: true,
            path: dir.join("cache.json"),
            ttl_ms,
        })
    }

    fn sample_result(url: &str) -> AuditResult {
        AuditResult {
            url: url.to_string(),
            timestamp: Utc::now(),
            martech: Vec::new(),
            performance: PerformanceMetrics {
                score: 70,
                lcp: MetricValue::rounded(2000.0, LCP_THRESHOLDS),
                fid: MetricValue::rounded(80.0, FID_THRESHOLDS),
                cls: MetricValue::rounded_thousandths(0.02, CLS_THRESHOLDS),
                fcp: MetricValue::rounded(1400.0, FCP_THRESHOLDS),
            },
            third_party_count: 2,
            third_parties: Vec::new(),
            recommendations: vec!["example".to_string()],
        }
    }

    fn write_entry_with_age(cache: &ResultCache, key: &str, result: &AuditResult, age_ms: i64) {
        let mut entries = cache.read_entries();
        entries.insert(
            key.to_string(),
            CacheEntry {
                timestamp: Utc::now().timestamp_millis() - age_ms,
                data: result.clone(),
            },
        );
        cache.write_entries(&entries).unwrap();
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(dir.path(), 3_600_000);
        let result = sample_result("https://example.com");

        cache.put("https://example.com", &result);
        let hit = cache.get("https://example.com").expect("cache hit");

        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            serde_json::to_value(&result).unwrap()
        );
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(dir.path(), 3_600_000);
        let result = sample_result("https://example.com");

        write_entry_with_age(&cache, "https://example.com", &result, 3_600_001);
        assert!(cache.get("https://example.com").is_none());
    }

    #[test]
    fn test_get_does_not_evict() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(dir.path(), 1_000);
        let result = sample_result("https://example.com");

        write_entry_with_age(&cache, "https://example.com", &result, 5_000);
        assert!(cache.get("https://example.com").is_none());
        // Expired entry still occupies storage until the next write
        assert!(cache.read_entries().contains_key("https://example.com"));
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(dir.path(), 1_000);
        let old = sample_result("https://old.example");
        let new = sample_result("https://new.example");

        write_entry_with_age(&cache, "https://old.example", &old, 5_000);
        cache.put("https://new.example", &new);

        let entries = cache.read_entries();
        assert!(!entries.contains_key("https://old.example"));
        assert!(entries.contains_key("https://new.example"));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(dir.path(), 3_600_000);
        fs::write(dir.path().join("cache.json"), "definitely { not json").unwrap();

        assert!(cache.get("https://example.com").is_none());

        // A write replaces the corrupt file and works again
        let result = sample_result("https://example.com");
        cache.put("https://example.com", &result);
        assert!(cache.get("https://example.com").is_some());
    }

    #[test]
    fn test_disabled_cache_is_inert() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(&CacheConfig {
            enabled: false,
            path: dir.path().join("cache.json"),
            ttl_ms: 3_600_000,
        });
        let result = sample_result("https://example.com");

        cache.put("https://example.com", &result);
        assert!(cache.get("https://example.com").is_none());
        assert!(!dir.path().join("cache.json").exists());
    }
}
