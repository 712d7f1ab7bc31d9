//! Configuration for audit behavior, transport, and caching

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the audit process
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditConfig {
    /// Network configuration for the measurement API
    pub network: NetworkConfig,
    /// Result cache configuration
    pub cache: CacheConfig,
}

/// Network configuration for the PageSpeed Insights API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Device strategy passed to the measurement API
    pub strategy: String,
    /// Lighthouse categories requested from the measurement API
    pub categories: Vec<String>,
    /// PageSpeed Insights API key (optional, for higher quotas)
    pub api_key: Option<String>,
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled at all
    pub enabled: bool,
    /// Path of the JSON cache file
    pub path: PathBuf,
    /// Entry lifetime in milliseconds
    pub ttl_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            strategy: "mobile".to_string(),
            categories: vec!["performance".to_string(), "best-practices".to_string()],
            api_key: std::env::var("PSI_API_KEY").ok(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: std::env::temp_dir().join("martech_audit_cache.json"),
            ttl_ms: 60 * 60 * 1000, // 1 hour
        }
    }
}

impl NetworkConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AuditConfig {
    /// Create a new builder for AuditConfig
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }
}

/// Builder for AuditConfig
#[derive(Default)]
pub struct AuditConfigBuilder {
    network: Option<NetworkConfig>,
    cache: Option<CacheConfig>,
}

impl AuditConfigBuilder {
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> AuditConfig {
        AuditConfig {
            network: self.network.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
        }
    }
}
