//! Core data types for the website audit report

use crate::catalog::VendorCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete audit result for a single website analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    /// Normalized URL that was analyzed
    pub url: String,
    /// Timestamp when the analysis was performed
    pub timestamp: DateTime<Utc>,
    /// Detection outcome for every catalog vendor, in catalog order
    pub martech: Vec<MartechDetection>,
    /// Performance metrics from the upstream report
    pub performance: PerformanceMetrics,
    /// Total number of third parties reported upstream (not truncated)
    pub third_party_count: usize,
    /// Largest third parties by upstream order, capped at 20 entries
    pub third_parties: Vec<ThirdParty>,
    /// Deduplicated list of actionable recommendations
    pub recommendations: Vec<String>,
}

/// Detection outcome for a single MarTech vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MartechDetection {
    /// Catalog key of the vendor signature
    pub key: String,
    /// Human-readable vendor name
    pub name: String,
    /// Vendor category
    pub category: VendorCategory,
    /// Whether the vendor was detected on the analyzed page
    pub detected: bool,
    /// How detection fired, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Vendor-specific recommendation, present only when detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Performance section of the audit result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Overall Lighthouse performance score (0-100)
    pub score: u8,
    /// Largest Contentful Paint (milliseconds)
    pub lcp: MetricValue,
    /// Max Potential First Input Delay (milliseconds)
    pub fid: MetricValue,
    /// Cumulative Layout Shift (unitless)
    pub cls: MetricValue,
    /// First Contentful Paint (milliseconds)
    pub fcp: MetricValue,
}

/// A single metric value with its rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: f64,
    pub rating: Rating,
}

/// Rating buckets for Core Web Vitals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::NeedsImprovement => write!(f, "needs-improvement"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Good/poor cutoffs for a metric
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub good: f64,
    pub poor: f64,
}

/// Largest Contentful Paint cutoffs (ms)
pub const LCP_THRESHOLDS: Thresholds = Thresholds { good: 2500.0, poor: 4000.0 };
/// Max Potential FID cutoffs (ms)
pub const FID_THRESHOLDS: Thresholds = Thresholds { good: 100.0, poor: 300.0 };
/// Cumulative Layout Shift cutoffs (unitless)
pub const CLS_THRESHOLDS: Thresholds = Thresholds { good: 0.1, poor: 0.25 };
/// First Contentful Paint cutoffs (ms)
pub const FCP_THRESHOLDS: Thresholds = Thresholds { good: 1800.0, poor: 3000.0 };

impl Rating {
    /// Classify a metric value against its thresholds.
    ///
    /// A value exactly on the `good` cutoff rates good; exactly on the
    /// `poor` cutoff rates needs-improvement.
    pub fn classify(value: f64, thresholds: Thresholds) -> Self {
        if value <= thresholds.good {
            Self::Good
        } else if value <= thresholds.poor {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }
}

impl MetricValue {
    /// Build a metric from a raw value, rounded to whole units
    pub fn rounded(value: f64, thresholds: Thresholds) -> Self {
        Self {
            value: value.round(),
            rating: Rating::classify(value, thresholds),
        }
    }

    /// Build a metric from a raw value, rounded to three decimals (CLS)
    pub fn rounded_thousandths(value: f64, thresholds: Thresholds) -> Self {
        Self {
            value: (value * 1000.0).round() / 1000.0,
            rating: Rating::classify(value, thresholds),
        }
    }
}

/// A third-party resource reported by the upstream transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdParty {
    /// Entity name assigned upstream, or "Unknown"
    pub name: String,
    /// Endpoint URL
    pub url: String,
    /// Transfer size in bytes
    pub transfer_size: u64,
}

/// The three display scores computed from a completed audit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthScores {
    /// Tracking maturity (0-10)
    pub tracking: u8,
    /// Privacy and compliance (0-10)
    pub privacy: u8,
    /// Performance (0-10)
    pub performance: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_boundaries_lcp() {
        assert_eq!(Rating::classify(2500.0, LCP_THRESHOLDS), Rating::Good);
        assert_eq!(Rating::classify(2501.0, LCP_THRESHOLDS), Rating::NeedsImprovement);
        assert_eq!(Rating::classify(4000.0, LCP_THRESHOLDS), Rating::NeedsImprovement);
        assert_eq!(Rating::classify(4001.0, LCP_THRESHOLDS), Rating::Poor);
    }

    #[test]
    fn test_rating_boundaries_cls() {
        assert_eq!(Rating::classify(0.1, CLS_THRESHOLDS), Rating::Good);
        assert_eq!(Rating::classify(0.25, CLS_THRESHOLDS), Rating::NeedsImprovement);
        assert_eq!(Rating::classify(0.26, CLS_THRESHOLDS), Rating::Poor);
    }

    #[test]
    fn test_metric_rounding() {
        let lcp = MetricValue::rounded(2499.6, LCP_THRESHOLDS);
        assert_eq!(lcp.value, 2500.0);
        // Rating is computed from the raw value, not the rounded one
        assert_eq!(lcp.rating, Rating::Good);

        let cls = MetricValue::rounded_thousandths(0.12345, CLS_THRESHOLDS);
        assert_eq!(cls.value, 0.123);
        assert_eq!(cls.rating, Rating::NeedsImprovement);
    }
}
