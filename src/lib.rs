//! # martech_audit
//!
//! A library and CLI for auditing a website's marketing-technology stack,
//! providing insights into:
//! - **MarTech detection**: which tag managers, analytics, ads, social
//!   pixels, and consent platforms a page loads
//! - **Server-side tagging**: heuristic detection of first-party tracking
//!   proxies (GTM Server-Side)
//! - **Privacy posture**: consent coverage and third-party exposure
//! - **Performance**: Core Web Vitals with good/needs-improvement/poor
//!   ratings from the PageSpeed Insights API
//!
//! ## Quick Start
//!
//! ```no_run
//! use martech_audit::{analyze_website, calculate_scores, AuditConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = AuditConfig::default();
//! let result = analyze_website("example.com", &config).await?;
//! let scores = calculate_scores(&result);
//!
//! for detection in result.martech.iter().filter(|m| m.detected) {
//!     println!("{} ({})", detection.name, detection.category);
//! }
//! println!("Tracking {}/10, Privacy {}/10", scores.tracking, scores.privacy);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - Catalog-driven substring matching over two independent evidence
//!   channels (endpoint URLs and upstream entity labels)
//! - Host-based heuristic for server-side tag managers
//! - Best-effort local result cache with a one-hour TTL
//! - Distinct rate-limit classification for the upstream quota signal
//! - CLI tool with colored summary, JSON, and Markdown output

mod audit;
mod cache;
mod catalog;
mod config;
mod detect;
mod error;
mod psi;
mod recommend;
mod scoring;
mod types;

// Re-export public API
pub use audit::{analyze_website, analyze_with_client, build_result, normalize_url};
pub use cache::ResultCache;
pub use catalog::{catalog, lookup_entity_key, VendorCategory, VendorSignature};
pub use config::{AuditConfig, CacheConfig, NetworkConfig};
pub use error::{AuditError, Result};
pub use psi::{PsiClient, RawReport};
pub use scoring::calculate_scores;
pub use types::{
    AuditResult, HealthScores, MartechDetection, MetricValue, PerformanceMetrics, Rating,
    ThirdParty,
};
