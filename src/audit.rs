//! Main audit orchestration logic

use crate::cache::ResultCache;
use crate::config::AuditConfig;
use crate::detect::{detect_vendors, mine_evidence};
use crate::error::Result;
use crate::psi::{
    PsiClient, RawReport, AUDIT_CLS, AUDIT_FCP, AUDIT_FID, AUDIT_LCP, AUDIT_THIRD_PARTY,
};
use crate::recommend::build_recommendations;
use crate::types::{
    AuditResult, MetricValue, PerformanceMetrics, ThirdParty, CLS_THRESHOLDS, FCP_THRESHOLDS,
    FID_THRESHOLDS, LCP_THRESHOLDS,
};
use chrono::Utc;
use tracing::{debug, info};

/// Cap on the third-party entries carried in a result. The unfiltered
/// count is preserved separately in `third_party_count`.
const THIRD_PARTY_LIMIT: usize = 20;

/// Normalize a user-supplied URL: trim surrounding whitespace and default
/// to https when no scheme is given. Idempotent, no further validation;
/// malformed input is left to fail at the transport call.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Analyze a website and return the structured audit result, serving from
/// the result cache when a fresh entry exists.
pub async fn analyze_website(url: &str, config: &AuditConfig) -> Result<AuditResult> {
    let client = PsiClient::new(&config.network)?;
    analyze_with_client(url, &client, config).await
}

/// Analyze using a pre-built transport client (injectable for tests)
pub async fn analyze_with_client(
    url: &str,
    client: &PsiClient,
    config: &AuditConfig,
) -> Result<AuditResult> {
    let normalized = normalize_url(url);
    let cache = ResultCache::new(&config.cache);

    if let Some(cached) = cache.get(&normalized) {
        info!("Serving cached audit for {}", normalized);
        return Ok(cached);
    }

    info!("Analyzing {}", normalized);
    let raw = client.fetch_report(&normalized).await?;
    let result = build_result(&normalized, &raw);

    cache.put(&normalized, &result);

    info!(
        "Audit complete for {}: {}/{} vendors detected, performance {}",
        normalized,
        result.martech.iter().filter(|m| m.detected).count(),
        result.martech.len(),
        result.performance.score,
    );

    Ok(result)
}

/// Assemble an audit result from a raw upstream report
pub fn build_result(normalized_url: &str, raw: &RawReport) -> AuditResult {
    let evidence = mine_evidence(raw);
    debug!(
        "Mined {} endpoints and {} entity labels",
        evidence.endpoints.len(),
        evidence.entities.len()
    );

    let martech = detect_vendors(&evidence);

    let score = (raw.performance_fraction() * 100.0).round() as u8;
    let performance = PerformanceMetrics {
        score,
        lcp: MetricValue::rounded(raw.numeric_value(AUDIT_LCP), LCP_THRESHOLDS),
        fid: MetricValue::rounded(raw.numeric_value(AUDIT_FID), FID_THRESHOLDS),
        cls: MetricValue::rounded_thousandths(raw.numeric_value(AUDIT_CLS), CLS_THRESHOLDS),
        fcp: MetricValue::rounded(raw.numeric_value(AUDIT_FCP), FCP_THRESHOLDS),
    };

    let third_party_items = raw.audit_items(AUDIT_THIRD_PARTY);
    let third_party_count = third_party_items.len();
    let third_parties: Vec<ThirdParty> = third_party_items
        .iter()
        .take(THIRD_PARTY_LIMIT)
        .map(|item| ThirdParty {
            name: item
                .entity
                .as_ref()
                .map(|e| e.text().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            url: item.url.clone().unwrap_or_default(),
            transfer_size: item.transfer_size.unwrap_or(0.0) as u64,
        })
        .collect();

    let recommendations = build_recommendations(&martech, score, third_party_count);

    AuditResult {
        url: normalized_url.to_string(),
        timestamp: Utc::now(),
        martech,
        performance,
        third_party_count,
        third_parties,
        recommendations,
    }
}
