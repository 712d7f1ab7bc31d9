//! Transport to the Google PageSpeed Insights measurement API

use crate::config::NetworkConfig;
use crate::error::{AuditError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const PSI_API: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Lighthouse audit names consumed by the analyzer
pub const AUDIT_LCP: &str = "largest-contentful-paint";
pub const AUDIT_FID: &str = "max-potential-fid";
pub const AUDIT_CLS: &str = "cumulative-layout-shift";
pub const AUDIT_FCP: &str = "first-contentful-paint";
pub const AUDIT_THIRD_PARTY: &str = "third-party-summary";
pub const AUDIT_NETWORK_REQUESTS: &str = "network-requests";
pub const AUDIT_BOOTUP_TIME: &str = "bootup-time";

/// Raw report returned by the measurement API. Every field is optional;
/// downstream consumers tolerate any part being absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    pub lighthouse_result: Option<LighthouseResult>,
    pub error: Option<UpstreamError>,
}

/// Error object embedded in an upstream body
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamError {
    pub code: Option<i64>,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResult {
    pub categories: Option<Categories>,
    #[serde(default)]
    pub audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Categories {
    pub performance: Option<CategoryScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryScore {
    /// Score as a 0-1 fraction
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseAudit {
    pub numeric_value: Option<f64>,
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditDetails {
    #[serde(default)]
    pub items: Vec<AuditItem>,
}

/// One row of an audit's details table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditItem {
    pub url: Option<String>,
    pub entity: Option<EntityLabel>,
    pub transfer_size: Option<f64>,
}

/// Entity labels arrive either as a bare string or as an object with a
/// `text` member, depending on the upstream Lighthouse version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntityLabel {
    Text(String),
    Object { text: String },
}

impl EntityLabel {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Object { text } => text,
        }
    }
}

impl RawReport {
    /// Access an audit by name, if the report carries it
    pub fn audit(&self, name: &str) -> Option<&LighthouseAudit> {
        self.lighthouse_result.as_ref()?.audits.get(name)
    }

    /// Items of an audit's details table; empty when anything is absent
    pub fn audit_items(&self, name: &str) -> &[AuditItem] {
        self.audit(name)
            .and_then(|a| a.details.as_ref())
            .map(|d| d.items.as_slice())
            .unwrap_or(&[])
    }

    /// Numeric value of an audit, zero when absent
    pub fn numeric_value(&self, name: &str) -> f64 {
        self.audit(name).and_then(|a| a.numeric_value).unwrap_or(0.0)
    }

    /// Overall performance score as a 0-1 fraction, zero when absent
    pub fn performance_fraction(&self) -> f64 {
        self.lighthouse_result
            .as_ref()
            .and_then(|lr| lr.categories.as_ref())
            .and_then(|c| c.performance.as_ref())
            .and_then(|p| p.score)
            .unwrap_or(0.0)
    }

    /// Whether the body carries a quota-exhaustion error
    fn quota_exhausted(&self) -> bool {
        match &self.error {
            Some(err) => {
                err.code == Some(429) || err.status.as_deref() == Some("RESOURCE_EXHAUSTED")
            }
            None => false,
        }
    }
}

/// HTTP client for the PageSpeed Insights API
pub struct PsiClient {
    client: Client,
    base_url: String,
    config: NetworkConfig,
}

impl PsiClient {
    /// Build a client against the production API endpoint
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        Self::with_base_url(config, PSI_API)
    }

    /// Build a client against an alternative endpoint (used by tests)
    pub fn with_base_url(config: &NetworkConfig, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuditError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            config: config.clone(),
        })
    }

    /// Run one measurement for `target_url` and return the raw report.
    ///
    /// No retries: a rate-limit or failure is classified once and surfaced
    /// to the caller, who may re-invoke manually.
    pub async fn fetch_report(&self, target_url: &str) -> Result<RawReport> {
        debug!("Fetching PageSpeed report for {}", target_url);

        let mut query: Vec<(&str, &str)> = vec![
            ("url", target_url),
            ("strategy", self.config.strategy.as_str()),
        ];
        for category in &self.config.categories {
            query.push(("category", category.as_str()));
        }
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.as_str()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AuditError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(AuditError::RateLimited);
        }

        if !status.is_success() {
            // Quota exhaustion sometimes arrives as a non-429 error body
            let body = response.text().await.unwrap_or_default();
            if let Ok(report) = serde_json::from_str::<RawReport>(&body) {
                if report.quota_exhausted() {
                    return Err(AuditError::RateLimited);
                }
            }
            let reason = status
                .canonical_reason()
                .map(|r| format!("{} {}", status.as_u16(), r))
                .unwrap_or_else(|| status.as_u16().to_string());
            return Err(AuditError::transport(format!("HTTP {}", reason)));
        }

        let report: RawReport = response
            .json()
            .await
            .map_err(|e| AuditError::parse(format!("Invalid report body: {}", e)))?;

        // Quota errors can also ride in a 200 body
        if report.quota_exhausted() {
            return Err(AuditError::RateLimited);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            timeout_secs: 5,
            strategy: "mobile".to_string(),
            categories: vec!["performance".to_string()],
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_parses_minimal_report() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "lighthouseResult": {
                        "categories": {"performance": {"score": 0.83}},
                        "audits": {
                            "largest-contentful-paint": {"numericValue": 2300.5}
                        }
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = PsiClient::with_base_url(&test_config(), server.url()).unwrap();
        let report = client.fetch_report("https://example.com").await.unwrap();

        assert_eq!(report.performance_fraction(), 0.83);
        assert_eq!(report.numeric_value(AUDIT_LCP), 2300.5);
        assert_eq!(report.numeric_value(AUDIT_CLS), 0.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_429_status_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = PsiClient::with_base_url(&test_config(), server.url()).unwrap();
        let err = client.fetch_report("https://example.com").await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_resource_exhausted_body_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "status": "RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let client = PsiClient::with_base_url(&test_config(), server.url()).unwrap();
        let err = client.fetch_report("https://example.com").await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_quota_error_in_success_body_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let client = PsiClient::with_base_url(&test_config(), server.url()).unwrap();
        let err = client.fetch_report("https://example.com").await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = PsiClient::with_base_url(&test_config(), server.url()).unwrap();
        let err = client.fetch_report("https://example.com").await.unwrap_err();
        assert!(matches!(err, AuditError::Transport(_)));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_entity_label_shapes() {
        let text: EntityLabel = serde_json::from_str(r#""Google Analytics""#).unwrap();
        assert_eq!(text.text(), "Google Analytics");

        let object: EntityLabel =
            serde_json::from_str(r#"{"text": "Facebook", "url": "https://facebook.com"}"#).unwrap();
        assert_eq!(object.text(), "Facebook");
    }
}
