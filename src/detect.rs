//! MarTech detection over the raw upstream report

use crate::catalog::{
    self, VendorSignature, COLLECTOR_PATHS, GOOGLE_ANALYTICS_HOSTS, SERVER_SIDE_KEY,
};
use crate::psi::{RawReport, AUDIT_BOOTUP_TIME, AUDIT_NETWORK_REQUESTS, AUDIT_THIRD_PARTY};
use crate::types::MartechDetection;
use url::Url;

/// Evidence mined from a raw report. Two independent channels: the raw
/// endpoint URLs the page requested, and the entity labels the upstream
/// tool itself assigned to detected third parties.
#[derive(Debug, Default)]
pub struct Evidence {
    /// Lower-cased endpoint URLs from every request listing in the report
    pub endpoints: Vec<String>,
    /// Lower-cased upstream entity labels
    pub entities: Vec<String>,
}

/// Flatten the report's third-party summary, network-request list, and
/// script-time breakdown into the two evidence channels. Each source is
/// optional and skipped when absent.
pub fn mine_evidence(report: &RawReport) -> Evidence {
    let mut evidence = Evidence::default();

    for item in report.audit_items(AUDIT_THIRD_PARTY) {
        if let Some(url) = &item.url {
            evidence.endpoints.push(url.to_lowercase());
        }
        if let Some(entity) = &item.entity {
            evidence.entities.push(entity.text().to_lowercase());
        }
    }

    for audit in [AUDIT_NETWORK_REQUESTS, AUDIT_BOOTUP_TIME] {
        for item in report.audit_items(audit) {
            if let Some(url) = &item.url {
                evidence.endpoints.push(url.to_lowercase());
            }
        }
    }

    evidence
}

/// Run detection for every catalog entry. Produces exactly one record per
/// signature, in catalog order, whether or not it was detected.
pub fn detect_vendors(evidence: &Evidence) -> Vec<MartechDetection> {
    catalog::catalog()
        .iter()
        .map(|sig| {
            if sig.key == SERVER_SIDE_KEY {
                detect_server_side(sig, evidence)
            } else {
                detect_generic(sig, evidence)
            }
        })
        .collect()
}

/// Generic matcher: endpoint substring, entity-map lookup, or display-name
/// containment in an entity label.
fn detect_generic(sig: &VendorSignature, evidence: &Evidence) -> MartechDetection {
    for pattern in sig.patterns {
        if evidence.endpoints.iter().any(|e| e.contains(pattern)) {
            return record(sig, true, Some(format!("endpoint matched \"{}\"", pattern)));
        }
    }

    let name_lower = sig.name.to_lowercase();
    for label in &evidence.entities {
        if catalog::lookup_entity_key(label) == Some(sig.key) || label.contains(&name_lower) {
            return record(sig, true, Some(format!("reported upstream as \"{}\"", label)));
        }
    }

    record(sig, false, None)
}

/// Server-side tagging is defined by where traffic lands, not by a fixed
/// substring. Tier 1: a collector path served from a non-Google host is
/// first-party proxy evidence. Tier 2: literal vendor subdomain fragments.
fn detect_server_side(sig: &VendorSignature, evidence: &Evidence) -> MartechDetection {
    let mut proxy_hosts: Vec<String> = Vec::new();

    for endpoint in &evidence.endpoints {
        if !COLLECTOR_PATHS.iter().any(|p| endpoint.contains(p)) {
            continue;
        }
        let Some(host) = Url::parse(endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            continue;
        };
        if !is_google_analytics_host(&host) && !proxy_hosts.contains(&host) {
            proxy_hosts.push(host);
        }
    }

    if !proxy_hosts.is_empty() {
        return record(
            sig,
            true,
            Some(format!(
                "first-party collector endpoint on {}",
                proxy_hosts.join(", ")
            )),
        );
    }

    for pattern in sig.patterns {
        if evidence.endpoints.iter().any(|e| e.contains(pattern)) {
            return record(
                sig,
                true,
                Some("server-side tagging endpoint pattern detected".to_string()),
            );
        }
    }

    record(sig, false, None)
}

fn is_google_analytics_host(host: &str) -> bool {
    GOOGLE_ANALYTICS_HOSTS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

fn record(sig: &VendorSignature, detected: bool, details: Option<String>) -> MartechDetection {
    MartechDetection {
        key: sig.key.to_string(),
        name: sig.name.to_string(),
        category: sig.category,
        detected,
        details,
        recommendation: if detected {
            sig.recommendation.map(String::from)
        } else {
            None
        },
    }
}
