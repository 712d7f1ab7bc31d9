//! Display score computation for completed audits

use crate::catalog::{VendorCategory, GA4_KEY, GTM_KEY, SERVER_SIDE_KEY};
use crate::types::{AuditResult, HealthScores};

/// Compute the three 0-10 display scores from a completed audit result.
///
/// Deterministic and side-effect free; a malformed result is a programming
/// error upstream, not a condition handled here.
pub fn calculate_scores(result: &AuditResult) -> HealthScores {
    let detected = |key: &str| result.martech.iter().any(|m| m.detected && m.key == key);

    let has_gtm = detected(GTM_KEY);
    let has_server_side = detected(SERVER_SIDE_KEY);
    let has_ga4 = detected(GA4_KEY);
    let has_social_pixels = result
        .martech
        .iter()
        .any(|m| m.detected && m.category == VendorCategory::Social);
    let has_consent = result
        .martech
        .iter()
        .any(|m| m.detected && m.category == VendorCategory::Consent);

    let mut tracking: u8 = 0;
    if has_gtm {
        tracking += 3;
    }
    if has_server_side {
        tracking += 4;
    }
    if has_ga4 {
        tracking += 2;
    }
    if has_social_pixels && has_server_side {
        tracking += 1;
    }
    let tracking = tracking.min(10);

    let mut privacy: u8 = 0;
    if has_consent {
        privacy += 5;
    }
    if has_server_side {
        privacy += 3;
    }
    if result.third_party_count <= 5 {
        privacy += 2;
    } else if result.third_party_count <= 10 {
        privacy += 1;
    }
    let privacy = privacy.min(10);

    let performance = ((result.performance.score as f64) / 10.0).round() as u8;

    HealthScores {
        tracking,
        privacy,
        performance,
    }
}
