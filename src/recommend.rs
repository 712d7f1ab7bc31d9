//! Recommendation rules applied to a completed detection set

use crate::catalog::{VendorCategory, GTM_KEY, SERVER_SIDE_KEY};
use crate::types::MartechDetection;

/// Derive the ordered, deduplicated recommendation list from the detection
/// records and the headline performance numbers.
pub fn build_recommendations(
    martech: &[MartechDetection],
    performance_score: u8,
    third_party_count: usize,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    let has_consent = martech
        .iter()
        .any(|m| m.detected && m.category == VendorCategory::Consent);
    let has_client_side = martech
        .iter()
        .any(|m| m.detected && (m.category == VendorCategory::Social || m.key == GTM_KEY));
    let has_server_side = martech.iter().any(|m| m.detected && m.key == SERVER_SIDE_KEY);

    if !has_consent && has_client_side {
        push_unique(
            &mut recommendations,
            "No cookie consent platform detected. This is required for GDPR compliance in the EU."
                .to_string(),
        );
    }

    if has_client_side && !has_server_side {
        push_unique(
            &mut recommendations,
            "Consider implementing GTM Server-Side to improve data accuracy, site performance, and privacy compliance."
                .to_string(),
        );
    }

    for detection in martech.iter().filter(|m| m.detected) {
        if let Some(rec) = &detection.recommendation {
            push_unique(&mut recommendations, rec.clone());
        }
    }

    if performance_score < 50 {
        push_unique(
            &mut recommendations,
            "Your performance score is low. Third-party scripts may be impacting load times."
                .to_string(),
        );
    }

    if third_party_count > 10 {
        push_unique(
            &mut recommendations,
            format!(
                "You have {} third-party connections. Consider reducing these for better performance and privacy.",
                third_party_count
            ),
        );
    }

    recommendations
}

fn push_unique(recommendations: &mut Vec<String>, text: String) {
    if !recommendations.contains(&text) {
        recommendations.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, signature};
    use crate::detect::{detect_vendors, Evidence};

    fn detected(key: &str, recommendation: Option<&str>) -> MartechDetection {
        let sig = signature(key).unwrap();
        MartechDetection {
            key: sig.key.to_string(),
            name: sig.name.to_string(),
            category: sig.category,
            detected: true,
            details: None,
            recommendation: recommendation.map(String::from),
        }
    }

    fn all_undetected() -> Vec<MartechDetection> {
        detect_vendors(&Evidence::default())
    }

    #[test]
    fn test_no_evidence_yields_no_recommendations() {
        let recs = build_recommendations(&all_undetected(), 80, 0);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_gdpr_warning_comes_first() {
        let martech = vec![detected("meta_pixel", None)];
        let recs = build_recommendations(&martech, 80, 0);
        assert!(recs[0].contains("GDPR"));
        // Client-side tracking without server-side also triggers migration
        assert!(recs[1].contains("GTM Server-Side"));
    }

    #[test]
    fn test_consent_platform_suppresses_gdpr_warning() {
        let martech = vec![detected("meta_pixel", None), detected("cookiebot", None)];
        let recs = build_recommendations(&martech, 80, 0);
        assert!(!recs.iter().any(|r| r.contains("required for GDPR compliance")));
    }

    #[test]
    fn test_server_side_suppresses_migration_suggestion() {
        let martech = vec![detected("gtm", None), detected(SERVER_SIDE_KEY, None)];
        let recs = build_recommendations(&martech, 80, 0);
        assert!(!recs.iter().any(|r| r.contains("Consider implementing GTM Server-Side")));
    }

    #[test]
    fn test_shared_recommendation_appears_once() {
        let shared = "Use a server-side integration";
        // Two detected vendors carrying the identical recommendation text
        let martech = vec![
            detected("cookiebot", Some(shared)),
            detected("onetrust", Some(shared)),
        ];
        let recs = build_recommendations(&martech, 80, 0);
        assert_eq!(recs.iter().filter(|r| r.as_str() == shared).count(), 1);
    }

    #[test]
    fn test_low_score_and_high_count_warnings() {
        let recs = build_recommendations(&all_undetected(), 42, 14);
        assert!(recs.iter().any(|r| r.contains("performance score is low")));
        assert!(recs.iter().any(|r| r.contains("14 third-party connections")));
    }

    #[test]
    fn test_count_at_threshold_is_quiet() {
        let recs = build_recommendations(&all_undetected(), 80, 10);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_every_catalog_entry_checked() {
        // A fully detected catalog must not panic and must dedup cleanly
        let martech: Vec<_> = catalog()
            .iter()
            .map(|sig| detected(sig.key, sig.recommendation))
            .collect();
        let recs = build_recommendations(&martech, 95, 3);
        let unique: std::collections::HashSet<_> = recs.iter().collect();
        assert_eq!(unique.len(), recs.len());
    }
}
