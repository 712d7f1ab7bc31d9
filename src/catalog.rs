//! Static catalog of MarTech vendor signatures and lookup tables

use serde::{Deserialize, Serialize};

/// Vendor category buckets used for grouping and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorCategory {
    /// Google tag management, analytics, and ads
    Google,
    /// Social and advertising pixels
    Social,
    /// Consent management platforms
    Consent,
    /// Product analytics and UX tools
    Analytics,
    /// Anything else
    Other,
}

impl std::fmt::Display for VendorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Social => write!(f, "social"),
            Self::Consent => write!(f, "consent"),
            Self::Analytics => write!(f, "analytics"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Immutable signature for one MarTech vendor
#[derive(Debug, Clone, Copy)]
pub struct VendorSignature {
    /// Unique catalog key
    pub key: &'static str,
    /// Human-readable vendor name
    pub name: &'static str,
    /// Vendor category
    pub category: VendorCategory,
    /// Endpoint substrings that indicate the vendor
    pub patterns: &'static [&'static str],
    /// Remediation advice shown when the vendor is detected
    pub recommendation: Option<&'static str>,
}

/// Catalog key of the server-side tag manager signature, which is matched
/// by the host-based heuristic instead of the generic pattern matcher.
pub const SERVER_SIDE_KEY: &str = "gtm_server_side";

/// Catalog key of Google Tag Manager (client side)
pub const GTM_KEY: &str = "gtm";

/// Catalog key of Google Analytics 4
pub const GA4_KEY: &str = "ga4";

/// The full vendor catalog, in display order. Every analysis produces one
/// detection record per entry, in this order.
pub fn catalog() -> &'static [VendorSignature] {
    CATALOG
}

/// Look up a signature by its catalog key
pub fn signature(key: &str) -> Option<&'static VendorSignature> {
    CATALOG.iter().find(|s| s.key == key)
}

static CATALOG: &[VendorSignature] = &[
    // Google stack
    VendorSignature {
        key: GTM_KEY,
        name: "Google Tag Manager",
        category: VendorCategory::Google,
        patterns: &["googletagmanager.com/gtm.js", "googletagmanager.com/gtag/js"],
        recommendation: Some("Consider migrating to GTM Server-Side for better privacy compliance"),
    },
    VendorSignature {
        key: SERVER_SIDE_KEY,
        name: "GTM Server-Side",
        category: VendorCategory::Google,
        patterns: &[".tagging-server.", "sgtm.", "gtm-server.", "server-side-tagging"],
        recommendation: None,
    },
    VendorSignature {
        key: GA4_KEY,
        name: "Google Analytics 4",
        category: VendorCategory::Google,
        patterns: &["google-analytics.com/g/", "analytics.google.com"],
        recommendation: Some("Ensure GA4 is configured with consent mode for GDPR compliance"),
    },
    VendorSignature {
        key: "google_ads",
        name: "Google Ads",
        category: VendorCategory::Google,
        patterns: &["googleadservices.com", "googlesyndication.com", "doubleclick.net"],
        recommendation: Some("Consider server-side conversion tracking for better data accuracy"),
    },
    // Meta / social pixels
    VendorSignature {
        key: "meta_pixel",
        name: "Meta Pixel",
        category: VendorCategory::Social,
        patterns: &["connect.facebook.net", "facebook.com/tr", "facebook.com/signals"],
        recommendation: Some("Migrate to Conversions API (CAPI) via server-side GTM for GDPR compliance"),
    },
    VendorSignature {
        key: "tiktok_pixel",
        name: "TikTok Pixel",
        category: VendorCategory::Social,
        patterns: &["analytics.tiktok.com", "tiktok.com/i18n/pixel"],
        recommendation: Some("Consider TikTok Events API for server-side tracking"),
    },
    VendorSignature {
        key: "linkedin_insight",
        name: "LinkedIn Insight Tag",
        category: VendorCategory::Social,
        patterns: &["snap.licdn.com", "linkedin.com/px", "linkedin.com/li.lms-analytics"],
        recommendation: Some("Use LinkedIn Conversions API for privacy-safe tracking"),
    },
    VendorSignature {
        key: "twitter_pixel",
        name: "Twitter/X Pixel",
        category: VendorCategory::Social,
        patterns: &["static.ads-twitter.com", "analytics.twitter.com", "t.co/i/adsct"],
        recommendation: Some("Consider server-side implementation for better privacy"),
    },
    VendorSignature {
        key: "pinterest_tag",
        name: "Pinterest Tag",
        category: VendorCategory::Social,
        patterns: &["pintrk", "ct.pinterest.com", "pinterest.com/ct"],
        recommendation: None,
    },
    // Consent platforms
    VendorSignature {
        key: "cookiebot",
        name: "Cookiebot",
        category: VendorCategory::Consent,
        patterns: &["cookiebot.com", "consent.cookiebot.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "onetrust",
        name: "OneTrust",
        category: VendorCategory::Consent,
        patterns: &["onetrust.com", "cookielaw.org", "optanon"],
        recommendation: None,
    },
    VendorSignature {
        key: "iubenda",
        name: "Iubenda",
        category: VendorCategory::Consent,
        patterns: &["iubenda.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "cookieyes",
        name: "CookieYes",
        category: VendorCategory::Consent,
        patterns: &["cookieyes.com", "cookie-script.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "quantcast",
        name: "Quantcast Choice",
        category: VendorCategory::Consent,
        patterns: &["quantcast.com", "quantserve.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "trustarc",
        name: "TrustArc",
        category: VendorCategory::Consent,
        patterns: &["trustarc.com", "truste.com"],
        recommendation: None,
    },
    // Analytics and UX tools
    VendorSignature {
        key: "hotjar",
        name: "Hotjar",
        category: VendorCategory::Analytics,
        patterns: &["hotjar.com", "static.hotjar.com"],
        recommendation: Some("Ensure session recordings are GDPR compliant with consent"),
    },
    VendorSignature {
        key: "clarity",
        name: "Microsoft Clarity",
        category: VendorCategory::Analytics,
        patterns: &["clarity.ms", "claritybt.freshmarketer.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "amplitude",
        name: "Amplitude",
        category: VendorCategory::Analytics,
        patterns: &["amplitude.com", "cdn.amplitude.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "mixpanel",
        name: "Mixpanel",
        category: VendorCategory::Analytics,
        patterns: &["mixpanel.com", "cdn.mxpnl.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "segment",
        name: "Segment",
        category: VendorCategory::Analytics,
        patterns: &["segment.com", "segment.io", "cdn.segment.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "heap",
        name: "Heap",
        category: VendorCategory::Analytics,
        patterns: &["heap.io", "heapanalytics.com"],
        recommendation: None,
    },
    VendorSignature {
        key: "fullstory",
        name: "FullStory",
        category: VendorCategory::Analytics,
        patterns: &["fullstory.com", "fullstory.io"],
        recommendation: Some("Ensure PII masking is properly configured for GDPR"),
    },
    VendorSignature {
        key: "plausible",
        name: "Plausible Analytics",
        category: VendorCategory::Analytics,
        patterns: &["plausible.io"],
        recommendation: None,
    },
    VendorSignature {
        key: "fathom",
        name: "Fathom Analytics",
        category: VendorCategory::Analytics,
        patterns: &["usefathom.com"],
        recommendation: None,
    },
];

/// Upstream entity-label fragments mapped to catalog keys. Labels are
/// matched by lower-case substring containment; the first matching entry
/// wins, so more specific fragments come first.
pub static ENTITY_KEY_MAP: &[(&str, &str)] = &[
    ("google tag manager", GTM_KEY),
    ("google analytics", GA4_KEY),
    ("doubleclick", "google_ads"),
    ("google ads", "google_ads"),
    ("facebook", "meta_pixel"),
    ("meta pixel", "meta_pixel"),
    ("tiktok", "tiktok_pixel"),
    ("linkedin", "linkedin_insight"),
    ("twitter", "twitter_pixel"),
    ("pinterest", "pinterest_tag"),
    ("cookiebot", "cookiebot"),
    ("onetrust", "onetrust"),
    ("iubenda", "iubenda"),
    ("cookieyes", "cookieyes"),
    ("quantcast", "quantcast"),
    ("trustarc", "trustarc"),
    ("hotjar", "hotjar"),
    ("clarity", "clarity"),
    ("amplitude", "amplitude"),
    ("mixpanel", "mixpanel"),
    ("segment", "segment"),
    ("heap", "heap"),
    ("fullstory", "fullstory"),
    ("plausible", "plausible"),
    ("fathom", "fathom"),
];

/// Map an upstream entity label to a catalog key, first match wins
pub fn lookup_entity_key(label: &str) -> Option<&'static str> {
    let label = label.to_lowercase();
    ENTITY_KEY_MAP
        .iter()
        .find(|(fragment, _)| label.contains(fragment))
        .map(|(_, key)| *key)
}

/// GA4-style collector paths used by the first heuristic tier
pub static COLLECTOR_PATHS: &[&str] = &["/g/collect", "/mp/collect", "/j/collect"];

/// First-party Google analytics hosts that must not count as proxy evidence.
/// Matched as the exact host or any subdomain of it.
pub static GOOGLE_ANALYTICS_HOSTS: &[&str] = &[
    "google-analytics.com",
    "analytics.google.com",
    "googletagmanager.com",
    "stats.g.doubleclick.net",
];
