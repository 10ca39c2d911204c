use crate::types::{RawScanResponse, ScanResult, Verdict};

/// Maps a raw server label onto a `Verdict`. Never fails: anything not
/// recognised, including an absent label, is `Unknown`.
pub fn map_verdict(raw: Option<&str>) -> Verdict {
    let label = match raw {
        Some(label) => label.trim().to_ascii_lowercase(),
        None => return Verdict::Unknown,
    };

    match label.as_str() {
        "safe" | "green" => Verdict::Safe,
        "suspicious" | "caution" | "yellow" => Verdict::Caution,
        "malicious" | "danger" | "red" => Verdict::Danger,
        _ => Verdict::Unknown,
    }
}

/// Builds the immutable result for a scan reply in either dialect.
pub fn parse_response(raw: &RawScanResponse) -> ScanResult {
    ScanResult::new(
        map_verdict(raw.risk_label()),
        raw.confidence,
        raw.reason().to_string(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerdictDisplay {
    pub title: &'static str,
    pub banner_class: &'static str,
    pub icon: &'static str,
}

impl VerdictDisplay {
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Safe => VerdictDisplay {
                title: "Safe",
                banner_class: "banner-green",
                icon: "icons/safe.png",
            },
            Verdict::Caution => VerdictDisplay {
                title: "Caution",
                banner_class: "banner-yellow",
                icon: "icons/suspicious.png",
            },
            Verdict::Danger => VerdictDisplay {
                title: "Danger",
                banner_class: "banner-red",
                icon: "icons/malicious.png",
            },
            Verdict::Unknown => VerdictDisplay {
                title: "Info",
                banner_class: "banner-gray",
                icon: DEFAULT_ICON,
            },
        }
    }
}

pub const DEFAULT_ICON: &str = "icons/icon48.svg";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert_eq!(map_verdict(Some("red")), Verdict::Danger);
        assert_eq!(map_verdict(Some("RED")), Verdict::Danger);
        assert_eq!(map_verdict(Some("Red")), Verdict::Danger);
        assert_eq!(map_verdict(Some("MALICIOUS")), Verdict::Danger);
    }

    #[test]
    fn test_all_labels() {
        assert_eq!(map_verdict(Some("GREEN")), Verdict::Safe);
        assert_eq!(map_verdict(Some("safe")), Verdict::Safe);
        assert_eq!(map_verdict(Some("YELLOW")), Verdict::Caution);
        assert_eq!(map_verdict(Some("suspicious")), Verdict::Caution);
        assert_eq!(map_verdict(Some("Caution")), Verdict::Caution);
        assert_eq!(map_verdict(Some("danger")), Verdict::Danger);
    }

    #[test]
    fn test_unrecognised_is_unknown() {
        assert_eq!(map_verdict(Some("")), Verdict::Unknown);
        assert_eq!(map_verdict(None), Verdict::Unknown);
        assert_eq!(map_verdict(Some("GRAY")), Verdict::Unknown);
        assert_eq!(map_verdict(Some("likely_manipulated")), Verdict::Unknown);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(map_verdict(Some("  yellow\n")), Verdict::Caution);
    }

    #[test]
    fn test_parse_response_both_dialects() {
        let email = RawScanResponse {
            risk_level: Some("YELLOW".to_string()),
            reason_text: Some("Shortened URL".to_string()),
            ..Default::default()
        };
        let media = RawScanResponse {
            verdict: Some("suspicious".to_string()),
            confidence: Some(0.87),
            explanation: Some("Shortened URL".to_string()),
            ..Default::default()
        };

        let a = parse_response(&email);
        let b = parse_response(&media);
        assert_eq!(a.verdict(), Verdict::Caution);
        assert_eq!(b.verdict(), Verdict::Caution);
        assert_eq!(a.reason_text(), b.reason_text());
        assert_eq!(a.confidence(), None);
        assert_eq!(b.confidence(), Some(0.87));
    }

    #[test]
    fn test_display_metadata() {
        let danger = VerdictDisplay::for_verdict(Verdict::Danger);
        assert_eq!(danger.banner_class, "banner-red");
        assert_eq!(danger.icon, "icons/malicious.png");

        let unknown = VerdictDisplay::for_verdict(Verdict::Unknown);
        assert_eq!(unknown.icon, DEFAULT_ICON);
    }
}
