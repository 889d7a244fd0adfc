use crate::parser::coerce::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A model-improvised threat report for one URL.
///
/// Every field tolerates absence or a mistyped value; the generative service
/// is the only producer and nothing here is verified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub reverse_dns: String,
    #[serde(deserialize_with = "lenient::string")]
    pub asn: String,
    #[serde(deserialize_with = "lenient::string")]
    pub domain_age: String,
    #[serde(deserialize_with = "lenient::string")]
    pub registration_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub last_analysis: String,
    #[serde(deserialize_with = "lenient::object")]
    pub location: Location,
    #[serde(deserialize_with = "lenient::object")]
    pub security: SecurityReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(deserialize_with = "lenient::string")]
    pub city: String,
    #[serde(deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(deserialize_with = "lenient::string")]
    pub region: String,
    #[serde(deserialize_with = "lenient::float")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityReport {
    /// 0-100, where 100 is perfectly safe. Not range checked.
    #[serde(deserialize_with = "lenient::float")]
    pub score: f64,
    pub status: ThreatStatus,
    #[serde(deserialize_with = "lenient::count")]
    pub vendors_flagged: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub total_vendors: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::sequence")]
    pub engines: Vec<EngineResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineResult {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub result: String,
    #[serde(deserialize_with = "lenient::string")]
    pub details: String,
}

/// How an engine's free-text result reads. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineVerdict {
    Clean,
    Detected,
    Inconclusive,
}

const CLEAN_KEYWORDS: &[&str] = &["clean", "found", "safe", "nothing"];
const DETECTION_KEYWORDS: &[&str] = &["malware", "phish", "malicious", "threat"];

impl EngineResult {
    /// Clean keywords are checked first, so "No threats found" reads as clean.
    pub fn verdict(&self) -> EngineVerdict {
        let result = self.result.to_lowercase();
        if CLEAN_KEYWORDS.iter().any(|k| result.contains(k)) {
            EngineVerdict::Clean
        } else if DETECTION_KEYWORDS.iter().any(|k| result.contains(k)) {
            EngineVerdict::Detected
        } else {
            EngineVerdict::Inconclusive
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ThreatStatus {
    Safe,
    Warning,
    Malicious,
    #[default]
    Unknown,
}

impl ThreatStatus {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "safe" => ThreatStatus::Safe,
            "warning" => ThreatStatus::Warning,
            "malicious" => ThreatStatus::Malicious,
            _ => ThreatStatus::Unknown,
        }
    }
}

impl fmt::Display for ThreatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatStatus::Safe => "Safe",
            ThreatStatus::Warning => "Warning",
            ThreatStatus::Malicious => "Malicious",
            ThreatStatus::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for ThreatStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = lenient::string(deserializer)?;
        Ok(ThreatStatus::from_label(&label))
    }
}

/// A citation the service reports as supporting its answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// What one successful scan hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub data: AnalysisResult,
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_record() {
        let value = json!({
            "url": "https://example.com",
            "ip": "93.184.216.34",
            "reverseDns": "example.com",
            "asn": "AS15133",
            "domainAge": "29 years",
            "registrationDate": "1995-08-14",
            "lastAnalysis": "2024-05-01",
            "location": {
                "city": "Norwell",
                "country": "United States",
                "region": "Massachusetts",
                "latitude": 42.15,
                "longitude": -70.82
            },
            "security": {
                "score": 97,
                "status": "Safe",
                "vendorsFlagged": 0,
                "totalVendors": 32,
                "summary": "No threats.",
                "engines": [
                    {"name": "BitDefender", "result": "Clean", "details": "No detections"}
                ]
            }
        });

        let result: AnalysisResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.reverse_dns, "example.com");
        assert_eq!(result.location.longitude, -70.82);
        assert_eq!(result.security.score, 97.0);
        assert_eq!(result.security.status, ThreatStatus::Safe);
        assert_eq!(result.security.engines.len(), 1);
        assert_eq!(result.security.engines[0].verdict(), EngineVerdict::Clean);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let result: AnalysisResult = serde_json::from_value(json!({"url": "a.b"})).unwrap();
        assert_eq!(result.url, "a.b");
        assert_eq!(result.ip, "");
        assert_eq!(result.location, Location::default());
        assert_eq!(result.security.status, ThreatStatus::Unknown);
        assert!(result.security.engines.is_empty());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ThreatStatus::from_label("MALICIOUS"), ThreatStatus::Malicious);
        assert_eq!(ThreatStatus::from_label(" warning "), ThreatStatus::Warning);
        assert_eq!(ThreatStatus::from_label("Suspicious"), ThreatStatus::Unknown);
        assert_eq!(
            serde_json::to_value(ThreatStatus::Warning).unwrap(),
            json!("Warning")
        );
    }

    #[rstest::rstest]
    #[case("Clean", EngineVerdict::Clean)]
    #[case("Safe", EngineVerdict::Clean)]
    #[case("No threats found", EngineVerdict::Clean)]
    #[case("Nothing found", EngineVerdict::Clean)]
    #[case("Phishing", EngineVerdict::Detected)]
    #[case("MALWARE", EngineVerdict::Detected)]
    #[case("Malicious site", EngineVerdict::Detected)]
    #[case("Threat detected", EngineVerdict::Detected)]
    #[case("Suspicious", EngineVerdict::Inconclusive)]
    #[case("Unrated", EngineVerdict::Inconclusive)]
    #[case("", EngineVerdict::Inconclusive)]
    fn test_engine_verdict(#[case] result: &str, #[case] expected: EngineVerdict) {
        let engine = EngineResult {
            name: "SURBL".to_string(),
            result: result.to_string(),
            details: String::new(),
        };
        assert_eq!(engine.verdict(), expected);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert!(value.get("reverseDns").is_some());
        assert!(value["security"].get("vendorsFlagged").is_some());
        assert!(value["security"].get("totalVendors").is_some());
    }

    #[test]
    fn test_grounding_source_shape() {
        let source: GroundingSource = serde_json::from_value(json!({
            "web": {"uri": "https://who.is/example.com", "title": "who.is"}
        }))
        .unwrap();
        assert_eq!(source.web.unwrap().title, "who.is");

        let bare: GroundingSource = serde_json::from_value(json!({})).unwrap();
        assert!(bare.web.is_none());
    }
}
