/// The simulated scan vendors. The prompt asks for a verdict from each and the
/// coercer derives `totalVendors` from the same table.
pub const ENGINE_LIST: [&str; 32] = [
    "BitDefender",
    "Fortinet",
    "Seclookup",
    "APVA",
    "Artists Against 419",
    "Avira",
    "AZORult Tracker",
    "Badbitcoin",
    "Bambenek Consulting",
    "CERT Polska",
    "DrWeb",
    "Fake Website Buster",
    "Gridlnsoft",
    "OpenPhish",
    "RedScama",
    "PhishFort",
    "Phishing Database",
    "PhishingBait",
    "PhishStats",
    "PhishTank",
    "Phishunt",
    "Scam Directory",
    "SCUMWARE",
    "SecureReliant Phishing List",
    "Spam404",
    "StopForumSpam",
    "SURBL",
    "Threat Sourcing",
    "ThreatLog",
    "TweetFeed",
    "urlDNA",
    "URLhaus",
];

/// Number of vendors every report claims to have consulted.
pub const TOTAL_VENDORS: u32 = ENGINE_LIST.len() as u32;

/// Prompt templates for the scan conversation.
pub struct ScanPrompt;

impl ScanPrompt {
    /// System instruction sent alongside every scan request
    pub fn system_instruction() -> &'static str {
        "You are the CyberScan Neural Engine. You provide REAL-TIME security intelligence. \
You MUST use Google Search to verify domain details (registration date, IP) before responding. \
Return results for all 32 specified engines in a JSON block."
    }

    pub fn scan_prompt(url: &str) -> String {
        format!(
            r#"Perform a deep-dive security audit on the URL: "{url}".

CRITICAL REQUIREMENT:
1. Use the provided Google Search tool to find the ACTUAL WHOIS registration date, domain age, current IP address, and ASN for this domain.
2. Do not use placeholders. If you cannot find the exact date, use the closest verified historical record.

Simulate a realistic threat intelligence scan across these {count} engines: {engines}.

OUTPUT FORMAT:
You MUST return your findings in a single valid JSON block enclosed in triple backticks (```json ... ```).

The JSON must follow this exact schema:
{{
  "url": string,
  "ip": string,
  "reverseDns": string,
  "asn": string,
  "domainAge": string,
  "registrationDate": string,
  "lastAnalysis": string,
  "location": {{ "city": string, "country": string, "region": string, "latitude": number, "longitude": number }},
  "security": {{
    "score": number,
    "status": "Safe" | "Warning" | "Malicious",
    "vendorsFlagged": number,
    "totalVendors": number,
    "summary": string,
    "engines": Array<{{ "name": string, "result": string, "details": string }}>
  }}
}}"#,
            url = url,
            count = ENGINE_LIST.len(),
            engines = ENGINE_LIST.join(", "),
        )
    }
}
