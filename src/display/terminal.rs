use chrono::Local;
use colored::{ColoredString, Colorize};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use crate::core::{
    EngineResult, EngineVerdict, GroundingSource, ScanOutcome, ScanState, ThreatStatus, WebSource,
};
use crate::llm::ENGINE_LIST;

const SOURCE_TITLE_FALLBACK: &str = "External Source";

pub struct TerminalDisplay;

impl TerminalDisplay {
    fn get_terminal_width() -> usize {
        match terminal_size::terminal_size() {
            Some((terminal_size::Width(w), _)) => w as usize,
            None => 80,
        }
    }

    pub fn display_state(state: &ScanState) {
        match state {
            ScanState::Result { target, outcome } => Self::display_report(target, outcome),
            ScanState::Error { target, message } => Self::display_failure(target, message),
            ScanState::Idle | ScanState::Loading { .. } => {}
        }
    }

    pub fn display_report(target: &str, outcome: &ScanOutcome) {
        let width = Self::get_terminal_width();
        let separator = "=".repeat(width.saturating_sub(5).max(20));
        let data = &outcome.data;
        let security = &data.security;

        println!("\n{}", separator.cyan());
        println!(
            "{} {}",
            "Threat Report for".cyan().bold(),
            target.yellow().bold()
        );
        println!("{}", separator.cyan());

        println!(
            "\n  {}  {}   {} {}   {} {}",
            "Verdict".bold(),
            Self::status_label(security.status),
            "Score".bold(),
            format!("{:.0}/100", security.score).bright_white(),
            "Detections".bold(),
            Self::detections(security.vendors_flagged, security.total_vendors)
        );

        Self::display_section(
            "[Network]",
            &[
                ("URL", &data.url),
                ("IP", &data.ip),
                ("Reverse DNS", &data.reverse_dns),
                ("ASN", &data.asn),
            ],
        );
        Self::display_section(
            "[Domain]",
            &[
                ("Domain age", &data.domain_age),
                ("Registered", &data.registration_date),
                ("Last analysis", &data.last_analysis),
            ],
        );

        let location = &data.location;
        let coordinates = format!("{:.4}, {:.4}", location.latitude, location.longitude);
        Self::display_section(
            "[Location]",
            &[
                ("City", &location.city),
                ("Region", &location.region),
                ("Country", &location.country),
                ("Coordinates", &coordinates),
            ],
        );

        let pivot = if data.url.is_empty() { target } else { data.url.as_str() };
        println!("\n{}", "[Intelligence Links]".green().bold());
        for (label, link) in Self::intelligence_links(pivot) {
            println!("  {:<14} {}", label, link.cyan().underline());
        }

        if !security.summary.is_empty() {
            println!("\n{}", "[Summary]".green().bold());
            println!("  {}", security.summary);
        }

        if !security.engines.is_empty() {
            println!("\n{}", "[Engines]".green().bold());
            println!("{}", Self::engine_table(&security.engines));
        }

        Self::display_sources(&outcome.sources);

        println!(
            "\n{}",
            format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
        );
        println!("{}\n", separator.cyan());
    }

    pub fn display_failure(target: &str, message: &str) {
        eprintln!(
            "{} {} {}",
            "✗".red().bold(),
            target.yellow(),
            message.red()
        );
    }

    pub fn display_engines() {
        println!("{}", "Simulated scan engines:".cyan().bold());
        for (i, engine) in ENGINE_LIST.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, engine);
        }
    }

    /// One JSON document covering every settled scan.
    pub fn json_report(states: &[ScanState]) -> Value {
        let scans: Vec<Value> = states
            .iter()
            .filter_map(|state| match state {
                ScanState::Result { target, outcome } => {
                    Some(json!({"target": target, "outcome": outcome}))
                }
                ScanState::Error { target, message } => {
                    Some(json!({"target": target, "error": message}))
                }
                ScanState::Idle | ScanState::Loading { .. } => None,
            })
            .collect();
        Value::Array(scans)
    }

    fn display_section(title: &str, rows: &[(&str, &String)]) {
        let width = Self::get_terminal_width();
        let separator = "-".repeat(width.saturating_sub(10).max(15));

        println!("\n{}", title.green().bold());
        println!("{}", separator.dimmed());
        for (label, value) in rows {
            let value = if value.is_empty() {
                "unknown".dimmed()
            } else {
                value.bright_white()
            };
            println!("  {:<14} {}", label, value);
        }
    }

    fn display_sources(sources: &[GroundingSource]) {
        let webs: Vec<_> = sources.iter().filter_map(|s| s.web.as_ref()).collect();
        if webs.is_empty() {
            return;
        }

        println!("\n{}", "[Sources]".green().bold());
        for (i, web) in webs.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                Self::source_title(web).bright_white(),
                web.uri.cyan().underline()
            );
        }
    }

    fn intelligence_links(url: &str) -> [(&'static str, String); 2] {
        [
            ("WHOIS Lookup", format!("https://whois.domaintools.com/{}", url)),
            (
                "Threat Intel",
                format!("https://www.virustotal.com/gui/domain/{}", url),
            ),
        ]
    }

    fn source_title(web: &WebSource) -> &str {
        if web.title.is_empty() {
            SOURCE_TITLE_FALLBACK
        } else {
            &web.title
        }
    }

    fn verdict_color(verdict: EngineVerdict) -> Color {
        match verdict {
            EngineVerdict::Clean => Color::Green,
            EngineVerdict::Detected => Color::Red,
            EngineVerdict::Inconclusive => Color::Yellow,
        }
    }

    fn status_label(status: ThreatStatus) -> ColoredString {
        match status {
            ThreatStatus::Safe => "✓ Clean".green().bold(),
            ThreatStatus::Warning => "Warning".yellow().bold(),
            ThreatStatus::Malicious => "Malicious".red().bold(),
            ThreatStatus::Unknown => "Unknown".dimmed(),
        }
    }

    fn detections(flagged: u32, total: u32) -> ColoredString {
        let text = format!("{}/{}", flagged, total);
        if flagged > 0 {
            text.red().bold()
        } else {
            text.bright_white()
        }
    }

    fn engine_table(engines: &[EngineResult]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Engine").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
            Cell::new("Details").add_attribute(Attribute::Bold),
        ]);

        for engine in engines {
            table.add_row(vec![
                Cell::new(&engine.name),
                Cell::new(&engine.result).fg(Self::verdict_color(engine.verdict())),
                Cell::new(&engine.details),
            ]);
        }

        table.to_string()
    }
}
