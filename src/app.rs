use crate::{
    cli::args::{Cli, Command},
    config::ConfigLoader,
    core::ScanState,
    display::TerminalDisplay,
    scanner::ThreatAnalyzer,
    ui::ScanProgress,
    utils::logging,
};
use anyhow::Result;
use futures::future::join_all;

pub async fn run(cli: Cli) -> Result<()> {
    // Config first, the log level may come from it
    let config = ConfigLoader::load_with_custom_path(cli.config.as_deref())?;
    let level = logging::level_from_cli(&cli, &config.logging);
    logging::init(level)?;

    match cli.command {
        Command::Engines => {
            TerminalDisplay::display_engines();
            Ok(())
        }
        Command::Scan { urls, json } => {
            tracing::info!(
                "Scanning {} target(s) with model {}",
                urls.len(),
                config.gemini.model
            );

            let analyzer = ThreatAnalyzer::from_config(&config);
            let progress = ScanProgress::start(urls.len(), json);

            let scans = urls.iter().map(|url| {
                let analyzer = analyzer.clone();
                let progress = &progress;
                async move {
                    let mut state = ScanState::default();
                    state.begin(url);
                    state.settle(analyzer.analyze_url(url).await);
                    progress.complete(url);
                    state
                }
            });
            let states = join_all(scans).await;
            progress.finish();

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&TerminalDisplay::json_report(&states))?
                );
            } else {
                states.iter().for_each(TerminalDisplay::display_state);
            }

            let failed = states.iter().filter(|s| s.is_failed()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} scans failed", failed, states.len());
            }
            Ok(())
        }
    }
}
