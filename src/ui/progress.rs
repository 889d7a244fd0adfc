use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while scans are in flight.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn start(total: usize, hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Querying intelligence core...");
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn complete(&self, target: &str) {
        self.bar.inc(1);
        self.bar.set_message(format!("Finished {}", target));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
