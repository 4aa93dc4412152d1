use super::prompts;
use crate::output::Output;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use liberator_core::{CapacityReport, StepOutcome, SyncObserver, SyncStep};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Terminal side of an import: spinner, limit notice and the Enter prompt
pub struct ImportUi {
    output: Output,
    spinner: Option<ProgressBar>,
    assume_yes: bool,
}

impl ImportUi {
    pub fn new(output: Output, assume_yes: bool) -> Self {
        let spinner = (is_interactive() && output.is_human() && !output.is_quiet()).then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });

        if spinner.is_none() {
            tracing::debug!(mode = "non_interactive", "Progress spinner disabled");
        }

        Self {
            output,
            spinner,
            assume_yes,
        }
    }

    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Print without the spinner drawing over the text
    fn suspended<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match &self.spinner {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }
}

#[async_trait]
impl SyncObserver for ImportUi {
    fn step_started(&self, step: SyncStep, items: usize) {
        let message = match step {
            SyncStep::Profile => "Fetching Trakt account settings...".to_string(),
            SyncStep::History => format!("Importing watch history ({} items), this may take a while...", items),
            _ => format!("Importing {} ({} items)...", step, items),
        };

        match &self.spinner {
            Some(spinner) => spinner.set_message(message),
            None => tracing::info!(step = %step, items, "{}", message),
        }
    }

    fn step_finished(&self, step: SyncStep, outcome: &StepOutcome) {
        let Some(spinner) = &self.spinner else {
            return;
        };
        match outcome {
            StepOutcome::Submitted { items, .. } => {
                spinner.println(format!("{} {} ({} items)", "✓".green(), step, items))
            }
            StepOutcome::Fetched { .. } => spinner.println(format!("{} {}", "✓".green(), step)),
            StepOutcome::Skipped(_) => {}
        }
    }

    fn capacity_exceeded(&self, report: &CapacityReport) {
        let data = json!({
            "type": "watchlist_limit_exceeded",
            "shows": report.shows,
            "movies": report.movies,
            "total": report.total,
            "limit": report.limit,
            "tier": report.tier(),
            "upgrade_hint": report.upgrade_hint(),
        });
        self.suspended(|| self.output.notice(&capacity_notice(report), &data));
    }

    async fn wait_for_acknowledgement(&self, message: &str) -> io::Result<()> {
        if self.assume_yes {
            tracing::info!("Continuing without confirmation (--yes)");
            return Ok(());
        }

        // The prompt reads the terminal, keep it off the runtime threads
        let message = message.to_string();
        let spinner = self.spinner.clone();
        tokio::task::spawn_blocking(move || match spinner {
            Some(spinner) => spinner.suspend(|| prompts::wait_for_enter(&message)),
            None => prompts::wait_for_enter(&message),
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }
}

/// Lines explaining why the watchlist was skipped
fn capacity_notice(report: &CapacityReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("{}", "WATCHLIST IMPORT FAILED".red().bold()),
        "Your watchlist has more items than your Trakt account allows.".to_string(),
        format!("  Shows:  {}", report.shows),
        format!("  Movies: {}", report.movies),
        format!("  Total:  {}", report.total.bold()),
        format!("  Limit:  {} items ({} tier)", report.limit, report.tier()),
    ];
    if let Some(hint) = report.upgrade_hint() {
        lines.push(format!("{}", hint.bright_yellow()));
    }
    lines.push(String::new());
    lines.push("Skipping watchlist import and proceeding with watch history...".to_string());
    lines
}

pub fn is_interactive() -> bool {
    io::stdout().is_terminal() && io::stderr().is_terminal()
}
