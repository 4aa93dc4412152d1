use super::import_ui::ImportUi;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use liberator_config::{Config, CredentialStore, PathManager};
use liberator_core::{load_export, ExportData, StepOutcome, SyncOrchestrator, SyncReport};
use liberator_trakt::{DryRunClient, RateLimitedClient, TraktApi, TraktClient};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Value clap fills in for a bare `--dry-run`
const DEFAULT_DRY_RUN_DIR: &str = "default";

pub struct ImportOptions {
    pub export_dir: Option<PathBuf>,
    pub dry_run: Option<String>,
    pub assume_vip: bool,
    pub assume_yes: bool,
}

pub async fn run_import(options: ImportOptions, output: &Output) -> Result<()> {
    tracing::debug!("Import command started");

    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let export_dir = config.resolve_export_dir(options.export_dir).ok_or_else(|| {
        eyre!(
            "No export directory given. Pass --export-dir, set {} or run `liberator-import config import --export-dir <DIR>`",
            liberator_config::EXPORT_PATH_ENV
        )
    })?;
    let export = load_export(&export_dir)
        .await
        .wrap_err_with(|| format!("Failed to load export from {}", export_dir.display()))?;

    let watched_episodes: usize = export.shows.iter().map(|show| show.watched_episode_count()).sum();
    output.info(format!(
        "Loaded {} shows ({} watched episodes) and {} movies from {}",
        export.shows.len(),
        watched_episodes,
        export.movies.len(),
        export_dir.display()
    ));

    let interval = config.import.request_interval();
    let ui = Arc::new(ImportUi::new(*output, options.assume_yes));

    let (report, dry_run_dir) = match options.dry_run {
        Some(dir) => {
            let dir = if dir == DEFAULT_DRY_RUN_DIR {
                path_manager.dry_run_dir()
            } else {
                PathBuf::from(dir)
            };
            let backend = DryRunClient::new(dir.clone(), options.assume_vip);
            let report = import_with(backend, interval, &export, ui.clone()).await;
            (report, Some(dir))
        }
        None => {
            config
                .validate()
                .map_err(|e| eyre!("{}. Run `liberator-import config trakt` first", e))?;

            let credentials_file = path_manager.credentials_file();
            let mut cred_store = CredentialStore::new(credentials_file.clone());
            cred_store
                .load()
                .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

            let mut client = TraktClient::new(
                &config.trakt.api_url,
                config.trakt.client_id.clone(),
                config.trakt.client_secret.clone(),
            );
            client
                .authenticate(&mut cred_store)
                .await
                .map_err(|e| eyre!("Trakt authentication failed: {}", e))?;

            (import_with(client, interval, &export, ui.clone()).await, None)
        }
    };
    ui.finish();

    let report = report.wrap_err("Import failed")?;
    print_report(&report, dry_run_dir, output);
    Ok(())
}

async fn import_with<A: TraktApi>(
    backend: A,
    interval: Duration,
    export: &ExportData,
    ui: Arc<ImportUi>,
) -> std::result::Result<SyncReport, liberator_core::SyncError> {
    let client = RateLimitedClient::new(backend, interval);
    tracing::info!(
        backend = client.backend_name(),
        interval_ms = interval.as_millis() as u64,
        "Starting import"
    );

    SyncOrchestrator::new(client).with_observer(ui).sync(export).await
}

fn print_report(report: &SyncReport, dry_run_dir: Option<PathBuf>, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return;
            }

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Step").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Sent").add_attribute(Attribute::Bold),
                Cell::new("Added").add_attribute(Attribute::Bold),
                Cell::new("Existing").add_attribute(Attribute::Bold),
                Cell::new("Not found").add_attribute(Attribute::Bold),
            ]);

            for record in &report.steps {
                let row = match &record.outcome {
                    StepOutcome::Submitted { items, status, response } => {
                        let (added, existing, not_found) = match response {
                            Some(r) => (
                                r.added.total().to_string(),
                                r.existing.total().to_string(),
                                r.not_found.total().to_string(),
                            ),
                            None => ("?".to_string(), "?".to_string(), "?".to_string()),
                        };
                        vec![
                            Cell::new(record.step.label()),
                            Cell::new(status).fg(Color::Green),
                            Cell::new(items),
                            Cell::new(added),
                            Cell::new(existing),
                            Cell::new(not_found),
                        ]
                    }
                    StepOutcome::Fetched { status } => vec![
                        Cell::new(record.step.label()),
                        Cell::new(status).fg(Color::Green),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new("-"),
                    ],
                    StepOutcome::Skipped(capacity) => vec![
                        Cell::new(record.step.label()),
                        Cell::new("skipped").fg(Color::Yellow),
                        Cell::new(capacity.total),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new(format!("limit {}", capacity.limit)),
                    ],
                };
                table.add_row(row);
            }

            println!();
            println!("{}", table);

            if let Some(dir) = dry_run_dir {
                output.info(format!("Dry run: request bodies written to {}", dir.display()));
            }
            let account = report.username.as_deref().unwrap_or("unknown");
            let tier = if report.vip { "VIP".bright_yellow().to_string() } else { "free".to_string() };
            output.success(format!(
                "Import completed for {} ({}) in {:.1}s: {} episodes and {} movies in history",
                account,
                tier,
                report.duration.as_secs_f64(),
                report.episodes,
                report.history_movies
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut value = serde_json::to_value(report).unwrap_or_default();
            if let Some(object) = value.as_object_mut() {
                object.insert("success".to_string(), true.into());
                object.insert("duration_seconds".to_string(), report.duration.as_secs_f64().into());
                if let Some(dir) = dry_run_dir {
                    object.insert("dry_run_dir".to_string(), dir.display().to_string().into());
                }
            }
            output.json(&value);
        }
    }
}
