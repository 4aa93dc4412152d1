use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use liberator_config::{Config, CredentialStore, PathManager, EXPORT_PATH_ENV};
use liberator_trakt::TraktClient;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output).await,
        ConfigCommands::Trakt { client_id, client_secret } => configure_trakt(client_id, client_secret, output).await,
        ConfigCommands::Import { export_dir, request_interval_ms } => {
            configure_import(export_dir, request_interval_ms, output).await
        }
    }
}

fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn save_config(config: &Config, path_manager: &PathManager) -> Result<()> {
    let config_file = path_manager.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

async fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("It will be created when you run 'liberator-import config trakt' or 'liberator-import config import'.");
        return Ok(());
    }

    let config = load_config(&path_manager)?;

    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    let token_expires = cred_store.get_trakt_token_expires();
    let authenticated = cred_store.get_trakt_access_token().is_some();

    let secret = |value: &str| if full { value.to_string() } else { mask_string(value) };
    let export_dir = config
        .import
        .export_dir
        .as_ref()
        .map(|p| p.display().to_string());
    let env_export_dir = std::env::var(EXPORT_PATH_ENV).ok().filter(|v| !v.is_empty());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!("{}", "─".repeat("Configuration".len()).bright_cyan());

            let mut info_table = styled_table();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            println!("{}", info_table);
            println!();

            let mut trakt_table = styled_table();
            trakt_table.set_header(vec![
                Cell::new("Trakt").fg(Color::Cyan).add_attribute(Attribute::Bold),
                Cell::new(""),
            ]);
            trakt_table.add_row(vec![Cell::new("Client ID"), Cell::new(secret(&config.trakt.client_id))]);
            trakt_table.add_row(vec![Cell::new("Client Secret"), Cell::new(secret(&config.trakt.client_secret))]);
            trakt_table.add_row(vec![Cell::new("API URL"), Cell::new(&config.trakt.api_url)]);
            let auth_status = match (authenticated, token_expires) {
                (true, Some(expires)) => format!("{} (expires {})", "✓".green(), expires.to_rfc3339()),
                (true, None) => "✓".green().to_string(),
                (false, _) => "✗".red().to_string(),
            };
            trakt_table.add_row(vec![Cell::new("Authenticated"), Cell::new(auth_status)]);
            println!("{}", trakt_table);
            println!();

            let mut import_table = styled_table();
            import_table.set_header(vec![
                Cell::new("Import").fg(Color::Cyan).add_attribute(Attribute::Bold),
                Cell::new(""),
            ]);
            import_table.add_row(vec![
                Cell::new("Export Directory"),
                Cell::new(export_dir.clone().unwrap_or_else(|| "<not set>".to_string())),
            ]);
            if let Some(env_dir) = &env_export_dir {
                import_table.add_row(vec![Cell::new(EXPORT_PATH_ENV), Cell::new(env_dir)]);
            }
            import_table.add_row(vec![
                Cell::new("Request Interval"),
                Cell::new(format!("{} ms", config.import.request_interval_ms)),
            ]);
            println!("{}", import_table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "trakt": {
                    "client_id": secret(&config.trakt.client_id),
                    "client_secret": secret(&config.trakt.client_secret),
                    "api_url": config.trakt.api_url,
                    "authenticated": authenticated,
                    "token_expires": token_expires.map(|t| t.to_rfc3339()),
                },
                "import": {
                    "export_dir": export_dir,
                    "export_dir_env": env_export_dir,
                    "request_interval_ms": config.import.request_interval_ms,
                },
            }));
        }
    }

    Ok(())
}

async fn configure_trakt(client_id_arg: Option<String>, client_secret_arg: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let mut config = load_config(&path_manager)?;

    print_section_header("Trakt API Setup", output);
    output.println("Follow the instructions to setup your Trakt API application:");
    print_instruction_list(
        &[
            "Login to Trakt and navigate to your API apps page: https://trakt.tv/oauth/applications",
            "Create a new API application named 'liberator-import'",
            "Use 'urn:ietf:wg:oauth:2.0:oob' as the Redirect URI",
        ],
        output,
    );
    output.println("");

    let has_client_id = !config.trakt.client_id.is_empty() && config.trakt.client_id != "YOUR_CLIENT_ID";
    let client_id = match client_id_arg {
        Some(id) => id,
        None => loop {
            let default = has_client_id.then_some(config.trakt.client_id.as_str());
            let input = prompts::prompt_string("Trakt Client ID", default)?;
            match validate_client_id(&input) {
                Ok(()) => break input,
                Err(e) => {
                    output.error(format!("Validation error: {}", e));
                    output.info("You can find your Client ID at: https://trakt.tv/oauth/applications");
                }
            }
        },
    };

    let client_secret = match client_secret_arg {
        Some(secret) => secret,
        None => {
            let is_new = config.trakt.client_secret.is_empty() || config.trakt.client_secret == "YOUR_CLIENT_SECRET";
            prompts::prompt_secret("Trakt Client Secret", is_new)?
        }
    };

    validate_client_id(&client_id).map_err(|e| eyre!("Invalid Client ID: {}", e))?;
    if client_secret.is_empty() {
        return Err(eyre!("Client Secret is required"));
    }

    let credentials_changed = config.trakt.client_id != client_id || config.trakt.client_secret != client_secret;
    config.trakt.client_id = client_id;
    config.trakt.client_secret = client_secret;
    save_config(&config, &path_manager)?;

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    if credentials_changed {
        // Tokens belong to the previous application
        cred_store.clear_trakt_tokens();
    }

    output.println("");
    print_oauth_progress("Starting Trakt OAuth authentication...", output);

    let mut client = TraktClient::new(
        &config.trakt.api_url,
        config.trakt.client_id.clone(),
        config.trakt.client_secret.clone(),
    );
    client
        .authenticate(&mut cred_store)
        .await
        .map_err(|e| eyre!("Trakt OAuth authentication failed: {}", e))?;

    output.println("");
    output.success("Trakt authentication successful!");
    if let Some(expires) = cred_store.get_trakt_token_expires() {
        output.println(format!("  Access token expires at: {}", expires.to_rfc3339().bright_green()));
    }

    Ok(())
}

async fn configure_import(
    export_dir: Option<PathBuf>,
    request_interval_ms: Option<u64>,
    output: &Output,
) -> Result<()> {
    if export_dir.is_none() && request_interval_ms.is_none() {
        output.warn("Nothing to change. Use --export-dir and/or --request-interval-ms");
        output.println("\nExample: liberator-import config import --export-dir ~/tvtime-export");
        return Ok(());
    }

    let path_manager = PathManager::default();
    let mut config = load_config(&path_manager)?;

    if let Some(dir) = export_dir {
        if !dir.is_dir() {
            output.warn(format!("{} does not exist yet", dir.display()));
        }
        output.success(format!("Export directory set to {}", dir.display()));
        config.import.export_dir = Some(dir);
    }

    if let Some(interval) = request_interval_ms {
        if interval < liberator_config::DEFAULT_REQUEST_INTERVAL_MS {
            output.warn(format!(
                "Trakt allows one write per second; {} ms may get requests rejected",
                interval
            ));
        }
        config.import.request_interval_ms = interval;
        output.success(format!("Request interval set to {} ms", interval));
    }

    save_config(&config, &path_manager)
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_CLIENT_ID" || s == "YOUR_CLIENT_SECRET" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

fn validate_client_id(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("Client ID cannot be empty");
    }
    if input.len() < 10 {
        return Err("Client ID seems too short. Please verify it's correct.");
    }
    Ok(())
}

fn print_section_header(title: &str, output: &Output) {
    output.println("");
    output.println(format!("{}", title.bold().bright_cyan()));
    output.println(format!("{}", "─".repeat(title.len()).bright_cyan()));
}

fn print_instruction_list(items: &[&str], output: &Output) {
    for (idx, item) in items.iter().enumerate() {
        output.println(format!("  {}. {}", idx + 1, item));
    }
}

fn print_oauth_progress(message: &str, output: &Output) {
    output.println(format!("{} {}", "→".bright_blue(), message.bright_white()));
}
