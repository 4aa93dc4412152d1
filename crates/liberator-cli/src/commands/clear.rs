use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use liberator_config::{CredentialStore, PathManager};
use std::fs;

pub async fn run_clear(all: bool, credentials: bool, dry_run_output: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    if all {
        clear_credentials(&path_manager, output)?;
        clear_dry_run_output(&path_manager, output)?;
        output.success("Credentials and dry run output cleared");
        return Ok(());
    }

    if credentials {
        clear_credentials(&path_manager, output)?;
    }

    if dry_run_output {
        clear_dry_run_output(&path_manager, output)?;
    }

    if !credentials && !dry_run_output {
        output.warn("No clear option specified. Use --credentials, --dry-run-output, or --all");
        output.println("\nExample: liberator-import clear --credentials");
    }

    Ok(())
}

/// Drop the saved Trakt tokens; other keys in the store are kept
fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();

    if !credentials_file.exists() {
        output.info("No credentials file found to clear");
        return Ok(());
    }

    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    cred_store.clear_trakt_tokens();
    cred_store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success(format!("Cleared Trakt tokens in {}", credentials_file.display()));
    Ok(())
}

fn clear_dry_run_output(path_manager: &PathManager, output: &Output) -> Result<()> {
    let dry_run_dir = path_manager.dry_run_dir();

    if dry_run_dir.exists() {
        fs::remove_dir_all(&dry_run_dir)
            .map_err(|e| eyre!("Failed to remove dry run output at {}: {}", dry_run_dir.display(), e))?;
        output.success(format!("Cleared dry run output: {}", dry_run_dir.display()));
    } else {
        output.info("No dry run output found to clear");
    }

    Ok(())
}
