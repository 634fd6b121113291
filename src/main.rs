use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use jobtrack_lib::bootstrap::{
    load_config_or_default, platform_app_dirs, resolve_app_dirs, resolve_config_path,
    tracing::init_tracing_subscriber, wire_dependencies,
};
use jobtrack_lib::cli::{execute, Cli};
use jt_core::ids::UserId;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let platform_dirs = platform_app_dirs()?;
    let config_path = resolve_config_path(cli.config.clone(), &platform_dirs);
    let config = load_config_or_default(&config_path)?;
    let app_dirs = resolve_app_dirs(&config, platform_dirs);

    init_tracing_subscriber(Some(&app_dirs.logs_dir()))
        .context("Failed to initialize tracing")?;
    info!(config = %config_path.display(), "Configuration loaded");

    let runtime = wire_dependencies(&config, app_dirs)?;
    if let Some(user) = cli.user {
        runtime.identity.sign_in(UserId::from(user));
    }

    if runtime.coordinator.sync_now().await.is_none() {
        anyhow::bail!("No user signed in: pass --user or set session.user_id in the config");
    }
    if let Some(kind) = runtime.store.last_error() {
        warn!(error_kind = ?kind, "Bookmarks loaded with a local error");
    }

    let output = execute(&runtime.store, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(Err(err)) = runtime.store.flush_mirror().await {
        warn!(error = %err, "Remote mirror did not complete before exit");
    }
    Ok(())
}
