//! badgedex binary entry point.

use badgedex::cli::{
    Cli, Commands, cmd_check, cmd_faq, cmd_guides, cmd_list, cmd_owned, cmd_serve, cmd_show,
    cmd_toggle,
};
use badgedex_core::FilterState;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    tracing::debug!(?config, "starting");

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::List {
            search,
            status,
            category,
            sort,
            json,
        } => {
            let filter = FilterState::new()
                .with_search(search)
                .with_status(status)
                .with_category(category)
                .with_sort(sort);
            cmd_list(&config.store_path, &filter, json, &mut stdout)
        }
        Commands::Show { id, json } => cmd_show(&config.store_path, &id, json, &mut stdout),
        Commands::Toggle { id, json } => cmd_toggle(&config.store_path, &id, json, &mut stdout),
        Commands::Owned { json } => cmd_owned(&config.store_path, json, &mut stdout),
        Commands::Guides { json } => cmd_guides(json, &mut stdout),
        Commands::Faq { json } => cmd_faq(json, &mut stdout),
        Commands::Check { username, json } => {
            cmd_check(&config, &username, json, &mut stdout).await
        }
        Commands::Serve { .. } => cmd_serve(&config).await,
    }
}
