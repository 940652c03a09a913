use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod browse;
mod client;
mod commands;
mod credentials;
mod render;

use args::{Cli, Commands, ViewArgs};
use commands::Context;
use credentials::CredentialStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        server: cli.server,
        token: cli.token,
        store: CredentialStore::locate()?,
    };

    match cli.command {
        Some(Commands::Login { password }) => commands::handle_login(&ctx, password).await,
        Some(Commands::Logout) => commands::handle_logout(&ctx),
        Some(Commands::List { view }) => commands::handle_list(&ctx, &view).await,
        Some(Commands::Search { term, view }) => commands::handle_search(&ctx, &term, &view).await,
        Some(Commands::Show { id }) => commands::handle_show(&ctx, id).await,
        Some(Commands::Add(add)) => commands::handle_add(&ctx, add).await,
        Some(Commands::Edit { id, changes }) => commands::handle_edit(&ctx, id, changes).await,
        Some(Commands::Delete { id }) => commands::handle_delete(&ctx, id).await,
        Some(Commands::Browse { view }) => commands::handle_browse(&ctx, &view).await,
        None => commands::handle_list(&ctx, &ViewArgs::default()).await,
    }
}

/// Logs go to stderr so they never mix with listings.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
