use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    DirectoryController, DirectoryPage, DirectoryService, MissingDirectoryService,
    RemoteDirectoryService,
};
use storage::{DirectoryCache, SqliteStore};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(about = "Browse the doctor directory from the terminal")]
struct Cli {
    /// Directory server base URL; without one only the cache is shown.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// SQLite database holding the cached snapshot.
    #[arg(long, global = true)]
    cache_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the directory once and print it.
    List(ViewArgs),
    /// Keep the directory live and reprint it on every update.
    Watch(ViewArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Case-insensitive name filter.
    #[arg(long, default_value = "")]
    query: String,
    /// Viewport width in pixels used to pick the layout.
    #[arg(long)]
    width: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings();
    if let Some(url) = cli.server_url {
        settings.server_url = Some(url);
    }
    if let Some(url) = cli.cache_url {
        settings.cache_url = url;
    }

    let cache_url = config::normalize_cache_url(&settings.cache_url);
    let store = SqliteStore::new(&cache_url)
        .await
        .with_context(|| format!("failed to open doctor cache at '{cache_url}'"))?;
    let cache = DirectoryCache::new(Arc::new(store));

    let service: Arc<dyn DirectoryService> = match settings.server_url.as_deref() {
        Some(url) => Arc::new(RemoteDirectoryService::new(url)?),
        None => {
            warn!("no directory server configured; showing cached doctors only");
            Arc::new(MissingDirectoryService)
        }
    };
    let controller = DirectoryController::new(service, cache);

    match cli.command {
        Command::List(args) => {
            let page = page_for(&args, settings.viewport_width);
            list(&controller, &page).await
        }
        Command::Watch(args) => {
            let page = page_for(&args, settings.viewport_width);
            watch(&controller, &page).await
        }
    }
}

fn page_for(args: &ViewArgs, default_width: u32) -> DirectoryPage {
    DirectoryPage::new(args.width.unwrap_or(default_width)).with_query(args.query.clone())
}

async fn list(controller: &Arc<DirectoryController>, page: &DirectoryPage) -> Result<()> {
    controller.activate().await;
    let snapshot = controller.snapshot().await;
    controller.deactivate().await;

    print!("{}", render::render_page(page, &snapshot));
    Ok(())
}

async fn watch(controller: &Arc<DirectoryController>, page: &DirectoryPage) -> Result<()> {
    controller.activate().await;
    let mut events = controller.subscribe_events();
    print!("{}", render::render_page(page, &controller.snapshot().await));

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                info!("interrupted; stopping watch");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    debug!(?event, "directory event");
                    println!();
                    print!("{}", render::render_page(page, &controller.snapshot().await));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "directory events lagged; redrawing");
                    print!("{}", render::render_page(page, &controller.snapshot().await));
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    controller.deactivate().await;
    Ok(())
}
