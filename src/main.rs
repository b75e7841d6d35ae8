mod cli;
mod db;
mod entities;
mod error;
mod item;
mod model;
mod notice;
mod util;
mod view;
mod web;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, List};
use crate::db::Store;
use crate::error::AppError;
use crate::item::Item;
use crate::util::format_item_list;
use crate::web::AppState;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), AppError> {
    let Cli { database, command } = Cli::parse();
    let store = Store::new(database);
    store.ensure_schema().await?;

    match command {
        Command::Serve(args) => {
            let state = Arc::new(AppState::new(store));
            web::serve(&args.addr, state).await
        }
        Command::Init => {
            println!("Initialized database at {}", store.path().display());
            Ok(())
        }
        Command::List(args) => handle_list(&store, args).await,
    }
}

async fn handle_list(store: &Store, args: List) -> Result<(), AppError> {
    let items = Item::list_all(store).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        println!("{}", format_item_list(&items));
    }
    Ok(())
}
