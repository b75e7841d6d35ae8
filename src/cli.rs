use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::db::DEFAULT_DATABASE_PATH;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(
    name = "wishlist",
    version,
    about = "Keep track of books, movies and series to watch"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "DATABASE",
        value_name = "PATH",
        default_value = DEFAULT_DATABASE_PATH,
        help = "SQLite database file"
    )]
    pub database: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web interface
    Serve(Serve),
    /// Create the database and its table if missing
    Init,
    /// Print every item, highest priority first
    List(List),
}

#[derive(Args, Debug)]
pub struct Serve {
    #[arg(
        long,
        env = "WISHLIST_ADDR",
        value_name = "ADDR",
        default_value = DEFAULT_ADDR,
        help = "Address to listen on"
    )]
    pub addr: String,
}

#[derive(Args, Debug)]
pub struct List {
    #[arg(long, help = "Print items as a JSON array")]
    pub json: bool,
}
