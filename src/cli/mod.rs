// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod doctor;
pub mod render;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "miles", about = "AI travel-planning chat assistant", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Print the flight dashboard as plain text instead of the TUI view
    #[arg(long)]
    pub no_tui: bool,

    /// Skip the geolocation lookup even when enabled in config
    #[arg(long)]
    pub no_location: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Check backend connectivity
    Doctor,
    /// Resolve and print the client context as JSON
    Context,
}
