//! Launcher for the What Lurks Within terminal visual novel.

mod chapters;
mod commands;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use wl_tui::Start;

use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "wl",
    about = "What Lurks Within, a terminal visual novel",
    version,
    propagate_version = true
)]
struct Cli {
    /// Save file (default: save.json in the data directory)
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    /// Engine config file (default: config.json in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixed seed for battle randomness
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Seconds per revealed character
    #[arg(long, global = true)]
    text_speed: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the title screen (the default)
    Play,

    /// Start a new game without the title screen
    New,

    /// Resume from the save file without the title screen
    Continue,

    /// List the bundled chapters and their sections
    Chapters,

    /// Inspect a save file
    Save {
        /// Save file to read (default: the --save path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let settings = Settings::new(cli.save, cli.config, cli.seed, cli.text_speed);

    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => commands::play::run(&settings, Start::Menu),
        Commands::New => commands::play::run(&settings, Start::NewGame),
        Commands::Continue => commands::play::run(&settings, Start::Continue),
        Commands::Chapters => commands::chapters::run(),
        Commands::Save { path } => settings
            .save_path(path)
            .and_then(|path| commands::save::run(&path)),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
