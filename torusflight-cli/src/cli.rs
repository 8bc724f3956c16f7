use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tfly",
    about = "Fly a camera around a spinning torus",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a window and fly the scene
    Run {
        /// TOML scene configuration (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Initial window width in physical pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Initial window height in physical pixels
        #[arg(long, default_value_t = 720)]
        height: u32,
        /// Override the star placement seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the effective configuration as TOML
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a summary of the generated scene
    Scene {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the frame loop without a window and print the final pose
    Simulate {
        /// Number of frames to run
        #[arg(long)]
        frames: u64,
        /// Keys held for the whole run, as DOM key names (`w,a,Shift`, `space`)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
