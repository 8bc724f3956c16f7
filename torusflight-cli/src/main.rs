//! tfly - native viewer and scene tooling for torusflight

mod cli;
mod commands;
mod config;
mod keys;
mod viewer;

use clap::Parser;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            width,
            height,
            seed,
        } => commands::run_cmd::run(config.as_deref(), width, height, seed),
        Command::Config { config } => commands::config_cmd::run(config.as_deref()),
        Command::Scene { config, seed } => commands::scene_cmd::run(config.as_deref(), seed),
        Command::Simulate {
            frames,
            keys,
            config,
        } => commands::simulate_cmd::run(config.as_deref(), frames, &keys),
    }
}
