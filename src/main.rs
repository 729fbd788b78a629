use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use growstat::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    study_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    HealthyGain {
        #[arg(long)]
        chick: Option<u32>,
    },

    Growth,

    Summarize,

    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.study_dir).context("failed to construct mgr")?;

    match args.command {
        Command::HealthyGain { chick } => mgr.healthy_gain(chick)?,
        Command::Growth => mgr.growth()?,
        Command::Summarize => mgr.summarize()?,
        Command::Clean => mgr.clean()?,
    }

    Ok(())
}
