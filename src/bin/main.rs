// inkypi-status: heartbeat screen for the InkyPi application
//
// Draws a fixed "running" message once and exits. Logs go to stdout and
// to the application log file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use inkypi_display::cli::{DisplayArgs, Target};
use inkypi_display::config::Config;
use inkypi_display::fonts::Font;
use inkypi_display::logging::{self, DEFAULT_LOG_FILE};
use inkypi_display::screens::Screen;

#[derive(Parser, Debug)]
#[command(name = "inkypi-status", version, about = "Show the InkyPi status screen")]
struct Cli {
    /// Log file, in addition to stdout
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    display: DisplayArgs,
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mut target = Target::open(&cli.display, config).context("opening display")?;
    let font = Font::load(&config.font.path, config.font.size);

    let screen = Screen::status().with_align(cli.display.align());
    target
        .render(&screen, &font)
        .context("refreshing display")?;

    info!("Display updated successfully");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.display.config.as_deref());
    let level = match &config {
        Ok(c) => cli.display.log_level(c).to_owned(),
        Err(_) if cli.display.verbose => "debug".to_owned(),
        Err(_) => "info".to_owned(),
    };
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.log.file.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    logging::init(&level, Some(&log_file));

    info!("Starting InkyPi application");
    config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(&cli, &config))
        .inspect_err(|e| error!("Error in main application: {e:#}"))
}
