// display-hotspot: shows WiFi hotspot credentials and setup steps
//
// Run by the provisioning scripts when the Pi comes up as an access
// point. Two stages, each mapped to exit code 1 on failure:
//   1. open and identify the panel
//   2. compose the screen and refresh the glass

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use log::{error, info};

use inkypi_display::cli::{DisplayArgs, Target};
use inkypi_display::config::Config;
use inkypi_display::fonts::Font;
use inkypi_display::logging;
use inkypi_display::screens::{HotspotCredentials, Screen};

const USAGE: &str = "Usage: display-hotspot <ssid> <password> <ip>";

#[derive(Parser, Debug)]
#[command(name = "display-hotspot", version, about = "Show WiFi hotspot details on the Inky display")]
struct Cli {
    // any string is accepted, including ones starting with '-'
    /// Hotspot network name
    #[arg(allow_hyphen_values = true)]
    ssid: String,
    /// Hotspot passphrase
    #[arg(allow_hyphen_values = true)]
    password: String,
    /// Address of this device on the hotspot network
    #[arg(allow_hyphen_values = true)]
    ip: String,

    #[command(flatten)]
    display: DisplayArgs,
}

fn initialize(cli: &Cli, config: &Config) -> anyhow::Result<(Target, Font)> {
    let target = Target::open(&cli.display, config).context("opening display")?;
    let font = Font::load(&config.font.path, config.font.size);
    Ok((target, font))
}

fn update(target: &mut Target, font: &Font, screen: &Screen) -> anyhow::Result<()> {
    target.render(screen, font).context("refreshing display")
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{}", e.render());
            println!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    let config = Config::load(cli.display.config.as_deref());
    let (level, log_file) = match &config {
        Ok(c) => (cli.display.log_level(c).to_owned(), c.log.file.clone()),
        Err(_) if cli.display.verbose => ("debug".to_owned(), None),
        Err(_) => ("info".to_owned(), None),
    };
    logging::init(&level, log_file.as_deref());

    let staged = config
        .map_err(anyhow::Error::from)
        .and_then(|config| initialize(&cli, &config));
    let (mut target, font) = match staged {
        Ok(ok) => ok,
        Err(e) => {
            error!("Failed to initialize display: {e:#}");
            return ExitCode::from(1);
        }
    };

    let creds = HotspotCredentials {
        ssid: cli.ssid,
        password: cli.password,
        ip: cli.ip,
    };
    let screen = Screen::hotspot(&creds).with_align(cli.display.align());

    if let Err(e) = update(&mut target, &font, &screen) {
        error!("Failed to update display: {e:#}");
        return ExitCode::from(1);
    }

    info!("hotspot screen shown for {}", creds.ssid);
    ExitCode::SUCCESS
}
