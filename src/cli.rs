// Shared command-line surface of the binaries
// Options that pick the panel and how it is drawn, plus the panel
// handle they open. Target dispatches by enum match, no dyn.

use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::config::{CONFIG_ENV, Config, DisplayConfig};
use crate::display::{DisplayInfo, DisplayModel, MockPanel, Panel, PanelColour, Selection};
use crate::drivers::framebuffer::Framebuffer;
use crate::error::Result;
use crate::fonts::Font;
use crate::screens::{self, Align, Screen};

#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayArgs {
    /// Display type, used when the HAT EEPROM cannot be read
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pub model: Option<DisplayModel>,

    /// Panel colour, used together with --type
    #[arg(long, value_enum)]
    pub colour: Option<PanelColour>,

    /// Text alignment
    #[arg(long, value_enum)]
    pub align: Option<Align>,

    /// Render to a PNG file instead of the display
    #[arg(long, value_name = "PNG")]
    pub mock: Option<PathBuf>,

    /// Configuration file
    #[arg(long, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl DisplayArgs {
    /// Manual selection: command line over config. A colour alone does
    /// not select a panel.
    pub fn selection(&self, config: &Config) -> Option<Selection> {
        DisplayConfig {
            model: self.model.or(config.display.model),
            colour: self.colour.or(config.display.colour),
            border: config.display.border,
        }
        .selection()
    }

    pub fn log_level<'a>(&self, config: &'a Config) -> &'a str {
        if self.verbose { "debug" } else { &config.log.level }
    }

    pub fn align(&self) -> Align {
        self.align.unwrap_or_default()
    }
}

// mock output with no selection at all
const MOCK_DEFAULT: Selection = Selection {
    model: DisplayModel::WhatSsd1683,
    colour: PanelColour::Black,
};

/// The opened panel, hardware or mock.
pub enum Target {
    Mock(MockPanel),
    #[cfg(target_os = "linux")]
    Inky(Box<crate::board::Epd>),
}

impl Target {
    /// Opens the panel `args` asks for and identifies it.
    pub fn open(args: &DisplayArgs, config: &Config) -> Result<Self> {
        let selection = args.selection(config);

        if let Some(path) = &args.mock {
            let info = DisplayInfo::from_selection(selection.unwrap_or(MOCK_DEFAULT));
            info!("mock display: {}", info);
            return Ok(Target::Mock(MockPanel::new(info, path)));
        }

        Self::open_hardware(config, selection)
    }

    #[cfg(target_os = "linux")]
    fn open_hardware(config: &Config, selection: Option<Selection>) -> Result<Self> {
        let mut hw = crate::board::Board::open(&config.hardware)?;
        let info = hw.detect(selection)?;
        info!("display: {}", info);
        Ok(Target::Inky(Box::new(hw.into_panel(info, config.display.border))))
    }

    #[cfg(not(target_os = "linux"))]
    fn open_hardware(_config: &Config, _selection: Option<Selection>) -> Result<Self> {
        Err(crate::error::Error::Unsupported(
            "Inky hardware needs Linux; use --mock".into(),
        ))
    }

    /// Lays out `screen` at the panel resolution and pushes it.
    pub fn render(&mut self, screen: &Screen, font: &Font) -> Result<()> {
        let image = screen.compose(font, self.width(), self.height());
        screens::present(self, &image)
    }
}

impl Panel for Target {
    fn info(&self) -> &DisplayInfo {
        match self {
            Target::Mock(p) => p.info(),
            #[cfg(target_os = "linux")]
            Target::Inky(p) => p.info(),
        }
    }

    fn set_image(&mut self, image: &Framebuffer) -> Result<()> {
        match self {
            Target::Mock(p) => p.set_image(image),
            #[cfg(target_os = "linux")]
            Target::Inky(p) => p.set_image(image),
        }
    }

    fn show(&mut self) -> Result<()> {
        match self {
            Target::Mock(p) => p.show(),
            #[cfg(target_os = "linux")]
            Target::Inky(p) => p.show(),
        }
    }
}
