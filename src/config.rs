// Optional TOML configuration
// Every field has a default so a partial file, or no file at all,
// yields a usable wiring for the stock Inky HAT on a Raspberry Pi.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::board::pins;
use crate::display::{Border, DisplayModel, PanelColour, Selection};
use crate::drivers::ssd16xx::SPI_FREQ_HZ;
use crate::error::{Error, Result};
use crate::fonts::{DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/inkypi/display.toml";
pub const CONFIG_ENV: &str = "INKYPI_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub hardware: HardwareConfig,
    pub display: DisplayConfig,
    pub font: FontConfig,
    pub log: LogConfig,
}

// pins are BCM line offsets on `gpio_chip`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareConfig {
    pub spi_device: PathBuf,
    pub spi_hz: u32,
    pub gpio_chip: PathBuf,
    pub i2c_device: PathBuf,
    pub cs_pin: u32,
    pub dc_pin: u32,
    pub reset_pin: u32,
    pub busy_pin: u32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            spi_device: PathBuf::from(pins::SPI_DEVICE),
            spi_hz: SPI_FREQ_HZ,
            gpio_chip: PathBuf::from(pins::GPIO_CHIP),
            i2c_device: PathBuf::from(pins::I2C_DEVICE),
            cs_pin: pins::EPD_CS,
            dc_pin: pins::EPD_DC,
            reset_pin: pins::EPD_RST,
            busy_pin: pins::EPD_BUSY,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(rename = "type")]
    pub model: Option<DisplayModel>,
    pub colour: Option<PanelColour>,
    pub border: Border,
}

impl DisplayConfig {
    /// Manual panel selection, used only when the EEPROM is unreadable.
    /// A type without a colour assumes black.
    pub fn selection(&self) -> Option<Selection> {
        self.model.map(|model| Selection {
            model,
            colour: self.colour.unwrap_or(PanelColour::Black),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub path: PathBuf,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FONT_PATH),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".into(),
        }
    }
}

impl Config {
    /// An explicit `path` must exist and parse; without one the system
    /// file is read if present, else defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!("no config at {}, using defaults", default.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        let config = Self::parse(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> core::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.hardware.spi_hz, 488_000);
        assert_eq!(config.hardware.busy_pin, 17);
        assert_eq!(config.display.border, Border::White);
        assert_eq!(config.font.size, 16);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.display.selection(), None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [hardware]
            dc_pin = 25

            [display]
            type = "phat-ssd1608"
            colour = "red"
            border = "black"

            [log]
            file = "/tmp/eink.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.hardware.dc_pin, 25);
        assert_eq!(config.hardware.reset_pin, 27);
        assert_eq!(config.display.border, Border::Black);
        assert_eq!(
            config.display.selection(),
            Some(Selection {
                model: DisplayModel::PhatSsd1608,
                colour: PanelColour::Red,
            })
        );
        assert_eq!(config.log.file.as_deref(), Some(Path::new("/tmp/eink.log")));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn type_without_colour_assumes_black() {
        let config = Config::parse("[display]\ntype = \"what-ssd1683\"\n").unwrap();
        assert_eq!(
            config.display.selection().map(|s| s.colour),
            Some(PanelColour::Black)
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(Config::parse("[display]\ntype = \"impression\"\n").is_err());
        assert!(Config::parse("[display]\ncolour = \"sevencolour\"\n").is_err());
        assert!(Config::parse("[hardware]\nspi_hz = \"fast\"\n").is_err());
        assert!(Config::parse("[hardware]\nmosi_pin = 10\n").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = Config::load(Some(Path::new("/nonexistent/display.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("display.toml");
        std::fs::write(&path, "[font]\nsize = -1\n").unwrap();

        match Config::load(Some(&path)) {
            Err(Error::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
