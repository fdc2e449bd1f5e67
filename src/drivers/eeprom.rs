// Inky HAT identification EEPROM (24C32 at 0x50 on the HAT's I2C bus).
//
// Block layout, little endian, 29 bytes:
//   0  width            u16
//   2  height           u16
//   4  colour           u8   1 black, 2 red, 3 yellow, 5 seven-colour
//   5  pcb_variant      u8   12 -> "1.2"
//   6  display_variant  u8   index into DISPLAY_VARIANTS
//   7  write_time       pascal string, 22 bytes incl. length

use core::fmt;

use embedded_hal::i2c::I2c;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const EEPROM_ADDRESS: u8 = 0x50;
pub const BLOCK_LEN: usize = 29;

const WRITE_TIME_MAX: usize = 21;

const DISPLAY_VARIANTS: &[Option<&str>] = &[
    None,
    Some("Red pHAT (High-Temp)"),
    Some("Yellow wHAT"),
    Some("Black wHAT"),
    Some("Black pHAT"),
    Some("Yellow pHAT"),
    Some("Red wHAT"),
    Some("Red wHAT (High-Temp)"),
    Some("Red wHAT"),
    None,
    Some("Black pHAT (SSD1608)"),
    Some("Red pHAT (SSD1608)"),
    Some("Yellow pHAT (SSD1608)"),
    None,
    Some("7-Colour (UC8159)"),
    Some("7-Colour 640x400 (UC8159)"),
    Some("7-Colour 640x400 (UC8159)"),
    Some("Black wHAT (SSD1683)"),
    Some("Red wHAT (SSD1683)"),
    Some("Yellow wHAT (SSD1683)"),
    Some("7-Colour 800x480 (AC073TC1A)"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PanelColour {
    Black,
    Red,
    Yellow,
    #[serde(skip)]
    #[value(skip)]
    SevenColour,
}

impl PanelColour {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PanelColour::Black),
            2 => Some(PanelColour::Red),
            3 => Some(PanelColour::Yellow),
            5 => Some(PanelColour::SevenColour),
            _ => None,
        }
    }

    pub fn has_accent(self) -> bool {
        matches!(self, PanelColour::Red | PanelColour::Yellow)
    }
}

impl fmt::Display for PanelColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PanelColour::Black => "black",
            PanelColour::Red => "red",
            PanelColour::Yellow => "yellow",
            PanelColour::SevenColour => "7-colour",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EepromInfo {
    pub width: u16,
    pub height: u16,
    pub colour: PanelColour,
    pub pcb_variant: u8,
    pub display_variant: u8,
    pub write_time: String,
}

impl EepromInfo {
    pub fn parse(block: &[u8]) -> Result<Self> {
        if block.len() < BLOCK_LEN {
            return Err(Error::Eeprom(format!(
                "short read: {} of {} bytes",
                block.len(),
                BLOCK_LEN
            )));
        }

        let width = u16::from_le_bytes([block[0], block[1]]);
        let height = u16::from_le_bytes([block[2], block[3]]);
        if width == 0 || height == 0 || width == 0xFFFF || height == 0xFFFF {
            return Err(Error::Eeprom(format!("bad resolution {width}x{height}")));
        }

        let colour = PanelColour::from_code(block[4])
            .ok_or_else(|| Error::Eeprom(format!("unknown colour code {}", block[4])))?;

        let time_len = (block[7] as usize).min(WRITE_TIME_MAX);
        let write_time = String::from_utf8_lossy(&block[8..8 + time_len]).into_owned();

        Ok(Self {
            width,
            height,
            colour,
            pcb_variant: block[5],
            display_variant: block[6],
            write_time,
        })
    }

    pub fn variant_name(&self) -> Option<&'static str> {
        DISPLAY_VARIANTS
            .get(self.display_variant as usize)
            .copied()
            .flatten()
    }
}

impl fmt::Display for EepromInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {} ({}), PCB v{}.{}, written {}",
            self.width,
            self.height,
            self.colour,
            self.variant_name().unwrap_or("unknown variant"),
            self.pcb_variant / 10,
            self.pcb_variant % 10,
            self.write_time,
        )
    }
}

/// Reads and parses the identification block. Any bus error (no HAT,
/// no pull-ups, wrong bus) comes back as `Error::I2c`.
pub fn read<I: I2c>(i2c: &mut I) -> Result<EepromInfo> {
    let mut block = [0u8; BLOCK_LEN];
    i2c.write_read(EEPROM_ADDRESS, &[0x00, 0x00], &mut block)
        .map_err(Error::i2c)?;
    EepromInfo::parse(&block)
}
