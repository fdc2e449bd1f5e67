//! Panel abstraction for Inky e-paper HATs
//!
//! [`Inky`] drives real glass through the SSD16xx driver; [`MockPanel`]
//! renders the same image to a PNG file. Both report the panel size so a
//! screen can be composed at exactly the panel resolution.

use core::fmt;
use std::path::PathBuf;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use log::{debug, info, warn};
use serde::Deserialize;

pub use crate::drivers::eeprom::{EepromInfo, PanelColour};
pub use crate::drivers::ssd16xx::Border;

use crate::drivers::eeprom;
use crate::drivers::framebuffer::{Framebuffer, InkyColor};
use crate::drivers::preview;
use crate::drivers::ssd16xx::{Controller, DisplayDriver, Geometry, Rotation};
use crate::error::{Error, Result};

/// Inky models this crate can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum DisplayModel {
    /// Inky pHAT, 250x122, SSD1608
    #[serde(rename = "phat-ssd1608")]
    #[value(name = "phat-ssd1608")]
    PhatSsd1608,
    /// Inky wHAT, 400x300, SSD1683
    #[serde(rename = "what-ssd1683")]
    #[value(name = "what-ssd1683")]
    WhatSsd1683,
}

impl DisplayModel {
    /// Logical (drawing) resolution.
    pub const fn resolution(self) -> (u32, u32) {
        match self {
            DisplayModel::PhatSsd1608 => (250, 122),
            DisplayModel::WhatSsd1683 => (400, 300),
        }
    }

    pub const fn geometry(self) -> Geometry {
        match self {
            // gates run along the long edge; columns padded 122 -> 136
            DisplayModel::PhatSsd1608 => Geometry {
                controller: Controller::Ssd1608,
                cols: 136,
                rows: 250,
                rotation: Rotation::Deg270,
            },
            DisplayModel::WhatSsd1683 => Geometry {
                controller: Controller::Ssd1683,
                cols: 400,
                rows: 300,
                rotation: Rotation::Deg0,
            },
        }
    }

    /// EEPROM `display_variant` -> model. `None` for variants that need
    /// a different controller (legacy pHAT/wHAT, UC8159, AC073TC1A).
    pub const fn from_variant(variant: u8) -> Option<Self> {
        match variant {
            10..=12 => Some(DisplayModel::PhatSsd1608),
            17..=19 => Some(DisplayModel::WhatSsd1683),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DisplayModel::PhatSsd1608 => "phat-ssd1608",
            DisplayModel::WhatSsd1683 => "what-ssd1683",
        }
    }
}

impl fmt::Display for DisplayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Manual display choice, used when the HAT has no readable EEPROM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub model: DisplayModel,
    pub colour: PanelColour,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayInfo {
    pub model: DisplayModel,
    pub colour: PanelColour,
    pub eeprom: Option<EepromInfo>,
}

impl DisplayInfo {
    pub fn from_selection(sel: Selection) -> Self {
        Self {
            model: sel.model,
            colour: sel.colour,
            eeprom: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.model.resolution().0
    }

    pub fn height(&self) -> u32 {
        self.model.resolution().1
    }
}

impl fmt::Display for DisplayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}x{}",
            self.colour,
            self.model,
            self.width(),
            self.height()
        )?;
        match &self.eeprom {
            Some(e) => write!(f, " [EEPROM: {e}]"),
            None => f.write_str(" [manual]"),
        }
    }
}

/// Resolves the attached display from an EEPROM read result.
///
/// A readable EEPROM always wins. Without one, the manual selection is
/// used; with neither, detection fails.
pub fn resolve(eeprom: Result<EepromInfo>, fallback: Option<Selection>) -> Result<DisplayInfo> {
    match eeprom {
        Ok(e) => {
            let name = e.variant_name().unwrap_or("unknown variant");
            let model = DisplayModel::from_variant(e.display_variant)
                .ok_or_else(|| Error::Unsupported(format!("{name} (variant {})", e.display_variant)))?;
            if e.colour == PanelColour::SevenColour {
                return Err(Error::Unsupported(name.to_string()));
            }
            if let Some(sel) = fallback {
                if sel.model != model || sel.colour != e.colour {
                    warn!("EEPROM reports {} {}, ignoring manual {} {}", e.colour, model, sel.colour, sel.model);
                }
            }
            debug!("EEPROM: {}", e);
            Ok(DisplayInfo {
                model,
                colour: e.colour,
                eeprom: Some(e),
            })
        }
        Err(err) => match fallback {
            Some(sel) => {
                warn!("no display EEPROM ({}), using {} {}", err, sel.colour, sel.model);
                Ok(DisplayInfo::from_selection(sel))
            }
            None => {
                debug!("EEPROM read failed: {}", err);
                Err(Error::NotDetected)
            }
        },
    }
}

/// Reads the HAT EEPROM over `i2c` and resolves the display.
pub fn detect<I: I2c>(i2c: &mut I, fallback: Option<Selection>) -> Result<DisplayInfo> {
    resolve(eeprom::read(i2c), fallback)
}

pub trait Panel {
    fn info(&self) -> &DisplayInfo;

    fn width(&self) -> u32 {
        self.info().width()
    }

    fn height(&self) -> u32 {
        self.info().height()
    }

    /// Stages `image` for the next `show`. The image must be exactly
    /// the panel resolution.
    fn set_image(&mut self, image: &Framebuffer) -> Result<()>;

    /// Pushes the staged image to the display.
    fn show(&mut self) -> Result<()>;
}

fn check_size(info: &DisplayInfo, image: &Framebuffer) -> Result<()> {
    if image.width() != info.width() || image.height() != info.height() {
        return Err(Error::ImageSize {
            got_w: image.width(),
            got_h: image.height(),
            want_w: info.width(),
            want_h: info.height(),
        });
    }
    Ok(())
}

// ── Hardware panel ──────────────────────────────────────────────────────

struct Planes {
    black: Vec<u8>,
    accent: Option<Vec<u8>>,
}

pub struct Inky<SPI, DC, RST, BUSY, D> {
    epd: DisplayDriver<SPI, DC, RST, BUSY, D>,
    info: DisplayInfo,
    planes: Option<Planes>,
}

impl<SPI, DC, RST, BUSY, D> Inky<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: D, info: DisplayInfo) -> Self {
        let epd = DisplayDriver::new(spi, dc, rst, busy, delay, info.model.geometry());
        Self {
            epd,
            info,
            planes: None,
        }
    }

    pub fn set_border(&mut self, border: Border) {
        self.epd.set_border(border);
    }
}

impl<SPI, DC, RST, BUSY, D> Panel for Inky<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn info(&self) -> &DisplayInfo {
        &self.info
    }

    fn set_image(&mut self, image: &Framebuffer) -> Result<()> {
        check_size(&self.info, image)?;

        let g = self.epd.geometry();
        let accent = self.info.colour.has_accent();

        // BW RAM: bit set = not black. Accent pixels are white there on
        // tri-colour glass and black on mono glass.
        let black = image.pack_plane(g.rotation, g.cols, g.rows, |c| match c {
            InkyColor::White => true,
            InkyColor::Black => false,
            InkyColor::Accent => accent,
        });
        let accent = accent
            .then(|| image.pack_plane(g.rotation, g.cols, g.rows, |c| c == InkyColor::Accent));

        self.planes = Some(Planes { black, accent });
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let Some(planes) = &self.planes else {
            return Err(Error::NoImage);
        };

        info!("[EPD] full refresh, {}", self.info);
        self.epd.reset()?;
        self.epd.init()?;
        self.epd.update(&planes.black, planes.accent.as_deref())?;
        self.epd.sleep()
    }
}

// ── Mock panel ──────────────────────────────────────────────────────────

/// Stand-in for hardware: `show` writes the staged image to `output`.
pub struct MockPanel {
    info: DisplayInfo,
    output: PathBuf,
    image: Option<Framebuffer>,
}

impl MockPanel {
    pub fn new(info: DisplayInfo, output: impl Into<PathBuf>) -> Self {
        Self {
            info,
            output: output.into(),
            image: None,
        }
    }

    pub fn image(&self) -> Option<&Framebuffer> {
        self.image.as_ref()
    }
}

impl Panel for MockPanel {
    fn info(&self) -> &DisplayInfo {
        &self.info
    }

    fn set_image(&mut self, image: &Framebuffer) -> Result<()> {
        check_size(&self.info, image)?;
        self.image = Some(image.clone());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let image = self.image.as_ref().ok_or(Error::NoImage)?;
        preview::save_png(image, self.info.colour, &self.output)?;
        info!("[EPD] mock {} written to {}", self.info.model, self.output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::drivers::eeprom::tests::{MockEeprom, block};
    use crate::drivers::ssd16xx::cmd;
    use crate::drivers::ssd16xx::tests::{MockBusy, MockDc, MockRst, MockSpi, NoDelay, Wire};

    const RED_WHAT: Selection = Selection {
        model: DisplayModel::WhatSsd1683,
        colour: PanelColour::Red,
    };

    fn mock_inky(info: DisplayInfo) -> (Inky<MockSpi, MockDc, MockRst, MockBusy, NoDelay>, Wire) {
        let wire = Wire::default();
        let inky = Inky::new(
            MockSpi(wire.clone()),
            MockDc(wire.clone()),
            MockRst(wire.clone()),
            MockBusy { high_polls: 0 },
            NoDelay,
            info,
        );
        (inky, wire)
    }

    #[test]
    fn eeprom_wins_over_manual_selection() {
        let mut i2c = MockEeprom(Some(block(250, 122, 3, 12)));
        let info = detect(&mut i2c, Some(RED_WHAT)).unwrap();
        assert_eq!(info.model, DisplayModel::PhatSsd1608);
        assert_eq!(info.colour, PanelColour::Yellow);
        assert!(info.eeprom.is_some());
    }

    #[test]
    fn missing_eeprom_uses_selection_or_fails() {
        let info = detect(&mut MockEeprom(None), Some(RED_WHAT)).unwrap();
        assert_eq!(info, DisplayInfo::from_selection(RED_WHAT));

        let err = detect(&mut MockEeprom(None), None).unwrap_err();
        assert!(matches!(err, Error::NotDetected));
    }

    #[test]
    fn unsupported_variants_are_rejected() {
        let legacy = detect(&mut MockEeprom(Some(block(212, 104, 1, 4))), None);
        assert!(matches!(legacy, Err(Error::Unsupported(_))));

        let uc8159 = detect(&mut MockEeprom(Some(block(600, 448, 5, 14))), None);
        assert!(matches!(uc8159, Err(Error::Unsupported(_))));
    }

    #[test]
    fn panel_reports_model_resolution() {
        let (inky, _) = mock_inky(DisplayInfo::from_selection(RED_WHAT));
        assert_eq!((inky.width(), inky.height()), (400, 300));
    }

    #[test]
    fn set_image_rejects_wrong_size() {
        let (mut inky, _) = mock_inky(DisplayInfo::from_selection(RED_WHAT));
        let err = inky.set_image(&Framebuffer::new(250, 122)).unwrap_err();
        assert!(matches!(
            err,
            Error::ImageSize {
                got_w: 250,
                want_w: 400,
                ..
            }
        ));
    }

    #[test]
    fn show_without_image_fails() {
        let (mut inky, wire) = mock_inky(DisplayInfo::from_selection(RED_WHAT));
        assert!(matches!(inky.show(), Err(Error::NoImage)));
        assert!(wire.commands().is_empty());
    }

    #[test]
    fn show_writes_planes_and_sleeps() {
        let (mut inky, wire) = mock_inky(DisplayInfo::from_selection(RED_WHAT));
        let mut fb = Framebuffer::new(400, 300);
        fb.set_pixel(0, 0, InkyColor::Black);
        fb.set_pixel(1, 0, InkyColor::Accent);

        inky.set_image(&fb).unwrap();
        inky.show().unwrap();

        let bw = wire.data_after(cmd::WRITE_RAM_BW);
        let red = wire.data_after(cmd::WRITE_RAM_RED);
        assert_eq!(bw.len(), 50 * 300);
        // pixel 0 black, pixel 1 accent (white in BW), rest white
        assert_eq!(bw[0], 0x7F);
        assert_eq!(red[0], 0x40);

        let cmds = wire.commands();
        assert_eq!(cmds.first(), Some(&cmd::SW_RESET));
        assert_eq!(cmds.last(), Some(&cmd::DEEP_SLEEP));
    }

    #[test]
    fn mono_glass_draws_accent_black() {
        let mono = Selection {
            model: DisplayModel::WhatSsd1683,
            colour: PanelColour::Black,
        };
        let (mut inky, wire) = mock_inky(DisplayInfo::from_selection(mono));
        let mut fb = Framebuffer::new(400, 300);
        fb.set_pixel(0, 0, InkyColor::Accent);

        inky.set_image(&fb).unwrap();
        inky.show().unwrap();

        assert_eq!(wire.data_after(cmd::WRITE_RAM_BW)[0], 0x7F);
        assert!(!wire.commands().contains(&cmd::WRITE_RAM_RED));
    }

    #[test]
    fn mock_panel_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("screen.png");
        let mut panel = MockPanel::new(DisplayInfo::from_selection(RED_WHAT), &out);

        assert!(matches!(panel.show(), Err(Error::NoImage)));
        panel.set_image(&Framebuffer::new(400, 300)).unwrap();
        panel.show().unwrap();
        assert!(out.exists());
    }
}
