// SSD16xx e-paper driver (board-independent)
// Covers the SSD1608 (Inky pHAT, 250x122) and SSD1683 (Inky wHAT,
// 400x300). Whole-frame updates only: both RAM planes are written,
// the OTP full waveform runs, then the controller goes to deep sleep.
// Waveforms come from controller OTP; no LUT upload.
// The SSD1608 path (0x22 0xF7) is unverified on red/yellow pHAT glass,
// which may ship without a usable OTP tri-colour waveform; those panels
// may need the uploaded LUT and 0xC7 sequence instead.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{debug, warn};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const SPI_FREQ_HZ: u32 = 488_000;

const RESET_TIMEOUT_MS: u64 = 1_000;
const FULL_REFRESH_TIMEOUT_MS: u64 = 45_000;
const BUSY_POLL_MS: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg270,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    Ssd1608,
    Ssd1683,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    #[default]
    White,
    Black,
    Accent,
}

impl Border {
    // follow-LUT bit + LUT index (0 black, 1 white, 2 red)
    const fn waveform(self) -> u8 {
        match self {
            Border::Black => 0x04,
            Border::White => 0x05,
            Border::Accent => 0x06,
        }
    }
}

// SSD16xx commands
pub(crate) mod cmd {
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CONTROL_1: u8 = 0x21;
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_RAM_BW: u8 = 0x24;
    pub const WRITE_RAM_RED: u8 = 0x26;
    pub const WRITE_VCOM: u8 = 0x2C;
    pub const DUMMY_LINE_PERIOD: u8 = 0x3A;
    pub const GATE_LINE_WIDTH: u8 = 0x3B;
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const SET_RAM_X_RANGE: u8 = 0x44;
    pub const SET_RAM_Y_RANGE: u8 = 0x45;
    pub const SET_RAM_X_COUNTER: u8 = 0x4E;
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F;
}

/// Physical RAM layout of a panel. `cols` is a multiple of 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub controller: Controller,
    pub cols: u16,
    pub rows: u16,
    pub rotation: Rotation,
}

impl Geometry {
    pub const fn row_bytes(&self) -> usize {
        (self.cols / 8) as usize
    }

    pub const fn plane_len(&self) -> usize {
        self.row_bytes() * self.rows as usize
    }
}

pub struct DisplayDriver<SPI, DC, RST, BUSY, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: D,
    geometry: Geometry,
    border: Border,
    init_done: bool,
}

impl<SPI, DC, RST, BUSY, D> DisplayDriver<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: D, geometry: Geometry) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            delay,
            geometry,
            border: Border::default(),
            init_done: false,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn set_border(&mut self, border: Border) {
        self.border = border;
    }

    pub fn reset(&mut self) -> Result<()> {
        self.rst.set_low().map_err(Error::pin)?;
        self.delay.delay_ms(500);
        self.rst.set_high().map_err(Error::pin)?;
        self.delay.delay_ms(500);

        self.send_command(cmd::SW_RESET)?;
        self.delay.delay_ms(10);
        self.wait_busy(RESET_TIMEOUT_MS)?;

        self.init_done = false;
        Ok(())
    }

    pub fn init(&mut self) -> Result<()> {
        let last_row = self.geometry.rows - 1;
        let last_col_byte = (self.geometry.row_bytes() - 1) as u8;

        self.send_command(cmd::DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&[(last_row & 0xFF) as u8, (last_row >> 8) as u8, 0x00])?;

        // SSD1683 power-on defaults already match the wHAT glass
        if self.geometry.controller == Controller::Ssd1608 {
            self.send_command(cmd::DUMMY_LINE_PERIOD)?;
            self.send_data(&[0x1B])?;
            self.send_command(cmd::GATE_LINE_WIDTH)?;
            self.send_data(&[0x0B])?;
        }

        // X increment, Y increment
        self.send_command(cmd::DATA_ENTRY_MODE)?;
        self.send_data(&[0x03])?;

        self.send_command(cmd::SET_RAM_X_RANGE)?;
        self.send_data(&[0x00, last_col_byte])?;

        self.send_command(cmd::SET_RAM_Y_RANGE)?;
        self.send_data(&[0x00, 0x00, (last_row & 0xFF) as u8, (last_row >> 8) as u8])?;

        self.send_command(cmd::WRITE_VCOM)?;
        self.send_data(&[0x70])?;

        self.send_command(cmd::BORDER_WAVEFORM)?;
        self.send_data(&[self.border.waveform()])?;

        self.init_done = true;
        Ok(())
    }

    /// Full refresh from packed planes. `accent` is `None` on
    /// black/white glass; RED RAM is then bypassed.
    pub fn update(&mut self, black: &[u8], accent: Option<&[u8]>) -> Result<()> {
        debug_assert_eq!(black.len(), self.geometry.plane_len());

        if !self.init_done {
            self.init()?;
        }

        self.write_plane(cmd::WRITE_RAM_BW, black)?;
        if let Some(accent) = accent {
            debug_assert_eq!(accent.len(), self.geometry.plane_len());
            self.write_plane(cmd::WRITE_RAM_RED, accent)?;
        }

        // RED normal or bypassed as 0, BW normal
        self.send_command(cmd::DISPLAY_UPDATE_CONTROL_1)?;
        self.send_data(&[if accent.is_some() { 0x00 } else { 0x40 }, 0x00])?;

        // load temp + OTP waveform, full display
        self.send_command(cmd::DISPLAY_UPDATE_CONTROL_2)?;
        self.send_data(&[0xF7])?;

        self.send_command(cmd::MASTER_ACTIVATION)?;
        self.delay.delay_ms(50);
        self.wait_busy(FULL_REFRESH_TIMEOUT_MS)
    }

    pub fn sleep(&mut self) -> Result<()> {
        self.send_command(cmd::DEEP_SLEEP)?;
        self.send_data(&[0x01])?;
        self.init_done = false;
        Ok(())
    }

    // ── RAM helpers ─────────────────────────────────────────

    fn write_plane(&mut self, ram_cmd: u8, plane: &[u8]) -> Result<()> {
        self.send_command(cmd::SET_RAM_X_COUNTER)?;
        self.send_data(&[0x00])?;
        self.send_command(cmd::SET_RAM_Y_COUNTER)?;
        self.send_data(&[0x00, 0x00])?;

        self.send_command(ram_cmd)?;
        // spidev caps a single transfer at 4096 bytes by default
        for chunk in plane.chunks(4096) {
            self.send_data(chunk)?;
        }
        Ok(())
    }

    // ── Low-level SPI / busy ────────────────────────────────

    // BUSY high while the controller works; timeout is not fatal
    fn wait_busy(&mut self, timeout_ms: u64) -> Result<()> {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(timeout_ms);
        while self.busy.is_high().map_err(Error::pin)? {
            if Instant::now() >= deadline {
                warn!("[EPD] busy wait timed out after {}ms", timeout_ms);
                return Ok(());
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
        debug!("[EPD] busy cleared after {:?}", start.elapsed());
        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<()> {
        self.dc.set_low().map_err(Error::pin)?;
        self.spi.write(&[cmd]).map_err(Error::spi)?;
        self.dc.set_high().map_err(Error::pin)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<()> {
        self.dc.set_high().map_err(Error::pin)?;
        self.spi.write(data).map_err(Error::spi)
    }
}
