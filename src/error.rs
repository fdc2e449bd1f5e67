// Crate-wide error type.
// Bus failures keep only the embedded-hal error kind so the generic
// driver does not leak its SPI/pin types into the signature.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("SPI write failed: {0:?}")]
    Spi(embedded_hal::spi::ErrorKind),

    #[error("GPIO access failed: {0:?}")]
    Pin(embedded_hal::digital::ErrorKind),

    #[error("EEPROM read failed: {0:?}")]
    I2c(embedded_hal::i2c::ErrorKind),

    #[error("invalid EEPROM contents: {0}")]
    Eeprom(String),

    #[error("no display detected (no EEPROM and no --type given)")]
    NotDetected,

    #[error("unsupported display: {0}")]
    Unsupported(String),

    #[error("image is {got_w}x{got_h} but display is {want_w}x{want_h}")]
    ImageSize {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },

    #[error("show() called before set_image()")]
    NoImage,

    #[error("unusable font file: {0}")]
    Font(&'static str),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(target_os = "linux")]
    #[error("failed to claim GPIO line {line}")]
    Gpio {
        line: u32,
        #[source]
        source: linux_embedded_hal::gpio_cdev::errors::Error,
    },

    #[error("invalid config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write preview image")]
    Preview(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn spi<E: embedded_hal::spi::Error>(e: E) -> Self {
        Error::Spi(e.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(e: E) -> Self {
        Error::Pin(e.kind())
    }

    pub(crate) fn i2c<E: embedded_hal::i2c::Error>(e: E) -> Self {
        Error::I2c(e.kind())
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}
