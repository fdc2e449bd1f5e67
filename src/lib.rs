// Status screens for Pimoroni Inky e-paper HATs on a Raspberry Pi

pub mod board;
pub mod cli;
pub mod config;
pub mod display;
pub mod drivers;
pub mod error;
pub mod fonts;
pub mod logging;
pub mod screens;
pub mod ui;

pub use error::{Error, Result};
