//! 24-bit colors and luma-based contrast.
//!
//! Records carry their color as a packed `0xRRGGBB` value; painting converts it
//! to `egui::Color32` at the last moment.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packed 24-bit RGB color (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);

    /// Creates a color from a packed value; bits above 24 are dropped.
    pub const fn new(packed: u32) -> Self {
        Rgb(packed & 0x00FF_FFFF)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Perceptual brightness: `0.2126 R + 0.7152 G + 0.0722 B`.
    pub fn luma(self) -> f32 {
        0.2126 * self.r() as f32 + 0.7152 * self.g() as f32 + 0.0722 * self.b() as f32
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrast(self) -> Rgb {
        if self.luma() < 128.0 {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.r(), c.g(), c.b())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Colors used for everything in the grid that is not a record fill.
#[derive(Debug, Clone)]
pub struct GridColors {
    pub background: Rgb,
    pub text: Rgb,
    pub header_text: Rgb,
    pub scrollbar_track: Color32,
    pub scrollbar_thumb: Color32,
}

impl Default for GridColors {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            text: Rgb::BLACK,
            header_text: Rgb::BLACK,
            scrollbar_track: Color32::from_gray(230),
            scrollbar_thumb: Color32::from_gray(160),
        }
    }
}
