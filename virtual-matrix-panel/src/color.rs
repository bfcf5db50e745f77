//! Color packing and the strategy that decides how colors reach the output engine.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::OutputEngine;

/// Packs 8-bit channels into RGB565, keeping the top 5/6/5 bits.
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Packs 4-bit channels (0..=15) into RGB565.
pub const fn rgb444(r: u8, g: u8, b: u8) -> u16 {
    rgb565(
        (r & 0x0F) * 17,
        (g & 0x0F) * 17,
        (b & 0x0F) * 17,
    )
}

/// Packs 3-bit channels (0..=7) into RGB565.
pub const fn rgb333(r: u8, g: u8, b: u8) -> u16 {
    rgb565((r & 0x07) << 5, (g & 0x07) << 5, (b & 0x07) << 5)
}

/// How colors are handed to the output engine. Chosen once, when the panel is created.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorModel {
    /// Pack to 16-bit RGB565 with the engine's `color565`.
    #[default]
    Rgb565,
    /// Reduce to 3 bits per channel with the engine's `color333`. Useful for engines running at
    /// a low color depth.
    Rgb333,
    /// Pass the 8-bit channels straight through to the engine's RGB888 primitives.
    Rgb888,
}

impl ColorModel {
    pub(crate) fn draw_pixel<E: OutputEngine>(self, engine: &mut E, x: u16, y: u16, color: Rgb888) {
        match self {
            ColorModel::Rgb565 => {
                let packed = engine.color565(color.r(), color.g(), color.b());
                engine.draw_pixel(x, y, packed);
            }
            ColorModel::Rgb333 => {
                let packed = engine.color333(color.r() >> 5, color.g() >> 5, color.b() >> 5);
                engine.draw_pixel(x, y, packed);
            }
            ColorModel::Rgb888 => engine.draw_pixel_rgb888(x, y, color.r(), color.g(), color.b()),
        }
    }

    pub(crate) fn fill_screen<E: OutputEngine>(self, engine: &mut E, color: Rgb888) {
        match self {
            ColorModel::Rgb565 => {
                let packed = engine.color565(color.r(), color.g(), color.b());
                engine.fill_screen(packed);
            }
            ColorModel::Rgb333 => {
                let packed = engine.color333(color.r() >> 5, color.g() >> 5, color.b() >> 5);
                engine.fill_screen(packed);
            }
            ColorModel::Rgb888 => engine.fill_screen_rgb888(color.r(), color.g(), color.b()),
        }
    }
}
