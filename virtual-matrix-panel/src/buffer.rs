use embedded_graphics::prelude::Size;

use crate::{color::rgb565, log::debug_assert, OutputEngine};

/// An in-memory output engine holding one RGB565 value per pixel of the physical chain.
///
/// This is handy on hosts without panel hardware, and for checking what a mapping produces.
/// Writes outside the buffer are ignored, like a real engine would.
pub struct ChainBuffer<const L: usize> {
    size: Size,
    data: [u16; L],
    flips: u32,
}

/// Computes the buffer length needed for a chain of the given dimensions.
///
/// For four-scan panels, pass the folded size (twice as wide, half as tall).
pub const fn chain_buffer_length(size: Size) -> usize {
    size.width as usize * size.height as usize
}

impl<const L: usize> ChainBuffer<L> {
    /// Creates a new [ChainBuffer] with every pixel off.
    ///
    /// The dimensions must match the buffer length `L`.
    ///
    /// ```
    /// use embedded_graphics::prelude::Size;
    /// use virtual_matrix_panel::buffer::{chain_buffer_length, ChainBuffer};
    ///
    /// const SIZE: Size = Size::new(128, 32);
    /// let buffer = ChainBuffer::<{ chain_buffer_length(SIZE) }>::new(SIZE);
    /// assert_eq!(buffer.pixel(0, 0), Some(0));
    /// ```
    pub fn new(size: Size) -> Self {
        debug_assert!(
            chain_buffer_length(size) == L,
            "Size must match the buffer length"
        );
        Self {
            size,
            data: [0; L],
            flips: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Access the raw pixel data, row by row.
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Reads back one pixel, or `None` if it's outside the buffer.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        self.index(x, y).map(|index| self.data[index])
    }

    /// Number of times [OutputEngine::flip_buffer] has been called.
    pub fn flips(&self) -> u32 {
        self.flips
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        let index = y as usize * self.size.width as usize + x as usize;
        (index < L).then_some(index)
    }
}

impl<const L: usize> OutputEngine for ChainBuffer<L> {
    fn draw_pixel(&mut self, x: u16, y: u16, color: u16) {
        if let Some(index) = self.index(x, y) {
            self.data[index] = color;
        }
    }

    fn draw_pixel_rgb888(&mut self, x: u16, y: u16, r: u8, g: u8, b: u8) {
        self.draw_pixel(x, y, rgb565(r, g, b));
    }

    fn fill_screen(&mut self, color: u16) {
        self.data.fill(color);
    }

    fn fill_screen_rgb888(&mut self, r: u8, g: u8, b: u8) {
        self.fill_screen(rgb565(r, g, b));
    }

    fn flip_buffer(&mut self) {
        self.flips += 1;
    }
}
