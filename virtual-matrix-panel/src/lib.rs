//! This crate presents a grid of chained HUB75 LED panels as a single `embedded-graphics` canvas.
//!
//! HUB75 output engines (typically a DMA-driven driver) only know how to drive one long chain of
//! identical panels. Installations, however, usually arrange the panels in a grid, wired
//! serpentine so that every other row of panels is upside down. This crate translates canvas
//! coordinates into positions on that chain.
//!
//! ## Core pieces
//!
//! - [`OutputEngine`]: the interface to the underlying driver. You implement this for the driver
//!   you use (or use [`buffer::ChainBuffer`] when there's no hardware).
//! - [`CoordinateMapper`]: the pure mapping from a canvas point to a [`PhysicalCoordinate`],
//!   taking the [`ChainTopology`], the panel's [`ScanMode`] and an optional 90 degree rotation
//!   into account.
//! - [`VirtualMatrixPanel`]: owns an engine and a mapper, and implements
//!   `embedded_graphics::DrawTarget` so lines, shapes and text can be drawn across all panels.
//!
//! ```
//! use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{Line, PrimitiveStyle}};
//! use virtual_matrix_panel::{
//!     buffer::{chain_buffer_length, ChainBuffer},
//!     CanvasGeometry, ChainTopology, VirtualMatrixPanel,
//! };
//!
//! // Four 64x32 panels in a 2x2 grid form a 256x32 chain.
//! let geometry = CanvasGeometry::new(64, 32, 2, 2).unwrap();
//! const LENGTH: usize = chain_buffer_length(Size::new(256, 32));
//! let engine = ChainBuffer::<LENGTH>::new(geometry.chain_size());
//!
//! let mut panel = VirtualMatrixPanel::new(engine, geometry, ChainTopology::TopRightDown);
//! Line::new(Point::new(0, 0), Point::new(127, 63))
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
//!     .draw(&mut panel)
//!     .unwrap();
//! ```
#![no_std]

pub mod buffer;
pub mod color;

mod geometry;
mod log;
mod mapper;
mod panel;
mod scan;
mod topology;

pub use color::ColorModel;
pub use geometry::{CanvasGeometry, GeometryError, PhysicalCoordinate, MAX_CHAIN_PIXELS};
pub use mapper::{CoordinateMapper, MapError};
pub use panel::VirtualMatrixPanel;
pub use scan::ScanMode;
pub use topology::ChainTopology;

/// The driver that owns the output buffer for the physical chain.
///
/// All coordinates are chain-relative. Implementations should ignore writes outside their own
/// buffer. Colors are packed `u16` values produced by the engine's own conversion helpers.
///
/// ```
/// use virtual_matrix_panel::{color, OutputEngine};
///
/// /// Counts lit pixels on a 64x32 chain.
/// struct Counter {
///     lit: u32,
/// }
///
/// impl OutputEngine for Counter {
///     fn draw_pixel(&mut self, _x: u16, _y: u16, color: u16) {
///         if color != 0 {
///             self.lit += 1;
///         }
///     }
///
///     fn draw_pixel_rgb888(&mut self, x: u16, y: u16, r: u8, g: u8, b: u8) {
///         self.draw_pixel(x, y, color::rgb565(r, g, b));
///     }
///
///     fn fill_screen(&mut self, color: u16) {
///         self.lit = if color == 0 { 0 } else { 64 * 32 };
///     }
///
///     fn fill_screen_rgb888(&mut self, r: u8, g: u8, b: u8) {
///         self.fill_screen(color::rgb565(r, g, b));
///     }
/// }
/// ```
pub trait OutputEngine {
    /// Writes one packed pixel at a chain position.
    fn draw_pixel(&mut self, x: u16, y: u16, color: u16);

    /// Writes one pixel from 8-bit channels at a chain position.
    fn draw_pixel_rgb888(&mut self, x: u16, y: u16, r: u8, g: u8, b: u8);

    /// Fills the whole output buffer.
    fn fill_screen(&mut self, color: u16);

    fn fill_screen_rgb888(&mut self, r: u8, g: u8, b: u8);

    /// Blanks the whole output buffer.
    fn clear_screen(&mut self) {
        self.fill_screen(0);
    }

    fn color565(&self, r: u8, g: u8, b: u8) -> u16 {
        color::rgb565(r, g, b)
    }

    fn color444(&self, r: u8, g: u8, b: u8) -> u16 {
        color::rgb444(r, g, b)
    }

    fn color333(&self, r: u8, g: u8, b: u8) -> u16 {
        color::rgb333(r, g, b)
    }

    /// Swaps the front and back buffers on double-buffered engines. Does nothing by default.
    fn flip_buffer(&mut self) {}
}
