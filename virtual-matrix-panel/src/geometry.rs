use embedded_graphics::prelude::Size;
use thiserror::Error;

use crate::ScanMode;

/// The largest chain width (and virtual canvas height) accepted by [CanvasGeometry::new].
///
/// Four-scan folding can still push wide panels past the engine's 16-bit address space, so
/// [CanvasGeometry::new] also checks the widest folded column separately.
pub const MAX_CHAIN_PIXELS: u32 = 8192;

/// Reasons a [CanvasGeometry] can't be built.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A panel dimension or the chain grid has a zero-sized side.
    #[error("panel size and chain grid must be non-zero")]
    ZeroDimension,
    /// The physical chain or the virtual canvas would exceed [MAX_CHAIN_PIXELS].
    #[error("chain of {pixels} pixels exceeds the supported maximum")]
    TooLarge { pixels: u32 },
    /// A four-scan fold of the last chain column wouldn't fit a 16-bit engine coordinate.
    #[error("four-scan folding reaches column {column}, beyond the 16-bit address space")]
    FoldOverflow { column: u32 },
}

/// Describes a grid of identical panels and the single physical chain they form.
///
/// The panels are arranged `chain_rows` high and `chain_cols` wide in front of the viewer, but
/// the output engine sees them as one strip, `panel_width * chain_rows * chain_cols` pixels wide
/// and `panel_height` pixels tall.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    panel_width: u16,
    panel_height: u16,
    chain_rows: u16,
    chain_cols: u16,
}

impl CanvasGeometry {
    /// Validates and creates a new geometry.
    ///
    /// ```
    /// use virtual_matrix_panel::CanvasGeometry;
    ///
    /// // Four 64x32 panels in a 2x2 grid.
    /// let geometry = CanvasGeometry::new(64, 32, 2, 2).unwrap();
    /// assert_eq!(geometry.virtual_width(), 128);
    /// assert_eq!(geometry.virtual_height(), 64);
    /// assert_eq!(geometry.chain_width(), 256);
    /// ```
    pub fn new(
        panel_width: u16,
        panel_height: u16,
        chain_rows: u16,
        chain_cols: u16,
    ) -> Result<Self, GeometryError> {
        if panel_width == 0 || panel_height == 0 || chain_rows == 0 || chain_cols == 0 {
            return Err(GeometryError::ZeroDimension);
        }

        let geometry = Self {
            panel_width,
            panel_height,
            chain_rows,
            chain_cols,
        };
        let pixels = geometry.chain_width().max(geometry.virtual_height());
        if pixels > MAX_CHAIN_PIXELS {
            return Err(GeometryError::TooLarge { pixels });
        }
        let column = geometry.widest_folded_column();
        if column > u16::MAX as u32 {
            return Err(GeometryError::FoldOverflow { column });
        }
        Ok(geometry)
    }

    /// The largest physical column any scan mode can produce for this chain.
    ///
    /// Folding grows with the column, so the last chain column is the worst case. Virtual rows 0
    /// and 32 take the wider branch of each fold, and row 32 adds the lower half-buffer offset.
    pub fn widest_folded_column(&self) -> u32 {
        let last = self.last_chain_column() as i32;
        [
            ScanMode::TwoScanNormal,
            ScanMode::FourScan32High,
            ScanMode::FourScan16High,
        ]
        .into_iter()
        .flat_map(|mode| [0, 32].map(|virtual_y| mode.fold(self, last, 0, virtual_y).0))
        .max()
        .unwrap_or(last) as u32
    }

    pub fn panel_width(&self) -> u32 {
        self.panel_width as u32
    }

    pub fn panel_height(&self) -> u32 {
        self.panel_height as u32
    }

    /// Number of panel rows in the grid.
    pub fn chain_rows(&self) -> u32 {
        self.chain_rows as u32
    }

    /// Number of panel columns in the grid.
    pub fn chain_cols(&self) -> u32 {
        self.chain_cols as u32
    }

    /// Total number of panels on the chain.
    pub fn panel_count(&self) -> u32 {
        self.chain_rows() * self.chain_cols()
    }

    /// Width of the logical canvas, before any rotation.
    pub fn virtual_width(&self) -> u32 {
        self.chain_cols() * self.panel_width()
    }

    /// Height of the logical canvas, before any rotation.
    pub fn virtual_height(&self) -> u32 {
        self.chain_rows() * self.panel_height()
    }

    /// Width of the physical chain as the output engine sees it. This is an exclusive bound.
    pub fn chain_width(&self) -> u32 {
        self.panel_width() * self.panel_count()
    }

    /// Index of the final column on the physical chain, i.e. `chain_width() - 1`.
    ///
    /// Reversed panel rows count back from this column.
    pub fn last_chain_column(&self) -> u32 {
        self.chain_width() - 1
    }

    /// Size of the logical canvas, before any rotation.
    pub fn virtual_size(&self) -> Size {
        Size::new(self.virtual_width(), self.virtual_height())
    }

    /// Size of the unfolded physical chain.
    pub fn chain_size(&self) -> Size {
        Size::new(self.chain_width(), self.panel_height())
    }
}

/// A chain-relative pixel address, ready to hand to the output engine.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalCoordinate {
    pub x: u16,
    pub y: u16,
}

impl PhysicalCoordinate {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}
