use embedded_graphics::prelude::{Point, Size};
use thiserror::Error;

use crate::{CanvasGeometry, ChainTopology, PhysicalCoordinate, ScanMode};

/// Why a point couldn't be mapped onto the chain.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    /// The point lies outside the canvas. Drawing code clips near the edges all the time, so
    /// callers normally just skip the pixel.
    #[error("point ({x}, {y}) is outside the canvas")]
    OutOfRange { x: i32, y: i32 },
}

/// Converts canvas coordinates into positions on the single physical chain.
///
/// The geometry and topology are fixed at construction. Rotation and scan mode can be changed
/// between frames; both setters need `&mut self`, so they can't race an in-flight mapping.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    geometry: CanvasGeometry,
    topology: ChainTopology,
    scan_mode: ScanMode,
    rotated: bool,
}

impl CoordinateMapper {
    /// Creates an unrotated mapper for two-scan panels.
    pub fn new(geometry: CanvasGeometry, topology: ChainTopology) -> Self {
        Self {
            geometry,
            topology,
            scan_mode: ScanMode::default(),
            rotated: false,
        }
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn topology(&self) -> ChainTopology {
        self.topology
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    pub fn set_scan_mode(&mut self, scan_mode: ScanMode) {
        self.scan_mode = scan_mode;
    }

    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Presents the canvas rotated by 90 degrees. No other angles are supported.
    pub fn set_rotation(&mut self, rotated: bool) {
        self.rotated = rotated;
    }

    /// The canvas size as callers see it. Width and height swap while rotated.
    pub fn size(&self) -> Size {
        let size = self.geometry.virtual_size();
        if self.rotated {
            Size::new(size.height, size.width)
        } else {
            size
        }
    }

    /// Maps a canvas point to its physical chain coordinate.
    ///
    /// ```
    /// use embedded_graphics::prelude::Point;
    /// use virtual_matrix_panel::{CanvasGeometry, ChainTopology, CoordinateMapper, PhysicalCoordinate};
    ///
    /// let geometry = CanvasGeometry::new(64, 32, 2, 2).unwrap();
    /// let mapper = CoordinateMapper::new(geometry, ChainTopology::TopRightDown);
    /// assert_eq!(mapper.map(Point::new(0, 0)), Ok(PhysicalCoordinate::new(128, 0)));
    /// assert!(mapper.map(Point::new(128, 0)).is_err());
    /// ```
    pub fn map(&self, point: Point) -> Result<PhysicalCoordinate, MapError> {
        let size = self.size();
        if point.x < 0
            || point.y < 0
            || point.x >= size.width as i32
            || point.y >= size.height as i32
        {
            return Err(MapError::OutOfRange {
                x: point.x,
                y: point.y,
            });
        }

        let (x, y) = if self.rotated {
            (point.y, self.geometry.virtual_height() as i32 - 1 - point.x)
        } else {
            (point.x, point.y)
        };

        let row = y / self.geometry.panel_height() as i32;
        let (chain_x, chain_y) = self.topology.resolve(&self.geometry, x, y, row);
        let (chain_x, chain_y) = self.scan_mode.fold(&self.geometry, chain_x, chain_y, y);

        // CanvasGeometry::new rejects chains whose widest fold exceeds u16.
        Ok(PhysicalCoordinate::new(chain_x as u16, chain_y as u16))
    }
}
