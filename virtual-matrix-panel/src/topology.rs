use crate::CanvasGeometry;

/// How the chain of panels is wired, seen from the front of the finished display.
///
/// Multi-row installations are wired serpentine: the chain runs along one row of panels, then
/// doubles back along the next. The panels on every other row are therefore mounted upside down,
/// so both their column order and their internal row order are reversed relative to the canvas.
///
/// ```text
/// TopRightDown, 2x2 grid:
///
///   +------+------+
///   |  <-  |  <-  |  <- input
///   +------+------+
///   |  ->  |  ->  |  (upside down)
///   +------+------+
/// ```
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainTopology {
    /// The chain starts at the top-left panel and works downwards.
    TopLeftDown,
    /// The chain starts at the top-right panel and works downwards.
    #[default]
    TopRightDown,
    /// The chain starts at the bottom-left panel and works upwards.
    BottomLeftUp,
    /// The chain starts at the bottom-right panel and works upwards.
    BottomRightUp,
}

impl ChainTopology {
    /// Resolves a (rotated, in-bounds) virtual point on panel row `row` to its unfolded position
    /// on the physical chain.
    ///
    /// `row` is the zero-indexed panel row counted from the top of the canvas.
    pub(crate) fn resolve(self, geometry: &CanvasGeometry, x: i32, y: i32, row: i32) -> (i32, i32) {
        let rows = geometry.chain_rows() as i32;
        // Bottom-up chains count rows from the bottom edge instead.
        let (row, upside_down) = match self {
            ChainTopology::TopRightDown => (row, row % 2 == 1),
            ChainTopology::TopLeftDown => (row, row % 2 == 0),
            ChainTopology::BottomLeftUp => {
                let row = rows - row - 1;
                (row, row % 2 == 0)
            }
            ChainTopology::BottomRightUp => {
                let row = rows - row - 1;
                (row, row % 2 == 1)
            }
        };

        let virtual_width = geometry.virtual_width() as i32;
        let panel_height = geometry.panel_height() as i32;
        let panel_y = y % panel_height;
        if upside_down {
            (
                geometry.last_chain_column() as i32 - x - row * virtual_width,
                panel_height - 1 - panel_y,
            )
        } else {
            ((rows - row - 1) * virtual_width + x, panel_y)
        }
    }
}
