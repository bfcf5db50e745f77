use crate::CanvasGeometry;

/// The panel's electrical scan multiplexing.
///
/// The output engine always drives two scanlines per clock. Four-scan panels interleave four, so
/// their pixels have to be folded into a buffer twice as wide as the panel chain. Folding keys off
/// the canvas row, so the buffer is only half the panel height on a single row of panels; with
/// more rows the folded rows keep counting past it.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Two scanlines per clock (1/8, 1/16 and 1/32 scan panels). No folding is needed.
    #[default]
    TwoScanNormal,
    /// Four-scan panels that are 32 pixels high (sometimes sold as 1/8 scan).
    FourScan32High,
    /// Four-scan panels that are 16 pixels high (sometimes sold as 1/4 scan).
    FourScan16High,
}

impl ScanMode {
    /// Panel height this mode is designed for, if it's specific to one.
    pub fn expected_panel_height(self) -> Option<u32> {
        match self {
            ScanMode::TwoScanNormal => None,
            ScanMode::FourScan32High => Some(32),
            ScanMode::FourScan16High => Some(16),
        }
    }

    /// Folds an unfolded chain position into the buffer layout this mode needs.
    ///
    /// `virtual_y` is the (rotated) canvas row the point came from; the folding keys off that
    /// rather than the row within the panel. The arithmetic matches the output engine's buffer
    /// layout bit for bit, so keep the masks and shifts as they are.
    pub(crate) fn fold(
        self,
        geometry: &CanvasGeometry,
        x: i32,
        y: i32,
        virtual_y: i32,
    ) -> (i32, i32) {
        let panel_width = geometry.panel_width() as i32;
        // Rows 8..16 of every 16-row block land in the first half of the doubled column range.
        let upper_block = virtual_y & 8 == 0;
        match self {
            ScanMode::TwoScanNormal => (x, y),
            ScanMode::FourScan32High => {
                let panel = x / panel_width;
                let x = if upper_block {
                    x + (panel + 1) * panel_width
                } else {
                    x + panel * panel_width
                };
                (x, fold_row(virtual_y))
            }
            ScanMode::FourScan16High => {
                let stride = panel_width >> 2;
                let block = (x & 0xFFF0) >> 4;
                let x = if upper_block {
                    x + stride * (block + 1)
                } else {
                    x + stride * block
                };
                if virtual_y < 32 {
                    (x, fold_row(virtual_y))
                } else {
                    // Second half of the physical buffer.
                    (x + 256, fold_row(virtual_y - 32))
                }
            }
        }
    }
}

/// Eight rows out of every sixteen share a buffer row.
fn fold_row(virtual_y: i32) -> i32 {
    (virtual_y >> 4) * 8 + (virtual_y & 0b111)
}
