use core::{convert::Infallible, fmt::Write as _};

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, Drawable, OriginDimensions, Point, Primitive, Size},
    primitives::{PointsIter, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
    Pixel,
};
use heapless::String;

use crate::{
    log::{debug, trace, warn_log},
    CanvasGeometry, ChainTopology, ColorModel, CoordinateMapper, MapError, OutputEngine,
    PhysicalCoordinate, ScanMode,
};

/// A drawing surface spanning every panel on the chain.
///
/// Draw calls are mapped onto the physical chain and forwarded to the [OutputEngine]. Points
/// off the canvas are silently dropped, so shapes that run past the edges are clipped. Whole
/// screen fills skip the mapping entirely.
pub struct VirtualMatrixPanel<E: OutputEngine> {
    engine: E,
    mapper: CoordinateMapper,
    color_model: ColorModel,
}

impl<E: OutputEngine> VirtualMatrixPanel<E> {
    pub fn new(engine: E, geometry: CanvasGeometry, topology: ChainTopology) -> Self {
        debug!(
            "Creating {}x{} virtual panel, topology {:?}",
            geometry.virtual_width(),
            geometry.virtual_height(),
            topology
        );
        Self {
            engine,
            mapper: CoordinateMapper::new(geometry, topology),
            color_model: ColorModel::default(),
        }
    }

    /// Selects how `embedded-graphics` colors are passed to the engine.
    pub fn with_color_model(mut self, color_model: ColorModel) -> Self {
        self.color_model = color_model;
        self
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Gives back the output engine.
    pub fn release(self) -> E {
        self.engine
    }

    /// Width of the canvas as drawing code sees it.
    pub fn width(&self) -> u32 {
        self.mapper.size().width
    }

    /// Height of the canvas as drawing code sees it.
    pub fn height(&self) -> u32 {
        self.mapper.size().height
    }

    /// Rotates the canvas by 90 degrees, or back. Width and height swap.
    pub fn set_rotation(&mut self, rotated: bool) {
        debug!("Setting rotation to {}", rotated);
        self.mapper.set_rotation(rotated);
    }

    /// Sets the electrical scan mode of the physical panels.
    pub fn set_scan_mode(&mut self, scan_mode: ScanMode) {
        debug!("Setting scan mode to {:?}", scan_mode);
        let panel_height = self.mapper.geometry().panel_height();
        if let Some(expected) = scan_mode.expected_panel_height() {
            if expected != panel_height {
                warn_log!(
                    "Scan mode {:?} expects {}px high panels, but panels are {}px high",
                    scan_mode,
                    expected,
                    panel_height
                );
            }
        }
        self.mapper.set_scan_mode(scan_mode);
    }

    /// Maps a canvas point onto the chain. See [CoordinateMapper::map].
    pub fn map(&self, point: Point) -> Result<PhysicalCoordinate, MapError> {
        self.mapper.map(point)
    }

    /// Draws a packed pixel. Off-canvas points are ignored.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u16) {
        if let Some(physical) = self.map_or_skip(x, y) {
            self.engine.draw_pixel(physical.x, physical.y, color);
        }
    }

    /// Draws a pixel from 8-bit channels. Off-canvas points are ignored.
    pub fn draw_pixel_rgb888(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if let Some(physical) = self.map_or_skip(x, y) {
            self.engine.draw_pixel_rgb888(physical.x, physical.y, r, g, b);
        }
    }

    /// Fills every panel. Topology, rotation and scan mode don't affect a full fill.
    pub fn fill_screen(&mut self, color: u16) {
        self.engine.fill_screen(color);
    }

    pub fn fill_screen_rgb888(&mut self, r: u8, g: u8, b: u8) {
        self.engine.fill_screen_rgb888(r, g, b);
    }

    pub fn clear_screen(&mut self) {
        self.engine.clear_screen();
    }

    pub fn color444(&self, r: u8, g: u8, b: u8) -> u16 {
        self.engine.color444(r, g, b)
    }

    pub fn color565(&self, r: u8, g: u8, b: u8) -> u16 {
        self.engine.color565(r, g, b)
    }

    pub fn color333(&self, r: u8, g: u8, b: u8) -> u16 {
        self.engine.color333(r, g, b)
    }

    pub fn flip_buffer(&mut self) {
        self.engine.flip_buffer();
    }

    /// Outlines every physical panel and labels it with its position on the chain.
    ///
    /// This draws straight onto the chain, bypassing the mapping, so it shows how the panels
    /// are really wired. The panel nearest the output engine gets the highest number.
    pub fn draw_display_test(&mut self) -> Result<(), Infallible> {
        debug!("Drawing display test pattern");
        let geometry = *self.mapper.geometry();
        let panel_size = Size::new(geometry.panel_width(), geometry.panel_height());
        let panel_count = geometry.panel_count();
        let outline = PrimitiveStyle::with_stroke(Rgb888::GREEN, 1);
        let text_style = MonoTextStyle::new(&FONT_6X10, Rgb888::YELLOW);

        let mut chain = ChainTarget {
            engine: &mut self.engine,
            size: geometry.chain_size(),
            color_model: self.color_model,
        };
        for panel in 0..panel_count {
            let left = (panel * geometry.panel_width()) as i32;
            Rectangle::new(Point::new(left, 0), panel_size)
                .into_styled(outline)
                .draw(&mut chain)?;

            let mut label: String<10> = String::new();
            if write!(label, "{}", panel_count - panel).is_ok() {
                let baseline = Point::new(left + 2, geometry.panel_height() as i32 - 4);
                Text::with_baseline(&label, baseline, text_style, Baseline::Alphabetic)
                    .draw(&mut chain)?;
            }
        }
        Ok(())
    }

    fn map_or_skip(&self, x: i32, y: i32) -> Option<PhysicalCoordinate> {
        match self.mapper.map(Point::new(x, y)) {
            Ok(physical) => Some(physical),
            Err(_error) => {
                trace!("Skipping pixel: {}", _error);
                None
            }
        }
    }
}

impl<E: OutputEngine> OriginDimensions for VirtualMatrixPanel<E> {
    fn size(&self) -> Size {
        self.mapper.size()
    }
}

impl<E: OutputEngine> DrawTarget for VirtualMatrixPanel<E> {
    type Color = Rgb888;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels.into_iter() {
            // Off-canvas pixels are clipped.
            if let Ok(physical) = self.mapper.map(point) {
                self.color_model
                    .draw_pixel(&mut self.engine, physical.x, physical.y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let bounds = Rectangle::new(Point::zero(), self.mapper.size());
        let drawable_area = bounds.intersection(area);
        if drawable_area == bounds {
            // Whole canvas: let the engine fill its buffer directly.
            self.color_model.fill_screen(&mut self.engine, color);
            return Ok(());
        }
        self.draw_iter(drawable_area.points().map(|point| Pixel(point, color)))
    }
}

/// Draws onto the raw chain, without any mapping.
struct ChainTarget<'a, E: OutputEngine> {
    engine: &'a mut E,
    size: Size,
    color_model: ColorModel,
}

impl<E: OutputEngine> OriginDimensions for ChainTarget<'_, E> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<E: OutputEngine> DrawTarget for ChainTarget<'_, E> {
    type Color = Rgb888;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels.into_iter() {
            if point.x < 0
                || point.y < 0
                || point.x >= self.size.width as i32
                || point.y >= self.size.height as i32
            {
                continue; // Skip out-of-bounds pixels
            }
            self.color_model
                .draw_pixel(&mut *self.engine, point.x as u16, point.y as u16, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{chain_buffer_length, ChainBuffer};
    use crate::color::rgb565;
    use embedded_graphics::primitives::Line;
    use embedded_graphics::geometry::Dimensions;
    use heapless::Vec;

    /// Records every call the panel makes into the engine.
    #[derive(Default)]
    struct RecordingEngine {
        pixels: Vec<(u16, u16, u16), 64>,
        rgb_pixels: Vec<(u16, u16, [u8; 3]), 64>,
        fills: Vec<u16, 8>,
        rgb_fills: Vec<[u8; 3], 8>,
        flips: u32,
    }

    impl OutputEngine for RecordingEngine {
        fn draw_pixel(&mut self, x: u16, y: u16, color: u16) {
            self.pixels.push((x, y, color)).unwrap();
        }

        fn draw_pixel_rgb888(&mut self, x: u16, y: u16, r: u8, g: u8, b: u8) {
            self.rgb_pixels.push((x, y, [r, g, b])).unwrap();
        }

        fn fill_screen(&mut self, color: u16) {
            self.fills.push(color).unwrap();
        }

        fn fill_screen_rgb888(&mut self, r: u8, g: u8, b: u8) {
            self.rgb_fills.push([r, g, b]).unwrap();
        }

        fn flip_buffer(&mut self) {
            self.flips += 1;
        }
    }

    fn recording_panel(topology: ChainTopology) -> VirtualMatrixPanel<RecordingEngine> {
        let geometry = CanvasGeometry::new(64, 32, 2, 2).unwrap();
        VirtualMatrixPanel::new(RecordingEngine::default(), geometry, topology)
    }

    #[test]
    fn test_draw_pixel_forwards_mapped_coordinates() {
        let mut panel = recording_panel(ChainTopology::TopRightDown);
        panel.draw_pixel(0, 0, 0x1234);
        panel.draw_pixel_rgb888(0, 32, 1, 2, 3);
        assert_eq!(panel.engine().pixels.as_slice(), &[(128, 0, 0x1234)]);
        assert_eq!(panel.engine().rgb_pixels.as_slice(), &[(127, 31, [1, 2, 3])]);
    }

    #[test]
    fn test_off_canvas_draws_are_ignored() {
        let mut panel = recording_panel(ChainTopology::TopLeftDown);
        panel.draw_pixel(-1, 0, 0xFFFF);
        panel.draw_pixel(128, 0, 0xFFFF);
        panel.draw_pixel_rgb888(0, 64, 255, 255, 255);
        panel
            .draw_iter([Pixel(Point::new(0, -5), Rgb888::WHITE)])
            .unwrap();
        assert!(panel.engine().pixels.is_empty());
        assert!(panel.engine().rgb_pixels.is_empty());
    }

    #[test]
    fn test_fill_ignores_configuration() {
        let topologies = [
            ChainTopology::TopLeftDown,
            ChainTopology::TopRightDown,
            ChainTopology::BottomLeftUp,
            ChainTopology::BottomRightUp,
        ];
        let scan_modes = [
            ScanMode::TwoScanNormal,
            ScanMode::FourScan32High,
            ScanMode::FourScan16High,
        ];
        for topology in topologies {
            for scan_mode in scan_modes {
                for rotated in [false, true] {
                    let mut panel = recording_panel(topology);
                    panel.set_scan_mode(scan_mode);
                    panel.set_rotation(rotated);

                    panel.fill_screen(0xABCD);
                    panel.fill_screen_rgb888(9, 8, 7);
                    panel.clear_screen();

                    let engine = panel.release();
                    assert_eq!(engine.fills.as_slice(), &[0xABCD, 0]);
                    assert_eq!(engine.rgb_fills.as_slice(), &[[9, 8, 7]]);
                    assert!(engine.pixels.is_empty());
                    assert!(engine.rgb_pixels.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_clear_uses_whole_screen_fill() {
        let mut panel = recording_panel(ChainTopology::BottomRightUp);
        panel.set_rotation(true);
        panel.clear(Rgb888::RED).unwrap();
        assert_eq!(panel.engine().fills.as_slice(), &[0xF800]);
        assert!(panel.engine().pixels.is_empty());
    }

    #[test]
    fn test_partial_fill_goes_through_mapping() {
        let mut panel = recording_panel(ChainTopology::TopRightDown);
        // 2x2 square hanging off the top-left corner: one pixel is on the canvas.
        panel
            .fill_solid(
                &Rectangle::new(Point::new(-1, -1), Size::new(2, 2)),
                Rgb888::BLUE,
            )
            .unwrap();
        assert!(panel.engine().fills.is_empty());
        assert_eq!(panel.engine().pixels.as_slice(), &[(128, 0, 0x001F)]);
    }

    #[test]
    fn test_color_models_route_to_engine() {
        let color = Rgb888::new(200, 100, 50);

        let mut panel = recording_panel(ChainTopology::TopRightDown);
        assert_eq!(panel.color_model(), ColorModel::Rgb565);
        panel.draw_iter([Pixel(Point::zero(), color)]).unwrap();
        assert_eq!(panel.engine().pixels.as_slice(), &[(128, 0, rgb565(200, 100, 50))]);

        let mut panel = recording_panel(ChainTopology::TopRightDown).with_color_model(ColorModel::Rgb333);
        panel.draw_iter([Pixel(Point::zero(), color)]).unwrap();
        assert_eq!(
            panel.engine().pixels.as_slice(),
            &[(128, 0, panel.color333(6, 3, 1))]
        );

        let mut panel = recording_panel(ChainTopology::TopRightDown).with_color_model(ColorModel::Rgb888);
        panel.draw_iter([Pixel(Point::zero(), color)]).unwrap();
        panel.clear(color).unwrap();
        assert!(panel.engine().pixels.is_empty());
        assert_eq!(panel.engine().rgb_pixels.as_slice(), &[(128, 0, [200, 100, 50])]);
        assert_eq!(panel.engine().rgb_fills.as_slice(), &[[200, 100, 50]]);
    }

    #[test]
    fn test_color_conversions_pass_through() {
        let panel = recording_panel(ChainTopology::TopRightDown);
        assert_eq!(panel.color565(255, 0, 0), 0xF800);
        assert_eq!(panel.color444(15, 15, 15), 0xFFFF);
        assert_eq!(panel.color333(0, 0, 7), rgb565(0, 0, 224));
    }

    #[test]
    fn test_rotation_and_scan_mode_configuration() {
        let mut panel = recording_panel(ChainTopology::TopRightDown);
        assert_eq!((panel.width(), panel.height()), (128, 64));
        panel.set_rotation(true);
        assert_eq!((panel.width(), panel.height()), (64, 128));
        assert_eq!(panel.bounding_box().size, Size::new(64, 128));
        panel.set_scan_mode(ScanMode::FourScan32High);
        assert_eq!(panel.mapper().scan_mode(), ScanMode::FourScan32High);
        assert!(panel.mapper().is_rotated());
        panel.flip_buffer();
        assert_eq!(panel.engine().flips, 1);
    }

    #[test]
    fn test_line_across_panels() {
        // Two 32x16 panels side by side.
        const SIZE: Size = Size::new(64, 16);
        let geometry = CanvasGeometry::new(32, 16, 1, 2).unwrap();
        let engine = ChainBuffer::<{ chain_buffer_length(SIZE) }>::new(SIZE);
        let mut panel = VirtualMatrixPanel::new(engine, geometry, ChainTopology::TopRightDown);

        Line::new(Point::new(0, 5), Point::new(100, 5))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
            .draw(&mut panel)
            .unwrap();

        let engine = panel.release();
        for x in 0..64 {
            assert_eq!(engine.pixel(x, 5), Some(0xFFFF));
        }
        assert_eq!(engine.data().iter().filter(|&&pixel| pixel != 0).count(), 64);
    }

    #[test]
    fn test_display_test_outlines_each_panel() {
        const SIZE: Size = Size::new(64, 16);
        const GREEN: u16 = 0x07E0;
        const YELLOW: u16 = 0xFFE0;
        let geometry = CanvasGeometry::new(32, 16, 1, 2).unwrap();
        let engine = ChainBuffer::<{ chain_buffer_length(SIZE) }>::new(SIZE);
        let mut panel = VirtualMatrixPanel::new(engine, geometry, ChainTopology::TopLeftDown);
        panel.set_rotation(true);

        panel.draw_display_test().unwrap();

        let engine = panel.release();
        // Outlines are drawn on the raw chain, regardless of topology or rotation.
        for corner in [(0, 0), (31, 0), (0, 15), (31, 15), (32, 0), (63, 15)] {
            assert_eq!(engine.pixel(corner.0, corner.1), Some(GREEN), "{:?}", corner);
        }
        assert_eq!(engine.pixel(16, 0), Some(GREEN));
        // Each panel carries a label inside its outline.
        for panel_x in [0u16, 32] {
            let labelled = (panel_x + 1..panel_x + 31)
                .flat_map(|x| (1..15).map(move |y| (x, y)))
                .any(|(x, y)| engine.pixel(x, y) == Some(YELLOW));
            assert!(labelled, "panel at x = {} has no label", panel_x);
        }
    }
}
