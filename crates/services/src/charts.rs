//! Chart collaborator contract, the per-session chart board and a raster renderer.

use std::f64::consts::TAU;
use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgb as Pixel, RgbImage};
use thiserror::Error;
use tracing::{debug, warn};

use quiz_core::chart::{ChartKind, ChartSpec, Rgb};

use crate::error::ReportError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("chart was disposed")]
    Disposed,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// PNG snapshot of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterImage {
    #[must_use]
    pub fn from_png(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }

    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `data:` URL for embedding in markup.
    #[must_use]
    pub fn data_url(&self) -> String {
        let encoded =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.png);
        format!("data:image/png;base64,{encoded}")
    }
}

/// A live chart. Must be disposed before a replacement is created.
pub trait ChartHandle: Send + Sync {
    fn kind(&self) -> ChartKind;

    /// Rasterize the current render state.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::Disposed` after `dispose`, or an encoding error.
    fn to_image(&self) -> Result<RasterImage, ChartError>;

    fn dispose(&mut self);
}

pub trait ChartRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns `ChartError` if the chart cannot be created.
    fn create(&self, spec: &ChartSpec) -> Result<Box<dyn ChartHandle>, ChartError>;
}

/// The donut and bar charts of one session view.
///
/// Installing new charts disposes the previous ones first; dropping the board
/// disposes whatever is still live.
pub struct ChartBoard {
    renderer: Option<Arc<dyn ChartRenderer>>,
    donut: Option<Box<dyn ChartHandle>>,
    bar: Option<Box<dyn ChartHandle>>,
}

impl ChartBoard {
    #[must_use]
    pub fn new(renderer: Option<Arc<dyn ChartRenderer>>) -> Self {
        Self {
            renderer,
            donut: None,
            bar: None,
        }
    }

    /// Replace both charts with fresh ones for `specs`.
    pub fn install(&mut self, specs: &[ChartSpec]) {
        for spec in specs {
            let slot = self.slot_mut(spec.kind);
            if let Some(mut previous) = slot.take() {
                previous.dispose();
            }
            let Some(renderer) = self.renderer.clone() else {
                warn!(kind = ?spec.kind, "no chart renderer configured");
                continue;
            };
            match renderer.create(spec) {
                Ok(handle) => *self.slot_mut(spec.kind) = Some(handle),
                Err(err) => warn!(kind = ?spec.kind, error = %err, "chart creation failed"),
            }
        }
        debug!(donut = self.donut.is_some(), bar = self.bar.is_some(), "charts installed");
    }

    pub fn dispose_all(&mut self) {
        for slot in [&mut self.donut, &mut self.bar] {
            if let Some(mut handle) = slot.take() {
                handle.dispose();
            }
        }
    }

    #[must_use]
    pub fn has(&self, kind: ChartKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Rasterize one chart on demand.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::RenderingUnavailable` if the chart is missing or
    /// cannot be rasterized.
    pub fn image(&self, kind: ChartKind) -> Result<RasterImage, ReportError> {
        let name = chart_name(kind);
        let handle = self
            .slot(kind)
            .ok_or(ReportError::RenderingUnavailable(name))?;
        handle.to_image().map_err(|err| {
            warn!(kind = ?kind, error = %err, "chart rasterization failed");
            ReportError::RenderingUnavailable(name)
        })
    }

    fn slot(&self, kind: ChartKind) -> Option<&dyn ChartHandle> {
        match kind {
            ChartKind::Proportional => self.donut.as_deref(),
            ChartKind::Magnitude => self.bar.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: ChartKind) -> &mut Option<Box<dyn ChartHandle>> {
        match kind {
            ChartKind::Proportional => &mut self.donut,
            ChartKind::Magnitude => &mut self.bar,
        }
    }
}

impl Drop for ChartBoard {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

fn chart_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Proportional => "donut chart",
        ChartKind::Magnitude => "bar chart",
    }
}

//
// ─── RASTER RENDERER ───────────────────────────────────────────────────────────
//

const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 400;
const LEGEND_HEIGHT: u32 = 48;
const DONUT_CUTOUT: f64 = 0.72;
const AXIS: Pixel<u8> = Pixel([0xcb, 0xd5, 0xe1]);
const EMPTY_RING: Pixel<u8> = Pixel([0xe5, 0xe7, 0xeb]);

/// Draws charts straight into an RGB buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterChartRenderer;

impl ChartRenderer for RasterChartRenderer {
    fn create(&self, spec: &ChartSpec) -> Result<Box<dyn ChartHandle>, ChartError> {
        Ok(Box::new(RasterChart {
            spec: *spec,
            disposed: false,
        }))
    }
}

struct RasterChart {
    spec: ChartSpec,
    disposed: bool,
}

impl ChartHandle for RasterChart {
    fn kind(&self) -> ChartKind {
        self.spec.kind
    }

    fn to_image(&self) -> Result<RasterImage, ChartError> {
        if self.disposed {
            return Err(ChartError::Disposed);
        }
        let canvas = match self.spec.kind {
            ChartKind::Proportional => draw_donut(&self.spec),
            ChartKind::Magnitude => draw_bars(&self.spec),
        };
        let mut png = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(RasterImage::from_png(png, canvas.width(), canvas.height()))
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel(color.to_array())
}

fn blank_canvas(spec: &ChartSpec) -> RgbImage {
    RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, pixel(spec.style.background))
}

fn fill_rect(canvas: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Pixel<u8>) {
    for y in y0..y1.min(canvas.height()) {
        for x in x0..x1.min(canvas.width()) {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Colour swatches centred under the plot, one per series.
fn draw_legend(canvas: &mut RgbImage, spec: &ChartSpec) {
    let swatch = 20;
    let gap = 60;
    let top = CHART_HEIGHT - LEGEND_HEIGHT + (LEGEND_HEIGHT - swatch) / 2;
    let total_width = swatch * 2 + gap;
    let left = (CHART_WIDTH - total_width) / 2;
    for (i, color) in spec.style.series.iter().enumerate() {
        let x = left + (swatch + gap) * i as u32;
        fill_rect(canvas, x, top, x + swatch, top + swatch, pixel(*color));
    }
}

fn draw_donut(spec: &ChartSpec) -> RgbImage {
    let mut canvas = blank_canvas(spec);
    let plot_height = CHART_HEIGHT - LEGEND_HEIGHT;
    let cx = f64::from(CHART_WIDTH) / 2.0;
    let cy = f64::from(plot_height) / 2.0;
    let outer = f64::from(plot_height.min(CHART_WIDTH)) / 2.0 - 12.0;
    let inner = outer * DONUT_CUTOUT;

    let [correct, _] = spec.dataset.values();
    let total = spec.dataset.total();
    let split = if total == 0 {
        None
    } else {
        Some(f64::from(correct) / f64::from(total) * TAU)
    };

    for y in 0..plot_height {
        for x in 0..CHART_WIDTH {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let radius = dx.hypot(dy);
            if radius < inner || radius > outer {
                continue;
            }
            // Clockwise from 12 o'clock.
            let angle = dx.atan2(-dy).rem_euclid(TAU);
            let color = match split {
                None => EMPTY_RING,
                Some(split) if angle < split => pixel(spec.style.series[0]),
                Some(_) => pixel(spec.style.series[1]),
            };
            canvas.put_pixel(x, y, color);
        }
    }

    draw_legend(&mut canvas, spec);
    canvas
}

fn draw_bars(spec: &ChartSpec) -> RgbImage {
    let mut canvas = blank_canvas(spec);
    let margin = 32;
    let baseline = CHART_HEIGHT - LEGEND_HEIGHT;
    let plot_top = margin;
    let plot_height = baseline - plot_top;
    let values = spec.dataset.values();
    let max = values.iter().copied().max().unwrap_or(0).max(1);

    // One gridline per unit, as long as they stay readable.
    if max <= 20 {
        for step in 1..=max {
            let y = baseline - plot_height * step / max;
            fill_rect(&mut canvas, margin, y, CHART_WIDTH - margin, y + 1, AXIS);
        }
    }
    fill_rect(&mut canvas, margin, baseline, CHART_WIDTH - margin, baseline + 2, AXIS);

    let slot_width = (CHART_WIDTH - margin * 2) / 2;
    let bar_width = slot_width * 36 / 100;
    for (i, value) in values.iter().enumerate() {
        let height = plot_height * value / max;
        let x0 = margin + slot_width * i as u32 + (slot_width - bar_width) / 2;
        fill_rect(
            &mut canvas,
            x0,
            baseline - height,
            x0 + bar_width,
            baseline,
            pixel(spec.style.series[i]),
        );
    }

    draw_legend(&mut canvas, spec);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::chart::ChartDataset;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRenderer {
        live: Arc<AtomicUsize>,
        created: AtomicUsize,
    }

    struct CountingHandle {
        kind: ChartKind,
        live: Arc<AtomicUsize>,
        disposed: bool,
    }

    impl ChartHandle for CountingHandle {
        fn kind(&self) -> ChartKind {
            self.kind
        }

        fn to_image(&self) -> Result<RasterImage, ChartError> {
            Ok(RasterImage::from_png(vec![1, 2, 3], 1, 1))
        }

        fn dispose(&mut self) {
            if !self.disposed {
                self.disposed = true;
                self.live.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    impl ChartRenderer for CountingRenderer {
        fn create(&self, spec: &ChartSpec) -> Result<Box<dyn ChartHandle>, ChartError> {
            // A replacement must never coexist with its predecessor.
            assert!(self.live.load(Ordering::SeqCst) < 2);
            self.live.fetch_add(1, Ordering::SeqCst);
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingHandle {
                kind: spec.kind,
                live: Arc::clone(&self.live),
                disposed: false,
            }))
        }
    }

    fn specs(correct: u32, wrong: u32) -> [ChartSpec; 2] {
        let dataset = ChartDataset::new(correct, wrong);
        [
            ChartSpec::new(dataset, ChartKind::Proportional),
            ChartSpec::new(dataset, ChartKind::Magnitude),
        ]
    }

    #[test]
    fn reinstalling_disposes_previous_charts() {
        let renderer = Arc::new(CountingRenderer::default());
        let mut board = ChartBoard::new(Some(renderer.clone()));

        for round in 0..5 {
            board.install(&specs(round, 10 - round));
            assert_eq!(renderer.live.load(Ordering::SeqCst), 2);
        }
        assert_eq!(renderer.created.load(Ordering::SeqCst), 10);

        drop(board);
        assert_eq!(renderer.live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_renderer_reports_unavailable() {
        let mut board = ChartBoard::new(None);
        board.install(&specs(1, 1));
        assert!(!board.has(ChartKind::Proportional));
        assert!(matches!(
            board.image(ChartKind::Magnitude),
            Err(ReportError::RenderingUnavailable("bar chart"))
        ));
    }

    #[test]
    fn raster_renderer_produces_png() {
        let mut board = ChartBoard::new(Some(Arc::new(RasterChartRenderer)));
        board.install(&specs(7, 3));

        for kind in [ChartKind::Proportional, ChartKind::Magnitude] {
            let image = board.image(kind).unwrap();
            assert_eq!(image.width(), CHART_WIDTH);
            assert!(image.png().starts_with(&[0x89, b'P', b'N', b'G']));
            assert!(image.data_url().starts_with("data:image/png;base64,"));
        }
    }

    #[test]
    fn disposed_raster_chart_refuses_to_render() {
        let mut chart = RasterChartRenderer
            .create(&specs(0, 0)[0])
            .unwrap();
        chart.dispose();
        assert!(matches!(chart.to_image(), Err(ChartError::Disposed)));
    }
}
