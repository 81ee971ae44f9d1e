//! Drawing area of a plot: axes, tic grid and series polylines

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
};
use log::debug;

use crate::ui::backend::{FontBackend, TextSize};
use crate::ui::config::ElementConfig;
use crate::ui::constants::{
    PLOT_CANVAS_MIN_HEIGHT_PX, PLOT_CANVAS_MIN_WIDTH_PX, PLOT_TIC_DIVISIONS, PLOT_TIC_LENGTH_PX,
};
use crate::ui::context::RenderContext;
use crate::ui::core::Dimensions;
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::{UiError, UiResult};
use crate::ui::styling::{BLACK, Background, LLGRAY, WHITE};
use crate::ui::surface::{BitmapHandle, Surface};

use super::series::DataSeries;
use super::viewport::{AxisRange, DataBounds, RangeConfig, Viewport};

/// Longest formatted tic value
const TIC_LABEL_CAPACITY: usize = 16;

/// Gap between a tic mark and its label
const TIC_LABEL_GAP_PX: i32 = 1;

type TicLabel = heapless::String<TIC_LABEL_CAPACITY>;

/// Format a tic value with precision suited to the axis span
fn tic_label(value: f32, span: f32) -> TicLabel {
    let decimals = if span >= 10.0 {
        0
    } else if span >= 1.0 {
        1
    } else {
        2
    };
    let mut label = TicLabel::new();
    // A value too long for the buffer leaves the tic unlabelled
    if write!(label, "{:.*}", decimals, value).is_err() {
        label.clear();
    }
    label
}

fn tic_labels(range: &AxisRange) -> Vec<TicLabel> {
    (0..=PLOT_TIC_DIVISIONS)
        .map(|i| tic_label(range.tic(i, PLOT_TIC_DIVISIONS), range.span()))
        .collect()
}

/// Plot canvas holding the data sets
///
/// Owned by a [`Plot`](super::Plot), which forwards its data API here.
pub struct PlotCanvas {
    base: ElementBase,
    series: Vec<DataSeries>,
    x_range: RangeConfig,
    y_range: RangeConfig,
    axis_color: Rgb565,
    grid_color: Rgb565,
    font: TextSize,
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotCanvas {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("PlotCanvas").with_background(Background::solid(WHITE)),
            series: Vec::new(),
            x_range: RangeConfig::Auto,
            y_range: RangeConfig::Auto,
            axis_color: BLACK,
            grid_color: LLGRAY,
            font: TextSize::Small,
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn series(&self) -> &[DataSeries] {
        &self.series
    }

    pub fn add_series(&mut self, series: DataSeries) -> usize {
        self.series.push(series);
        self.base.request_redraw();
        self.series.len() - 1
    }

    pub fn remove_series(&mut self, index: usize) -> UiResult<DataSeries> {
        self.check_index(index)?;
        self.base.request_redraw();
        Ok(self.series.remove(index))
    }

    pub fn replace_series(&mut self, index: usize, series: DataSeries) -> UiResult<DataSeries> {
        self.check_index(index)?;
        self.base.request_redraw();
        Ok(core::mem::replace(&mut self.series[index], series))
    }

    pub fn series_mut(&mut self, index: usize) -> UiResult<&mut DataSeries> {
        self.check_index(index)?;
        self.base.request_redraw();
        Ok(&mut self.series[index])
    }

    fn check_index(&self, index: usize) -> UiResult<()> {
        if index >= self.series.len() {
            return Err(UiError::IndexOutOfRange {
                index,
                len: self.series.len(),
            });
        }
        Ok(())
    }

    pub fn x_range(&self) -> RangeConfig {
        self.x_range
    }

    pub fn y_range(&self) -> RangeConfig {
        self.y_range
    }

    pub fn set_x_range(&mut self, range: RangeConfig) {
        if self.x_range != range {
            self.x_range = range;
            self.base.request_redraw();
        }
    }

    pub fn set_y_range(&mut self, range: RangeConfig) {
        if self.y_range != range {
            self.y_range = range;
            self.base.request_redraw();
        }
    }

    /// Bounds the next render maps onto pixels
    pub fn bounds(&self) -> DataBounds {
        DataBounds::resolve(&self.series, self.x_range, self.y_range)
    }

    /// Inner rectangle left after reserving room for tic labels
    fn plot_area(
        &self,
        size: Size,
        fonts: &dyn FontBackend,
        x_labels: &[TicLabel],
        y_labels: &[TicLabel],
    ) -> Rectangle {
        let line_h = fonts.line_height(self.font);
        let widest_y = y_labels
            .iter()
            .map(|l| fonts.measure(l, self.font).width)
            .max()
            .unwrap_or(0);
        let last_x = x_labels
            .last()
            .map(|l| fonts.measure(l, self.font).width)
            .unwrap_or(0);

        let left = widest_y + PLOT_TIC_LENGTH_PX + TIC_LABEL_GAP_PX;
        let top = line_h / 2;
        let right = (last_x / 2).max(1);
        let bottom = line_h + PLOT_TIC_LENGTH_PX + TIC_LABEL_GAP_PX;

        let width = (size.width as i32 - left - right).max(0);
        let height = (size.height as i32 - top - bottom).max(0);
        Rectangle::new(
            Point::new(left, top),
            Size::new(width as u32, height as u32),
        )
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let fonts = ctx.fonts()?;
        let bounds = self.bounds();
        let x_labels = tic_labels(&bounds.x);
        let y_labels = tic_labels(&bounds.y);
        let area = self.plot_area(surface.size(), fonts, &x_labels, &y_labels);
        if area.size.width < 2 || area.size.height < 2 {
            debug!("Plot canvas {} too small to draw", self.base.id().raw());
            return Ok(());
        }
        let viewport = Viewport::new(bounds, area);

        self.draw_grid(surface, fonts, &viewport, &x_labels, &y_labels)?;

        let mut clipped = surface.clipped(&area);
        for (index, series) in self.series.iter().enumerate() {
            let style = PrimitiveStyle::with_stroke(series.color_or_palette(index), 1);
            let points: Vec<Point> = series
                .points()
                .iter()
                .filter_map(|p| viewport.data_to_screen(*p))
                .collect();
            for pair in points.windows(2) {
                let Ok(()) = Line::new(pair[0], pair[1]).into_styled(style).draw(&mut clipped);
            }
        }
        Ok(())
    }

    fn draw_grid(
        &self,
        surface: &mut Surface,
        fonts: &dyn FontBackend,
        viewport: &Viewport,
        x_labels: &[TicLabel],
        y_labels: &[TicLabel],
    ) -> UiResult<()> {
        let area = viewport.area();
        let bounds = viewport.bounds();
        let top = area.top_left.y;
        let bottom = top + area.size.height as i32 - 1;
        let left = area.top_left.x;
        let right = left + area.size.width as i32 - 1;
        let grid = PrimitiveStyle::with_stroke(self.grid_color, 1);
        let axis = PrimitiveStyle::with_stroke(self.axis_color, 1);

        for (i, label) in x_labels.iter().enumerate() {
            let x = viewport.x_to_screen(bounds.x.tic(i, PLOT_TIC_DIVISIONS));
            if i > 0 && i < PLOT_TIC_DIVISIONS {
                let Ok(()) = Line::new(Point::new(x, top), Point::new(x, bottom))
                    .into_styled(grid)
                    .draw(surface);
            }
            let Ok(()) = Line::new(
                Point::new(x, bottom),
                Point::new(x, bottom + PLOT_TIC_LENGTH_PX),
            )
            .into_styled(axis)
            .draw(surface);
            if !label.is_empty() {
                let glyphs = fonts.render_text(label, self.font, self.axis_color)?;
                let at = Point::new(
                    x - glyphs.size().width as i32 / 2,
                    bottom + PLOT_TIC_LENGTH_PX + TIC_LABEL_GAP_PX,
                );
                surface.blit(&glyphs, at);
            }
        }

        for (i, label) in y_labels.iter().enumerate() {
            let y = viewport.y_to_screen(bounds.y.tic(i, PLOT_TIC_DIVISIONS));
            if i > 0 && i < PLOT_TIC_DIVISIONS {
                let Ok(()) = Line::new(Point::new(left, y), Point::new(right, y))
                    .into_styled(grid)
                    .draw(surface);
            }
            let Ok(()) = Line::new(
                Point::new(left - PLOT_TIC_LENGTH_PX, y),
                Point::new(left, y),
            )
            .into_styled(axis)
            .draw(surface);
            if !label.is_empty() {
                let glyphs = fonts.render_text(label, self.font, self.axis_color)?;
                let size = glyphs.size();
                let at = Point::new(
                    left - PLOT_TIC_LENGTH_PX - TIC_LABEL_GAP_PX - size.width as i32,
                    y - size.height as i32 / 2,
                );
                surface.blit(&glyphs, at);
            }
        }

        let frame = PrimitiveStyleBuilder::new()
            .stroke_color(self.axis_color)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let Ok(()) = area.into_styled(frame).draw(surface);
        Ok(())
    }
}

impl Element for PlotCanvas {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, _ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        Ok(Dimensions::new(
            PLOT_CANVAS_MIN_WIDTH_PX,
            PLOT_CANVAS_MIN_HEIGHT_PX,
        ))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::backend::MonoFontBackend;
    use embedded_graphics::prelude::RgbColor;
    use std::rc::Rc;

    #[test]
    fn test_tic_label_precision() {
        assert_eq!(tic_label(12.4, 50.0).as_str(), "12");
        assert_eq!(tic_label(1.26, 5.0).as_str(), "1.3");
        assert_eq!(tic_label(0.126, 0.5).as_str(), "0.13");
        assert_eq!(tic_label(1.0e30, 50.0).as_str(), "");
    }

    #[test]
    fn test_min_size_is_fixed() {
        let ctx = RenderContext::new();
        assert_eq!(
            PlotCanvas::new().min_size(&ctx).unwrap(),
            Dimensions::new(PLOT_CANVAS_MIN_WIDTH_PX, PLOT_CANVAS_MIN_HEIGHT_PX)
        );
    }

    #[test]
    fn test_series_index_errors() {
        let mut canvas = PlotCanvas::new();
        assert_eq!(canvas.add_series(DataSeries::new("a")), 0);
        assert_eq!(canvas.add_series(DataSeries::new("b")), 1);
        assert_eq!(
            canvas.remove_series(2).err(),
            Some(UiError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(canvas.remove_series(0).unwrap().label(), "a");
        assert_eq!(canvas.series()[0].label(), "b");
    }

    #[test]
    fn test_series_drawn_inside_plot_area() {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let mut canvas = PlotCanvas::new();
        canvas.set_x_range(RangeConfig::Fixed { min: 0.0, max: 10.0 });
        canvas.set_y_range(RangeConfig::Fixed { min: 0.0, max: 10.0 });
        canvas.add_series(
            DataSeries::new("flat")
                .with_color(Rgb565::RED)
                .with_points([(0.0, 5.0), (10.0, 5.0)]),
        );
        let bitmap = canvas.render(Dimensions::new(200, 120), &ctx).unwrap();
        let reds = (0..200)
            .flat_map(|x| (0..120).map(move |y| (x, y)))
            .filter(|&(x, y)| bitmap.pixel(x, y) == Some(Rgb565::RED))
            .count();
        assert!(reds > 100);
        assert_eq!(bitmap.pixel(199, 0), Some(WHITE));
    }

    #[test]
    fn test_range_change_invalidates_cache() {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let mut canvas = PlotCanvas::new();
        let first = canvas.render(Dimensions::ZERO, &ctx).unwrap();
        canvas.set_x_range(RangeConfig::Auto);
        let same = canvas.render(Dimensions::ZERO, &ctx).unwrap();
        assert!(Rc::ptr_eq(&first, &same));
        canvas.set_x_range(RangeConfig::Fixed { min: -1.0, max: 1.0 });
        let changed = canvas.render(Dimensions::ZERO, &ctx).unwrap();
        assert!(!Rc::ptr_eq(&first, &changed));
    }
}
