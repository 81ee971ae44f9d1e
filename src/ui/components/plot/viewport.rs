//! Mapping between data space and canvas pixels
//!
//! Axis ranges are either fixed by the caller or derived from every point of
//! every series. Auto ranges get a small margin on both sides and are widened
//! when all values coincide, so the mapping never divides by zero.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

use crate::ui::constants::{PLOT_AUTO_RANGE_MARGIN, PLOT_MIN_DATA_RANGE};

use super::series::{DataPoint, DataSeries};

/// How one plot axis chooses its range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RangeConfig {
    /// Span all data points with a margin
    #[default]
    Auto,
    /// Caller-chosen range
    Fixed { min: f32, max: f32 },
}

/// Inclusive interval on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Widen around the midpoint so the span is at least [`PLOT_MIN_DATA_RANGE`]
    fn widened(self) -> Self {
        if self.span() >= PLOT_MIN_DATA_RANGE {
            return self;
        }
        let mid = (self.min + self.max) / 2.0;
        let half = PLOT_MIN_DATA_RANGE / 2.0;
        Self::new(mid - half, mid + half)
    }

    /// Data-space value of tic `index` out of `divisions`
    pub fn tic(&self, index: usize, divisions: usize) -> f32 {
        if divisions == 0 {
            return self.min;
        }
        self.min + self.span() * index as f32 / divisions as f32
    }
}

/// Data space bounds for both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl DataBounds {
    /// Bounds used when there is nothing to span
    pub const UNIT: Self = Self {
        x: AxisRange::new(0.0, 1.0),
        y: AxisRange::new(0.0, 1.0),
    };

    /// Tight bounds of the finite points plus `margin` of the span per side
    pub fn from_points<'a>(
        points: impl IntoIterator<Item = &'a DataPoint>,
        margin: f32,
    ) -> Option<Self> {
        let mut points = points.into_iter().filter(|p| p.is_finite());
        let first = points.next()?;
        let (mut x, mut y) = (
            AxisRange::new(first.x, first.x),
            AxisRange::new(first.y, first.y),
        );
        for point in points {
            x.min = x.min.min(point.x);
            x.max = x.max.max(point.x);
            y.min = y.min.min(point.y);
            y.max = y.max.max(point.y);
        }

        let pad = |range: AxisRange| {
            let margin = range.span() * margin;
            AxisRange::new(range.min - margin, range.max + margin).widened()
        };
        Some(Self { x: pad(x), y: pad(y) })
    }

    /// Bounds for `series` under the per-axis range configuration
    pub fn resolve(series: &[DataSeries], x: RangeConfig, y: RangeConfig) -> Self {
        let auto = Self::from_points(
            series.iter().flat_map(|s| s.points()),
            PLOT_AUTO_RANGE_MARGIN,
        )
        .unwrap_or(Self::UNIT);
        let pick = |config: RangeConfig, auto: AxisRange| match config {
            RangeConfig::Auto => auto,
            RangeConfig::Fixed { min, max } if min <= max => AxisRange::new(min, max).widened(),
            RangeConfig::Fixed { min, max } => AxisRange::new(max, min).widened(),
        };
        Self {
            x: pick(x, auto.x),
            y: pick(y, auto.y),
        }
    }
}

/// Transforms data coordinates into pixel coordinates inside `area`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: DataBounds,
    area: Rectangle,
}

impl Viewport {
    pub fn new(bounds: DataBounds, area: Rectangle) -> Self {
        Self { bounds, area }
    }

    pub fn bounds(&self) -> &DataBounds {
        &self.bounds
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    /// Pixel x of data value `x`; screen x grows with data x
    pub fn x_to_screen(&self, x: f32) -> i32 {
        let norm = (x - self.bounds.x.min) / self.bounds.x.span();
        let width = self.area.size.width.saturating_sub(1) as f32;
        self.area.top_left.x + (norm * width).round() as i32
    }

    /// Pixel y of data value `y`; screen y grows downwards
    pub fn y_to_screen(&self, y: f32) -> i32 {
        let norm = (y - self.bounds.y.min) / self.bounds.y.span();
        let height = self.area.size.height.saturating_sub(1) as f32;
        self.area.top_left.y + ((1.0 - norm) * height).round() as i32
    }

    /// Screen position of `point`, `None` for non-finite input
    ///
    /// Points outside the bounds map outside the area; drawing is clipped.
    pub fn data_to_screen(&self, point: DataPoint) -> Option<Point> {
        if !point.is_finite() {
            return None;
        }
        Some(Point::new(
            self.x_to_screen(point.x),
            self.y_to_screen(point.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_from_points_adds_margin() {
        let points = [DataPoint::new(0.0, 10.0), DataPoint::new(10.0, 20.0)];
        let bounds = DataBounds::from_points(&points, 0.05).unwrap();
        assert!(close(bounds.x.min, -0.5));
        assert!(close(bounds.x.max, 10.5));
        assert!(close(bounds.y.min, 9.5));
        assert!(close(bounds.y.max, 20.5));
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let points = [DataPoint::new(3.0, 7.0)];
        let bounds = DataBounds::from_points(&points, 0.05).unwrap();
        assert!(close(bounds.x.span(), PLOT_MIN_DATA_RANGE));
        assert!(close((bounds.y.min + bounds.y.max) / 2.0, 7.0));
    }

    #[test]
    fn test_empty_or_non_finite_points_have_no_bounds() {
        assert!(DataBounds::from_points(&[] as &[DataPoint], 0.05).is_none());
        let nan = [DataPoint::new(f32::NAN, 1.0)];
        assert!(DataBounds::from_points(&nan, 0.05).is_none());
    }

    #[test]
    fn test_resolve_prefers_fixed_ranges() {
        let series = [DataSeries::new("s").with_points([(0.0, 0.0), (4.0, 8.0)])];
        let bounds = DataBounds::resolve(
            &series,
            RangeConfig::Fixed { min: 10.0, max: -10.0 },
            RangeConfig::Auto,
        );
        assert_eq!(bounds.x, AxisRange::new(-10.0, 10.0));
        assert!(close(bounds.y.min, -0.4));

        let empty = DataBounds::resolve(&[], RangeConfig::Auto, RangeConfig::Auto);
        assert_eq!(empty, DataBounds::UNIT);
    }

    #[test]
    fn test_data_to_screen_corners() {
        let area = Rectangle::new(Point::new(10, 5), Size::new(101, 51));
        let viewport = Viewport::new(DataBounds::UNIT, area);
        assert_eq!(
            viewport.data_to_screen(DataPoint::new(0.0, 0.0)),
            Some(Point::new(10, 55))
        );
        assert_eq!(
            viewport.data_to_screen(DataPoint::new(1.0, 1.0)),
            Some(Point::new(110, 5))
        );
        assert_eq!(
            viewport.data_to_screen(DataPoint::new(0.5, 0.5)),
            Some(Point::new(60, 30))
        );
        assert_eq!(viewport.data_to_screen(DataPoint::new(f32::INFINITY, 0.0)), None);
    }

    #[test]
    fn test_tic_positions() {
        let range = AxisRange::new(0.0, 100.0);
        assert!(close(range.tic(0, 4), 0.0));
        assert!(close(range.tic(1, 4), 25.0));
        assert!(close(range.tic(4, 4), 100.0));
    }
}
