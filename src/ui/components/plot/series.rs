//! Data series storage for plots

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use serde::{Deserialize, Serialize};

use crate::ui::error::{UiError, UiResult};
use crate::ui::styling::colors::SERIES_COLORS;

/// A single data point in data space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f32,
    pub y: f32,
}

impl DataPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for DataPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A labelled, coloured list of points drawn as one polyline
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    label: String,
    color: Option<Rgb565>,
    points: Vec<DataPoint>,
}

/// Persisted form of a series; colours travel as raw RGB565 words
#[derive(Serialize)]
struct StoredSeries<'a> {
    label: &'a str,
    color: Option<u16>,
    points: &'a [DataPoint],
}

#[derive(Deserialize)]
struct LoadedSeries {
    label: String,
    color: Option<u16>,
    points: Vec<DataPoint>,
}

impl DataSeries {
    /// Empty series; the plot assigns a palette colour unless one is set
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            color: None,
            points: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_points<P: Into<DataPoint>>(mut self, points: impl IntoIterator<Item = P>) -> Self {
        self.points.extend(points.into_iter().map(Into::into));
        self
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label.clear();
        self.label.push_str(label);
    }

    /// Explicit colour, or the palette entry for position `index`
    pub fn color_or_palette(&self, index: usize) -> Rgb565 {
        self.color
            .unwrap_or(SERIES_COLORS[index % SERIES_COLORS.len()])
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Encode label, colour and points for persistence
    pub fn to_bytes(&self) -> UiResult<Vec<u8>> {
        let stored = StoredSeries {
            label: &self.label,
            color: self.color.map(|c| c.into_storage()),
            points: &self.points,
        };
        postcard::to_allocvec(&stored).map_err(|e| UiError::Serialization(e.to_string()))
    }

    /// Decode a series written by [`DataSeries::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> UiResult<Self> {
        let loaded: LoadedSeries =
            postcard::from_bytes(bytes).map_err(|e| UiError::Serialization(e.to_string()))?;
        Ok(Self {
            label: loaded.label,
            color: loaded.color.map(|raw| Rgb565::from(RawU16::new(raw))),
            points: loaded.points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn test_palette_colour_cycles() {
        let series = DataSeries::new("a");
        assert_eq!(series.color_or_palette(0), SERIES_COLORS[0]);
        assert_eq!(
            series.color_or_palette(SERIES_COLORS.len() + 1),
            SERIES_COLORS[1]
        );
        let red = DataSeries::new("b").with_color(Rgb565::RED);
        assert_eq!(red.color_or_palette(3), Rgb565::RED);
    }

    #[test]
    fn test_persisted_series_keeps_colour() {
        let series = DataSeries::new("temp")
            .with_color(Rgb565::GREEN)
            .with_points([(1.0, -2.5)]);
        let restored = DataSeries::from_bytes(&series.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, series);
        assert!(matches!(
            DataSeries::from_bytes(&[0xff]),
            Err(UiError::Serialization(_))
        ));
    }

    #[test]
    fn test_points_from_tuples() {
        let series = DataSeries::new("t").with_points([(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[1], DataPoint::new(2.0, 3.0));
    }
}
