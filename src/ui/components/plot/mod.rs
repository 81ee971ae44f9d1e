//! Line plots
//!
//! - [`series`] - Labelled point lists
//! - [`viewport`] - Axis ranges and data-to-pixel mapping
//! - [`canvas`] - Grid and polyline drawing
//! - [`component`] - The assembled [`Plot`] element

pub mod canvas;
pub mod component;
pub mod series;
pub mod viewport;

pub use canvas::PlotCanvas;
pub use component::Plot;
pub use series::{DataPoint, DataSeries};
pub use viewport::{AxisRange, DataBounds, RangeConfig, Viewport};
