//! Per-element layout configuration
//!
//! Every element carries an [`ElementConfig`] describing how its parent
//! should size and place it: fill flags and scale weights for sharing free
//! space, justification inside the allotted cell, padding, min/max clamps
//! and visibility.

use serde::{Deserialize, Serialize};

use super::core::Dimensions;
use super::error::{UiError, UiResult};
use super::styling::Padding;

/// Horizontal placement of an element inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HJustify {
    Left,
    #[default]
    Center,
    Right,
    /// Use the containing element's justification
    Default,
}

/// Vertical placement of an element inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VJustify {
    Top,
    #[default]
    Center,
    Bottom,
    /// Use the containing element's justification
    Default,
}

/// Alignment along a single axis, independent of direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl HJustify {
    /// Resolve `Default` against the container's justification
    pub fn resolve(self, container: HJustify) -> Align {
        match self {
            HJustify::Left => Align::Start,
            HJustify::Center => Align::Center,
            HJustify::Right => Align::End,
            HJustify::Default => match container {
                HJustify::Left => Align::Start,
                HJustify::Right => Align::End,
                HJustify::Center | HJustify::Default => Align::Center,
            },
        }
    }
}

impl VJustify {
    /// Resolve `Default` against the container's justification
    pub fn resolve(self, container: VJustify) -> Align {
        match self {
            VJustify::Top => Align::Start,
            VJustify::Center => Align::Center,
            VJustify::Bottom => Align::End,
            VJustify::Default => match container {
                VJustify::Top => Align::Start,
                VJustify::Bottom => Align::End,
                VJustify::Center | VJustify::Default => Align::Center,
            },
        }
    }
}

impl Align {
    /// Offset of an item of length `size` inside a cell of length `extent`
    /// with `pad_start`/`pad_end` reserved on either side
    pub fn offset(self, extent: i32, size: i32, pad_start: i32, pad_end: i32) -> i32 {
        match self {
            Align::Start => pad_start,
            Align::Center => pad_start + (extent - (pad_start + pad_end) - size) / 2,
            Align::End => extent - (size + pad_end),
        }
    }
}

/// Layout attributes consulted by an element's parent
///
/// Scale factors only matter when the matching fill flag is set; a
/// non-filling element's own min-size is authoritative.
///
/// # Examples
///
/// ```ignore
/// let cfg = ElementConfig::new()
///     .with_h_fill(true)
///     .with_h_scale(2.0)
///     .with_padding(Padding::symmetric(2, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub h_fill: bool,
    pub v_fill: bool,
    pub h_scale: f32,
    pub v_scale: f32,
    pub h_justify: HJustify,
    pub v_justify: VJustify,
    pub padding: Padding,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_height: Option<u32>,
    pub show: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            h_fill: false,
            v_fill: false,
            h_scale: 1.0,
            v_scale: 1.0,
            h_justify: HJustify::Center,
            v_justify: VJustify::Center,
            padding: Padding::default(),
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            show: true,
        }
    }
}

impl ElementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_h_fill(mut self, fill: bool) -> Self {
        self.h_fill = fill;
        self
    }

    pub fn with_v_fill(mut self, fill: bool) -> Self {
        self.v_fill = fill;
        self
    }

    /// Fill in both directions
    pub fn fill_all(self) -> Self {
        self.with_h_fill(true).with_v_fill(true)
    }

    pub fn with_h_scale(mut self, scale: f32) -> Self {
        self.h_scale = scale;
        self
    }

    pub fn with_v_scale(mut self, scale: f32) -> Self {
        self.v_scale = scale;
        self
    }

    pub fn with_h_justify(mut self, justify: HJustify) -> Self {
        self.h_justify = justify;
        self
    }

    pub fn with_v_justify(mut self, justify: VJustify) -> Self {
        self.v_justify = justify;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_min_height(mut self, height: u32) -> Self {
        self.min_height = Some(height);
        self
    }

    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Apply the min/max clamps to a measured size
    ///
    /// The minimum clamp wins if the two conflict.
    pub fn clamp(&self, size: Dimensions) -> Dimensions {
        let clamp_axis = |value: i32, min: Option<u32>, max: Option<u32>| {
            let mut value = value;
            if let Some(max) = max {
                value = value.min(max as i32);
            }
            if let Some(min) = min {
                value = value.max(min as i32);
            }
            value
        };

        Dimensions::new(
            clamp_axis(size.width, self.min_width, self.max_width),
            clamp_axis(size.height, self.min_height, self.max_height),
        )
    }

    /// Encode for persistence
    pub fn to_bytes(&self) -> UiResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| UiError::Serialization(e.to_string()))
    }

    /// Decode a configuration written by [`ElementConfig::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> UiResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| UiError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ElementConfig::default();
        assert!(!cfg.h_fill && !cfg.v_fill);
        assert_eq!(cfg.h_scale, 1.0);
        assert_eq!(cfg.h_justify, HJustify::Center);
        assert!(cfg.show);
    }

    #[test]
    fn test_default_justify_inherits_container() {
        assert_eq!(HJustify::Default.resolve(HJustify::Right), Align::End);
        assert_eq!(HJustify::Left.resolve(HJustify::Right), Align::Start);
        assert_eq!(VJustify::Default.resolve(VJustify::Top), Align::Start);
        assert_eq!(VJustify::Default.resolve(VJustify::Default), Align::Center);
    }

    #[test]
    fn test_align_offsets() {
        assert_eq!(Align::Start.offset(100, 20, 3, 5), 3);
        assert_eq!(Align::End.offset(100, 20, 3, 5), 75);
        assert_eq!(Align::Center.offset(100, 20, 0, 0), 40);
        assert_eq!(Align::Center.offset(100, 20, 4, 4), 40);
    }

    #[test]
    fn test_clamp_applies_min_and_max() {
        let cfg = ElementConfig::new().with_min_width(50).with_max_height(10);
        assert_eq!(cfg.clamp(Dimensions::new(20, 30)), Dimensions::new(50, 10));
        assert_eq!(cfg.clamp(Dimensions::new(80, 5)), Dimensions::new(80, 5));
    }

    #[test]
    fn test_config_persists_through_bytes() {
        let cfg = ElementConfig::new()
            .fill_all()
            .with_h_scale(2.5)
            .with_padding(Padding::new(1, 2, 3, 4))
            .with_show(false);
        let bytes = cfg.to_bytes().unwrap();
        assert_eq!(ElementConfig::from_bytes(&bytes).unwrap(), cfg);
    }
}
