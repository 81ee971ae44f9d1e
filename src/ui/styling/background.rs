//! Element background styles
//!
//! Every element paints its background before drawing content. The style is
//! picked by the element's focus state, so a selected or hovered element can
//! look different from its normal state.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::colors::LLGRAY;
use crate::ui::surface::Surface;

/// How an element is currently being presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Normal,
    Selected,
    Hovered,
}

/// Direction a gradient runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    /// Top to bottom
    Vertical,
    /// Left to right
    Horizontal,
}

/// A color anchored at a fraction (0.0..=1.0) along a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub color: Rgb565,
    pub fraction: f32,
}

impl ColorStop {
    pub fn new(color: Rgb565, fraction: f32) -> Self {
        Self { color, fraction }
    }
}

/// Background for one focus state
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStyle {
    Solid(Rgb565),
    /// Linear gradient; stops must be sorted by fraction
    Gradient {
        direction: GradientDirection,
        stops: Vec<ColorStop>,
    },
    /// Leave the surface transparent so the parent shows through
    Transparent,
}

impl BackgroundStyle {
    /// Paint the whole surface
    pub fn paint(&self, surface: &mut Surface) {
        let size = surface.size();
        match self {
            BackgroundStyle::Solid(color) => {
                surface.fill_rect(&Rectangle::new(Point::zero(), size), *color);
            }
            BackgroundStyle::Transparent => surface.clear_transparent(),
            BackgroundStyle::Gradient { direction, stops } => {
                let lines = match direction {
                    GradientDirection::Vertical => size.height,
                    GradientDirection::Horizontal => size.width,
                };
                for i in 0..lines {
                    let fraction = if lines > 1 {
                        i as f32 / (lines - 1) as f32
                    } else {
                        0.0
                    };
                    let Some(color) = gradient_color(stops, fraction) else {
                        surface.clear_transparent();
                        return;
                    };
                    let line = match direction {
                        GradientDirection::Vertical => {
                            Rectangle::new(Point::new(0, i as i32), Size::new(size.width, 1))
                        }
                        GradientDirection::Horizontal => {
                            Rectangle::new(Point::new(i as i32, 0), Size::new(1, size.height))
                        }
                    };
                    surface.fill_rect(&line, color);
                }
            }
        }
    }
}

/// Interpolate the gradient color at `fraction`
fn gradient_color(stops: &[ColorStop], fraction: f32) -> Option<Rgb565> {
    let first = stops.first()?;
    let last = stops.last()?;
    if fraction <= first.fraction {
        return Some(first.color);
    }
    if fraction >= last.fraction {
        return Some(last.color);
    }

    let (lo, hi) = stops
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(lo, hi)| fraction >= lo.fraction && fraction <= hi.fraction)?;

    let span = hi.fraction - lo.fraction;
    let t = if span > 0.0 {
        (fraction - lo.fraction) / span
    } else {
        0.0
    };
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Some(Rgb565::new(
        lerp(lo.color.r(), hi.color.r()),
        lerp(lo.color.g(), hi.color.g()),
        lerp(lo.color.b(), hi.color.b()),
    ))
}

/// Backgrounds for each focus state
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub normal: BackgroundStyle,
    pub selected: BackgroundStyle,
    pub hovered: BackgroundStyle,
}

impl Default for Background {
    fn default() -> Self {
        Self::solid(LLGRAY)
    }
}

impl Background {
    /// Same solid color in every state
    pub fn solid(color: Rgb565) -> Self {
        Self {
            normal: BackgroundStyle::Solid(color),
            selected: BackgroundStyle::Solid(color),
            hovered: BackgroundStyle::Solid(color),
        }
    }

    /// Transparent in every state
    pub fn transparent() -> Self {
        Self {
            normal: BackgroundStyle::Transparent,
            selected: BackgroundStyle::Transparent,
            hovered: BackgroundStyle::Transparent,
        }
    }

    pub fn with_normal(mut self, style: BackgroundStyle) -> Self {
        self.normal = style;
        self
    }

    pub fn with_selected(mut self, style: BackgroundStyle) -> Self {
        self.selected = style;
        self
    }

    pub fn with_hovered(mut self, style: BackgroundStyle) -> Self {
        self.hovered = style;
        self
    }

    pub fn style_for(&self, state: FocusState) -> &BackgroundStyle {
        match state {
            FocusState::Normal => &self.normal,
            FocusState::Selected => &self.selected,
            FocusState::Hovered => &self.hovered,
        }
    }

    pub fn paint(&self, state: FocusState, surface: &mut Surface) {
        self.style_for(state).paint(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_fills_surface() {
        let mut surface = Surface::new(Size::new(3, 3)).unwrap();
        Background::solid(Rgb565::RED).paint(FocusState::Normal, &mut surface);
        assert_eq!(surface.pixel(2, 2), Some(Rgb565::RED));
    }

    #[test]
    fn test_transparent_clears_surface() {
        let mut surface = Surface::new(Size::new(3, 3)).unwrap();
        surface.fill_rect(&Rectangle::new(Point::zero(), Size::new(3, 3)), Rgb565::RED);
        Background::transparent().paint(FocusState::Selected, &mut surface);
        assert_eq!(surface.pixel(1, 1), None);
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let mut surface = Surface::new(Size::new(2, 5)).unwrap();
        let style = BackgroundStyle::Gradient {
            direction: GradientDirection::Vertical,
            stops: vec![
                ColorStop::new(Rgb565::BLACK, 0.0),
                ColorStop::new(Rgb565::WHITE, 1.0),
            ],
        };
        style.paint(&mut surface);
        assert_eq!(surface.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(surface.pixel(1, 4), Some(Rgb565::WHITE));
        let mid = surface.pixel(0, 2).unwrap();
        assert!(mid.r() > 0 && mid.r() < 31);
    }

    #[test]
    fn test_focus_state_selects_style() {
        let bg = Background::default().with_selected(BackgroundStyle::Solid(Rgb565::BLUE));
        assert_eq!(
            bg.style_for(FocusState::Selected),
            &BackgroundStyle::Solid(Rgb565::BLUE)
        );
        assert_eq!(bg.style_for(FocusState::Normal), &BackgroundStyle::Solid(LLGRAY));
    }
}
