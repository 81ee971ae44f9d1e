//! Color definitions
//!
//! All colors are RGB565, the native format of the drawing surfaces.
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Neutrals
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Pure black
pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);

/// Off-white used for even list rows
pub const MLLWHITE: Rgb565 = Rgb565::new(235 >> 3, 235 >> 2, 235 >> 3);

/// Default element background
pub const LLGRAY: Rgb565 = Rgb565::new(200 >> 3, 200 >> 2, 200 >> 3);

/// Light gray - grid lines and inactive borders
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Medium gray - borders
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Dark gray - frame borders and secondary text
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);

// ============================================================================
// Accents
// ============================================================================

/// Selection highlight for list rows and popups
pub const MBLUE: Rgb565 = Rgb565::new(150 >> 3, 150 >> 2, 255 >> 3);

/// Pressed/active button face
pub const LBLUE: Rgb565 = Rgb565::new(200 >> 3, 200 >> 2, 255 >> 3);

/// Series colors handed out to plot data sets in order
pub const SERIES_COLORS: [Rgb565; 6] = [
    Rgb565::new(30 >> 3, 144 >> 2, 255 >> 3),
    Rgb565::new(220 >> 3, 20 >> 2, 60 >> 3),
    Rgb565::new(76 >> 3, 154 >> 2, 113 >> 3),
    Rgb565::new(200 >> 3, 145 >> 2, 85 >> 3),
    Rgb565::new(128 >> 3, 0, 128 >> 3),
    Rgb565::new(0, 128 >> 2, 128 >> 3),
];
