//! Styling for elements
//!
//! - [`colors`] - Color constants
//! - [`layout`] - Padding
//! - [`background`] - Per-focus-state background styles

pub mod background;
pub mod colors;
pub mod layout;

pub use background::{
    Background, BackgroundStyle, ColorStop, FocusState, GradientDirection,
};
pub use colors::{BLACK, DARK_GRAY, GRAY, LBLUE, LIGHT_GRAY, LLGRAY, MBLUE, MLLWHITE, WHITE};
pub use layout::Padding;
