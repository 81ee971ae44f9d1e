//! Padding around elements
//!
//! Padding is transparent space a parent reserves around a child on top of
//! the child's own minimum size.

use serde::{Deserialize, Serialize};

/// Padding around an element (top, right, bottom, left)
///
/// # Examples
///
/// ```ignore
/// // Equal padding on all sides (8px)
/// let p = Padding::all(8);
///
/// // Different vertical (12px) and horizontal (16px)
/// let p = Padding::symmetric(12, 16);
///
/// // Individual control: top=8, right=16, bottom=8, left=16
/// let p = Padding::new(8, 16, 8, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    /// Top padding (pixels)
    pub top: u32,

    /// Right padding (pixels)
    pub right: u32,

    /// Bottom padding (pixels)
    pub bottom: u32,

    /// Left padding (pixels)
    pub left: u32,
}

impl Padding {
    /// Creates equal padding on all sides
    pub fn all(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Creates symmetric padding (vertical and horizontal)
    pub fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Creates padding with individual control for each side
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Returns total horizontal padding (left + right)
    pub fn horizontal(&self) -> i32 {
        (self.left + self.right) as i32
    }

    /// Returns total vertical padding (top + bottom)
    pub fn vertical(&self) -> i32 {
        (self.top + self.bottom) as i32
    }
}
