//! Core value types shared by every element: identities, dimensions, input
//! events and callback plumbing

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// Process-unique identity of an element, allocated at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Identity of the window an element tree is shown in
///
/// Elements only remember the id; the window itself is owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

// ============================================================================
// Dimensions
// ============================================================================

/// Width and height of a rendered element
///
/// Signed so layout arithmetic can go negative before being validated; a
/// render request with a negative component is rejected. `(0, 0)` means
/// "use the computed minimum".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    /// The "unspecified" request
    pub const ZERO: Self = Self::new(0, 0);

    /// Previous size of an element that has never been rendered
    pub const UNSET: Self = Self::new(-1, -1);

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn is_negative(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Width and height exchanged
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Both components clamped to zero from below
    pub fn non_negative(&self) -> Self {
        Self::new(self.width.max(0), self.height.max(0))
    }

    /// Convert to an embedded-graphics `Size`, if both components are valid
    pub fn to_size(&self) -> Option<Size> {
        if self.is_negative() {
            None
        } else {
            Some(Size::new(self.width as u32, self.height as u32))
        }
    }
}

impl From<Size> for Dimensions {
    fn from(size: Size) -> Self {
        Self::new(size.width as i32, size.height as i32)
    }
}

// ============================================================================
// Input events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Keys the toolkit reacts to; anything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Return,
    Escape,
    Other(u32),
}

/// Input delivered by the surrounding event source, in window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseDown { point: Point, button: MouseButton },
    MouseUp { point: Point, button: MouseButton },
    MouseMotion { point: Point },
    KeyDown(Key),
}

impl InputEvent {
    /// Pointer position carried by the event, if any
    pub fn point(&self) -> Option<Point> {
        match *self {
            InputEvent::MouseDown { point, .. }
            | InputEvent::MouseUp { point, .. }
            | InputEvent::MouseMotion { point } => Some(point),
            InputEvent::KeyDown(_) => None,
        }
    }
}

/// Outcome of offering an event to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Not for this element, keep looking
    NotCaptured,
    /// Consumed
    Captured,
    /// A callback released the element; stop processing this event
    ObjectFreed,
}

impl EventState {
    pub fn is_captured(&self) -> bool {
        !matches!(self, EventState::NotCaptured)
    }
}

// ============================================================================
// Callbacks
// ============================================================================

/// Notifications an element can raise to application code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    OnClick,
    OnClicked,
    OnSelected,
    OnDeselected,
    OnActivated,
    OnDeactivated,
    OnExpanded,
    OnCollapsed,
}

/// Payload handed to a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackEvent {
    pub source: ElementId,
    pub kind: CallbackKind,
}

/// What a callback asks of the element that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFlow {
    /// Carry on handling the event
    Continue,
    /// Free the element; it must not touch its own state afterwards
    Release,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dimensions_validation() {
        assert!(Dimensions::UNSET.is_negative());
        assert!(Dimensions::ZERO.is_zero());
        assert_eq!(Dimensions::new(3, -2).to_size(), None);
        assert_eq!(Dimensions::new(3, 2).to_size(), Some(Size::new(3, 2)));
        assert_eq!(Dimensions::new(100, 40).swapped(), Dimensions::new(40, 100));
    }

    #[test]
    fn test_key_events_carry_no_point() {
        assert_eq!(InputEvent::KeyDown(Key::Up).point(), None);
        let down = InputEvent::MouseDown {
            point: Point::new(4, 5),
            button: MouseButton::Left,
        };
        assert_eq!(down.point(), Some(Point::new(4, 5)));
        assert!(EventState::ObjectFreed.is_captured());
        assert!(!EventState::NotCaptured.is_captured());
    }
}
