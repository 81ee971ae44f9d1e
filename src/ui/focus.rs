//! Input focus and top-level event delivery
//!
//! The toolkit does not own focus storage; it talks to a [`FocusManager`]
//! supplied by the surrounding window layer. [`FocusTracker`] is a simple
//! in-memory implementation for hosts without one.

use log::debug;

use super::context::EventContext;
use super::core::{ElementId, EventState, InputEvent, WindowId};
use super::element::{Element, find_mut};

/// Window-side focus bookkeeping consumed by the toolkit
pub trait FocusManager {
    /// Make `element` the focused element of `window`
    fn take_focus(&mut self, window: WindowId, element: ElementId);

    /// Currently focused element of `window`
    fn focused(&self, window: WindowId) -> Option<ElementId>;

    /// Elements that lost focus since the last call
    fn take_defocused(&mut self) -> Vec<ElementId>;
}

/// In-memory [`FocusManager`]
#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Vec<(WindowId, ElementId)>,
    defocused: Vec<ElementId>,
}

impl FocusManager for FocusTracker {
    fn take_focus(&mut self, window: WindowId, element: ElementId) {
        match self.focused.iter_mut().find(|(w, _)| *w == window) {
            Some((_, current)) => {
                if *current != element {
                    self.defocused.push(*current);
                    *current = element;
                }
            }
            None => self.focused.push((window, element)),
        }
    }

    fn focused(&self, window: WindowId) -> Option<ElementId> {
        self.focused
            .iter()
            .find(|(w, _)| *w == window)
            .map(|(_, e)| *e)
    }

    fn take_defocused(&mut self) -> Vec<ElementId> {
        core::mem::take(&mut self.defocused)
    }
}

/// Offer `event` to the tree rooted at `root`, then notify every element
/// that lost focus while it was handled
pub fn dispatch_event(
    root: &mut dyn Element,
    event: &InputEvent,
    ctx: &mut EventContext<'_>,
) -> EventState {
    let state = if root.is_shown() {
        root.capture_event(event, ctx)
    } else {
        EventState::NotCaptured
    };

    for id in ctx.take_defocused() {
        match find_mut(root, id) {
            Some(element) => {
                debug!("Defocusing element {}", id.raw());
                element.defocus();
            }
            None => debug!("Defocused element {} is no longer in the tree", id.raw()),
        }
    }

    state
}
