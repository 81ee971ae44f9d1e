//! Per-pass context objects threaded through the element tree
//!
//! [`RenderContext`] carries the font backend and the current nesting depth
//! into every `min_size`/`render` call. [`EventContext`] carries the focus
//! manager and the event timestamp into `capture_event`.

use log::{debug, warn};

use super::backend::FontBackend;
use super::constants::MAX_RECURSION;
use super::core::{ElementId, WindowId};
use super::error::{UiError, UiResult};
use super::focus::FocusManager;

/// Shared state for one layout/render pass
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    fonts: Option<&'a dyn FontBackend>,
    depth: usize,
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderContext<'a> {
    /// Context without a font backend; text elements will fail to measure
    pub fn new() -> Self {
        Self {
            fonts: None,
            depth: 0,
        }
    }

    pub fn with_fonts(fonts: &'a dyn FontBackend) -> Self {
        Self {
            fonts: Some(fonts),
            depth: 0,
        }
    }

    pub fn fonts(&self) -> UiResult<&'a dyn FontBackend> {
        self.fonts.ok_or(UiError::MissingDependency("font backend"))
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for a child one level deeper
    ///
    /// Fails once the tree is nested past [`MAX_RECURSION`].
    pub fn descend(&self) -> UiResult<RenderContext<'a>> {
        let depth = self.depth + 1;
        if depth > MAX_RECURSION {
            warn!("Render recursion limit exceeded at depth {}", depth);
            return Err(UiError::RecursionLimitExceeded { depth });
        }
        Ok(Self {
            fonts: self.fonts,
            depth,
        })
    }
}

/// Shared state for delivering one input event
pub struct EventContext<'a> {
    focus: &'a mut dyn FocusManager,
    now_ms: u64,
}

impl<'a> EventContext<'a> {
    pub fn new(focus: &'a mut dyn FocusManager, now_ms: u64) -> Self {
        Self { focus, now_ms }
    }

    /// Timestamp of the event being delivered
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Give input focus to `element`
    ///
    /// Elements not yet attached to a window cannot take focus; the request
    /// is dropped.
    pub fn take_focus(&mut self, window: Option<WindowId>, element: ElementId) {
        match window {
            Some(window) => {
                debug!("Element {} takes focus", element.raw());
                self.focus.take_focus(window, element);
            }
            None => debug!("Element {} has no window; focus unchanged", element.raw()),
        }
    }

    pub fn focused(&self, window: Option<WindowId>) -> Option<ElementId> {
        window.and_then(|w| self.focus.focused(w))
    }

    pub(crate) fn take_defocused(&mut self) -> Vec<ElementId> {
        self.focus.take_defocused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::backend::MonoFontBackend;
    use crate::ui::focus::FocusTracker;

    #[test]
    fn test_missing_fonts_is_reported() {
        let ctx = RenderContext::new();
        assert_eq!(
            ctx.fonts().err(),
            Some(UiError::MissingDependency("font backend"))
        );
        let fonts = MonoFontBackend;
        assert!(RenderContext::with_fonts(&fonts).fonts().is_ok());
    }

    #[test]
    fn test_descend_stops_at_recursion_limit() {
        let mut ctx = RenderContext::new();
        for _ in 0..MAX_RECURSION {
            ctx = ctx.descend().unwrap();
        }
        assert_eq!(ctx.depth(), MAX_RECURSION);
        let err = ctx.descend().err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_take_focus_requires_window() {
        let mut tracker = FocusTracker::default();
        let id = ElementId::next();
        {
            let mut ctx = EventContext::new(&mut tracker, 0);
            ctx.take_focus(None, id);
            assert_eq!(ctx.focused(Some(WindowId(1))), None);
            ctx.take_focus(Some(WindowId(1)), id);
            assert_eq!(ctx.focused(Some(WindowId(1))), Some(id));
        }
    }
}
