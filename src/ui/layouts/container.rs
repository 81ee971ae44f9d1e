//! Child ownership shared by every container element

use log::debug;

use crate::ui::config::{HJustify, VJustify};
use crate::ui::context::EventContext;
use crate::ui::core::{ElementId, EventState, InputEvent, WindowId};
use crate::ui::element::Element;
use crate::ui::error::{UiError, UiResult};

/// Which generic child operations a container accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// At most one child, replaced through `set_element`
    SingleChild,
    /// Any number of children, appended through `add_element`
    MultiChild,
    /// Children only through the container's own typed API
    NoDefaultAdd,
}

/// Owned children plus the container-level default justification
pub struct ContainerBase {
    kind: ContainerKind,
    elements: Vec<Box<dyn Element>>,
    h_justify: HJustify,
    v_justify: VJustify,
}

impl ContainerBase {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
            h_justify: HJustify::Center,
            v_justify: VJustify::Center,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn elements(&self) -> &[Box<dyn Element>] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Box<dyn Element>] {
        &mut self.elements
    }

    /// The single child of a single-child container
    pub fn element(&self) -> Option<&dyn Element> {
        self.elements.first().map(|e| e.as_ref())
    }

    pub fn element_mut(&mut self) -> Option<&mut (dyn Element + 'static)> {
        self.elements.first_mut().map(|e| e.as_mut())
    }

    pub fn h_justify(&self) -> HJustify {
        self.h_justify
    }

    pub fn v_justify(&self) -> VJustify {
        self.v_justify
    }

    pub fn set_h_justify(&mut self, justify: HJustify) {
        self.h_justify = justify;
    }

    pub fn set_v_justify(&mut self, justify: VJustify) {
        self.v_justify = justify;
    }

    /// Replace the child of a single-child container; the previous child is
    /// dropped
    pub fn set_element(
        &mut self,
        element: Box<dyn Element>,
        window: Option<WindowId>,
    ) -> UiResult<()> {
        if self.kind != ContainerKind::SingleChild {
            return Err(UiError::UnsupportedOperation("set_element"));
        }
        let element = Self::adopt(element, window)?;
        if let Some(previous) = self.elements.pop() {
            debug!("Replacing child {}", previous.id().raw());
        }
        self.elements.push(element);
        Ok(())
    }

    /// Append a child to a multi-child container
    pub fn add_element(
        &mut self,
        element: Box<dyn Element>,
        window: Option<WindowId>,
    ) -> UiResult<()> {
        if self.kind != ContainerKind::MultiChild {
            return Err(UiError::UnsupportedOperation("add_element"));
        }
        self.push(element, window)
    }

    /// Append regardless of kind; used by containers with their own add API
    pub(crate) fn push(
        &mut self,
        element: Box<dyn Element>,
        window: Option<WindowId>,
    ) -> UiResult<()> {
        let element = Self::adopt(element, window)?;
        self.elements
            .try_reserve(1)
            .map_err(|_| UiError::OutOfMemory {
                bytes: core::mem::size_of::<Box<dyn Element>>(),
            })?;
        self.elements.push(element);
        Ok(())
    }

    fn adopt(
        mut element: Box<dyn Element>,
        window: Option<WindowId>,
    ) -> UiResult<Box<dyn Element>> {
        if let Some(window) = window {
            element.set_window(window, 1)?;
        }
        Ok(element)
    }

    /// Detach the child with `id`, handing ownership back to the caller
    pub fn remove_element(&mut self, id: ElementId) -> Option<Box<dyn Element>> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Box<dyn Element>> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Offer `event` to visible children in order; the first capture wins
    ///
    /// A child reporting `ObjectFreed` is dropped here and the event counts
    /// as captured.
    pub fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        for index in 0..self.elements.len() {
            let child = &mut self.elements[index];
            if !child.is_shown() {
                continue;
            }
            match child.capture_event(event, ctx) {
                EventState::NotCaptured => {}
                EventState::Captured => return EventState::Captured,
                EventState::ObjectFreed => {
                    let freed = self.elements.remove(index);
                    debug!("Freed {} {} after callback", freed.kind(), freed.id().raw());
                    return EventState::ObjectFreed;
                }
            }
        }
        EventState::NotCaptured
    }

    pub fn defocus(&mut self) {
        for child in &mut self.elements {
            child.defocus();
        }
    }
}

/// Generic child API for container elements
///
/// `ObjectFreed` from [`ContainerBase::capture_event`] means a child was
/// removed; implementors mark themselves dirty and report `Captured`
/// upwards (see [`finish_capture`]).
pub trait Container: Element {
    fn container(&self) -> &ContainerBase;

    fn container_mut(&mut self) -> &mut ContainerBase;

    fn set_element(&mut self, element: Box<dyn Element>) -> UiResult<()> {
        let window = self.base().window();
        self.container_mut().set_element(element, window)?;
        self.request_redraw();
        Ok(())
    }

    fn add_element(&mut self, element: Box<dyn Element>) -> UiResult<()> {
        let window = self.base().window();
        self.container_mut().add_element(element, window)?;
        self.request_redraw();
        Ok(())
    }

    fn add_elements(&mut self, elements: Vec<Box<dyn Element>>) -> UiResult<()> {
        for element in elements {
            self.add_element(element)?;
        }
        Ok(())
    }

    fn remove_element(&mut self, id: ElementId) -> Option<Box<dyn Element>> {
        let removed = self.container_mut().remove_element(id);
        if removed.is_some() {
            self.request_redraw();
        }
        removed
    }

    fn element_count(&self) -> usize {
        self.container().len()
    }
}

/// Translate a child-level capture result into this container's result
pub fn finish_capture(container: &mut dyn Element, state: EventState) -> EventState {
    match state {
        EventState::ObjectFreed => {
            container.request_redraw();
            EventState::Captured
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::element::testing::Swatch;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_kind_restricts_generic_api() {
        let mut single = ContainerBase::new(ContainerKind::SingleChild);
        assert_eq!(
            single.add_element(Box::new(Swatch::new(1, 1)), None),
            Err(UiError::UnsupportedOperation("add_element"))
        );
        let mut multi = ContainerBase::new(ContainerKind::MultiChild);
        assert_eq!(
            multi.set_element(Box::new(Swatch::new(1, 1)), None),
            Err(UiError::UnsupportedOperation("set_element"))
        );
        let mut closed = ContainerBase::new(ContainerKind::NoDefaultAdd);
        assert!(closed.add_element(Box::new(Swatch::new(1, 1)), None).is_err());
        assert!(closed.set_element(Box::new(Swatch::new(1, 1)), None).is_err());
        assert!(closed.push(Box::new(Swatch::new(1, 1)), None).is_ok());
    }

    #[test]
    fn test_set_element_frees_previous_child() {
        let drops = Rc::new(Cell::new(0));
        let mut single = ContainerBase::new(ContainerKind::SingleChild);
        single
            .set_element(Box::new(Swatch::new(1, 1).with_drop_counter(drops.clone())), None)
            .unwrap();
        single.set_element(Box::new(Swatch::new(2, 2)), None).unwrap();
        assert_eq!(drops.get(), 1);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_dropping_container_frees_children_once() {
        let drops = Rc::new(Cell::new(0));
        let mut multi = ContainerBase::new(ContainerKind::MultiChild);
        for _ in 0..3 {
            multi
                .add_element(Box::new(Swatch::new(1, 1).with_drop_counter(drops.clone())), None)
                .unwrap();
        }
        drop(multi);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn test_adopted_child_inherits_window() {
        let mut multi = ContainerBase::new(ContainerKind::MultiChild);
        multi
            .add_element(Box::new(Swatch::new(1, 1)), Some(WindowId(4)))
            .unwrap();
        assert_eq!(multi.elements()[0].base().window(), Some(WindowId(4)));
    }

    #[test]
    fn test_remove_element_by_id() {
        let mut multi = ContainerBase::new(ContainerKind::MultiChild);
        let swatch = Swatch::new(1, 1);
        let id = swatch.id();
        multi.add_element(Box::new(swatch), None).unwrap();
        multi.add_element(Box::new(Swatch::new(1, 1)), None).unwrap();
        assert!(multi.remove_element(id).is_some());
        assert!(multi.remove_element(id).is_none());
        assert_eq!(multi.len(), 1);
    }
}
