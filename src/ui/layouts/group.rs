//! Horizontal and vertical groups

use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::constants::{DEFAULT_HGROUP_SPACING_PX, DEFAULT_VGROUP_SPACING_PX};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{Dimensions, EventState, InputEvent};
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::UiResult;
use crate::ui::styling::Background;
use crate::ui::surface::BitmapHandle;

use super::container::{Container, ContainerBase, ContainerKind, finish_capture};
use super::linear::{Axis, LinearLayout};

macro_rules! linear_group {
    ($(#[$meta:meta])* $name:ident, $axis:expr, $spacing:expr) => {
        $(#[$meta])*
        pub struct $name {
            base: ElementBase,
            container: ContainerBase,
            layout: LinearLayout,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    base: ElementBase::new(stringify!($name)),
                    container: ContainerBase::new(ContainerKind::MultiChild),
                    layout: LinearLayout::new($axis, $spacing),
                }
            }

            pub fn with_config(mut self, config: ElementConfig) -> Self {
                self.base = self.base.with_config(config);
                self
            }

            pub fn with_background(mut self, background: Background) -> Self {
                self.base = self.base.with_background(background);
                self
            }

            pub fn with_spacing(mut self, spacing: u32) -> Self {
                self.layout.spacing = spacing as i32;
                self
            }

            pub fn with_h_justify(mut self, justify: HJustify) -> Self {
                self.container.set_h_justify(justify);
                self
            }

            pub fn with_v_justify(mut self, justify: VJustify) -> Self {
                self.container.set_v_justify(justify);
                self
            }

            /// Builder form of [`Container::add_element`]
            pub fn with_element(mut self, element: impl Element + 'static) -> UiResult<Self> {
                self.add_element(Box::new(element))?;
                Ok(self)
            }

            pub fn spacing(&self) -> u32 {
                self.layout.spacing as u32
            }

            pub fn set_spacing(&mut self, spacing: u32) {
                if self.layout.spacing != spacing as i32 {
                    self.layout.spacing = spacing as i32;
                    self.base.request_redraw();
                }
            }
        }

        impl Container for $name {
            fn container(&self) -> &ContainerBase {
                &self.container
            }

            fn container_mut(&mut self) -> &mut ContainerBase {
                &mut self.container
            }
        }

        impl Element for $name {
            fn base(&self) -> &ElementBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut ElementBase {
                &mut self.base
            }

            fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
                self.layout.min_size(self.container.elements(), ctx)
            }

            fn render(
                &mut self,
                requested: Dimensions,
                ctx: &RenderContext<'_>,
            ) -> UiResult<BitmapHandle> {
                render_cached(self, requested, ctx, |group, surface, ctx| {
                    let justify = (group.container.h_justify(), group.container.v_justify());
                    let location = group.base.location();
                    let size = group.base.size();
                    group.layout.compose(
                        group.container.elements_mut(),
                        size,
                        justify,
                        location,
                        surface,
                        ctx,
                    )
                })
            }

            fn capture_event(
                &mut self,
                event: &InputEvent,
                ctx: &mut EventContext<'_>,
            ) -> EventState {
                let state = self.container.capture_event(event, ctx);
                finish_capture(self, state)
            }

            fn defocus(&mut self) {
                self.container.defocus();
            }

            fn children(&self) -> &[Box<dyn Element>] {
                self.container.elements()
            }

            fn children_mut(&mut self) -> &mut [Box<dyn Element>] {
                self.container.elements_mut()
            }
        }
    };
}

linear_group!(
    /// Lays its children out left to right
    HGroup,
    Axis::Horizontal,
    DEFAULT_HGROUP_SPACING_PX
);

linear_group!(
    /// Lays its children out top to bottom
    VGroup,
    Axis::Vertical,
    DEFAULT_VGROUP_SPACING_PX
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::backend::MonoFontBackend;
    use crate::ui::components::ToggleButton;
    use crate::ui::core::WindowId;
    use crate::ui::element::testing::Swatch;
    use crate::ui::element::{find, find_mut};
    use crate::ui::focus::FocusTracker;
    use crate::ui::core::{CallbackFlow, CallbackKind, MouseButton};
    use embedded_graphics::prelude::*;
    use crate::ui::core::Dimensions;
    use std::rc::Rc;

    #[test]
    fn test_hgroup_min_size() {
        let ctx = RenderContext::new();
        let group = HGroup::new()
            .with_element(Swatch::new(10, 4))
            .unwrap()
            .with_element(Swatch::new(20, 6))
            .unwrap();
        assert_eq!(
            group.min_size(&ctx).unwrap(),
            Dimensions::new(10 + 20 + DEFAULT_HGROUP_SPACING_PX, 6)
        );
    }

    #[test]
    fn test_vgroup_stacks_vertically() {
        let ctx = RenderContext::new();
        let group = VGroup::new()
            .with_spacing(4)
            .with_element(Swatch::new(10, 4))
            .unwrap()
            .with_element(Swatch::new(20, 6))
            .unwrap();
        assert_eq!(group.min_size(&ctx).unwrap(), Dimensions::new(20, 14));
    }

    #[test]
    fn test_empty_group_renders_background_only() {
        let ctx = RenderContext::new();
        let mut group = HGroup::new();
        assert_eq!(group.min_size(&ctx).unwrap(), Dimensions::ZERO);
        let bitmap = group.render(Dimensions::new(5, 5), &ctx).unwrap();
        assert_eq!(bitmap.size(), Size::new(5, 5));
        assert!(bitmap.pixel(2, 2).is_some());
    }

    #[test]
    fn test_child_change_invalidates_group_cache() {
        let ctx = RenderContext::new();
        let mut group = HGroup::new().with_element(Swatch::new(4, 4)).unwrap();
        let child_id = group.children()[0].id();
        let first = group.render(Dimensions::new(10, 4), &ctx).unwrap();
        let again = group.render(Dimensions::new(10, 4), &ctx).unwrap();
        assert!(Rc::ptr_eq(&first, &again));

        find_mut(&mut group, child_id).unwrap().request_redraw();
        assert!(group.needs_redraw());
        let redrawn = group.render(Dimensions::new(10, 4), &ctx).unwrap();
        assert!(!Rc::ptr_eq(&first, &redrawn));
    }

    #[test]
    fn test_visibility_toggle_reflows_group() {
        let ctx = RenderContext::new();
        let mut group = HGroup::new()
            .with_element(Swatch::new(4, 4))
            .unwrap()
            .with_element(Swatch::new(4, 4))
            .unwrap();
        group.render(Dimensions::ZERO, &ctx).unwrap();
        group.children_mut()[1].base_mut().set_shown(false);
        assert!(group.needs_redraw());
        assert_eq!(group.min_size(&ctx).unwrap(), Dimensions::new(4, 4));
        group.render(Dimensions::ZERO, &ctx).unwrap();
        assert!(!group.needs_redraw());
    }

    #[test]
    fn test_set_window_reaches_nested_children() {
        let inner = VGroup::new().with_element(Swatch::new(1, 1)).unwrap();
        let mut outer = HGroup::new().with_element(inner).unwrap();
        outer.set_window(crate::ui::core::WindowId(3), 0).unwrap();
        let leaf = &outer.children()[0].children()[0];
        assert_eq!(leaf.base().window(), Some(crate::ui::core::WindowId(3)));
        assert!(find(&outer, leaf.id()).is_some());
    }

    #[test]
    fn test_cached_nested_group_follows_its_new_position() {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let inner = VGroup::new().with_element(ToggleButton::new("Go")).unwrap();
        let mut outer = HGroup::new()
            .with_element(Swatch::new(60, 4))
            .unwrap()
            .with_element(inner)
            .unwrap();
        outer.set_window(WindowId(1), 0).unwrap();
        outer.render(Dimensions::ZERO, &ctx).unwrap();
        let button_at = |group: &HGroup| group.children()[1].children()[0].base().location();
        assert_eq!(
            button_at(&outer),
            Point::new(60 + DEFAULT_HGROUP_SPACING_PX, 0)
        );

        outer.children_mut()[0].base_mut().set_shown(false);
        outer.render(Dimensions::ZERO, &ctx).unwrap();
        assert_eq!(outer.children()[1].base().location(), Point::zero());
        assert_eq!(button_at(&outer), Point::zero());

        let mut tracker = FocusTracker::default();
        let mut events = EventContext::new(&mut tracker, 0);
        let press = InputEvent::MouseDown {
            point: Point::new(2, 2),
            button: MouseButton::Left,
        };
        assert_eq!(outer.capture_event(&press, &mut events), EventState::Captured);
    }

    struct Releasing {
        base: ElementBase,
    }

    impl Element for Releasing {
        fn base(&self) -> &ElementBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ElementBase {
            &mut self.base
        }

        fn min_size(&self, _ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
            Ok(Dimensions::new(1, 1))
        }

        fn render(
            &mut self,
            requested: Dimensions,
            ctx: &RenderContext<'_>,
        ) -> UiResult<BitmapHandle> {
            render_cached(self, requested, ctx, |_, _, _| Ok(()))
        }

        fn capture_event(&mut self, _event: &InputEvent, _ctx: &mut EventContext<'_>) -> EventState {
            if self.base.trigger(CallbackKind::OnClick) == CallbackFlow::Release {
                return EventState::ObjectFreed;
            }
            EventState::Captured
        }
    }

    #[test]
    fn test_released_child_is_removed() {
        let mut releasing = Releasing {
            base: ElementBase::new("Releasing"),
        };
        releasing
            .base
            .on(CallbackKind::OnClick, |_| CallbackFlow::Release);
        let mut group = VGroup::new()
            .with_element(releasing)
            .unwrap()
            .with_element(Swatch::new(1, 1))
            .unwrap();

        let mut tracker = FocusTracker::default();
        let mut ctx = EventContext::new(&mut tracker, 0);
        let event = InputEvent::MouseDown {
            point: Point::zero(),
            button: MouseButton::Left,
        };
        assert_eq!(group.capture_event(&event, &mut ctx), EventState::Captured);
        assert_eq!(group.element_count(), 1);
        assert!(group.base().is_dirty());
    }
}
