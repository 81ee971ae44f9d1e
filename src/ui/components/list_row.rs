//! Selectable row for use inside a `ListGroup`
//!
//! A row lays its children out horizontally and tracks a small selection
//! state machine:
//!
//! - press inside an unselected row: `OnClick`, then `OnSelected`; the row
//!   takes input focus
//! - press on a selected row within [`DOUBLE_CLICK_TIMEOUT_MS`] of the
//!   previous press: `OnActivated` only
//! - release after a press that started inside: `OnClicked` if still inside
//! - Space/Return while selected: `OnActivated`
//! - losing focus: `OnDeselected`
//!
//! Every callback may release the row. When one does, the row returns
//! `ObjectFreed` immediately and leaves its state alone.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::constants::{DEFAULT_LIST_ROW_SPACING_PX, DOUBLE_CLICK_TIMEOUT_MS};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{CallbackFlow, CallbackKind, Dimensions, EventState, InputEvent, Key};
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::UiResult;
use crate::ui::layouts::{Axis, Container, ContainerBase, ContainerKind, LinearLayout};
use crate::ui::styling::{MBLUE, MLLWHITE, WHITE};
use crate::ui::surface::{BitmapHandle, Surface};

/// Row background colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListColors {
    pub selected: Rgb565,
    pub odd: Rgb565,
    pub even: Rgb565,
}

impl Default for ListColors {
    fn default() -> Self {
        Self {
            selected: MBLUE,
            odd: WHITE,
            even: MLLWHITE,
        }
    }
}

pub struct ListRow {
    base: ElementBase,
    container: ContainerBase,
    layout: LinearLayout,
    colors: ListColors,
    selectable: bool,
    selected: bool,
    click_origin: bool,
    is_odd: bool,
    last_click_ms: Option<u64>,
}

impl Default for ListRow {
    fn default() -> Self {
        Self::new()
    }
}

impl ListRow {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("ListRow")
                .with_config(ElementConfig::new().with_h_fill(true)),
            container: ContainerBase::new(ContainerKind::MultiChild),
            layout: LinearLayout::new(Axis::Horizontal, DEFAULT_LIST_ROW_SPACING_PX),
            colors: ListColors::default(),
            selectable: true,
            selected: false,
            click_origin: false,
            is_odd: true,
            last_click_ms: None,
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.layout.spacing = spacing as i32;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
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

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_odd(&self) -> bool {
        self.is_odd
    }

    pub(crate) fn set_odd(&mut self, odd: bool) {
        if self.is_odd != odd {
            self.is_odd = odd;
            self.base.request_redraw();
        }
    }

    pub fn colors(&self) -> ListColors {
        self.colors
    }

    pub fn set_colors(&mut self, colors: ListColors) {
        if self.colors != colors {
            self.colors = colors;
            self.base.request_redraw();
        }
    }

    /// Select or deselect, raising `OnSelected`/`OnDeselected` on a change
    pub fn set_selected(&mut self, selected: bool) -> CallbackFlow {
        if self.selected == selected {
            return CallbackFlow::Continue;
        }
        self.selected = selected;
        self.base.request_redraw();
        self.base.trigger(if selected {
            CallbackKind::OnSelected
        } else {
            CallbackKind::OnDeselected
        })
    }

    fn fill_color(&self) -> Rgb565 {
        if self.selected {
            self.colors.selected
        } else if self.is_odd {
            self.colors.odd
        } else {
            self.colors.even
        }
    }

    fn raise(&mut self, kind: CallbackKind) -> Option<EventState> {
        match self.base.trigger(kind) {
            CallbackFlow::Release => Some(EventState::ObjectFreed),
            CallbackFlow::Continue => None,
        }
    }

    fn is_double_click(&self, now_ms: u64) -> bool {
        self.selected
            && self
                .last_click_ms
                .is_some_and(|last| now_ms.saturating_sub(last) < DOUBLE_CLICK_TIMEOUT_MS)
    }

    fn press(&mut self, ctx: &mut EventContext<'_>) -> EventState {
        let now = ctx.now_ms();
        if self.is_double_click(now) {
            self.last_click_ms = None;
            return self
                .raise(CallbackKind::OnActivated)
                .unwrap_or(EventState::Captured);
        }

        let newly_selected = !self.selected;
        self.click_origin = true;
        self.selected = true;
        self.last_click_ms = Some(now);
        ctx.take_focus(self.base.window(), self.base.id());
        self.base.request_redraw();

        if let Some(freed) = self.raise(CallbackKind::OnClick) {
            return freed;
        }
        if newly_selected && let Some(freed) = self.raise(CallbackKind::OnSelected) {
            return freed;
        }
        EventState::Captured
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let area = Rectangle::new(Point::zero(), surface.size());
        surface.fill_rect(&area, self.fill_color());
        let size = self.base.size();
        let justify = (self.container.h_justify(), self.container.v_justify());
        let location = self.base.location();
        self.layout.compose(
            self.container.elements_mut(),
            size,
            justify,
            location,
            surface,
            ctx,
        )
    }
}

impl Container for ListRow {
    fn container(&self) -> &ContainerBase {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ContainerBase {
        &mut self.container
    }
}

impl Element for ListRow {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        self.layout.min_size(self.container.elements(), ctx)
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }

    /// Children of a row never see events; the row reacts as a whole
    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        if !self.selectable {
            return EventState::NotCaptured;
        }
        match *event {
            InputEvent::MouseDown { point, .. } if self.base.contains(point) => self.press(ctx),
            InputEvent::MouseUp { point, .. } if self.click_origin => {
                self.click_origin = false;
                self.base.request_redraw();
                if self.base.contains(point)
                    && let Some(freed) = self.raise(CallbackKind::OnClicked)
                {
                    return freed;
                }
                EventState::Captured
            }
            InputEvent::KeyDown(Key::Space | Key::Return) if self.selected => self
                .raise(CallbackKind::OnActivated)
                .unwrap_or(EventState::Captured),
            _ => EventState::NotCaptured,
        }
    }

    fn defocus(&mut self) {
        self.click_origin = false;
        if self.selected {
            // a release here has nothing left to stop
            let _ = self.set_selected(false);
        }
    }

    fn children(&self) -> &[Box<dyn Element>] {
        self.container.elements()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Element>] {
        self.container.elements_mut()
    }
}
