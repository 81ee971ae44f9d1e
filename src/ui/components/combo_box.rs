//! Drop-down selector
//!
//! Collapsed, the combo box shows the active entry next to an arrow box.
//! Releasing a click inside toggles the drop-down: while expanded a
//! [`ListGroup`] of the entries lives in the element's popup slot and sees
//! events before the box itself. Picking a row makes it the active entry and
//! collapses the list.

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Line, PrimitiveStyle, Rectangle, StrokeAlignment, Triangle,
};
use embedded_layout::align::{Align, horizontal, vertical};
use log::warn;

use crate::ui::backend::TextSize;
use crate::ui::config::{ElementConfig, HJustify};
use crate::ui::constants::BUTTON_HEIGHT_FACTOR;
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{CallbackFlow, CallbackKind, Dimensions, EventState, InputEvent, Key};
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::{UiError, UiResult};
use crate::ui::styling::Background;
use crate::ui::surface::{BitmapHandle, Surface};

use super::label::{Label, justify_in};
use super::list_group::ListGroup;
use super::list_row::ListRow;
use super::toggle_button::ButtonColors;

pub struct ComboBox {
    base: ElementBase,
    entries: Vec<String>,
    active: Option<usize>,
    font: TextSize,
    colors: ButtonColors,
    expanded: bool,
    click_origin: bool,
    picked: Rc<Cell<Option<usize>>>,
}

impl Default for ComboBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboBox {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("ComboBox").with_background(Background::transparent()),
            entries: Vec::new(),
            active: None,
            font: TextSize::Medium,
            colors: ButtonColors::default(),
            expanded: false,
            click_origin: false,
            picked: Rc::new(Cell::new(None)),
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn with_font(mut self, font: TextSize) -> Self {
        self.font = font;
        self
    }

    pub fn with_colors(mut self, colors: ButtonColors) -> Self {
        self.colors = colors;
        self
    }

    /// Builder form of [`add_entry`](Self::add_entry); the first entry
    /// becomes active
    pub fn with_entry(mut self, entry: &str) -> Self {
        self.add_entry(entry);
        self
    }

    pub fn add_entry(&mut self, entry: &str) {
        self.entries.push(entry.to_owned());
        if self.active.is_none() {
            self.active = Some(0);
        }
        self.base.request_redraw();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn set_active(&mut self, index: usize) -> UiResult<()> {
        if index >= self.entries.len() {
            return Err(UiError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        if self.active != Some(index) {
            self.active = Some(index);
            self.base.request_redraw();
        }
        Ok(())
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn build_popup(&self) -> UiResult<ListGroup> {
        let width = self.base.size().width.max(0) as u32;
        let mut list = ListGroup::new()
            .with_fit_content(true)
            .with_config(ElementConfig::new().with_min_width(width));

        for (index, entry) in self.entries.iter().enumerate() {
            let mut row = ListRow::new().with_element(
                Label::new(entry)
                    .with_font(self.font)
                    .with_color(self.colors.text),
            )?;
            for kind in [CallbackKind::OnClick, CallbackKind::OnActivated] {
                let picked = self.picked.clone();
                row.base_mut().on(kind, move |_| {
                    picked.set(Some(index));
                    CallbackFlow::Continue
                });
            }
            if self.active == Some(index) {
                row.set_selected(true);
            }
            list.add_row(row)?;
        }

        if let Some(window) = self.base.window() {
            list.set_window(window, 1)?;
        }
        Ok(list)
    }

    fn expand(&mut self) -> Option<EventState> {
        let list = match self.build_popup() {
            Ok(list) => list,
            Err(e) => {
                warn!("Combo box {} cannot open: {}", self.base.id().raw(), e);
                return None;
            }
        };
        self.base.set_popup(Some(Box::new(list)));
        self.expanded = true;
        self.raise(CallbackKind::OnExpanded)
    }

    fn collapse(&mut self) -> Option<EventState> {
        if !self.expanded {
            return None;
        }
        self.expanded = false;
        self.base.set_popup(None);
        self.picked.set(None);
        self.raise(CallbackKind::OnCollapsed)
    }

    fn raise(&mut self, kind: CallbackKind) -> Option<EventState> {
        match self.base.trigger(kind) {
            CallbackFlow::Release => Some(EventState::ObjectFreed),
            CallbackFlow::Continue => None,
        }
    }

    /// Width reserved for the widest entry
    fn text_width(&self, ctx: &RenderContext<'_>) -> UiResult<i32> {
        let fonts = ctx.fonts()?;
        Ok(self
            .entries
            .iter()
            .map(|e| fonts.measure(e, self.font).width)
            .chain(core::iter::once(fonts.measure(" ", self.font).width))
            .max()
            .unwrap_or(0))
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let area = Rectangle::new(Point::zero(), surface.size());
        let fill = if self.click_origin {
            self.colors.pressed
        } else {
            self.colors.normal
        };
        let Ok(()) = area.into_styled(PrimitiveStyle::with_fill(fill)).draw(surface);
        let mut outline = PrimitiveStyle::with_stroke(self.colors.border, 1);
        outline.stroke_alignment = StrokeAlignment::Inside;
        let Ok(()) = area.into_styled(outline).draw(surface);

        let side = area.size.height;
        let arrow_box = Rectangle::new(
            Point::new(area.size.width.saturating_sub(side) as i32, 0),
            Size::new(side, side),
        );
        let stroke = PrimitiveStyle::with_stroke(self.colors.border, 1);
        let Ok(()) = Line::new(
            arrow_box.top_left,
            arrow_box.top_left + Point::new(0, side as i32 - 1),
        )
        .into_styled(stroke)
        .draw(surface);

        let half = (side as i32 / 4).max(2);
        let arrow = if self.expanded {
            Triangle::new(Point::new(0, half), Point::new(2 * half, half), Point::new(half, 0))
        } else {
            Triangle::new(Point::zero(), Point::new(2 * half, 0), Point::new(half, half))
        };
        let Ok(()) = arrow
            .align_to(&arrow_box, horizontal::Center, vertical::Center)
            .into_styled(PrimitiveStyle::with_fill(self.colors.text))
            .draw(surface);

        if let Some(text) = self.active_entry() {
            let glyphs = ctx
                .fonts()?
                .render_text(text, self.font, self.colors.text)?;
            let margin = ctx.fonts()?.em_width(self.font) / 2;
            let text_area = Rectangle::new(
                Point::new(margin, 0),
                Size::new(arrow_box.top_left.x.saturating_sub(margin).max(0) as u32, side),
            );
            surface.blit(&glyphs, justify_in(glyphs.size(), text_area, HJustify::Left));
        }
        Ok(())
    }
}

impl Element for ComboBox {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        let fonts = ctx.fonts()?;
        let height = (BUTTON_HEIGHT_FACTOR * fonts.line_height(self.font) as f32) as i32;
        Ok(Dimensions::new(
            self.text_width(ctx)? + fonts.em_width(self.font) + 1 + height,
            height,
        ))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        if self.expanded
            && let Some(popup) = self.base.popup_mut()
        {
            let state = popup.capture_event(event, ctx);
            if let Some(index) = self.picked.take() {
                self.active = Some(index);
                self.base.request_redraw();
                return self.collapse().unwrap_or(EventState::Captured);
            }
            if state.is_captured() {
                return EventState::Captured;
            }
        }

        match *event {
            InputEvent::MouseDown { point, .. } if self.base.contains(point) => {
                self.click_origin = true;
                ctx.take_focus(self.base.window(), self.base.id());
                self.base.request_redraw();
                self.raise(CallbackKind::OnClick)
                    .unwrap_or(EventState::Captured)
            }
            InputEvent::MouseDown { .. } if self.expanded => {
                self.collapse().unwrap_or(EventState::NotCaptured)
            }
            InputEvent::MouseUp { point, .. } if self.click_origin => {
                self.click_origin = false;
                self.base.request_redraw();
                if !self.base.contains(point) {
                    return EventState::Captured;
                }
                if let Some(freed) = self.raise(CallbackKind::OnClicked) {
                    return freed;
                }
                let toggled = if self.expanded {
                    self.collapse()
                } else {
                    self.expand()
                };
                toggled.unwrap_or(EventState::Captured)
            }
            InputEvent::KeyDown(Key::Escape) if self.expanded => {
                self.collapse().unwrap_or(EventState::Captured)
            }
            _ => EventState::NotCaptured,
        }
    }

    fn defocus(&mut self) {
        self.click_origin = false;
        // nothing left to stop if a callback releases the box here
        let _ = self.collapse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::backend::MonoFontBackend;
    use crate::ui::core::{MouseButton, WindowId};
    use crate::ui::element::render_popups;
    use crate::ui::focus::FocusTracker;
    use std::cell::RefCell;

    fn click(combo: &mut ComboBox, point: Point, tracker: &mut FocusTracker) {
        let mut ctx = EventContext::new(tracker, 0);
        combo.capture_event(
            &InputEvent::MouseDown {
                point,
                button: MouseButton::Left,
            },
            &mut ctx,
        );
        combo.capture_event(
            &InputEvent::MouseUp {
                point,
                button: MouseButton::Left,
            },
            &mut ctx,
        );
    }

    fn combo() -> ComboBox {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let mut combo = ComboBox::new()
            .with_entry("Red")
            .with_entry("Green")
            .with_entry("Blue");
        combo.set_window(WindowId(1), 0).unwrap();
        combo.render(Dimensions::ZERO, &ctx).unwrap();
        combo
    }

    #[test]
    fn test_min_size_reserves_arrow_box() {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let combo = ComboBox::new().with_entry("Green");
        assert_eq!(
            combo.min_size(&ctx).unwrap(),
            Dimensions::new(30 + 6 + 1 + 15, 15)
        );
    }

    #[test]
    fn test_first_entry_is_active() {
        let combo = combo();
        assert_eq!(combo.active_entry(), Some("Red"));
        assert!(!combo.is_expanded());
    }

    #[test]
    fn test_set_active_bounds_checked() {
        let mut combo = combo();
        assert!(combo.set_active(2).is_ok());
        assert_eq!(combo.active_entry(), Some("Blue"));
        assert_eq!(
            combo.set_active(3),
            Err(UiError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_click_toggles_popup() {
        let mut combo = combo();
        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [CallbackKind::OnExpanded, CallbackKind::OnCollapsed] {
            let events = events.clone();
            combo.base_mut().on(kind, move |event| {
                events.borrow_mut().push(event.kind);
                CallbackFlow::Continue
            });
        }
        let mut tracker = FocusTracker::default();
        click(&mut combo, Point::new(2, 2), &mut tracker);
        assert!(combo.is_expanded());
        assert!(combo.base().popup().is_some());
        click(&mut combo, Point::new(2, 2), &mut tracker);
        assert!(!combo.is_expanded());
        assert!(combo.base().popup().is_none());
        assert_eq!(
            *events.borrow(),
            vec![CallbackKind::OnExpanded, CallbackKind::OnCollapsed]
        );
    }

    #[test]
    fn test_picking_popup_row_sets_entry() {
        let fonts = MonoFontBackend;
        let ctx = RenderContext::with_fonts(&fonts);
        let mut combo = combo();
        let mut tracker = FocusTracker::default();
        click(&mut combo, Point::new(2, 2), &mut tracker);

        let popups = render_popups(&mut combo, &ctx).unwrap();
        assert_eq!(popups.len(), 1);
        let (origin, bitmap) = &popups[0];
        assert_eq!(*origin, Point::new(0, combo.base().size().height));
        assert!(bitmap.size().width as i32 >= combo.base().size().width);

        // third row: inset 2 plus two rows of 10px labels
        let third = *origin + Point::new(4, 2 + 20 + 3);
        click(&mut combo, third, &mut tracker);
        assert_eq!(combo.active_entry(), Some("Blue"));
        assert!(!combo.is_expanded());
    }

    #[test]
    fn test_escape_collapses() {
        let mut combo = combo();
        let mut tracker = FocusTracker::default();
        click(&mut combo, Point::new(2, 2), &mut tracker);
        let mut ctx = EventContext::new(&mut tracker, 0);
        assert_eq!(
            combo.capture_event(&InputEvent::KeyDown(Key::Escape), &mut ctx),
            EventState::Captured
        );
        assert!(!combo.is_expanded());
    }
}
