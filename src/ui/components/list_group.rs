//! Bordered list of selectable rows
//!
//! Rows are added only through [`ListGroup::add_row`]; the generic
//! container API is rejected. The group coordinates selection across its
//! rows: a newly selected row deselects all others, and Up/Down move the
//! selection to the adjacent visible row once the list is active.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use log::debug;

use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::constants::{
    DEFAULT_BORDER_THICKNESS_PX, DEFAULT_LIST_GROUP_SPACING_PX, LIST_GROUP_INSET_PX,
    LIST_GROUP_MIN_SIZE_PX,
};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{CallbackFlow, Dimensions, ElementId, EventState, InputEvent, Key};
use crate::ui::element::{Element, ElementBase, downcast_mut, downcast_ref, render_cached};
use crate::ui::error::UiResult;
use crate::ui::layouts::{Axis, Container, ContainerBase, ContainerKind, LinearLayout};
use crate::ui::styling::{Background, DARK_GRAY, WHITE};
use crate::ui::surface::{BitmapHandle, Surface};

use super::list_row::{ListColors, ListRow};

pub struct ListGroup {
    base: ElementBase,
    container: ContainerBase,
    layout: LinearLayout,
    colors: ListColors,
    border_color: Rgb565,
    border_width: u32,
    fit_content: bool,
}

impl Default for ListGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl ListGroup {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("ListGroup").with_background(Background::solid(WHITE)),
            container: ContainerBase::new(ContainerKind::NoDefaultAdd),
            layout: LinearLayout::new(Axis::Vertical, DEFAULT_LIST_GROUP_SPACING_PX),
            colors: ListColors::default(),
            border_color: DARK_GRAY,
            border_width: DEFAULT_BORDER_THICKNESS_PX,
            fit_content: false,
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn with_colors(mut self, colors: ListColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_border_color(mut self, color: Rgb565) -> Self {
        self.border_color = color;
        self
    }

    pub fn with_border_width(mut self, width: u32) -> Self {
        self.border_width = width;
        self
    }

    /// Report the rows' combined size as the min-size instead of the 1x1
    /// placeholder; used for popups that are not sized by a parent
    pub fn with_fit_content(mut self, fit: bool) -> Self {
        self.fit_content = fit;
        self
    }

    /// Append a row, returning its id
    pub fn add_row(&mut self, mut row: ListRow) -> UiResult<ElementId> {
        let index = self.container.len();
        row.set_odd((index + 1) % 2 == 1);
        row.set_colors(self.colors);
        let id = row.id();
        self.container.push(Box::new(row), self.base.window())?;
        self.base.request_redraw();
        Ok(id)
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = ListRow>) -> UiResult<()> {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    /// Detach a row and restripe the rows after it
    pub fn remove_row(&mut self, id: ElementId) -> Option<Box<dyn Element>> {
        let removed = self.container.remove_element(id)?;
        self.restripe();
        self.base.request_redraw();
        Some(removed)
    }

    pub fn row_count(&self) -> usize {
        self.container.len()
    }

    pub fn row(&self, index: usize) -> Option<&ListRow> {
        let element = self.container.elements().get(index)?;
        downcast_ref::<ListRow>(element.as_ref()).ok()
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut ListRow> {
        let element = self.container.elements_mut().get_mut(index)?;
        downcast_mut::<ListRow>(element.as_mut()).ok()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (0..self.row_count()).find(|&i| self.row(i).is_some_and(|row| row.is_selected()))
    }

    pub fn set_colors(&mut self, colors: ListColors) {
        self.colors = colors;
        for index in 0..self.row_count() {
            if let Some(row) = self.row_mut(index) {
                row.set_colors(colors);
            }
        }
        self.base.request_redraw();
    }

    fn restripe(&mut self) {
        for index in 0..self.row_count() {
            if let Some(row) = self.row_mut(index) {
                row.set_odd((index + 1) % 2 == 1);
            }
        }
    }

    fn drop_released(&mut self, released: Vec<ElementId>) {
        for id in released {
            debug!("Row {} released during selection change", id.raw());
            self.remove_row(id);
        }
    }

    fn deselect_others(&mut self, keep: usize) {
        let mut released = Vec::new();
        for index in (0..self.row_count()).filter(|&i| i != keep) {
            if let Some(row) = self.row_mut(index)
                && row.set_selected(false) == CallbackFlow::Release
            {
                released.push(row.id());
            }
        }
        self.drop_released(released);
    }

    fn move_selection(&mut self, forward: bool, ctx: &mut EventContext<'_>) -> EventState {
        let visible: Vec<usize> = (0..self.row_count())
            .filter(|&i| self.row(i).is_some_and(|row| row.is_shown()))
            .collect();
        let Some(pos) = visible
            .iter()
            .position(|&i| self.row(i).is_some_and(|row| row.is_selected()))
        else {
            return EventState::NotCaptured;
        };
        let target = if forward {
            visible.get(pos + 1)
        } else {
            pos.checked_sub(1).and_then(|p| visible.get(p))
        };
        let Some(&target) = target else {
            return EventState::Captured;
        };

        let mut released = Vec::new();
        if let Some(row) = self.row_mut(visible[pos])
            && row.set_selected(false) == CallbackFlow::Release
        {
            released.push(row.id());
        }
        if let Some(row) = self.row_mut(target) {
            let flow = row.set_selected(true);
            ctx.take_focus(row.base().window(), row.id());
            if flow == CallbackFlow::Release {
                released.push(row.id());
            }
        }
        self.drop_released(released);
        self.base.request_redraw();
        EventState::Captured
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        if self.border_width > 0 {
            let style = PrimitiveStyleBuilder::new()
                .stroke_color(self.border_color)
                .stroke_width(self.border_width)
                .stroke_alignment(StrokeAlignment::Inside)
                .build();
            let border = Rectangle::new(Point::zero(), surface.size());
            let Ok(()) = border.into_styled(style).draw(surface);
        }

        let size = self.base.size();
        let inner = Dimensions::new(
            size.width - 2 * LIST_GROUP_INSET_PX,
            size.height - 2 * LIST_GROUP_INSET_PX,
        )
        .non_negative();
        let location = self.base.location();
        self.layout.compose_inset(
            self.container.elements_mut(),
            inner,
            (HJustify::Left, VJustify::Top),
            Point::new(LIST_GROUP_INSET_PX, LIST_GROUP_INSET_PX),
            location,
            surface,
            ctx,
        )
    }
}

impl Container for ListGroup {
    fn container(&self) -> &ContainerBase {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ContainerBase {
        &mut self.container
    }
}

impl Element for ListGroup {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        if !self.fit_content {
            return Ok(Dimensions::new(LIST_GROUP_MIN_SIZE_PX, LIST_GROUP_MIN_SIZE_PX));
        }
        let rows = self.layout.min_size(self.container.elements(), ctx)?;
        Ok(Dimensions::new(
            rows.width + 2 * LIST_GROUP_INSET_PX,
            rows.height + 2 * LIST_GROUP_INSET_PX,
        ))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        for index in 0..self.row_count() {
            let Some(row) = self.row_mut(index) else {
                continue;
            };
            if !row.is_shown() {
                continue;
            }
            let was_selected = row.is_selected();
            match row.capture_event(event, ctx) {
                EventState::NotCaptured => {}
                EventState::Captured => {
                    if !was_selected && row.is_selected() {
                        self.deselect_others(index);
                    }
                    self.base.set_active(true);
                    return EventState::Captured;
                }
                EventState::ObjectFreed => {
                    self.container.remove_at(index);
                    self.restripe();
                    self.base.request_redraw();
                    self.base.set_active(true);
                    return EventState::Captured;
                }
            }
        }

        match *event {
            InputEvent::KeyDown(Key::Up) if self.base.is_active() => {
                self.move_selection(false, ctx)
            }
            InputEvent::KeyDown(Key::Down) if self.base.is_active() => {
                self.move_selection(true, ctx)
            }
            _ => EventState::NotCaptured,
        }
    }

    fn defocus(&mut self) {
        self.base.set_active(false);
        self.container.defocus();
    }

    fn children(&self) -> &[Box<dyn Element>] {
        self.container.elements()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Element>] {
        self.container.elements_mut()
    }
}
