//! Button that latches on and off

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, StrokeAlignment};
use log::warn;

use crate::ui::backend::TextSize;
use crate::ui::config::{ElementConfig, HJustify};
use crate::ui::constants::BUTTON_HEIGHT_FACTOR;
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{CallbackFlow, CallbackKind, Dimensions, EventState, InputEvent};
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::UiResult;
use crate::ui::styling::{BLACK, Background, GRAY, LBLUE, LIGHT_GRAY, MBLUE};
use crate::ui::surface::{BitmapHandle, Surface};

use super::label::justify_in;

const CAPTION_CAPACITY: usize = 32;

type Caption = heapless::String<CAPTION_CAPACITY>;

/// Copy as much of `text` as fits, cutting on a char boundary
fn fill_caption(caption: &mut Caption, text: &str) {
    caption.clear();
    let mut end = text.len().min(CAPTION_CAPACITY);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    if end < text.len() {
        warn!(
            "Button caption truncated to {} of {} bytes",
            end,
            text.len()
        );
    }
    // `end` never exceeds the capacity
    let _ = caption.push_str(&text[..end]);
}

/// Face and outline colours of a button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonColors {
    pub normal: Rgb565,
    pub pressed: Rgb565,
    pub activated: Rgb565,
    pub border: Rgb565,
    pub text: Rgb565,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: LIGHT_GRAY,
            pressed: MBLUE,
            activated: LBLUE,
            border: GRAY,
            text: BLACK,
        }
    }
}

/// Push-on/push-off button
///
/// A press inside raises `OnClick`; releasing inside raises `OnClicked` and
/// then `OnActivated` or `OnDeactivated` as the latch flips.
pub struct ToggleButton {
    base: ElementBase,
    text: Caption,
    font: TextSize,
    colors: ButtonColors,
    activated: bool,
    pressed: bool,
    click_origin: bool,
}

impl ToggleButton {
    pub fn new(text: &str) -> Self {
        let mut label = Caption::new();
        fill_caption(&mut label, text);

        Self {
            base: ElementBase::new("ToggleButton").with_background(Background::transparent()),
            text: label,
            font: TextSize::Medium,
            colors: ButtonColors::default(),
            activated: false,
            pressed: false,
            click_origin: false,
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

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        fill_caption(&mut self.text, text);
        self.base.request_redraw();
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Latch on without raising callbacks
    pub fn activate(&mut self) {
        if !self.activated {
            self.activated = true;
            self.base.request_redraw();
        }
    }

    /// Latch off without raising callbacks
    pub fn deactivate(&mut self) {
        if self.activated {
            self.activated = false;
            self.base.request_redraw();
        }
    }

    fn face(&self) -> Rgb565 {
        if self.pressed {
            self.colors.pressed
        } else if self.activated {
            self.colors.activated
        } else {
            self.colors.normal
        }
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let area = Rectangle::new(Point::zero(), surface.size());
        let style = PrimitiveStyle::with_fill(self.face());
        let Ok(()) = area.into_styled(style).draw(surface);
        let mut outline = PrimitiveStyle::with_stroke(self.colors.border, 1);
        outline.stroke_alignment = StrokeAlignment::Inside;
        let Ok(()) = area.into_styled(outline).draw(surface);

        if !self.text.is_empty() {
            let glyphs = ctx
                .fonts()?
                .render_text(&self.text, self.font, self.colors.text)?;
            surface.blit(&glyphs, justify_in(glyphs.size(), area, HJustify::Center));
        }
        Ok(())
    }

    fn raise(&mut self, kind: CallbackKind) -> Option<EventState> {
        match self.base.trigger(kind) {
            CallbackFlow::Release => Some(EventState::ObjectFreed),
            CallbackFlow::Continue => None,
        }
    }
}

impl Element for ToggleButton {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        let fonts = ctx.fonts()?;
        let text = if self.text.is_empty() { " " } else { self.text.as_str() };
        let extent = fonts.measure(text, self.font);
        Ok(Dimensions::new(
            extent.width + fonts.em_width(self.font),
            (BUTTON_HEIGHT_FACTOR * fonts.line_height(self.font) as f32) as i32,
        ))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        match *event {
            InputEvent::MouseDown { point, .. } if self.base.contains(point) => {
                self.click_origin = true;
                self.pressed = true;
                ctx.take_focus(self.base.window(), self.base.id());
                self.base.request_redraw();
                self.raise(CallbackKind::OnClick)
                    .unwrap_or(EventState::Captured)
            }
            InputEvent::MouseUp { point, .. } if self.click_origin => {
                self.click_origin = false;
                self.pressed = false;
                self.base.request_redraw();
                if !self.base.contains(point) {
                    return EventState::Captured;
                }
                if let Some(freed) = self.raise(CallbackKind::OnClicked) {
                    return freed;
                }
                self.activated = !self.activated;
                let kind = if self.activated {
                    CallbackKind::OnActivated
                } else {
                    CallbackKind::OnDeactivated
                };
                self.raise(kind).unwrap_or(EventState::Captured)
            }
            InputEvent::MouseMotion { point } if self.click_origin => {
                let inside = self.base.contains(point);
                if inside != self.pressed {
                    self.pressed = inside;
                    self.base.request_redraw();
                }
                EventState::Captured
            }
            _ => EventState::NotCaptured,
        }
    }

    fn defocus(&mut self) {
        if self.pressed || self.click_origin {
            self.pressed = false;
            self.click_origin = false;
            self.base.request_redraw();
        }
    }
}
