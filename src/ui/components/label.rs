//! Single-line text element

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_layout::align::{Align, horizontal, vertical};

use crate::ui::backend::TextSize;
use crate::ui::config::{ElementConfig, HJustify};
use crate::ui::context::RenderContext;
use crate::ui::core::Dimensions;
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::UiResult;
use crate::ui::styling::{BLACK, Background};
use crate::ui::surface::{BitmapHandle, Surface};

/// Top-left corner that places `content` inside `area`, vertically centred
pub(crate) fn justify_in(content: Size, area: Rectangle, justify: HJustify) -> Point {
    let content = Rectangle::new(Point::zero(), content);
    let placed = match justify {
        HJustify::Left => content.align_to(&area, horizontal::Left, vertical::Center),
        HJustify::Right => content.align_to(&area, horizontal::Right, vertical::Center),
        HJustify::Center | HJustify::Default => {
            content.align_to(&area, horizontal::Center, vertical::Center)
        }
    };
    placed.top_left
}

/// Text drawn with a single font and colour
///
/// # Examples
/// ```ignore
/// let label = Label::new("Temperature")
///     .with_font(TextSize::Large)
///     .with_justify(HJustify::Left);
/// ```
pub struct Label {
    base: ElementBase,
    text: String,
    font: TextSize,
    color: Rgb565,
    justify: HJustify,
}

impl Label {
    pub fn new(text: &str) -> Self {
        Self {
            base: ElementBase::new("Label").with_background(Background::transparent()),
            text: text.to_owned(),
            font: TextSize::Medium,
            color: BLACK,
            justify: HJustify::Center,
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

    pub fn with_font(mut self, font: TextSize) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    /// Placement of the text when the label is wider than its text
    pub fn with_justify(mut self, justify: HJustify) -> Self {
        self.justify = justify;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.base.request_redraw();
        }
    }

    pub fn font(&self) -> TextSize {
        self.font
    }

    pub fn set_font(&mut self, font: TextSize) {
        self.font = font;
        self.base.request_redraw();
    }

    pub fn set_color(&mut self, color: Rgb565) {
        self.color = color;
        self.base.request_redraw();
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let glyphs = ctx.fonts()?.render_text(&self.text, self.font, self.color)?;
        let area = Rectangle::new(Point::zero(), surface.size());
        surface.blit(&glyphs, justify_in(glyphs.size(), area, self.justify));
        Ok(())
    }
}

impl Element for Label {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        Ok(ctx.fonts()?.measure(&self.text, self.font))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }
}
