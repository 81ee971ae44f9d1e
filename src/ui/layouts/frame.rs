//! Bordered single-child container

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};

use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::constants::{DEFAULT_BORDER_THICKNESS_PX, EMPTY_FRAME_SIZE_PX};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{Dimensions, EventState, InputEvent};
use crate::ui::element::{
    Element, ElementBase, compose_child, measure, render_cached, settle_visibility,
};
use crate::ui::error::UiResult;
use crate::ui::styling::{Background, DARK_GRAY};
use crate::ui::surface::{BitmapHandle, Surface};

use super::container::{Container, ContainerBase, ContainerKind, finish_capture};

/// Draws a border of fixed thickness around one child
pub struct Frame {
    base: ElementBase,
    container: ContainerBase,
    thickness: u32,
    color: Rgb565,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("Frame"),
            container: ContainerBase::new(ContainerKind::SingleChild),
            thickness: DEFAULT_BORDER_THICKNESS_PX,
            color: DARK_GRAY,
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

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
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

    /// Builder form of [`Container::set_element`]
    pub fn with_element(mut self, element: impl Element + 'static) -> UiResult<Self> {
        self.set_element(Box::new(element))?;
        Ok(self)
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: u32) {
        self.thickness = thickness;
        self.base.request_redraw();
    }

    pub fn set_color(&mut self, color: Rgb565) {
        self.color = color;
        self.base.request_redraw();
    }

    fn visible_child(&self) -> Option<&dyn Element> {
        self.container.element().filter(|c| c.is_shown())
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let size = self.base.size();
        if self.thickness > 0 {
            let style = PrimitiveStyleBuilder::new()
                .stroke_color(self.color)
                .stroke_width(self.thickness)
                .stroke_alignment(StrokeAlignment::Inside)
                .build();
            let border = Rectangle::new(Point::zero(), surface.size());
            let Ok(()) = border.into_styled(style).draw(surface);
        }

        let t = self.thickness as i32;
        let justify = (self.container.h_justify(), self.container.v_justify());
        let location = self.base.location();
        let Some(child) = self.container.element_mut().filter(|c| c.is_shown()) else {
            settle_visibility(self.container.elements_mut());
            return Ok(());
        };

        let child_ctx = ctx.descend()?;
        let min = measure(child, &child_ctx)?;
        let cfg = *child.base().config();
        let pad = cfg.padding;

        let width = if cfg.h_fill {
            (size.width - (2 * t + pad.horizontal())).max(0)
        } else {
            min.width
        };
        let height = if cfg.v_fill {
            (size.height - (2 * t + pad.vertical())).max(0)
        } else {
            min.height
        };
        let x = cfg.h_justify.resolve(justify.0).offset(
            size.width,
            width,
            t + pad.left as i32,
            t + pad.right as i32,
        );
        let y = cfg.v_justify.resolve(justify.1).offset(
            size.height,
            height,
            t + pad.top as i32,
            t + pad.bottom as i32,
        );

        compose_child(
            child,
            Point::new(x, y),
            Dimensions::new(width, height),
            location,
            surface,
            &child_ctx,
        )?;
        settle_visibility(self.container.elements_mut());
        Ok(())
    }
}

impl Container for Frame {
    fn container(&self) -> &ContainerBase {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ContainerBase {
        &mut self.container
    }
}

impl Element for Frame {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        let Some(child) = self.visible_child() else {
            return Ok(Dimensions::new(EMPTY_FRAME_SIZE_PX, EMPTY_FRAME_SIZE_PX));
        };
        let min = measure(child, &ctx.descend()?)?;
        let pad = child.base().config().padding;
        let border = 2 * self.thickness as i32;
        Ok(Dimensions::new(
            min.width + border + pad.horizontal(),
            min.height + border + pad.vertical(),
        ))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::element::testing::Swatch;
    use crate::ui::styling::Padding;

    #[test]
    fn test_empty_frame_placeholder() {
        let ctx = RenderContext::new();
        let frame = Frame::new();
        assert_eq!(
            frame.min_size(&ctx).unwrap(),
            Dimensions::new(EMPTY_FRAME_SIZE_PX, EMPTY_FRAME_SIZE_PX)
        );
    }

    #[test]
    fn test_hidden_child_uses_placeholder() {
        let ctx = RenderContext::new();
        let frame = Frame::new()
            .with_element(Swatch::new(50, 50).with_config(ElementConfig::new().with_show(false)))
            .unwrap();
        assert_eq!(
            frame.min_size(&ctx).unwrap(),
            Dimensions::new(EMPTY_FRAME_SIZE_PX, EMPTY_FRAME_SIZE_PX)
        );
    }

    #[test]
    fn test_min_size_adds_border_and_padding() {
        let ctx = RenderContext::new();
        let frame = Frame::new()
            .with_thickness(3)
            .with_element(
                Swatch::new(10, 8)
                    .with_config(ElementConfig::new().with_padding(Padding::new(1, 2, 3, 4))),
            )
            .unwrap();
        assert_eq!(frame.min_size(&ctx).unwrap(), Dimensions::new(10 + 6 + 6, 8 + 6 + 4));
    }

    #[test]
    fn test_border_and_centred_child() {
        let ctx = RenderContext::new();
        let mut frame = Frame::new()
            .with_background(Background::transparent())
            .with_element(Swatch::new(2, 2))
            .unwrap();
        let bitmap = frame.render(Dimensions::new(10, 10), &ctx).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(DARK_GRAY));
        assert_eq!(bitmap.pixel(9, 5), Some(DARK_GRAY));
        assert_eq!(bitmap.pixel(1, 1), None);
        assert_eq!(bitmap.pixel(4, 4), Some(Rgb565::RED));
        assert_eq!(frame.children()[0].base().relative_location(), Point::new(4, 4));
    }

    #[test]
    fn test_filling_child_gets_interior() {
        let ctx = RenderContext::new();
        let mut frame = Frame::new()
            .with_thickness(2)
            .with_element(Swatch::new(1, 1).with_config(ElementConfig::new().fill_all()))
            .unwrap();
        frame.render(Dimensions::new(20, 12), &ctx).unwrap();
        let child = frame.children()[0].base();
        assert_eq!(child.size(), Dimensions::new(16, 8));
        assert_eq!(child.relative_location(), Point::new(2, 2));
    }
}
