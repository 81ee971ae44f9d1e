//! Rotating and scaling single-child container

use embedded_graphics::prelude::*;
use log::warn;

use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{Dimensions, EventState, InputEvent};
use crate::ui::element::{
    Element, ElementBase, measure, place_child, render_cached, settle_visibility,
};
use crate::ui::error::UiResult;
use crate::ui::styling::Background;
use crate::ui::surface::{BitmapHandle, Surface};

use super::container::{Container, ContainerBase, ContainerKind, finish_capture};

/// Renders one child, then rotates (clockwise, degrees) and scales its
/// bitmap before compositing
///
/// Width and height are swapped at 90° and 270°; any other angle keeps the
/// child's orientation for sizing purposes.
pub struct Transformer {
    base: ElementBase,
    container: ContainerBase,
    rotation: f32,
    scaling: f32,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("Transformer").with_background(Background::transparent()),
            container: ContainerBase::new(ContainerKind::SingleChild),
            rotation: 0.0,
            scaling: 1.0,
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scaling(mut self, factor: f32) -> Self {
        self.scaling = factor;
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

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scaling(&self) -> f32 {
        self.scaling
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.base.force_redraw();
    }

    pub fn set_scaling(&mut self, factor: f32) {
        self.scaling = factor;
        self.base.force_redraw();
    }

    /// Whether the rotation is a quarter or three-quarter turn
    fn swaps_axes(&self) -> bool {
        let turn = self.rotation.rem_euclid(360.0);
        turn == 90.0 || turn == 270.0
    }

    fn orient(&self, size: Dimensions) -> Dimensions {
        if self.swaps_axes() { size.swapped() } else { size }
    }

    fn scale(&self, size: Dimensions) -> Dimensions {
        Dimensions::new(
            (size.width as f32 * self.scaling) as i32,
            (size.height as f32 * self.scaling) as i32,
        )
    }

    fn redraw(&mut self, surface: &mut Surface, ctx: &RenderContext<'_>) -> UiResult<()> {
        let size = self.base.size();
        let justify = (self.container.h_justify(), self.container.v_justify());
        let location = self.base.location();
        let rotation = self.rotation;
        let scaling = self.scaling;
        let inner = if scaling > 0.0 {
            let unrotated = self.orient(size);
            Dimensions::new(
                (unrotated.width as f32 / scaling) as i32,
                (unrotated.height as f32 / scaling) as i32,
            )
        } else {
            Dimensions::ZERO
        };

        let Some(child) = self.container.element_mut().filter(|c| c.is_shown()) else {
            settle_visibility(self.container.elements_mut());
            return Ok(());
        };

        let child_ctx = ctx.descend()?;
        let min = measure(child, &child_ctx)?;
        let cfg = *child.base().config();
        let pad = cfg.padding;
        let width = if cfg.h_fill {
            (inner.width - pad.horizontal()).max(0)
        } else {
            min.width
        };
        let height = if cfg.v_fill {
            (inner.height - pad.vertical()).max(0)
        } else {
            min.height
        };

        let transformed = child
            .render(Dimensions::new(width, height), &child_ctx)
            .and_then(|bitmap| bitmap.rotated(rotation)?.scaled(scaling));
        let bitmap = match transformed {
            Ok(bitmap) => bitmap,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Skipping {} {}: {}", child.kind(), child.id().raw(), e);
                settle_visibility(self.container.elements_mut());
                return Ok(());
            }
        };

        let out = bitmap.size();
        let x = cfg.h_justify.resolve(justify.0).offset(
            size.width,
            out.width as i32,
            pad.left as i32,
            pad.right as i32,
        );
        let y = cfg.v_justify.resolve(justify.1).offset(
            size.height,
            out.height as i32,
            pad.top as i32,
            pad.bottom as i32,
        );
        place_child(child, Point::new(x, y), location)?;
        surface.blit(&bitmap, Point::new(x, y));
        settle_visibility(self.container.elements_mut());
        Ok(())
    }
}

impl Container for Transformer {
    fn container(&self) -> &ContainerBase {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ContainerBase {
        &mut self.container
    }
}

impl Element for Transformer {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        let Some(child) = self.container.element().filter(|c| c.is_shown()) else {
            return Ok(Dimensions::ZERO);
        };
        let min = measure(child, &ctx.descend()?)?;
        let pad = child.base().config().padding;
        let padded = Dimensions::new(min.width + pad.horizontal(), min.height + pad.vertical());
        Ok(self.scale(self.orient(padded)))
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
