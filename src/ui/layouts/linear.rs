//! One-axis layout shared by HGroup, VGroup, ListRow and ListGroup
//!
//! Sizing is negotiated in two steps. [`LinearLayout::min_size`] aggregates
//! child min-sizes bottom-up; [`LinearLayout::arrange`] hands out the real
//! main-axis space at render time:
//!
//! ```text
//! free   = W - sum(non-filling min + padding) - (n - 1) * spacing
//! px     = floor(free / sum(fill scales))
//! width  = px * scale - padding            (filling children)
//! ```
//!
//! Hidden children are skipped entirely and do not count towards gaps.

use embedded_graphics::prelude::*;

use crate::ui::config::{Align, ElementConfig, HJustify, VJustify};
use crate::ui::context::RenderContext;
use crate::ui::core::Dimensions;
use crate::ui::element::{Element, compose_child, measure, settle_visibility};
use crate::ui::error::UiResult;
use crate::ui::styling::Padding;
use crate::ui::surface::Surface;

/// Layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn main(self, size: Dimensions) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    pub fn cross(self, size: Dimensions) -> i32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    pub fn dimensions(self, main: i32, cross: i32) -> Dimensions {
        match self {
            Axis::Horizontal => Dimensions::new(main, cross),
            Axis::Vertical => Dimensions::new(cross, main),
        }
    }

    pub fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Axis::Horizontal => Point::new(main, cross),
            Axis::Vertical => Point::new(cross, main),
        }
    }

    fn fills_main(self, cfg: &ElementConfig) -> bool {
        match self {
            Axis::Horizontal => cfg.h_fill,
            Axis::Vertical => cfg.v_fill,
        }
    }

    fn fills_cross(self, cfg: &ElementConfig) -> bool {
        match self {
            Axis::Horizontal => cfg.v_fill,
            Axis::Vertical => cfg.h_fill,
        }
    }

    fn scale(self, cfg: &ElementConfig) -> f32 {
        match self {
            Axis::Horizontal => cfg.h_scale,
            Axis::Vertical => cfg.v_scale,
        }
    }

    /// (start, end) padding along the main axis
    fn main_padding(self, padding: &Padding) -> (i32, i32) {
        match self {
            Axis::Horizontal => (padding.left as i32, padding.right as i32),
            Axis::Vertical => (padding.top as i32, padding.bottom as i32),
        }
    }

    /// (start, end) padding along the cross axis
    fn cross_padding(self, padding: &Padding) -> (i32, i32) {
        match self {
            Axis::Horizontal => (padding.top as i32, padding.bottom as i32),
            Axis::Vertical => (padding.left as i32, padding.right as i32),
        }
    }

    fn cross_align(self, cfg: &ElementConfig, h: HJustify, v: VJustify) -> Align {
        match self {
            Axis::Horizontal => cfg.v_justify.resolve(v),
            Axis::Vertical => cfg.h_justify.resolve(h),
        }
    }
}

/// Final placement of one child, relative to the container origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub relative: Point,
    pub size: Dimensions,
}

/// Axis plus inter-child spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearLayout {
    pub axis: Axis,
    pub spacing: i32,
}

struct Measured<'a> {
    index: usize,
    cfg: &'a ElementConfig,
    min: Dimensions,
}

impl LinearLayout {
    pub fn new(axis: Axis, spacing: i32) -> Self {
        Self { axis, spacing }
    }

    fn measure_visible<'a>(
        children: &'a [Box<dyn Element>],
        ctx: &RenderContext<'_>,
    ) -> UiResult<Vec<Measured<'a>>> {
        let child_ctx = ctx.descend()?;
        let mut measured = Vec::new();
        for (index, child) in children.iter().enumerate() {
            if !child.is_shown() {
                continue;
            }
            measured.push(Measured {
                index,
                cfg: child.base().config(),
                min: measure(child.as_ref(), &child_ctx)?,
            });
        }
        Ok(measured)
    }

    fn gaps(&self, count: usize) -> i32 {
        (count.saturating_sub(1) as i32) * self.spacing
    }

    /// Aggregate min-size of the visible children
    pub fn min_size(
        &self,
        children: &[Box<dyn Element>],
        ctx: &RenderContext<'_>,
    ) -> UiResult<Dimensions> {
        let axis = self.axis;
        let measured = Self::measure_visible(children, ctx)?;

        let mut cross = 0;
        let mut max_fill_main = 0;
        for m in &measured {
            let (cs, ce) = axis.cross_padding(&m.cfg.padding);
            cross = cross.max(axis.cross(m.min) + cs + ce);
            if axis.fills_main(m.cfg) {
                max_fill_main = max_fill_main.max(axis.main(m.min));
            }
        }

        // filled shares are summed unrounded and truncated once
        let mut main = self.gaps(measured.len());
        let mut filled = 0.0_f32;
        for m in &measured {
            let (ms, me) = axis.main_padding(&m.cfg.padding);
            main += ms + me;
            if axis.fills_main(m.cfg) {
                filled += axis.scale(m.cfg) * max_fill_main as f32;
            } else {
                main += axis.main(m.min);
            }
        }

        Ok(axis.dimensions(main + filled as i32, cross))
    }

    /// Compute every visible child's rectangle inside `size`
    pub fn arrange(
        &self,
        children: &[Box<dyn Element>],
        size: Dimensions,
        justify: (HJustify, VJustify),
        ctx: &RenderContext<'_>,
    ) -> UiResult<Vec<Slot>> {
        let axis = self.axis;
        let measured = Self::measure_visible(children, ctx)?;
        let extent = axis.cross(size);

        let mut free = axis.main(size) - self.gaps(measured.len());
        let mut total_scale = 0.0f32;
        for m in &measured {
            if axis.fills_main(m.cfg) {
                total_scale += axis.scale(m.cfg);
            } else {
                let (ms, me) = axis.main_padding(&m.cfg.padding);
                free -= axis.main(m.min) + ms + me;
            }
        }
        let px_per_unit = if total_scale > 0.0 {
            (free.max(0) as f32 / total_scale).floor()
        } else {
            0.0
        };

        let mut slots = Vec::with_capacity(measured.len());
        let mut cursor = 0;
        for m in &measured {
            let (ms, me) = axis.main_padding(&m.cfg.padding);
            let (cs, ce) = axis.cross_padding(&m.cfg.padding);

            let main = if axis.fills_main(m.cfg) {
                ((px_per_unit * axis.scale(m.cfg)) as i32 - (ms + me)).max(0)
            } else {
                axis.main(m.min)
            };
            let (cross, cross_offset) = if axis.fills_cross(m.cfg) {
                ((extent - (cs + ce)).max(0), cs)
            } else {
                let cross = axis.cross(m.min);
                let align = axis.cross_align(m.cfg, justify.0, justify.1);
                (cross, align.offset(extent, cross, cs, ce))
            };

            slots.push(Slot {
                index: m.index,
                relative: axis.point(cursor + ms, cross_offset),
                size: axis.dimensions(main, cross),
            });
            cursor += ms + main + me + self.spacing;
        }
        Ok(slots)
    }

    /// Arrange, render and composite every visible child onto `surface`
    pub fn compose(
        &self,
        children: &mut [Box<dyn Element>],
        size: Dimensions,
        justify: (HJustify, VJustify),
        location: Point,
        surface: &mut Surface,
        ctx: &RenderContext<'_>,
    ) -> UiResult<()> {
        self.compose_inset(children, size, justify, Point::zero(), location, surface, ctx)
    }

    /// [`compose`](Self::compose) into the area `size` starting at `inset`
    #[allow(clippy::too_many_arguments)]
    pub fn compose_inset(
        &self,
        children: &mut [Box<dyn Element>],
        size: Dimensions,
        justify: (HJustify, VJustify),
        inset: Point,
        location: Point,
        surface: &mut Surface,
        ctx: &RenderContext<'_>,
    ) -> UiResult<()> {
        let slots = self.arrange(children, size, justify, ctx)?;
        let child_ctx = ctx.descend()?;
        for slot in slots {
            compose_child(
                children[slot.index].as_mut(),
                inset + slot.relative,
                slot.size,
                location,
                surface,
                &child_ctx,
            )?;
        }
        settle_visibility(children);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::element::testing::Swatch;

    const JUSTIFY: (HJustify, VJustify) = (HJustify::Center, VJustify::Center);

    fn boxed(swatch: Swatch) -> Box<dyn Element> {
        Box::new(swatch)
    }

    #[test]
    fn test_min_size_sums_widths_gaps_and_padding() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 3);
        let children = vec![
            boxed(Swatch::new(10, 5)),
            boxed(Swatch::new(20, 8).with_config(
                ElementConfig::new().with_padding(Padding::new(1, 2, 1, 4)),
            )),
            boxed(Swatch::new(7, 4)),
        ];
        let min = layout.min_size(&children, &ctx).unwrap();
        assert_eq!(min, Dimensions::new(10 + 20 + 7 + 2 * 3 + 6, 10));
    }

    #[test]
    fn test_fractional_fill_shares_truncate_once() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 0);
        let half = ElementConfig::new().with_h_fill(true).with_h_scale(0.5);
        let children = vec![
            boxed(Swatch::new(3, 1).with_config(half)),
            boxed(Swatch::new(2, 1).with_config(half)),
        ];
        let min = layout.min_size(&children, &ctx).unwrap();
        assert_eq!(min, Dimensions::new(3, 1));
    }

    #[test]
    fn test_hidden_child_contributes_nothing() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 2);
        let mut children = vec![
            boxed(Swatch::new(10, 5)),
            boxed(Swatch::new(20, 5)),
            boxed(Swatch::new(30, 5)),
        ];
        let full = layout.min_size(&children, &ctx).unwrap();
        children[1].base_mut().set_shown(false);
        let reduced = layout.min_size(&children, &ctx).unwrap();
        assert_eq!(full.width - reduced.width, 20 + 2);
    }

    #[test]
    fn test_filling_child_takes_remaining_space() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 1);
        let children = vec![
            boxed(Swatch::new(10, 5)),
            boxed(Swatch::new(4, 5).with_config(
                ElementConfig::new()
                    .with_h_fill(true)
                    .with_padding(Padding::symmetric(0, 2)),
            )),
            boxed(Swatch::new(15, 5)),
        ];
        let width = 100;
        let slots = layout
            .arrange(&children, Dimensions::new(width, 5), JUSTIFY, &ctx)
            .unwrap();
        assert_eq!(slots[1].size.width, width - 25 - 2 - 4);

        let occupied: i32 = slots.iter().map(|s| s.size.width).sum::<i32>() + 4 + 2;
        assert_eq!(occupied, width);
        let last = slots[2];
        assert_eq!(last.relative.x + last.size.width, width);
    }

    #[test]
    fn test_fill_scales_split_space() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 0);
        let children = vec![
            boxed(Swatch::new(1, 1).with_config(ElementConfig::new().with_h_fill(true))),
            boxed(Swatch::new(1, 1).with_config(
                ElementConfig::new().with_h_fill(true).with_h_scale(3.0),
            )),
        ];
        let slots = layout
            .arrange(&children, Dimensions::new(80, 1), JUSTIFY, &ctx)
            .unwrap();
        assert_eq!(slots[0].size.width, 20);
        assert_eq!(slots[1].size.width, 60);
        assert_eq!(slots[1].relative.x, 20);
    }

    #[test]
    fn test_filling_min_uses_largest_filler() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 0);
        let children = vec![
            boxed(Swatch::new(5, 1).with_config(ElementConfig::new().with_h_fill(true))),
            boxed(Swatch::new(12, 1).with_config(
                ElementConfig::new().with_h_fill(true).with_h_scale(2.0),
            )),
        ];
        let min = layout.min_size(&children, &ctx).unwrap();
        assert_eq!(min.width, 12 + 24);
    }

    #[test]
    fn test_zero_total_scale_leaves_space_unused() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 0);
        let children = vec![boxed(Swatch::new(1, 1).with_config(
            ElementConfig::new().with_h_fill(true).with_h_scale(0.0),
        ))];
        let slots = layout
            .arrange(&children, Dimensions::new(50, 1), JUSTIFY, &ctx)
            .unwrap();
        assert_eq!(slots[0].size.width, 0);
    }

    #[test]
    fn test_cross_axis_justification() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Vertical, 0);
        let children = vec![
            boxed(Swatch::new(10, 2).with_config(
                ElementConfig::new().with_h_justify(HJustify::Left),
            )),
            boxed(Swatch::new(10, 2)),
            boxed(Swatch::new(10, 2).with_config(
                ElementConfig::new().with_h_justify(HJustify::Right),
            )),
            boxed(Swatch::new(10, 2).with_config(ElementConfig::new().with_h_fill(true))),
        ];
        let slots = layout
            .arrange(&children, Dimensions::new(30, 8), JUSTIFY, &ctx)
            .unwrap();
        assert_eq!(slots[0].relative, Point::new(0, 0));
        assert_eq!(slots[1].relative, Point::new(10, 2));
        assert_eq!(slots[2].relative, Point::new(20, 4));
        assert_eq!(slots[3].size, Dimensions::new(30, 2));
    }

    #[test]
    fn test_default_justify_inherits_container() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 0);
        let children = vec![boxed(Swatch::new(4, 4).with_config(
            ElementConfig::new().with_v_justify(VJustify::Default),
        ))];
        let slots = layout
            .arrange(
                &children,
                Dimensions::new(4, 10),
                (HJustify::Center, VJustify::Bottom),
                &ctx,
            )
            .unwrap();
        assert_eq!(slots[0].relative.y, 6);
    }

    #[test]
    fn test_compose_places_children_before_render() {
        let ctx = RenderContext::new();
        let layout = LinearLayout::new(Axis::Horizontal, 2);
        let mut children = vec![boxed(Swatch::new(3, 3)), boxed(Swatch::new(3, 3))];
        let mut surface = Surface::new(Size::new(8, 3)).unwrap();
        layout
            .compose(
                &mut children,
                Dimensions::new(8, 3),
                JUSTIFY,
                Point::new(100, 50),
                &mut surface,
                &ctx,
            )
            .unwrap();
        assert_eq!(children[1].base().relative_location(), Point::new(5, 0));
        assert_eq!(children[1].base().location(), Point::new(105, 50));
        assert!(surface.pixel(5, 0).is_some());
        assert!(surface.pixel(4, 0).is_none());
    }
}
