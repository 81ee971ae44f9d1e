//! Plot assembled from labels, groups and a drawing canvas
//!
//! ```text
//! VGroup
//! ├── title            Label
//! ├── HGroup           (fills)
//! │   ├── Transformer  270°, holding the y label
//! │   ├── PlotCanvas   (fills)
//! │   └── VGroup       legend, one Label per series
//! └── x label          Label
//! ```
//!
//! Parts are reached through their ids so the layout tree stays the single
//! owner. Empty labels and an empty legend are hidden and take no space.

use embedded_graphics::prelude::Point;
use log::debug;

use crate::ui::backend::TextSize;
use crate::ui::config::{ElementConfig, HJustify, VJustify};
use crate::ui::context::{EventContext, RenderContext};
use crate::ui::core::{Dimensions, ElementId, EventState, InputEvent};
use crate::ui::element::{
    Element, ElementBase, compose_child, downcast_mut, downcast_ref, find, find_mut, measure,
    render_cached, settle_visibility,
};
use crate::ui::error::{UiError, UiResult};
use crate::ui::layouts::container::finish_capture;
use crate::ui::layouts::{Container, ContainerBase, ContainerKind, HGroup, Transformer, VGroup};
use crate::ui::styling::Background;
use crate::ui::surface::BitmapHandle;

use super::super::label::Label;
use super::canvas::PlotCanvas;
use super::series::{DataPoint, DataSeries};
use super::viewport::{DataBounds, RangeConfig};

/// Ids of the parts the plot edits after assembly
struct Parts {
    title: ElementId,
    x_label: ElementId,
    y_axis: ElementId,
    y_label: ElementId,
    canvas: ElementId,
    legend: ElementId,
}

/// Line plot with title, axis labels and legend
///
/// # Examples
/// ```ignore
/// let mut plot = Plot::new()?;
/// plot.set_title("Pressure")?;
/// let index = plot.add_data(DataSeries::new("hPa").with_points(samples))?;
/// plot.set_y_range(RangeConfig::Fixed { min: 950.0, max: 1050.0 })?;
/// ```
pub struct Plot {
    base: ElementBase,
    container: ContainerBase,
    parts: Parts,
}

fn hidden() -> ElementConfig {
    ElementConfig::new().with_show(false)
}

impl Plot {
    pub fn new() -> UiResult<Self> {
        let title = Label::new("").with_font(TextSize::Large).with_config(hidden());
        let x_label = Label::new("").with_config(hidden());
        let y_label = Label::new("");
        let canvas = PlotCanvas::new().with_config(ElementConfig::new().fill_all());
        let legend = VGroup::new()
            .with_v_justify(VJustify::Top)
            .with_h_justify(HJustify::Left)
            .with_config(hidden().with_v_fill(true));

        let y_label_id = y_label.id();
        let y_axis = Transformer::new()
            .with_rotation(270.0)
            .with_config(hidden())
            .with_element(y_label)?;

        let parts = Parts {
            title: title.id(),
            x_label: x_label.id(),
            y_axis: y_axis.id(),
            y_label: y_label_id,
            canvas: canvas.id(),
            legend: legend.id(),
        };

        let body = HGroup::new()
            .with_config(ElementConfig::new().fill_all())
            .with_element(y_axis)?
            .with_element(canvas)?
            .with_element(legend)?;
        let root = VGroup::new()
            .with_config(ElementConfig::new().fill_all())
            .with_element(title)?
            .with_element(body)?
            .with_element(x_label)?;

        let mut container = ContainerBase::new(ContainerKind::SingleChild);
        container.set_element(Box::new(root), None)?;
        Ok(Self {
            base: ElementBase::new("Plot").with_background(Background::transparent()),
            container,
            parts,
        })
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.base = self.base.with_background(background);
        self
    }

    fn part<T: Element + 'static>(&self, id: ElementId) -> UiResult<&T> {
        let root = self
            .container
            .element()
            .ok_or(UiError::MissingDependency("plot layout"))?;
        let found = find(root, id).ok_or(UiError::MissingDependency("plot part"))?;
        downcast_ref(found)
    }

    fn part_mut<T: Element + 'static>(&mut self, id: ElementId) -> UiResult<&mut T> {
        let root = self
            .container
            .element_mut()
            .ok_or(UiError::MissingDependency("plot layout"))?;
        let found = find_mut(root, id).ok_or(UiError::MissingDependency("plot part"))?;
        downcast_mut(found)
    }

    fn canvas(&self) -> UiResult<&PlotCanvas> {
        self.part(self.parts.canvas)
    }

    fn canvas_mut(&mut self) -> UiResult<&mut PlotCanvas> {
        self.part_mut(self.parts.canvas)
    }

    /// Set a label's text, hiding it while empty
    fn set_label(&mut self, id: ElementId, text: &str) -> UiResult<()> {
        let label = self.part_mut::<Label>(id)?;
        label.set_text(text);
        label.base_mut().set_shown(!text.is_empty());
        self.base.request_redraw();
        Ok(())
    }

    pub fn title(&self) -> UiResult<&str> {
        Ok(self.part::<Label>(self.parts.title)?.text())
    }

    pub fn set_title(&mut self, text: &str) -> UiResult<()> {
        self.set_label(self.parts.title, text)
    }

    pub fn set_x_label(&mut self, text: &str) -> UiResult<()> {
        self.set_label(self.parts.x_label, text)
    }

    pub fn set_y_label(&mut self, text: &str) -> UiResult<()> {
        self.set_label(self.parts.y_label, text)?;
        let y_axis = self.part_mut::<Transformer>(self.parts.y_axis)?;
        y_axis.base_mut().set_shown(!text.is_empty());
        Ok(())
    }

    /// Data sets in the order they were added
    pub fn data(&self) -> UiResult<&[DataSeries]> {
        Ok(self.canvas()?.series())
    }

    pub fn data_count(&self) -> usize {
        self.data().map_or(0, |series| series.len())
    }

    /// Add a data set; returns its index
    pub fn add_data(&mut self, series: DataSeries) -> UiResult<usize> {
        let index = self.canvas_mut()?.add_series(series);
        debug!("Plot {} gained data set {}", self.base.id().raw(), index);
        self.rebuild_legend()?;
        Ok(index)
    }

    /// Remove the data set at `index`; later sets shift down by one
    pub fn remove_data(&mut self, index: usize) -> UiResult<DataSeries> {
        let removed = self.canvas_mut()?.remove_series(index)?;
        self.rebuild_legend()?;
        Ok(removed)
    }

    /// Replace the data set at `index`, returning the old one
    pub fn set_data(&mut self, index: usize, series: DataSeries) -> UiResult<DataSeries> {
        let previous = self.canvas_mut()?.replace_series(index, series)?;
        self.rebuild_legend()?;
        Ok(previous)
    }

    pub fn set_data_label(&mut self, index: usize, label: &str) -> UiResult<()> {
        self.canvas_mut()?.series_mut(index)?.set_label(label);
        self.rebuild_legend()
    }

    /// Append a point to the data set at `index`
    pub fn push_point(&mut self, index: usize, point: DataPoint) -> UiResult<()> {
        self.canvas_mut()?.series_mut(index)?.push(point);
        self.base.request_redraw();
        Ok(())
    }

    pub fn set_x_range(&mut self, range: RangeConfig) -> UiResult<()> {
        self.canvas_mut()?.set_x_range(range);
        self.base.request_redraw();
        Ok(())
    }

    pub fn set_y_range(&mut self, range: RangeConfig) -> UiResult<()> {
        self.canvas_mut()?.set_y_range(range);
        self.base.request_redraw();
        Ok(())
    }

    /// Data-space bounds of the next render
    pub fn bounds(&self) -> UiResult<DataBounds> {
        Ok(self.canvas()?.bounds())
    }

    fn rebuild_legend(&mut self) -> UiResult<()> {
        let entries: Vec<Label> = self
            .canvas()?
            .series()
            .iter()
            .enumerate()
            .map(|(index, series)| {
                Label::new(series.label())
                    .with_font(TextSize::Small)
                    .with_color(series.color_or_palette(index))
                    .with_justify(HJustify::Left)
            })
            .collect();

        let legend = self.part_mut::<VGroup>(self.parts.legend)?;
        legend.container_mut().clear();
        legend.base_mut().set_shown(!entries.is_empty());
        for entry in entries {
            legend.add_element(Box::new(entry))?;
        }
        legend.request_redraw();
        self.base.request_redraw();
        Ok(())
    }
}

impl Element for Plot {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        match self.container.element().filter(|root| root.is_shown()) {
            Some(root) => measure(root, &ctx.descend()?),
            None => Ok(Dimensions::ZERO),
        }
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, |plot, surface, ctx| {
            let size = plot.base.size();
            let location = plot.base.location();
            if let Some(root) = plot.container.element_mut().filter(|root| root.is_shown()) {
                compose_child(root, Point::zero(), size, location, surface, &ctx.descend()?)?;
            }
            settle_visibility(plot.container.elements_mut());
            Ok(())
        })
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
