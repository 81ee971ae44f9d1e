//! Element base state and the render-cache protocol
//!
//! Every node in the UI tree implements [`Element`] and embeds an
//! [`ElementBase`] holding its configuration, render state and cached
//! bitmap. Rendering goes through [`render_cached`], which decides whether
//! the previous bitmap can be handed out again:
//!
//! - reuse iff the requested size equals the previous size, nothing in the
//!   subtree is dirty, and a cached bitmap exists;
//! - otherwise reallocate the surface if the size changed, redraw, snapshot
//!   a new bitmap and clear the dirty flag.
//!
//! Parents own their children exclusively (`Box<dyn Element>`), so a
//! subtree is freed exactly once when its owner drops it. Dirty state is
//! aggregated downwards through [`Element::needs_redraw`] instead of being
//! pushed up through parent pointers.

use std::any::Any;

use embedded_graphics::prelude::*;
use log::{debug, warn};

use super::config::ElementConfig;
use super::constants::MAX_RECURSION;
use super::context::{EventContext, RenderContext};
use super::core::{
    CallbackEvent, CallbackFlow, CallbackKind, Dimensions, ElementId, EventState, InputEvent,
    WindowId,
};
use super::error::{UiError, UiResult};
use super::styling::{Background, FocusState};
use super::surface::{BitmapHandle, Surface};

// ============================================================================
// Callbacks
// ============================================================================

/// Application hook attached to an element
pub type Callback = Box<dyn FnMut(&CallbackEvent) -> CallbackFlow>;

/// Callbacks registered on one element, in registration order
#[derive(Default)]
pub struct CallbackTable {
    entries: Vec<(CallbackKind, Callback)>,
}

impl CallbackTable {
    pub fn register(&mut self, kind: CallbackKind, callback: Callback) {
        self.entries.push((kind, callback));
    }

    /// Run every callback registered for `kind`
    ///
    /// Returns `Release` if any of them asked for the element to be freed.
    pub fn trigger(&mut self, source: ElementId, kind: CallbackKind) -> CallbackFlow {
        let event = CallbackEvent { source, kind };
        let mut flow = CallbackFlow::Continue;
        for (_, callback) in self.entries.iter_mut().filter(|(k, _)| *k == kind) {
            if callback(&event) == CallbackFlow::Release {
                flow = CallbackFlow::Release;
            }
        }
        flow
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Element base
// ============================================================================

/// State shared by every element
///
/// Not `Clone`; an element has exactly one place in the tree.
pub struct ElementBase {
    id: ElementId,
    kind: &'static str,
    config: ElementConfig,
    background: Background,
    focus_state: FocusState,
    dirty: bool,
    visibility_changed: bool,
    active: bool,
    size: Dimensions,
    size_old: Dimensions,
    location: Point,
    rel_location: Point,
    window: Option<WindowId>,
    surface: Option<Surface>,
    bitmap: Option<BitmapHandle>,
    popup: Option<Box<dyn Element>>,
    callbacks: CallbackTable,
}

impl ElementBase {
    /// Fresh state for an element of type `kind`; starts dirty and never
    /// rendered
    pub fn new(kind: &'static str) -> Self {
        Self {
            id: ElementId::next(),
            kind,
            config: ElementConfig::default(),
            background: Background::default(),
            focus_state: FocusState::Normal,
            dirty: true,
            visibility_changed: false,
            active: false,
            size: Dimensions::ZERO,
            size_old: Dimensions::UNSET,
            location: Point::zero(),
            rel_location: Point::zero(),
            window: None,
            surface: None,
            bitmap: None,
            popup: None,
            callbacks: CallbackTable::default(),
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    // ===== Configuration =====

    pub fn config(&self) -> &ElementConfig {
        &self.config
    }

    /// Replace the configuration and schedule a redraw
    pub fn set_config(&mut self, config: ElementConfig) {
        self.configure(|cfg| *cfg = config);
    }

    /// Edit the configuration in place and schedule a redraw
    pub fn configure(&mut self, edit: impl FnOnce(&mut ElementConfig)) {
        let was_shown = self.config.show;
        edit(&mut self.config);
        if was_shown != self.config.show {
            self.visibility_changed = true;
        }
        self.dirty = true;
    }

    pub fn is_shown(&self) -> bool {
        self.config.show
    }

    pub fn set_shown(&mut self, show: bool) {
        if self.config.show != show {
            self.configure(|cfg| cfg.show = show);
        }
    }

    pub(crate) fn visibility_changed(&self) -> bool {
        self.visibility_changed
    }

    pub(crate) fn acknowledge_visibility(&mut self) {
        self.visibility_changed = false;
    }

    // ===== Appearance =====

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
        self.dirty = true;
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus_state
    }

    pub fn set_focus_state(&mut self, state: FocusState) {
        if self.focus_state != state {
            self.focus_state = state;
            self.dirty = true;
        }
    }

    /// Paint the background for the current focus state
    pub fn paint_background(&self, surface: &mut Surface) {
        self.background.paint(self.focus_state, surface);
    }

    // ===== Redraw state =====

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the cached bitmap stale
    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    /// Mark stale and forget the previous size so the surface is rebuilt
    pub fn force_redraw(&mut self) {
        self.size_old = Dimensions::UNSET;
        self.dirty = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ===== Geometry =====

    /// Size of the most recent render
    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// Size the cached surface was built for
    pub fn previous_size(&self) -> Dimensions {
        self.size_old
    }

    /// Absolute location in window coordinates
    pub fn location(&self) -> Point {
        self.location
    }

    /// Offset from the parent's origin
    pub fn relative_location(&self) -> Point {
        self.rel_location
    }

    /// Record where the parent placed this element
    pub fn store_location(&mut self, relative: Point, parent_location: Point) {
        self.rel_location = relative;
        self.location = parent_location + relative;
    }

    pub(crate) fn shift_location(&mut self, delta: Point) {
        self.location += delta;
    }

    /// Whether `point` lies on this element (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.location.x
            && point.x <= self.location.x + self.size.width
            && point.y >= self.location.y
            && point.y <= self.location.y + self.size.height
    }

    // ===== Window, popup and callbacks =====

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub(crate) fn attach_window(&mut self, window: WindowId) {
        self.window = Some(window);
    }

    pub fn popup(&self) -> Option<&dyn Element> {
        self.popup.as_deref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut (dyn Element + 'static)> {
        self.popup.as_deref_mut()
    }

    /// Install (or clear) the popup child, returning the previous one
    pub fn set_popup(&mut self, popup: Option<Box<dyn Element>>) -> Option<Box<dyn Element>> {
        self.dirty = true;
        core::mem::replace(&mut self.popup, popup)
    }

    pub(crate) fn take_popup(&mut self) -> Option<Box<dyn Element>> {
        self.popup.take()
    }

    /// Register an application callback
    pub fn on<F>(&mut self, kind: CallbackKind, callback: F)
    where
        F: FnMut(&CallbackEvent) -> CallbackFlow + 'static,
    {
        self.callbacks.register(kind, Box::new(callback));
    }

    /// Raise `kind` on this element
    pub fn trigger(&mut self, kind: CallbackKind) -> CallbackFlow {
        self.callbacks.trigger(self.id, kind)
    }

    // ===== Render cache =====

    /// The cached bitmap, if it can be reused at `size`
    pub fn reusable(&self, size: Dimensions) -> Option<BitmapHandle> {
        if size == self.size_old && !self.dirty {
            self.bitmap.clone()
        } else {
            None
        }
    }

    /// Hand out the drawing surface for a redraw at `size`
    ///
    /// The previous surface is kept when the size is unchanged and released
    /// otherwise.
    pub fn take_surface(&mut self, size: Dimensions) -> UiResult<Surface> {
        let eg_size = size.to_size().ok_or(UiError::InvalidGeometry {
            width: size.width,
            height: size.height,
        })?;
        self.size = size;

        match self.surface.take() {
            Some(surface) if size == self.size_old => Ok(surface),
            _ => {
                debug!(
                    "Allocating {}x{} surface for {} {}",
                    size.width,
                    size.height,
                    self.kind,
                    self.id.raw()
                );
                self.bitmap = None;
                Surface::new(eg_size)
            }
        }
    }

    /// Snapshot the finished surface into a new cached bitmap
    pub fn finish_render(&mut self, surface: Surface) -> UiResult<BitmapHandle> {
        let bitmap = BitmapHandle::new(surface.snapshot()?);
        self.surface = Some(surface);
        self.size_old = self.size;
        self.bitmap = Some(bitmap.clone());
        self.dirty = false;
        Ok(bitmap)
    }

    pub fn cached_bitmap(&self) -> Option<&BitmapHandle> {
        self.bitmap.as_ref()
    }
}

// ============================================================================
// Element trait
// ============================================================================

/// Access to an element as `Any` for checked downcasts
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A node in the UI tree
///
/// `min_size` and `render` are required. `capture_event` and `defocus`
/// default to doing nothing. Containers expose their owned children through
/// `children`/`children_mut` so tree-wide operations can reach them.
pub trait Element: AsAny {
    fn base(&self) -> &ElementBase;

    fn base_mut(&mut self) -> &mut ElementBase;

    /// Content-driven minimum size; never touches render state
    fn min_size(&self, ctx: &RenderContext<'_>) -> UiResult<Dimensions>;

    /// Produce a bitmap of exactly `requested` size (or the minimum size if
    /// `requested` is zero), reusing the cache when allowed
    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>)
    -> UiResult<BitmapHandle>;

    fn capture_event(&mut self, _event: &InputEvent, _ctx: &mut EventContext<'_>) -> EventState {
        EventState::NotCaptured
    }

    /// Called when this element loses input focus
    fn defocus(&mut self) {}

    fn children(&self) -> &[Box<dyn Element>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Element>] {
        &mut []
    }

    fn id(&self) -> ElementId {
        self.base().id()
    }

    fn kind(&self) -> &'static str {
        self.base().kind()
    }

    fn is_shown(&self) -> bool {
        self.base().is_shown()
    }

    /// Whether this element or anything it draws needs redrawing
    fn needs_redraw(&self) -> bool {
        self.base().is_dirty()
            || self.children().iter().any(|child| {
                child.base().visibility_changed() || (child.is_shown() && child.needs_redraw())
            })
    }

    fn request_redraw(&mut self) {
        self.base_mut().request_redraw();
    }

    fn force_redraw(&mut self) {
        self.base_mut().force_redraw();
    }

    /// Record the owning window on this element and its whole subtree
    fn set_window(&mut self, window: WindowId, depth: usize) -> UiResult<()> {
        if depth > MAX_RECURSION {
            warn!("Window propagation exceeded depth {}", depth);
            return Err(UiError::RecursionLimitExceeded { depth });
        }
        self.base_mut().attach_window(window);
        for child in self.children_mut() {
            child.set_window(window, depth + 1)?;
        }
        if let Some(popup) = self.base_mut().popup_mut() {
            popup.set_window(window, depth + 1)?;
        }
        Ok(())
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Min-size of `element` with its min/max clamps applied
pub fn measure(element: &dyn Element, ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
    Ok(element.base().config().clamp(element.min_size(ctx)?))
}

/// Validate a render request, substituting the min-size for `(0, 0)`
pub fn resolve_size<E: Element + ?Sized>(
    element: &E,
    requested: Dimensions,
    ctx: &RenderContext<'_>,
) -> UiResult<Dimensions> {
    if requested.is_negative() {
        return Err(UiError::InvalidGeometry {
            width: requested.width,
            height: requested.height,
        });
    }
    if requested.is_zero() {
        return element.min_size(ctx);
    }
    Ok(requested)
}

/// The render-cache protocol shared by every element
///
/// `draw` is only called when the cached bitmap cannot be reused; it gets a
/// surface with the background already painted. If it fails the surface is
/// dropped and no partial bitmap is produced.
pub fn render_cached<E, F>(
    element: &mut E,
    requested: Dimensions,
    ctx: &RenderContext<'_>,
    draw: F,
) -> UiResult<BitmapHandle>
where
    E: Element,
    F: FnOnce(&mut E, &mut Surface, &RenderContext<'_>) -> UiResult<()>,
{
    let size = resolve_size(element, requested, ctx)?;
    if !element.needs_redraw()
        && let Some(bitmap) = element.base().reusable(size)
    {
        return Ok(bitmap);
    }

    let mut surface = element.base_mut().take_surface(size)?;
    element.base().paint_background(&mut surface);
    draw(element, &mut surface, ctx)?;
    element.base_mut().finish_render(surface)
}

/// Place `child` at `relative` inside its parent, render it at `size` and
/// composite it onto `surface`
///
/// A child that fails with a recoverable error is skipped as if hidden;
/// fatal errors propagate.
pub fn compose_child(
    child: &mut dyn Element,
    relative: Point,
    size: Dimensions,
    parent_location: Point,
    surface: &mut Surface,
    ctx: &RenderContext<'_>,
) -> UiResult<()> {
    place_child(child, relative, parent_location)?;
    match child.render(size.non_negative(), ctx) {
        Ok(bitmap) => {
            surface.blit(&bitmap, relative);
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("Skipping {} {}: {}", child.kind(), child.id().raw(), e);
            Ok(())
        }
    }
}

/// Record where a parent put `child`, carrying its subtree along if it moved
///
/// A child that reuses its cached bitmap never re-places its own children,
/// so their absolute locations are shifted here instead.
pub fn place_child(
    child: &mut dyn Element,
    relative: Point,
    parent_location: Point,
) -> UiResult<()> {
    let old = child.base().location();
    child.base_mut().store_location(relative, parent_location);
    let delta = child.base().location() - old;
    if delta == Point::zero() {
        return Ok(());
    }
    for descendant in child.children_mut() {
        shift_subtree(descendant.as_mut(), delta, 1)?;
    }
    if let Some(popup) = child.base_mut().popup_mut() {
        shift_subtree(popup, delta, 1)?;
    }
    Ok(())
}

fn shift_subtree(element: &mut dyn Element, delta: Point, depth: usize) -> UiResult<()> {
    if depth > MAX_RECURSION {
        warn!("Location shift exceeded depth {}", depth);
        return Err(UiError::RecursionLimitExceeded { depth });
    }
    element.base_mut().shift_location(delta);
    for child in element.children_mut() {
        shift_subtree(child.as_mut(), delta, depth + 1)?;
    }
    if let Some(popup) = element.base_mut().popup_mut() {
        shift_subtree(popup, delta, depth + 1)?;
    }
    Ok(())
}

/// Clear pending visibility changes once a parent has laid its children out
pub fn settle_visibility(children: &mut [Box<dyn Element>]) {
    for child in children {
        child.base_mut().acknowledge_visibility();
    }
}

/// Render every open popup in the tree, each anchored below its owner
///
/// Returns the bitmaps with their window positions in tree order; the host
/// draws them over the main tree.
pub fn render_popups(
    root: &mut dyn Element,
    ctx: &RenderContext<'_>,
) -> UiResult<Vec<(Point, BitmapHandle)>> {
    let mut rendered = Vec::new();
    collect_popups(root, ctx, &mut rendered)?;
    Ok(rendered)
}

fn collect_popups(
    element: &mut dyn Element,
    ctx: &RenderContext<'_>,
    rendered: &mut Vec<(Point, BitmapHandle)>,
) -> UiResult<()> {
    let owner = element.base().location();
    let below = Point::new(0, element.base().size().height);
    let child_ctx = ctx.descend()?;

    if let Some(popup) = element.base_mut().popup_mut()
        && popup.is_shown()
    {
        place_child(popup, below, owner)?;
        let size = measure(&*popup, ctx)?;
        let bitmap = popup.render(size, ctx)?;
        rendered.push((popup.base().location(), bitmap));
        collect_popups(popup, &child_ctx, rendered)?;
    }

    for child in element.children_mut() {
        if child.is_shown() {
            collect_popups(child.as_mut(), &child_ctx, rendered)?;
        }
    }
    Ok(())
}

/// Depth-first search for the element with `id`
pub fn find(root: &dyn Element, id: ElementId) -> Option<&dyn Element> {
    if root.id() == id {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find(child.as_ref(), id))
}

/// Depth-first search for the element with `id`
pub fn find_mut(root: &mut dyn Element, id: ElementId) -> Option<&mut dyn Element> {
    if root.id() == id {
        return Some(root);
    }
    for child in root.children_mut() {
        if let Some(found) = find_mut(child.as_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// Checked downcast to a concrete element type
pub fn downcast_ref<T: Element + 'static>(element: &dyn Element) -> UiResult<&T> {
    let found = element.kind();
    element
        .as_any()
        .downcast_ref::<T>()
        .ok_or(UiError::TypeMismatch {
            expected: core::any::type_name::<T>(),
            found,
        })
}

/// Checked downcast to a concrete element type
pub fn downcast_mut<T: Element + 'static>(element: &mut dyn Element) -> UiResult<&mut T> {
    let found = element.kind();
    element
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(UiError::TypeMismatch {
            expected: core::any::type_name::<T>(),
            found,
        })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal elements for exercising layout and caching

    use super::*;
    use embedded_graphics::pixelcolor::Rgb565;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Solid block with a fixed min-size that counts its redraws and drops
    pub struct Swatch {
        pub base: ElementBase,
        pub min: Dimensions,
        pub color: Rgb565,
        pub redraws: Rc<Cell<usize>>,
        pub drops: Option<Rc<Cell<usize>>>,
    }

    impl Swatch {
        pub fn new(width: i32, height: i32) -> Self {
            Self {
                base: ElementBase::new("Swatch"),
                min: Dimensions::new(width, height),
                color: Rgb565::RED,
                redraws: Rc::new(Cell::new(0)),
                drops: None,
            }
        }

        pub fn with_config(mut self, config: ElementConfig) -> Self {
            self.base.config = config;
            self
        }

        pub fn with_drop_counter(mut self, drops: Rc<Cell<usize>>) -> Self {
            self.drops = Some(drops);
            self
        }

        fn redraw(&mut self, surface: &mut Surface, _ctx: &RenderContext<'_>) -> UiResult<()> {
            self.redraws.set(self.redraws.get() + 1);
            let Ok(()) = surface.clear(self.color);
            Ok(())
        }
    }

    impl Drop for Swatch {
        fn drop(&mut self) {
            if let Some(drops) = &self.drops {
                drops.set(drops.get() + 1);
            }
        }
    }

    impl Element for Swatch {
        fn base(&self) -> &ElementBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ElementBase {
            &mut self.base
        }

        fn min_size(&self, _ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
            Ok(self.min)
        }

        fn render(
            &mut self,
            requested: Dimensions,
            ctx: &RenderContext<'_>,
        ) -> UiResult<BitmapHandle> {
            render_cached(self, requested, ctx, Self::redraw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Swatch;
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_cache_reused_for_same_size() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(10, 5);
        let first = swatch.render(Dimensions::new(10, 5), &ctx).unwrap();
        let second = swatch.render(Dimensions::new(10, 5), &ctx).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(swatch.redraws.get(), 1);
    }

    #[test]
    fn test_resize_rebuilds_bitmap() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(10, 5);
        let first = swatch.render(Dimensions::new(10, 5), &ctx).unwrap();
        let second = swatch.render(Dimensions::new(12, 5), &ctx).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.size(), Size::new(12, 5));
        assert_eq!(swatch.base().previous_size(), Dimensions::new(12, 5));
    }

    #[test]
    fn test_dirty_forces_redraw() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(4, 4);
        let first = swatch.render(Dimensions::new(4, 4), &ctx).unwrap();
        swatch.request_redraw();
        let second = swatch.render(Dimensions::new(4, 4), &ctx).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(swatch.redraws.get(), 2);
        assert!(!swatch.base().is_dirty());
    }

    #[test]
    fn test_force_redraw_resets_previous_size() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(4, 4);
        swatch.render(Dimensions::new(4, 4), &ctx).unwrap();
        swatch.force_redraw();
        assert_eq!(swatch.base().previous_size(), Dimensions::UNSET);
        swatch.render(Dimensions::new(4, 4), &ctx).unwrap();
        assert_eq!(swatch.redraws.get(), 2);
    }

    #[test]
    fn test_negative_request_rejected() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(4, 4);
        let err = swatch.render(Dimensions::new(-1, 4), &ctx).err();
        assert_eq!(
            err,
            Some(UiError::InvalidGeometry {
                width: -1,
                height: 4
            })
        );
        assert_eq!(swatch.redraws.get(), 0);
        assert!(swatch.base().cached_bitmap().is_none());
    }

    #[test]
    fn test_zero_request_uses_min_size() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(7, 3);
        let bitmap = swatch.render(Dimensions::ZERO, &ctx).unwrap();
        assert_eq!(bitmap.size(), Size::new(7, 3));
    }

    #[test]
    fn test_measure_applies_clamps() {
        let ctx = RenderContext::new();
        let swatch = Swatch::new(7, 3).with_config(ElementConfig::new().with_min_width(20));
        assert_eq!(measure(&swatch, &ctx).unwrap(), Dimensions::new(20, 3));
    }

    #[test]
    fn test_set_window_depth_guard() {
        let mut swatch = Swatch::new(1, 1);
        assert!(swatch.set_window(WindowId(1), 0).is_ok());
        assert_eq!(swatch.base().window(), Some(WindowId(1)));
        let err = swatch.set_window(WindowId(2), MAX_RECURSION + 1).err();
        assert_eq!(
            err,
            Some(UiError::RecursionLimitExceeded {
                depth: MAX_RECURSION + 1
            })
        );
    }

    #[test]
    fn test_callbacks_run_in_order_and_report_release() {
        let mut swatch = Swatch::new(1, 1);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        swatch.base_mut().on(CallbackKind::OnClick, move |event| {
            assert_eq!(event.kind, CallbackKind::OnClick);
            counter.set(counter.get() + 1);
            CallbackFlow::Continue
        });
        swatch
            .base_mut()
            .on(CallbackKind::OnClicked, |_| CallbackFlow::Release);

        assert_eq!(
            swatch.base_mut().trigger(CallbackKind::OnClick),
            CallbackFlow::Continue
        );
        assert_eq!(hits.get(), 1);
        assert_eq!(
            swatch.base_mut().trigger(CallbackKind::OnClicked),
            CallbackFlow::Release
        );
        assert_eq!(
            swatch.base_mut().trigger(CallbackKind::OnActivated),
            CallbackFlow::Continue
        );
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let ctx = RenderContext::new();
        let mut swatch = Swatch::new(10, 10);
        swatch.base_mut().store_location(Point::new(5, 5), Point::new(10, 0));
        swatch.render(Dimensions::new(10, 10), &ctx).unwrap();
        assert_eq!(swatch.base().location(), Point::new(15, 5));
        assert!(swatch.base().contains(Point::new(15, 5)));
        assert!(swatch.base().contains(Point::new(25, 15)));
        assert!(!swatch.base().contains(Point::new(26, 15)));
    }

    #[test]
    fn test_downcast_reports_type_mismatch() {
        let mut swatch = Swatch::new(1, 1);
        let element: &mut dyn Element = &mut swatch;
        assert!(downcast_mut::<Swatch>(element).is_ok());
        let element: &dyn Element = &swatch;
        assert!(downcast_ref::<Swatch>(element).is_ok());
    }

    #[test]
    fn test_hidden_toggle_marks_visibility_change() {
        let mut swatch = Swatch::new(1, 1);
        swatch.base_mut().set_shown(false);
        assert!(swatch.base().visibility_changed());
        assert!(!swatch.is_shown());
        swatch.base_mut().acknowledge_visibility();
        assert!(!swatch.base().visibility_changed());
    }
}
