// src/ui/mod.rs
//! Trellis UI System - a retained-mode element tree rendered to cached bitmaps
//!
//! This module provides:
//! - The element base state machine and render-cache protocol
//! - Containers that negotiate min-sizes and distribute free space
//! - Leaf components (labels, buttons, list rows, combo boxes, images, plots)
//! - Backends for text and image decoding
//! - Focus tracking and event dispatch

pub mod backend;
pub mod components;
pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod element;
pub mod error;
pub mod focus;
pub mod layouts;
pub mod styling;
pub mod surface;

// Re-export commonly used items
pub use backend::{
    DecodedImage, FontBackend, ImageDecoder, MonoFontBackend, RasterDecoder, TextSize,
};
pub use components::{
    ButtonColors, ComboBox, DataPoint, DataSeries, Image, Label, ListColors, ListGroup, ListRow,
    Plot, RangeConfig, ToggleButton,
};
pub use config::{ElementConfig, HJustify, VJustify};
pub use context::{EventContext, RenderContext};
pub use self::core::{
    CallbackEvent, CallbackFlow, CallbackKind, Dimensions, ElementId, EventState, InputEvent, Key,
    MouseButton, WindowId,
};
pub use element::{Element, ElementBase, render_popups};
pub use error::{UiError, UiResult};
pub use focus::{FocusManager, FocusTracker, dispatch_event};
pub use layouts::{Container, Frame, HGroup, Transformer, VGroup};
pub use styling::{Background, Padding};
pub use surface::{Bitmap, BitmapHandle, Surface};
