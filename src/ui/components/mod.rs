// src/ui/components/mod.rs
//! UI components library

pub mod combo_box;
pub mod image;
pub mod label;
pub mod list_group;
pub mod list_row;
pub mod plot;
pub mod toggle_button;

pub use combo_box::ComboBox;
pub use image::Image;
pub use label::Label;
pub use list_group::ListGroup;
pub use list_row::{ListColors, ListRow};
pub use plot::{DataPoint, DataSeries, Plot, RangeConfig};
pub use toggle_button::{ButtonColors, ToggleButton};
