//! Container elements
//!
//! - [`container`] - Child ownership and the generic child API
//! - [`linear`] - One-axis size negotiation and fill distribution
//! - [`group`] - `HGroup` / `VGroup`
//! - [`frame`] - Bordered single-child wrapper
//! - [`transformer`] - Rotation and scaling of a single child

pub mod container;
pub mod frame;
pub mod group;
pub mod linear;
pub mod transformer;

pub use container::{Container, ContainerBase, ContainerKind};
pub use frame::Frame;
pub use group::{HGroup, VGroup};
pub use linear::{Axis, LinearLayout, Slot};
pub use transformer::Transformer;
