//! Toolkit-wide constants
//!
//! Layout defaults, timing thresholds and placeholder sizes live here so the
//! element implementations never carry bare numbers.

/// Maximum nesting depth any tree traversal may reach before it is treated
/// as runaway recursion.
pub const MAX_RECURSION: usize = 1000;

/// Two presses on an already-selected row closer together than this count as
/// a double click.
pub const DOUBLE_CLICK_TIMEOUT_MS: u64 = 500;

// ============================================================================
// Spacing defaults
// ============================================================================

/// Gap between adjacent children of an `HGroup`
pub const DEFAULT_HGROUP_SPACING_PX: i32 = 1;

/// Gap between adjacent children of a `VGroup`
pub const DEFAULT_VGROUP_SPACING_PX: i32 = 1;

/// Gap between adjacent children of a `ListRow`
pub const DEFAULT_LIST_ROW_SPACING_PX: i32 = 1;

/// Gap between adjacent rows of a `ListGroup`
pub const DEFAULT_LIST_GROUP_SPACING_PX: i32 = 0;

// ============================================================================
// Placeholder sizes
// ============================================================================

/// Size reported by a `Frame` with no visible child
pub const EMPTY_FRAME_SIZE_PX: i32 = 20;

/// Size reported by a `ListGroup`; its real extent comes from fill behaviour
pub const LIST_GROUP_MIN_SIZE_PX: i32 = 1;

/// Inset between a `ListGroup` border and its rows
pub const LIST_GROUP_INSET_PX: i32 = 2;

/// Default border thickness for `Frame` and `ListGroup`
pub const DEFAULT_BORDER_THICKNESS_PX: u32 = 1;

// ============================================================================
// Leaf element metrics
// ============================================================================

/// Button and combo box heights are this multiple of the font line height
pub const BUTTON_HEIGHT_FACTOR: f32 = 1.5;

/// Smallest drawing area a plot canvas asks for
pub const PLOT_CANVAS_MIN_WIDTH_PX: i32 = 120;

/// Smallest drawing area a plot canvas asks for
pub const PLOT_CANVAS_MIN_HEIGHT_PX: i32 = 80;

/// Number of tic divisions drawn along each plot axis
pub const PLOT_TIC_DIVISIONS: usize = 4;

/// Length of a tic mark in pixels
pub const PLOT_TIC_LENGTH_PX: i32 = 3;

/// Fraction of the data range added on each side when auto-ranging
pub const PLOT_AUTO_RANGE_MARGIN: f32 = 0.05;

/// Smallest data range the plot will map onto pixels
pub const PLOT_MIN_DATA_RANGE: f32 = 0.1;
