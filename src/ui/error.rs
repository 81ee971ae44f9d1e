//! Error types shared by every element operation

use thiserror_no_std::Error;

/// Failures raised while measuring, rendering or restructuring elements
///
/// Everything except [`UiError::RecursionLimitExceeded`] is recoverable at
/// the boundary of the failing operation: a container that sees one of them
/// from a child treats that child as absent for the current frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UiError {
    /// An operation was applied to an element of the wrong concrete type
    #[error("Type mismatch (expected {expected}, found {found})")]
    TypeMismatch {
        /// Type the operation requires
        expected: &'static str,
        /// Type that was actually supplied
        found: &'static str,
    },

    /// A surface, bitmap or array could not be allocated
    #[error("Allocation of {bytes} bytes failed")]
    OutOfMemory {
        /// Requested allocation size
        bytes: usize,
    },

    /// A render was requested with a negative width or height
    #[error("Invalid geometry ({width}x{height})")]
    InvalidGeometry {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
    },

    /// A required collaborator (font backend, decoded image, ...) is absent
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    /// The element tree is nested deeper than any legitimate layout
    #[error("Recursion limit exceeded (depth {depth})")]
    RecursionLimitExceeded {
        /// Depth at which traversal was aborted
        depth: usize,
    },

    /// The operation is not offered by this element
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Index outside the bounds of a collection
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Collection length
        len: usize,
    },

    /// The image backend rejected the input
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// Configuration or plot data could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl UiError {
    /// Whether this error must abort the entire operation chain rather than
    /// just the failing subtree
    pub fn is_fatal(&self) -> bool {
        matches!(self, UiError::RecursionLimitExceeded { .. })
    }
}

/// Result alias used throughout the toolkit
pub type UiResult<T> = Result<T, UiError>;
