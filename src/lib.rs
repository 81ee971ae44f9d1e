//! Trellis: a retained-mode widget toolkit
//!
//! Elements form an owned tree. Each frame the host renders the root at the
//! window size: containers measure their children, hand out free space by
//! fill and scale, and composite the children's cached bitmaps. Subtrees
//! whose state did not change return the bitmap from their previous render.
//!
//! See [`ui`] for the element types and the display and input glue.

pub mod ui;
