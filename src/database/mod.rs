//! In-memory data model of a pod container.
//!
//! - `types`: the closed set of element type tags and the `PodElement` trait
//!   that binds Rust primitives to them.
//! - `item`: one keyed, typed value buffer.
//! - `container`: insertion-ordered keyed collection of items addressed by
//!   generation-checked handles.

pub mod container;
pub mod item;
pub mod types;

pub use container::*;
pub use item::Item;
pub use types::*;
