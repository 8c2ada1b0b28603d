//! Trait definitions for Flarum resources.
//!
//! Each resource type implements [`Model`], which supplies update, delete,
//! refresh and relationship helpers on top of the raw resource data.

mod model;

pub use model::{Model, Permission};
