//! Productions: pattern-guarded rewrites of a layered graph.
//!
//! - [`MergeProduction`] folds duplicated boundary vertices of two sibling
//!   elements into one.
//! - [`GrowthProduction`] promotes an undivided element and subdivides it one
//!   layer down.

pub mod growth;
pub mod merge;
pub mod orientation;
pub mod production;

pub use growth::{GrowthMatch, GrowthProduction};
pub use merge::{MergeMatch, MergeProduction};
pub use orientation::Orientation;
pub use production::{ApplyOptions, Production};
