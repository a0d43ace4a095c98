//! Filesystem projection of the catalog
//!
//! - [`Projector`] - Creates one directory per set with named links or copies
//! - [`Validator`] - Removes dangling links and empty directories
//! - [`materialize_difference`] - Projects only sets missing from a reference catalog

mod diff;
mod mode;
mod projector;
mod validate;

pub use diff::{difference, materialize_difference};
pub use mode::{is_symlink, LinkMode};
pub use projector::{MaterializeOutcome, ProjectionError, ProjectionResult, Projector};
pub use validate::{ValidationReport, Validator};
