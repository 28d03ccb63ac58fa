//! Kinematic analysis overlay for planar linkage mechanisms.
//!
//! Lets a host application request a time-series analysis of a point on a
//! rigid compound link over one motion cycle. The center of mass is not a
//! joint, so the kinematic solver has no entry for it; the overlay
//! temporarily extends the mechanism graph with a placeholder joint, drives
//! the solver, recovers the computed path, then retracts the joint without
//! disturbing the user's mechanism.
#![warn(missing_docs)]
pub use crate::analysis::*;
pub use crate::chart::*;
pub use crate::coord::*;
pub use crate::mech::*;
pub use crate::placeholder::*;
pub use crate::solver::*;

mod analysis;
mod chart;
mod coord;
mod mech;
mod placeholder;
mod solver;
#[cfg(test)]
mod tests;
