//! The position-solver collaborator seam.
use crate::{ChartSeries, Coord, JointId, Mechanism};
use std::collections::BTreeMap;

/// Position trajectories of the mechanism's joints across one motion cycle.
///
/// Within one solve, every trajectory shares the same sampled instants;
/// their count and order are solver-defined.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct AnimationPositions {
    time_labels: Vec<String>,
    trajectories: BTreeMap<JointId, Vec<Coord>>,
}

impl AnimationPositions {
    /// Create from the shared instant labels.
    pub fn new(time_labels: Vec<String>) -> Self {
        Self { time_labels, trajectories: BTreeMap::new() }
    }

    /// Record one joint's trajectory.
    ///
    /// The trajectory length must match the instant count.
    pub fn insert(&mut self, joint: JointId, path: Vec<Coord>) {
        debug_assert_eq!(path.len(), self.time_labels.len());
        self.trajectories.insert(joint, path);
    }

    /// The sampled instant labels.
    pub fn time_labels(&self) -> &[String] {
        &self.time_labels
    }

    /// One joint's trajectory, if the joint was present at solve time.
    pub fn trajectory(&self, joint: JointId) -> Option<&[Coord]> {
        self.trajectories.get(&joint).map(Vec::as_slice)
    }

    /// Project one joint's trajectory into the chart shape.
    ///
    /// Returns `None` if the joint has no entry.
    pub fn chart_series(&self, joint: JointId) -> Option<ChartSeries> {
        let path = self.trajectory(joint)?;
        let mut series = ChartSeries::empty();
        for (coord, label) in path.iter().zip(&self.time_labels) {
            series.push(coord.x, coord.y, label.clone());
        }
        Some(series)
    }
}

/// Solver collaborator: computes joint trajectories over one motion cycle.
///
/// No implementation ships with this crate; the host's kinematic solver
/// provides one. The call is synchronous and blocking.
pub trait PositionSolver {
    /// Solve the position of every joint currently in the mechanism at each
    /// sampled instant of one motion cycle.
    fn solve_positions(&self, mech: &Mechanism) -> AnimationPositions;

    /// Reshape one joint's trajectory into a chart series.
    ///
    /// Returns `None` if the joint has no entry in `positions`.
    fn transform_positions_for_chart(
        &self,
        positions: &AnimationPositions,
        joint: JointId,
    ) -> Option<ChartSeries> {
        positions.chart_series(joint)
    }
}
