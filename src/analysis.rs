//! The analysis graph controller and its graph-type enumeration.
use crate::{
    ChartSeries, CompoundLink, Coord, JointId, LinkId, MechError, Mechanism, PlaceholderError,
    PlaceholderJoint, PositionSolver,
};

/// Analyzable quantity of the selected compound link.
///
/// Only the two position variants are wired; the velocity and acceleration
/// variants are recognized but produce an empty series.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum GraphType {
    /// Path of the derived center of mass
    CoMPosition = 0,
    /// Center-of-mass velocity (not yet wired)
    CoMVelocity = 1,
    /// Center-of-mass acceleration (not yet wired)
    CoMAcceleration = 2,
    /// Path of the reference joint
    ReferenceJointPosition = 3,
    /// Reference-joint velocity (not yet wired)
    ReferenceJointVelocity = 4,
    /// Reference-joint acceleration (not yet wired)
    ReferenceJointAcceleration = 5,
}

impl GraphType {
    /// Every graph type, for menu population.
    pub const LIST: [Self; 6] = [
        Self::CoMPosition,
        Self::CoMVelocity,
        Self::CoMAcceleration,
        Self::ReferenceJointPosition,
        Self::ReferenceJointVelocity,
        Self::ReferenceJointAcceleration,
    ];

    /// Display name of the graph type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CoMPosition => "Center of Mass Position",
            Self::CoMVelocity => "Center of Mass Velocity",
            Self::CoMAcceleration => "Center of Mass Acceleration",
            Self::ReferenceJointPosition => "Reference Joint Position",
            Self::ReferenceJointVelocity => "Reference Joint Velocity",
            Self::ReferenceJointAcceleration => "Reference Joint Acceleration",
        }
    }

    /// Display name for a raw value.
    ///
    /// Returns `""` for anything outside the enumeration, so older callers
    /// survive enumeration drift.
    pub fn name_of(value: u8) -> &'static str {
        Self::try_from(value).map(|ty| ty.name()).unwrap_or("")
    }

    /// Return true if the quantity is derived from the center of mass.
    pub const fn is_center_of_mass(&self) -> bool {
        matches!(
            self,
            Self::CoMPosition | Self::CoMVelocity | Self::CoMAcceleration
        )
    }

    /// Return true if the graph type produces data.
    pub const fn is_implemented(&self) -> bool {
        matches!(self, Self::CoMPosition | Self::ReferenceJointPosition)
    }
}

impl std::fmt::Display for GraphType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for graph-type conversion.
#[derive(Debug)]
pub struct GraphTypeError;

impl std::fmt::Display for GraphTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid graph type")
    }
}

impl std::error::Error for GraphTypeError {}

impl TryFrom<u8> for GraphType {
    type Error = GraphTypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CoMPosition),
            1 => Ok(Self::CoMVelocity),
            2 => Ok(Self::CoMAcceleration),
            3 => Ok(Self::ReferenceJointPosition),
            4 => Ok(Self::ReferenceJointVelocity),
            5 => Ok(Self::ReferenceJointAcceleration),
            _ => Err(GraphTypeError),
        }
    }
}

/// The host's interaction state, narrowed to a compound-link selection.
pub trait Selection {
    /// Identity of the currently selected compound link, if any.
    fn selected_link(&self) -> Option<LinkId>;
}

/// Expansion flags of the panel's collapsible sections. Presentation only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct PanelSections {
    /// Data summary, expanded by default.
    pub data_summary: bool,
    /// Graphical analysis.
    pub graphical_analysis: bool,
    /// Joint position.
    pub position_of_joint: bool,
    /// Joint velocity.
    pub velocity_of_joint: bool,
    /// Joint acceleration.
    pub acceleration_of_joint: bool,
}

impl Default for PanelSections {
    fn default() -> Self {
        Self {
            data_summary: true,
            graphical_analysis: false,
            position_of_joint: false,
            velocity_of_joint: false,
            acceleration_of_joint: false,
        }
    }
}

/// Failure of an analysis-graph operation.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum AnalysisError {
    /// Placeholder lifecycle failure.
    Placeholder(PlaceholderError),
    /// Mechanism mutation failure.
    Mech(MechError),
}

impl From<PlaceholderError> for AnalysisError {
    fn from(e: PlaceholderError) -> Self {
        Self::Placeholder(e)
    }
}

impl From<MechError> for AnalysisError {
    fn from(e: MechError) -> Self {
        Self::Mech(e)
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Placeholder(e) => write!(f, "{e}"),
            Self::Mech(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placeholder(e) => Some(e),
            Self::Mech(e) => Some(e),
        }
    }
}

/// The analysis state machine for one selected compound link.
///
/// The solver is injected at construction; the mechanism is borrowed per
/// operation, so the panel can never be the second writer during a call.
pub struct AnalysisPanel<S> {
    solver: S,
    link: LinkId,
    graph: Option<GraphType>,
    placeholder: PlaceholderJoint,
    reference: Option<JointId>,
    /// Collapsible-section state.
    pub sections: PanelSections,
}

impl<S: PositionSolver> AnalysisPanel<S> {
    /// Create a panel analyzing the compound link `link`.
    ///
    /// The reference joint starts as the link's first joint in native
    /// ordering. It is not re-validated if the link is edited afterwards;
    /// a stale id degrades to an absent reference.
    pub fn new(solver: S, mech: &Mechanism, link: LinkId) -> Self {
        let reference = mech
            .compound_link(link)
            .and_then(|com| com.joints().next())
            .map(|joint| joint.id);
        log::debug!("analysis panel constructed for link {link}");
        Self {
            solver,
            link,
            graph: None,
            placeholder: PlaceholderJoint::default(),
            reference,
            sections: PanelSections::default(),
        }
    }

    /// Create a panel for the host's current selection.
    pub fn from_selection(
        solver: S,
        mech: &Mechanism,
        selection: &impl Selection,
    ) -> Option<Self> {
        Some(Self::new(solver, mech, selection.selected_link()?))
    }

    /// The analyzed compound link.
    pub fn link(&self) -> LinkId {
        self.link
    }

    /// The open graph type, or `None` when closed.
    pub fn graph_type(&self) -> Option<GraphType> {
        self.graph
    }

    /// Open an analysis graph and return its data.
    ///
    /// An already-open graph is closed first, so switching graph types
    /// cannot leave a placeholder joint behind. A center-of-mass position
    /// graph injects the placeholder before solving.
    pub fn open_graph(
        &mut self,
        mech: &mut Mechanism,
        ty: GraphType,
    ) -> Result<ChartSeries, AnalysisError> {
        if self.graph.is_some() {
            self.close_graph(mech)?;
        }
        if ty == GraphType::CoMPosition {
            self.placeholder.inject(mech, self.link)?;
        }
        self.graph = Some(ty);
        log::debug!("opened graph: {}", ty.name());
        Ok(self.graph_data(mech))
    }

    /// Close the open analysis graph.
    ///
    /// A center-of-mass position graph retracts its placeholder joint, so
    /// the user's mechanism is restored exactly. Closing a closed panel is
    /// a no-op.
    pub fn close_graph(&mut self, mech: &mut Mechanism) -> Result<(), AnalysisError> {
        let Some(ty) = self.graph.take() else {
            return Ok(());
        };
        if ty == GraphType::CoMPosition {
            self.placeholder.retract(mech)?;
        }
        log::debug!("closed graph: {}", ty.name());
        Ok(())
    }

    /// Chart data for the open graph.
    ///
    /// Unimplemented graph types, an unset reference joint, a target joint
    /// absent from the solver output and a closed panel all yield the empty
    /// series.
    pub fn graph_data(&self, mech: &Mechanism) -> ChartSeries {
        let target = match self.graph {
            Some(GraphType::CoMPosition) => self.placeholder.current(),
            Some(GraphType::ReferenceJointPosition) => self.reference,
            _ => None,
        };
        let Some(joint) = target else {
            return ChartSeries::empty();
        };
        let positions = self.solver.solve_positions(mech);
        self.solver
            .transform_positions_for_chart(&positions, joint)
            .unwrap_or_default()
    }

    /// Replace the reference joint unconditionally.
    ///
    /// Membership on the analyzed compound link is the caller's
    /// responsibility.
    pub fn select_reference_joint(&mut self, joint: JointId) {
        self.reference = Some(joint);
    }

    /// The tracked reference joint, if one was ever resolved.
    pub fn reference_joint(&self) -> Option<JointId> {
        self.reference
    }

    /// Display name of the analyzed compound link.
    pub fn link_name<'a>(&self, mech: &'a Mechanism) -> Option<&'a str> {
        mech.compound_link(self.link).map(|com| com.name.as_str())
    }

    /// Derived center of mass of the analyzed compound link.
    pub fn center_of_mass(&self, mech: &Mechanism) -> Option<Coord> {
        mech.compound_link(self.link).map(CompoundLink::center_of_mass)
    }

    /// Display name of the reference joint.
    pub fn reference_joint_name<'a>(&self, mech: &'a Mechanism) -> Option<&'a str> {
        mech.joint(self.reference?).map(|joint| joint.name.as_str())
    }

    /// Position of the reference joint.
    pub fn reference_joint_coord(&self, mech: &Mechanism) -> Option<Coord> {
        mech.joint(self.reference?).map(|joint| joint.coord)
    }
}
