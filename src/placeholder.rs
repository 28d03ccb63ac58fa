//! Synthetic-joint injection for center-of-mass analysis.
//!
//! The kinematic solver only traces points declared as joints, so analyzing
//! a compound link's center of mass requires a joint the user never placed.
//! [`PlaceholderJoint`] injects one for the duration of an analysis session
//! and retracts it afterwards, leaving the user's mechanism untouched.
use crate::{Joint, JointId, LinkId, MechError, Mechanism};

/// Magnitude of the coordinate nudge applied to the injected joint.
///
/// A tracer point sitting exactly on the link's reference geometry is a
/// degenerate case for the solver's tracing logic; shifting both values by
/// this amount avoids it without materially changing the reported position.
pub const COM_EPSILON: f64 = 1e-5;

/// The synthetic-joint lifecycle for one analysis session.
///
/// Holds at most one handle, so a second injection without a retraction is
/// rejected instead of leaking a joint into the user's mechanism.
#[derive(Default, Debug)]
pub struct PlaceholderJoint {
    joint: Option<JointId>,
}

impl PlaceholderJoint {
    /// Inject a joint at the compound link's center of mass.
    ///
    /// Both coordinates are shifted by `-`[`COM_EPSILON`] before insertion.
    /// The created joint's identity is retained as the retraction handle
    /// and returned to the caller.
    pub fn inject(
        &mut self,
        mech: &mut Mechanism,
        link: LinkId,
    ) -> Result<JointId, PlaceholderError> {
        if self.joint.is_some() {
            return Err(PlaceholderError::AlreadyInjected);
        }
        let com = mech
            .compound_link(link)
            .ok_or(MechError::LinkNotFound(link))?
            .center_of_mass()
            .offset(-COM_EPSILON, -COM_EPSILON);
        let id = mech.add_joint_to_link(link, com)?;
        log::debug!("injected placeholder joint {id} on link {link}");
        self.joint = Some(id);
        Ok(id)
    }

    /// Remove the injected joint from the mechanism.
    ///
    /// Retracting with no injection in flight is a lifecycle violation
    /// (double-close, or the graph never opened) and reported as
    /// [`PlaceholderError::NotInjected`]; the caller should treat the
    /// analysis session as already closed. The handle is kept if the
    /// mechanism rejects the removal.
    pub fn retract(&mut self, mech: &mut Mechanism) -> Result<(), PlaceholderError> {
        let id = self.joint.ok_or(PlaceholderError::NotInjected)?;
        mech.remove_joint(id)?;
        self.joint = None;
        log::debug!("retracted placeholder joint {id}");
        Ok(())
    }

    /// The handle of the injected joint, if one is in flight.
    pub fn current(&self) -> Option<JointId> {
        self.joint
    }

    /// Find the highest-id joint across the compound link's constituents.
    ///
    /// Joint identities are allocated monotonically, so immediately after an
    /// injection the maximum id on the link is the placeholder. That holds
    /// only while no other joint is added to the link mid-session; prefer
    /// the handle kept by [`PlaceholderJoint::inject`].
    pub fn locate(mech: &Mechanism, link: LinkId) -> Option<&Joint> {
        mech.compound_link(link)?.joints().max_by_key(|j| j.id)
    }
}

/// Failure of the placeholder-joint protocol.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PlaceholderError {
    /// An injected joint is still in flight.
    AlreadyInjected,
    /// No injection to retract; the session is already closed.
    NotInjected,
    /// The mechanism rejected the mutation.
    Mech(MechError),
}

impl From<MechError> for PlaceholderError {
    fn from(e: MechError) -> Self {
        Self::Mech(e)
    }
}

impl std::fmt::Display for PlaceholderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::AlreadyInjected => write!(f, "a placeholder joint is already injected"),
            Self::NotInjected => write!(f, "no placeholder joint to retract"),
            Self::Mech(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlaceholderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mech(e) => Some(e),
            _ => None,
        }
    }
}
