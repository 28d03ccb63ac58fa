//! Linkage graph model: joints, links and their mutation primitives.
use crate::Coord;

/// Joint identity. Allocated with strictly increasing values by
/// [`Mechanism`] and never reused while the mechanism is open.
pub type JointId = usize;

/// Link identity, shared by compound links and their constituents.
pub type LinkId = usize;

/// A point of articulation with position and identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Joint {
    /// Immutable identity.
    pub id: JointId,
    /// Display name.
    pub name: String,
    /// Current position.
    pub coord: Coord,
}

/// A simple link owning an ordered set of joints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Link {
    /// Identity of this constituent.
    pub id: LinkId,
    /// Display name.
    pub name: String,
    /// Joints attached to this link, in insertion order.
    pub joints: Vec<Joint>,
}

/// A rigid grouping of one or more simple links sharing one rigid-body
/// motion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CompoundLink {
    /// Identity of the grouping.
    pub id: LinkId,
    /// Display name.
    pub name: String,
    /// Constituent simple links.
    pub links: Vec<Link>,
}

impl CompoundLink {
    /// Iterate over every joint of every constituent link, in native order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.links.iter().flat_map(|link| link.joints.iter())
    }

    /// Derived center of mass: the mean of all constituent joint positions.
    ///
    /// This is a computed point, not a joint of the mechanism.
    pub fn center_of_mass(&self) -> Coord {
        let mut sum = Coord::default();
        let mut count = 0;
        for joint in self.joints() {
            sum = sum.offset(joint.coord.x, joint.coord.y);
            count += 1;
        }
        if count == 0 {
            Coord::default()
        } else {
            Coord::new(sum.x / count as f64, sum.y / count as f64)
        }
    }
}

/// Mutation failure of the mechanism graph.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MechError {
    /// The joint id does not exist in the mechanism.
    JointNotFound(JointId),
    /// The link id does not exist in the mechanism.
    LinkNotFound(LinkId),
}

impl std::fmt::Display for MechError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::JointNotFound(id) => write!(f, "joint {id} not found"),
            Self::LinkNotFound(id) => write!(f, "link {id} not found"),
        }
    }
}

impl std::error::Error for MechError {}

/// The full linkage graph plus the joint-id allocator.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Mechanism {
    links: Vec<CompoundLink>,
    next_joint: JointId,
    next_link: LinkId,
}

impl Mechanism {
    /// Create an empty mechanism.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a compound link with a single constituent simple link.
    ///
    /// Returns the identity of the grouping.
    pub fn add_compound_link(&mut self, name: impl Into<String>) -> LinkId {
        let id = self.next_link;
        let member = Link {
            id: id + 1,
            name: format!("L{}", id + 1),
            joints: Vec::new(),
        };
        self.next_link += 2;
        let name = name.into();
        self.links.push(CompoundLink { id, name, links: vec![member] });
        id
    }

    /// Add another constituent simple link to a compound link.
    pub fn add_constituent(&mut self, compound: LinkId) -> Result<LinkId, MechError> {
        let id = self.next_link;
        let com = self
            .links
            .iter_mut()
            .find(|com| com.id == compound)
            .ok_or(MechError::LinkNotFound(compound))?;
        com.links.push(Link {
            id,
            name: format!("L{id}"),
            joints: Vec::new(),
        });
        self.next_link += 1;
        Ok(id)
    }

    /// Add a joint to the named link.
    ///
    /// `link` may be a compound link (the joint lands on its first
    /// constituent, as the compound link is rigid) or a constituent simple
    /// link. The joint gets a fresh, strictly-greater identity, which is
    /// returned.
    pub fn add_joint_to_link(&mut self, link: LinkId, coord: Coord) -> Result<JointId, MechError> {
        let id = self.next_joint;
        let target = self
            .target_link_mut(link)
            .ok_or(MechError::LinkNotFound(link))?;
        target.joints.push(Joint { id, name: format!("J{id}"), coord });
        self.next_joint += 1;
        Ok(id)
    }

    /// Detach and delete a joint.
    pub fn remove_joint(&mut self, joint: JointId) -> Result<(), MechError> {
        for com in &mut self.links {
            for link in &mut com.links {
                if let Some(i) = link.joints.iter().position(|j| j.id == joint) {
                    link.joints.remove(i);
                    return Ok(());
                }
            }
        }
        Err(MechError::JointNotFound(joint))
    }

    /// Look up a compound link by identity.
    pub fn compound_link(&self, link: LinkId) -> Option<&CompoundLink> {
        self.links.iter().find(|com| com.id == link)
    }

    /// All compound links of the mechanism.
    pub fn compound_links(&self) -> &[CompoundLink] {
        &self.links
    }

    /// Look up a joint by identity.
    pub fn joint(&self, joint: JointId) -> Option<&Joint> {
        self.joints().find(|j| j.id == joint)
    }

    /// Iterate over every joint of the mechanism.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.links.iter().flat_map(CompoundLink::joints)
    }

    /// Number of joints in the mechanism.
    pub fn joint_count(&self) -> usize {
        self.joints().count()
    }

    fn target_link_mut(&mut self, link: LinkId) -> Option<&mut Link> {
        for com in &mut self.links {
            if com.id == link {
                return com.links.first_mut();
            }
            if let Some(l) = com.links.iter_mut().find(|l| l.id == link) {
                return Some(l);
            }
        }
        None
    }
}

#[test]
fn joint_allocation() {
    let mut mech = Mechanism::new();
    let link = mech.add_compound_link("Coupler");
    let a = mech.add_joint_to_link(link, Coord::new(0., 0.)).unwrap();
    let b = mech.add_joint_to_link(link, Coord::new(1., 0.)).unwrap();
    assert!(b > a);
    mech.remove_joint(a).unwrap();
    // Identities are never reused.
    let c = mech.add_joint_to_link(link, Coord::new(2., 0.)).unwrap();
    assert!(c > b);
    assert_eq!(mech.remove_joint(a), Err(MechError::JointNotFound(a)));
    assert_eq!(
        mech.add_joint_to_link(999, Coord::new(0., 0.)),
        Err(MechError::LinkNotFound(999)),
    );
}

#[test]
fn center_of_mass_is_joint_mean() {
    let mut mech = Mechanism::new();
    let link = mech.add_compound_link("Coupler");
    mech.add_joint_to_link(link, Coord::new(4., 16.)).unwrap();
    mech.add_joint_to_link(link, Coord::new(16., 24.)).unwrap();
    let com = mech.compound_link(link).unwrap().center_of_mass();
    assert_eq!(com, Coord::new(10., 20.));
}
