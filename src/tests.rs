use crate::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::TAU;

const CYCLE_RES: usize = 8;

/// Revolves every joint of the mechanism around the origin for one cycle.
struct OrbitSolver;

impl PositionSolver for OrbitSolver {
    fn solve_positions(&self, mech: &Mechanism) -> AnimationPositions {
        let labels = (0..CYCLE_RES).map(|i| format!("t{i}")).collect();
        let mut positions = AnimationPositions::new(labels);
        for joint in mech.joints() {
            let Coord { x, y } = joint.coord;
            let path = (0..CYCLE_RES)
                .map(|i| {
                    let t = i as f64 / CYCLE_RES as f64 * TAU;
                    let (s, c) = t.sin_cos();
                    Coord::new(x * c - y * s, x * s + y * c)
                })
                .collect();
            positions.insert(joint.id, path);
        }
        positions
    }
}

/// Ground link with joints 0..=4, coupler with joints 5 and 6.
fn mechanism() -> (Mechanism, LinkId) {
    let mut mech = Mechanism::new();
    let ground = mech.add_compound_link("Ground");
    for i in 0..5 {
        mech.add_joint_to_link(ground, Coord::new(i as f64, 0.)).unwrap();
    }
    let coupler = mech.add_compound_link("Coupler");
    mech.add_joint_to_link(coupler, [4., 16.].into()).unwrap();
    mech.add_joint_to_link(coupler, [16., 24.].into()).unwrap();
    (mech, coupler)
}

fn joint_ids(mech: &Mechanism, link: LinkId) -> Vec<JointId> {
    let mut ids = mech.compound_link(link).unwrap().joints().map(|j| j.id).collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}

#[test]
fn injection_round_trip() {
    let (mut mech, coupler) = mechanism();
    let before = joint_ids(&mech, coupler);
    let count = mech.joint_count();
    let mut placeholder = PlaceholderJoint::default();
    let id = placeholder.inject(&mut mech, coupler).unwrap();
    assert!(!before.contains(&id));
    assert_eq!(mech.joint_count(), count + 1);
    let located = PlaceholderJoint::locate(&mech, coupler).unwrap();
    assert_eq!(located.id, id);
    assert_eq!(placeholder.current(), Some(id));
    placeholder.retract(&mut mech).unwrap();
    assert_eq!(joint_ids(&mech, coupler), before);
    assert_eq!(mech.joint_count(), count);
    assert_eq!(placeholder.current(), None);
}

#[test]
fn com_graph_scenario() {
    let (mut mech, coupler) = mechanism();
    assert_eq!(joint_ids(&mech, coupler), [5, 6]);
    let mut panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
    let series = panel.open_graph(&mut mech, GraphType::CoMPosition).unwrap();
    assert_eq!(series.len(), CYCLE_RES);
    assert_eq!(joint_ids(&mech, coupler), [5, 6, 7]);
    let coord = mech.joint(7).unwrap().coord;
    let [x, y] = <[f64; 2]>::from(coord);
    assert_abs_diff_eq!(x, 9.99999, epsilon = 1e-12);
    assert_abs_diff_eq!(y, 19.99999, epsilon = 1e-12);
    // The solved path starts at the placeholder position.
    assert_abs_diff_eq!(series.x_data[0], coord.x, epsilon = 1e-12);
    assert_abs_diff_eq!(series.y_data[0], coord.y, epsilon = 1e-12);
    panel.close_graph(&mut mech).unwrap();
    assert_eq!(joint_ids(&mech, coupler), [5, 6]);
}

#[test]
fn perturbation_bound() {
    let (mut mech, coupler) = mechanism();
    let com = mech.compound_link(coupler).unwrap().center_of_mass();
    let mut placeholder = PlaceholderJoint::default();
    let id = placeholder.inject(&mut mech, coupler).unwrap();
    let coord = mech.joint(id).unwrap().coord;
    assert_abs_diff_eq!(coord.x, com.x - COM_EPSILON, epsilon = f64::EPSILON);
    assert_abs_diff_eq!(coord.y, com.y - COM_EPSILON, epsilon = f64::EPSILON);
    assert_abs_diff_eq!(com.distance(&coord), COM_EPSILON * 2f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn locate_tie_break() {
    let (mut mech, coupler) = mechanism();
    // Spread the user's joints over two constituent links.
    let member = mech.add_constituent(coupler).unwrap();
    mech.add_joint_to_link(member, Coord::new(8., 20.)).unwrap();
    mech.add_joint_to_link(coupler, Coord::new(12., 18.)).unwrap();
    mech.add_joint_to_link(member, Coord::new(10., 22.)).unwrap();
    let max = joint_ids(&mech, coupler).into_iter().max().unwrap();
    assert_eq!(PlaceholderJoint::locate(&mech, coupler).unwrap().id, max);
    let mut placeholder = PlaceholderJoint::default();
    let id = placeholder.inject(&mut mech, coupler).unwrap();
    // The placeholder is the most recently allocated joint, so the max-id
    // scan finds it no matter which constituent it landed on.
    assert!(id > max);
    assert_eq!(PlaceholderJoint::locate(&mech, coupler).unwrap().id, id);
}

#[test]
fn handle_survives_user_edit() {
    let (mut mech, coupler) = mechanism();
    let mut placeholder = PlaceholderJoint::default();
    let id = placeholder.inject(&mut mech, coupler).unwrap();
    // A joint added mid-session takes a higher id than the placeholder,
    // breaking the max-id assumption of the locate scan.
    let user = mech.add_joint_to_link(coupler, Coord::new(6., 18.)).unwrap();
    assert_eq!(PlaceholderJoint::locate(&mech, coupler).unwrap().id, user);
    // The retained handle still removes the right joint.
    placeholder.retract(&mut mech).unwrap();
    assert!(mech.joint(id).is_none());
    assert!(mech.joint(user).is_some());
}

#[test]
fn retract_after_external_removal() {
    let (mut mech, coupler) = mechanism();
    let mut placeholder = PlaceholderJoint::default();
    let id = placeholder.inject(&mut mech, coupler).unwrap();
    // The joint vanishes out from under the handle; the mechanism failure
    // propagates and the handle is kept.
    mech.remove_joint(id).unwrap();
    assert_eq!(
        placeholder.retract(&mut mech),
        Err(PlaceholderError::Mech(MechError::JointNotFound(id))),
    );
    assert_eq!(placeholder.current(), Some(id));
}

#[test]
fn empty_series_idempotent() {
    let mut mech = Mechanism::new();
    let link = mech.add_compound_link("Bare");
    let mut panel = AnalysisPanel::new(OrbitSolver, &mech, link);
    assert_eq!(panel.reference_joint(), None);
    let count = mech.joint_count();
    let series = panel.open_graph(&mut mech, GraphType::ReferenceJointPosition).unwrap();
    assert_eq!(series, ChartSeries::empty());
    assert_eq!(panel.graph_data(&mech), ChartSeries::empty());
    assert_eq!(panel.graph_data(&mech), ChartSeries::empty());
    assert_eq!(mech.joint_count(), count);
}

#[test]
fn unimplemented_types_never_mutate() {
    let unimplemented = [
        GraphType::CoMVelocity,
        GraphType::CoMAcceleration,
        GraphType::ReferenceJointVelocity,
        GraphType::ReferenceJointAcceleration,
    ];
    for ty in unimplemented {
        assert!(!ty.is_implemented());
        let (mut mech, coupler) = mechanism();
        let count = mech.joint_count();
        let mut panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
        let series = panel.open_graph(&mut mech, ty).unwrap();
        assert!(series.is_empty());
        assert_eq!(panel.graph_type(), Some(ty));
        assert_eq!(mech.joint_count(), count);
        panel.close_graph(&mut mech).unwrap();
        assert_eq!(mech.joint_count(), count);
    }
}

#[test]
fn reopen_retracts_placeholder() {
    let (mut mech, coupler) = mechanism();
    let count = mech.joint_count();
    let mut panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
    panel.open_graph(&mut mech, GraphType::CoMPosition).unwrap();
    assert_eq!(mech.joint_count(), count + 1);
    // Switching graph types closes the old graph first.
    let series = panel.open_graph(&mut mech, GraphType::ReferenceJointPosition).unwrap();
    assert_eq!(mech.joint_count(), count);
    assert_eq!(panel.graph_type(), Some(GraphType::ReferenceJointPosition));
    assert_eq!(series.len(), CYCLE_RES);
    panel.close_graph(&mut mech).unwrap();
    assert_eq!(mech.joint_count(), count);
}

#[test]
fn lifecycle_violations() {
    let (mut mech, coupler) = mechanism();
    let mut placeholder = PlaceholderJoint::default();
    assert_eq!(
        placeholder.retract(&mut mech),
        Err(PlaceholderError::NotInjected),
    );
    placeholder.inject(&mut mech, coupler).unwrap();
    let count = mech.joint_count();
    assert_eq!(
        placeholder.inject(&mut mech, coupler),
        Err(PlaceholderError::AlreadyInjected),
    );
    assert_eq!(mech.joint_count(), count);
    // Closing a closed panel is a no-op, not a violation.
    let mut panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
    panel.close_graph(&mut mech).unwrap();
    panel.close_graph(&mut mech).unwrap();
}

#[test]
fn enumeration_completeness() {
    let mut names = std::collections::HashSet::new();
    for ty in GraphType::LIST {
        assert!(!ty.name().is_empty());
        assert!(names.insert(ty.name()));
        assert_eq!(GraphType::name_of(ty as u8), ty.name());
        assert_eq!(GraphType::try_from(ty as u8).unwrap(), ty);
    }
    assert_eq!(names.len(), GraphType::LIST.len());
    assert_eq!(GraphType::name_of(GraphType::LIST.len() as u8), "");
    assert_eq!(GraphType::name_of(u8::MAX), "");
    assert!(GraphType::CoMPosition.is_center_of_mass());
    assert!(!GraphType::ReferenceJointPosition.is_center_of_mass());
    assert_eq!(GraphType::CoMVelocity.to_string(), "Center of Mass Velocity");
}

#[test]
fn reference_joint_selection() {
    let (mut mech, coupler) = mechanism();
    let mut panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
    // Defaults to the first joint of the compound link.
    assert_eq!(panel.reference_joint(), Some(5));
    panel.select_reference_joint(6);
    assert_eq!(panel.reference_joint_name(&mech), Some("J6"));
    assert_eq!(panel.reference_joint_coord(&mech), Some(Coord::new(16., 24.)));
    let series = panel.open_graph(&mut mech, GraphType::ReferenceJointPosition).unwrap();
    assert_eq!(series.len(), CYCLE_RES);
    assert_abs_diff_eq!(series.x_data[0], 16., epsilon = 1e-12);
    assert_abs_diff_eq!(series.y_data[0], 24., epsilon = 1e-12);
    assert_eq!(series.time_labels[0], "t0");
    // Selection is not validated; a stale id degrades to absent data.
    panel.select_reference_joint(99);
    assert_eq!(panel.reference_joint_name(&mech), None);
    assert_eq!(panel.graph_data(&mech), ChartSeries::empty());
}

#[test]
fn panel_getters() {
    let (mech, coupler) = mechanism();
    let panel = AnalysisPanel::new(OrbitSolver, &mech, coupler);
    assert_eq!(panel.link(), coupler);
    assert_eq!(panel.link_name(&mech), Some("Coupler"));
    assert_eq!(panel.center_of_mass(&mech), Some(Coord::new(10., 20.)));
    assert_eq!(panel.graph_type(), None);
    assert!(panel.sections.data_summary);
    assert!(!panel.sections.graphical_analysis);
}

#[test]
fn panel_from_selection() {
    struct Sel(Option<LinkId>);

    impl Selection for Sel {
        fn selected_link(&self) -> Option<LinkId> {
            self.0
        }
    }

    let (mech, coupler) = mechanism();
    let panel = AnalysisPanel::from_selection(OrbitSolver, &mech, &Sel(Some(coupler))).unwrap();
    assert_eq!(panel.link(), coupler);
    assert!(AnalysisPanel::from_selection(OrbitSolver, &mech, &Sel(None)).is_none());
}
