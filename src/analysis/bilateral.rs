//! Mirror right-side placements onto the left side

use crate::domain::{JointSet, Topology};

/// Derive the full joint set used for drawing and measurement
///
/// Each placed joint that has a topology partner gets that partner added at
/// its reflection across `axis_x`, unless the partner is already present.
/// Without a midline nothing is derived.
pub fn complete_joints(placed: &JointSet, axis_x: Option<f64>, topology: &Topology) -> JointSet {
    let mut all = placed.clone();
    let Some(axis_x) = axis_x else {
        return all;
    };

    for (id, pos) in placed.iter() {
        let Some(partner) = topology.joint(id).and_then(|j| j.paired_with.as_deref()) else {
            continue;
        };
        if !all.contains(partner) {
            all.insert(partner, pos.mirrored(axis_x));
        }
    }
    all
}
