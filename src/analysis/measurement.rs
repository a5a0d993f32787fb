//! Bone lengths and inter-bone joint angles
//!
//! Recomputed from scratch on every call; the functions here are pure.

use serde::{Deserialize, Serialize};

use crate::domain::{JointSet, ScaleBar, Side, Topology, angle_at_vertex, distance};

/// Length of one topology bone
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneMeasurement {
    pub id: String,
    pub name: String,
    /// `left`, `right` or `midline`
    pub side: String,
    pub pixel_length: Option<f64>,
    /// Real-world length, absent when an endpoint is missing or the scale is unusable
    pub length: Option<f64>,
}

/// Angle at the joint two bones share
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    pub joint: String,
    pub bones: [String; 2],
    /// Degrees, rounded to one decimal
    pub angle: f64,
}

impl AngleMeasurement {
    /// Side label used in exports
    pub fn side_label(&self, topology: &Topology) -> &'static str {
        match topology.joint(&self.joint).and_then(|j| j.side) {
            Some(Side::Right) => "right",
            Some(Side::Left) => "left",
            None => "midline",
        }
    }

    /// `<joint> (<boneA> - <boneB>)`
    pub fn label(&self) -> String {
        format!("{} ({} - {})", self.joint, self.bones[0], self.bones[1])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// One entry per topology bone, in topology order
    pub bones: Vec<BoneMeasurement>,
    /// One entry per bone pair sharing exactly one joint with all three points placed
    pub angles: Vec<AngleMeasurement>,
}

impl Measurements {
    pub fn bone(&self, id: &str) -> Option<&BoneMeasurement> {
        self.bones.iter().find(|b| b.id == id)
    }
}

/// Measure every bone and every shared-joint angle in `joints`
///
/// `joints` should already be bilaterally completed.
pub fn compute(joints: &JointSet, scale_bar: &ScaleBar, topology: &Topology) -> Measurements {
    let pixels_per_unit = scale_bar.pixels_per_unit();
    let bones = topology
        .bones()
        .iter()
        .map(|bone| {
            let pixel_length = distance(joints.get(&bone.from), joints.get(&bone.to));
            BoneMeasurement {
                id: bone.id.clone(),
                name: bone.name.clone(),
                side: bone.side_label().to_string(),
                pixel_length,
                length: pixel_length.zip(pixels_per_unit).map(|(px, ppu)| px / ppu),
            }
        })
        .collect();

    let mut angles = Vec::new();
    let all = topology.bones();
    for (i, bone) in all.iter().enumerate() {
        for other in &all[i + 1..] {
            let Some((shared, a, b)) = bone.shared_joint(other) else {
                continue;
            };
            let Some(angle) = angle_at_vertex(joints.get(a), joints.get(shared), joints.get(b))
            else {
                continue;
            };
            angles.push(AngleMeasurement {
                joint: shared.to_string(),
                bones: [bone.name.clone(), other.name.clone()],
                angle: round_to_tenth(angle),
            });
        }
    }

    Measurements { bones, angles }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, planform};

    fn unit_bar() -> ScaleBar {
        ScaleBar {
            length: 100.0,
            real_value: 1.0,
            ..ScaleBar::default()
        }
    }

    #[test]
    fn test_bone_length_in_units() {
        let joints: JointSet = [("head", Point::new(0.0, 0.0)), ("neck", Point::new(0.0, 10.0))]
            .into_iter()
            .collect();
        let m = compute(&joints, &unit_bar(), planform());
        let upper = m.bone("spine_upper").unwrap();
        assert_eq!(upper.pixel_length, Some(10.0));
        assert!((upper.length.unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(m.bones.len(), planform().bones().len());
    }

    #[test]
    fn test_missing_endpoint_reports_absent() {
        let joints: JointSet = [("head", Point::new(0.0, 0.0))].into_iter().collect();
        let m = compute(&joints, &unit_bar(), planform());
        let upper = m.bone("spine_upper").unwrap();
        assert_eq!(upper.pixel_length, None);
        assert_eq!(upper.length, None);
        assert!(m.angles.is_empty());
    }

    #[test]
    fn test_right_angle_at_neck() {
        let joints: JointSet = [
            ("head", Point::new(0.0, 0.0)),
            ("neck", Point::new(0.0, 10.0)),
            ("torso", Point::new(10.0, 10.0)),
        ]
        .into_iter()
        .collect();
        let m = compute(&joints, &unit_bar(), planform());
        assert_eq!(m.angles.len(), 1);
        let a = &m.angles[0];
        assert_eq!(a.joint, "neck");
        assert_eq!(a.bones, ["Upper Spine".to_string(), "Mid Spine".to_string()]);
        assert_eq!(a.angle, 90.0);
        assert_eq!(a.side_label(planform()), "midline");
        assert_eq!(a.label(), "neck (Upper Spine - Mid Spine)");
    }

    #[test]
    fn test_each_pair_counted_once() {
        let joints: JointSet = [
            ("head", Point::new(0.0, 0.0)),
            ("neck", Point::new(0.0, 10.0)),
            ("torso", Point::new(0.0, 20.0)),
            ("shoulder_r", Point::new(8.0, 12.0)),
        ]
        .into_iter()
        .collect();
        let m = compute(&joints, &unit_bar(), planform());
        // upper/mid, upper/scapula, mid/scapula all meet at the neck
        assert_eq!(m.angles.len(), 3);
        assert!(m.angles.iter().all(|a| a.joint == "neck"));
        assert_eq!(m.angles[0].angle, 180.0);
    }

    #[test]
    fn test_angle_rounds_to_one_decimal() {
        let joints: JointSet = [
            ("head", Point::new(0.0, 0.0)),
            ("neck", Point::new(0.0, 10.0)),
            ("torso", Point::new(3.0, 20.0)),
        ]
        .into_iter()
        .collect();
        let m = compute(&joints, &unit_bar(), planform());
        let angle = m.angles[0].angle;
        assert_eq!(angle, (angle * 10.0).round() / 10.0);
        assert_eq!(angle, 163.3);
    }

    #[test]
    fn test_unusable_scale_keeps_pixels() {
        let joints: JointSet = [("head", Point::new(0.0, 0.0)), ("neck", Point::new(0.0, 10.0))]
            .into_iter()
            .collect();
        let bar = ScaleBar {
            real_value: 0.0,
            ..unit_bar()
        };
        let m = compute(&joints, &bar, planform());
        let upper = m.bone("spine_upper").unwrap();
        assert_eq!(upper.pixel_length, Some(10.0));
        assert_eq!(upper.length, None);
    }
}
