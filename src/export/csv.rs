//! CSV measurement table

use std::fmt::Write as _;

use crate::analysis::Measurements;
use crate::domain::Topology;

pub const HEADER: &str = "Type,Name,Side,Value,Unit";

/// Sentinel for bones whose length cannot be measured yet
pub const NOT_AVAILABLE: &str = "N/A";

/// One row per bone, then one row per angle
pub fn build_csv(measurements: &Measurements, unit: &str, topology: &Topology) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    for bone in &measurements.bones {
        let value = bone
            .length
            .map_or_else(|| NOT_AVAILABLE.to_string(), |len| format!("{len:.3}"));
        let _ = writeln!(
            out,
            "Bone,{},{},{},{}",
            field(&bone.name),
            field(&bone.side),
            value,
            field(unit)
        );
    }
    for angle in &measurements.angles {
        let _ = writeln!(
            out,
            "Angle,{},{},{:.1},degrees",
            field(&angle.label()),
            angle.side_label(topology),
            angle.angle
        );
    }
    out
}

/// Quote a field when it contains a separator, quote or line break
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{complete_joints, compute};
    use crate::domain::{JointSet, Point, ScaleBar, planform};

    #[test]
    fn test_missing_joint_prints_sentinel() {
        let joints: JointSet = [("head", Point::new(0.0, 0.0))].into_iter().collect();
        let m = compute(&joints, &ScaleBar::default(), planform());
        let csv = build_csv(&m, "cm", planform());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(lines.next(), Some("Bone,Upper Spine,midline,N/A,cm"));
        assert!(!csv.contains("Angle,"));
    }

    #[test]
    fn test_lengths_and_angles() {
        let placed: JointSet = [
            ("head", Point::new(0.0, 0.0)),
            ("neck", Point::new(0.0, 10.0)),
            ("torso", Point::new(10.0, 10.0)),
            ("shoulder_r", Point::new(20.0, 10.0)),
        ]
        .into_iter()
        .collect();
        let full = complete_joints(&placed, Some(0.0), planform());
        let m = compute(&full, &ScaleBar::default(), planform());
        let csv = build_csv(&m, "cm", planform());
        assert!(csv.contains("Bone,Upper Spine,midline,0.100,cm\n"));
        assert!(csv.contains("Bone,Scapula/Clavicle,right,0.200,cm\n"));
        assert!(csv.contains("Angle,neck (Upper Spine - Mid Spine),midline,90.0,degrees\n"));
    }

    #[test]
    fn test_unit_with_comma_is_quoted() {
        assert_eq!(field("mm, approx"), "\"mm, approx\"");
        assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(field("cm"), "cm");
    }
}
