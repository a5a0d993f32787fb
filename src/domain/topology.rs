//! Anatomical topology: the joints a user annotates and the bones between them
//!
//! Right-side joints are canonical. Each one is paired with a derived
//! left-side joint at construction time, so downstream code never has to
//! manipulate id suffixes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// Body side of a joint or bone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Anatomical landmark
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub id: String,
    pub name: String,
    pub midline: bool,
    pub side: Option<Side>,
    /// Position in the annotation sequence (derived joints share their partner's)
    pub order: u32,
    /// Opposite-side counterpart, resolved when the topology is built
    pub paired_with: Option<String>,
}

/// Edge between two joints
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub id: String,
    pub from: String,
    pub to: String,
    pub name: String,
    pub side: Option<Side>,
}

impl Bone {
    /// Label used in exports: the side name, or `midline`
    pub fn side_label(&self) -> &'static str {
        self.side.map_or("midline", Side::as_str)
    }

    fn endpoints(&self) -> [&str; 2] {
        [self.from.as_str(), self.to.as_str()]
    }

    /// The single joint shared with `other`, as `(shared, own_far_end, other_far_end)`
    ///
    /// Returns `None` when the bones share no endpoint or both endpoints.
    pub fn shared_joint<'a>(&'a self, other: &'a Bone) -> Option<(&'a str, &'a str, &'a str)> {
        let shared = self
            .endpoints()
            .into_iter()
            .filter(|id| other.endpoints().contains(id))
            .count();
        if shared != 1 {
            return None;
        }

        if self.to == other.from {
            Some((self.to.as_str(), self.from.as_str(), other.to.as_str()))
        } else if self.from == other.to {
            Some((self.from.as_str(), self.to.as_str(), other.from.as_str()))
        } else if self.to == other.to {
            Some((self.to.as_str(), self.from.as_str(), other.from.as_str()))
        } else {
            Some((self.from.as_str(), self.to.as_str(), other.to.as_str()))
        }
    }
}

/// Validated joint/bone graph
#[derive(Clone, Debug)]
pub struct Topology {
    /// Placeable joints (midline + right side), sorted by `order`
    joints: Vec<Joint>,
    /// Left-side joints derived from the right side
    mirrored: Vec<Joint>,
    bones: Vec<Bone>,
    index: HashMap<String, usize>,
}

/// Joint definition before pairing: `(id, name, side, order)`; no side means midline
pub type JointSpec<'a> = (&'a str, &'a str, Option<Side>, u32);
/// Bone definition: `(id, from, to, name)`; side follows the joints it connects
pub type BoneSpec<'a> = (&'a str, &'a str, &'a str, &'a str);

impl Topology {
    /// Build a topology, deriving left-side joints and checking graph invariants
    pub fn new(joints: &[JointSpec<'_>], bones: &[BoneSpec<'_>]) -> anyhow::Result<Self> {
        let mut placeable = Vec::with_capacity(joints.len());
        let mut mirrored = Vec::new();
        let mut orders = HashSet::new();

        for &(id, name, side, order) in joints {
            if side == Some(Side::Left) {
                bail!("joint `{id}`: left-side joints are derived, not declared");
            }
            if !orders.insert(order) {
                bail!("joint `{id}`: duplicate annotation order {order}");
            }
            let paired_with = match side {
                Some(Side::Right) => Some(left_id(id).with_context(|| {
                    format!("right-side joint `{id}` must end with `_r`")
                })?),
                _ => None,
            };
            if let Some(left) = &paired_with {
                mirrored.push(Joint {
                    id: left.clone(),
                    name: left_name(name),
                    midline: false,
                    side: Some(Side::Left),
                    order,
                    paired_with: Some(id.to_string()),
                });
            }
            placeable.push(Joint {
                id: id.to_string(),
                name: name.to_string(),
                midline: side.is_none(),
                side,
                order,
                paired_with,
            });
        }
        placeable.sort_by_key(|j| j.order);

        let mut index = HashMap::new();
        for (i, joint) in placeable.iter().chain(mirrored.iter()).enumerate() {
            if index.insert(joint.id.clone(), i).is_some() {
                bail!("duplicate joint id `{}`", joint.id);
            }
        }

        let mut built = Vec::with_capacity(bones.len());
        for &(id, from, to, name) in bones {
            for end in [from, to] {
                if !index.contains_key(end) {
                    bail!("bone `{id}` references unknown joint `{end}`");
                }
            }
            let side_of = |jid: &str| {
                placeable
                    .iter()
                    .chain(mirrored.iter())
                    .find(|j| j.id == jid)
                    .and_then(|j| j.side)
            };
            built.push(Bone {
                id: id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                name: name.to_string(),
                side: side_of(to).or_else(|| side_of(from)),
            });
        }

        let topology = Self {
            joints: placeable,
            mirrored,
            bones: built,
            index,
        };
        topology.check_connected()?;
        Ok(topology)
    }

    fn check_connected(&self) -> anyhow::Result<()> {
        let Some(first) = self.joints.first() else {
            return Ok(());
        };
        let mut seen = HashSet::from([first.id.as_str()]);
        let mut queue = VecDeque::from([first.id.as_str()]);
        while let Some(current) = queue.pop_front() {
            for bone in &self.bones {
                let next = if bone.from == current {
                    bone.to.as_str()
                } else if bone.to == current {
                    bone.from.as_str()
                } else {
                    continue;
                };
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        if let Some(orphan) = self.joints.iter().find(|j| !seen.contains(j.id.as_str())) {
            bail!("joint `{}` is not connected to the skeleton", orphan.id);
        }
        Ok(())
    }

    /// Placeable joints in annotation order
    pub fn sequence(&self) -> &[Joint] {
        &self.joints
    }

    /// Derived left-side joints
    pub fn mirrored(&self) -> &[Joint] {
        &self.mirrored
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Every joint, placeable first, then derived
    pub fn all_joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter().chain(self.mirrored.iter())
    }

    pub fn joint(&self, id: &str) -> Option<&Joint> {
        let i = *self.index.get(id)?;
        self.joints.get(i).or_else(|| self.mirrored.get(i - self.joints.len()))
    }

    pub fn bone(&self, id: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }
}

fn left_id(right: &str) -> Option<String> {
    right.strip_suffix("_r").map(|stem| format!("{stem}_l"))
}

fn left_name(right: &str) -> String {
    match right.strip_suffix("(R)") {
        Some(stem) => format!("{stem}(L)"),
        None => format!("{right} (L)"),
    }
}

const PLANFORM_JOINTS: &[JointSpec<'static>] = &[
    ("head", "Head Center", None, 1),
    ("neck", "Neck/Shoulder Line", None, 2),
    ("torso", "Torso Center", None, 3),
    ("pelvis", "Pelvis Center", None, 4),
    ("tail", "Tail Tip", None, 5),
    ("shoulder_r", "Shoulder (R)", Some(Side::Right), 6),
    ("elbow_r", "Elbow (R)", Some(Side::Right), 7),
    ("wrist_r", "Wrist (R)", Some(Side::Right), 8),
    ("hand_r", "Hand Tip (R)", Some(Side::Right), 9),
    ("hip_r", "Hip (R)", Some(Side::Right), 10),
    ("knee_r", "Knee (R)", Some(Side::Right), 11),
    ("ankle_r", "Ankle (R)", Some(Side::Right), 12),
    ("foot_r", "Foot Tip (R)", Some(Side::Right), 13),
];

const PLANFORM_BONES: &[BoneSpec<'static>] = &[
    ("spine_upper", "head", "neck", "Upper Spine"),
    ("spine_mid", "neck", "torso", "Mid Spine"),
    ("spine_lower", "torso", "pelvis", "Lower Spine"),
    ("tail_bone", "pelvis", "tail", "Tail"),
    ("scapula_r", "neck", "shoulder_r", "Scapula/Clavicle"),
    ("humerus_r", "shoulder_r", "elbow_r", "Humerus"),
    ("forearm_r", "elbow_r", "wrist_r", "Forearm"),
    ("hand_bone_r", "wrist_r", "hand_r", "Hand"),
    ("pelvis_bone_r", "pelvis", "hip_r", "Pelvis"),
    ("femur_r", "hip_r", "knee_r", "Femur"),
    ("tibia_r", "knee_r", "ankle_r", "Tibia"),
    ("foot_bone_r", "ankle_r", "foot_r", "Foot"),
];

static PLANFORM: LazyLock<Topology> = LazyLock::new(|| {
    match Topology::new(PLANFORM_JOINTS, PLANFORM_BONES) {
        Ok(topology) => topology,
        // The built-in tables are covered by tests; a failure here is a programming error.
        Err(err) => panic!("built-in planform topology is invalid: {err:#}"),
    }
});

/// The gliding-mammal skeleton shared by every session
pub fn planform() -> &'static Topology {
    &PLANFORM
}
