//! Workflow stages and drag gestures

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Step of the analysis workflow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Load,
    Roi,
    Midline,
    Scale,
    Annotate,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Load,
        Stage::Roi,
        Stage::Midline,
        Stage::Scale,
        Stage::Annotate,
        Stage::Review,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Stage::Load => "Load Image",
            Stage::Roi => "Select ROI",
            Stage::Midline => "Set Midline",
            Stage::Scale => "Adjust Scale",
            Stage::Annotate => "Annotate Joints",
            Stage::Review => "Review & Export",
        }
    }

    /// Static instruction line; the annotate stage depends on the current joint
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Stage::Load => Some("Upload a planform image to begin"),
            Stage::Roi => Some("Click and drag to select the region of interest"),
            Stage::Midline => Some("Drag the handle at bottom to position midline"),
            Stage::Scale => Some("Drag scale bar to a known reference length"),
            Stage::Annotate => None,
            Stage::Review => Some("Drag joints to adjust, then export"),
        }
    }

    /// Whether bones and joints are shown and hit-tested
    pub fn shows_skeleton(self) -> bool {
        matches!(self, Stage::Annotate | Stage::Review)
    }

    /// Whether midline and scale bar are shown
    pub fn shows_references(self) -> bool {
        !matches!(self, Stage::Load | Stage::Roi)
    }
}

/// Which part of the scale bar is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleHandle {
    /// Anchor or body: moves the whole bar
    Move,
    /// End cap: changes the length only
    Resize,
}

/// The single gesture active between pointer-down and pointer-up
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    None,
    /// Translating the view; offsets are screen space
    Pan { start: Point, base_offset: Point },
    /// Rotating the view around its pivot
    Rotate { start_bearing: f64, base_degrees: f64 },
    /// Drawing a region of interest; image space
    Roi { start: Point, current: Point },
    Midline,
    Scale(ScaleHandle),
    Joint(String),
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::None)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, DragState::Pan { .. })
    }

    pub fn dragged_joint(&self) -> Option<&str> {
        match self {
            DragState::Joint(id) => Some(id),
            _ => None,
        }
    }
}
