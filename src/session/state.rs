use serde::{Deserialize, Serialize};

use crate::analysis::{self, Measurements};
use crate::capture::{ImageDimensions, SourceImage};
use crate::config::{AnalyzerConfig, Palette};
use crate::domain::{
    DragState, Joint, JointSet, Point, RoiRect, ScaleBar, Stage, Topology, ViewTransform,
    planform,
};

/// Size of the drawing surface in screen pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Transient pointer/touch/keyboard state for the gesture in progress
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureState {
    pub drag: DragState,
    pub pan_key_held: bool,
    /// Touch points currently in contact
    pub touches: usize,
    /// Set once a ROI has been committed during the current visit to the ROI stage
    pub roi_committed: bool,
}

impl GestureState {
    /// End whatever gesture is active, keeping held keys
    pub fn end(&mut self) {
        self.drag = DragState::None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One analysis session over a single photograph
///
/// Every field the renderer and exporters need is public; mutation goes
/// through [`Session::update`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip)]
    pub image: Option<SourceImage>,
    pub image_dimensions: Option<ImageDimensions>,
    pub stage: Stage,
    pub roi: Option<RoiRect>,
    pub midline_x: Option<f64>,
    pub scale_bar: ScaleBar,
    /// Placed midline and right-side joints, in image space
    pub joints: JointSet,
    /// Index into the topology's annotation sequence
    pub current_joint: usize,
    pub view: ViewTransform,
    pub viewport: Option<Viewport>,
    pub config: AnalyzerConfig,
    #[serde(skip)]
    pub gesture: GestureState,
    #[serde(skip, default = "planform")]
    topology: &'static Topology,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Session {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_topology(config, planform())
    }

    pub fn with_topology(config: AnalyzerConfig, topology: &'static Topology) -> Self {
        Self {
            image: None,
            image_dimensions: None,
            stage: Stage::Load,
            roi: None,
            midline_x: None,
            scale_bar: config.scale_bar.clone(),
            joints: JointSet::new(),
            current_joint: 0,
            view: ViewTransform::default(),
            viewport: None,
            config,
            gesture: GestureState::default(),
            topology,
        }
    }

    pub fn topology(&self) -> &'static Topology {
        self.topology
    }

    /// Start over with a new photograph
    ///
    /// Everything derived from the previous image is dropped and the whole
    /// image is fitted into the viewport.
    pub fn load_image(&mut self, image: SourceImage) {
        let dimensions = image.dimensions();
        log::info!(
            "Loading image {}x{} for analysis",
            dimensions.width,
            dimensions.height
        );
        self.image = Some(image);
        self.image_dimensions = Some(dimensions);
        self.roi = None;
        self.midline_x = None;
        self.joints.clear();
        self.current_joint = 0;
        self.gesture.clear();
        self.stage = Stage::Roi;

        let viewport = self.viewport_or_image();
        self.view = ViewTransform::fit_image(
            f64::from(dimensions.width),
            f64::from(dimensions.height),
            viewport.width,
            viewport.height,
            self.config.image_fit_margin,
            1.0,
        );
    }

    /// Viewport size, or the image size when the host has not reported one yet
    pub(crate) fn viewport_or_image(&self) -> Viewport {
        if let Some(viewport) = self.viewport {
            return viewport;
        }
        let dims = self.image_dimensions.unwrap_or_default();
        Viewport {
            width: f64::from(dims.width) + self.config.image_fit_margin,
            height: f64::from(dims.height) + self.config.image_fit_margin,
        }
    }

    /// Placed joints plus the mirrored left side
    pub fn full_joints(&self) -> JointSet {
        analysis::complete_joints(&self.joints, self.midline_x, self.topology)
    }

    pub fn measurements(&self) -> Measurements {
        analysis::compute(&self.full_joints(), &self.scale_bar, self.topology)
    }

    /// Joint the next annotate click will place
    pub fn current_joint(&self) -> Option<&'static Joint> {
        let topology: &'static Topology = self.topology;
        topology.sequence().get(self.current_joint)
    }

    /// Whether every joint in the sequence has been placed
    pub fn is_complete(&self) -> bool {
        self.topology
            .sequence()
            .iter()
            .all(|joint| self.joints.contains(&joint.id))
    }

    pub fn has_unplaced_joint(&self) -> bool {
        !self.is_complete()
    }

    /// Instruction line shown for the current stage
    pub fn instruction(&self) -> String {
        if let Some(text) = self.stage.instruction() {
            return text.to_string();
        }
        match self.current_joint() {
            Some(joint) if self.has_unplaced_joint() => format!("Click to place: {}", joint.name),
            _ => "Complete!".to_string(),
        }
    }

    /// Whether the user may switch to `stage`
    pub fn can_enter(&self, stage: Stage) -> bool {
        match stage {
            Stage::Load => false,
            Stage::Roi => self.image.is_some() || self.image_dimensions.is_some(),
            _ => self.roi.is_some(),
        }
    }

    pub fn annotation_scale(&self) -> f64 {
        self.config.annotation_scale
    }

    pub fn palette(&self) -> Palette {
        self.config.annotation_style.palette()
    }

    /// Screen y of the midline drag handle
    pub fn midline_handle_y(&self) -> f64 {
        match self.viewport {
            Some(viewport) => viewport.height - self.config.midline_handle_inset,
            None => 30.0,
        }
    }

    /// Screen position of the midline handle, where the midline crosses the handle row
    pub fn midline_handle_position(&self) -> Option<Point> {
        let x = self.midline_x?;
        let handle_y = self.midline_handle_y();
        let top = self.view.image_to_screen(Point::new(x, 0.0));
        let below = self.view.image_to_screen(Point::new(x, 1.0));
        let dy = below.y - top.y;
        if dy.abs() < 1e-9 {
            return Some(Point::new(top.x, handle_y));
        }
        let t = (handle_y - top.y) / dy;
        Some(Point::new(top.x + t * (below.x - top.x), handle_y))
    }

    /// Image-space point the view rotates around
    ///
    /// Midline and ROI centre when both exist, else the image centre.
    pub fn rotation_pivot(&self) -> Option<Point> {
        if let (Some(x), Some(roi)) = (self.midline_x, self.roi) {
            return Some(Point::new(x, roi.y + roi.height / 2.0));
        }
        self.image_dimensions
            .filter(|dims| dims.width > 0)
            .map(|dims| Point::new(f64::from(dims.width) / 2.0, f64::from(dims.height) / 2.0))
    }

    /// ROI rectangle being dragged out, in image space
    pub fn pending_roi(&self) -> Option<RoiRect> {
        match self.gesture.drag {
            DragState::Roi { start, current } => Some(RoiRect::from_corners(start, current)),
            _ => None,
        }
    }
}
