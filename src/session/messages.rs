//! Message types for analysis session interactions
//!
//! Hosts translate their toolkit's pointer, touch and keyboard events into
//! these messages and feed them to [`Session::update`](super::Session::update).

use std::time::Duration;

use crate::capture::SourceImage;
use crate::config::AnnotationStyle;
use crate::domain::{Point, Stage};

// ============================================================================
// Input Types
// ============================================================================

/// Keyboard modifier state at the time of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { control: false };

    pub const CTRL: Self = Self { control: true };

    pub fn control(self) -> bool {
        self.control
    }
}

/// Named keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Named {
    Space,
    Escape,
    Tab,
}

/// A logical key, as reported by the host toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    Named(Named),
}

impl Key {
    pub fn character(c: &str) -> Self {
        Key::Character(c.to_string())
    }
}

/// Pointer (mouse or pen) events in viewport coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerMsg {
    /// Primary button pressed
    Down(Point, Modifiers),
    /// Pointer moved, pressed or not
    Move(Point),
    /// Primary button released
    Up,
    /// Wheel scrolled; negative `delta_y` scrolls up
    Wheel { position: Point, delta_y: f64 },
}

/// Touch events; each carries every point currently in contact
#[derive(Debug, Clone, PartialEq)]
pub enum TouchMsg {
    Start(Vec<Point>),
    Move(Vec<Point>),
    /// Touches still down after the lift
    End(Vec<Point>),
}

/// Raw keyboard events
#[derive(Debug, Clone, PartialEq)]
pub enum KeyMsg {
    Pressed(Key, Modifiers),
    Released(Key),
}

// ============================================================================
// Session Commands
// ============================================================================

/// View navigation messages
#[derive(Debug, Clone, PartialEq)]
pub enum ViewMsg {
    /// Viewport was resized
    Resize { width: f64, height: f64 },
    /// Zoom button: zoom in around the viewport centre
    ZoomIn,
    /// Zoom button: zoom out around the viewport centre
    ZoomOut,
    /// Zoom by an explicit factor around a screen point
    ZoomAt { factor: f64, position: Point },
    /// Fit the committed ROI into the viewport
    FitToRoi,
    /// Set the view rotation in degrees
    SetRotation(f64),
    ResetRotation,
    /// Pan modifier held or released
    PanKey(bool),
}

/// Annotation editing and option messages
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    /// Switch workflow stage (ignored when the stage is still locked)
    SetStage(Stage),
    /// Move the annotation sequence pointer
    SelectJoint(usize),
    NextJoint,
    /// Remove a placed joint
    ClearJoint(String),
    /// Real-world length of the scale bar
    SetScaleValue(f64),
    SetScaleUnit(String),
    SetAnnotationScale(f64),
    ToggleMirrored,
    SetAnnotationStyle(AnnotationStyle),
    ToggleExportWithImage,
    /// Abandon the gesture in progress
    CancelGesture,
}

// ============================================================================
// Main Message Enum
// ============================================================================

/// Messages for analysis session interactions
#[derive(Debug, Clone)]
pub enum Msg {
    /// A new photograph; starts a fresh session
    LoadImage(SourceImage),
    Pointer(PointerMsg),
    Touch(TouchMsg),
    Key(KeyMsg),
    View(ViewMsg),
    Edit(EditMsg),
}

/// Follow-up work the host must schedule after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    None,
    /// Deliver [`ViewMsg::FitToRoi`] after the delay, once the new ROI has been drawn
    FitAfter(Duration),
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl Msg {
    // Pointer shortcuts
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::Pointer(PointerMsg::Down(Point::new(x, y), Modifiers::NONE))
    }
    pub fn pointer_down_with(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::Pointer(PointerMsg::Down(Point::new(x, y), modifiers))
    }
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::Pointer(PointerMsg::Move(Point::new(x, y)))
    }
    pub fn pointer_up() -> Self {
        Self::Pointer(PointerMsg::Up)
    }
    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self::Pointer(PointerMsg::Wheel {
            position: Point::new(x, y),
            delta_y,
        })
    }

    // Keyboard shortcuts
    pub fn key_pressed(key: Key) -> Self {
        Self::Key(KeyMsg::Pressed(key, Modifiers::NONE))
    }
    pub fn key_released(key: Key) -> Self {
        Self::Key(KeyMsg::Released(key))
    }

    // View shortcuts
    pub fn resize(width: f64, height: f64) -> Self {
        Self::View(ViewMsg::Resize { width, height })
    }
    pub fn zoom_in() -> Self {
        Self::View(ViewMsg::ZoomIn)
    }
    pub fn zoom_out() -> Self {
        Self::View(ViewMsg::ZoomOut)
    }
    pub fn fit_to_roi() -> Self {
        Self::View(ViewMsg::FitToRoi)
    }
    pub fn set_rotation(degrees: f64) -> Self {
        Self::View(ViewMsg::SetRotation(degrees))
    }
    pub fn pan_key(held: bool) -> Self {
        Self::View(ViewMsg::PanKey(held))
    }

    // Edit shortcuts
    pub fn set_stage(stage: Stage) -> Self {
        Self::Edit(EditMsg::SetStage(stage))
    }
    pub fn select_joint(index: usize) -> Self {
        Self::Edit(EditMsg::SelectJoint(index))
    }
    pub fn next_joint() -> Self {
        Self::Edit(EditMsg::NextJoint)
    }
    pub fn clear_joint(id: &str) -> Self {
        Self::Edit(EditMsg::ClearJoint(id.to_string()))
    }
    pub fn set_scale_value(value: f64) -> Self {
        Self::Edit(EditMsg::SetScaleValue(value))
    }
    pub fn set_scale_unit(unit: &str) -> Self {
        Self::Edit(EditMsg::SetScaleUnit(unit.to_string()))
    }
    pub fn cancel_gesture() -> Self {
        Self::Edit(EditMsg::CancelGesture)
    }
}
