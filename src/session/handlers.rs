//! Session message handlers
//!
//! Interprets pointer, touch and keyboard input against the current view
//! transform and stage. Every branch is total: missing data (no image, no
//! ROI, no midline) just disables the gesture that needs it.

use std::time::Duration;

use crate::config::{MAX_ANNOTATION_SCALE, MIN_ANNOTATION_SCALE};
use crate::domain::{DragState, Point, RoiRect, ScaleHandle, Stage};
use crate::session::messages::{
    Command, EditMsg, Key, KeyMsg, Modifiers, Msg, Named, PointerMsg, TouchMsg, ViewMsg,
};
use crate::session::shortcuts::handle_key_event;
use crate::session::state::{Session, Viewport};

impl Session {
    /// Apply one message, returning any follow-up the host must schedule
    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::LoadImage(image) => {
                self.load_image(image);
                Command::None
            }
            Msg::Pointer(msg) => handle_pointer_msg(self, msg),
            Msg::Touch(msg) => handle_touch_msg(self, msg),
            Msg::Key(msg) => handle_key_msg(self, msg),
            Msg::View(msg) => {
                handle_view_msg(self, msg);
                Command::None
            }
            Msg::Edit(msg) => {
                handle_edit_msg(self, msg);
                Command::None
            }
        }
    }
}

// ============================================================================
// Pointer handlers
// ============================================================================

pub fn handle_pointer_msg(session: &mut Session, msg: PointerMsg) -> Command {
    match msg {
        PointerMsg::Down(position, modifiers) => {
            pointer_down(session, position, modifiers);
            Command::None
        }
        PointerMsg::Move(position) => {
            pointer_move(session, position);
            Command::None
        }
        PointerMsg::Up => pointer_up(session),
        PointerMsg::Wheel { position, delta_y } => {
            if delta_y != 0.0 {
                let factor = if delta_y < 0.0 {
                    session.config.wheel_in_factor
                } else {
                    session.config.wheel_out_factor
                };
                session.view.zoom_at_point(factor, position.x, position.y);
            }
            Command::None
        }
    }
}

fn pointer_down(session: &mut Session, position: Point, modifiers: Modifiers) {
    if session.gesture.pan_key_held {
        start_pan(session, position);
        return;
    }
    if modifiers.control() && start_rotate(session, position) {
        return;
    }

    let image_point = session.view.screen_to_image(position);
    match session.stage {
        Stage::Load => {}
        Stage::Roi => {
            if session.image_dimensions.is_some() && !session.gesture.roi_committed {
                session.gesture.drag = DragState::Roi {
                    start: image_point,
                    current: image_point,
                };
            }
        }
        Stage::Midline => {
            if hit_midline_handle(session, position) {
                session.gesture.drag = DragState::Midline;
            } else if session.midline_x.is_none() {
                log::debug!("Midline created at x={:.1}", image_point.x);
                session.midline_x = Some(image_point.x);
                session.gesture.drag = DragState::Midline;
            }
        }
        Stage::Scale => {
            if let Some(handle) = hit_scale_bar(session, position) {
                session.gesture.drag = DragState::Scale(handle);
            }
        }
        Stage::Annotate | Stage::Review => annotate_down(session, position, image_point),
    }
}

fn annotate_down(session: &mut Session, position: Point, image_point: Point) {
    if let Some(id) = hit_joint(session, image_point) {
        log::debug!("Dragging joint {id}");
        session.gesture.drag = DragState::Joint(id);
        return;
    }
    if hit_midline_handle(session, position) {
        session.gesture.drag = DragState::Midline;
        return;
    }
    if session.stage != Stage::Annotate || !session.has_unplaced_joint() {
        return;
    }
    let Some(joint) = session.current_joint() else {
        return;
    };
    log::debug!(
        "Placed {} at ({:.1}, {:.1})",
        joint.id,
        image_point.x,
        image_point.y
    );
    session.joints.insert(joint.id.as_str(), image_point);
    let last = session.topology().sequence().len().saturating_sub(1);
    if session.current_joint < last {
        session.current_joint += 1;
    }
}

fn pointer_move(session: &mut Session, position: Point) {
    match &session.gesture.drag {
        DragState::None => {}
        DragState::Pan { start, base_offset } => {
            let (start, base) = (*start, *base_offset);
            session.view.pan_from(base, start, position);
        }
        DragState::Rotate {
            start_bearing,
            base_degrees,
        } => {
            let (start_bearing, base_degrees) = (*start_bearing, *base_degrees);
            let Some(pivot) = session.rotation_pivot() else {
                return;
            };
            let bearing = bearing_around(session, pivot, position);
            let degrees = normalize_degrees(base_degrees + bearing - start_bearing);
            session.view.set_rotation(degrees, pivot);
        }
        DragState::Roi { start, .. } => {
            let start = *start;
            session.gesture.drag = DragState::Roi {
                start,
                current: session.view.screen_to_image(position),
            };
        }
        DragState::Midline => {
            session.midline_x = Some(session.view.screen_to_image(position).x);
        }
        DragState::Scale(ScaleHandle::Move) => {
            let p = session.view.screen_to_image(position);
            session.scale_bar.x = p.x;
            session.scale_bar.y = p.y;
        }
        DragState::Scale(ScaleHandle::Resize) => {
            let p = session.view.screen_to_image(position);
            let min = session.config.min_scale_length;
            session.scale_bar.resize_to(p.x, min);
        }
        DragState::Joint(id) => {
            let id = id.clone();
            let p = session.view.screen_to_image(position);
            session.joints.insert(id, p);
        }
    }
}

fn pointer_up(session: &mut Session) -> Command {
    match std::mem::take(&mut session.gesture.drag) {
        DragState::Roi { start, current } => commit_roi(session, RoiRect::from_corners(start, current)),
        _ => Command::None,
    }
}

fn commit_roi(session: &mut Session, rect: RoiRect) -> Command {
    let min = session.config.min_roi_size;
    if !rect.meets_minimum(min) {
        log::warn!(
            "Discarding {:.1}x{:.1} region, minimum is {min}x{min}",
            rect.width,
            rect.height
        );
        return Command::None;
    }

    log::debug!(
        "ROI committed at ({:.1}, {:.1}) size {:.1}x{:.1}",
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );
    let (inset_x, inset_y) = session.config.scale_bar_inset;
    session.roi = Some(rect);
    session.midline_x = Some(rect.center().x);
    session.scale_bar.x = rect.x + inset_x;
    session.scale_bar.y = rect.bottom() - inset_y;
    session.gesture.roi_committed = true;
    Command::FitAfter(Duration::from_millis(session.config.fit_delay_ms))
}

fn start_pan(session: &mut Session, position: Point) {
    session.gesture.drag = DragState::Pan {
        start: position,
        base_offset: session.view.offset(),
    };
}

/// Begin a rotate gesture; `false` when there is nothing to rotate around
fn start_rotate(session: &mut Session, position: Point) -> bool {
    let Some(pivot) = session.rotation_pivot() else {
        return false;
    };
    session.view.repivot(pivot);
    let base_degrees = session.view.rotation_degrees();
    session.view.set_rotation(base_degrees, pivot);
    session.gesture.drag = DragState::Rotate {
        start_bearing: bearing_around(session, pivot, position),
        base_degrees,
    };
    true
}

/// Direction of `position` seen from the pivot's screen position, in degrees
fn bearing_around(session: &Session, pivot: Point, position: Point) -> f64 {
    let center = session.view.image_to_screen(pivot);
    (position.y - center.y)
        .atan2(position.x - center.x)
        .to_degrees()
}

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

// ============================================================================
// Hit tests
// ============================================================================

fn hit_midline_handle(session: &Session, position: Point) -> bool {
    let Some(handle) = session.midline_handle_position() else {
        return false;
    };
    let radius = session.config.hit_radii.midline_handle * session.annotation_scale();
    (position.x - handle.x).abs() < radius && (position.y - handle.y).abs() < radius
}

/// End cap resizes, start cap or body moves
fn hit_scale_bar(session: &Session, position: Point) -> Option<ScaleHandle> {
    let start = session.view.image_to_screen(session.scale_bar.start());
    let end = session.view.image_to_screen(session.scale_bar.end());
    let radius = session.config.hit_radii.scale_cap * session.annotation_scale();
    let near = |cap: Point| {
        (position.x - cap.x).abs() < radius && (position.y - cap.y).abs() < radius
    };

    if near(end) {
        Some(ScaleHandle::Resize)
    } else if near(start) {
        Some(ScaleHandle::Move)
    } else if position.x > start.x - radius
        && position.x < end.x + radius
        && (position.y - start.y).abs() < radius * 2.0
    {
        Some(ScaleHandle::Move)
    } else {
        None
    }
}

/// First placed joint, in annotation order, within a constant screen-size radius
fn hit_joint(session: &Session, image_point: Point) -> Option<String> {
    let radius =
        session.config.hit_radii.joint * session.annotation_scale() / session.view.scale;
    session
        .topology()
        .sequence()
        .iter()
        .find(|joint| {
            session
                .joints
                .get(&joint.id)
                .is_some_and(|p| p.distance_to(image_point) < radius)
        })
        .map(|joint| joint.id.clone())
}

// ============================================================================
// Touch handlers
// ============================================================================

pub fn handle_touch_msg(session: &mut Session, msg: TouchMsg) -> Command {
    match msg {
        TouchMsg::Start(points) => {
            session.gesture.touches = points.len();
            match points.as_slice() {
                [] => {}
                [single] => pointer_down(session, *single, Modifiers::NONE),
                [first, ..] => {
                    log::debug!("Second touch point, switching to pan");
                    start_pan(session, *first);
                }
            }
            Command::None
        }
        TouchMsg::Move(points) => {
            session.gesture.touches = points.len();
            match points.as_slice() {
                [] => {}
                [single] => pointer_move(session, *single),
                [first, ..] => {
                    if session.gesture.drag.is_panning() {
                        pointer_move(session, *first);
                    }
                }
            }
            Command::None
        }
        TouchMsg::End(remaining) => {
            session.gesture.touches = remaining.len();
            pointer_up(session)
        }
    }
}

// ============================================================================
// Keyboard handlers
// ============================================================================

pub fn handle_key_msg(session: &mut Session, msg: KeyMsg) -> Command {
    match msg {
        KeyMsg::Pressed(key, modifiers) => match handle_key_event(session, &key, modifiers) {
            Some(msg) => session.update(msg),
            None => Command::None,
        },
        KeyMsg::Released(Key::Named(Named::Space)) => {
            handle_view_msg(session, ViewMsg::PanKey(false));
            Command::None
        }
        KeyMsg::Released(_) => Command::None,
    }
}

// ============================================================================
// View handlers
// ============================================================================

pub fn handle_view_msg(session: &mut Session, msg: ViewMsg) {
    match msg {
        ViewMsg::Resize { width, height } => {
            if width > 0.0 && height > 0.0 {
                session.viewport = Some(Viewport { width, height });
            } else {
                log::warn!("Ignoring degenerate viewport {width}x{height}");
            }
        }
        ViewMsg::ZoomIn => {
            let factor = session.config.zoom_in_factor;
            zoom_at_center(session, factor);
        }
        ViewMsg::ZoomOut => {
            let factor = session.config.zoom_out_factor;
            zoom_at_center(session, factor);
        }
        ViewMsg::ZoomAt { factor, position } => {
            if !factor.is_finite() || factor <= 0.0 {
                log::warn!("Ignoring invalid zoom factor {factor}");
                return;
            }
            session.view.zoom_at_point(factor, position.x, position.y);
        }
        ViewMsg::FitToRoi => fit_to_roi(session),
        ViewMsg::SetRotation(degrees) => {
            if !degrees.is_finite() {
                log::warn!("Ignoring invalid rotation {degrees}");
                return;
            }
            if let Some(pivot) = session.rotation_pivot() {
                session.view.repivot(pivot);
                session.view.set_rotation(normalize_degrees(degrees), pivot);
            }
        }
        ViewMsg::ResetRotation => session.view.rotation = None,
        ViewMsg::PanKey(held) => {
            session.gesture.pan_key_held = held;
            if !held && session.gesture.drag.is_panning() {
                session.gesture.end();
            }
        }
    }
}

fn zoom_at_center(session: &mut Session, factor: f64) {
    let center = session.viewport_or_image().center();
    session.view.zoom_at_point(factor, center.x, center.y);
}

fn fit_to_roi(session: &mut Session) {
    let Some(roi) = session.roi else {
        return;
    };
    let viewport = session.viewport_or_image();
    let mut view = session.view.fit_to_region(
        &roi,
        viewport.width,
        viewport.height,
        session.config.fit_padding,
        session.config.fit_max_scale,
    );
    // Keep the ROI centred when the view is rotated about another point
    let target = viewport.center();
    let actual = view.image_to_screen(roi.center());
    view.offset_x += target.x - actual.x;
    view.offset_y += target.y - actual.y;
    session.view = view;
}

// ============================================================================
// Edit handlers
// ============================================================================

pub fn handle_edit_msg(session: &mut Session, msg: EditMsg) {
    match msg {
        EditMsg::SetStage(stage) => {
            if !session.can_enter(stage) {
                log::warn!("Stage {} is not available yet", stage.title());
                return;
            }
            log::debug!("Stage {:?} -> {:?}", session.stage, stage);
            session.gesture.end();
            if stage == Stage::Roi && session.stage != Stage::Roi {
                session.gesture.roi_committed = false;
            }
            session.stage = stage;
        }
        EditMsg::SelectJoint(index) => {
            let last = session.topology().sequence().len().saturating_sub(1);
            session.current_joint = index.min(last);
        }
        EditMsg::NextJoint => {
            let last = session.topology().sequence().len().saturating_sub(1);
            session.current_joint = (session.current_joint + 1).min(last);
        }
        EditMsg::ClearJoint(id) => {
            if session.joints.remove(&id).is_some() {
                if let Some(index) = session.topology().sequence().iter().position(|j| j.id == id) {
                    session.current_joint = index;
                }
            }
        }
        EditMsg::SetScaleValue(value) => {
            session.scale_bar.real_value = if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("Invalid scale value {value}, using 1");
                1.0
            };
        }
        EditMsg::SetScaleUnit(unit) => session.scale_bar.unit = unit,
        EditMsg::SetAnnotationScale(scale) => {
            session.config.annotation_scale = scale.clamp(MIN_ANNOTATION_SCALE, MAX_ANNOTATION_SCALE);
        }
        EditMsg::ToggleMirrored => session.config.show_mirrored = !session.config.show_mirrored,
        EditMsg::SetAnnotationStyle(style) => session.config.annotation_style = style,
        EditMsg::ToggleExportWithImage => {
            session.config.export_with_image = !session.config.export_with_image;
        }
        EditMsg::CancelGesture => session.gesture.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SourceImage;
    use image::RgbaImage;

    /// 400x300 image shown 1:1 at the origin of an 800x600 viewport
    fn session_at(stage: Stage) -> Session {
        let mut session = Session::default();
        session.update(Msg::resize(800.0, 600.0));
        session.update(Msg::LoadImage(SourceImage::new(RgbaImage::new(400, 300))));
        session.view = crate::domain::ViewTransform::default();
        if stage != Stage::Roi {
            session.roi = Some(RoiRect::new(0.0, 0.0, 400.0, 300.0));
            session.midline_x = Some(200.0);
        }
        session.update(Msg::set_stage(stage));
        session
    }

    fn drag(session: &mut Session, from: (f64, f64), to: (f64, f64)) -> Command {
        session.update(Msg::pointer_down(from.0, from.1));
        session.update(Msg::pointer_move(to.0, to.1));
        session.update(Msg::pointer_up())
    }

    #[test]
    fn test_roi_gate() {
        let mut session = session_at(Stage::Roi);
        assert_eq!(drag(&mut session, (10.0, 10.0), (25.0, 40.0)), Command::None);
        assert_eq!(session.roi, None);

        let cmd = drag(&mut session, (10.0, 10.0), (35.0, 35.0));
        assert_eq!(cmd, Command::FitAfter(Duration::from_millis(50)));
        assert_eq!(session.roi, Some(RoiRect::new(10.0, 10.0, 25.0, 25.0)));
        assert_eq!(session.midline_x, Some(22.5));
        assert_eq!(session.scale_bar.start(), Point::new(30.0, 5.0));
        assert_eq!(session.stage, Stage::Roi);
    }

    #[test]
    fn test_one_roi_per_visit() {
        let mut session = session_at(Stage::Roi);
        drag(&mut session, (0.0, 0.0), (100.0, 100.0));
        drag(&mut session, (0.0, 0.0), (200.0, 200.0));
        assert_eq!(session.roi.map(|r| r.width), Some(100.0));

        session.update(Msg::set_stage(Stage::Midline));
        session.update(Msg::set_stage(Stage::Roi));
        drag(&mut session, (0.0, 0.0), (200.0, 200.0));
        assert_eq!(session.roi.map(|r| r.width), Some(200.0));
    }

    #[test]
    fn test_reselecting_roi_stage_keeps_commit() {
        let mut session = session_at(Stage::Roi);
        drag(&mut session, (0.0, 0.0), (100.0, 100.0));
        session.update(Msg::set_stage(Stage::Roi));
        drag(&mut session, (0.0, 0.0), (200.0, 200.0));
        assert_eq!(session.roi, Some(RoiRect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_first_midline_click_creates_and_drags() {
        let mut session = session_at(Stage::Midline);
        session.midline_x = None;
        session.update(Msg::pointer_down(120.0, 100.0));
        assert_eq!(session.midline_x, Some(120.0));
        session.update(Msg::pointer_move(140.0, 90.0));
        session.update(Msg::pointer_up());
        assert_eq!(session.midline_x, Some(140.0));
    }

    #[test]
    fn test_midline_handle_hit() {
        let mut session = session_at(Stage::Midline);
        // away from the handle: existing midline is left alone
        drag(&mut session, (100.0, 100.0), (150.0, 100.0));
        assert_eq!(session.midline_x, Some(200.0));
        drag(&mut session, (210.0, 570.0), (260.0, 570.0));
        assert_eq!(session.midline_x, Some(260.0));
    }

    #[test]
    fn test_scale_bar_handles() {
        let mut session = session_at(Stage::Scale);
        session.scale_bar = Default::default();
        // end cap at (150, 50) resizes, length floor is 20
        drag(&mut session, (150.0, 50.0), (55.0, 50.0));
        assert_eq!(session.scale_bar.length, 20.0);
        assert_eq!(session.scale_bar.start(), Point::new(50.0, 50.0));
        // start cap moves the whole bar
        drag(&mut session, (45.0, 55.0), (80.0, 90.0));
        assert_eq!(session.scale_bar.start(), Point::new(80.0, 90.0));
        // misses do nothing
        drag(&mut session, (300.0, 300.0), (10.0, 10.0));
        assert_eq!(session.scale_bar.start(), Point::new(80.0, 90.0));
    }

    #[test]
    fn test_scale_bar_body_moves_bar() {
        let mut session = session_at(Stage::Scale);
        session.scale_bar = Default::default();
        // midway along the bar, clear of both caps
        drag(&mut session, (100.0, 52.0), (120.0, 70.0));
        assert_eq!(session.scale_bar.start(), Point::new(120.0, 70.0));
        assert_eq!(session.scale_bar.length, 100.0);
    }

    #[test]
    fn test_midline_handle_drags_while_annotating() {
        let mut session = session_at(Stage::Annotate);
        drag(&mut session, (205.0, 570.0), (250.0, 570.0));
        assert_eq!(session.midline_x, Some(250.0));
        assert!(session.joints.is_empty());
        assert_eq!(session.current_joint, 0);
    }

    #[test]
    fn test_joint_wins_over_midline_handle() {
        let mut session = session_at(Stage::Review);
        session.joints.insert("head", Point::new(200.0, 572.0));
        drag(&mut session, (200.0, 572.0), (210.0, 500.0));
        assert_eq!(session.joints.get("head"), Some(Point::new(210.0, 500.0)));
        assert_eq!(session.midline_x, Some(200.0));
    }

    #[test]
    fn test_annotate_places_in_order_then_drags() {
        let mut session = session_at(Stage::Annotate);
        session.update(Msg::pointer_down(200.0, 20.0));
        session.update(Msg::pointer_up());
        session.update(Msg::pointer_down(200.0, 60.0));
        session.update(Msg::pointer_up());
        assert_eq!(session.joints.get("head"), Some(Point::new(200.0, 20.0)));
        assert_eq!(session.joints.get("neck"), Some(Point::new(200.0, 60.0)));
        assert_eq!(session.current_joint, 2);

        drag(&mut session, (205.0, 22.0), (210.0, 30.0));
        assert_eq!(session.joints.get("head"), Some(Point::new(210.0, 30.0)));
        assert_eq!(session.joints.len(), 2);
    }

    #[test]
    fn test_sequence_pointer_caps_at_last_joint() {
        let mut session = session_at(Stage::Annotate);
        let count = session.topology().sequence().len();
        for i in 0..count + 3 {
            session.update(Msg::pointer_down(10.0 + 25.0 * i as f64, 100.0));
            session.update(Msg::pointer_up());
        }
        assert_eq!(session.joints.len(), count);
        assert_eq!(session.current_joint, count - 1);
        assert!(session.is_complete());
    }

    #[test]
    fn test_review_never_places() {
        let mut session = session_at(Stage::Review);
        drag(&mut session, (50.0, 50.0), (60.0, 60.0));
        assert!(session.joints.is_empty());
    }

    #[test]
    fn test_pan_key_overrides_stage() {
        let mut session = session_at(Stage::Annotate);
        session.update(Msg::key_pressed(Key::Named(Named::Space)));
        session.update(Msg::pointer_down(100.0, 100.0));
        session.update(Msg::pointer_move(130.0, 80.0));
        assert!(session.joints.is_empty());
        assert_eq!(session.view.offset(), Point::new(30.0, -20.0));

        session.update(Msg::key_released(Key::Named(Named::Space)));
        assert!(!session.gesture.drag.is_active());
        session.update(Msg::pointer_move(500.0, 500.0));
        assert_eq!(session.view.offset(), Point::new(30.0, -20.0));
    }

    #[test]
    fn test_second_touch_switches_to_pan() {
        let mut session = session_at(Stage::Roi);
        let one = vec![Point::new(10.0, 10.0)];
        session.update(Msg::Touch(TouchMsg::Start(one)));
        assert!(matches!(session.gesture.drag, DragState::Roi { .. }));

        let two = vec![Point::new(10.0, 10.0), Point::new(200.0, 200.0)];
        session.update(Msg::Touch(TouchMsg::Start(two)));
        assert!(session.gesture.drag.is_panning());
        session.update(Msg::Touch(TouchMsg::Move(vec![
            Point::new(50.0, 30.0),
            Point::new(240.0, 220.0),
        ])));
        assert_eq!(session.view.offset(), Point::new(40.0, 20.0));

        session.update(Msg::Touch(TouchMsg::End(vec![])));
        assert_eq!(session.roi, None);
        assert!(!session.gesture.drag.is_active());
    }

    #[test]
    fn test_ctrl_drag_rotates_about_pivot() {
        let mut session = session_at(Stage::Review);
        // pivot (200, 150); drag a quarter turn clockwise around it
        session.update(Msg::pointer_down_with(300.0, 150.0, Modifiers::CTRL));
        session.update(Msg::pointer_move(200.0, 250.0));
        session.update(Msg::pointer_up());
        assert!((session.view.rotation_degrees() - 90.0).abs() < 1e-9);
        let pivot = session.view.image_to_screen(Point::new(200.0, 150.0));
        assert!((pivot.x - 200.0).abs() < 1e-9 && (pivot.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_roi_centres_region() {
        let mut session = session_at(Stage::Midline);
        session.roi = Some(RoiRect::new(100.0, 100.0, 100.0, 50.0));
        session.update(Msg::set_rotation(30.0));
        session.update(Msg::fit_to_roi());
        let center = session.view.image_to_screen(Point::new(150.0, 125.0));
        assert!((center.x - 400.0).abs() < 1e-9 && (center.y - 300.0).abs() < 1e-9);
        assert_eq!(session.view.scale, 3.0);
    }

    #[test]
    fn test_wheel_and_buttons_zoom() {
        let mut session = session_at(Stage::Midline);
        session.update(Msg::wheel(0.0, 0.0, -1.0));
        assert!((session.view.scale - 1.1).abs() < 1e-12);
        session.update(Msg::zoom_out());
        assert!((session.view.scale - 0.88).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_view_input_is_ignored() {
        let mut session = session_at(Stage::Review);
        let before = session.view;
        session.update(Msg::set_rotation(f64::NAN));
        session.update(Msg::View(ViewMsg::ZoomAt {
            factor: f64::NAN,
            position: Point::new(10.0, 10.0),
        }));
        session.update(Msg::View(ViewMsg::ZoomAt {
            factor: f64::INFINITY,
            position: Point::new(10.0, 10.0),
        }));
        assert_eq!(session.view, before);
        let p = session.view.image_to_screen(Point::new(50.0, 50.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_locked_stage_is_ignored() {
        let mut session = session_at(Stage::Roi);
        session.update(Msg::set_stage(Stage::Annotate));
        assert_eq!(session.stage, Stage::Roi);
    }

    #[test]
    fn test_scale_value_falls_back_to_one() {
        let mut session = session_at(Stage::Scale);
        session.update(Msg::set_scale_value(2.5));
        assert_eq!(session.scale_bar.real_value, 2.5);
        session.update(Msg::set_scale_value(-3.0));
        assert_eq!(session.scale_bar.real_value, 1.0);
        session.update(Msg::set_scale_value(f64::NAN));
        assert_eq!(session.scale_bar.real_value, 1.0);
    }

    #[test]
    fn test_clear_joint_rewinds_sequence() {
        let mut session = session_at(Stage::Annotate);
        drag(&mut session, (10.0, 10.0), (10.0, 10.0));
        drag(&mut session, (50.0, 50.0), (50.0, 50.0));
        session.update(Msg::clear_joint("head"));
        assert!(!session.joints.contains("head"));
        assert_eq!(session.current_joint, 0);
    }
}
