//! Image rendering for annotations using tiny-skia
//!
//! Burns the midline, scale bar, bones and joints onto a crop of the source
//! photograph for export. Everything is drawn in image space, so the result
//! does not depend on the current pan, zoom or rotation.

use image::RgbaImage;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use super::geometry::{self, bone, crop_local, joint, midline, scale_bar};
use crate::config::{AnnotationColor, Palette};
use crate::domain::{Point, RoiRect, Side, mirror_across_vertical};
use crate::session::Session;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn paint_for(color: AnnotationColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke_for(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn stroke_segment(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint, stroke: &Stroke) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}

/// Crop the session's ROI out of the source image and draw the annotations on it
///
/// Returns `None` until both an image and a ROI exist.
pub fn annotated_roi(session: &Session) -> Option<RgbaImage> {
    let source = session.image.as_ref()?;
    let roi = session.roi?;
    let (x, y, w, h) = geometry::crop_bounds(&roi, source.width(), source.height())?;
    let mut out = image::imageops::crop_imm(&*source.rgba, x, y, w, h).to_image();
    let origin = Point::new(f64::from(x), f64::from(y));

    let palette = session.palette();
    let ui = session.annotation_scale() as f32;
    with_pixmap(&mut out, |pixmap| {
        draw_midline(pixmap, session, &roi, origin, &palette, ui);
        draw_scale_bar(pixmap, session, origin, &palette, ui);
        draw_bones(pixmap, session, origin, &palette, ui);
        draw_joints(pixmap, session, origin, &palette, ui);
    });

    log::debug!("Rendered annotated ROI {}x{}", out.width(), out.height());
    Some(out)
}

fn draw_midline(
    pixmap: &mut Pixmap,
    session: &Session,
    roi: &RoiRect,
    origin: Point,
    palette: &Palette,
    ui: f32,
) {
    let Some(x) = session.midline_x else {
        return;
    };
    let (top_x, top_y) = crop_local(Point::new(x, roi.y), origin);
    let (_, bottom_y) = crop_local(Point::new(x, roi.bottom()), origin);
    let mut stroke = stroke_for(midline::THICKNESS * ui);
    stroke.line_cap = LineCap::Butt;
    stroke.dash = StrokeDash::new(midline::DASH.iter().map(|d| d * ui).collect(), 0.0);
    stroke_segment(
        pixmap,
        (top_x, top_y),
        (top_x, bottom_y),
        &paint_for(palette.midline),
        &stroke,
    );
}

fn draw_scale_bar(pixmap: &mut Pixmap, session: &Session, origin: Point, palette: &Palette, ui: f32) {
    let bar = &session.scale_bar;
    let start = crop_local(bar.start(), origin);
    let end = crop_local(bar.end(), origin);
    let cap = scale_bar::CAP_HALF_HEIGHT * ui;
    let paint = paint_for(palette.scale);
    let stroke = stroke_for(scale_bar::THICKNESS * ui);

    stroke_segment(pixmap, start, end, &paint, &stroke);
    for (cx, cy) in [start, end] {
        stroke_segment(pixmap, (cx, cy - cap), (cx, cy + cap), &paint, &stroke);
    }
}

fn draw_bones(pixmap: &mut Pixmap, session: &Session, origin: Point, palette: &Palette, ui: f32) {
    let joints = session.full_joints();
    let stroke = stroke_for(bone::THICKNESS * ui);
    let show_mirrored = session.config.show_mirrored;

    for b in session.topology().bones() {
        let (Some(from), Some(to)) = (joints.get(&b.from), joints.get(&b.to)) else {
            continue;
        };
        let color = if b.side.is_some() {
            palette.bone_side
        } else {
            palette.bone_midline
        };
        stroke_segment(
            pixmap,
            crop_local(from, origin),
            crop_local(to, origin),
            &paint_for(color),
            &stroke,
        );

        if show_mirrored && b.side == Some(Side::Right) {
            let mirrored_from = mirror_across_vertical(Some(from), session.midline_x);
            let mirrored_to = mirror_across_vertical(Some(to), session.midline_x);
            if let (Some(mf), Some(mt)) = (mirrored_from, mirrored_to) {
                stroke_segment(
                    pixmap,
                    crop_local(mf, origin),
                    crop_local(mt, origin),
                    &paint_for(palette.bone_mirrored),
                    &stroke,
                );
            }
        }
    }
}

fn draw_joints(pixmap: &mut Pixmap, session: &Session, origin: Point, palette: &Palette, ui: f32) {
    let radius = joint::RADIUS * ui;
    let ring = stroke_for(joint::RING_THICKNESS * ui);
    let fill = paint_for(palette.joint_fill);

    for j in session.topology().sequence() {
        let Some(pos) = session.joints.get(&j.id) else {
            continue;
        };
        let (cx, cy) = crop_local(pos, origin);
        let color = if j.midline {
            palette.joint_midline
        } else {
            palette.joint_side
        };
        if let Some(circle) = PathBuilder::from_circle(cx, cy, radius) {
            pixmap.stroke_path(&circle, &paint_for(color), &ring, Transform::identity(), None);
        }
        if let Some(inner) = PathBuilder::from_circle(cx, cy, radius - joint::RING_THICKNESS * ui) {
            pixmap.fill_path(&inner, &fill, FillRule::Winding, Transform::identity(), None);
        }

        if session.config.show_mirrored
            && j.side == Some(Side::Right)
            && let Some(mirrored) = mirror_across_vertical(Some(pos), session.midline_x)
        {
            let (mx, my) = crop_local(mirrored, origin);
            if let Some(circle) = PathBuilder::from_circle(mx, my, radius) {
                let paint = paint_for(palette.bone_mirrored);
                pixmap.stroke_path(&circle, &paint, &ring, Transform::identity(), None);
            }
        }
    }
}
