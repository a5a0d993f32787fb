//! Writing every export file for an annotated session

use image::{Rgba, RgbaImage};
use planform::export::{self, CSV_FILE_NAME, IMAGE_FILE_NAME, JSON_FILE_NAME};
use planform::{Msg, Point, RoiRect, Session, SourceImage, Stage};

fn annotated_session() -> Session {
    let mut session = Session::default();
    let img = RgbaImage::from_pixel(300, 200, Rgba([240, 240, 240, 255]));
    session.update(Msg::LoadImage(SourceImage::new(img)));
    session.roi = Some(RoiRect::new(50.0, 20.0, 200.0, 160.0));
    session.midline_x = Some(150.0);
    session.update(Msg::set_stage(Stage::Review));
    session.joints.insert("head", Point::new(150.0, 40.0));
    session.joints.insert("neck", Point::new(150.0, 60.0));
    session.joints.insert("shoulder_r", Point::new(180.0, 60.0));
    session
}

#[test]
fn test_save_all_writes_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let session = annotated_session();
    let paths = export::save_all(&session, dir.path()).unwrap();

    assert_eq!(paths.json, dir.path().join(JSON_FILE_NAME));
    assert_eq!(paths.csv, dir.path().join(CSV_FILE_NAME));
    assert_eq!(paths.image, Some(dir.path().join(IMAGE_FILE_NAME)));

    let png = image::open(dir.path().join(IMAGE_FILE_NAME)).unwrap();
    assert_eq!((png.width(), png.height()), (200, 160));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json["metadata"]["midlineX"], 150.0);
    assert_eq!(json["metadata"]["imageDimensions"]["width"], 300);
    assert!(
        json["annotatedImage"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    let ids: Vec<&str> = json["joints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["head", "neck", "shoulder_r", "shoulder_l"]);

    let csv = std::fs::read_to_string(&paths.csv).unwrap();
    assert!(csv.starts_with("Type,Name,Side,Value,Unit\n"));
    assert!(csv.contains("Bone,Upper Spine,midline,0.200,cm\n"));
    assert!(csv.contains("Bone,Mid Spine,midline,N/A,cm\n"));
    assert!(csv.contains("Angle,neck (Upper Spine - Scapula/Clavicle),midline,90.0,degrees\n"));
}

#[test]
fn test_image_export_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = annotated_session();
    session.update(Msg::Edit(planform::session::EditMsg::ToggleExportWithImage));
    let paths = export::save_all(&session, dir.path()).unwrap();
    assert_eq!(paths.image, None);
    assert!(!dir.path().join(IMAGE_FILE_NAME).exists());
    let json = std::fs::read_to_string(&paths.json).unwrap();
    assert!(!json.contains("annotatedImage"));
}
