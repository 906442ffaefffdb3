use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
}

#[test]
fn fps_frame_time_is_exact() {
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.frame_time(0), Duration::ZERO);
    assert_eq!(fps.frame_time(60), Duration::from_secs(1));

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.frame_time(30), Duration::from_nanos(1_001_000_000));
}

#[test]
fn hex_colors_parse_and_format() {
    let c = Color::from_hex("#CCCCCC").unwrap();
    assert_eq!(c.to_rgba8(), [0xCC, 0xCC, 0xCC, 0xFF]);
    assert_eq!(c.to_hex(), "#CCCCCC");

    let c = Color::from_hex("ff000080").unwrap();
    assert_eq!(c.to_hex(), "#FF000080");

    assert!(Color::from_hex("#abc").is_err());
    assert!(Color::from_hex("#zzzzzz").is_err());
}

#[test]
fn colors_deserialize_from_hex_array_and_object() {
    let c: Color = serde_json::from_str("\"#000000\"").unwrap();
    assert_eq!(c, Color::BLACK);

    let c: Color = serde_json::from_str("[1.0, 1.0, 1.0]").unwrap();
    assert_eq!(c, Color::WHITE);

    let c: Color = serde_json::from_str("{\"r\": 0.0, \"g\": 0.0, \"b\": 0.0, \"a\": 0.0}").unwrap();
    assert_eq!(c, Color::TRANSPARENT);

    assert!(serde_json::from_str::<Color>("[1.0, 1.0]").is_err());
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}
