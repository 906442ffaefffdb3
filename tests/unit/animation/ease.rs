use super::*;

const ALL: [Ease; 10] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::EaseIn,
    Ease::EaseOut,
    Ease::EaseInOut,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}

#[test]
fn linear_bezier_is_identity() {
    let ease = Ease::CubicBezier {
        x1: 0.25,
        y1: 0.25,
        x2: 0.75,
        y2: 0.75,
    };
    for t in [0.1, 0.3, 0.5, 0.9] {
        assert!((ease.apply(t) - t).abs() < 1e-6, "t={t}");
    }
}

#[test]
fn ease_in_out_is_symmetric() {
    let a = Ease::EaseInOut.apply(0.3);
    let b = Ease::EaseInOut.apply(0.7);
    assert!((a + b - 1.0).abs() < 1e-6);
}

#[test]
fn parses_names_and_bezier_objects() {
    let v: Ease = serde_json::from_str("\"ease_in_out\"").unwrap();
    assert_eq!(v, Ease::EaseInOut);
    let v: Ease = serde_json::from_str("\"out_cubic\"").unwrap();
    assert_eq!(v, Ease::OutCubic);
    let v: Ease = serde_json::from_str("{\"cubic_bezier\": [0.25, 0.1, 0.25, 1.0]}").unwrap();
    assert!(matches!(v, Ease::CubicBezier { .. }));
    assert!(serde_json::from_str::<Ease>("\"wobble\"").is_err());
}

#[test]
fn validate_rejects_out_of_range_bezier_x() {
    let bad = Ease::CubicBezier {
        x1: 1.5,
        y1: 0.0,
        x2: 0.5,
        y2: 1.0,
    };
    assert!(bad.validate().is_err());
    assert!(Ease::Linear.validate().is_ok());
}

#[test]
fn serializes_to_the_parsed_forms() {
    assert_eq!(serde_json::to_string(&Ease::InOutQuad).unwrap(), "\"in_out_quad\"");
    let bezier = Ease::CubicBezier {
        x1: 0.5,
        y1: 0.0,
        x2: 0.5,
        y2: 1.0,
    };
    let json = serde_json::to_string(&bezier).unwrap();
    assert_eq!(json, "{\"cubic_bezier\":[0.5,0.0,0.5,1.0]}");
    assert_eq!(serde_json::from_str::<Ease>(&json).unwrap(), bezier);
}
