use super::*;

fn configs() -> [SpringConfig; 3] {
    let under = SpringConfig::default();
    let critical = SpringConfig {
        damping: 20.0,
        ..SpringConfig::default()
    };
    let over = SpringConfig {
        damping: 60.0,
        ..SpringConfig::default()
    };
    [under, critical, over]
}

#[test]
fn damping_ratio_classifies_regimes() {
    let [under, critical, over] = configs();
    assert!(under.damping_ratio() < 1.0);
    assert!((critical.damping_ratio() - 1.0).abs() < 1e-12);
    assert!(over.damping_ratio() > 1.0);
}

#[test]
fn step_response_starts_at_rest_and_settles_at_one() {
    for cfg in configs() {
        let (x0, v0) = cfg.step_response(0.0);
        assert!(x0.abs() < 1e-12, "{cfg:?}");
        assert!(v0.abs() < 1e-12, "{cfg:?}");

        let (x, v) = cfg.step_response(10.0);
        assert!((x - 1.0).abs() < 1e-4, "{cfg:?} x={x}");
        assert!(v.abs() < 1e-3, "{cfg:?} v={v}");
    }
}

#[test]
fn velocity_matches_finite_difference() {
    let h = 1e-6;
    for cfg in configs() {
        for t in [0.05, 0.2, 0.7] {
            let (x_a, _) = cfg.step_response(t - h);
            let (x_b, _) = cfg.step_response(t + h);
            let (_, v) = cfg.step_response(t);
            let fd = (x_b - x_a) / (2.0 * h);
            assert!((fd - v).abs() < 1e-4, "{cfg:?} t={t} fd={fd} v={v}");
        }
    }
}

#[test]
fn underdamped_overshoots() {
    let cfg = SpringConfig::default();
    let peak = (1..200)
        .map(|i| cfg.step_response(f64::from(i) * 0.01).0)
        .fold(0.0_f64, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn validate_rejects_degenerate_parameters() {
    assert!(SpringConfig::default().validate().is_ok());
    for bad in [
        SpringConfig {
            mass: 0.0,
            ..SpringConfig::default()
        },
        SpringConfig {
            damping: 0.0,
            ..SpringConfig::default()
        },
        SpringConfig {
            stiffness: f64::NAN,
            ..SpringConfig::default()
        },
    ] {
        assert!(bad.validate().is_err(), "{bad:?}");
    }
}
