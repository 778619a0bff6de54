use {
    base::{Vec2, Vec3},
    video::{Distortion, Intrinsics},
};

const EPS: f32 = 1e-4;

fn approx(a: Vec3<f32>, b: Vec3<f32>) -> bool {
    (a - b).length() < EPS
}

#[test]
fn test_pinhole_deproject() {
    let intr = Intrinsics::pinhole(640, 480, 320.0, 240.0, 500.0, 400.0);
    let p = intr.deproject(Vec2::new(420.0, 140.0), 2.0);
    assert!(approx(p, Vec3::new(0.4, -0.5, 2.0)), "{p:?}");
}

#[test]
fn test_zero_depth_gives_origin() {
    let intr = Intrinsics::pinhole(640, 480, 320.0, 240.0, 500.0, 500.0);
    let p = intr.deproject(Vec2::new(17.0, 300.0), 0.0);
    assert!(approx(p, Vec3::zero()));
}

#[test]
fn test_project_inverts_pinhole_deproject() {
    let intr = Intrinsics::pinhole(640, 480, 318.2, 241.7, 612.0, 611.0);
    let pixel = Vec2::new(123.0, 456.0);
    let back = intr.project(intr.deproject(pixel, 1.7));
    assert!((back - pixel).length() < 1e-3);
}

#[test]
fn test_kannala_brandt_without_coefficients_is_tangent() {
    let mut intr = Intrinsics::pinhole(640, 480, 320.0, 240.0, 100.0, 100.0);
    intr.model = Distortion::KannalaBrandt4;
    let p = intr.deproject(Vec2::new(420.0, 240.0), 1.0);
    // theta = 1 rad solves with all coefficients zero, radius becomes tan(1)
    assert!((p.x - 1.0f32.tan()).abs() < EPS, "{p:?}");
    assert!(p.y.abs() < EPS);
}

#[test]
fn test_inverse_brown_conrady_moves_points() {
    let mut intr = Intrinsics::pinhole(640, 480, 320.0, 240.0, 600.0, 600.0);
    let pixel = Vec2::new(600.0, 400.0);
    let plain = intr.deproject(pixel, 1.0);
    intr.model = Distortion::InverseBrownConrady;
    intr.coeffs = [0.1, -0.05, 0.001, 0.002, 0.0];
    let corrected = intr.deproject(pixel, 1.0);
    assert!((corrected - plain).length() > 1e-3);
    assert_eq!(corrected.z, 1.0);
}

#[test]
fn test_nominal_intrinsics_center() {
    let intr = Intrinsics::nominal(640, 480);
    assert_eq!(intr.ppx, 320.0);
    assert_eq!(intr.ppy, 240.0);
    assert!(intr.fx > 400.0 && intr.fx < 500.0);
    assert_eq!(intr.model, Distortion::None);
}
