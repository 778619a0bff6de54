use base::{Mat4, Vec3, Vec4};

const EPS: f32 = 1e-6;

fn v3_approx(a: Vec3<f32>, b: Vec3<f32>) -> bool {
    (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
}

#[test]
fn test_from_rows_matches_transposed_cols() {
    let m = Mat4::from_rows(
        Vec4::new(1.0_f32, 2.0, 3.0, 4.0),
        Vec4::new(5.0, 6.0, 7.0, 8.0),
        Vec4::new(9.0, 10.0, 11.0, 12.0),
        Vec4::new(13.0, 14.0, 15.0, 16.0),
    );
    assert_eq!(m.cols[0], Vec4::new(1.0, 5.0, 9.0, 13.0));
    assert_eq!(m.cols[3], Vec4::new(4.0, 8.0, 12.0, 16.0));
    assert_eq!(m.row(1), Vec4::new(5.0, 6.0, 7.0, 8.0));
}

#[test]
fn test_identity_times_vector() {
    let v = Vec4::new(1.0_f32, -2.0, 3.5, 1.0);
    assert_eq!(Mat4::<f32>::identity() * v, v);
}

#[test]
fn test_matrix_product_with_identity() {
    let m = Mat4::from_rows(
        Vec4::new(0.0_f64, 1.0, 0.0, 2.0),
        Vec4::new(1.0, 0.0, 0.0, 3.0),
        Vec4::new(0.0, 0.0, 1.0, 4.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    );
    assert_eq!(m * Mat4::<f64>::identity(), m);
    assert_eq!(Mat4::<f64>::identity() * m, m);
}

#[test]
fn test_transform_point_translation() {
    let m = Mat4::from_rows(
        Vec4::new(1.0_f32, 0.0, 0.0, 0.5),
        Vec4::new(0.0, 1.0, 0.0, -1.0),
        Vec4::new(0.0, 0.0, 1.0, 2.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    );
    let p = m.transform_point(Vec3::new(1.0, 1.0, 1.0));
    assert!(v3_approx(p, Vec3::new(1.5, 0.0, 3.0)));
}

#[test]
fn test_transform_point_divides_by_w() {
    // uniform scale stored in w: every component ends up halved
    let m = Mat4::from_rows(
        Vec4::new(1.0_f32, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 2.0),
    );
    let p = m.transform_point(Vec3::new(2.0, 4.0, 6.0));
    assert!(v3_approx(p, Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn test_transpose_roundtrip() {
    let m = Mat4::from_cols(
        Vec4::new(1.0_f32, 2.0, 3.0, 4.0),
        Vec4::new(5.0, 6.0, 7.0, 8.0),
        Vec4::new(9.0, 10.0, 11.0, 12.0),
        Vec4::new(13.0, 14.0, 15.0, 16.0),
    );
    assert_eq!(m.transpose().transpose(), m);
}
