use base::{Vec2, Vec3};

const MAX_ITERATIONS: usize = 10;
const NEWTON_ITERATIONS: usize = 4;

/// Lens distortion model of a stream, as reported by the depth camera SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distortion {
    #[default]
    None,
    ModifiedBrownConrady,
    InverseBrownConrady,
    BrownConrady,
    KannalaBrandt4,
    FTheta,
}

/// Pinhole intrinsics of a stream, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub width: usize,
    pub height: usize,
    pub ppx: f32,
    pub ppy: f32,
    pub fx: f32,
    pub fy: f32,
    pub model: Distortion,
    pub coeffs: [f32; 5],
}

impl Intrinsics {
    /// Undistorted pinhole intrinsics.
    pub fn pinhole(width: usize, height: usize, ppx: f32, ppy: f32, fx: f32, fy: f32) -> Self {
        Self {
            width,
            height,
            ppx,
            ppy,
            fx,
            fy,
            model: Distortion::None,
            coeffs: [0.0; 5],
        }
    }

    /// Rough pinhole guess for a stream with no calibration: principal
    /// point at the center and a 69.4 degree horizontal field of view.
    pub fn nominal(width: usize, height: usize) -> Self {
        let fx = width as f32 / (2.0 * (69.4f32.to_radians() / 2.0).tan());
        Self::pinhole(
            width,
            height,
            width as f32 / 2.0,
            height as f32 / 2.0,
            fx,
            fx,
        )
    }

    /// Map a pixel and its depth (meters) to a point in camera space.
    pub fn deproject(&self, pixel: Vec2<f32>, depth: f32) -> Vec3<f32> {
        let c = &self.coeffs;
        let mut x = (pixel.x - self.ppx) / self.fx;
        let mut y = (pixel.y - self.ppy) / self.fy;
        let (xo, yo) = (x, y);

        match self.model {
            Distortion::InverseBrownConrady => {
                for _ in 0..MAX_ITERATIONS {
                    let r2 = x * x + y * y;
                    let icdist = 1.0 / (1.0 + ((c[4] * r2 + c[1]) * r2 + c[0]) * r2);
                    let xq = x / icdist;
                    let yq = y / icdist;
                    let delta_x = 2.0 * c[2] * xq * yq + c[3] * (r2 + 2.0 * xq * xq);
                    let delta_y = 2.0 * c[3] * xq * yq + c[2] * (r2 + 2.0 * yq * yq);
                    x = (xo - delta_x) * icdist;
                    y = (yo - delta_y) * icdist;
                }
            }
            Distortion::BrownConrady => {
                for _ in 0..MAX_ITERATIONS {
                    let r2 = x * x + y * y;
                    let icdist = 1.0 / (1.0 + ((c[4] * r2 + c[1]) * r2 + c[0]) * r2);
                    let delta_x = 2.0 * c[2] * x * y + c[3] * (r2 + 2.0 * x * x);
                    let delta_y = 2.0 * c[3] * x * y + c[2] * (r2 + 2.0 * y * y);
                    x = (xo - delta_x) * icdist;
                    y = (yo - delta_y) * icdist;
                }
            }
            Distortion::KannalaBrandt4 => {
                let rd = (x * x + y * y).sqrt().max(f32::EPSILON);
                let mut theta = rd;
                let mut theta2 = rd * rd;
                for _ in 0..NEWTON_ITERATIONS {
                    let f = theta
                        * (1.0 + theta2 * (c[0] + theta2 * (c[1] + theta2 * (c[2] + theta2 * c[3]))))
                        - rd;
                    if f.abs() < f32::EPSILON {
                        break;
                    }
                    let df = 1.0
                        + theta2
                            * (3.0 * c[0]
                                + theta2 * (5.0 * c[1] + theta2 * (7.0 * c[2] + 9.0 * theta2 * c[3])));
                    theta -= f / df;
                    theta2 = theta * theta;
                }
                let r = theta.tan();
                x *= r / rd;
                y *= r / rd;
            }
            Distortion::FTheta => {
                let rd = (x * x + y * y).sqrt().max(f32::EPSILON);
                let r = (c[0] * rd).tan() / (2.0 * (c[0] / 2.0).tan()).atan();
                x *= r / rd;
                y *= r / rd;
            }
            Distortion::None | Distortion::ModifiedBrownConrady => {}
        }

        Vec3::new(depth * x, depth * y, depth)
    }

    /// Map a camera-space point back to a pixel, ignoring distortion.
    pub fn project(&self, point: Vec3<f32>) -> Vec2<f32> {
        Vec2::new(
            point.x / point.z * self.fx + self.ppx,
            point.y / point.z * self.fy + self.ppy,
        )
    }
}
