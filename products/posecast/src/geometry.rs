use {
    crate::{PipelineError, TransformConfig},
    base::{Mat4, Vec2, Vec3, Vec4},
    video::{DepthImage, Intrinsics},
};

/// Deprojects pixels with the aligned depth image.
///
/// Pixels are clamped to the one-based sensor range `[1, width] x [1, height]`
/// first: anything beyond the far edge snaps to it, anything below 2 snaps to 1.
/// The depth sample is read at the clamped pixel minus one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthProjector {
    size: Vec2<usize>,
}

impl Default for DepthProjector {
    fn default() -> Self {
        Self::new(Vec2::new(640, 480))
    }
}

impl DepthProjector {
    pub fn new(size: Vec2<usize>) -> Self {
        Self { size }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn clamp(&self, pixel: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(
            clamp_axis(pixel.x, self.size.x as f32),
            clamp_axis(pixel.y, self.size.y as f32),
        )
    }

    /// Zero-based depth sample position for a pixel.
    pub fn depth_index(&self, pixel: Vec2<f32>) -> Vec2<usize> {
        let p = self.clamp(pixel);
        // clamped values are at least 1, truncation matches integer conversion
        Vec2::new((p.x - 1.0) as usize, (p.y - 1.0) as usize)
    }

    /// Camera-space point in meters.
    pub fn project(
        &self,
        pixel: Vec2<f32>,
        depth: &DepthImage,
        intrinsics: &Intrinsics,
    ) -> Result<Vec3<f32>, PipelineError> {
        let p = self.clamp(pixel);
        let index = self.depth_index(pixel);
        let distance = depth
            .distance(index.x, index.y)
            .ok_or(PipelineError::DepthOutOfRange {
                x: index.x,
                y: index.y,
            })?;
        Ok(intrinsics.deproject(p, distance))
    }
}

fn clamp_axis(v: f32, max: f32) -> f32 {
    if v > max {
        max
    } else if v < 2.0 {
        1.0
    } else {
        v
    }
}

/// Camera frame to world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    matrix: Mat4<f32>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::from_matrix(Mat4::<f32>::identity())
    }
}

impl RigidTransform {
    /// Rows of the rotation block are the world basis vectors, the last
    /// column is `translation`, the last row is `[0, 0, 0, 1]`.
    pub fn new(basis: [Vec3<f32>; 3], translation: Vec3<f32>) -> Self {
        let [x, y, z] = basis;
        Self::from_matrix(Mat4::from_rows(
            Vec4::extend(x, translation.x),
            Vec4::extend(y, translation.y),
            Vec4::extend(z, translation.z),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ))
    }

    pub fn from_matrix(matrix: Mat4<f32>) -> Self {
        Self { matrix }
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        let [x, y, z] = config.basis.map(|[a, b, c]| Vec3::new(a, b, c));
        let [tx, ty, tz] = config.translation;
        Self::new([x, y, z], Vec3::new(tx, ty, tz))
    }

    pub fn matrix(&self) -> Mat4<f32> {
        self.matrix
    }

    /// Homogeneous transform, always divided by the resulting `w`.
    pub fn apply(&self, point: Vec3<f32>) -> Vec3<f32> {
        self.matrix.transform_point(point)
    }

    pub fn apply_all(&self, points: &[Vec3<f32>]) -> Vec<Vec3<f32>> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}
