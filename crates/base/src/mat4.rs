use std::ops::{Add, Mul};

use crate::{Vec3, Vec4};

/// Column-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4<T> {
    pub cols: [Vec4<T>; 4],
}

impl<T> Mat4<T> {
    pub fn from_cols(c0: Vec4<T>, c1: Vec4<T>, c2: Vec4<T>, c3: Vec4<T>) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }
}

impl<T: Copy> Mat4<T> {
    pub fn from_rows(r0: Vec4<T>, r1: Vec4<T>, r2: Vec4<T>, r3: Vec4<T>) -> Self {
        Self::from_cols(r0, r1, r2, r3).transpose()
    }

    pub fn transpose(self) -> Self {
        let [c0, c1, c2, c3] = self.cols;
        Self::from_cols(
            Vec4::new(c0.x, c1.x, c2.x, c3.x),
            Vec4::new(c0.y, c1.y, c2.y, c3.y),
            Vec4::new(c0.z, c1.z, c2.z, c3.z),
            Vec4::new(c0.w, c1.w, c2.w, c3.w),
        )
    }

    pub fn row(&self, index: usize) -> Vec4<T> {
        let [c0, c1, c2, c3] = self.cols;
        match index {
            0 => Vec4::new(c0.x, c1.x, c2.x, c3.x),
            1 => Vec4::new(c0.y, c1.y, c2.y, c3.y),
            2 => Vec4::new(c0.z, c1.z, c2.z, c3.z),
            _ => Vec4::new(c0.w, c1.w, c2.w, c3.w),
        }
    }
}

impl<T: Default> Mat4<T> {
    pub fn zero() -> Self {
        Self {
            cols: [Vec4::zero(), Vec4::zero(), Vec4::zero(), Vec4::zero()],
        }
    }
}

macro_rules! impl_identity {
    ($($ty:ty),*) => {
        $(
            impl Mat4<$ty> {
                pub fn identity() -> Self {
                    Self::from_cols(
                        Vec4::new(1.0, 0.0, 0.0, 0.0),
                        Vec4::new(0.0, 1.0, 0.0, 0.0),
                        Vec4::new(0.0, 0.0, 1.0, 0.0),
                        Vec4::new(0.0, 0.0, 0.0, 1.0),
                    )
                }

                /// Transform a point in homogeneous coordinates (w = 1), dividing
                /// the result by its `w` component.
                pub fn transform_point(&self, point: Vec3<$ty>) -> Vec3<$ty> {
                    let h = *self * Vec4::extend(point, 1.0);
                    h.xyz() / h.w
                }
            }
        )*
    };
}

impl_identity!(f32, f64);

impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul<Vec4<T>> for Mat4<T> {
    type Output = Vec4<T>;
    fn mul(self, v: Vec4<T>) -> Vec4<T> {
        let [c0, c1, c2, c3] = self.cols;
        c0 * v.x + c1 * v.y + c2 * v.z + c3 * v.w
    }
}

impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul for Mat4<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let [c0, c1, c2, c3] = rhs.cols;
        Self::from_cols(self * c0, self * c1, self * c2, self * c3)
    }
}
