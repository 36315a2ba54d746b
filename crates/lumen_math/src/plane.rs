use crate::Vec3;

/// Implicit plane through a quad, used by the kernel for point-plane tests.
///
/// `equation` holds (a, b, c) and `dist` holds d, so that every point on the
/// plane satisfies `a*x + b*y + c*z + d = 0`. The coefficients are not
/// normalized; `normal` is the unit normal of the quad's winding.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub equation: Vec3,
    pub dist: f32,
}

impl Plane {
    /// Derive the plane of four coplanar, counter-clockwise corners.
    ///
    /// The normal comes from the two edges anchored at `p1`
    /// (`(p2 - p1) x (p4 - p1)`); the coefficients come from the 3x3
    /// determinant expansion over `p1`, `p2`, `p3`.
    ///
    /// A zero-area quad yields a zero normal.
    pub fn from_corners(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> Self {
        let normal = (p2 - p1).cross(p4 - p1).normalize_or_zero();

        let a = p1.y * (p2.z - p3.z) + p2.y * (p3.z - p1.z) + p3.y * (p1.z - p2.z);
        let b = p1.z * (p2.x - p3.x) + p2.z * (p3.x - p1.x) + p3.z * (p1.x - p2.x);
        let c = p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y);
        let dist = -p1.x * (p2.y * p3.z - p3.y * p2.z)
            - p2.x * (p3.y * p1.z - p1.y * p3.z)
            - p3.x * (p1.y * p2.z - p2.y * p1.z);

        Self {
            normal,
            equation: Vec3::new(a, b, c),
            dist,
        }
    }

    /// Evaluate `a*x + b*y + c*z + d` at `point` (zero on the plane).
    #[inline]
    pub fn evaluate(&self, point: Vec3) -> f32 {
        self.equation.dot(point) + self.dist
    }

    /// True if the corners that produced this plane enclose no area.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }
}
