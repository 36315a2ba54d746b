//! Quad and cube builders plus bulk quad transformation.

use lumen_math::{Mat4, Vec3};

use crate::primitives::Quad;

/// Positional index of each face in the output of [`make_cube`].
///
/// Callers override materials per face by these indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    Front = 0,
    Back = 1,
    Right = 2,
    Left = 3,
    Top = 4,
    Bottom = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    /// Outward normal of this face on an untransformed cube.
    pub fn outward_normal(self) -> Vec3 {
        match self {
            CubeFace::Front => -Vec3::Z,
            CubeFace::Back => Vec3::Z,
            CubeFace::Right => Vec3::X,
            CubeFace::Left => -Vec3::X,
            CubeFace::Top => Vec3::Y,
            CubeFace::Bottom => -Vec3::Y,
        }
    }
}

/// Square in the XZ plane at y = 0, centred on the origin, normal +Y.
///
/// Corners sit at +/-`side_length` on both axes, so the full side is
/// `2 * side_length`.
pub fn make_quad(side_length: f32) -> Quad {
    let l = side_length;
    Quad::from_corners([
        Vec3::new(-l, 0.0, -l),
        Vec3::new(-l, 0.0, l),
        Vec3::new(l, 0.0, l),
        Vec3::new(l, 0.0, -l),
    ])
}

/// Closed cube of edge `side` centred on the origin, as six outward-facing
/// quads in [`CubeFace`] order.
pub fn make_cube(side: f32) -> Vec<Quad> {
    let v = side / 2.0;

    vec![
        // front
        Quad::from_corners([
            Vec3::new(-v, v, -v),
            Vec3::new(v, v, -v),
            Vec3::new(v, -v, -v),
            Vec3::new(-v, -v, -v),
        ]),
        // back
        Quad::from_corners([
            Vec3::new(-v, -v, v),
            Vec3::new(v, -v, v),
            Vec3::new(v, v, v),
            Vec3::new(-v, v, v),
        ]),
        // right
        Quad::from_corners([
            Vec3::new(v, v, v),
            Vec3::new(v, -v, v),
            Vec3::new(v, -v, -v),
            Vec3::new(v, v, -v),
        ]),
        // left
        Quad::from_corners([
            Vec3::new(-v, v, v),
            Vec3::new(-v, v, -v),
            Vec3::new(-v, -v, -v),
            Vec3::new(-v, -v, v),
        ]),
        // top
        Quad::from_corners([
            Vec3::new(-v, v, -v),
            Vec3::new(-v, v, v),
            Vec3::new(v, v, v),
            Vec3::new(v, v, -v),
        ]),
        // bottom
        Quad::from_corners([
            Vec3::new(-v, -v, -v),
            Vec3::new(v, -v, -v),
            Vec3::new(v, -v, v),
            Vec3::new(-v, -v, v),
        ]),
    ]
}

/// Apply `transform` to every corner of every quad, returning new quads
/// with rederived planes. The input is left untouched.
pub fn transform_quads(transform: &Mat4, quads: &[Quad]) -> Vec<Quad> {
    quads
        .iter()
        .map(|quad| {
            let out = quad.transformed(transform);
            if out.is_degenerate() {
                log::warn!("Transform collapsed quad at {:?} to zero area", quad.center());
            }
            out
        })
        .collect()
}
