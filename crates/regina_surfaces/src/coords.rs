//! Coordinate systems and the normal disc types they count.
//!
//! Vertices of a tetrahedron are numbered 0 to 3 and face `f` is the face
//! opposite vertex `f`. Triangle type `v` cuts off vertex `v`. Quad type `k`
//! separates the edge `0 (k+1)` from the opposite edge, and octagon type `k`
//! separates the same two pairs of vertices but meets both of those edges
//! twice.

use regina_triangulation::SimplexId;
use regina_util::ti::TypedIndex;

use crate::SurfaceResult;

/// Coordinate system in which a normal surface is described.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordSystem {
    /// Four triangle and three quad coordinates per tetrahedron.
    #[strum(to_string = "standard normal")]
    Standard,
    /// Three quad coordinates per tetrahedron.
    #[strum(to_string = "quad normal")]
    Quad,
    /// Four triangle, three quad and three octagon coordinates per
    /// tetrahedron.
    #[strum(to_string = "standard almost normal")]
    AlmostNormal,
    /// Three quad and three octagon coordinates per tetrahedron.
    #[strum(to_string = "quad-oct almost normal")]
    QuadOct,
    /// Standard coordinates with each disc type split by transverse
    /// orientation.
    #[strum(to_string = "transversely oriented standard normal")]
    OrientedStandard,
    /// Quad coordinates with each quad type split by transverse orientation.
    #[strum(to_string = "transversely oriented quad normal")]
    OrientedQuad,
}

/// Type of a normal or almost normal disc within a tetrahedron.
///
/// Ordered with triangles first, then quads, then octagons.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscType {
    /// Triangle cutting off the given vertex.
    Triangle(usize),
    /// Quadrilateral of the given type.
    Quad(usize),
    /// Octagon of the given type.
    Octagon(usize),
}

/// Transverse orientation of a disc in oriented coordinates.
///
/// A positive triangle points towards the vertex it cuts off. A positive
/// quad or octagon points towards the side containing vertex 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Points towards the vertex (triangles) or towards vertex 0 (quads and
    /// octagons).
    Positive,
    /// Points the other way.
    Negative,
}

const STANDARD_DISCS: [DiscType; 7] = [
    DiscType::Triangle(0),
    DiscType::Triangle(1),
    DiscType::Triangle(2),
    DiscType::Triangle(3),
    DiscType::Quad(0),
    DiscType::Quad(1),
    DiscType::Quad(2),
];
const QUAD_DISCS: [DiscType; 3] = [DiscType::Quad(0), DiscType::Quad(1), DiscType::Quad(2)];
const ALMOST_NORMAL_DISCS: [DiscType; 10] = [
    DiscType::Triangle(0),
    DiscType::Triangle(1),
    DiscType::Triangle(2),
    DiscType::Triangle(3),
    DiscType::Quad(0),
    DiscType::Quad(1),
    DiscType::Quad(2),
    DiscType::Octagon(0),
    DiscType::Octagon(1),
    DiscType::Octagon(2),
];
const QUAD_OCT_DISCS: [DiscType; 6] = [
    DiscType::Quad(0),
    DiscType::Quad(1),
    DiscType::Quad(2),
    DiscType::Octagon(0),
    DiscType::Octagon(1),
    DiscType::Octagon(2),
];

/// `QUAD_SEPARATING[a][b]` is the quad type that separates edge `ab` from
/// the opposite edge.
const QUAD_SEPARATING: [[usize; 4]; 4] = [[3, 0, 1, 2], [0, 3, 2, 1], [1, 2, 3, 0], [2, 1, 0, 3]];

/// Vertex pairs on either side of each quad type.
pub const QUAD_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// Returns the quad type that separates vertices `a` and `b` from the other
/// two vertices.
///
/// # Panics
///
/// Panics if `a == b` or either is out of range.
pub fn quad_separating(a: usize, b: usize) -> usize {
    let ret = QUAD_SEPARATING[a][b];
    assert!(ret < 3, "no quad separates vertex {a} from itself");
    ret
}

/// Returns the two quad types that meet edge `ab`.
pub fn quad_meeting(a: usize, b: usize) -> [usize; 2] {
    match quad_separating(a, b) {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

/// Returns whether vertex `v` lies on the same side of quad or octagon type
/// `k` as vertex 0.
pub fn on_vertex_zero_side(k: usize, v: usize) -> bool {
    v == 0 || v == k + 1
}

impl CoordSystem {
    /// Returns the disc types with a coordinate in this system, in column
    /// order within a tetrahedron.
    ///
    /// In oriented systems each disc type has two adjacent columns, positive
    /// first.
    pub fn disc_types(self) -> &'static [DiscType] {
        match self {
            Self::Standard | Self::OrientedStandard => &STANDARD_DISCS,
            Self::Quad | Self::OrientedQuad => &QUAD_DISCS,
            Self::AlmostNormal => &ALMOST_NORMAL_DISCS,
            Self::QuadOct => &QUAD_OCT_DISCS,
        }
    }

    /// Returns whether discs are split by transverse orientation.
    pub fn is_oriented(self) -> bool {
        matches!(self, Self::OrientedStandard | Self::OrientedQuad)
    }

    /// Returns whether triangles have their own coordinates.
    pub fn has_triangles(self) -> bool {
        matches!(self, Self::Standard | Self::AlmostNormal | Self::OrientedStandard)
    }

    /// Returns whether octagons are permitted.
    pub fn has_octagons(self) -> bool {
        matches!(self, Self::AlmostNormal | Self::QuadOct)
    }

    /// Returns whether this is one of the almost normal systems.
    pub fn is_almost_normal(self) -> bool {
        self.has_octagons()
    }

    /// Returns the number of coordinates per tetrahedron.
    pub fn per_tet(self) -> usize {
        let discs = self.disc_types().len();
        match self.is_oriented() {
            true => 2 * discs,
            false => discs,
        }
    }

    /// Returns the number of coordinates for a triangulation with `size`
    /// tetrahedra.
    pub fn dimension(self, size: usize) -> usize {
        self.per_tet() * size
    }

    /// Returns the system that drops the triangle coordinates of this one.
    pub fn reduced(self) -> Self {
        match self {
            Self::Standard | Self::Quad => Self::Quad,
            Self::AlmostNormal | Self::QuadOct => Self::QuadOct,
            Self::OrientedStandard | Self::OrientedQuad => Self::OrientedQuad,
        }
    }

    /// Returns the system that adds triangle coordinates to this one.
    pub fn unreduced(self) -> Self {
        match self {
            Self::Standard | Self::Quad => Self::Standard,
            Self::AlmostNormal | Self::QuadOct => Self::AlmostNormal,
            Self::OrientedStandard | Self::OrientedQuad => Self::OrientedStandard,
        }
    }

    /// Returns the column of the given disc in tetrahedron `tet`, or `None`
    /// if this system has no such coordinate.
    ///
    /// `orientation` must be given exactly when this system is oriented.
    pub fn column(self, tet: SimplexId, disc: DiscType, orientation: Option<Orientation>) -> Option<usize> {
        let pos = self.disc_types().iter().position(|&d| d == disc)?;
        let base = tet.to_index() * self.per_tet();
        match (self.is_oriented(), orientation) {
            (false, None) => Some(base + pos),
            (true, Some(Orientation::Positive)) => Some(base + 2 * pos),
            (true, Some(Orientation::Negative)) => Some(base + 2 * pos + 1),
            _ => None,
        }
    }

    /// Returns the tetrahedron, disc type and orientation of a column.
    pub fn column_disc(self, column: usize) -> SurfaceResult<(SimplexId, DiscType, Option<Orientation>)> {
        let per_tet = self.per_tet();
        let tet = SimplexId::try_from_index(column / per_tet)?;
        let local = column % per_tet;
        Ok(match self.is_oriented() {
            true => {
                let orientation = match local % 2 {
                    0 => Orientation::Positive,
                    _ => Orientation::Negative,
                };
                (tet, self.disc_types()[local / 2], Some(orientation))
            }
            false => (tet, self.disc_types()[local], None),
        })
    }
}
