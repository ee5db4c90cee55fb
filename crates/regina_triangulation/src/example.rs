//! Ready-made triangulations.

use regina_maths::{Perm, Permutation};

use crate::{
    Dim1, Dim2, Dim3, Dimension, FaceId, SimplexId, TriResult, Triangulation, TriangulationError,
};

/// Returns a single simplex with every facet free, triangulating the ball.
pub fn ball<D: Dimension>() -> TriResult<Triangulation<D>> {
    Triangulation::from_gluings(1, std::iter::empty::<(usize, usize, usize, Vec<usize>)>())
}

/// Returns the boundary of a `(D+1)`-simplex, triangulating the sphere with
/// two simplices glued along every facet by the identity.
pub fn sphere<D: Dimension>() -> TriResult<Triangulation<D>> {
    let identity = D::Perm::identity().image_vec();
    Triangulation::from_gluings(2, (0..=D::DIM).map(|f| (0, f, 1, identity.clone())))
}

/// Returns the circle, as one edge with its ends glued together.
pub fn circle() -> TriResult<Triangulation<Dim1>> {
    Triangulation::from_gluings(1, [(0, 0, 0, [1, 0])])
}

/// Returns the two-triangle torus, which has one vertex and three edges.
pub fn torus() -> TriResult<Triangulation<Dim2>> {
    Triangulation::from_gluings(2, [(0, 0, 1, [0, 2, 1]), (0, 1, 1, [2, 1, 0]), (0, 2, 1, [1, 0, 2])])
}

/// Returns the two-triangle projective plane.
pub fn rp2() -> TriResult<Triangulation<Dim2>> {
    Triangulation::from_gluings(2, [(0, 1, 1, [0, 2, 1]), (0, 2, 1, [1, 2, 0]), (0, 0, 1, [1, 2, 0])])
}

/// Returns the two-tetrahedron 3-sphere.
pub fn s3() -> TriResult<Triangulation<Dim3>> {
    sphere()
}

/// Returns the ideal triangulation of the figure-eight knot complement.
pub fn figure_eight() -> TriResult<Triangulation<Dim3>> {
    Triangulation::from_gluings(
        2,
        [
            (0, 0, 1, [1, 3, 0, 2]),
            (0, 1, 1, [2, 0, 3, 1]),
            (0, 2, 1, [0, 3, 2, 1]),
            (0, 3, 1, [2, 1, 0, 3]),
        ],
    )
}

/// Returns the one-tetrahedron ideal triangulation of the non-orientable
/// Gieseking manifold.
pub fn gieseking() -> TriResult<Triangulation<Dim3>> {
    Triangulation::from_gluings(1, [(0, 0, 0, [1, 2, 0, 3]), (0, 2, 0, [0, 2, 3, 1])])
}

/// Returns a three-tetrahedron triangulation of the twisted I-bundle over
/// the Klein bottle, whose boundary is a torus.
pub fn twisted_kxi() -> TriResult<Triangulation<Dim3>> {
    Triangulation::from_gluings(
        3,
        [
            (0, 0, 1, [0, 1, 2, 3]),
            (0, 1, 2, [2, 1, 0, 3]),
            (0, 2, 2, [1, 3, 2, 0]),
            (1, 1, 2, [0, 3, 2, 1]),
            (1, 2, 2, [3, 1, 0, 2]),
        ],
    )
}

/// Returns the layered loop `C(len)`, or the twisted layered loop `C~(len)`,
/// built from a cycle of `len` tetrahedra each glued to the next along two
/// faces.
///
/// The untwisted loop triangulates the lens space `L(len, 1)` with two
/// vertices. The twisted loop has one vertex and triangulates the prism
/// manifold whose first homology is `Z_4` for odd `len` and `Z_2 + Z_2` for
/// even `len`.
pub fn layered_loop(len: usize, twisted: bool) -> TriResult<Triangulation<Dim3>> {
    if len == 0 {
        return Err(TriangulationError::invalid("layered loop needs at least one tetrahedron"));
    }
    let mut ret = Triangulation::new();
    {
        let mut tri = ret.change_span();
        let ids = tri.new_simplices(len)?;
        for (&cur, &next) in ids.iter().zip(&ids[1..]) {
            tri.join(cur, 0, next, Perm::from_array([1, 0, 2, 3]))?;
            tri.join(cur, 3, next, Perm::from_array([0, 1, 3, 2]))?;
        }
        let (first, last) = (ids[0], ids[len - 1]);
        let (bottom, top) = match twisted {
            false => ([1, 0, 2, 3], [0, 1, 3, 2]),
            true => ([2, 3, 1, 0], [3, 2, 0, 1]),
        };
        tri.join(last, 0, first, Perm::from_array(bottom))?;
        tri.join(last, 3, first, Perm::from_array(top))?;
    }
    Ok(ret)
}

/// Edges of the top tetrahedron of a layered solid torus that lie on the
/// boundary, which consists of faces 0 and 1.
const BOUNDARY_EDGES: [(usize, usize); 5] = [(1, 2), (1, 3), (2, 3), (0, 2), (0, 3)];

/// Layered solid torus under construction, with the number of times each
/// boundary edge of the top tetrahedron meets the meridian disc.
struct LayeredSolidTorus {
    tri: Triangulation<Dim3>,
    top: SimplexId,
    weights: Vec<((usize, usize), u64)>,
}

impl LayeredSolidTorus {
    /// One tetrahedron with two faces glued, with boundary weights 1, 2, 3.
    fn base() -> TriResult<Self> {
        let mut tri = Triangulation::new();
        let top = tri.new_simplex()?;
        tri.join(top, 2, top, Perm::from_array([1, 2, 3, 0]))?;
        Ok(Self {
            tri,
            top,
            weights: vec![((1, 2), 1), ((0, 3), 1), ((1, 3), 2), ((0, 2), 2), ((2, 3), 3)],
        })
    }

    fn edge_class(&self, s: SimplexId, (a, b): (usize, usize)) -> TriResult<FaceId> {
        self.tri
            .ensure_skeleton()
            .face_of(s, &[a, b])
            .map(|(edge, _)| edge)
            .ok_or_else(|| TriangulationError::invalid(format!("no edge {a}{b} in simplex {s}")))
    }

    fn edge_with_weight(&self, weight: u64) -> TriResult<(usize, usize)> {
        self.weights
            .iter()
            .find(|&&(_, w)| w == weight)
            .map(|&(edge, _)| edge)
            .ok_or_else(|| TriangulationError::invalid(format!("no boundary edge of weight {weight}")))
    }

    /// Layers a tetrahedron over the boundary edge with the given weight.
    fn layer(mut self, weight: u64) -> TriResult<Self> {
        let max = self.weights.iter().map(|&(_, w)| w).max().unwrap_or(0);
        let edge = self.edge_class(self.top, self.edge_with_weight(weight)?)?;
        let new = self.tri.layer_on(edge)?;

        let covered = self.edge_class(new, (0, 1))?;
        let mut by_class: Vec<(FaceId, u64)> = vec![];
        for &(local, w) in &self.weights {
            let class = self.edge_class(self.top, local)?;
            if class != covered && by_class.iter().all(|&(c, _)| c != class) {
                by_class.push((class, w));
            }
        }
        let &[(_, w1), (_, w2)] = by_class.as_slice() else {
            return Err(TriangulationError::invalid("layered solid torus lost track of its boundary"));
        };
        let crossing = if weight == max { w1.abs_diff(w2) } else { w1 + w2 };

        let weights = BOUNDARY_EDGES
            .into_iter()
            .map(|local| {
                if local == (2, 3) {
                    return Ok((local, crossing));
                }
                let class = self.edge_class(new, local)?;
                by_class
                    .iter()
                    .find(|&&(c, _)| c == class)
                    .map(|&(_, w)| (local, w))
                    .ok_or_else(|| TriangulationError::invalid("boundary edge has no weight"))
            })
            .collect::<TriResult<_>>()?;
        self.top = new;
        self.weights = weights;
        Ok(self)
    }

    /// Builds the layered solid torus whose boundary edges have weights `a`,
    /// `b` and `a + b`.
    fn new(a: u64, b: u64) -> TriResult<Self> {
        if num_integer::gcd(a, b) != 1 {
            return Err(TriangulationError::invalid(format!(
                "layered solid torus parameters {a} and {b} must be coprime",
            )));
        }
        let mut layers = vec![];
        let (mut a, mut b) = (a.min(b), a.max(b));
        loop {
            match (a, b) {
                (1, 2) => break,
                (1, 1) => {
                    layers.push(3);
                    b = 2;
                }
                (0, 1) => {
                    layers.push(2);
                    a = 1;
                }
                _ => {
                    layers.push(b - a);
                    (a, b) = (a.min(b - a), a.max(b - a));
                }
            }
        }
        layers
            .into_iter()
            .rev()
            .try_fold(Self::base()?, |lst, weight| lst.layer(weight))
    }

    /// Glues the two boundary faces together so that the boundary edge
    /// with the given weight is folded onto itself.
    fn fold(mut self, weight: u64) -> TriResult<Triangulation<Dim3>> {
        const FOLDS: [([usize; 4], (usize, usize)); 3] = [
            ([1, 0, 2, 3], (2, 3)),
            ([1, 2, 3, 0], (1, 3)),
            ([1, 3, 0, 2], (1, 2)),
        ];
        let (images, _) = FOLDS
            .into_iter()
            .find(|&(_, edge)| self.weights.iter().any(|&(e, w)| e == edge && w == weight))
            .ok_or_else(|| TriangulationError::invalid(format!("cannot fold along weight {weight}")))?;
        let top = self.top;
        self.tri.join(top, 0, top, Perm::from_array(images))?;
        Ok(self.tri)
    }
}

/// Returns the layered solid torus `LST(a, b, a+b)`, a one-vertex
/// triangulation of the solid torus whose meridian disc meets the three
/// boundary edges `a`, `b` and `a + b` times.
///
/// `a` and `b` must be coprime.
pub fn layered_solid_torus(a: u64, b: u64) -> TriResult<Triangulation<Dim3>> {
    Ok(LayeredSolidTorus::new(a, b)?.tri)
}

/// Returns the lens space `L(p, q)`, built by folding the boundary of a
/// layered solid torus.
///
/// `p` and `q` must be coprime. `L(0, 1)` is `S² × S¹` and `L(1, 0)` is the
/// 3-sphere.
pub fn lens(p: u64, q: u64) -> TriResult<Triangulation<Dim3>> {
    if num_integer::gcd(p, q) != 1 {
        return Err(TriangulationError::invalid(format!(
            "lens space parameters {p} and {q} must be coprime",
        )));
    }
    let q = match p {
        0 => q,
        _ => (q % p).min(p - q % p),
    };
    let ret = match (p, q) {
        (0, _) => LayeredSolidTorus::new(1, 1)?.fold(2)?,
        (1, _) => LayeredSolidTorus::new(1, 2)?.fold(3)?,
        _ => LayeredSolidTorus::new(q, p - 2 * q)?.fold(p - 2 * q)?,
    };
    log::debug!("built L({p},{q}) with {} tetrahedra", ret.size());
    Ok(ret)
}
