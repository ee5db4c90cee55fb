//! Combinatorial isomorphisms between triangulations.

use regina_maths::Permutation;
use regina_util::ti::{TiVec, TypedIndex};

use crate::{Dimension, Gluing, Simplex, SimplexId, TriResult, Triangulation, TriangulationError};

/// Relabelling of the simplices of a triangulation and of the vertices of
/// each simplex.
///
/// Simplex `s` becomes simplex `simplex_image(s)`, and vertex `v` of `s`
/// becomes vertex `facet_perm(s)(v)` of that simplex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isomorphism<D: Dimension> {
    simplex_image: Vec<SimplexId>,
    facet_perm: Vec<D::Perm>,
}

impl<D: Dimension> Isomorphism<D> {
    /// Constructs an isomorphism, checking that the simplex images form a
    /// bijection.
    pub fn new(simplex_image: Vec<SimplexId>, facet_perm: Vec<D::Perm>) -> TriResult<Self> {
        let n = simplex_image.len();
        if facet_perm.len() != n {
            return Err(TriangulationError::invalid(
                "isomorphism needs one vertex permutation per simplex",
            ));
        }
        let mut seen = vec![false; n];
        for s in &simplex_image {
            match seen.get_mut(s.to_index()) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(TriangulationError::invalid("simplex images are not a bijection")),
            }
        }
        Ok(Self {
            simplex_image,
            facet_perm,
        })
    }
    pub(crate) fn from_parts(simplex_image: Vec<SimplexId>, facet_perm: Vec<D::Perm>) -> Self {
        Self {
            simplex_image,
            facet_perm,
        }
    }
    /// Returns the identity isomorphism on `n` simplices.
    pub fn identity(n: usize) -> TriResult<Self> {
        Ok(Self {
            simplex_image: (0..n).map(SimplexId::try_from_index).collect::<Result<_, _>>()?,
            facet_perm: vec![D::Perm::identity(); n],
        })
    }

    /// Returns the number of simplices relabelled.
    pub fn size(&self) -> usize {
        self.simplex_image.len()
    }
    /// Returns the image of simplex `s`.
    pub fn simplex_image(&self, s: SimplexId) -> SimplexId {
        self.simplex_image[s.to_index()]
    }
    /// Returns the vertex relabelling for simplex `s`.
    pub fn facet_perm(&self, s: SimplexId) -> D::Perm {
        self.facet_perm[s.to_index()]
    }

    /// Returns the inverse relabelling.
    pub fn inverse(&self) -> Self {
        let n = self.size();
        let mut simplex_image = vec![SimplexId(0); n];
        let mut facet_perm = vec![D::Perm::identity(); n];
        for (s, (&image, &perm)) in std::iter::zip(&self.simplex_image, &self.facet_perm).enumerate() {
            simplex_image[image.to_index()] = SimplexId(s as u32);
            facet_perm[image.to_index()] = perm.inverse();
        }
        Self {
            simplex_image,
            facet_perm,
        }
    }
    /// Returns the relabelling that applies `self` and then `next`.
    pub fn then(&self, next: &Self) -> TriResult<Self> {
        if self.size() != next.size() {
            return Err(TriangulationError::invalid("isomorphisms have different sizes"));
        }
        let (simplex_image, facet_perm) = std::iter::zip(&self.simplex_image, &self.facet_perm)
            .map(|(&image, &perm)| (next.simplex_image(image), next.facet_perm(image) * perm))
            .unzip();
        Ok(Self {
            simplex_image,
            facet_perm,
        })
    }

    pub(crate) fn relabelled_simplices(&self, tri: &Triangulation<D>) -> TriResult<TiVec<SimplexId, Simplex<D>>> {
        if tri.size() != self.size() {
            return Err(TriangulationError::invalid(format!(
                "isomorphism on {} simplices applied to a triangulation of size {}",
                self.size(),
                tri.size(),
            )));
        }
        let mut ret = TiVec::filled(tri.size(), Simplex::default())?;
        for (s, simplex) in &tri.simplices {
            let image = self.simplex_image(s);
            let perm = self.facet_perm(s);
            ret[image].description = simplex.description.clone();
            for (f, gluing) in simplex.gluings() {
                ret[image].adj[perm.image(f)] = gluing.map(|g| Gluing {
                    simplex: self.simplex_image(g.simplex),
                    perm: self.facet_perm(g.simplex) * g.perm * perm.inverse(),
                });
            }
        }
        Ok(ret)
    }

    /// Returns a relabelled copy of `tri`.
    pub fn apply(&self, tri: &Triangulation<D>) -> TriResult<Triangulation<D>> {
        let mut ret = Triangulation::new();
        let simplices = self.relabelled_simplices(tri)?;
        ret.change_span().simplices = simplices;
        Ok(ret)
    }
}

impl<D: Dimension> Triangulation<D> {
    /// Relabels this triangulation in place.
    pub fn relabel(&mut self, iso: &Isomorphism<D>) -> TriResult<()> {
        let simplices = iso.relabelled_simplices(self)?;
        self.change_span().simplices = simplices;
        Ok(())
    }
}
