//! Tree search for vertex surfaces.
//!
//! Each level of the tree fixes the type of one tetrahedron (which quad or
//! octagon type, if any, is non-zero) or of one triangle column (zero or
//! positive). Every branch pushes the implied constraints onto an
//! [`LpSystem`], and branches with an empty cone are pruned. At a leaf the
//! columns allowed to be non-zero are exactly the positive ones, and the
//! solution is a vertex surface precisely when the kernel restricted to
//! those columns is one-dimensional.

use itertools::Itertools;
use regina_maths::Integer;

use crate::lp::{LpSystem, kernel_basis, primitive_nonnegative};
use crate::typetrie::TypeTrie;
use crate::{Cancellation, Enumeration, MatchingEquations, SurfaceResult};

#[derive(Debug, Clone)]
enum Level {
    /// Quad columns, then octagon columns, of one tetrahedron. Each entry is
    /// the column group of one disc type.
    Tet { quads: Vec<usize>, octagons: Vec<usize> },
    /// A single triangle column.
    Triangle(usize),
}

impl Level {
    fn column_options(&self) -> Vec<usize> {
        match self {
            Level::Tet { quads, octagons } => quads.iter().chain(octagons).copied().collect(),
            Level::Triangle(c) => vec![*c],
        }
    }
}

/// State of a tree search in progress.
pub(crate) struct TreeSearch<'a> {
    eqs: &'a MatchingEquations,
    levels: Vec<Level>,
    types: Vec<u8>,
    lp: LpSystem,
    trie: TypeTrie<7>,
    cancel: Option<&'a Cancellation>,
    status: Enumeration,
    found: Vec<Vec<Integer>>,
    nodes: u64,
}

impl<'a> TreeSearch<'a> {
    /// Prepares a search over the given equations, which must be in an
    /// unoriented coordinate system.
    pub fn new(eqs: &'a MatchingEquations, cancel: Option<&'a Cancellation>) -> Self {
        let coords = eqs.coords();
        let matrix = eqs.matrix();
        let weight = |c: usize| (0..matrix.rows()).filter(|&r| !matrix[(r, c)].is_zero()).count();

        let mut tets = eqs
            .cliques()
            .iter()
            .map(|clique| {
                let cols = clique.iter().filter_map(|group| group.first().copied()).collect_vec();
                let (quads, octagons) = cols.split_at(cols.len().min(3));
                Level::Tet {
                    quads: quads.to_vec(),
                    octagons: octagons.to_vec(),
                }
            })
            .collect_vec();
        // Most constrained tetrahedra first.
        tets.sort_by_cached_key(|level| {
            std::cmp::Reverse(level.column_options().into_iter().map(weight).sum::<usize>())
        });

        let mut levels = tets;
        if coords.has_triangles() {
            let per_tet = coords.per_tet();
            for t in 0..eqs.size() {
                levels.extend((0..4).map(|v| Level::Triangle(t * per_tet + v)));
            }
        }

        Self {
            eqs,
            types: vec![0; levels.len()],
            levels,
            lp: LpSystem::new(matrix),
            trie: TypeTrie::default(),
            cancel,
            status: Enumeration::Complete,
            found: vec![],
            nodes: 0,
        }
    }

    /// Runs the search, returning the vertex vectors in the order found.
    pub fn run(mut self) -> SurfaceResult<(Vec<Vec<Integer>>, Enumeration)> {
        self.lp.push_nonzero(0..self.eqs.width());
        if self.eqs.width() > 0 && self.lp.is_feasible() {
            self.descend(0)?;
        }
        log::debug!(
            "tree search visited {} nodes and found {} vertex surfaces",
            self.nodes,
            self.found.len(),
        );
        Ok((self.found, self.status))
    }

    fn is_cancelled(&mut self) -> bool {
        if self.status == Enumeration::Complete && self.cancel.is_some_and(Cancellation::is_cancelled) {
            log::debug!("tree search cancelled after {} nodes", self.nodes);
            self.status = Enumeration::Cancelled;
        }
        self.status == Enumeration::Cancelled
    }

    fn octagon_used_before(&self, depth: usize) -> bool {
        self.levels[..depth]
            .iter()
            .zip(&self.types)
            .any(|(level, &t)| matches!(level, Level::Tet { .. }) && t > 3)
    }

    fn choices(&self, depth: usize) -> usize {
        match &self.levels[depth] {
            Level::Triangle(_) => 2,
            Level::Tet { quads, octagons } => match self.octagon_used_before(depth) {
                true => 1 + quads.len(),
                false => 1 + quads.len() + octagons.len(),
            },
        }
    }

    fn descend(&mut self, depth: usize) -> SurfaceResult<()> {
        if self.is_cancelled() {
            return Ok(());
        }
        self.nodes += 1;
        if depth == self.levels.len() {
            return self.leaf();
        }
        for choice in 0..self.choices(depth) {
            if self.is_cancelled() {
                break;
            }
            self.types[depth] = choice as u8;
            if choice != 0 && self.trie.dominates(&self.types) {
                continue;
            }
            let mark = self.lp.depth();
            let options = self.levels[depth].column_options();
            for (i, &c) in options.iter().enumerate() {
                match choice == i + 1 {
                    true => self.lp.push_positive(c),
                    false => self.lp.push_zero(c),
                }
            }
            if self.lp.is_feasible() {
                self.descend(depth + 1)?;
            }
            self.lp.truncate(mark);
        }
        self.types[depth] = 0;
        Ok(())
    }

    fn leaf(&mut self) -> SurfaceResult<()> {
        let support = self
            .levels
            .iter()
            .zip(&self.types)
            .filter(|&(_, &t)| t != 0)
            .map(|(level, &t)| level.column_options()[t as usize - 1])
            .sorted()
            .collect_vec();
        let basis = kernel_basis(self.eqs.matrix(), &support);
        let [ray] = basis.as_slice() else {
            // Not a vertex of the cone.
            log::trace!("tree search leaf has a {}-dimensional solution space", basis.len());
            return Ok(());
        };
        let Some(values) = primitive_nonnegative(ray) else {
            log::debug!("tree search leaf has a solution with mixed signs");
            return Ok(());
        };
        let mut v = vec![Integer::ZERO; self.eqs.width()];
        for (&c, x) in support.iter().zip(values) {
            v[c] = x;
        }
        if !self.eqs.is_admissible(&v)? {
            debug_panic!("tree search produced an inadmissible vector");
            return Ok(());
        }
        log::trace!("tree search found vertex surface {v:?}");
        self.found.push(v);
        self.trie.insert(&self.types);
        Ok(())
    }
}
