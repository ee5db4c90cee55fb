//! Trie of type vectors, used to skip branches that can only lead to
//! non-vertex solutions.

/// Set of type vectors with entries below `N`, supporting a domination
/// query.
///
/// Vector `u` dominates `v` if every non-zero entry of `u` equals the
/// corresponding entry of `v`. If `u` is the type vector of a vertex
/// surface and `u` dominates `v` with `u ≠ v`, then no vertex surface has
/// type vector `v`.
#[derive(Debug, Clone)]
pub(crate) struct TypeTrie<const N: usize> {
    nodes: Vec<Node<N>>,
}

#[derive(Debug, Clone)]
struct Node<const N: usize> {
    children: [Option<usize>; N],
    /// Whether a stored vector ends here, with only zeros after this depth.
    terminal: bool,
}

impl<const N: usize> Node<N> {
    fn new() -> Self {
        Self {
            children: [None; N],
            terminal: false,
        }
    }
}

impl<const N: usize> Default for TypeTrie<N> {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }
}

impl<const N: usize> TypeTrie<N> {
    /// Adds a type vector.
    pub fn insert(&mut self, types: &[u8]) {
        let len = types.iter().rposition(|&t| t != 0).map_or(0, |i| i + 1);
        let mut node = 0;
        for &t in &types[..len] {
            let t = t as usize;
            node = match self.nodes[node].children[t] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node].children[t] = Some(child);
                    child
                }
            };
        }
        self.nodes[node].terminal = true;
    }

    /// Returns whether some stored vector dominates `types`.
    pub fn dominates(&self, types: &[u8]) -> bool {
        self.dominates_from(0, types)
    }

    fn dominates_from(&self, node: usize, types: &[u8]) -> bool {
        let here = &self.nodes[node];
        if here.terminal {
            return true;
        }
        let Some((&first, rest)) = types.split_first() else {
            return false;
        };
        let via_zero = here.children[0].is_some_and(|child| self.dominates_from(child, rest));
        via_zero
            || (first != 0
                && here.children[first as usize].is_some_and(|child| self.dominates_from(child, rest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domination() {
        let mut trie = TypeTrie::<4>::default();
        assert!(!trie.dominates(&[1, 2, 3]));
        trie.insert(&[0, 2, 0]);
        assert!(trie.dominates(&[0, 2, 0]));
        assert!(trie.dominates(&[1, 2, 3]));
        assert!(!trie.dominates(&[1, 3, 3]));
        assert!(!trie.dominates(&[0, 0, 1]));
        trie.insert(&[1, 0, 1]);
        assert!(trie.dominates(&[1, 3, 1]));
        assert!(!trie.dominates(&[2, 3, 1]));
    }
}
