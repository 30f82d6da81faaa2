//! Transitive closure over a directed graph given as an edge function.
//!
//! Supertype graphs are acyclic in a well-formed program, but the traversal keeps a visited set so
//! malformed input (e.g. `A extends B`, `B extends A`) terminates instead of hanging.
//!
//! ## Notes
//! - The traversal is breadth-first: direct successors come first, in the order the edge function
//!   returns them, followed by their successors. The result order is therefore deterministic.
//! - The start node is never a member of its own closure, even when a cycle leads back to it.
//! - The first error returned by the edge function aborts the traversal.
//!
//! ## Examples
//! ```rust
//! use suitegen_core::closure::closure;
//!
//! let edges = |n: &u32| -> Result<Vec<u32>, ()> {
//!     Ok(match n {
//!         1 => vec![2, 3],
//!         2 => vec![4],
//!         3 => vec![4],
//!         _ => vec![],
//!     })
//! };
//! let reached = closure(&1, edges).unwrap();
//! assert_eq!(reached.as_slice(), &[2, 3, 4]);
//! ```

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Ordered set of nodes reachable from a start node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure<N> {
    members: Vec<N>,
}

impl<N: Eq> Closure<N> {
    pub fn contains(&self, node: &N) -> bool {
        self.members.contains(node)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[N] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_vec(self) -> Vec<N> {
        self.members
    }
}

impl<'a, N> IntoIterator for &'a Closure<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Compute every node transitively reachable from `start` through `edges`.
pub fn closure<N, E, I, F>(start: &N, mut edges: F) -> Result<Closure<N>, E>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
    F: FnMut(&N) -> Result<I, E>,
{
    let mut visited: HashSet<N> = HashSet::new();
    visited.insert(start.clone());

    let mut members = Vec::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(node) = queue.pop_front() {
        for next in edges(&node)? {
            if visited.insert(next.clone()) {
                members.push(next.clone());
                queue.push_back(next);
            }
        }
    }

    Ok(Closure { members })
}
