// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

// Relation/graph utilities (spec.md §2 item 2, §9): a sparse labeled
// digraph with reachability and strongly-connected-component condensation
// (Tarjan's algorithm), plus the DeRemer-Pennello "digraph" algorithm
// (spec.md §4.7) used to compute `Read` and `Follow` over the nonterminal
// transition relations.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

/// A sparse adjacency-map digraph. Vertices are added implicitly by
/// `add_edge`; isolated vertices can be registered with `add_vertex`.
#[derive(Debug, Default, Clone)]
pub struct Graph<V: Ord + Clone> {
    adjacency: BTreeMap<V, BTreeSet<V>>,
}

impl<V: Ord + Clone> Graph<V> {
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    pub fn add_vertex(&mut self, v: V) {
        self.adjacency.entry(v).or_default();
    }

    pub fn add_edge(&mut self, from: V, to: V) {
        self.adjacency.entry(from).or_default().insert(to.clone());
        self.adjacency.entry(to).or_default();
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    pub fn successors(&self, v: &V) -> impl Iterator<Item = &V> {
        self.adjacency.get(v).into_iter().flat_map(|s| s.iter())
    }

    /// Vertices reachable from `start`, `start` itself excluded unless it
    /// lies on a cycle back to itself.
    pub fn reachable_from(&self, start: &V) -> BTreeSet<V> {
        let mut visited = BTreeSet::new();
        let mut stack = vec![start.clone()];
        while let Some(v) = stack.pop() {
            for next in self.successors(&v) {
                if visited.insert(next.clone()) {
                    stack.push(next.clone());
                }
            }
        }
        visited
    }

    /// Strongly connected components in reverse topological order
    /// (Tarjan's algorithm), each as a `Vec<V>` in discovery order.
    pub fn sccs(&self) -> Vec<Vec<V>> {
        struct State<V: Ord + Clone> {
            index_counter: usize,
            stack: Vec<V>,
            on_stack: BTreeSet<V>,
            index: BTreeMap<V, usize>,
            lowlink: BTreeMap<V, usize>,
            result: Vec<Vec<V>>,
        }

        fn strongconnect<V: Ord + Clone>(graph: &Graph<V>, v: &V, st: &mut State<V>) {
            st.index.insert(v.clone(), st.index_counter);
            st.lowlink.insert(v.clone(), st.index_counter);
            st.index_counter += 1;
            st.stack.push(v.clone());
            st.on_stack.insert(v.clone());

            for w in graph.successors(v) {
                if !st.index.contains_key(w) {
                    strongconnect(graph, w, st);
                    let w_low = st.lowlink[w];
                    let v_low = st.lowlink[v];
                    st.lowlink.insert(v.clone(), v_low.min(w_low));
                } else if st.on_stack.contains(w) {
                    let w_idx = st.index[w];
                    let v_low = st.lowlink[v];
                    st.lowlink.insert(v.clone(), v_low.min(w_idx));
                }
            }

            if st.lowlink[v] == st.index[v] {
                let mut component = Vec::new();
                loop {
                    let w = st.stack.pop().expect("scc stack underflow");
                    st.on_stack.remove(&w);
                    let is_v = w == *v;
                    component.push(w);
                    if is_v {
                        break;
                    }
                }
                st.result.push(component);
            }
        }

        let mut st = State {
            index_counter: 0,
            stack: Vec::new(),
            on_stack: BTreeSet::new(),
            index: BTreeMap::new(),
            lowlink: BTreeMap::new(),
            result: Vec::new(),
        };
        for v in self.vertices() {
            if !st.index.contains_key(v) {
                strongconnect(self, v, &mut st);
            }
        }
        st.result
    }
}

/// Status of a vertex during the digraph traversal (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Untraversed,
    Traversing(usize),
    Traversed,
}

/// Computes `F(x) = F'(x) ∪ ⋃_{x R y} F(y)` for every `x` in `vertices`,
/// using the DeRemer-Pennello linear-time digraph algorithm: depth-first
/// traversal maintaining per-vertex low-link depth, popping and freezing a
/// whole non-trivial SCC to the same `F` value once its root is found.
///
/// Returns the computed `F` map and every non-trivial SCC encountered (as
/// the set of vertices in it) for callers that need to detect the "not
/// LR(k) for any k" condition (spec.md §4.7).
pub fn digraph<V, U>(
    vertices: &[V],
    relation: &Graph<V>,
    f_prime: impl Fn(&V) -> BTreeSet<U>,
) -> (BTreeMap<V, BTreeSet<U>>, Vec<Vec<V>>)
where
    V: Ord + Clone + Hash,
    U: Ord + Clone,
{
    let mut status: BTreeMap<V, Status> = BTreeMap::new();
    let mut depth: BTreeMap<V, usize> = BTreeMap::new();
    let mut f: BTreeMap<V, BTreeSet<U>> = BTreeMap::new();
    let mut stack: Vec<V> = Vec::new();
    let mut non_trivial_sccs: Vec<Vec<V>> = Vec::new();

    for v in vertices {
        status.entry(v.clone()).or_insert(Status::Untraversed);
    }

    fn traverse<V, U>(
        x: &V,
        relation: &Graph<V>,
        f_prime: &impl Fn(&V) -> BTreeSet<U>,
        status: &mut BTreeMap<V, Status>,
        depth: &mut BTreeMap<V, usize>,
        f: &mut BTreeMap<V, BTreeSet<U>>,
        stack: &mut Vec<V>,
        non_trivial_sccs: &mut Vec<Vec<V>>,
    ) -> usize
    where
        V: Ord + Clone + Hash,
        U: Ord + Clone,
    {
        let d = stack.len() + 1;
        stack.push(x.clone());
        status.insert(x.clone(), Status::Traversing(d));
        depth.insert(x.clone(), d);
        f.insert(x.clone(), f_prime(x));

        let mut n_x = d;
        for y in relation.successors(x).cloned().collect::<Vec<_>>() {
            let y_status = *status.get(&y).unwrap_or(&Status::Untraversed);
            if y_status == Status::Untraversed {
                let n_y = traverse(&y, relation, f_prime, status, depth, f, stack, non_trivial_sccs);
                n_x = n_x.min(n_y);
            } else if let Status::Traversing(dy) = y_status {
                n_x = n_x.min(dy);
            }
            let y_f = f.get(&y).cloned().unwrap_or_default();
            let x_f = f.get_mut(x).expect("x must have an F entry");
            for u in y_f {
                x_f.insert(u);
            }
        }

        if n_x == d {
            let mut component = Vec::new();
            loop {
                let w = stack.pop().expect("digraph stack underflow");
                status.insert(w.clone(), Status::Traversed);
                let shared = f.get(x).cloned().unwrap_or_default();
                f.insert(w.clone(), shared);
                let is_x = w == *x;
                component.push(w);
                if is_x {
                    break;
                }
            }
            if component.len() > 1 {
                non_trivial_sccs.push(component);
            }
        }
        n_x
    }

    for v in vertices {
        if status.get(v) == Some(&Status::Untraversed) {
            traverse(
                v,
                relation,
                &f_prime,
                &mut status,
                &mut depth,
                &mut f,
                &mut stack,
                &mut non_trivial_sccs,
            );
        }
    }

    (f, non_trivial_sccs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_from_follows_edges() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_vertex(4);
        let reach = g.reachable_from(&1);
        assert_eq!(reach, BTreeSet::from([2, 3]));
    }

    #[test]
    fn sccs_of_a_cycle_are_grouped() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 1);
        g.add_edge(2, 3);
        let sccs = g.sccs();
        let sizes: Vec<usize> = sccs.iter().map(|c| c.len()).collect();
        assert!(sizes.contains(&2));
        assert!(sizes.contains(&1));
    }

    #[test]
    fn digraph_on_a_dag_matches_naive_union() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_vertex("c");
        let verts = vec!["a", "b", "c"];
        let (f, sccs) = digraph(&verts, &g, |v| {
            let mut s = BTreeSet::new();
            s.insert(v.to_string());
            s
        });
        assert_eq!(f["c"], BTreeSet::from(["c".to_string()]));
        assert_eq!(
            f["b"],
            BTreeSet::from(["b".to_string(), "c".to_string()])
        );
        assert_eq!(
            f["a"],
            BTreeSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert!(sccs.is_empty());
    }

    #[test]
    fn digraph_detects_non_trivial_scc() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 1);
        let verts = vec![1, 2];
        let (_, sccs) = digraph(&verts, &g, |_| BTreeSet::<u32>::new());
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), 2);
    }
}
