//! Purpose: the Guibas-Stolfi quad-edge subdivision (L5), the mesh
//! structure Bowyer-Watson (L6) and constrained Delaunay (L7) both
//! operate on.
//!
//! Why this design: the original quad-edge data structure is a web of
//! mutually referencing records. Here the four directed edges making
//! up one undirected edge are four consecutive slots in a flat arena,
//! so `rot`/`sym`/`tor` are handle arithmetic on the low two bits
//! instead of stored pointers, and the arena owns the mesh exclusively
//! with no reference cycles.

use std::collections::HashSet;

/// Index into the point array backing a triangulation. Not validated
/// here; callers are expected to index a shared `Vec<Point<S>>`.
pub type PointId = usize;

/// A directed edge: `handle / 4` selects the undirected edge, `handle
/// % 4` selects which of its four quadrant edges (0 = the primal edge
/// itself, 1 = its left-dual, 2 = its reverse, 3 = its right-dual).
pub type EdgeHandle = usize;

fn quadrant(h: EdgeHandle) -> usize {
    h & 3
}

fn base(h: EdgeHandle) -> usize {
    h & !3
}

/// The edge turned a quarter-turn counterclockwise (primal <-> dual).
pub fn rot(h: EdgeHandle) -> EdgeHandle {
    base(h) | ((quadrant(h) + 1) & 3)
}

/// The edge turned a quarter-turn clockwise: `rot`'s inverse.
pub fn tor(h: EdgeHandle) -> EdgeHandle {
    base(h) | ((quadrant(h) + 3) & 3)
}

/// The same undirected edge, reversed: `rot` applied twice.
pub fn sym(h: EdgeHandle) -> EdgeHandle {
    base(h) | ((quadrant(h) + 2) & 3)
}

#[derive(Clone, Debug)]
struct EdgeRecord {
    /// Origin vertex; only meaningful for primal quadrants (0 and 2).
    origin: Option<PointId>,
    /// Next CCW edge around `origin`.
    onext: EdgeHandle,
    alive: bool,
}

/// An arena of quad-edges. Every undirected edge occupies four
/// consecutive slots; `free` recycles the slot quartets of deleted
/// edges.
#[derive(Clone, Debug, Default)]
pub struct QuadEdgeMesh {
    edges: Vec<EdgeRecord>,
    free_bases: Vec<EdgeHandle>,
}

impl QuadEdgeMesh {
    pub fn new() -> Self {
        QuadEdgeMesh { edges: Vec::new(), free_bases: Vec::new() }
    }

    fn alloc_quartet(&mut self) -> EdgeHandle {
        if let Some(b) = self.free_bases.pop() {
            for q in 0..4 {
                self.edges[b + q] = EdgeRecord { origin: None, onext: b + q, alive: true };
            }
            return b;
        }
        let base = self.edges.len();
        for q in 0..4 {
            self.edges.push(EdgeRecord { origin: None, onext: base + q, alive: true });
        }
        base
    }

    /// Creates an isolated edge `a -> b` whose both face-duals form a
    /// single unbounded face. Returns the handle of the primal
    /// `a -> b` quadrant.
    pub fn make_edge(&mut self, a: PointId, b: PointId) -> EdgeHandle {
        let base = self.alloc_quartet();
        let e = base;
        let e_sym = sym(e);
        self.edges[e].origin = Some(a);
        self.edges[e_sym].origin = Some(b);
        // Each quadrant's onext initially points to itself: a single
        // edge has no other edges sharing either endpoint yet.
        e
    }

    pub fn origin(&self, e: EdgeHandle) -> Option<PointId> {
        self.edges[e].origin
    }

    pub fn destination(&self, e: EdgeHandle) -> Option<PointId> {
        self.edges[sym(e)].origin
    }

    pub fn onext(&self, e: EdgeHandle) -> EdgeHandle {
        self.edges[e].onext
    }

    pub fn oprev(&self, e: EdgeHandle) -> EdgeHandle {
        rot(self.onext(rot(e)))
    }

    pub fn lnext(&self, e: EdgeHandle) -> EdgeHandle {
        tor(self.onext(rot(e)))
    }

    pub fn lprev(&self, e: EdgeHandle) -> EdgeHandle {
        sym(self.onext(e))
    }

    pub fn rnext(&self, e: EdgeHandle) -> EdgeHandle {
        rot(self.onext(tor(e)))
    }

    pub fn rprev(&self, e: EdgeHandle) -> EdgeHandle {
        self.onext(sym(e))
    }

    pub fn is_alive(&self, e: EdgeHandle) -> bool {
        self.edges[e].alive
    }

    /// Splices the two edge-rings at `a` and `b`'s origins. Per
    /// Guibas-Stolfi this single primitive both joins two disjoint
    /// rings and splits one ring into two, depending on whether `a`
    /// and `b` already share a ring.
    pub fn splice(&mut self, a: EdgeHandle, b: EdgeHandle) {
        let alpha = rot(self.onext(a));
        let beta = rot(self.onext(b));

        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edges[a].onext = b_onext;
        self.edges[b].onext = a_onext;

        let alpha_onext = self.onext(alpha);
        let beta_onext = self.onext(beta);
        self.edges[alpha].onext = beta_onext;
        self.edges[beta].onext = alpha_onext;
    }

    /// Creates a new edge `e1.destination -> e2.origin` and splices it
    /// into both rings, returning the new edge's handle.
    pub fn connect(&mut self, e1: EdgeHandle, e2: EdgeHandle) -> EdgeHandle {
        let a = self.destination(e1).expect("connect requires a bound destination");
        let b = self.origin(e2).expect("connect requires a bound origin");
        let e = self.make_edge(a, b);
        self.splice(e, self.lnext(e1));
        self.splice(sym(e), e2);
        e
    }

    /// Removes `e` from both vertex rings and recycles its quartet.
    pub fn delete(&mut self, e: EdgeHandle) {
        self.splice(e, self.oprev(e));
        self.splice(sym(e), self.oprev(sym(e)));
        let b = base(e);
        for q in 0..4 {
            self.edges[b + q].alive = false;
        }
        self.free_bases.push(b);
    }

    /// Rotates `e` to the other diagonal of the quadrilateral formed by
    /// its two incident triangles. `e` must be an interior edge (both
    /// incident faces triangles).
    pub fn swap(&mut self, e: EdgeHandle) {
        let a = self.oprev(e);
        let b = self.oprev(sym(e));
        self.splice(e, a);
        self.splice(sym(e), b);
        self.splice(e, self.lnext(a));
        self.splice(sym(e), self.lnext(b));
        let new_origin = self.destination(a);
        let new_dest = self.destination(b);
        self.edges[e].origin = new_origin;
        self.edges[sym(e)].origin = new_dest;
    }

    /// Every vertex `v` reachable from `start`'s ring, i.e. the edges
    /// fanning out of `start`'s origin.
    pub fn edges_around_origin(&self, start: EdgeHandle) -> Vec<EdgeHandle> {
        let mut out = vec![start];
        let mut e = self.onext(start);
        while e != start {
            out.push(e);
            e = self.onext(e);
        }
        out
    }

    /// All distinct undirected primal edges currently alive, one
    /// handle (quadrant 0 or 2, whichever is smaller) per edge.
    pub fn undirected_edges(&self) -> Vec<EdgeHandle> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for b in (0..self.edges.len()).step_by(4) {
            if !self.edges[b].alive {
                continue;
            }
            if seen.insert(b) {
                out.push(b);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rot_has_order_four() {
        let h = 0;
        assert_eq!(rot(rot(rot(rot(h)))), h);
        assert_eq!(rot(rot(h)), sym(h));
        assert_eq!(tor(rot(h)), h);
    }

    #[test]
    fn make_edge_links_origin_and_destination() {
        let mut mesh = QuadEdgeMesh::new();
        let e = mesh.make_edge(0, 1);
        assert_eq!(mesh.origin(e), Some(0));
        assert_eq!(mesh.destination(e), Some(1));
        assert_eq!(mesh.onext(e), e);
    }

    #[test]
    fn splice_joins_two_edges_at_shared_origin() {
        let mut mesh = QuadEdgeMesh::new();
        let e1 = mesh.make_edge(0, 1);
        let e2 = mesh.make_edge(0, 2);
        mesh.splice(e1, e2);
        let fan = mesh.edges_around_origin(e1);
        assert_eq!(fan.len(), 2);
        assert!(fan.contains(&e2));
    }

    #[test]
    fn connect_builds_triangle_third_edge() {
        let mut mesh = QuadEdgeMesh::new();
        let ab = mesh.make_edge(0, 1);
        let bc = mesh.make_edge(1, 2);
        mesh.splice(sym(ab), bc);
        let ca = mesh.connect(bc, ab);
        assert_eq!(mesh.origin(ca), Some(2));
        assert_eq!(mesh.destination(ca), Some(0));
    }

    #[test]
    fn delete_removes_edge_from_both_rings() {
        let mut mesh = QuadEdgeMesh::new();
        let e1 = mesh.make_edge(0, 1);
        let e2 = mesh.make_edge(0, 2);
        mesh.splice(e1, e2);
        mesh.delete(e2);
        assert!(!mesh.is_alive(e2));
        let fan = mesh.edges_around_origin(e1);
        assert_eq!(fan.len(), 1);
    }
}
