//! Canonical rotational ordering of each vertex's incidence lists.
//!
//! For every vertex not already tagged non-manifold, the walk below tries to
//! reorder the incident face and edge lists into one consistent rotational
//! traversal: a cycle for interior vertices, an open chain bracketed by the
//! two boundary edges otherwise. Succeeding is the manifold test: any
//! failure tags the vertex non-manifold and leaves its lists untouched, and
//! downstream consumers must then treat their order as arbitrary.
//!
//! This is the only place the order of those lists becomes meaningful.

use crate::topology::index::Index;
use crate::topology::level::Level;

impl Level {
    /// Order every eligible vertex's incident faces and edges, tagging
    /// vertices non-manifold where no consistent ordering exists.
    pub(crate) fn orient_incident_components(&mut self) {
        // Scratch for the walk, reused across vertices. Valence is not
        // statically bounded, so these grow to the largest fan seen.
        let mut faces_ordered: Vec<Index> = Vec::with_capacity(self.max_valence());
        let mut edges_ordered: Vec<Index> = Vec::with_capacity(self.max_valence() + 1);

        for v in 0..self.num_vertices() as Index {
            if self.vert_tags[v as usize].non_manifold {
                continue;
            }
            if !self.order_vertex_faces_and_edges(v, &mut faces_ordered, &mut edges_ordered) {
                self.vert_tags[v as usize].non_manifold = true;
            }
        }
    }

    /// Walk the fan around `v` counter-clockwise, recording faces and edges
    /// in rotational order. Returns false if the fan is not manifold.
    fn order_vertex_faces_and_edges(
        &mut self,
        v: Index,
        faces_ordered: &mut Vec<Index>,
        edges_ordered: &mut Vec<Index>,
    ) -> bool {
        faces_ordered.clear();
        edges_ordered.clear();

        let fcount = self.vertex_faces(v).len();
        let ecount = self.vertex_edges(v).len();

        // Eligibility: at least one face, at least two edges, and at most
        // one more edge than faces (the open-chain boundary case).
        if fcount == 0 || ecount < 2 || (ecount as isize - fcount as isize) > 1 {
            return false;
        }

        // Incident degenerate and otherwise bad edges were ruled out before
        // this pass by tagging their vertices, so every edge seen here has
        // one or two incident faces.
        let mut face: Index;
        let mut edge: Index;
        let mut corner: usize;

        if ecount == fcount {
            // Interior: any face starts the cycle; its edge at the vertex's
            // corner is the leading edge.
            face = self.vertex_faces(v)[0];
            corner = match position(self.face_vertices(face), v) {
                Some(c) => c,
                None => return false,
            };
            edge = self.face_edges(face)[corner];
        } else {
            // Boundary: of the two boundary edges, start from the one whose
            // sole face leads the walk forward through every incident face
            // before the other boundary edge is reached.
            let mut start = None;
            for i in 0..ecount {
                let e = self.vertex_edges(v)[i];
                let efaces = self.edge_faces(e);
                if efaces.len() != 1 {
                    continue;
                }
                let f = efaces[0];
                let c = match position(self.face_vertices(f), v) {
                    Some(c) => c,
                    None => return false,
                };
                start = Some((e, f, c));
                if self.face_edges(f)[c] == e {
                    break;
                }
            }
            match start {
                Some((e, f, c)) => {
                    edge = e;
                    face = f;
                    corner = c;
                }
                None => return false,
            }
        }

        faces_ordered.push(face);
        edges_ordered.push(edge);
        let first_edge = edge;

        while edges_ordered.len() < ecount {
            // The next edge counter-clockwise is the one preceding the
            // current corner in the face's edge loop (circularly).
            let face_edges = self.face_edges(face);
            let prev = if corner == 0 {
                face_edges.len() - 1
            } else {
                corner - 1
            };
            let next_edge = face_edges[prev];

            // A repeated edge within a face, or arriving back at the start
            // before the fan is complete: not a manifold fan.
            if next_edge == edge || next_edge == first_edge {
                return false;
            }
            edges_ordered.push(next_edge);

            if faces_ordered.len() < fcount {
                // More faces to visit: cross to the face on the other side
                // of the next edge. A dead end here means the fan is split.
                let efaces = self.edge_faces(next_edge);
                if efaces.is_empty() {
                    return false;
                }
                if efaces.len() == 1 && efaces[0] == face {
                    return false;
                }
                face = if efaces[0] == face {
                    efaces[1]
                } else {
                    efaces[0]
                };
                corner = match position(self.face_edges(face), next_edge) {
                    Some(c) => c,
                    None => return false,
                };
                faces_ordered.push(face);
            }
            edge = next_edge;
        }

        if faces_ordered.len() != fcount || edges_ordered.len() != ecount {
            return false;
        }

        // The fan closed (or spanned the boundary chain): commit the order.
        self.vertex_faces_mut(v).copy_from_slice(faces_ordered);
        self.vertex_edges_mut(v).copy_from_slice(edges_ordered);
        true
    }
}

#[inline]
fn position(slice: &[Index], value: Index) -> Option<usize> {
    slice.iter().position(|&x| x == value)
}
