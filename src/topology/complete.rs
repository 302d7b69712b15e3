//! Completion of the full relation set from face-vertex data alone.
//!
//! The input collaborator declares vertex and face counts and fills in each
//! face's vertex loop; everything else (the edge list, every inverse
//! relation, tags and local indices) is derived here in one sequential
//! batch pass. Edges are discovered lazily, one per previously unseen vertex
//! pair, by searching the accumulating vertex-edge relation of the pair's
//! first vertex.

use crate::mesh_error::MeshLevelError;
use crate::topology::dynamic_relation::DynamicRelation;
use crate::topology::index::{INDEX_INVALID, Index, LocalIndex, index_is_valid};
use crate::topology::level::Level;
use crate::topology::tags::{EdgeTag, FaceTag, VertexTag};

/// Inline stride for the vertex-face and vertex-edge builders: valence 4 is
/// typical for a quad mesh, with slack for extraordinary vertices.
const AVG_VERTEX_VALENCE: usize = 6;

/// Inline stride for the edge-face builder: 2 for interior edges.
const AVG_EDGE_FACES: usize = 2;

/// Regular valence of an interior vertex under a quad scheme.
const REGULAR_INTERIOR_VALENCE: usize = 4;

/// Regular valence of a boundary vertex under a quad scheme.
const REGULAR_BOUNDARY_VALENCE: usize = 3;

impl Level {
    /// Derive the complete topology from the face-vertex relation.
    ///
    /// Preconditions: vertex and face counts are declared, every face's
    /// vertex loop is fully populated, and no edges exist yet. On success
    /// the level holds every relation in compressed form, all tags are
    /// populated, each manifold vertex's incident faces and edges are in
    /// canonical rotational order, and local indices are cached.
    ///
    /// Non-manifold configurations are recoverable: the offending edges and
    /// vertices are tagged and construction continues. Degenerate input is
    /// not: an edge with coincident endpoints aborts with
    /// [`MeshLevelError::DegenerateEdge`], and a face loop that revisits a
    /// vertex at a non-adjacent corner aborts with
    /// [`MeshLevelError::RepeatedFaceVertex`], either way leaving the level
    /// partially populated; discard it.
    pub fn complete_from_face_vertices(&mut self) -> Result<(), MeshLevelError> {
        let vcount = self.num_vertices();
        let fcount = self.num_faces();
        if vcount == 0 || fcount == 0 || self.num_edges() != 0 {
            return Err(MeshLevelError::CompletionPrecondition {
                verts: vcount,
                faces: fcount,
                edges: self.num_edges(),
            });
        }

        // Harmless if the caller already sized everything; guarantees all
        // per-vertex and per-face storage exists before relations are built.
        self.resize_vertices(vcount);
        self.resize_faces(fcount);
        self.resize_edges(0);

        for f in 0..fcount as Index {
            let verts = self.face_vertices(f);
            if verts.len() < 3 {
                return Err(MeshLevelError::FaceTooSmall {
                    face: f,
                    corners: verts.len(),
                });
            }
            for (corner, &v) in verts.iter().enumerate() {
                if !index_is_valid(v) {
                    return Err(MeshLevelError::UnassignedFaceVertex { face: f, corner });
                }
                if v as usize >= vcount {
                    return Err(MeshLevelError::FaceVertexOutOfRange {
                        face: f,
                        corner,
                        vertex: v,
                        verts: vcount,
                    });
                }
                // A vertex revisited at a non-adjacent corner would need two
                // local indices in one vert-face entry. Adjacent repeats fall
                // through: they form a self-loop edge and fail as degenerate.
                for (prev, &u) in verts[..corner].iter().enumerate() {
                    let adjacent =
                        prev + 1 == corner || (prev == 0 && corner == verts.len() - 1);
                    if u == v && !adjacent {
                        return Err(MeshLevelError::RepeatedFaceVertex {
                            face: f,
                            corner,
                            vertex: v,
                        });
                    }
                }
            }
        }

        // The edge loop parallels the vertex loop slot for slot.
        let total_corners = self.num_face_vertices_total();
        self.face_edge_indices.clear();
        self.face_edge_indices.resize(total_corners, INDEX_INVALID);

        // Euler-based guess to keep edge storage from reallocating.
        let edge_estimate = vcount * 2;
        self.edge_vert_indices.reserve(edge_estimate * 2);
        self.edge_face_indices.reserve(edge_estimate * AVG_EDGE_FACES);
        self.edge_face_counts_and_offsets.reserve(edge_estimate);

        // Split the level into its relation arrays so the three builders can
        // borrow their storage while face loops are read alongside.
        let Level {
            face_vert_counts_and_offsets,
            face_vert_indices,
            face_edge_indices,
            edge_vert_indices,
            edge_face_counts_and_offsets,
            edge_face_indices,
            vert_face_counts_and_offsets,
            vert_face_indices,
            vert_edge_counts_and_offsets,
            vert_edge_indices,
            edge_count,
            ..
        } = self;

        let mut edge_faces =
            DynamicRelation::new(edge_face_counts_and_offsets, edge_face_indices, AVG_EDGE_FACES);
        let mut vert_faces = DynamicRelation::new(
            vert_face_counts_and_offsets,
            vert_face_indices,
            AVG_VERTEX_VALENCE,
        );
        let mut vert_edges = DynamicRelation::new(
            vert_edge_counts_and_offsets,
            vert_edge_indices,
            AVG_VERTEX_VALENCE,
        );

        for f in 0..fcount as Index {
            let loop_range = face_vert_counts_and_offsets[f as usize].range();
            let nverts = loop_range.len();

            for corner in 0..nverts {
                let v0 = face_vert_indices[loop_range.start + corner];
                let v1 = face_vert_indices[loop_range.start + (corner + 1) % nverts];

                // Look for the edge among v0's incident edges so far.
                let edge = match find_edge_among(edge_vert_indices, v0, v1, vert_edges.members_of(v0))
                {
                    Some(e) => e,
                    None => {
                        let e = *edge_count as Index;
                        *edge_count += 1;
                        edge_vert_indices.push(v0);
                        edge_vert_indices.push(v1);
                        edge_faces.append_component();
                        vert_edges.append_member(v0, e);
                        vert_edges.append_member(v1, e);
                        e
                    }
                };
                edge_faces.append_member(edge, f);
                vert_faces.append_member(v0, f);
                face_edge_indices[loop_range.start + corner] = edge;
            }
        }

        edge_faces.compress();
        vert_faces.compress();
        vert_edges.compress();

        // Size the remaining per-edge storage (tags, sharpness) now that the
        // edge count is final, and zero every tag before classification.
        let ecount = self.num_edges();
        self.resize_edges(ecount);
        self.face_tags.fill(FaceTag::default());
        self.edge_tags.fill(EdgeTag::default());
        self.vert_tags.fill(VertexTag::default());

        for e in 0..ecount as Index {
            let incident = self.edge_faces(e).len();
            let (v0, v1) = {
                let ev = self.edge_vertices(e);
                (ev[0], ev[1])
            };
            if v0 == v1 {
                return Err(MeshLevelError::DegenerateEdge { edge: e, vertex: v0 });
            }

            let non_manifold = incident < 1 || incident > 2;
            let boundary = incident == 1;
            {
                let tag = &mut self.edge_tags[e as usize];
                tag.non_manifold = non_manifold;
                tag.boundary = boundary;
            }
            // Incident vertices of a bad edge are excluded from orientation.
            if non_manifold {
                log::warn!("edge {e} is incident to {incident} faces; tagging it non-manifold");
                self.vert_tags[v0 as usize].non_manifold = true;
                self.vert_tags[v1 as usize].non_manifold = true;
            }
            if boundary {
                self.vert_tags[v0 as usize].boundary = true;
                self.vert_tags[v1 as usize].boundary = true;
            }
        }

        self.orient_incident_components();
        self.populate_local_indices();
        self.mark_extraordinary_vertices();

        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        crate::debug_invariants::DebugInvariants::debug_assert_invariants(self);

        Ok(())
    }

    /// The edge connecting `v0` and `v1`, if any. A self-loop query
    /// (`v0 == v1`) only matches an edge whose endpoints coincide.
    pub fn find_edge(&self, v0: Index, v1: Index) -> Option<Index> {
        if v0 as usize >= self.num_vertices() || v1 as usize >= self.num_vertices() {
            return None;
        }
        find_edge_among(&self.edge_vert_indices, v0, v1, self.vertex_edges(v0))
    }

    /// Cache each vertex-centric entry's position within its origin
    /// structure: the corner the vertex occupies in each incident face's
    /// loop, and the endpoint bit for each incident edge. Positions are
    /// found by scanning, since rotational order says nothing about loop
    /// position.
    pub(crate) fn populate_local_indices(&mut self) {
        let vcount = self.num_vertices();

        self.vert_face_local_indices.clear();
        self.vert_face_local_indices
            .resize(self.vert_face_indices.len(), 0);
        for v in 0..vcount as Index {
            let entries = self.vert_face_counts_and_offsets[v as usize].range();
            for i in entries {
                let f = self.vert_face_indices[i];
                let corner = self
                    .face_vertices(f)
                    .iter()
                    .position(|&fv| fv == v)
                    .expect("vert-face entry references a face containing the vertex");
                self.vert_face_local_indices[i] = corner as LocalIndex;
            }
        }

        self.vert_edge_local_indices.clear();
        self.vert_edge_local_indices
            .resize(self.vert_edge_indices.len(), 0);
        for v in 0..vcount as Index {
            let entries = self.vert_edge_counts_and_offsets[v as usize].range();
            for i in entries {
                let e = self.vert_edge_indices[i];
                let second = self.edge_vertices(e)[1] == v;
                self.vert_edge_local_indices[i] = LocalIndex::from(second);
            }
        }
    }

    /// Tag manifold vertices whose valence differs from the regular valence
    /// for their position (quad-scheme convention: 4 interior, 3 boundary).
    fn mark_extraordinary_vertices(&mut self) {
        for v in 0..self.num_vertices() {
            let tag = self.vert_tags[v];
            if tag.non_manifold {
                continue;
            }
            let valence = self.vertex_edges(v as Index).len();
            let regular = if tag.boundary {
                REGULAR_BOUNDARY_VALENCE
            } else {
                REGULAR_INTERIOR_VALENCE
            };
            self.vert_tags[v].extraordinary = valence != regular;
        }
    }
}

/// Search `v0_edges` for an edge whose endpoints are `{v0, v1}` in either
/// order. A self-loop pair (`v0 == v1`) matches only an edge whose two
/// endpoints are both `v0`.
fn find_edge_among(
    edge_vert_indices: &[Index],
    v0: Index,
    v1: Index,
    v0_edges: &[Index],
) -> Option<Index> {
    let endpoints = |e: Index| {
        let e = e as usize;
        (edge_vert_indices[e * 2], edge_vert_indices[e * 2 + 1])
    };
    if v0 != v1 {
        v0_edges.iter().copied().find(|&e| {
            let (a, b) = endpoints(e);
            a == v1 || b == v1
        })
    } else {
        v0_edges.iter().copied().find(|&e| {
            let (a, b) = endpoints(e);
            a == b
        })
    }
}

impl Level {
    /// Build and complete a level in one call: `verts_per_face[f]` corners
    /// per face, vertex loops concatenated in `face_verts`.
    pub fn from_face_vertices(
        vert_count: usize,
        verts_per_face: &[usize],
        face_verts: &[Index],
    ) -> Result<Level, MeshLevelError> {
        let expected: usize = verts_per_face.iter().sum();
        if expected != face_verts.len() {
            return Err(MeshLevelError::FaceVertexLengthMismatch {
                expected,
                found: face_verts.len(),
            });
        }
        let mut level = Level::new();
        level.resize_vertices(vert_count);
        level.resize_faces(verts_per_face.len());
        let mut offset = 0;
        for (f, &nverts) in verts_per_face.iter().enumerate() {
            level.resize_face_vertices(f as Index, nverts)?;
            level
                .face_vertices_mut(f as Index)
                .copy_from_slice(&face_verts[offset..offset + nverts]);
            offset += nverts;
        }
        level.complete_from_face_vertices()?;
        Ok(level)
    }
}
