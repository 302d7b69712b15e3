//! `Level`: the topology container for one subdivision level.
//!
//! A `Level` is a fairly simple owner of topology, sharpness and tag data.
//! It is populated by an outside collaborator (a mesh descriptor or factory)
//! that declares the component counts and fills in each face's vertex loop,
//! after which [`complete_from_face_vertices`] derives everything else. Its
//! interface is therefore low-level: resize methods and slice accessors per
//! relation family, not high-level mesh editing.
//!
//! Storage is a compressed parallel-array layout throughout. Each
//! variable-arity relation is one `Vec<CountOffset>` (a descriptor per
//! component) plus one flat `Vec<Index>` of members; fixed-arity data (edge
//! endpoints, tags, sharpness) is a plain parallel array. Components are
//! never allocated individually.
//!
//! Accessors take component indices and panic if one is out of range, like
//! slice indexing; all structural mutation goes through fallible methods.
//!
//! [`complete_from_face_vertices`]: Level::complete_from_face_vertices

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshLevelError;
use crate::topology::index::{CountOffset, INDEX_INVALID, Index, LocalIndex};
use crate::topology::tags::{
    self, CompositeVertexTag, EdgeTag, FaceTag, Rule, SMOOTH, Sharpness, VertexTag,
};

/// Topology of one subdivision level in compressed-array form.
///
/// All relation, tag and sharpness storage is owned exclusively by the
/// level; relation accessors return borrowed slices into it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Level {
    pub(crate) depth: u32,
    pub(crate) face_count: usize,
    pub(crate) edge_count: usize,
    pub(crate) vert_count: usize,

    pub(crate) face_vert_counts_and_offsets: Vec<CountOffset>,
    pub(crate) face_vert_indices: Vec<Index>,
    pub(crate) face_edge_indices: Vec<Index>,
    pub(crate) face_tags: Vec<FaceTag>,

    /// Two endpoints per edge, stored inline.
    pub(crate) edge_vert_indices: Vec<Index>,
    pub(crate) edge_face_counts_and_offsets: Vec<CountOffset>,
    pub(crate) edge_face_indices: Vec<Index>,
    pub(crate) edge_sharpness: Vec<Sharpness>,
    pub(crate) edge_tags: Vec<EdgeTag>,

    pub(crate) vert_face_counts_and_offsets: Vec<CountOffset>,
    pub(crate) vert_face_indices: Vec<Index>,
    /// Parallel to `vert_face_indices`: the vertex's corner within the face.
    pub(crate) vert_face_local_indices: Vec<LocalIndex>,
    pub(crate) vert_edge_counts_and_offsets: Vec<CountOffset>,
    pub(crate) vert_edge_indices: Vec<Index>,
    /// Parallel to `vert_edge_indices`: 0 or 1 for first or second endpoint.
    pub(crate) vert_edge_local_indices: Vec<LocalIndex>,
    pub(crate) vert_sharpness: Vec<Sharpness>,
    pub(crate) vert_tags: Vec<VertexTag>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// A level at the given refinement depth (0 for the base cage).
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_count
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vert_count
    }

    #[inline]
    pub fn num_face_vertices_total(&self) -> usize {
        self.face_vert_indices.len()
    }

    #[inline]
    pub fn num_face_edges_total(&self) -> usize {
        self.face_edge_indices.len()
    }

    #[inline]
    pub fn num_edge_vertices_total(&self) -> usize {
        self.edge_vert_indices.len()
    }

    #[inline]
    pub fn num_edge_faces_total(&self) -> usize {
        self.edge_face_indices.len()
    }

    #[inline]
    pub fn num_vertex_faces_total(&self) -> usize {
        self.vert_face_indices.len()
    }

    #[inline]
    pub fn num_vertex_edges_total(&self) -> usize {
        self.vert_edge_indices.len()
    }

    /// Largest incident-edge count over all vertices.
    pub fn max_valence(&self) -> usize {
        self.vert_edge_counts_and_offsets
            .iter()
            .map(|co| co.count as usize)
            .max()
            .unwrap_or(0)
    }

    // --- sizing -----------------------------------------------------------

    /// Declare the vertex count, sizing all per-vertex storage.
    pub fn resize_vertices(&mut self, count: usize) {
        self.vert_count = count;
        self.vert_face_counts_and_offsets
            .resize(count, CountOffset::default());
        self.vert_edge_counts_and_offsets
            .resize(count, CountOffset::default());
        self.vert_sharpness.resize(count, SMOOTH);
        self.vert_tags.resize(count, VertexTag::default());
    }

    /// Declare the face count, sizing all per-face storage. Vertex loops are
    /// sized per face afterwards via [`resize_face_vertices`].
    ///
    /// [`resize_face_vertices`]: Level::resize_face_vertices
    pub fn resize_faces(&mut self, count: usize) {
        self.face_count = count;
        self.face_vert_counts_and_offsets
            .resize(count, CountOffset::default());
        self.face_tags.resize(count, FaceTag::default());
    }

    /// Declare the edge count, sizing all per-edge storage. Topology
    /// completion calls this itself once edge discovery has finished.
    pub fn resize_edges(&mut self, count: usize) {
        self.edge_count = count;
        self.edge_vert_indices.resize(count * 2, INDEX_INVALID);
        self.edge_face_counts_and_offsets
            .resize(count, CountOffset::default());
        self.edge_sharpness.resize(count, SMOOTH);
        self.edge_tags.resize(count, EdgeTag::default());
    }

    /// Declare the corner count of `face` and allocate its vertex-loop slots
    /// (initially unassigned). Faces must be sized in ascending index order
    /// so that loop offsets accumulate contiguously.
    pub fn resize_face_vertices(
        &mut self,
        face: Index,
        num_verts: usize,
    ) -> Result<(), MeshLevelError> {
        let f = face as usize;
        if f >= self.face_count {
            return Err(MeshLevelError::ComponentOutOfRange {
                component: "face",
                index: face,
                count: self.face_count,
            });
        }
        let offset = if f == 0 {
            0
        } else {
            let prev = self.face_vert_counts_and_offsets[f - 1];
            // A face never has zero corners, so an unsized predecessor means
            // the caller skipped ahead.
            if prev.count == 0 {
                return Err(MeshLevelError::FaceSizedOutOfOrder {
                    face,
                    missing: face - 1,
                });
            }
            prev.end()
        };
        self.face_vert_counts_and_offsets[f] =
            CountOffset::new(num_verts as Index, offset as Index);
        let end = offset + num_verts;
        if self.face_vert_indices.len() < end {
            self.face_vert_indices.resize(end, INDEX_INVALID);
        }
        Ok(())
    }

    // --- face relations ---------------------------------------------------

    /// The ordered vertex loop of `face`.
    #[inline]
    pub fn face_vertices(&self, face: Index) -> &[Index] {
        &self.face_vert_indices[self.face_vert_counts_and_offsets[face as usize].range()]
    }

    /// Mutable vertex loop of `face`, for initial population.
    #[inline]
    pub fn face_vertices_mut(&mut self, face: Index) -> &mut [Index] {
        &mut self.face_vert_indices[self.face_vert_counts_and_offsets[face as usize].range()]
    }

    /// The ordered edge loop of `face`; edge `i` connects loop vertices `i`
    /// and `i + 1` (mod N). Populated by completion.
    #[inline]
    pub fn face_edges(&self, face: Index) -> &[Index] {
        // The edge loop parallels the vertex loop, so it shares descriptors.
        &self.face_edge_indices[self.face_vert_counts_and_offsets[face as usize].range()]
    }

    #[inline]
    pub fn face_tag(&self, face: Index) -> FaceTag {
        self.face_tags[face as usize]
    }

    pub fn set_face_hole(&mut self, face: Index, hole: bool) {
        self.face_tags[face as usize].hole = hole;
    }

    /// Field-wise union of the vertex tags at each of the given corners.
    pub fn composite_vertex_tag(&self, verts: &[Index]) -> CompositeVertexTag {
        let mut composite = CompositeVertexTag::default();
        for &v in verts {
            composite.absorb(&self.vert_tags[v as usize]);
        }
        composite
    }

    // --- edge relations ---------------------------------------------------

    /// The two endpoints of `edge`.
    #[inline]
    pub fn edge_vertices(&self, edge: Index) -> &[Index] {
        let e = edge as usize;
        &self.edge_vert_indices[e * 2..e * 2 + 2]
    }

    /// The faces incident to `edge`: 1 for a boundary edge, 2 interior,
    /// anything else non-manifold.
    #[inline]
    pub fn edge_faces(&self, edge: Index) -> &[Index] {
        &self.edge_face_indices[self.edge_face_counts_and_offsets[edge as usize].range()]
    }

    #[inline]
    pub fn edge_tag(&self, edge: Index) -> EdgeTag {
        self.edge_tags[edge as usize]
    }

    #[inline]
    pub fn edge_sharpness(&self, edge: Index) -> Sharpness {
        self.edge_sharpness[edge as usize]
    }

    /// Assign a crease sharpness to `edge`, maintaining its semi-sharp and
    /// infinitely-sharp tag bits. Negative input is clamped to smooth.
    pub fn set_edge_sharpness(&mut self, edge: Index, sharpness: Sharpness) {
        let sharpness = sharpness.max(SMOOTH);
        self.edge_sharpness[edge as usize] = sharpness;
        let tag = &mut self.edge_tags[edge as usize];
        tag.semi_sharp = tags::is_semi_sharp(sharpness);
        tag.inf_sharp = tags::is_infinitely_sharp(sharpness);
    }

    // --- vertex relations -------------------------------------------------

    /// The faces incident to `vertex`; rotationally ordered iff the vertex
    /// is manifold.
    #[inline]
    pub fn vertex_faces(&self, vertex: Index) -> &[Index] {
        &self.vert_face_indices[self.vert_face_counts_and_offsets[vertex as usize].range()]
    }

    /// For each incident face, the vertex's corner within that face's loop.
    /// Parallel to [`vertex_faces`](Level::vertex_faces).
    #[inline]
    pub fn vertex_face_local_indices(&self, vertex: Index) -> &[LocalIndex] {
        &self.vert_face_local_indices[self.vert_face_counts_and_offsets[vertex as usize].range()]
    }

    /// The edges incident to `vertex`; rotationally ordered iff the vertex
    /// is manifold.
    #[inline]
    pub fn vertex_edges(&self, vertex: Index) -> &[Index] {
        &self.vert_edge_indices[self.vert_edge_counts_and_offsets[vertex as usize].range()]
    }

    /// For each incident edge, 0 if the vertex is the edge's first endpoint
    /// and 1 if the second. Parallel to [`vertex_edges`](Level::vertex_edges).
    #[inline]
    pub fn vertex_edge_local_indices(&self, vertex: Index) -> &[LocalIndex] {
        &self.vert_edge_local_indices[self.vert_edge_counts_and_offsets[vertex as usize].range()]
    }

    #[inline]
    pub fn vertex_tag(&self, vertex: Index) -> VertexTag {
        self.vert_tags[vertex as usize]
    }

    #[inline]
    pub fn vertex_sharpness(&self, vertex: Index) -> Sharpness {
        self.vert_sharpness[vertex as usize]
    }

    /// Assign a crease sharpness to `vertex`, maintaining its semi-sharp and
    /// infinitely-sharp tag bits. Negative input is clamped to smooth.
    pub fn set_vertex_sharpness(&mut self, vertex: Index, sharpness: Sharpness) {
        let sharpness = sharpness.max(SMOOTH);
        self.vert_sharpness[vertex as usize] = sharpness;
        let tag = &mut self.vert_tags[vertex as usize];
        tag.semi_sharp = tags::is_semi_sharp(sharpness);
        tag.inf_sharp = tags::is_infinitely_sharp(sharpness);
    }

    /// Classify every vertex's subdivision rule from the sharpness assigned
    /// to it and to its incident edges: a sharp vertex is a Corner, else
    /// 0/1/2/more incident sharp edges give Smooth/Dart/Crease/Corner.
    pub fn populate_vertex_rules(&mut self) {
        for v in 0..self.vert_count {
            let sharp_edges = self
                .vertex_edges(v as Index)
                .iter()
                .filter(|&&e| tags::is_sharp(self.edge_sharpness[e as usize]))
                .count();
            self.vert_tags[v].rule = if tags::is_sharp(self.vert_sharpness[v]) {
                Rule::Corner
            } else {
                match sharp_edges {
                    0 => Rule::Smooth,
                    1 => Rule::Dart,
                    2 => Rule::Crease,
                    _ => Rule::Corner,
                }
            };
        }
    }

    // --- mutable relation access for the orientation pass -----------------

    #[inline]
    pub(crate) fn vertex_faces_mut(&mut self, vertex: Index) -> &mut [Index] {
        &mut self.vert_face_indices[self.vert_face_counts_and_offsets[vertex as usize].range()]
    }

    #[inline]
    pub(crate) fn vertex_edges_mut(&mut self, vertex: Index) -> &mut [Index] {
        &mut self.vert_edge_indices[self.vert_edge_counts_and_offsets[vertex as usize].range()]
    }

    // --- structured dump --------------------------------------------------

    /// Write a deterministic, human-readable dump of all component counts,
    /// relation sizes and contents, tags and sharpness values. This is the
    /// diagnostic hook for golden-output comparisons.
    pub fn write_dump<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        fn indices(slice: &[Index]) -> String {
            format!("{} [{}]", slice.len(), slice.iter().join(" "))
        }
        fn locals(slice: &[LocalIndex]) -> String {
            format!("{} [{}]", slice.len(), slice.iter().join(" "))
        }
        fn flag(b: bool) -> u8 {
            b as u8
        }

        writeln!(w, "Level (depth {}):", self.depth)?;
        writeln!(w, "  primary component counts:")?;
        writeln!(w, "    faces = {}", self.face_count)?;
        writeln!(w, "    edges = {}", self.edge_count)?;
        writeln!(w, "    verts = {}", self.vert_count)?;

        writeln!(w, "  face relations:")?;
        writeln!(w, "    face-vert indices = {}", self.num_face_vertices_total())?;
        writeln!(w, "    face-edge indices = {}", self.num_face_edges_total())?;
        for f in 0..self.face_count as Index {
            writeln!(w, "    face {f:4} verts:  {}", indices(self.face_vertices(f)))?;
            writeln!(w, "    face {f:4} edges:  {}", indices(self.face_edges(f)))?;
            writeln!(w, "    face {f:4} tags:   hole = {}", flag(self.face_tags[f as usize].hole))?;
        }

        writeln!(w, "  edge relations:")?;
        writeln!(w, "    edge-vert indices = {}", self.num_edge_vertices_total())?;
        writeln!(w, "    edge-face indices = {}", self.num_edge_faces_total())?;
        for e in 0..self.edge_count as Index {
            writeln!(w, "    edge {e:4} verts:  {}", indices(self.edge_vertices(e)))?;
            writeln!(w, "    edge {e:4} faces:  {}", indices(self.edge_faces(e)))?;
            writeln!(
                w,
                "    edge {e:4} sharpness:  {}",
                self.edge_sharpness[e as usize]
            )?;
            let tag = self.edge_tags[e as usize];
            writeln!(
                w,
                "    edge {e:4} tags:   boundary = {}, nonManifold = {}, semiSharp = {}, infSharp = {}",
                flag(tag.boundary),
                flag(tag.non_manifold),
                flag(tag.semi_sharp),
                flag(tag.inf_sharp),
            )?;
        }

        writeln!(w, "  vert relations:")?;
        writeln!(w, "    vert-face indices = {}", self.num_vertex_faces_total())?;
        writeln!(w, "    vert-edge indices = {}", self.num_vertex_edges_total())?;
        for v in 0..self.vert_count as Index {
            writeln!(w, "    vert {v:4} faces:  {}", indices(self.vertex_faces(v)))?;
            writeln!(
                w,
                "    vert {v:4} in-face: {}",
                locals(self.vertex_face_local_indices(v))
            )?;
            writeln!(w, "    vert {v:4} edges:  {}", indices(self.vertex_edges(v)))?;
            writeln!(
                w,
                "    vert {v:4} in-edge: {}",
                locals(self.vertex_edge_local_indices(v))
            )?;
            writeln!(
                w,
                "    vert {v:4} sharpness:  {}",
                self.vert_sharpness[v as usize]
            )?;
            let tag = self.vert_tags[v as usize];
            writeln!(
                w,
                "    vert {v:4} tags:   rule = {}, boundary = {}, xordinary = {}, nonManifold = {}, semiSharp = {}, infSharp = {}",
                tag.rule,
                flag(tag.boundary),
                flag(tag.extraordinary),
                flag(tag.non_manifold),
                flag(tag.semi_sharp),
                flag(tag.inf_sharp),
            )?;
        }
        Ok(())
    }

    /// [`write_dump`](Level::write_dump) into a fresh `String`.
    pub fn dump_string(&self) -> String {
        let mut out = String::new();
        self.write_dump(&mut out)
            .expect("writing to a String cannot fail");
        out
    }
}
