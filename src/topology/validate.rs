//! Diagnostic validation of a completed level.
//!
//! The validator cross-checks every relation against its dual: each
//! face-vertex entry must have a vertex-face back-reference at the cached
//! corner, each face-edge entry an edge-face back-reference, and each edge
//! endpoint a vertex-edge back-reference at the cached end. It also verifies
//! that every compressed relation's offsets partition its member array.
//!
//! Validation never mutates the level and is intended for tests, debug
//! builds (via [`DebugInvariants`]) and post-mortem diagnosis of bad input.

use crate::debug_invariants::DebugInvariants;
use crate::level_debug_assert_ok;
use crate::mesh_error::MeshLevelError;
use crate::topology::index::{CountOffset, Index};
use crate::topology::level::Level;

/// Controls how [`Level::validate_topology`] reports inconsistencies.
#[derive(Copy, Clone, Debug)]
pub struct ValidationOptions {
    /// Stop at the first inconsistency and return it (the default). When
    /// false, every inconsistency is logged via `log::warn!` and the total
    /// is reported as [`MeshLevelError::ValidationFailed`].
    pub return_on_first_error: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            return_on_first_error: true,
        }
    }
}

impl Level {
    /// Cross-check every relation against its dual.
    ///
    /// A level produced by a successful completion always passes; failures
    /// indicate either storage corruption or misuse of the low-level
    /// population interface.
    pub fn validate_topology(&self, options: ValidationOptions) -> Result<(), MeshLevelError> {
        // Layout first: the symmetry sweeps index through these descriptors
        // and assume they partition their member arrays, so a broken layout
        // ends validation even in count-and-continue mode.
        if let Err(e) = self.validate_layout() {
            return if options.return_on_first_error {
                Err(e)
            } else {
                log::warn!("{e}");
                Err(MeshLevelError::ValidationFailed { failures: 1 })
            };
        }

        let mut failures = 0usize;
        let mut report = |err: MeshLevelError| -> Result<(), MeshLevelError> {
            if options.return_on_first_error {
                Err(err)
            } else {
                log::warn!("{err}");
                failures += 1;
                Ok(())
            }
        };

        for relation in self.missing_relations() {
            report(MeshLevelError::EmptyRelation { relation })?;
        }

        // face-vert against vert-face: the vertex at each corner must list
        // the face, at that corner. Member indices come from the storage
        // under diagnosis, so an out-of-range member is itself a mismatch,
        // not something to index with.
        for f in 0..self.num_faces() as Index {
            for (corner, &v) in self.face_vertices(f).iter().enumerate() {
                let found = (v as usize) < self.num_vertices()
                    && self
                        .vertex_faces(v)
                        .iter()
                        .zip(self.vertex_face_local_indices(v))
                        .any(|(&vf, &vc)| vf == f && vc as usize == corner);
                if !found {
                    report(MeshLevelError::VertFaceMismatch {
                        face: f,
                        corner,
                        vertex: v,
                    })?;
                }
            }
        }

        // face-edge against edge-face.
        for f in 0..self.num_faces() as Index {
            for (slot, &e) in self.face_edges(f).iter().enumerate() {
                if (e as usize) >= self.num_edges() || !self.edge_faces(e).contains(&f) {
                    report(MeshLevelError::EdgeFaceMismatch {
                        face: f,
                        slot,
                        edge: e,
                    })?;
                }
            }
        }

        // edge-vert against vert-edge: each endpoint must list the edge,
        // with the matching end bit.
        for e in 0..self.num_edges() as Index {
            for (end, &v) in self.edge_vertices(e).iter().enumerate() {
                let found = (v as usize) < self.num_vertices()
                    && self
                        .vertex_edges(v)
                        .iter()
                        .zip(self.vertex_edge_local_indices(v))
                        .any(|(&ve, &vend)| ve == e && vend as usize == end);
                if !found {
                    report(MeshLevelError::VertEdgeMismatch {
                        edge: e,
                        end,
                        vertex: v,
                    })?;
                }
            }
        }

        if failures > 0 {
            Err(MeshLevelError::ValidationFailed { failures })
        } else {
            Ok(())
        }
    }

    /// Check that each relation's descriptors partition its member array.
    fn validate_layout(&self) -> Result<(), MeshLevelError> {
        check_layout(
            "face-vert",
            &self.face_vert_counts_and_offsets,
            self.face_vert_indices.len(),
        )?;
        // The edge loop shares the vertex loop's descriptors.
        check_layout(
            "face-edge",
            &self.face_vert_counts_and_offsets,
            self.face_edge_indices.len(),
        )?;
        if self.edge_vert_indices.len() != self.num_edges() * 2 {
            return Err(MeshLevelError::BrokenRelationLayout {
                relation: "edge-vert",
                component: self.num_edges() as Index,
            });
        }
        check_layout(
            "edge-face",
            &self.edge_face_counts_and_offsets,
            self.edge_face_indices.len(),
        )?;
        check_layout(
            "vert-face",
            &self.vert_face_counts_and_offsets,
            self.vert_face_indices.len(),
        )?;
        check_layout(
            "vert-face-local",
            &self.vert_face_counts_and_offsets,
            self.vert_face_local_indices.len(),
        )?;
        check_layout(
            "vert-edge",
            &self.vert_edge_counts_and_offsets,
            self.vert_edge_indices.len(),
        )?;
        check_layout(
            "vert-edge-local",
            &self.vert_edge_counts_and_offsets,
            self.vert_edge_local_indices.len(),
        )?;
        Ok(())
    }

    /// Relation families that should be populated for the declared component
    /// counts but are empty.
    fn missing_relations(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.num_faces() > 0 {
            if self.face_vert_indices.is_empty() {
                missing.push("face-vert");
            }
            if self.face_edge_indices.is_empty() {
                missing.push("face-edge");
            }
        }
        if self.num_edges() > 0 {
            if self.edge_vert_indices.is_empty() {
                missing.push("edge-vert");
            }
            if self.edge_face_indices.is_empty() {
                missing.push("edge-face");
            }
        }
        // Only levels with faces are expected to have vertex relations; an
        // isolated vertex set is legitimately empty.
        if self.num_faces() > 0 && self.num_vertices() > 0 {
            if self.vert_face_indices.is_empty() {
                missing.push("vert-face");
            }
            if self.vert_edge_indices.is_empty() {
                missing.push("vert-edge");
            }
        }
        missing
    }
}

fn check_layout(
    relation: &'static str,
    counts_and_offsets: &[CountOffset],
    member_count: usize,
) -> Result<(), MeshLevelError> {
    let mut expected_offset = 0usize;
    for (i, co) in counts_and_offsets.iter().enumerate() {
        if co.offset as usize != expected_offset {
            return Err(MeshLevelError::BrokenRelationLayout {
                relation,
                component: i as Index,
            });
        }
        expected_offset += co.count as usize;
    }
    if expected_offset != member_count {
        return Err(MeshLevelError::BrokenRelationLayout {
            relation,
            component: counts_and_offsets.len() as Index,
        });
    }
    Ok(())
}

impl DebugInvariants for Level {
    fn debug_assert_invariants(&self) {
        level_debug_assert_ok!(self.validate_topology(ValidationOptions::default()), "Level");
    }

    fn validate_invariants(&self) -> Result<(), MeshLevelError> {
        self.validate_topology(ValidationOptions::default())
    }
}
