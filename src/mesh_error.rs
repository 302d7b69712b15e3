//! MeshLevelError: unified error type for mesh-level public APIs.
//!
//! Every fallible operation in this library reports through this enum.
//! Completion errors are structural properties of the input mesh, never
//! transient conditions, so there is no retry machinery anywhere.

use thiserror::Error;

use crate::topology::index::Index;

/// Unified error type for mesh-level operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshLevelError {
    /// Topology completion was invoked on a container that is not in the
    /// expected "faces populated, no edges" state.
    #[error(
        "topology completion requires vertices and faces with no pre-existing edges \
         (verts = {verts}, faces = {faces}, edges = {edges})"
    )]
    CompletionPrecondition {
        verts: usize,
        faces: usize,
        edges: usize,
    },
    /// A face was declared with fewer than three corners.
    #[error("face {face} has only {corners} corners; a face needs at least 3")]
    FaceTooSmall { face: Index, corners: usize },
    /// A face's vertex loop still contains an unwritten slot.
    #[error("face {face} has an unassigned vertex at corner {corner}")]
    UnassignedFaceVertex { face: Index, corner: usize },
    /// A face's vertex loop visits the same vertex at two non-adjacent
    /// corners, which no consistent vertex-face relation can represent.
    #[error("face {face} visits vertex {vertex} again at corner {corner}; not supported")]
    RepeatedFaceVertex {
        face: Index,
        corner: usize,
        vertex: Index,
    },
    /// A face's vertex loop references a vertex outside the declared range.
    #[error(
        "face {face} corner {corner} references vertex {vertex} but only {verts} vertices exist"
    )]
    FaceVertexOutOfRange {
        face: Index,
        corner: usize,
        vertex: Index,
        verts: usize,
    },
    /// A component index is outside the declared component count.
    #[error("{component} index {index} out of range ({count} components)")]
    ComponentOutOfRange {
        component: &'static str,
        index: Index,
        count: usize,
    },
    /// Face vertex loops must be sized in ascending face order.
    #[error("face {face} sized before face {missing}; faces must be sized in index order")]
    FaceSizedOutOfOrder { face: Index, missing: Index },
    /// The flat loop array handed to the bulk constructor does not match the
    /// declared per-face counts.
    #[error("face-vertex data length mismatch: counts sum to {expected}, {found} indices given")]
    FaceVertexLengthMismatch { expected: usize, found: usize },
    /// An edge with coincident endpoints was discovered during completion.
    /// Degenerate edges are unsupported and abort construction.
    #[error("edge {edge} is degenerate (both endpoints are vertex {vertex}); not supported")]
    DegenerateEdge { edge: Index, vertex: Index },

    // --- validator diagnostics ---
    /// A relation family that completion must populate is empty.
    #[error("validation: relation {relation} is empty")]
    EmptyRelation { relation: &'static str },
    /// A compressed relation's offsets do not partition its member array.
    #[error("validation: relation {relation} is not contiguous at component {component}")]
    BrokenRelationLayout {
        relation: &'static str,
        component: Index,
    },
    /// A face-vertex entry has no matching vertex-face back-reference.
    #[error(
        "validation: face {face} corner {corner} (vertex {vertex}) has no vert-face entry"
    )]
    VertFaceMismatch {
        face: Index,
        corner: usize,
        vertex: Index,
    },
    /// A face-edge entry has no matching edge-face back-reference.
    #[error("validation: face {face} slot {slot} (edge {edge}) has no edge-face entry")]
    EdgeFaceMismatch { face: Index, slot: usize, edge: Index },
    /// An edge-vertex entry has no matching vertex-edge back-reference.
    #[error("validation: edge {edge} end {end} (vertex {vertex}) has no vert-edge entry")]
    VertEdgeMismatch { edge: Index, end: usize, vertex: Index },
    /// Count-and-continue validation finished with inconsistencies.
    #[error("validation failed with {failures} inconsistencies")]
    ValidationFailed { failures: usize },
}
