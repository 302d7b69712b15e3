//! # mesh-level
//!
//! mesh-level is a compact Rust library for polygonal mesh connectivity. It
//! stores the topology of one subdivision level (faces, edges, vertices and
//! every incidence relation between them) in a compressed parallel-array
//! layout, and derives the complete, validated, consistently-oriented
//! adjacency structure from nothing but the face→vertex loops.
//!
//! ## Features
//! - [`Level`](topology::level::Level): a flat container for all per-face,
//!   per-edge and per-vertex relations, tags and sharpness values
//! - Topology completion: edge discovery and population of every inverse
//!   relation from face-vertex data alone
//! - Non-manifold detection and a canonical rotational ordering of the faces
//!   and edges around each manifold vertex
//! - A diagnostic validator cross-checking every relation against its dual
//!
//! Geometry, subdivision masks and the refinement scheduler are deliberately
//! out of scope: consumers read the completed topology through slice
//! accessors per relation family and branch on the non-manifold tag before
//! relying on rotational order.
//!
//! ## Determinism
//! Construction is a single sequential pass; component indices, relation
//! ordering and the structured dump are fully deterministic for a given
//! face-vertex input.

pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshLevelError;
    pub use crate::topology::index::{CountOffset, INDEX_INVALID, Index, LocalIndex, index_is_valid};
    pub use crate::topology::level::Level;
    pub use crate::topology::tags::{
        CompositeVertexTag, EdgeTag, FaceTag, INFINITELY_SHARP, Rule, RuleSet, SMOOTH, Sharpness,
        VertexTag,
    };
    pub use crate::topology::validate::ValidationOptions;
}
