//! Per-component status tags and sharpness.
//!
//! Tags are small structs of named flags stored one per component, zeroed by
//! topology completion and then populated as properties are discovered.
//! Combining tags (e.g. over the corners of a face) is an explicit field-wise
//! OR, see [`CompositeVertexTag`], so the semantics survive any future
//! reordering of the fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Crease sharpness assigned to an edge or vertex.
pub type Sharpness = f32;

/// Sharpness of an ordinary smooth component.
pub const SMOOTH: Sharpness = 0.0;

/// Sharpness at or above this value never decays under refinement.
pub const INFINITELY_SHARP: Sharpness = 10.0;

/// Returns true iff `sharpness` marks a crease at all.
#[inline]
pub fn is_sharp(sharpness: Sharpness) -> bool {
    sharpness > SMOOTH
}

/// Returns true iff `sharpness` decays under refinement.
#[inline]
pub fn is_semi_sharp(sharpness: Sharpness) -> bool {
    sharpness > SMOOTH && sharpness < INFINITELY_SHARP
}

/// Returns true iff `sharpness` is permanent.
#[inline]
pub fn is_infinitely_sharp(sharpness: Sharpness) -> bool {
    sharpness >= INFINITELY_SHARP
}

/// Subdivision rule classification for a vertex.
///
/// Discriminants are distinct bits so that a set of rules can be unioned
/// into a [`RuleSet`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rule {
    #[default]
    Unknown = 0,
    Smooth = 1 << 0,
    Dart = 1 << 1,
    Crease = 1 << 2,
    Corner = 1 << 3,
}

impl Rule {
    pub const fn label(self) -> &'static str {
        match self {
            Rule::Unknown => "<uninitialized>",
            Rule::Smooth => "Smooth",
            Rule::Dart => "Dart",
            Rule::Crease => "Crease",
            Rule::Corner => "Corner",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Union of the rules seen across a set of vertices.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet(u8);

impl RuleSet {
    #[inline]
    pub fn insert(&mut self, rule: Rule) {
        self.0 |= rule as u8;
    }

    /// Whether `rule` is in the set. `Rule::Unknown` carries no bit and is
    /// never contained.
    #[inline]
    pub fn contains(self, rule: Rule) -> bool {
        let bit = rule as u8;
        bit != 0 && self.0 & bit == bit
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Per-face tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTag {
    /// Face is a hole: present in the topology but not to be subdivided.
    pub hole: bool,
}

/// Per-edge tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTag {
    /// Incident face count is not 1 or 2.
    pub non_manifold: bool,
    /// Exactly one incident face.
    pub boundary: bool,
    /// Sharpness decays under refinement.
    pub semi_sharp: bool,
    /// Sharpness is permanent.
    pub inf_sharp: bool,
}

/// Per-vertex tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexTag {
    /// Incident to a non-manifold edge, or incident faces/edges admit no
    /// single rotational ordering.
    pub non_manifold: bool,
    /// Incident to a boundary edge.
    pub boundary: bool,
    /// Valence differs from the regular valence for its position.
    pub extraordinary: bool,
    /// Sharpness decays under refinement.
    pub semi_sharp: bool,
    /// Sharpness is permanent.
    pub inf_sharp: bool,
    /// Subdivision rule, once sharpness is assigned.
    pub rule: Rule,
}

/// Field-wise union of vertex tags, as collected over the corners of a face.
///
/// A flag is set iff it is set for any contributing vertex; the rules of all
/// contributing vertices are gathered into `rules`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeVertexTag {
    pub non_manifold: bool,
    pub boundary: bool,
    pub extraordinary: bool,
    pub semi_sharp: bool,
    pub inf_sharp: bool,
    pub rules: RuleSet,
}

impl CompositeVertexTag {
    /// OR `tag` into the composite.
    pub fn absorb(&mut self, tag: &VertexTag) {
        self.non_manifold |= tag.non_manifold;
        self.boundary |= tag.boundary;
        self.extraordinary |= tag.extraordinary;
        self.semi_sharp |= tag.semi_sharp;
        self.inf_sharp |= tag.inf_sharp;
        self.rules.insert(tag.rule);
    }
}
