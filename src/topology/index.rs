//! Plain integer handles for mesh components.
//!
//! Every component kind (face, edge, vertex) lives in parallel arrays and is
//! referenced by position, so the handle is a bare `u32` with one reserved
//! in-band sentinel rather than a boxed id: relation slots are allocated
//! before they are written and need an "unassigned" value. `LocalIndex`
//! addresses a position *within* one component's own loop (a corner of a
//! face, an end of an edge) and is deliberately narrow since no face has
//! 65k corners.

use serde::{Deserialize, Serialize};

/// Index of a face, edge or vertex within its level.
pub type Index = u32;

/// Position of a vertex within a face's loop, or an edge-endpoint bit.
pub type LocalIndex = u16;

/// Reserved sentinel for "no component".
pub const INDEX_INVALID: Index = Index::MAX;

/// Returns true iff `index` refers to an actual component.
#[inline]
pub const fn index_is_valid(index: Index) -> bool {
    index != INDEX_INVALID
}

/// Per-component descriptor of a compressed relation: `count` members
/// starting at `offset` in the relation's flat member array.
///
/// After compaction the offsets of consecutive components strictly partition
/// the member array; during assembly (see
/// [`DynamicRelation`](crate::topology::dynamic_relation::DynamicRelation))
/// offsets follow a fixed stride instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountOffset {
    pub count: Index,
    pub offset: Index,
}

impl CountOffset {
    #[inline]
    pub const fn new(count: Index, offset: Index) -> Self {
        Self { count, offset }
    }

    /// The member-array range this component occupies.
    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        let offset = self.offset as usize;
        offset..offset + self.count as usize
    }

    /// One past the last member slot.
    #[inline]
    pub fn end(self) -> usize {
        self.offset as usize + self.count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    // The flat arrays are the dominant memory cost; keep the handles small.
    assert_eq_size!(Index, u32);
    assert_eq_size!(CountOffset, u64);

    #[test]
    fn sentinel_is_invalid() {
        assert!(!index_is_valid(INDEX_INVALID));
        assert!(index_is_valid(0));
        assert!(index_is_valid(INDEX_INVALID - 1));
    }

    #[test]
    fn count_offset_range() {
        let co = CountOffset::new(3, 10);
        assert_eq!(co.range(), 10..13);
        assert_eq!(co.end(), 13);
        assert_eq!(CountOffset::default().range(), 0..0);
    }
}
