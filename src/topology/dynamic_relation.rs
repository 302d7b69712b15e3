//! Transient accumulator for incidence relations of unknown arity.
//!
//! A completed relation lives in the owning [`Level`] as one
//! [`CountOffset`] per component plus a single flat member array. While
//! topology completion discovers members, per-component cardinality is still
//! unknown, so this builder lays the flat array out with a fixed stride
//! (`members_per_comp`, chosen for the typical quad-mesh valence) and spills
//! any component that exceeds the stride into a side table keyed by
//! component id. [`compress`](DynamicRelation::compress) then produces the
//! final tightly packed layout with true prefix-sum offsets.
//!
//! The builder only borrows the level's storage; nothing of it survives past
//! completion.
//!
//! [`Level`]: crate::topology::level::Level

use hashbrown::HashMap;

use crate::topology::index::{CountOffset, INDEX_INVALID, Index};

pub(crate) struct DynamicRelation<'a> {
    comp_count: usize,
    members_per_comp: usize,
    counts_and_offsets: &'a mut Vec<CountOffset>,
    members: &'a mut Vec<Index>,
    /// Members of components whose count exceeded the inline stride.
    overflow: HashMap<Index, Vec<Index>>,
}

impl<'a> DynamicRelation<'a> {
    /// Takes over `counts_and_offsets` (one entry per existing component) and
    /// `members`, resetting counts to zero and offsets to the fixed stride.
    pub fn new(
        counts_and_offsets: &'a mut Vec<CountOffset>,
        members: &'a mut Vec<Index>,
        members_per_comp: usize,
    ) -> Self {
        let comp_count = counts_and_offsets.len();
        for (i, co) in counts_and_offsets.iter_mut().enumerate() {
            *co = CountOffset::new(0, (i * members_per_comp) as Index);
        }
        members.clear();
        members.resize(comp_count * members_per_comp, INDEX_INVALID);
        Self {
            comp_count,
            members_per_comp,
            counts_and_offsets,
            members,
            overflow: HashMap::new(),
        }
    }

    /// The members recorded so far for component `comp`.
    pub fn members_of(&self, comp: Index) -> &[Index] {
        let co = self.counts_and_offsets[comp as usize];
        if co.count as usize > self.members_per_comp {
            &self.overflow[&comp]
        } else {
            &self.members[co.range()]
        }
    }

    /// Record one more member for component `comp`. Amortized O(1); the
    /// first append past the stride migrates the inline slots to the side
    /// table once.
    pub fn append_member(&mut self, comp: Index, member: Index) {
        let co = self.counts_and_offsets[comp as usize];
        let count = co.count as usize;
        let offset = co.offset as usize;

        if count < self.members_per_comp {
            self.members[offset + count] = member;
        } else if count > self.members_per_comp {
            self.overflow
                .get_mut(&comp)
                .expect("overflowed component has a side table")
                .push(member);
        } else {
            let mut spilled = Vec::with_capacity(self.members_per_comp + 1);
            spilled.extend_from_slice(&self.members[offset..offset + self.members_per_comp]);
            spilled.push(member);
            self.overflow.insert(comp, spilled);
        }
        self.counts_and_offsets[comp as usize].count += 1;
    }

    /// Extend the relation with one new, empty component.
    pub fn append_component(&mut self) {
        self.counts_and_offsets.push(CountOffset::new(
            0,
            (self.comp_count * self.members_per_comp) as Index,
        ));
        self.comp_count += 1;
        self.members
            .resize(self.comp_count * self.members_per_comp, INDEX_INVALID);
    }

    /// Pack the members contiguously and rewrite all offsets as a prefix sum
    /// of the counts, leaving the level's storage in its final compressed
    /// form.
    ///
    /// When no component overflowed, every source region lies at or after
    /// its destination and a forward sweep packs in place. Otherwise the
    /// final offsets are computed first and compared against the strided
    /// source positions: if any destination would overtake a source region
    /// not yet copied out, the result is staged through one temporary buffer
    /// and swapped in.
    pub fn compress(self) {
        let stride = self.members_per_comp;

        if self.overflow.is_empty() {
            if self.comp_count == 0 {
                self.members.clear();
                return;
            }
            let mut member_count = self.counts_and_offsets[0].count as usize;
            for i in 1..self.comp_count {
                let co = self.counts_and_offsets[i];
                self.members.copy_within(co.range(), member_count);
                self.counts_and_offsets[i].offset = member_count as Index;
                member_count += co.count as usize;
            }
            self.members.truncate(member_count);
        } else {
            let mut in_place = true;
            let mut member_count = self.counts_and_offsets[0].count as usize;
            for i in 1..self.comp_count {
                self.counts_and_offsets[i].offset = member_count as Index;
                in_place &= member_count <= stride * i;
                member_count += self.counts_and_offsets[i].count as usize;
            }
            in_place &= member_count <= stride * self.comp_count;

            if in_place {
                for i in 0..self.comp_count {
                    let co = self.counts_and_offsets[i];
                    let count = co.count as usize;
                    let dst = co.offset as usize;
                    if count <= stride {
                        self.members.copy_within(i * stride..i * stride + count, dst);
                    } else {
                        self.members[dst..dst + count]
                            .copy_from_slice(&self.overflow[&(i as Index)]);
                    }
                }
                self.members.truncate(member_count);
            } else {
                let mut packed = vec![INDEX_INVALID; member_count];
                for i in 0..self.comp_count {
                    let co = self.counts_and_offsets[i];
                    let count = co.count as usize;
                    let dst = co.offset as usize;
                    let src = if count <= stride {
                        &self.members[i * stride..i * stride + count]
                    } else {
                        &self.overflow[&(i as Index)][..]
                    };
                    packed[dst..dst + count].copy_from_slice(src);
                }
                *self.members = packed;
            }
        }
    }
}
