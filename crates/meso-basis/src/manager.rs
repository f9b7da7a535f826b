//! Registration of segment bases and the write-once global ordering.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::SegmentId;

use crate::orbital::{Orbital, SegmentBasis};
use crate::placement::PlacementPolicy;

fn ordering_error(code: &str, message: impl Into<String>) -> PrepError {
    PrepError::Ordering(ErrorInfo::new(code, message))
}

/// Bijection between global positions `1..=N` and `(segment, local index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOrdering {
    policy: String,
    by_position: Vec<(SegmentId, usize)>,
    by_segment: BTreeMap<SegmentId, Vec<usize>>,
}

impl GlobalOrdering {
    fn build(
        policy: &str,
        sizes: &BTreeMap<SegmentId, usize>,
        placement: Vec<(SegmentId, usize)>,
    ) -> Result<Self, PrepError> {
        let total: usize = sizes.values().sum();
        if placement.len() != total {
            return Err(PrepError::Ordering(
                ErrorInfo::new(
                    "incomplete-placement",
                    "policy must place every orbital exactly once",
                )
                .with_context("policy", policy)
                .with_context("placed", placement.len())
                .with_context("orbitals", total),
            ));
        }
        let mut by_segment: BTreeMap<SegmentId, Vec<usize>> = sizes
            .iter()
            .map(|(&segment, &len)| (segment, vec![0; len]))
            .collect();
        for (idx, &(segment, local)) in placement.iter().enumerate() {
            let slots = by_segment.get_mut(&segment).ok_or_else(|| {
                PrepError::Ordering(
                    ErrorInfo::new("unregistered-segment", "policy placed an unregistered segment")
                        .with_context("policy", policy)
                        .with_context("segment", segment),
                )
            })?;
            if local == 0 || local > slots.len() {
                return Err(PrepError::Ordering(
                    ErrorInfo::new("placement-out-of-range", "policy placed a non-existent orbital")
                        .with_context("segment", segment)
                        .with_context("local_index", local),
                ));
            }
            if slots[local - 1] != 0 {
                return Err(PrepError::Ordering(
                    ErrorInfo::new("duplicate-placement", "policy placed an orbital twice")
                        .with_context("segment", segment)
                        .with_context("local_index", local),
                ));
            }
            slots[local - 1] = idx + 1;
        }
        Ok(Self {
            policy: policy.to_string(),
            by_position: placement,
            by_segment,
        })
    }

    /// Name of the placement policy that produced the ordering.
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Total number of positions.
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    /// Returns `true` when no orbital is placed.
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Global position of the one-based `local` orbital of `segment`.
    pub fn to_global(&self, segment: SegmentId, local: usize) -> Result<usize, PrepError> {
        let slots = self.by_segment.get(&segment).ok_or_else(|| {
            PrepError::UnknownLocation(
                ErrorInfo::new("unregistered-segment", "segment is not part of the ordering")
                    .with_context("segment", segment),
            )
        })?;
        if local == 0 || local > slots.len() {
            return Err(PrepError::UnknownLocation(
                ErrorInfo::new("local-index-out-of-range", "local orbital index is not in 1..=len")
                    .with_context("segment", segment)
                    .with_context("local_index", local)
                    .with_context("len", slots.len()),
            ));
        }
        Ok(slots[local - 1])
    }

    /// Segment and one-based local index at the one-based global `position`.
    pub fn to_local(&self, position: usize) -> Result<(SegmentId, usize), PrepError> {
        if position == 0 || position > self.by_position.len() {
            return Err(PrepError::OutOfRange(
                ErrorInfo::new("position-out-of-range", "global position is not in 1..=N")
                    .with_context("position", position)
                    .with_context("len", self.by_position.len()),
            ));
        }
        Ok(self.by_position[position - 1])
    }

    /// Iterates over `(position, segment, local index)` in global order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, SegmentId, usize)> + '_ {
        self.by_position
            .iter()
            .enumerate()
            .map(|(idx, &(segment, local))| (idx + 1, segment, local))
    }

    /// Global positions of a segment's orbitals, indexed by local order.
    pub fn positions(&self, segment: SegmentId) -> Option<&[usize]> {
        self.by_segment.get(&segment).map(Vec::as_slice)
    }

    /// Contiguous position range occupied by `segment` in local order, if any.
    ///
    /// Returns `None` when the segment is absent, or when its orbitals are not
    /// placed as one increasing run.
    pub fn block(&self, segment: SegmentId) -> Option<RangeInclusive<usize>> {
        let positions = self.by_segment.get(&segment)?;
        let first = *positions.first()?;
        let contiguous = positions
            .iter()
            .enumerate()
            .all(|(idx, &pos)| pos == first + idx);
        contiguous.then(|| first..=first + positions.len() - 1)
    }

    /// Number of positions preceding the first orbital of `segment`.
    pub fn offset(&self, segment: SegmentId) -> Option<usize> {
        self.by_segment
            .get(&segment)
            .and_then(|positions| positions.iter().min())
            .map(|first| first - 1)
    }
}

/// Owns the named segment bases and the global ordering built from them.
///
/// Two-phase protocol: register segments with [`add_segment`](Self::add_segment),
/// then fix the ordering once with [`finalize_ordering`](Self::finalize_ordering).
/// Afterwards the manager only answers read-only queries.
#[derive(Debug, Clone, Default)]
pub struct PartitionedBasisManager {
    segments: BTreeMap<SegmentId, SegmentBasis>,
    ordering: Option<GlobalOrdering>,
}

impl PartitionedBasisManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a segment basis under its segment name.
    pub fn add_segment(&mut self, basis: SegmentBasis) -> Result<(), PrepError> {
        if self.ordering.is_some() {
            return Err(ordering_error(
                "ordering-frozen",
                "segments cannot be added after the ordering is finalized",
            ));
        }
        let segment = basis.segment();
        if self.segments.contains_key(&segment) {
            return Err(PrepError::DuplicateSegment(
                ErrorInfo::new("duplicate-segment", "segment already registered")
                    .with_context("segment", segment),
            ));
        }
        self.segments.insert(segment, basis);
        Ok(())
    }

    /// Applies `policy` and fixes the global ordering.
    pub fn finalize_ordering(
        &mut self,
        policy: &dyn PlacementPolicy,
    ) -> Result<&GlobalOrdering, PrepError> {
        if self.ordering.is_some() {
            return Err(ordering_error(
                "already-finalized",
                "the global ordering can only be finalized once",
            ));
        }
        if self.segments.is_empty() {
            return Err(ordering_error("no-segments", "no segments registered"));
        }
        if let Some((segment, _)) = self.segments.iter().find(|(_, basis)| basis.is_empty()) {
            return Err(PrepError::Ordering(
                ErrorInfo::new(
                    "empty-segment",
                    "every registered segment needs at least one orbital",
                )
                .with_context("segment", segment),
            ));
        }
        let sizes: BTreeMap<SegmentId, usize> = self
            .segments
            .iter()
            .map(|(&segment, basis)| (segment, basis.len()))
            .collect();
        let ordering = GlobalOrdering::build(policy.name(), &sizes, policy.place(&sizes))?;
        Ok(self.ordering.insert(ordering))
    }

    /// Returns `true` once the ordering has been fixed.
    pub fn is_finalized(&self) -> bool {
        self.ordering.is_some()
    }

    /// The fixed global ordering.
    pub fn ordering(&self) -> Result<&GlobalOrdering, PrepError> {
        self.ordering.as_ref().ok_or_else(|| {
            ordering_error(
                "not-finalized",
                "finalize_ordering must be called before index translation",
            )
        })
    }

    /// Global position of the one-based `local` orbital of `segment`.
    pub fn to_global(&self, segment: SegmentId, local: usize) -> Result<usize, PrepError> {
        self.ordering()?.to_global(segment, local)
    }

    /// Segment and local index at the one-based global `position`.
    pub fn to_local(&self, position: usize) -> Result<(SegmentId, usize), PrepError> {
        self.ordering()?.to_local(position)
    }

    /// Basis registered for `segment`.
    pub fn segment(&self, segment: SegmentId) -> Result<&SegmentBasis, PrepError> {
        self.segments.get(&segment).ok_or_else(|| {
            PrepError::UnknownLocation(
                ErrorInfo::new("unregistered-segment", "segment is not registered")
                    .with_context("segment", segment),
            )
        })
    }

    /// Iterates over registered segments.
    pub fn segments(&self) -> impl Iterator<Item = &SegmentBasis> {
        self.segments.values()
    }

    /// Total number of registered orbitals.
    pub fn num_orbitals(&self) -> usize {
        self.segments.values().map(SegmentBasis::len).sum()
    }

    /// Orbitals listed in global order.
    pub fn orbital_table(&self) -> Result<Vec<Orbital>, PrepError> {
        let ordering = self.ordering()?;
        ordering
            .iter()
            .map(|(_, segment, local)| {
                let energy = self.segment(segment)?.energy(local)?;
                Ok(Orbital {
                    segment,
                    local_index: local,
                    energy,
                })
            })
            .collect()
    }
}
