use std::collections::BTreeMap;

use meso_basis::{PartitionedBasisManager, PlacementPolicy, ScattererCentered, SegmentBasis};
use meso_core::{PrepError, SegmentId};

struct DropsLastOrbital;

impl PlacementPolicy for DropsLastOrbital {
    fn name(&self) -> &str {
        "drops-last"
    }

    fn place(&self, sizes: &BTreeMap<SegmentId, usize>) -> Vec<(SegmentId, usize)> {
        let mut order: Vec<_> = sizes
            .iter()
            .flat_map(|(&segment, &len)| (1..=len).map(move |k| (segment, k)))
            .collect();
        order.pop();
        order
    }
}

struct RepeatsFirstOrbital;

impl PlacementPolicy for RepeatsFirstOrbital {
    fn name(&self) -> &str {
        "repeats-first"
    }

    fn place(&self, sizes: &BTreeMap<SegmentId, usize>) -> Vec<(SegmentId, usize)> {
        let mut order: Vec<_> = sizes
            .iter()
            .flat_map(|(&segment, &len)| (1..=len).map(move |k| (segment, k)))
            .collect();
        let first = order[0];
        if let Some(last) = order.last_mut() {
            *last = first;
        }
        order
    }
}

fn basis(segment: SegmentId, energies: &[f64]) -> SegmentBasis {
    SegmentBasis::new(segment, energies.to_vec()).expect("basis")
}

#[test]
fn duplicate_segment_is_rejected() {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(basis(SegmentId::LeftLead, &[-1.0, 1.0]))
        .expect("first");
    let err = manager
        .add_segment(basis(SegmentId::LeftLead, &[0.0]))
        .expect_err("duplicate");
    assert!(matches!(err, PrepError::DuplicateSegment(_)));
}

#[test]
fn translation_requires_finalized_ordering() {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(basis(SegmentId::Scatterer, &[0.5]))
        .expect("add");
    let err = manager.to_global(SegmentId::Scatterer, 1).expect_err("not final");
    assert!(matches!(err, PrepError::Ordering(_)));
    assert_eq!(err.code(), "not-finalized");
}

#[test]
fn empty_segment_fails_ordering() {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(basis(SegmentId::Scatterer, &[]))
        .expect("add");
    let err = manager
        .finalize_ordering(&ScattererCentered::default())
        .expect_err("empty");
    assert_eq!(err.code(), "empty-segment");
}

#[test]
fn incomplete_or_repeated_placement_fails() {
    for policy in [
        Box::new(DropsLastOrbital) as Box<dyn PlacementPolicy>,
        Box::new(RepeatsFirstOrbital),
    ] {
        let mut manager = PartitionedBasisManager::new();
        manager
            .add_segment(basis(SegmentId::LeftLead, &[-1.0, 0.0]))
            .expect("add");
        manager
            .add_segment(basis(SegmentId::RightLead, &[-1.0, 0.0]))
            .expect("add");
        let err = manager.finalize_ordering(policy.as_ref()).expect_err("bad policy");
        assert!(matches!(err, PrepError::Ordering(_)));
        assert!(!manager.is_finalized());
    }
}

#[test]
fn ordering_is_write_once() {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(basis(SegmentId::Scatterer, &[0.0, 1.0]))
        .expect("add");
    manager
        .finalize_ordering(&ScattererCentered::default())
        .expect("finalize");
    let again = manager
        .finalize_ordering(&ScattererCentered::default())
        .expect_err("second finalize");
    assert_eq!(again.code(), "already-finalized");
    let late = manager
        .add_segment(SegmentBasis::capacitance())
        .expect_err("late add");
    assert_eq!(late.code(), "ordering-frozen");
}

#[test]
fn unknown_locations_are_reported() {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(basis(SegmentId::Scatterer, &[0.0, 1.0]))
        .expect("add");
    manager
        .finalize_ordering(&ScattererCentered::default())
        .expect("finalize");
    let missing = manager
        .to_global(SegmentId::LeftLead, 1)
        .expect_err("unregistered");
    assert!(matches!(missing, PrepError::UnknownLocation(_)));
    let beyond = manager
        .to_global(SegmentId::Scatterer, 3)
        .expect_err("beyond");
    assert!(matches!(beyond, PrepError::UnknownLocation(_)));
    let zero = manager.to_local(0).expect_err("zero");
    assert!(matches!(zero, PrepError::OutOfRange(_)));
}
