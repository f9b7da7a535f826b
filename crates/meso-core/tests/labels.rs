use meso_core::{stable_hash_string, LocalLabel, Parity, SegmentId};

#[test]
fn labels_render_like_orbital_tables() {
    assert_eq!(LocalLabel::Occupied.to_string(), "Occ");
    assert_eq!(LocalLabel::Empty.to_string(), "Emp");
    assert_eq!(LocalLabel::Charge(-2).to_string(), "-2");
    assert_eq!(LocalLabel::Charge(0).occupation(), None);
    assert_eq!(LocalLabel::from_occupied(true).occupation(), Some(1));
}

#[test]
fn negative_odd_charges_are_odd() {
    assert_eq!(Parity::of(-1), Parity::Odd);
    assert_eq!(Parity::of(-3), Parity::Odd);
    assert_eq!(Parity::of(-2), Parity::Even);
    assert_eq!(Parity::of(0), Parity::Even);
}

#[test]
fn segment_names_parse_and_print() {
    for segment in SegmentId::ALL {
        let parsed: SegmentId = segment.as_str().parse().expect("parse");
        assert_eq!(parsed, segment);
    }
    let err = "X".parse::<SegmentId>().expect_err("unknown segment");
    assert_eq!(err.code(), "unknown-segment");
    assert_eq!(
        serde_json::to_string(&SegmentId::Capacitance).expect("json"),
        "\"C\""
    );
}

#[test]
fn hashes_are_stable() {
    let first = stable_hash_string(&(SegmentId::Scatterer, 3, 0.5)).expect("hash");
    let second = stable_hash_string(&(SegmentId::Scatterer, 3, 0.5)).expect("hash");
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
}
