use meso_core::{LocalLabel, PrepError};
use meso_mps::{sub_fermions, Mps, SiteDomain, SiteId, SiteKind, SiteTensor, TruncationOpts};
use nalgebra::DMatrix;
use num_complex::Complex64;
use proptest::prelude::*;

fn global_fermions(count: usize) -> Vec<SiteId> {
    (1..=count)
        .map(|position| SiteId::global(position, SiteKind::Fermion))
        .collect()
}

fn bell_pair() -> Mps {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let amplitudes = [
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
        Complex64::new(h, 0.0),
        Complex64::new(0.0, 0.0),
    ];
    Mps::from_dense(&sub_fermions(2), &amplitudes, &TruncationOpts::default()).expect("bell pair")
}

#[test]
fn product_state_reports_its_labels() {
    let sites = vec![
        SiteId::global(1, SiteKind::Fermion),
        SiteId::global(2, SiteKind::Fermion),
        SiteId::global(3, SiteKind::Charge { max_occupancy: 2 }),
        SiteId::global(4, SiteKind::Fermion),
    ];
    let labels = [
        LocalLabel::Occupied,
        LocalLabel::Empty,
        LocalLabel::Charge(-1),
        LocalLabel::Occupied,
    ];
    let state = Mps::product_state(&sites, &labels).expect("product state");
    assert_eq!(state.len(), 4);
    assert_eq!(state.max_bond_dim(), 1);
    for (idx, label) in labels.iter().enumerate() {
        assert_eq!(state.local_label(idx + 1).expect("label"), Some(*label));
    }
    let number = state.particle_number().expect("number");
    assert!((number - 1.0).abs() < 1e-12);
    assert!((state.norm() - 1.0).abs() < 1e-12);
}

#[test]
fn product_state_rejects_foreign_labels() {
    let sites = global_fermions(2);
    let err = Mps::product_state(&sites, &[LocalLabel::Occupied, LocalLabel::Charge(0)])
        .expect_err("charge label on a fermion");
    assert_eq!(err.code(), "label-kind-mismatch");

    let err = Mps::product_state(&sites, &[LocalLabel::Occupied]).expect_err("short labels");
    assert_eq!(err.code(), "label-count-mismatch");

    let charge = [SiteId::global(1, SiteKind::Charge { max_occupancy: 1 })];
    let err = Mps::product_state(&charge, &[LocalLabel::Charge(2)]).expect_err("charge range");
    assert_eq!(err.code(), "charge-out-of-range");
}

#[test]
fn orthogonal_product_states_have_zero_overlap() {
    let sites = global_fermions(3);
    let a = Mps::product_state(
        &sites,
        &[LocalLabel::Occupied, LocalLabel::Empty, LocalLabel::Empty],
    )
    .expect("a");
    let b = Mps::product_state(
        &sites,
        &[LocalLabel::Empty, LocalLabel::Occupied, LocalLabel::Empty],
    )
    .expect("b");
    assert!(a.inner(&b).expect("overlap").norm() < 1e-14);
    assert!((a.inner(&a).expect("self overlap").re - 1.0).abs() < 1e-14);
}

#[test]
fn splice_grafts_entangled_block_and_keeps_outer_labels() {
    let sites = global_fermions(4);
    let labels = [
        LocalLabel::Occupied,
        LocalLabel::Empty,
        LocalLabel::Empty,
        LocalLabel::Occupied,
    ];
    let mut host = Mps::product_state(&sites, &labels).expect("host");
    host.canonicalize(1).expect("canonical");
    assert_eq!(host.center(), Some(1));

    host.splice(2, bell_pair()).expect("splice");
    assert_eq!(host.center(), None);
    assert_eq!(host.bond_dims(), vec![1, 2, 1]);
    assert_eq!(host.local_label(1).expect("label"), Some(LocalLabel::Occupied));
    assert_eq!(host.local_label(2).expect("label"), None);
    assert_eq!(host.local_label(3).expect("label"), None);
    assert_eq!(host.local_label(4).expect("label"), Some(LocalLabel::Occupied));
    for site in host.sites() {
        assert_eq!(site.domain, SiteDomain::Global);
    }
    let number = host.particle_number().expect("number");
    assert!((number - 3.0).abs() < 1e-10);
}

#[test]
fn splice_rejects_entangled_seam_without_touching_host() {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let mut amplitudes = vec![Complex64::new(0.0, 0.0); 8];
    amplitudes[2] = Complex64::new(h, 0.0);
    amplitudes[4] = Complex64::new(h, 0.0);
    let mut host = Mps::from_dense(
        &global_fermions(3),
        &amplitudes,
        &TruncationOpts::default(),
    )
    .expect("host");
    assert_eq!(host.bond_dims(), vec![2, 1]);
    let before = host.clone();

    let sub = Mps::product_state(&sub_fermions(1), &[LocalLabel::Occupied]).expect("sub");
    let err = host.splice(2, sub.clone()).expect_err("seam link of dimension two");
    assert!(matches!(err, PrepError::BoundaryDimensionMismatch(_)));
    assert_eq!(err.code(), "host-left-link");
    assert_eq!(host, before);

    host.splice(3, sub).expect("trivial seam");
    assert_eq!(host.local_label(3).expect("label"), Some(LocalLabel::Occupied));
}

#[test]
fn scatterer_state_with_open_boundary_link_is_rejected() {
    let one = Complex64::new(1.0, 0.0);
    let column = DMatrix::from_element(2, 1, one);
    let open_left = SiteTensor::new(
        SiteId::sub(1, SiteKind::Fermion),
        vec![column.clone(), column.clone()],
    )
    .expect("tensor");
    let err = Mps::new(vec![open_left]).expect_err("left link of dimension two");
    assert!(matches!(err, PrepError::BoundaryDimensionMismatch(_)));
    assert_eq!(err.code(), "open-left-link");

    let row = DMatrix::from_element(1, 2, one);
    let first = SiteTensor::new(SiteId::sub(1, SiteKind::Fermion), vec![row.clone(), row])
        .expect("first");
    let second = SiteTensor::new(SiteId::sub(2, SiteKind::Fermion), vec![column.clone(), column])
        .expect("second");
    let open_right = SiteTensor::new(
        SiteId::sub(3, SiteKind::Fermion),
        vec![
            DMatrix::from_element(1, 2, one),
            DMatrix::from_element(1, 2, one),
        ],
    )
    .expect("third");
    let err = Mps::new(vec![first, second, open_right]).expect_err("right link of dimension two");
    assert!(matches!(err, PrepError::BoundaryDimensionMismatch(_)));
    assert_eq!(err.code(), "open-right-link");
}

#[test]
fn splice_checks_region_and_local_space() {
    let mut host = Mps::product_state(&global_fermions(2), &[LocalLabel::Empty, LocalLabel::Empty])
        .expect("host");
    let err = host.splice(2, bell_pair()).expect_err("overhanging region");
    assert_eq!(err.code(), "splice-out-of-range");

    let charge = Mps::product_state(
        &[SiteId::sub(1, SiteKind::Charge { max_occupancy: 1 })],
        &[LocalLabel::Charge(0)],
    )
    .expect("charge");
    let err = host.splice(1, charge).expect_err("dimension mismatch");
    assert_eq!(err.code(), "site-dimension-mismatch");
}

proptest! {
    #[test]
    fn product_state_dense_form_is_a_basis_vector(
        bits in proptest::collection::vec(any::<bool>(), 1..7),
    ) {
        let sites = global_fermions(bits.len());
        let labels: Vec<LocalLabel> = bits.iter().map(|&b| LocalLabel::from_occupied(b)).collect();
        let state = Mps::product_state(&sites, &labels).expect("product state");
        let dense = state.to_dense().expect("dense");
        let index = bits.iter().fold(0usize, |acc, &b| acc * 2 + usize::from(b));
        for (k, amplitude) in dense.iter().enumerate() {
            let expected = if k == index { 1.0 } else { 0.0 };
            prop_assert!((amplitude.re - expected).abs() < 1e-14);
            prop_assert!(amplitude.im.abs() < 1e-14);
        }
    }
}
