use meso_core::{LocalLabel, Parity, PrepError};
use meso_mps::{sub_fermions, Mps};
use meso_solve::{
    dense_parity, ExactDiagonalization, FermionOperator, GroundStateSolver, LadderOp, SolverConfig,
};
use num_complex::Complex64;

fn seed(labels: &[LocalLabel]) -> Mps {
    Mps::product_state(&sub_fermions(labels.len()), labels).expect("seed")
}

fn pairing_operator(eps1: f64, eps2: f64, amplitude: Complex64) -> FermionOperator {
    let mut op = FermionOperator::new(2);
    op.add_number(1, eps1).expect("n1");
    op.add_number(2, eps2).expect("n2");
    op.add_term(-amplitude, vec![LadderOp::Annihilate(1), LadderOp::Annihilate(2)])
        .expect("pair");
    op.add_term(-amplitude.conj(), vec![LadderOp::Create(2), LadderOp::Create(1)])
        .expect("pair partner");
    op
}

#[test]
fn pairing_sector_energies_match_closed_form() {
    let (eps1, eps2) = (-0.3, 0.5);
    let amplitude = Complex64::new(0.4, 0.2);
    let op = pairing_operator(eps1, eps2, amplitude);
    let solver = ExactDiagonalization::new();
    let config = SolverConfig::default();

    let even = solver
        .ground_state(&op, &seed(&[LocalLabel::Empty, LocalLabel::Empty]), &config)
        .expect("even");
    let total = eps1 + eps2;
    let expected_even = (total - (total * total + 4.0 * amplitude.norm_sqr()).sqrt()) / 2.0;
    assert!((even.energy - expected_even).abs() < 1e-10);
    assert!((even.state.norm() - 1.0).abs() < 1e-10);
    let dense = even.state.to_dense().expect("dense");
    assert_eq!(dense_parity(&dense), Some(Parity::Even));

    let odd = solver
        .ground_state(&op, &seed(&[LocalLabel::Occupied, LocalLabel::Empty]), &config)
        .expect("odd");
    assert!((odd.energy - eps1.min(eps2)).abs() < 1e-10);
    let number = odd.state.particle_number().expect("number");
    assert!((number - 1.0).abs() < 1e-10);
    assert_eq!(odd.state.local_label(1).expect("label"), Some(LocalLabel::Occupied));
}

#[test]
fn hopping_ground_state_in_odd_sector() {
    let (eps1, eps2, t) = (0.2, -0.1, 0.7);
    let mut op = FermionOperator::new(2);
    op.add_number(1, eps1).expect("n1");
    op.add_number(2, eps2).expect("n2");
    op.add_term(Complex64::new(-t, 0.0), vec![LadderOp::Create(1), LadderOp::Annihilate(2)])
        .expect("hop");
    op.add_term(Complex64::new(-t, 0.0), vec![LadderOp::Create(2), LadderOp::Annihilate(1)])
        .expect("hop back");
    let solved = ExactDiagonalization::new()
        .ground_state(
            &op,
            &seed(&[LocalLabel::Empty, LocalLabel::Occupied]),
            &SolverConfig::default(),
        )
        .expect("odd");
    let mean = (eps1 + eps2) / 2.0;
    let half = (eps1 - eps2) / 2.0;
    let expected = mean - (half * half + t * t).sqrt();
    assert!((solved.energy - expected).abs() < 1e-10);
    assert_eq!(solved.state.max_bond_dim(), 2);
}

#[test]
fn solver_rejects_invalid_problems() {
    let solver = ExactDiagonalization::new();
    let vacuum = seed(&[LocalLabel::Empty, LocalLabel::Empty]);

    let mut skew = FermionOperator::new(2);
    skew.add_term(Complex64::new(1.0, 0.0), vec![LadderOp::Create(1), LadderOp::Annihilate(2)])
        .expect("term");
    let err = solver
        .ground_state(
            &skew,
            &seed(&[LocalLabel::Occupied, LocalLabel::Empty]),
            &SolverConfig::default(),
        )
        .expect_err("non-hermitian");
    assert!(matches!(err, PrepError::InvalidInput(_)));
    assert_eq!(err.code(), "non-hermitian");

    let mut odd_term = FermionOperator::new(2);
    odd_term
        .add_term(Complex64::new(1.0, 0.0), vec![LadderOp::Create(1)])
        .expect("term");
    let err = solver
        .ground_state(&odd_term, &vacuum, &SolverConfig::default())
        .expect_err("parity breaking");
    assert_eq!(err.code(), "parity-breaking-operator");

    let config = SolverConfig {
        max_orbitals: 1,
        ..SolverConfig::default()
    };
    let err = solver
        .ground_state(&pairing_operator(0.0, 0.0, Complex64::new(0.1, 0.0)), &vacuum, &config)
        .expect_err("limit");
    assert_eq!(err.code(), "too-many-orbitals");

    let err = solver
        .ground_state(&FermionOperator::new(3), &vacuum, &SolverConfig::default())
        .expect_err("seed length");
    assert_eq!(err.code(), "seed-length-mismatch");
}

#[test]
fn solver_config_fills_defaults_from_yaml() {
    let config: SolverConfig =
        serde_yaml::from_str("residual_tolerance: 0.000001\n").expect("yaml");
    assert_eq!(config.max_orbitals, 14);
    assert_eq!(config.max_bond_dim, None);
    assert!((config.residual_tolerance - 1e-6).abs() < 1e-18);
    assert_eq!(config.truncation().cutoff, 1e-12);
}
