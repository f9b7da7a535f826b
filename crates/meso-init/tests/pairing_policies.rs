use meso_basis::{uniform_chain, SegmentBasis};
use meso_core::{Parity, SegmentId};
use meso_init::{pairing_coefficients, PairingParams, PairingPolicy, ScattererGroundStateProvider};
use meso_solve::{ExactDiagonalization, SolverConfig};
use num_complex::Complex64;

fn dimer() -> SegmentBasis {
    uniform_chain(SegmentId::Scatterer, 2, 1.0, 0.0).expect("dimer")
}

fn assert_pairs(actual: &[(usize, usize, f64)], expected: &[(usize, usize, f64)]) {
    assert_eq!(actual.len(), expected.len());
    for (&(a, b, c), &(ea, eb, ec)) in actual.iter().zip(expected) {
        assert_eq!((a, b), (ea, eb));
        assert!((c - ec).abs() < 1e-12, "c_{a}{b} = {c}, expected {ec}");
    }
}

#[test]
fn dimer_bond_overlaps_are_antisymmetric() {
    let basis = dimer();
    let real_space =
        pairing_coefficients(&basis, PairingPolicy::RealSpaceBond).expect("real space");
    assert_eq!(real_space.len(), 2);
    let (forward, backward) = (real_space[0], real_space[1]);
    assert_eq!((forward.0, forward.1), (1, 2));
    assert_eq!((backward.0, backward.1), (2, 1));
    assert!((forward.2.abs() - 0.5).abs() < 1e-12);
    assert!((forward.2 + backward.2).abs() < 1e-12);
    assert_pairs(
        &pairing_coefficients(&basis, PairingPolicy::NearestNeighbour).expect("nearest"),
        &real_space,
    );
}

#[test]
fn flat_spectrum_uses_uniform_coupling() {
    let basis = SegmentBasis::new(SegmentId::Scatterer, vec![-0.2, 0.1, 0.4]).expect("flat");
    assert_pairs(
        &pairing_coefficients(&basis, PairingPolicy::NearestNeighbour).expect("nearest"),
        &[(1, 2, 0.5), (2, 1, -0.5), (2, 3, 0.5), (3, 2, -0.5)],
    );
    let err = pairing_coefficients(&basis, PairingPolicy::RealSpaceBond).expect_err("no modes");
    assert_eq!(err.code(), "missing-modes");
}

#[test]
fn real_space_pairing_on_a_dimer_binds_one_pair() {
    let provider = ScattererGroundStateProvider::new(ExactDiagonalization::new());
    for policy in [PairingPolicy::RealSpaceBond, PairingPolicy::NearestNeighbour] {
        let params = PairingParams {
            mu: 0.0,
            delta: Complex64::new(0.3, 0.0),
            policy,
        };
        let sectors = provider
            .solve(&dimer(), &params, &SolverConfig::default())
            .expect("sectors");
        assert_eq!(sectors.sector(Parity::Even).parity, Parity::Even);
        assert!((sectors.even.energy + 0.3).abs() < 1e-8, "{policy:?}: {}", sectors.even.energy);
        assert!((sectors.odd.energy + 1.0).abs() < 1e-8, "{policy:?}: {}", sectors.odd.energy);
        assert!((sectors.even.particle_number - 1.0).abs() < 1e-8);
        assert!((sectors.odd.particle_number - 1.0).abs() < 1e-8);
    }
}
