use meso_mps::{Mps, SiteId, SiteKind, TruncationOpts};
use nalgebra::DMatrix;
use num_complex::Complex64;

fn mixed_sites() -> Vec<SiteId> {
    vec![
        SiteId::global(1, SiteKind::Fermion),
        SiteId::global(2, SiteKind::Charge { max_occupancy: 1 }),
        SiteId::global(3, SiteKind::Fermion),
        SiteId::global(4, SiteKind::Fermion),
    ]
}

fn generic_amplitudes(len: usize, scale: f64) -> Vec<Complex64> {
    (0..len)
        .map(|k| {
            let x = k as f64;
            Complex64::new(scale * (0.7 * x + 0.3).sin(), scale * (0.4 * x).cos() * 0.5)
        })
        .collect()
}

fn dense_norm(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

#[test]
fn dense_round_trip_is_exact_without_truncation() {
    let sites = mixed_sites();
    let amplitudes = generic_amplitudes(2 * 3 * 2 * 2, 1.0);
    let state = Mps::from_dense(&sites, &amplitudes, &TruncationOpts::default()).expect("compress");
    assert_eq!(state.len(), 4);
    let restored = state.to_dense().expect("dense");
    for (a, b) in amplitudes.iter().zip(&restored) {
        assert!((a - b).norm() < 1e-10);
    }
}

#[test]
fn canonical_form_carries_norm_in_centre() {
    let sites = mixed_sites();
    let amplitudes = generic_amplitudes(24, 3.0);
    let expected = dense_norm(&amplitudes);
    let mut state =
        Mps::from_dense(&sites, &amplitudes, &TruncationOpts::default()).expect("compress");

    state.canonicalize(3).expect("canonicalize");
    assert_eq!(state.center(), Some(3));
    assert!((state.norm() - expected).abs() < 1e-9);

    for position in 1..3 {
        let tensor = state.tensor(position).expect("tensor");
        let r = tensor.right_dim();
        let mut gram = DMatrix::from_element(r, r, Complex64::new(0.0, 0.0));
        for block in tensor.blocks() {
            gram += block.adjoint() * block;
        }
        assert!((gram - DMatrix::identity(r, r)).norm() < 1e-10);
    }
    let last = state.tensor(4).expect("tensor");
    let l = last.left_dim();
    let mut gram = DMatrix::from_element(l, l, Complex64::new(0.0, 0.0));
    for block in last.blocks() {
        gram += block * block.adjoint();
    }
    assert!((gram - DMatrix::identity(l, l)).norm() < 1e-10);

    let before = state.to_dense().expect("dense");
    for (a, b) in amplitudes.iter().zip(&before) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn normalize_returns_previous_norm() {
    let sites = mixed_sites();
    let amplitudes = generic_amplitudes(24, 2.5);
    let expected = dense_norm(&amplitudes);
    let mut state =
        Mps::from_dense(&sites, &amplitudes, &TruncationOpts::default()).expect("compress");

    let previous = state.normalize().expect("normalize");
    assert!((previous - expected).abs() < 1e-9);
    assert_eq!(state.center(), Some(1));
    assert!((state.norm() - 1.0).abs() < 1e-12);
    assert!((state.inner(&state).expect("overlap").re - 1.0).abs() < 1e-10);
}

#[test]
fn diagonal_expectation_matches_dense_sum() {
    let sites = mixed_sites();
    let amplitudes = generic_amplitudes(24, 1.0);
    let state = Mps::from_dense(&sites, &amplitudes, &TruncationOpts::default()).expect("compress");

    let dims: Vec<usize> = sites.iter().map(SiteId::dim).collect();
    let mut weighted = 0.0;
    for (index, amplitude) in amplitudes.iter().enumerate() {
        let mut rest = index;
        let mut number = 0.0;
        for (pos, dim) in dims.iter().enumerate().rev() {
            number += sites[pos].kind.number(rest % dim);
            rest /= dim;
        }
        weighted += amplitude.norm_sqr() * number;
    }
    let expected = weighted / dense_norm(&amplitudes).powi(2);
    let got = state.particle_number().expect("number");
    assert!((got - expected).abs() < 1e-10);
}

#[test]
fn truncation_caps_bond_dimension() {
    let sites = mixed_sites();
    let amplitudes = generic_amplitudes(24, 1.0);
    let opts = TruncationOpts {
        cutoff: 1e-12,
        max_bond_dim: Some(1),
    };
    let state = Mps::from_dense(&sites, &amplitudes, &opts).expect("compress");
    assert_eq!(state.max_bond_dim(), 1);
}

#[test]
fn zero_vectors_are_rejected() {
    let sites = mixed_sites();
    let zeros = vec![Complex64::new(0.0, 0.0); 24];
    let err = Mps::from_dense(&sites, &zeros, &TruncationOpts::default()).expect_err("zero state");
    assert_eq!(err.code(), "zero-norm");
    let err = Mps::from_dense(&sites, &zeros[..5], &TruncationOpts::default()).expect_err("short");
    assert_eq!(err.code(), "amplitude-count-mismatch");
}
