use meso_basis::{uniform_chain, SegmentBasis};
use meso_core::SegmentId;

#[test]
fn three_site_chain_spectrum() {
    let basis = uniform_chain(SegmentId::LeftLead, 3, 1.0, 0.0).expect("chain");
    let expected = [-(2.0_f64.sqrt()), 0.0, 2.0_f64.sqrt()];
    for (got, want) in basis.energies().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{got} vs {want}");
    }
    assert!(basis.has_modes());
}

#[test]
fn modes_are_orthonormal() {
    let basis = uniform_chain(SegmentId::Scatterer, 6, 0.7, -0.2).expect("chain");
    for a in 1..=6 {
        for b in 1..=6 {
            let phi_a = basis.mode(a).expect("mode");
            let phi_b = basis.mode(b).expect("mode");
            let dot: f64 = phi_a.iter().zip(phi_b).map(|(x, y)| x * y).sum();
            let want = if a == b { 1.0 } else { 0.0 };
            assert!((dot - want).abs() < 1e-10);
        }
    }
}

#[test]
fn bond_overlaps_reconstruct_hopping() {
    let length = 5;
    let hopping = 1.3;
    let basis = uniform_chain(SegmentId::Scatterer, length, hopping, 0.4).expect("chain");
    let mut bond_energy = 0.0;
    for k in 1..=length {
        let overlap = basis.bond_overlap(k, k).expect("overlap").expect("modes");
        bond_energy += basis.energy(k).expect("energy") * overlap;
    }
    assert!((bond_energy + hopping * (length as f64 - 1.0)).abs() < 1e-10);
}

#[test]
fn explicit_spectra_have_no_modes() {
    let basis = SegmentBasis::new(SegmentId::RightLead, vec![-1.0, 2.0]).expect("basis");
    assert_eq!(basis.bond_overlap(1, 2).expect("overlap"), None);
    assert!(basis.energy(3).is_err());
    assert!(SegmentBasis::new(SegmentId::RightLead, vec![f64::NAN]).is_err());
    assert!(uniform_chain(SegmentId::LeftLead, 0, 1.0, 0.0).is_err());
}
