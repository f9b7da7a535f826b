use criterion::{criterion_group, criterion_main, Criterion};
use meso_basis::{uniform_chain, PartitionedBasisManager, ScattererCentered, SegmentBasis};
use meso_core::SegmentId;
use meso_init::{
    ChargingParams, ComposeOptions, GroundStateComposer, PairingPolicy, ScattererModel,
};
use meso_solve::ExactDiagonalization;
use num_complex::Complex64;

fn make_device(lead_length: usize, scatterer_length: usize) -> PartitionedBasisManager {
    let mut manager = PartitionedBasisManager::new();
    manager
        .add_segment(uniform_chain(SegmentId::LeftLead, lead_length, 1.0, 0.0).expect("left lead"))
        .expect("add left");
    manager
        .add_segment(
            uniform_chain(SegmentId::RightLead, lead_length, 1.0, 0.0).expect("right lead"),
        )
        .expect("add right");
    manager
        .add_segment(
            uniform_chain(SegmentId::Scatterer, scatterer_length, 0.5, 0.1).expect("scatterer"),
        )
        .expect("add scatterer");
    manager
        .add_segment(SegmentBasis::capacitance())
        .expect("add capacitance");
    manager
        .finalize_ordering(&ScattererCentered::default())
        .expect("finalize");
    manager
}

fn make_opts(policy: PairingPolicy) -> ComposeOptions {
    ComposeOptions {
        charging: ChargingParams {
            max_occupancy: 3,
            ec: 0.4,
            ng: 0.3,
        },
        model: ScattererModel::Pairing {
            delta: Complex64::new(0.25, 0.0),
            policy,
        },
        ..ComposeOptions::default()
    }
}

fn bench_compose(c: &mut Criterion) {
    let device = make_device(16, 6);
    let composer = GroundStateComposer::new(&device, ExactDiagonalization::new());
    c.bench_function("compose_nearest_neighbour", |b| {
        b.iter(|| {
            let _ = composer
                .compose(&make_opts(PairingPolicy::NearestNeighbour))
                .expect("compose");
        });
    });
    c.bench_function("compose_real_space_bond", |b| {
        b.iter(|| {
            let _ = composer
                .compose(&make_opts(PairingPolicy::RealSpaceBond))
                .expect("compose");
        });
    });
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
