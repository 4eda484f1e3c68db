//! Hot-path benchmarks: table interpolation, one SDE step, and a full
//! pipeline run.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use perseid_bench::{reference_pipeline, reference_proton, reference_sde, reference_table};
use perseid_core::units::EV;
use perseid_core::Module;
use perseid_modules::interpolate;

fn bench_interpolate(c: &mut Criterion) {
    let table = reference_table();
    c.bench_function("interpolate_64_rows", |b| {
        b.iter(|| {
            let x = black_box(3.7e16 * EV);
            black_box(interpolate(x, table.energies(), table.loss_rates()))
        })
    });
}

fn bench_sde_step(c: &mut Criterion) {
    let sde = reference_sde();
    c.bench_function("diffusion_sde_process", |b| {
        b.iter_with_setup(reference_proton, |mut candidate| {
            sde.process(&mut candidate).unwrap();
            black_box(candidate.current.position())
        })
    });
}

fn bench_pipeline_run(c: &mut Criterion) {
    let pipeline = reference_pipeline();
    c.bench_function("module_list_run_5_kpc", |b| {
        b.iter_with_setup(reference_proton, |mut candidate| {
            pipeline.run(&mut candidate).unwrap();
            black_box(candidate.trajectory_length())
        })
    });
}

criterion_group!(benches, bench_interpolate, bench_sde_step, bench_pipeline_run);
criterion_main!(benches);
