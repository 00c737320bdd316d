//! Benchmarks for circuit construction and dependency analysis
//!
//! Run with: cargo bench -p qlens-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qlens_ir::{Circuit, CircuitBuilder, DependencyGraph};

/// Layered brickwork circuit: H on every qubit, then CX on alternating pairs.
fn brickwork(num_qubits: u32, layers: u32) -> Circuit {
    let mut builder = CircuitBuilder::new("brickwork", num_qubits);
    for layer in 0..layers {
        for q in 0..num_qubits {
            builder.h(q);
        }
        let offset = layer % 2;
        let mut q = offset;
        while q + 1 < num_qubits {
            builder.cx(q, q + 1);
            q += 2;
        }
    }
    builder.build().unwrap()
}

fn bench_circuit_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_construction");

    for num_qubits in &[5u32, 20, 50] {
        group.bench_with_input(
            BenchmarkId::new("brickwork_20_layers", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| brickwork(black_box(n), black_box(20)));
            },
        );
    }

    group.finish();
}

fn bench_dependency_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_graph");

    for num_qubits in &[5u32, 20, 50] {
        let circuit = brickwork(*num_qubits, 50);
        group.bench_with_input(
            BenchmarkId::new("build", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| DependencyGraph::build(black_box(circuit)));
            },
        );

        let dag = DependencyGraph::build(&circuit);
        group.bench_with_input(BenchmarkId::new("depth", num_qubits), &dag, |b, dag| {
            b.iter(|| black_box(dag).depth());
        });
    }

    group.bench_function("qft_20_critical_path", |b| {
        let dag = DependencyGraph::build(&Circuit::qft(20).unwrap());
        b.iter(|| black_box(&dag).critical_path());
    });

    group.finish();
}

criterion_group!(benches, bench_circuit_construction, bench_dependency_graph);
criterion_main!(benches);
