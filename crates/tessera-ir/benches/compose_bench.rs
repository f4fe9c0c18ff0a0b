//! Benchmarks for circuit building and composition
//!
//! Run with: cargo bench -p tessera-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_ir::{Circuit, Register};

/// A layered circuit over `width` qubits with `depth` H+CX layers.
fn layered(name: &str, width: u32, depth: u32) -> Circuit {
    let qr = Register::quantum("q", width).unwrap();
    let mut circuit = Circuit::with_registers(name, [qr.clone()]).unwrap();
    for _ in 0..depth {
        for i in 0..width {
            circuit.h(qr.qubit(i).unwrap()).unwrap();
        }
        for i in 1..width {
            circuit
                .cx(qr.qubit(i - 1).unwrap(), qr.qubit(i).unwrap())
                .unwrap();
        }
    }
    circuit
}

/// Benchmark the fluent builder, which validates every operand.
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");
    let qr = Register::quantum("q", 10).unwrap();

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::with_registers("bench", [qr.clone()]).unwrap();
        let q0 = qr.qubit(0).unwrap();
        b.iter(|| {
            circuit.h(black_box(q0.clone())).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::with_registers("bench", [qr.clone()]).unwrap();
        let (q0, q1) = (qr.qubit(0).unwrap(), qr.qubit(1).unwrap());
        b.iter(|| {
            circuit.cx(black_box(q0.clone()), black_box(q1.clone())).unwrap();
        });
    });

    group.finish();
}

/// Benchmark `combine` as the right-hand circuit grows.
fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    for depth in &[1, 10, 100] {
        let left = layered("left", 8, 10);
        let right = layered("right", 8, *depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &right, |b, right| {
            b.iter(|| left.combine(black_box(right)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the register merge plan with many disjoint registers.
fn bench_merge_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_plan");

    for count in &[4u32, 32, 256] {
        let existing: Vec<Register> = (0..*count)
            .map(|i| Register::quantum(format!("a{i}"), 2).unwrap())
            .collect();
        let incoming: Vec<Register> = (0..*count)
            .map(|i| Register::quantum(format!("b{i}"), 2).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::new("registers", count), count, |b, _| {
            b.iter(|| tessera_ir::merge_plan(black_box(&existing), black_box(&incoming)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_combine, bench_merge_plan);

criterion_main!(benches);
