//! Benchmarks for shot execution
//!
//! Run with: cargo bench -p tessera-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_ir::{Circuit, Register};
use tessera_sim::{Executor, SimulatorConfig};

fn ghz(n: u32) -> Circuit {
    let q = Register::quantum("q", n).unwrap();
    let c = Register::classical("c", n).unwrap();
    let mut circuit = Circuit::with_registers("ghz", [q.clone(), c.clone()]).unwrap();
    circuit.h(q.qubit(0).unwrap()).unwrap();
    for i in 1..n {
        circuit
            .cx(q.qubit(i - 1).unwrap(), q.qubit(i).unwrap())
            .unwrap();
    }
    circuit.measure_register(&q, &c).unwrap();
    circuit
}

fn executor(parallel_shots: bool) -> Executor {
    Executor::new(SimulatorConfig {
        parallel_shots,
        ..SimulatorConfig::default()
    })
}

/// Benchmark GHZ execution across widths.
fn bench_ghz(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_1024_shots");
    let sequential = executor(false);

    for n in &[2u32, 6, 10, 14] {
        let circuit = ghz(*n);
        group.bench_with_input(BenchmarkId::new("qubits", n), &circuit, |b, circuit| {
            b.iter(|| sequential.execute(black_box(circuit), 1024, 78).unwrap());
        });
    }

    group.finish();
}

/// Benchmark sequential against parallel shots.
fn bench_parallel_shots(c: &mut Criterion) {
    let mut group = c.benchmark_group("shot_scheduling");
    let circuit = ghz(12);

    for (name, parallel) in [("sequential", false), ("parallel", true)] {
        let exec = executor(parallel);
        group.bench_function(name, |b| {
            b.iter(|| exec.execute(black_box(&circuit), 256, 78).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ghz, bench_parallel_shots);

criterion_main!(benches);
