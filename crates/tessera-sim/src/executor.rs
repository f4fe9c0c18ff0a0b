//! Seeded shot execution.

use std::time::Instant;

use num_complex::Complex64;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use tessera_ir::Circuit;

use crate::config::SimulatorConfig;
use crate::error::{SimError, SimResult};
use crate::program::{Op, Program};
use crate::result::{Counts, SimulationResult, Snapshots};
use crate::rng::shot_rng;
use crate::statevector::Statevector;

/// Runs circuits on a fresh statevector per shot.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: SimulatorConfig,
}

impl Executor {
    /// Create an executor with the given configuration.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Execute `circuit` for `shots` shots.
    ///
    /// The same `(circuit, shots, seed)` always yields the same counts and
    /// snapshots, whether shots run sequentially or in parallel.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn execute(&self, circuit: &Circuit, shots: u32, seed: u64) -> SimResult<SimulationResult> {
        let start = Instant::now();

        if shots == 0 {
            return Err(SimError::InvalidShots(shots));
        }
        self.config.validate()?;
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }

        let program = Program::compile(circuit, self.config.normalization_tolerance)?;
        let num_clbits = program.layout.num_clbits();
        debug!(
            "Starting execution: {} qubits, {} clbits, {} instructions, {} shots",
            num_qubits,
            num_clbits,
            program.ops.len(),
            shots
        );

        let split = program.deterministic_prefix();
        let (prefix, rest) = program.ops.split_at(split);
        let mut initial = ShotState::new(num_qubits, num_clbits)?;
        for op in prefix {
            initial.apply_deterministic(op);
        }
        debug!("Evolved {} deterministic instructions once", prefix.len());

        let run = |shot: u32| {
            let mut state = initial.clone();
            let mut rng = shot_rng(seed, u64::from(shot));
            for op in rest {
                state.apply(op, &mut rng);
            }
            state
        };
        let outcomes: Vec<ShotState> = if self.config.parallel_shots {
            (0..shots).into_par_iter().map(run).collect()
        } else {
            (0..shots).map(run).collect()
        };

        let mut counts = Counts::new();
        let mut snapshots = Snapshots::new();
        for outcome in outcomes {
            if num_clbits > 0 {
                counts.insert(outcome.bitstring(), 1);
            }
            for (label, state) in outcome.snapshots {
                snapshots.entry(label).or_default().push(state);
            }
        }

        let elapsed = start.elapsed();
        debug!("Execution completed in {:?}", elapsed);

        Ok(SimulationResult::new(
            counts,
            snapshots,
            shots,
            seed,
            elapsed.as_millis() as u64,
        ))
    }
}

/// Execute with the default configuration.
pub fn execute(circuit: &Circuit, shots: u32, seed: u64) -> SimResult<SimulationResult> {
    Executor::default().execute(circuit, shots, seed)
}

/// Everything one shot owns.
#[derive(Debug, Clone)]
struct ShotState {
    sv: Statevector,
    clbits: Vec<bool>,
    snapshots: Vec<(String, Vec<Complex64>)>,
}

impl ShotState {
    fn new(num_qubits: usize, num_clbits: usize) -> SimResult<Self> {
        Ok(Self {
            sv: Statevector::new(num_qubits)?,
            clbits: vec![false; num_clbits],
            snapshots: Vec::new(),
        })
    }

    /// Apply an operation that consumes no randomness.
    ///
    /// Returns `false` for measure and reset, leaving the state untouched.
    fn apply_deterministic(&mut self, op: &Op) -> bool {
        match op {
            Op::Unitary { matrix, targets } => self.sv.apply_unitary(matrix, targets),
            Op::Initialize {
                targets,
                amplitudes,
            } => self.sv.initialize(targets, amplitudes),
            Op::Snapshot { label } => {
                trace!(label = label.as_str(), "snapshot");
                self.snapshots
                    .push((label.clone(), self.sv.amplitudes().to_vec()));
            }
            Op::Barrier => {}
            Op::Measure { .. } | Op::Reset { .. } => return false,
        }
        true
    }

    fn apply<R: Rng>(&mut self, op: &Op, rng: &mut R) {
        if self.apply_deterministic(op) {
            return;
        }
        match op {
            Op::Measure { pairs } => {
                for &(qubit, clbit) in pairs {
                    self.clbits[clbit] = self.sv.measure(qubit, rng.r#gen());
                }
            }
            Op::Reset { targets } => {
                for &qubit in targets {
                    self.sv.reset(qubit, rng.r#gen());
                }
            }
            _ => {}
        }
    }

    /// Classical bits, highest index first.
    fn bitstring(&self) -> String {
        self.clbits
            .iter()
            .rev()
            .map(|&b| if b { '1' } else { '0' })
            .collect()
    }
}
