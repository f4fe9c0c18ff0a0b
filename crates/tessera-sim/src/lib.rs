//! Tessera Statevector Executor
//!
//! Runs a [`tessera_ir::Circuit`] for a number of shots and aggregates the
//! classical outcomes and any recorded state-vector snapshots. Every shot
//! starts from |0…0⟩ and draws from its own random stream derived from the
//! execution seed, so results are reproducible.
//!
//! # Features
//!
//! - **Exact evolution**: full statevector, generic k-qubit gate kernel
//! - **Born-rule sampling**: mid-circuit measurement and reset collapse the state
//! - **Snapshots**: `Snapshot` instructions record the full amplitude vector
//! - **Parallel shots**: optional, via rayon, with identical results
//!
//! # Performance
//!
//! | Qubits | Memory per shot |
//! |--------|-----------------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//!
//! # Example
//!
//! ```rust
//! use tessera_ir::{Circuit, Register};
//! use tessera_sim::execute;
//!
//! let q = Register::quantum("q", 2)?;
//! let c = Register::classical("c", 2)?;
//! let mut circuit = Circuit::with_registers("bell", [q.clone(), c.clone()])?;
//! circuit.h(q.qubit(0)?)?.cx(q.qubit(0)?, q.qubit(1)?)?;
//! circuit.measure_register(&q, &c)?;
//!
//! let result = execute(&circuit, 1000, 42)?;
//! assert_eq!(result.counts().get("00") + result.counts().get("11"), 1000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod fidelity;
pub mod program;
pub mod result;
pub mod rng;
pub mod statevector;

pub use config::{ConfigError, SimulatorConfig};
pub use error::{SimError, SimResult};
pub use executor::{Executor, execute};
pub use fidelity::state_fidelity;
pub use result::{Counts, SimulationResult, Snapshots};
pub use statevector::Statevector;
