//! Grovsum Local Statevector Simulator
//!
//! A local [`Backend`](grovsum_hal::Backend) that simulates circuits
//! exactly with a dense statevector, then samples shots from the final
//! state. Controlled and inverted composite gates are simulated directly
//! through [`Circuit::for_each_elementary`](grovsum_ir::Circuit::for_each_elementary),
//! so no decomposition into a hardware gate set is needed.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```ignore
//! use grovsum_adapter_sim::SimulatorBackend;
//! use grovsum_hal::Backend;
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let counts = backend.execute(&circuit, 1000).await?;
//! println!("Most frequent: {:?}", counts.most_frequent());
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::Statevector;
