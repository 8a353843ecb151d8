//! Grovsum Subset-Sum Search
//!
//! Grover search for subsets of a list of integers that add up to a target,
//! with the number of Grover iterations chosen by quantum counting instead
//! of being guessed.
//!
//! # Building blocks
//!
//! Every builder returns a plain [`Circuit`](grovsum_ir::Circuit) and a
//! gate wrapper, assembled bottom-up:
//!
//! | Module | Builds |
//! |--------|--------|
//! | [`fourier`] | QFT and its inverse |
//! | [`adder`] | constant addition in Fourier space, controlled running sum |
//! | [`oracle`] | checker, validator and the phase-kickback oracle |
//! | [`diffuser`] | reflection about the uniform superposition |
//! | [`grover`] | oracle followed by diffuser, plain and controlled |
//! | [`counter`] | phase estimation of the Grover iterate |
//! | [`search`] | the measured search circuit and the orchestrator |
//!
//! # Example
//!
//! ```ignore
//! use grovsum_adapter_sim::SimulatorBackend;
//! use grovsum_search::{SearchOutcome, SearchParams, SubsetSearch, SubsetSumProblem};
//!
//! let problem = SubsetSumProblem::new(vec![5, 7, 8, 9, 1], 16, 5)?;
//! let params = SearchParams::with_default_counter(problem, 100, 100)?;
//! let search = SubsetSearch::new(SimulatorBackend::with_seed(7));
//!
//! match search.find_indices(&params).await? {
//!     SearchOutcome::NoSolution => println!("no subset sums to 16"),
//!     SearchOutcome::Found(report) => {
//!         for (key, count) in report.histogram.sorted() {
//!             println!("{key}: {count}");
//!         }
//!     }
//! }
//! ```

pub mod adder;
pub mod counter;
pub mod diffuser;
pub mod error;
pub mod fourier;
pub mod grover;
pub mod layout;
pub mod oracle;
pub mod problem;
pub mod search;

pub use counter::{
    CounterEstimate, calculate_counter_result, counter_circuit, counter_gate, counting_circuit,
    interpret_counter_counts,
};
pub use error::{SearchError, SearchResult};
pub use fourier::fourier_position;
pub use layout::SearchLayout;
pub use problem::{SearchParams, SubsetSumProblem, default_counter_digits};
pub use search::{
    IndexHistogram, SearchOutcome, SearchReport, SubsetSearch, find_indices, search_circuit,
};
