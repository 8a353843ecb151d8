//! Grovsum Hardware Abstraction Layer
//!
//! This crate defines how the search core talks to whatever executes its
//! circuits. The core only ever needs one operation, "run this circuit
//! `shots` times and give me the histogram", exposed as
//! [`Backend::execute`]. Everything else is the job lifecycle a backend
//! implements to get there.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] describing qubit and shot limits
//! - [`Counts`] histograms keyed by bit-strings in [`BitOrder::BACKEND`]
//!
//! # Example: Implementing a Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use grovsum_hal::{
//!     Backend, BackendAvailability, Capabilities, ExecutionResult, HalResult, JobId,
//!     JobStatus, ValidationResult,
//! };
//! use grovsum_ir::Circuit;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!     fn capabilities(&self) -> &Capabilities { &self.capabilities }
//!     async fn availability(&self) -> HalResult<BackendAvailability> {
//!         Ok(BackendAvailability::always_available())
//!     }
//!     async fn validate(&self, _: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!     async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> { todo!() }
//!     async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> { todo!() }
//!     async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> { todo!() }
//!     async fn cancel(&self, job_id: &JobId) -> HalResult<()> { todo!() }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{JobId, JobStatus};
pub use result::{BitOrder, Counts, ExecutionResult};
