//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use grovsum_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, BitOrder, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, JobId, JobStatus, ValidationResult,
};
use grovsum_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit: a 24-qubit statevector takes 256 MiB.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Job data for the simulator.
struct SimJob {
    status: JobStatus,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Evolves the unitary part of a circuit once, then samples every shot
/// from the final state. Measurements must be terminal; circuits with no
/// measurements have every qubit measured.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Sampling source, shared across jobs.
    rng: Mutex<StdRng>,
    /// Maximum number of qubits supported.
    max_qubits: u32,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(BackendConfig::new("simulator"), max_qubits)
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(BackendConfig::new("simulator").with_seed(seed), DEFAULT_MAX_QUBITS)
    }

    fn build(config: BackendConfig, max_qubits: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            capabilities: Capabilities {
                name: config.name.clone(),
                ..Capabilities::simulator(max_qubits)
            },
            config,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(rng),
            max_qubits,
        }
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();

        let num_qubits = circuit.num_qubits();
        debug!("Starting simulation: {} qubits, {} shots", num_qubits, shots);

        let mut sv = Statevector::new(num_qubits);
        sv.apply_circuit(circuit);

        // (qubit, output bit) pairs; later measurements into the same bit win
        let mut measured: Vec<(usize, usize)> = circuit
            .measurements()
            .into_iter()
            .map(|(q, c)| (q.index(), c.index()))
            .collect();
        let width = if measured.is_empty() {
            measured = (0..num_qubits).map(|q| (q, q)).collect();
            num_qubits
        } else {
            circuit.num_clbits()
        };

        let outcomes = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            sv.sample_many(shots as usize, &mut *rng)
        };

        let mut tallies: FxHashMap<u64, u64> = FxHashMap::default();
        for outcome in outcomes {
            let mut value = 0u64;
            for &(q, c) in &measured {
                let bit = (outcome >> q) as u64 & 1;
                value = (value & !(1 << c)) | bit << c;
            }
            *tallies.entry(value).or_insert(0) += 1;
        }

        let mut counts = Counts::new();
        for (value, count) in tallies {
            counts.insert(BitOrder::BACKEND.key(value, width), count);
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots)
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    /// Reasons `circuit` cannot run here, empty when it can.
    fn check(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];
        if circuit.num_qubits() > self.max_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            ));
        }
        if circuit.num_clbits() > 64 {
            reasons.push(format!(
                "Circuit has {} classical bits, at most 64 are supported",
                circuit.num_clbits()
            ));
        }
        let mut measured = FxHashSet::default();
        for inst in circuit.instructions() {
            match inst.kind {
                InstructionKind::Measure => measured.extend(inst.qubits.iter().copied()),
                InstructionKind::Gate(_) => {
                    if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                        reasons.push(format!("Gate '{}' acts on {q} after it was measured", inst.name()));
                        break;
                    }
                }
            }
        }
        reasons
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let reasons = self.check(circuit);
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, expected 1..={}",
                self.capabilities.max_shots
            )));
        }
        if let Some(reason) = self.check(circuit).into_iter().next() {
            return Err(HalError::InvalidCircuit(reason));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());

        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            jobs.insert(
                job_id.0.clone(),
                SimJob {
                    status: JobStatus::Queued,
                    result: None,
                },
            );
        }

        debug!("Submitted job: {}", job_id);

        let result = self.run_simulation(circuit, shots);

        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.status.advance(JobStatus::Running);
                if sim_job.status.advance(JobStatus::Completed) {
                    sim_job.result = Some(result);
                }
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::Backend(format!(
                "Job {job_id} has no result in state {status}"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            sim_job.status.advance(JobStatus::Cancelled);
            Ok(())
        } else {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(v) => u32::try_from(v)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| HalError::Configuration(format!("max_qubits out of range: {v}")))?,
        };
        Ok(Self::build(config, max_qubits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovsum_ir::{ClbitId, QubitId};

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .mcx([QubitId(0)], QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();
        circuit
    }

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::with_seed(3);

        let job_id = backend.submit(&bell(), 1000).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_clbit_zero_is_rightmost() {
        let mut circuit = Circuit::with_size("one", 3, 3);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap()
            .measure(QubitId(2), ClbitId(2))
            .unwrap();
        let counts = SimulatorBackend::new().execute(&circuit, 10).await.unwrap();
        assert_eq!(counts.get("001"), 10);
    }

    #[tokio::test]
    async fn test_partial_measurement_keys_on_clbits() {
        let mut circuit = Circuit::with_size("partial", 3, 1);
        circuit
            .x(QubitId(2))
            .unwrap()
            .measure(QubitId(2), ClbitId(0))
            .unwrap();
        let counts = SimulatorBackend::new().execute(&circuit, 5).await.unwrap();
        assert_eq!(counts.get("1"), 5);
        assert_eq!(counts.len(), 1);
    }

    #[tokio::test]
    async fn test_unmeasured_circuit_measures_everything() {
        let mut circuit = Circuit::with_size("bare", 2, 0);
        circuit.x(QubitId(1)).unwrap();
        let counts = SimulatorBackend::new().execute(&circuit, 4).await.unwrap();
        assert_eq!(counts.get("10"), 4);
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let mut circuit = Circuit::with_size("uniform", 3, 0);
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
        }
        let a = SimulatorBackend::with_seed(42).execute(&circuit, 200).await.unwrap();
        let b = SimulatorBackend::with_seed(42).execute(&circuit, 200).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_shots(), 200);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend = SimulatorBackend::new();
        let result = backend.submit(&bell(), 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_mid_circuit_measurement_rejected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let backend = SimulatorBackend::new();
        assert!(!backend.validate(&circuit).await.unwrap().is_valid());
        assert!(matches!(
            backend.execute(&circuit, 10).await,
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(backend.cancel(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_after_completion_keeps_result() {
        let backend = SimulatorBackend::with_seed(4);
        let job_id = backend.submit(&bell(), 16).await.unwrap();

        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert_eq!(backend.result(&job_id).await.unwrap().counts.total_shots(), 16);
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local")
            .with_seed(9)
            .with_extra("max_qubits", serde_json::json!(12));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.capabilities().num_qubits, 12);

        let bad = BackendConfig::new("local").with_extra("max_qubits", serde_json::json!(0));
        assert!(SimulatorBackend::from_config(bad).is_err());
    }
}
