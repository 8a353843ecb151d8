//! Backend capability introspection.

use serde::{Deserialize, Serialize};

/// What a backend can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags such as `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec!["statevector".into(), "controlled_composites".into()],
        }
    }

    /// Whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(24);
        assert_eq!(caps.num_qubits, 24);
        assert!(caps.is_simulator);
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("photonic"));
    }
}
