//! Job identifiers and the status lifecycle.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           │
//!                  │           ├──→ Failed(reason)
//!                  │           │
//!                  └───────────┴──→ Cancelled
//! ```
//!
//! `result()` is only valid once the status is `Completed`.

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a submitted circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Wrap a backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepted, not started.
    Queued,
    /// Executing.
    Running,
    /// Finished; the histogram is available.
    Completed,
    /// Finished without a histogram.
    Failed(String),
    /// Stopped by `cancel()`.
    Cancelled,
}

impl JobStatus {
    /// Completed, failed or cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Move to `next` unless the job already finished or `next` would go
    /// back to the queue. Returns whether the status changed.
    pub fn advance(&mut self, next: JobStatus) -> bool {
        let allowed = match (&*self, &next) {
            (current, _) if current.is_terminal() => false,
            (_, JobStatus::Queued) => false,
            (JobStatus::Running, JobStatus::Running) => false,
            _ => true,
        };
        if allowed {
            *self = next;
        }
        allowed
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_advance_follows_lifecycle() {
        let mut status = JobStatus::Queued;
        assert!(status.advance(JobStatus::Running));
        assert!(!status.advance(JobStatus::Queued));
        assert!(status.advance(JobStatus::Completed));
        assert_eq!(status, JobStatus::Completed);
    }

    #[test]
    fn test_terminal_states_are_permanent() {
        let mut status = JobStatus::Completed;
        assert!(!status.advance(JobStatus::Cancelled));
        assert_eq!(status, JobStatus::Completed);

        let mut status = JobStatus::Queued;
        assert!(status.advance(JobStatus::Cancelled));
        assert!(!status.advance(JobStatus::Running));
        assert_eq!(status, JobStatus::Cancelled);
    }

    #[test]
    fn test_job_id_display() {
        assert_eq!(JobId::new("sim-7").to_string(), "sim-7");
    }
}
