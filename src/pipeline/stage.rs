//! Stage capability and outcome types

/// Result of running one stage's predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The payload satisfied the predicate; evaluation continues
    Pass,
    /// The payload failed the predicate; evaluation stops here
    Reject(String),
}

/// A single check over a command's payload.
///
/// Stages must not keep state between calls: a chain is shared by every
/// command it validates, possibly from several threads at once.
pub trait ValidationStage: Send + Sync {
    /// Short identifier used in logs and metrics
    fn name(&self) -> &'static str;

    fn validate(&self, payload: &str) -> StageOutcome;
}

/// Why a chain refused a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Name of the first stage that failed
    pub stage: &'static str,
    pub reason: String,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}
