//! Per-request chain state machine
//!
//! Knows nothing about transports: the orchestrator feeds it one
//! [`AttemptOutcome`] per backend and asks it where to go next.

use crate::error::RelayError;
use crate::llm::response::CanonicalResponse;

use super::types::{FailureKind, FailureSummary};

/// Header line of the synthesized exhaustion reply
pub const EXHAUSTED_HEADER: &str = "All backends failed:";

/// Where a request stands in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Backend `i` is to be tried next
    Pending(usize),
    /// Backend `i` produced the reply
    Success(usize),
    /// No backend produced a usable reply
    Exhausted,
}

impl ChainState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

/// Result of one backend attempt
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success(CanonicalResponse),
    /// A reply that reports a failure
    SoftError(CanonicalResponse),
    HardError(RelayError),
}

/// State of one request across the chain
#[derive(Debug)]
pub struct FallbackRun {
    len: usize,
    state: ChainState,
    failures: Vec<FailureSummary>,
    /// Soft-error reply from the most recent attempt, if it was one
    last_soft: Option<CanonicalResponse>,
    reply: Option<CanonicalResponse>,
}

impl FallbackRun {
    /// Run over a chain of `len` backends. An empty chain is exhausted
    /// from the start.
    pub fn new(len: usize) -> Self {
        let state = if len == 0 {
            ChainState::Exhausted
        } else {
            ChainState::Pending(0)
        };
        Self {
            len,
            state,
            failures: Vec::new(),
            last_soft: None,
            reply: None,
        }
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Index of the backend to try next
    pub fn current(&self) -> Option<usize> {
        match self.state {
            ChainState::Pending(i) => Some(i),
            _ => None,
        }
    }

    pub fn failures(&self) -> &[FailureSummary] {
        &self.failures
    }

    /// Record the outcome for the current backend and advance.
    ///
    /// Has no effect once the run is terminal.
    pub fn record(&mut self, label: impl Into<String>, outcome: AttemptOutcome) -> ChainState {
        let Some(index) = self.current() else {
            return self.state;
        };

        let (kind, message) = match outcome {
            AttemptOutcome::Success(reply) => {
                self.reply = Some(reply);
                self.last_soft = None;
                self.state = ChainState::Success(index);
                return self.state;
            }
            AttemptOutcome::SoftError(reply) => {
                let message = soft_error_text(&reply);
                self.last_soft = Some(reply);
                (FailureKind::Soft, message)
            }
            AttemptOutcome::HardError(error) => {
                self.last_soft = None;
                (FailureKind::Hard, error.to_string())
            }
        };

        self.failures.push(FailureSummary {
            index,
            label: label.into(),
            kind,
            message,
        });
        self.state = if index + 1 < self.len {
            ChainState::Pending(index + 1)
        } else {
            ChainState::Exhausted
        };
        self.state
    }

    /// Terminal reply.
    ///
    /// On success, the winning backend's reply. On exhaustion, the last
    /// backend's soft-error reply verbatim when it produced one, otherwise
    /// an error reply listing every failure in chain order.
    pub fn into_response(self) -> CanonicalResponse {
        match (self.state, self.reply, self.last_soft) {
            (ChainState::Success(_), Some(reply), _) => reply,
            (ChainState::Exhausted, _, Some(soft)) => soft,
            _ => aggregate_error(&self.failures),
        }
    }
}

fn soft_error_text(reply: &CanonicalResponse) -> String {
    match reply.content_str().trim() {
        "" => format!("backend reported finish_reason={}", reply.finish_reason),
        text => text.to_string(),
    }
}

/// Error reply listing each failure on its own line
pub fn aggregate_error(failures: &[FailureSummary]) -> CanonicalResponse {
    let mut content = String::from(EXHAUSTED_HEADER);
    for failure in failures {
        content.push_str("\n  - ");
        content.push_str(&failure.to_string());
    }
    CanonicalResponse::error(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::response::FinishReason;

    fn hard(msg: &str) -> AttemptOutcome {
        AttemptOutcome::HardError(RelayError::http(msg))
    }

    #[test]
    fn test_primary_success() {
        let mut run = FallbackRun::new(3);
        assert_eq!(run.current(), Some(0));

        let state = run.record("p", AttemptOutcome::Success(CanonicalResponse::text("hi")));
        assert_eq!(state, ChainState::Success(0));
        assert!(run.failures().is_empty());
        assert_eq!(run.into_response().content_str(), "hi");
    }

    #[test]
    fn test_recovery_at_k() {
        let mut run = FallbackRun::new(4);
        assert_eq!(run.record("a", hard("down")), ChainState::Pending(1));
        assert_eq!(
            run.record("b", AttemptOutcome::SoftError(CanonicalResponse::error("quota"))),
            ChainState::Pending(2)
        );
        assert_eq!(
            run.record("c", AttemptOutcome::Success(CanonicalResponse::text("ok"))),
            ChainState::Success(2)
        );
        assert_eq!(run.failures().len(), 2);
        assert_eq!(run.failures()[1].kind, FailureKind::Soft);

        let reply = run.into_response();
        assert_eq!(reply.finish_reason, FinishReason::Stop);
        assert_eq!(reply.content_str(), "ok");
    }

    #[test]
    fn test_all_hard_errors_aggregate_in_order() {
        let mut run = FallbackRun::new(3);
        run.record("Primary (a/m)", hard("one"));
        run.record("Fallback 1 (b/m)", hard("two"));
        assert_eq!(run.record("Fallback 2 (c/m)", hard("three")), ChainState::Exhausted);

        let reply = run.into_response();
        assert!(reply.finish_reason.is_error());
        let lines: Vec<&str> = reply.content_str().lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], EXHAUSTED_HEADER);
        assert!(lines[1].starts_with("  - Primary (a/m): "));
        assert!(lines[1].ends_with("one"));
        assert!(lines[2].contains("two"));
        assert!(lines[3].contains("three"));
    }

    #[test]
    fn test_last_soft_error_returned_verbatim() {
        let mut run = FallbackRun::new(2);
        run.record("a", hard("down"));
        let soft = CanonicalResponse::text("Error calling LLM: rate limited");
        run.record("b", AttemptOutcome::SoftError(soft.clone()));
        assert_eq!(run.into_response(), soft);
    }

    #[test]
    fn test_earlier_soft_error_then_hard_aggregates() {
        let mut run = FallbackRun::new(2);
        run.record("a", AttemptOutcome::SoftError(CanonicalResponse::error("")));
        run.record("b", hard("down"));

        let reply = run.into_response();
        assert!(reply.content_str().starts_with(EXHAUSTED_HEADER));
        assert!(reply.content_str().contains("a: backend reported finish_reason=error"));
    }

    #[test]
    fn test_terminal_state_ignores_records() {
        let mut run = FallbackRun::new(1);
        run.record("a", AttemptOutcome::Success(CanonicalResponse::text("x")));
        assert_eq!(run.record("b", hard("late")), ChainState::Success(0));
        assert!(run.failures().is_empty());
    }

    #[test]
    fn test_empty_chain_is_exhausted() {
        let run = FallbackRun::new(0);
        assert!(run.state().is_terminal());
        assert_eq!(run.into_response().content_str(), EXHAUSTED_HEADER);
    }
}
