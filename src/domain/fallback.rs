//! Ordered fallback chains: try each candidate until one succeeds

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

use super::DomainError;

/// Outcome of a chain where every candidate failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainExhausted {
    /// Candidate and the error it produced, in attempt order
    pub attempts: Vec<(String, DomainError)>,
}

impl ChainExhausted {
    /// The error produced by the last attempted candidate
    pub fn last_error(&self) -> Option<&DomainError> {
        self.attempts.last().map(|(_, e)| e)
    }

    pub fn into_last_error(self) -> DomainError {
        self.attempts
            .into_iter()
            .last()
            .map(|(_, e)| e)
            .unwrap_or_else(|| DomainError::internal("No fallback candidates were provided"))
    }
}

impl std::fmt::Display for ChainExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.attempts.is_empty() {
            return write!(f, "no candidates to try");
        }

        let parts: Vec<String> = self
            .attempts
            .iter()
            .map(|(candidate, error)| format!("{}: {}", candidate, error))
            .collect();

        write!(f, "all candidates failed ({})", parts.join("; "))
    }
}

/// Runs `attempt` for each candidate in order and returns the first success
/// together with the candidate that produced it.
pub async fn first_success<C, T, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Result<(C, T), ChainExhausted>
where
    C: Clone + Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempts = Vec::new();

    for candidate in candidates {
        match attempt(candidate.clone()).await {
            Ok(value) => {
                debug!(candidate = %candidate, "Fallback chain candidate succeeded");
                return Ok((candidate, value));
            }
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "Fallback chain candidate failed");
                attempts.push((candidate.to_string(), e));
            }
        }
    }

    Err(ChainExhausted { attempts })
}
