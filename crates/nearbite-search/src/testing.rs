//! In-memory candidate source for tests in this and downstream crates.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use nearbite_core::{Candidate, SearchQuery};

use crate::error::SourceError;
use crate::source::CandidateSource;

enum Scripted {
    Results(Vec<Candidate>),
    Failure(String),
}

/// A [`CandidateSource`] that replays queued responses in call order and
/// records every query it receives.
///
/// When the queue is exhausted each further call fails with
/// [`SourceError::Unavailable`], so unexpected extra calls show up as errors
/// as well as in [`calls`](ScriptedSource::calls).
pub struct ScriptedSource {
    name: &'static str,
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<SearchQuery>>,
    delay: Option<Duration>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep (on the tokio clock) before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful response.
    #[must_use]
    pub fn then_return(self, results: Vec<Candidate>) -> Self {
        self.push(Scripted::Results(results));
        self
    }

    /// Queue a provider failure.
    #[must_use]
    pub fn then_fail(self, message: &str) -> Self {
        self.push(Scripted::Failure(message.to_string()));
        self
    }

    /// Every query received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<SearchQuery> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(entry);
    }
}

#[async_trait]
impl CandidateSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        // Claimed before the delay so a cancelled call still consumes its slot.
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match next {
            Some(Scripted::Results(results)) => Ok(results),
            Some(Scripted::Failure(message)) => Err(SourceError::Unavailable(message)),
            None => Err(SourceError::Unavailable(format!(
                "{} has no scripted response left",
                self.name
            ))),
        }
    }
}
