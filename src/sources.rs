//! Observation sources
//!
//! Seam between the pure analysis pipeline and whatever actually stores
//! observations. Implementors wrap a local store, a sync cache, or a remote
//! backend; [`SourceChain`] tries them in order and returns the first
//! successful fetch.

use crate::error::CoreError;
use crate::types::HealthObservation;

/// A provider of observation histories for a user.
pub trait ObservationSource {
    /// Stable name for diagnostics.
    fn name(&self) -> &str;

    /// Fetch all observations for a user, oldest first.
    fn fetch(&self, user_id: &str) -> Result<Vec<HealthObservation>, CoreError>;
}

/// Ordered fallback chain over observation sources.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ObservationSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: Vec<Box<dyn ObservationSource>>) -> Self {
        Self { sources }
    }

    /// Append a source; earlier sources are preferred.
    pub fn push(&mut self, source: Box<dyn ObservationSource>) {
        self.sources.push(source);
    }

    /// Fetch from the first source that succeeds.
    ///
    /// A source returning an empty history counts as success; only errors
    /// trigger fallback. When every source fails the error reports how many
    /// were attempted.
    pub fn fetch_first_success(
        &self,
        user_id: &str,
    ) -> Result<Vec<HealthObservation>, CoreError> {
        for source in &self.sources {
            match source.fetch(user_id) {
                Ok(observations) => return Ok(observations),
                Err(_) => continue,
            }
        }
        Err(CoreError::AllSourcesFailed {
            attempts: self.sources.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct FixedSource {
        name: &'static str,
        result: Result<Vec<HealthObservation>, ()>,
    }

    impl ObservationSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch(&self, user_id: &str) -> Result<Vec<HealthObservation>, CoreError> {
            match &self.result {
                Ok(observations) => {
                    let _ = user_id;
                    Ok(observations.clone())
                }
                Err(()) => Err(CoreError::SourceUnavailable(self.name.to_string())),
            }
        }
    }

    fn one_observation() -> Vec<HealthObservation> {
        vec![HealthObservation::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            "user-1",
        )]
    }

    #[test]
    fn test_first_success_wins() {
        let chain = SourceChain::with_sources(vec![
            Box::new(FixedSource {
                name: "primary",
                result: Err(()),
            }),
            Box::new(FixedSource {
                name: "fallback",
                result: Ok(one_observation()),
            }),
            Box::new(FixedSource {
                name: "never-reached",
                result: Err(()),
            }),
        ]);

        let fetched = chain.fetch_first_success("user-1").unwrap();
        assert_eq!(fetched.len(), 1);
    }

    #[test]
    fn test_empty_history_is_success() {
        let chain = SourceChain::with_sources(vec![
            Box::new(FixedSource {
                name: "primary",
                result: Ok(vec![]),
            }),
            Box::new(FixedSource {
                name: "fallback",
                result: Ok(one_observation()),
            }),
        ]);

        let fetched = chain.fetch_first_success("user-1").unwrap();
        assert!(fetched.is_empty());
    }

    #[test]
    fn test_all_failed_reports_attempts() {
        let mut chain = SourceChain::new();
        chain.push(Box::new(FixedSource {
            name: "a",
            result: Err(()),
        }));
        chain.push(Box::new(FixedSource {
            name: "b",
            result: Err(()),
        }));

        match chain.fetch_first_success("user-1") {
            Err(CoreError::AllSourcesFailed { attempts }) => assert_eq!(attempts, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_chain_fails() {
        let chain = SourceChain::new();
        assert!(matches!(
            chain.fetch_first_success("user-1"),
            Err(CoreError::AllSourcesFailed { attempts: 0 })
        ));
    }
}
