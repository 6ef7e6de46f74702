//! Vector recorder: drives the catalogue through an algorithm, one case at a time.
//!
//! A failing case is recorded and the run continues. The result list always
//! has one entry per catalogue case, in catalogue order.

use crate::adapter::{invoke, AvatarAlgorithm};
use crate::catalogue::{Catalogue, TestCase};
use std::fmt;
use tracing::{debug, info, warn};

/// Identities longer than this are elided in success progress lines.
const PROGRESS_IDENTITY_CHARS: usize = 30;

/// Outcome of one algorithm call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { output: String, length: usize },
    Failure { message: String },
}

impl Outcome {
    /// Wrap a rendered document, measuring it in UTF-16 code units.
    pub fn success(output: String) -> Self {
        let length = utf16_len(&output);
        Outcome::Success { output, length }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Length as reported by the JavaScript and Java implementations.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Recorded outcome of one catalogue case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorResult {
    /// Zero-based catalogue position; becomes the vector `id`.
    pub sequence_index: usize,
    pub case: TestCase,
    pub outcome: Outcome,
}

impl VectorResult {
    /// Human-readable progress line for this result.
    pub fn progress_line(&self) -> ProgressLine<'_> {
        ProgressLine(self)
    }
}

/// `✓ Case 3: "Bob" -> 1234 chars` or `✗ Case 7: "x" failed: message`.
pub struct ProgressLine<'a>(&'a VectorResult);

impl fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        match &result.outcome {
            Outcome::Success { length, .. } => {
                let shown: String = result
                    .case
                    .identity
                    .chars()
                    .take(PROGRESS_IDENTITY_CHARS)
                    .collect();
                let ellipsis = if result.case.identity.chars().count() > PROGRESS_IDENTITY_CHARS {
                    "..."
                } else {
                    ""
                };
                write!(
                    f,
                    "✓ Case {}: \"{}{}\" -> {} chars",
                    result.sequence_index, shown, ellipsis, length
                )
            }
            Outcome::Failure { message } => write!(
                f,
                "✗ Case {}: \"{}\" failed: {}",
                result.sequence_index, result.case.identity, message
            ),
        }
    }
}

/// Sequential recorder over one algorithm.
pub struct VectorRecorder<'a> {
    algorithm: &'a dyn AvatarAlgorithm,
}

impl<'a> VectorRecorder<'a> {
    pub fn new(algorithm: &'a dyn AvatarAlgorithm) -> Self {
        VectorRecorder { algorithm }
    }

    /// Run every case in order. `on_result` sees each result as it is appended.
    pub async fn record<F>(&self, catalogue: &Catalogue, mut on_result: F) -> Vec<VectorResult>
    where
        F: FnMut(&VectorResult),
    {
        info!(
            algorithm = self.algorithm.name(),
            cases = catalogue.len(),
            "Recording vectors"
        );

        let mut results = Vec::with_capacity(catalogue.len());

        for (sequence_index, case) in catalogue.cases().iter().enumerate() {
            let outcome = match invoke(self.algorithm, case).await {
                Ok(output) => {
                    let outcome = Outcome::success(output);
                    debug!(case = sequence_index, label = %case.label, "case rendered");
                    outcome
                }
                Err(e) => {
                    warn!(case = sequence_index, label = %case.label, error = %e, "case failed");
                    Outcome::failure(e.message())
                }
            };

            let result = VectorResult {
                sequence_index,
                case: case.clone(),
                outcome,
            };
            on_result(&result);
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Recording finished"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CoverageMode;
    use crate::fakes::{FakeAvatar, PanickingAlgorithm, ScriptedFailures};

    #[test]
    fn test_utf16_len_counts_code_units() {
        assert_eq!(utf16_len(""), 0);
        assert_eq!(utf16_len("<svg/>"), 6);
        assert_eq!(utf16_len("测试"), 2);
        assert_eq!(utf16_len("😀"), 2);
    }

    #[tokio::test]
    async fn test_record_preserves_order_and_length() {
        let algo = FakeAvatar::new();
        let catalogue = Catalogue::new(CoverageMode::Sampled);
        let results = VectorRecorder::new(&algo).record(&catalogue, |_| {}).await;

        assert_eq!(results.len(), catalogue.len());
        for (i, (result, case)) in results.iter().zip(catalogue.cases()).enumerate() {
            assert_eq!(result.sequence_index, i);
            assert_eq!(&result.case, case);
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_halt_the_run() {
        let algo = ScriptedFailures::new(FakeAvatar::new()).fail_on("Bob", "cannot render Bob");
        let catalogue = Catalogue::new(CoverageMode::Sampled);
        let results = VectorRecorder::new(&algo).record(&catalogue, |_| {}).await;

        assert_eq!(results.len(), catalogue.len());
        let bob = results
            .iter()
            .find(|r| r.case.identity == "Bob")
            .expect("Bob case");
        assert_eq!(bob.outcome, Outcome::failure("cannot render Bob"));
        assert!(results
            .iter()
            .filter(|r| r.case.identity != "Bob")
            .all(|r| r.outcome.is_success()));
    }

    #[tokio::test]
    async fn test_panicking_algorithm_is_recorded_per_case() {
        let catalogue = Catalogue::from_cases(vec![
            TestCase::plain("a", "a"),
            TestCase::plain("b", "b"),
        ])
        .expect("catalogue");
        let results = VectorRecorder::new(&PanickingAlgorithm)
            .record(&catalogue, |_| {})
            .await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.outcome.is_success()));
    }

    #[tokio::test]
    async fn test_callback_sees_every_result_in_order() {
        let algo = FakeAvatar::new();
        let catalogue = Catalogue::new(CoverageMode::Full);
        let mut seen = Vec::new();
        VectorRecorder::new(&algo)
            .record(&catalogue, |r| seen.push(r.sequence_index))
            .await;
        assert_eq!(seen, (0..catalogue.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_progress_line_success_truncates_long_identity() {
        let result = VectorResult {
            sequence_index: 32,
            case: TestCase::plain(
                "long",
                "This is a longer test string with multiple words",
            ),
            outcome: Outcome::success("x".repeat(42)),
        };
        assert_eq!(
            result.progress_line().to_string(),
            "✓ Case 32: \"This is a longer test string w...\" -> 42 chars"
        );
    }

    #[test]
    fn test_progress_line_failure() {
        let result = VectorResult {
            sequence_index: 6,
            case: TestCase::plain("empty", ""),
            outcome: Outcome::failure("boom"),
        };
        assert_eq!(
            result.progress_line().to_string(),
            "✗ Case 6: \"\" failed: boom"
        );
    }
}
