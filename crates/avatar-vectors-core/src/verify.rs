//! Replays a vector file against an implementation and diffs byte-for-byte.
//!
//! Comparison rules:
//! - expected output, actual output: strings must be identical;
//! - expected error, actual error: pass, messages are implementation-specific;
//! - any other pairing is an outcome mismatch.

use crate::adapter::{invoke, AvatarAlgorithm};
use crate::catalogue::Catalogue;
use crate::recorder::{utf16_len, Outcome};
use crate::serializer::{validate_records, write_atomic, VectorRecord};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// UTF-16 units of context shown on each side of a divergence.
const CONTEXT_UNITS: usize = 40;

/// Why a replayed case did not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchKind {
    /// Both rendered, outputs differ.
    OutputDiffers {
        /// First differing UTF-16 offset.
        first_difference: usize,
        expected_length: usize,
        actual_length: usize,
        expected_context: String,
        actual_context: String,
    },
    /// Golden file has an output, the implementation failed.
    UnexpectedFailure { message: String },
    /// Golden file records a failure, the implementation rendered.
    UnexpectedSuccess { actual_length: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMismatch {
    pub id: usize,
    pub input: String,
    pub mismatch: MismatchKind,
}

/// Result of replaying a whole vector file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub algorithm: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub mismatches: Vec<CaseMismatch>,
}

impl ConformanceReport {
    pub fn is_conformant(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// First differing UTF-16 offset, or `None` when the strings are equal.
pub fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    let mut exp = expected.encode_utf16();
    let mut act = actual.encode_utf16();
    let mut offset = 0;
    loop {
        match (exp.next(), act.next()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => offset += 1,
            _ => return Some(offset),
        }
    }
}

fn context_window(s: &str, offset: usize) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let start = offset.saturating_sub(CONTEXT_UNITS / 2).min(units.len());
    let end = (offset + CONTEXT_UNITS).min(units.len());
    String::from_utf16_lossy(&units[start..end])
}

fn compare(expected: &Outcome, actual: &Outcome) -> Option<MismatchKind> {
    match (expected, actual) {
        (Outcome::Success { output: exp, .. }, Outcome::Success { output: act, .. }) => {
            first_difference(exp, act).map(|offset| MismatchKind::OutputDiffers {
                first_difference: offset,
                expected_length: utf16_len(exp),
                actual_length: utf16_len(act),
                expected_context: context_window(exp, offset),
                actual_context: context_window(act, offset),
            })
        }
        (Outcome::Success { .. }, Outcome::Failure { message }) => {
            Some(MismatchKind::UnexpectedFailure {
                message: message.clone(),
            })
        }
        (Outcome::Failure { .. }, Outcome::Success { length, .. }) => {
            Some(MismatchKind::UnexpectedSuccess {
                actual_length: *length,
            })
        }
        (Outcome::Failure { .. }, Outcome::Failure { .. }) => None,
    }
}

/// Replay every record through `algorithm`, in file order.
pub async fn verify_vectors(
    algorithm: &dyn AvatarAlgorithm,
    records: &[VectorRecord],
) -> Result<ConformanceReport> {
    validate_records(records)?;
    let catalogue = Catalogue::from_records(records)?;

    info!(
        algorithm = algorithm.name(),
        cases = records.len(),
        "Verifying vectors"
    );

    let mut mismatches = Vec::new();
    for (record, case) in records.iter().zip(catalogue.cases()) {
        let expected = record.outcome()?;
        let actual = match invoke(algorithm, case).await {
            Ok(output) => Outcome::success(output),
            Err(e) => Outcome::failure(e.message()),
        };

        if let Some(mismatch) = compare(&expected, &actual) {
            warn!(id = record.id, input = %record.input, "vector mismatch");
            mismatches.push(CaseMismatch {
                id: record.id,
                input: record.input.clone(),
                mismatch,
            });
        }
    }

    let total = records.len();
    let report = ConformanceReport {
        algorithm: algorithm.name().to_string(),
        total,
        passed: total - mismatches.len(),
        failed: mismatches.len(),
        mismatches,
    };
    info!(
        passed = report.passed,
        failed = report.failed,
        "Verification finished"
    );
    Ok(report)
}

/// Write a conformance report as pretty JSON.
pub fn write_conformance_report(path: &Path, report: &ConformanceReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    write_atomic(path, content.as_bytes())
}
