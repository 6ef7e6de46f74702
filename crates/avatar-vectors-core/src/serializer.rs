//! Vector file encoding, atomic persistence and structural validation.
//!
//! The file is a pretty-printed JSON array, two-space indent, no trailing
//! newline, keys in the order `id, input, sansEnv, version, output, length,
//! error`. Given the same results the bytes are identical.

use crate::recorder::{utf16_len, Outcome, VectorResult};
use crate::selector::PartSelector;
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// One persisted vector entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: usize,
    pub input: String,
    #[serde(rename = "sansEnv")]
    pub sans_env: bool,
    pub version: Option<PartSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VectorRecord {
    /// Recover the tagged outcome, rejecting entries that carry both or neither.
    pub fn outcome(&self) -> Result<Outcome> {
        match (&self.output, self.length, &self.error) {
            (Some(output), Some(length), None) => {
                let actual = utf16_len(output);
                if actual != length {
                    return Err(HarnessError::MalformedVectorFile(format!(
                        "entry {} declares length {} but output has {}",
                        self.id, length, actual
                    )));
                }
                Ok(Outcome::Success {
                    output: output.clone(),
                    length,
                })
            }
            (None, None, Some(message)) => Ok(Outcome::Failure {
                message: message.clone(),
            }),
            (None, None, None) => Err(HarnessError::MalformedVectorFile(format!(
                "entry {} has neither output nor error",
                self.id
            ))),
            _ => Err(HarnessError::MalformedVectorFile(format!(
                "entry {} must carry exactly one of output+length or error",
                self.id
            ))),
        }
    }
}

impl From<&VectorResult> for VectorRecord {
    fn from(result: &VectorResult) -> Self {
        let (output, length, error) = match &result.outcome {
            Outcome::Success { output, length } => (Some(output.clone()), Some(*length), None),
            Outcome::Failure { message } => (None, None, Some(message.clone())),
        };
        VectorRecord {
            id: result.sequence_index,
            input: result.case.identity.clone(),
            sans_env: result.case.suppress_background,
            version: result.case.forced_variant.clone(),
            output,
            length,
            error,
        }
    }
}

/// Success/failure tally plus the digest of the written bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
}

impl VectorSummary {
    fn new(results: &[VectorResult], bytes: &[u8]) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        VectorSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }
}

/// Encode results into the canonical vector file text.
pub fn encode_vector_file(results: &[VectorResult]) -> Result<String> {
    let records: Vec<VectorRecord> = results.iter().map(VectorRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Encode and atomically replace `path`. Nothing is written if encoding fails.
pub fn write_vector_file(path: &Path, results: &[VectorResult]) -> Result<VectorSummary> {
    let content = encode_vector_file(results)?;
    write_atomic(path, content.as_bytes())?;

    let summary = VectorSummary::new(results, content.as_bytes());
    info!(
        path = %path.display(),
        total = summary.total,
        sha256 = %summary.sha256,
        "Wrote vector file"
    );
    Ok(summary)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HarnessError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| HarnessError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| HarnessError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| HarnessError::io(path, e.error))?;
    Ok(())
}

/// Parse vector file text and check ids and outcome exclusivity.
pub fn parse_vector_file(content: &str) -> Result<Vec<VectorRecord>> {
    let records: Vec<VectorRecord> = serde_json::from_str(content)?;
    validate_records(&records)?;
    Ok(records)
}

/// Read and validate a vector file from disk.
pub fn load_vector_file(path: &Path) -> Result<Vec<VectorRecord>> {
    let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    parse_vector_file(&content)
}

/// Ids must run 0..N-1 in order and every entry must have exactly one outcome.
pub fn validate_records(records: &[VectorRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(HarnessError::MalformedVectorFile(
            "file contains no entries".to_string(),
        ));
    }
    for (position, record) in records.iter().enumerate() {
        if record.id != position {
            return Err(HarnessError::MalformedVectorFile(format!(
                "entry at position {} has id {}",
                position, record.id
            )));
        }
        record.outcome()?;
    }
    Ok(())
}
