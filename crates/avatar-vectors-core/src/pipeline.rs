//! Generation pipeline: catalogue -> recorder -> serializer -> file.

use crate::adapter::AvatarAlgorithm;
use crate::catalogue::Catalogue;
use crate::recorder::{VectorRecorder, VectorResult};
use crate::serializer::{write_vector_file, VectorSummary};
use crate::{HarnessError, Result};
use std::path::Path;
use tracing::info;

/// Everything a finished generation run produced.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub results: Vec<VectorResult>,
    pub summary: VectorSummary,
}

/// Record the whole catalogue and persist it to `output_path`.
///
/// The algorithm must report itself available before any case runs. Per-case
/// failures end up in the file; only pipeline failures return `Err`, and in
/// that case the destination is left untouched.
pub async fn generate_vectors<F>(
    algorithm: &dyn AvatarAlgorithm,
    catalogue: &Catalogue,
    output_path: &Path,
    on_result: F,
) -> Result<GenerationResult>
where
    F: FnMut(&VectorResult),
{
    if catalogue.is_empty() {
        return Err(HarnessError::EmptyCatalogue);
    }
    if !algorithm.is_available().await {
        return Err(HarnessError::AlgorithmUnavailable(
            algorithm.name().to_string(),
        ));
    }

    info!(
        algorithm = algorithm.name(),
        output = %output_path.display(),
        "Starting vector generation"
    );

    let results = VectorRecorder::new(algorithm)
        .record(catalogue, on_result)
        .await;
    let summary = write_vector_file(output_path, &results)?;

    Ok(GenerationResult { results, summary })
}
