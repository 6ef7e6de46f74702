//! Algorithm adapter: the one call signature the pipeline depends on.
//!
//! Implementations wrap however the reference algorithm is packaged (a Node
//! script, an in-process renderer, a compiled binary). The pipeline only sees
//! [`AvatarAlgorithm::generate`] and, through [`invoke`], a tagged outcome
//! that never unwinds past the call site.

use crate::catalogue::TestCase;
use crate::error::AlgorithmError;
use crate::selector::PartSelector;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// A deterministic identity-to-SVG avatar generator.
#[async_trait]
pub trait AvatarAlgorithm: Send + Sync {
    /// Render one avatar. `forced_variant` of `None` means hash-derived selection.
    async fn generate(
        &self,
        identity: &str,
        suppress_background: bool,
        forced_variant: Option<&PartSelector>,
    ) -> Result<String, AlgorithmError>;

    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether the algorithm can be invoked at all.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Call the algorithm for one case, folding errors and panics into `Err`.
pub async fn invoke(
    algorithm: &dyn AvatarAlgorithm,
    case: &TestCase,
) -> Result<String, AlgorithmError> {
    let call = algorithm.generate(
        &case.identity,
        case.suppress_background,
        case.forced_variant.as_ref(),
    );

    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(AlgorithmError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
