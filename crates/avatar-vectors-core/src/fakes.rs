//! In-process algorithms for tests (testing only)
//!
//! [`FakeAvatar`] honours the same contract as the reference: deterministic,
//! forced variants bypass the identity hash, theme changes the output and
//! the background layer is dropped on request. It is not the real renderer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::adapter::AvatarAlgorithm;
use crate::error::AlgorithmError;
use crate::selector::{PartSelector, Theme, PART_CODES};

// ---------------------------------------------------------------------------
// FakeAvatar
// ---------------------------------------------------------------------------

/// Hash-driven SVG stand-in.
#[derive(Debug, Clone)]
pub struct FakeAvatar {
    fill_prefix: String,
}

impl Default for FakeAvatar {
    fn default() -> Self {
        FakeAvatar {
            fill_prefix: "#".to_string(),
        }
    }
}

impl FakeAvatar {
    pub fn new() -> Self {
        Self::default()
    }

    /// A variant whose colours are spelled differently, for divergence tests.
    pub fn with_fill_prefix(prefix: &str) -> Self {
        FakeAvatar {
            fill_prefix: prefix.to_string(),
        }
    }

    fn derive(identity: &str) -> PartSelector {
        let digest = Sha256::digest(identity.as_bytes());
        let part = PART_CODES[digest[0] as usize % PART_CODES.len()];
        let theme = Theme::ALL[digest[1] as usize % Theme::ALL.len()];
        PartSelector::new(part, theme)
    }

    fn palette(theme: Theme) -> [&'static str; 2] {
        match theme {
            Theme::A => ["3a6b9c", "f2c280"],
            Theme::B => ["8e2b5f", "ffd7a8"],
            Theme::C => ["1f7a4d", "c9e3f0"],
        }
    }
}

#[async_trait]
impl AvatarAlgorithm for FakeAvatar {
    async fn generate(
        &self,
        identity: &str,
        suppress_background: bool,
        forced_variant: Option<&PartSelector>,
    ) -> Result<String, AlgorithmError> {
        let selector = match forced_variant {
            Some(sel) if !sel.is_known_part() => {
                return Err(AlgorithmError::Rejected(format!(
                    "unknown part code: {}",
                    sel.part
                )))
            }
            Some(sel) => sel.clone(),
            None => Self::derive(identity),
        };

        let [env, skin] = Self::palette(selector.theme);
        let mut svg =
            String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 231 231">"#);
        if !suppress_background {
            svg.push_str(&format!(
                r#"<path d="M33.83,33.83a115.5,115.5,0,1,1,0,163.34,115.49,115.49,0,1,1,0-163.34Z" style="fill:{}{};"/>"#,
                self.fill_prefix, env
            ));
        }
        svg.push_str(&format!(
            r#"<path data-part="{}" d="M52.3,110.2a63.2,63.2,0,1,1,126.4,0Z" style="fill:{}{};"/>"#,
            selector.part, self.fill_prefix, skin
        ));
        svg.push_str("</svg>");
        Ok(svg)
    }

    fn name(&self) -> &str {
        "fake-avatar"
    }
}

// ---------------------------------------------------------------------------
// ScriptedFailures
// ---------------------------------------------------------------------------

/// Wraps an algorithm and rejects chosen identities with fixed messages.
#[derive(Debug, Clone)]
pub struct ScriptedFailures<A> {
    inner: A,
    failures: BTreeMap<String, String>,
}

impl<A: AvatarAlgorithm> ScriptedFailures<A> {
    pub fn new(inner: A) -> Self {
        ScriptedFailures {
            inner,
            failures: BTreeMap::new(),
        }
    }

    pub fn fail_on(mut self, identity: &str, message: &str) -> Self {
        self.failures
            .insert(identity.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl<A: AvatarAlgorithm> AvatarAlgorithm for ScriptedFailures<A> {
    async fn generate(
        &self,
        identity: &str,
        suppress_background: bool,
        forced_variant: Option<&PartSelector>,
    ) -> Result<String, AlgorithmError> {
        if let Some(message) = self.failures.get(identity) {
            return Err(AlgorithmError::Rejected(message.clone()));
        }
        self.inner
            .generate(identity, suppress_background, forced_variant)
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ---------------------------------------------------------------------------
// PanickingAlgorithm
// ---------------------------------------------------------------------------

/// Panics on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingAlgorithm;

#[async_trait]
impl AvatarAlgorithm for PanickingAlgorithm {
    async fn generate(
        &self,
        identity: &str,
        _suppress_background: bool,
        _forced_variant: Option<&PartSelector>,
    ) -> Result<String, AlgorithmError> {
        panic!("renderer exploded on {identity}")
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_is_deterministic() {
        let algo = FakeAvatar::new();
        let a = algo.generate("Same Input", false, None).await.expect("svg");
        let b = algo.generate("Same Input", false, None).await.expect("svg");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fake_empty_identity_renders() {
        let svg = FakeAvatar::new().generate("", false, None).await.expect("svg");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[tokio::test]
    async fn test_fake_sans_background_drops_layer() {
        let algo = FakeAvatar::new();
        let with = algo.generate("Example", false, None).await.expect("svg");
        let without = algo.generate("Example", true, None).await.expect("svg");
        assert!(without.len() < with.len());
    }

    #[tokio::test]
    async fn test_fake_rejects_unknown_part() {
        let err = FakeAvatar::new()
            .generate("Test", false, Some(&PartSelector::new("16", Theme::A)))
            .await
            .expect_err("unknown part");
        assert_eq!(
            err,
            AlgorithmError::Rejected("unknown part code: 16".to_string())
        );
    }
}
