//! Harness configuration.

use crate::catalogue::CoverageMode;
use crate::oracle::{resolve_node_binary, NodeOracle};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_PATH: &str = "test-vectors.json";
pub const DEFAULT_SCRIPT_PATH: &str = "multiavatar.js";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where to read the reference from, where to write vectors, and how much to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub mode: CoverageMode,
    pub output_path: PathBuf,
    pub script_path: PathBuf,
    /// Falls back to `AVATAR_VECTORS_NODE`, then `node`.
    pub node_binary: Option<String>,
    /// Per-case timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            mode: CoverageMode::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            node_binary: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HarnessConfig {
    /// Build the Node-hosted reference adapter described by this config.
    pub fn oracle(&self) -> NodeOracle {
        NodeOracle::new(
            resolve_node_binary(self.node_binary.as_deref()),
            self.script_path.clone(),
        )
        .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.mode, CoverageMode::Full);
        assert_eq!(cfg.output_path, PathBuf::from("test-vectors.json"));
        assert_eq!(cfg.script_path, PathBuf::from("multiavatar.js"));
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn test_oracle_uses_explicit_binary_and_script() {
        let cfg = HarnessConfig {
            node_binary: Some("/usr/local/bin/node".to_string()),
            script_path: PathBuf::from("vendor/multiavatar.min.js"),
            ..HarnessConfig::default()
        };
        let oracle = cfg.oracle();
        assert_eq!(oracle.node_binary(), "/usr/local/bin/node");
        assert_eq!(
            oracle.script_path(),
            std::path::Path::new("vendor/multiavatar.min.js")
        );
    }
}
