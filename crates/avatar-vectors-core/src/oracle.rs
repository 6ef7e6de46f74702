//! Node-hosted reference algorithm.
//!
//! Each call spawns `node -e <driver> <script>`, sends one JSON request on
//! stdin and reads one JSON reply from stdout. The driver evaluates the
//! reference script in global scope and calls its `multiavatar` function.

use crate::adapter::AvatarAlgorithm;
use crate::error::AlgorithmError;
use crate::selector::PartSelector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Environment variable overriding the Node interpreter.
pub const NODE_ENV_VAR: &str = "AVATAR_VECTORS_NODE";

const NODE_DRIVER: &str = r#"
const fs = require('fs');
const chunks = [];
process.stdin.on('data', (chunk) => chunks.push(chunk));
process.stdin.on('end', () => {
    let reply;
    try {
        const request = JSON.parse(Buffer.concat(chunks).toString('utf8'));
        const source = fs.readFileSync(process.argv[1], 'utf8');
        const generate = (0, eval)(source + '\n;typeof multiavatar === "function" ? multiavatar : undefined');
        if (typeof generate !== 'function') {
            throw new Error('multiavatar function not found in ' + process.argv[1]);
        }
        const svg = generate(request.input, request.sansEnv === true, request.version || undefined);
        reply = { ok: true, svg: String(svg) };
    } catch (error) {
        const message = error && error.message !== undefined ? String(error.message) : String(error);
        reply = { ok: false, error: message };
    }
    process.stdout.write(JSON.stringify(reply));
});
"#;

#[derive(Debug, Serialize)]
struct OracleRequest<'a> {
    input: &'a str,
    #[serde(rename = "sansEnv")]
    sans_env: bool,
    version: Option<&'a PartSelector>,
}

#[derive(Debug, Deserialize)]
struct OracleReply {
    ok: bool,
    #[serde(default)]
    svg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Resolve the Node interpreter: explicit value, then env override, then `node`.
pub fn resolve_node_binary(explicit: Option<&str>) -> String {
    explicit
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            std::env::var(NODE_ENV_VAR)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| "node".to_string())
}

/// The JavaScript reference implementation run under Node.
#[derive(Debug, Clone)]
pub struct NodeOracle {
    node_binary: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl NodeOracle {
    pub fn new(node_binary: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        NodeOracle {
            node_binary: node_binary.into(),
            script_path: script_path.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Per-call timeout; zero disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn node_binary(&self) -> &str {
        &self.node_binary
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    fn encode_request(
        identity: &str,
        suppress_background: bool,
        forced_variant: Option<&PartSelector>,
    ) -> Result<Vec<u8>, AlgorithmError> {
        let request = OracleRequest {
            input: identity,
            sans_env: suppress_background,
            version: forced_variant,
        };
        serde_json::to_vec(&request)
            .map_err(|e| AlgorithmError::Invocation(format!("encode request: {}", e)))
    }

    fn decode_reply(stdout: &[u8]) -> Result<String, AlgorithmError> {
        let reply: OracleReply = serde_json::from_slice(stdout).map_err(|e| {
            AlgorithmError::Invocation(format!(
                "unparsable oracle reply ({}): {}",
                e,
                String::from_utf8_lossy(stdout).trim()
            ))
        })?;

        match (reply.ok, reply.svg, reply.error) {
            (true, Some(svg), _) => Ok(svg),
            (true, None, _) => Err(AlgorithmError::Invocation(
                "oracle reply missing svg".to_string(),
            )),
            (false, _, Some(message)) => Err(AlgorithmError::Rejected(message)),
            (false, _, None) => Err(AlgorithmError::Rejected(String::new())),
        }
    }
}

#[async_trait]
impl AvatarAlgorithm for NodeOracle {
    async fn generate(
        &self,
        identity: &str,
        suppress_background: bool,
        forced_variant: Option<&PartSelector>,
    ) -> Result<String, AlgorithmError> {
        let request = Self::encode_request(identity, suppress_background, forced_variant)?;

        let mut child = Command::new(&self.node_binary)
            .arg("-e")
            .arg(NODE_DRIVER)
            .arg(&self.script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AlgorithmError::Invocation(format!(
                    "failed to spawn '{}': {}",
                    self.node_binary, e
                ))
            })?;

        let stdin = child.stdin.take();
        let exchange = async move {
            let write = async move {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(&request).await?;
                }
                Ok::<(), std::io::Error>(())
            };
            tokio::join!(write, child.wait_with_output())
        };

        let (written, waited) = if self.timeout.is_zero() {
            exchange.await
        } else {
            tokio::time::timeout(self.timeout, exchange)
                .await
                .map_err(|_| {
                    AlgorithmError::Invocation(format!(
                        "timed out after {} ms",
                        self.timeout.as_millis()
                    ))
                })?
        };
        let output = waited
            .map_err(|e| AlgorithmError::Invocation(format!("wait for oracle: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AlgorithmError::Invocation(format!(
                "oracle exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        written.map_err(|e| AlgorithmError::Invocation(format!("write request: {}", e)))?;

        debug!(bytes = output.stdout.len(), "oracle replied");
        Self::decode_reply(&output.stdout)
    }

    fn name(&self) -> &str {
        "multiavatar-node"
    }

    async fn is_available(&self) -> bool {
        if !self.script_path.is_file() {
            debug!(script = %self.script_path.display(), "reference script missing");
            return false;
        }
        match Command::new(&self.node_binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(node = %self.node_binary, error = %e, "node version check failed");
                false
            }
        }
    }
}
