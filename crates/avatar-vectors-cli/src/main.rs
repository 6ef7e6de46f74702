//! Avatar Vectors CLI
//!
//! The `avatar-vectors` command records golden vectors from the reference
//! multiavatar implementation and replays them against it.
//!
//! ## Commands
//!
//! - (none) / `generate`: record the catalogue and write the vector file
//! - `verify`: replay a vector file and report byte-level mismatches

use anyhow::{bail, Context, Result};
use avatar_vectors_core::{
    generate_vectors, load_vector_file, verify_vectors, write_conformance_report, AvatarAlgorithm,
    Catalogue, CoverageMode, HarnessConfig, MismatchKind,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "avatar-vectors")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Golden-vector conformance harness for multiavatar", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    reference: ReferenceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Output path for the vector file
    #[arg(short, long, env = "AVATAR_VECTORS_OUTPUT", default_value = "test-vectors.json")]
    output: PathBuf,

    /// Coverage mode: sampled (hand-curated) or full (adds part x theme x background)
    #[arg(short, long, default_value = "full")]
    mode: CoverageMode,
}

#[derive(Args)]
struct ReferenceArgs {
    /// Reference implementation script
    #[arg(long, global = true, env = "AVATAR_VECTORS_SCRIPT", default_value = "multiavatar.js")]
    script: PathBuf,

    /// Node interpreter used to run the reference script
    #[arg(long, global = true, env = "AVATAR_VECTORS_NODE")]
    node: Option<String>,

    /// Per-case timeout in seconds (0 disables)
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the catalogue through the reference and write the vector file (default)
    Generate(GenerateArgs),

    /// Replay a vector file through the reference and diff outputs
    Verify {
        /// Vector file to replay
        #[arg(long, default_value = "test-vectors.json")]
        vectors: PathBuf,

        /// Optional path for a JSON conformance report
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    avatar_vectors_core::init_tracing(cli.json, level);

    match &cli.command {
        Some(Commands::Generate(generate)) => {
            cmd_generate(&build_config(&cli.reference, Some(generate))).await
        }
        Some(Commands::Verify { vectors, report }) => {
            cmd_verify(&build_config(&cli.reference, None), vectors, report.as_deref()).await
        }
        None => cmd_generate(&build_config(&cli.reference, None)).await,
    }
}

/// Parse the command line, treating a bare invocation (or one carrying only
/// generate flags) as `generate`.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let first = Cli::try_parse_from(args.iter().cloned());
    if let Ok(cli) = &first {
        if cli.command.is_some() {
            return first;
        }
    }

    let mut with_default = args;
    let at = with_default.len().min(1);
    with_default.insert(at, OsString::from("generate"));
    match Cli::try_parse_from(with_default) {
        Ok(cli) => Ok(cli),
        Err(e) => first.and(Err(e)),
    }
}

fn build_config(reference: &ReferenceArgs, generate: Option<&GenerateArgs>) -> HarnessConfig {
    let defaults = HarnessConfig::default();
    HarnessConfig {
        mode: generate.map_or(defaults.mode, |g| g.mode),
        output_path: generate.map_or(defaults.output_path, |g| g.output.clone()),
        script_path: reference.script.clone(),
        node_binary: reference.node.clone(),
        timeout_secs: reference.timeout_secs,
    }
}

async fn cmd_generate(config: &HarnessConfig) -> Result<()> {
    let oracle = config.oracle();
    let catalogue = Catalogue::new(config.mode);

    println!("Generating test vectors from {}...", oracle.script_path().display());
    println!("Total test cases: {}\n", catalogue.len());

    let run = generate_vectors(&oracle, &catalogue, &config.output_path, |result| {
        println!("{}", result.progress_line());
    })
    .await
    .with_context(|| {
        format!(
            "vector generation failed (node: {}, script: {})",
            oracle.node_binary(),
            oracle.script_path().display()
        )
    })?;

    println!(
        "\n✓ Test vectors written to {}",
        config.output_path.display()
    );
    println!("  Total: {} test cases", run.summary.total);
    println!("  Success: {}", run.summary.succeeded);
    println!("  Failed: {}", run.summary.failed);
    println!("  SHA-256: {}", run.summary.sha256);

    info!(mode = %config.mode, "Generation complete");
    Ok(())
}

async fn cmd_verify(
    config: &HarnessConfig,
    vectors: &std::path::Path,
    report_path: Option<&std::path::Path>,
) -> Result<()> {
    let oracle = config.oracle();
    if !oracle.is_available().await {
        bail!(
            "reference unavailable (node: {}, script: {})",
            oracle.node_binary(),
            oracle.script_path().display()
        );
    }

    let records = load_vector_file(vectors)
        .with_context(|| format!("failed to load vectors from {}", vectors.display()))?;
    let report = verify_vectors(&oracle, &records)
        .await
        .context("verification failed")?;

    for mismatch in &report.mismatches {
        match &mismatch.mismatch {
            MismatchKind::OutputDiffers {
                first_difference,
                expected_length,
                actual_length,
                expected_context,
                actual_context,
            } => {
                println!(
                    "✗ Case {}: \"{}\" differs at {} (expected {} chars, got {})",
                    mismatch.id, mismatch.input, first_difference, expected_length, actual_length
                );
                println!("    expected: ...{}...", expected_context);
                println!("    actual:   ...{}...", actual_context);
            }
            MismatchKind::UnexpectedFailure { message } => println!(
                "✗ Case {}: \"{}\" failed: {}",
                mismatch.id, mismatch.input, message
            ),
            MismatchKind::UnexpectedSuccess { actual_length } => println!(
                "✗ Case {}: \"{}\" rendered {} chars, expected an error",
                mismatch.id, mismatch.input, actual_length
            ),
        }
    }

    if let Some(path) = report_path {
        write_conformance_report(path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    println!(
        "\nVerified {} vectors: {} passed, {} failed",
        report.total, report.passed, report.failed
    );

    if !report.is_conformant() {
        bail!("{} vector(s) do not match", report.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_config(cli: &Cli) -> HarnessConfig {
        match &cli.command {
            Some(Commands::Generate(generate)) => build_config(&cli.reference, Some(generate)),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_no_arguments_means_full_generation() {
        let cli = parse_cli(["avatar-vectors"]).expect("parse");
        let config = generate_config(&cli);
        assert_eq!(config.mode, CoverageMode::Full);
        assert_eq!(config.output_path, PathBuf::from("test-vectors.json"));
    }

    #[test]
    fn test_bare_generate_flags_imply_generate() {
        let cli = parse_cli(["avatar-vectors", "-m", "sampled", "--script", "ref.js"])
            .expect("parse");
        let config = generate_config(&cli);
        assert_eq!(config.mode, CoverageMode::Sampled);
        assert_eq!(config.script_path, PathBuf::from("ref.js"));
    }

    #[test]
    fn test_generate_flags_rejected_on_verify() {
        assert!(parse_cli(["avatar-vectors", "verify", "-o", "x.json"]).is_err());
        assert!(parse_cli(["avatar-vectors", "verify", "--mode", "sampled"]).is_err());
    }

    #[test]
    fn test_help_reports_top_level_usage() {
        let err = parse_cli(["avatar-vectors", "--help"]).err().expect("help exits");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("verify"));
    }

    #[test]
    fn test_generate_flags_map_onto_config() {
        let cli = parse_cli([
            "avatar-vectors",
            "generate",
            "--mode",
            "sampled",
            "--output",
            "out/vectors.json",
            "--script",
            "multiavatar.min.js",
            "--timeout-secs",
            "5",
        ])
        .expect("parse");
        let config = generate_config(&cli);
        assert_eq!(config.mode, CoverageMode::Sampled);
        assert_eq!(config.output_path, PathBuf::from("out/vectors.json"));
        assert_eq!(config.script_path, PathBuf::from("multiavatar.min.js"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(parse_cli(["avatar-vectors", "generate", "--mode", "exhaustive"]).is_err());
    }

    #[test]
    fn test_verify_parses_report_path() {
        let cli = parse_cli([
            "avatar-vectors",
            "verify",
            "--vectors",
            "golden.json",
            "--report",
            "report.json",
        ])
        .expect("parse");
        match cli.command {
            Some(Commands::Verify { vectors, report }) => {
                assert_eq!(vectors, PathBuf::from("golden.json"));
                assert_eq!(report, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected verify"),
        }
    }
}
