//! Avatar Vectors Core
//!
//! Golden-vector conformance harness for the multiavatar algorithm:
//! - Catalogue: fixed, ordered test cases (sampled or full coverage)
//! - Adapter: one async call signature over any avatar implementation
//! - Recorder: runs every case sequentially, failures recorded as data
//! - Serializer: canonical, byte-reproducible JSON vector file
//! - Verifier: replays a vector file and diffs outputs byte-for-byte

pub mod adapter;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod fakes;
pub mod oracle;
pub mod pipeline;
pub mod recorder;
pub mod selector;
pub mod serializer;
pub mod telemetry;
pub mod verify;

pub use adapter::{invoke, AvatarAlgorithm};
pub use catalogue::{Catalogue, CoverageMode, TestCase};
pub use config::HarnessConfig;
pub use error::{AlgorithmError, HarnessError, Result};
pub use oracle::NodeOracle;
pub use pipeline::{generate_vectors, GenerationResult};
pub use recorder::{Outcome, VectorRecorder, VectorResult};
pub use selector::{PartSelector, Theme, CHARACTER_NAMES, PART_CODES};
pub use serializer::{
    encode_vector_file, load_vector_file, parse_vector_file, write_vector_file, VectorRecord,
    VectorSummary,
};
pub use telemetry::init_tracing;
pub use verify::{
    first_difference, verify_vectors, write_conformance_report, CaseMismatch, ConformanceReport,
    MismatchKind,
};
